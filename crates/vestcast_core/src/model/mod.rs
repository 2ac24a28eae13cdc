//! Domain model for grants and global projection assumptions.
//!
//! # Responsibility
//! - Define the canonical records used by the projection engine.
//! - Own every field sanitizer; raw presentation input never reaches the
//!   engine unsanitized.
//!
//! # Invariants
//! - Sanitizers clamp or default bad input; they never fail.
//! - Every sanitizer is idempotent.

pub mod assumptions;
pub mod grant;
