//! Repository layer for grant records.
//!
//! # Responsibility
//! - Own the ordered grant collection and its id assignment.
//! - Keep mutation entry points narrow so every write is sanitized.
//!
//! # Invariants
//! - Grant ids are assigned from a monotonic counter, never reused.

pub mod grant_repo;
