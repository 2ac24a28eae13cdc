//! Projection engine: vesting expansion and per-year tax aggregation.
//!
//! # Responsibility
//! - Expand grants into yearly vesting events.
//! - Aggregate events into per-year share/income/tax buckets.
//!
//! # Invariants
//! - Buckets are recomputed wholesale on every pass; nothing is updated
//!   incrementally.
//! - Projection never fails; inputs are sanitized by construction.

pub mod aggregate;
pub mod vesting;
