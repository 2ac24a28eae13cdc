//! Core projection engine for Vestcast.
//! This crate is the single source of truth for grant, assumption and
//! tax-projection invariants.

pub mod codec;
pub mod dates;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod service;
pub mod store;

pub use codec::{decode, encode, DecodedState, STATE_KEY};
pub use dates::{add_years, parse_iso_date};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assumptions::{AssumptionEdit, Assumptions};
pub use model::grant::{Grant, GrantEdit, GrantSeed};
pub use projection::aggregate::{project, projection_totals, ProjectionTotals, YearBucket};
pub use projection::vesting::{vesting_events, VestingEvent};
pub use repo::grant_repo::GrantBook;
pub use service::planner::Planner;
pub use store::{SnapshotStore, StateVault, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
