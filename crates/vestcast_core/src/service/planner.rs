//! Planner service: the single logical writer over session state.
//!
//! # Responsibility
//! - Own the grant book and assumptions; no hidden globals.
//! - Run every mutation to completion: mutate, recompute, persist.
//! - Seed built-in defaults when no usable saved state exists.
//!
//! # Invariants
//! - Buckets are recomputed wholesale after every accepted mutation.
//! - Removing the last grant resets assumptions to defaults.
//! - Persistence is best effort; a store failure never fails a mutation.

use crate::codec;
use crate::model::assumptions::{AssumptionEdit, Assumptions};
use crate::model::grant::{Grant, GrantEdit, GrantSeed};
use crate::projection::aggregate::{project, YearBucket};
use crate::repo::grant_repo::GrantBook;
use crate::store::StateVault;
use log::{info, warn};
use std::collections::BTreeMap;

/// Session coordinator owning all mutable state.
///
/// Single-threaded and synchronous: each public mutation recomputes the
/// projection and persists before returning.
pub struct Planner {
    book: GrantBook,
    assumptions: Assumptions,
    buckets: BTreeMap<i32, YearBucket>,
    vault: Option<StateVault>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    /// Creates an in-memory planner with no grants and default
    /// assumptions. Nothing is persisted.
    pub fn new() -> Self {
        Self {
            book: GrantBook::new(),
            assumptions: Assumptions::default(),
            buckets: BTreeMap::new(),
            vault: None,
        }
    }

    /// Opens a planner backed by `vault`.
    ///
    /// Restores decoded state when the vault holds a usable payload;
    /// otherwise seeds the built-in default grant and assumptions.
    pub fn open(vault: StateVault) -> Self {
        let mut planner = Self {
            book: GrantBook::new(),
            assumptions: Assumptions::default(),
            buckets: BTreeMap::new(),
            vault: Some(vault),
        };

        let decoded = planner
            .vault
            .as_ref()
            .and_then(StateVault::load)
            .and_then(|payload| codec::decode(&payload));

        match decoded {
            Some(state) => {
                info!(
                    "event=session_restore module=service status=ok grants={}",
                    state.grants.len()
                );
                planner.book = GrantBook::from_parts(state.grants, state.next_id);
                planner.assumptions = state.assumptions;
            }
            None => {
                info!("event=session_restore module=service status=miss seeding=defaults");
                planner.book.add(GrantSeed::default());
            }
        }

        planner.refresh();
        planner
    }

    /// Adds a grant from raw seed values and returns its id.
    pub fn add_grant(&mut self, seed: GrantSeed) -> u64 {
        let id = self.book.add(seed).id;
        info!("event=grant_add module=service status=ok id={id}");
        self.refresh();
        self.persist();
        id
    }

    /// Removes a grant by id. No-op (returns `false`) when absent.
    ///
    /// Removing the last grant resets assumptions to defaults.
    pub fn remove_grant(&mut self, id: u64) -> bool {
        if !self.book.remove(id) {
            return false;
        }
        if self.book.is_empty() {
            self.assumptions.reset();
            info!("event=assumptions_reset module=service status=ok cause=book_empty");
        }
        info!("event=grant_remove module=service status=ok id={id}");
        self.refresh();
        self.persist();
        true
    }

    /// Applies one field edit to the grant with `id`.
    ///
    /// Returns whether observable state changed; unknown ids and
    /// unchanged values skip the recompute/persist pass.
    pub fn update_grant(&mut self, id: u64, edit: GrantEdit) -> bool {
        match self.book.update(id, edit) {
            Some(true) => {
                self.refresh();
                self.persist();
                true
            }
            Some(false) => false,
            None => {
                warn!("event=grant_update module=service status=miss id={id}");
                false
            }
        }
    }

    /// Applies one assumption edit; same change-reporting contract as
    /// [`Planner::update_grant`].
    pub fn update_assumption(&mut self, edit: AssumptionEdit) -> bool {
        if !self.assumptions.apply(edit) {
            return false;
        }
        self.refresh();
        self.persist();
        true
    }

    /// Current per-year projection buckets.
    pub fn projection(&self) -> &BTreeMap<i32, YearBucket> {
        &self.buckets
    }

    pub fn grants(&self) -> &[Grant] {
        self.book.grants()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Total shares across all grants, for the immediate-election view.
    pub fn total_granted_shares(&self) -> u64 {
        self.book.total_granted_shares()
    }

    fn refresh(&mut self) {
        self.buckets = project(&self.book, &self.assumptions);
    }

    fn persist(&mut self) {
        let Some(vault) = &self.vault else {
            return;
        };
        match codec::encode(&self.book, &self.assumptions) {
            Ok(payload) => vault.persist(&payload),
            Err(err) => {
                warn!("event=state_persist module=service status=error stage=encode error={err}");
            }
        }
    }
}
