//! Ordered in-memory grant collection.
//!
//! # Responsibility
//! - Provide add/remove/update operations over the grant list.
//! - Assign ids from a monotonic counter that survives removals.
//!
//! # Invariants
//! - `next_id` never decreases, even when grants are removed.
//! - Every stored field has passed its sanitizer.
//! - List order is insertion order; removal preserves relative order.
//!
//! The in-memory book is the authoritative state; persistence is a
//! separate best-effort concern owned by the store layer.

use crate::model::grant::{
    default_start_date, sanitize_shares, sanitize_start, sanitize_title, sanitize_years, Grant,
    GrantEdit, GrantSeed, DEFAULT_GRANT_SHARES, DEFAULT_VESTING_YEARS,
};

/// Ordered collection of grants plus the id counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantBook {
    grants: Vec<Grant>,
    next_id: u64,
}

impl Default for GrantBook {
    fn default() -> Self {
        Self::new()
    }
}

impl GrantBook {
    /// Creates an empty book with ids starting at 1.
    pub fn new() -> Self {
        Self {
            grants: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a book from decoded state.
    ///
    /// `next_id` is forced above every existing id; a persisted counter is
    /// never trusted directly.
    pub fn from_parts(grants: Vec<Grant>, next_id: u64) -> Self {
        let min_next = grants.iter().map(|grant| grant.id + 1).max().unwrap_or(1);
        Self {
            grants,
            next_id: next_id.max(min_next),
        }
    }

    /// Adds a grant from raw seed values, assigning the next unused id.
    pub fn add(&mut self, seed: GrantSeed) -> &Grant {
        let grant = Grant {
            id: self.next_id,
            shares: sanitize_shares(seed.shares.unwrap_or(DEFAULT_GRANT_SHARES as f64)),
            start: seed
                .start
                .as_deref()
                .map(sanitize_start)
                .unwrap_or_else(default_start_date),
            years: sanitize_years(seed.years.unwrap_or(f64::from(DEFAULT_VESTING_YEARS))),
            title: sanitize_title(seed.title.as_deref().unwrap_or("")),
        };
        self.next_id += 1;
        self.grants.push(grant);
        self.grants.last().expect("grant was just pushed")
    }

    /// Removes a grant by id. Returns `false` (no-op) when absent.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.grants.len();
        self.grants.retain(|grant| grant.id != id);
        self.grants.len() != before
    }

    /// Applies one field edit to the grant with `id`.
    ///
    /// Returns `None` for an unknown id, otherwise whether the stored
    /// value actually changed.
    pub fn update(&mut self, id: u64, edit: GrantEdit) -> Option<bool> {
        let grant = self.grants.iter_mut().find(|grant| grant.id == id)?;
        Some(grant.apply(edit))
    }

    pub fn get(&self, id: u64) -> Option<&Grant> {
        self.grants.iter().find(|grant| grant.id == id)
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// The id the next added grant will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Sum of all granted shares, vested or not. Used by the immediate
    /// 83(b)-style election view.
    pub fn total_granted_shares(&self) -> u64 {
        self.grants.iter().map(|grant| grant.shares).sum()
    }
}
