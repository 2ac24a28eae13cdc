//! Versioned state payload codec and schema migration.
//!
//! # Responsibility
//! - Serialize the grant book and assumptions into the current payload.
//! - Parse payloads from all three schema generations back into current
//!   in-memory state.
//!
//! # Invariants
//! - Decode returns `None` on structural failure; malformed state means
//!   "no saved state", never an error.
//! - Every decoded field passes the same sanitizers as live input; there
//!   is no trusted-deserialized-value path.
//! - `next_id` is recomputed from the decoded grants, never trusted from
//!   the payload.
//!
//! # Schema generations
//! 1. Legacy: per-grant `taxRate`/`growthRate`, grant label under `name`.
//! 2. Intermediate: rates hoisted into a top-level `global` block.
//! 3. Current: `assumptions` + `grants` + `meta` blocks (see `encode`).
//!
//! Precedence during migration is newest-block-wins, field by field:
//! `assumptions` over `global` over the first grant carrying a legacy
//! rate.

use crate::model::assumptions::{
    default_conversion_date, derive_fmv, sanitize_conversion_date, sanitize_fmv,
    sanitize_growth_rate, sanitize_tax_rate, sanitize_total_shares, sanitize_valuation,
    Assumptions, DEFAULT_GROWTH_RATE, DEFAULT_POST_MONEY, DEFAULT_TAX_RATE, DEFAULT_TOTAL_SHARES,
};
use crate::model::grant::{
    default_start_date, sanitize_shares, sanitize_start, sanitize_title, sanitize_years, Grant,
    DEFAULT_GRANT_SHARES, DEFAULT_VESTING_YEARS,
};
use crate::repo::grant_repo::GrantBook;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Versioned identifier the payload is stored under in both stores.
pub const STATE_KEY: &str = "vestcast.state.v3";

#[derive(Serialize)]
struct Payload<'a> {
    assumptions: PayloadAssumptions,
    grants: Vec<PayloadGrant<'a>>,
    meta: PayloadMeta,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayloadAssumptions {
    total_shares: u64,
    post_money: f64,
    fmv: f64,
    conversion_date: NaiveDate,
    tax_rate: f64,
    growth_rate: f64,
}

#[derive(Serialize)]
struct PayloadGrant<'a> {
    id: u64,
    shares: u64,
    start: NaiveDate,
    years: u32,
    title: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayloadMeta {
    fmv_locked: bool,
}

/// In-memory state recovered from a persisted payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedState {
    pub grants: Vec<Grant>,
    pub next_id: u64,
    pub assumptions: Assumptions,
}

/// Serializes the current state into the generation-3 JSON payload.
pub fn encode(book: &GrantBook, assumptions: &Assumptions) -> serde_json::Result<String> {
    let payload = Payload {
        assumptions: PayloadAssumptions {
            total_shares: assumptions.total_shares_outstanding,
            post_money: assumptions.post_money_valuation,
            fmv: assumptions.fmv,
            conversion_date: assumptions.conversion_date,
            tax_rate: assumptions.tax_rate,
            growth_rate: assumptions.growth_rate,
        },
        grants: book
            .grants()
            .iter()
            .map(|grant| PayloadGrant {
                id: grant.id,
                shares: grant.shares,
                start: grant.start,
                years: grant.years,
                title: &grant.title,
            })
            .collect(),
        meta: PayloadMeta {
            fmv_locked: assumptions.fmv_locked,
        },
    };
    serde_json::to_string(&payload)
}

/// Parses a payload from any known schema generation.
///
/// Returns `None` on structural failure: unparseable JSON, a non-object
/// root, or a missing/non-array `grants` list. Anything less than that is
/// repaired field by field through the sanitizers.
pub fn decode(text: &str) -> Option<DecodedState> {
    let root: Value = serde_json::from_str(text).ok()?;
    let root = root.as_object()?;
    let raw_grants = root.get("grants")?.as_array()?;

    let assumptions_block = root.get("assumptions").and_then(Value::as_object);
    let global_block = root.get("global").and_then(Value::as_object);
    let meta_block = root.get("meta").and_then(Value::as_object);

    // Generation-1 payloads kept rates on each grant; the first grant
    // carrying a rate speaks for the whole legacy state.
    let mut legacy_tax_rate: Option<f64> = None;
    let mut legacy_growth_rate: Option<f64> = None;

    let mut parsed: Vec<(Option<u64>, Grant)> = Vec::new();
    let mut seen_ids: BTreeSet<u64> = BTreeSet::new();
    let mut max_id: u64 = 0;

    for raw in raw_grants {
        let Some(fields) = raw.as_object() else {
            continue;
        };

        if legacy_tax_rate.is_none() {
            legacy_tax_rate = fields.get("taxRate").and_then(Value::as_f64);
        }
        if legacy_growth_rate.is_none() {
            legacy_growth_rate = fields.get("growthRate").and_then(Value::as_f64);
        }

        let id = fields
            .get("id")
            .and_then(Value::as_u64)
            .filter(|id| *id > 0 && seen_ids.insert(*id));
        if let Some(id) = id {
            max_id = max_id.max(id);
        }

        let grant = Grant {
            // Placeholder; real ids are settled once the maximum is known.
            id: 0,
            shares: sanitize_shares(
                field_f64(fields, "shares").unwrap_or(DEFAULT_GRANT_SHARES as f64),
            ),
            start: field_str(fields, "start")
                .map(sanitize_start)
                .unwrap_or_else(default_start_date),
            years: sanitize_years(
                field_f64(fields, "years").unwrap_or(f64::from(DEFAULT_VESTING_YEARS)),
            ),
            title: field_str(fields, "title")
                .or_else(|| field_str(fields, "name"))
                .map(sanitize_title)
                .unwrap_or_default(),
        };
        parsed.push((id, grant));
    }

    // Grants with a missing, non-positive or duplicate id are re-assigned
    // above the maximum valid id, preserving list order.
    let mut next_fresh = max_id + 1;
    let grants: Vec<Grant> = parsed
        .into_iter()
        .map(|(id, mut grant)| {
            grant.id = id.unwrap_or_else(|| {
                let fresh = next_fresh;
                next_fresh += 1;
                fresh
            });
            grant
        })
        .collect();
    let next_id = next_fresh;

    let total_shares_raw = pick_f64(assumptions_block, global_block, "totalShares");
    let post_money_raw = pick_f64(assumptions_block, global_block, "postMoney");
    let fmv_raw = pick_f64(assumptions_block, global_block, "fmv");
    let tax_rate_raw = pick_f64(assumptions_block, global_block, "taxRate").or(legacy_tax_rate);
    let growth_rate_raw =
        pick_f64(assumptions_block, global_block, "growthRate").or(legacy_growth_rate);
    let conversion_date_raw = pick_str(assumptions_block, global_block, "conversionDate");

    let fmv_locked = meta_block
        .and_then(|meta| meta.get("fmvLocked"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let total_shares = total_shares_raw
        .map(sanitize_total_shares)
        .unwrap_or(DEFAULT_TOTAL_SHARES);
    let post_money = post_money_raw
        .map(sanitize_valuation)
        .unwrap_or(DEFAULT_POST_MONEY);

    // Persisted FMV is a cache: whenever valuation and share count made it
    // through, the unlocked value is re-derived from them. A true
    // `fmvLocked` keeps the user's pinned value instead.
    let fmv = if !fmv_locked && total_shares_raw.is_some() && post_money_raw.is_some() {
        derive_fmv(post_money, total_shares).unwrap_or_else(|| sanitize_fmv(fmv_raw.unwrap_or(0.0)))
    } else {
        match fmv_raw {
            Some(raw) => sanitize_fmv(raw),
            None => derive_fmv(post_money, total_shares).unwrap_or(0.0),
        }
    };

    let assumptions = Assumptions {
        total_shares_outstanding: total_shares,
        post_money_valuation: post_money,
        fmv,
        conversion_date: conversion_date_raw
            .map(sanitize_conversion_date)
            .unwrap_or_else(default_conversion_date),
        tax_rate: tax_rate_raw
            .map(sanitize_tax_rate)
            .unwrap_or(DEFAULT_TAX_RATE),
        growth_rate: growth_rate_raw
            .map(sanitize_growth_rate)
            .unwrap_or(DEFAULT_GROWTH_RATE),
        fmv_locked,
    };

    Some(DecodedState {
        grants,
        next_id,
        assumptions,
    })
}

fn field_f64(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    fields.get(key).and_then(Value::as_f64)
}

fn field_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

fn pick_f64(
    current: Option<&Map<String, Value>>,
    intermediate: Option<&Map<String, Value>>,
    key: &str,
) -> Option<f64> {
    current
        .and_then(|block| field_f64(block, key))
        .or_else(|| intermediate.and_then(|block| field_f64(block, key)))
}

fn pick_str<'a>(
    current: Option<&'a Map<String, Value>>,
    intermediate: Option<&'a Map<String, Value>>,
    key: &str,
) -> Option<&'a str> {
    current
        .and_then(|block| field_str(block, key))
        .or_else(|| intermediate.and_then(|block| field_str(block, key)))
}
