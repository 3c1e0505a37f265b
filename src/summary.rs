//! Aggregate "all items" summary across the domain stores.
//!
//! Counts prefer the server snapshot when one exists (an authoritative zero
//! still wins) and fall back to local collection length. Total value is
//! always summed over the locally loaded items, so it can legitimately
//! understate while the count is already accurate; that asymmetry is the
//! intentional progressive-loading tradeoff and must not be "fixed" here.

use crate::app::AppState;
use crate::counts::Domain;
use crate::error::AuthRequired;
use serde::Serialize;

/// Snapshot-or-local count policy. `Some(0)` from the snapshot is present
/// and wins over local length.
pub fn effective_count(snapshot: Option<u64>, local_len: usize) -> u64 {
    snapshot.unwrap_or(local_len as u64)
}

#[derive(Clone, Debug, Serialize)]
pub struct DomainSummary {
    pub domain: Domain,
    pub count: u64,
    pub total_value: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ArmorySummary {
    pub domains: Vec<DomainSummary>,
    pub total_count: u64,
    pub total_value: f64,
}

fn domain_summary(app: &AppState, domain: Domain) -> DomainSummary {
    let snapshot = app.counts.count(domain);
    let (local_len, total_value) = match domain {
        Domain::Firearms => (app.firearms.len(), app.firearms.total_value()),
        Domain::Ammo => (app.ammo.len(), app.ammo.total_value()),
        Domain::Gear => (app.gear.len(), app.gear.total_value()),
        Domain::Documents => (app.documents.len(), app.documents.total_value()),
        Domain::Nfa => (app.nfa.len(), app.nfa.total_value()),
    };
    DomainSummary {
        domain,
        count: effective_count(snapshot, local_len),
        total_value,
    }
}

/// Derive the summary over all tracked domains from current store state.
pub fn derive(app: &AppState) -> ArmorySummary {
    let domains: Vec<DomainSummary> = Domain::ALL
        .iter()
        .map(|d| domain_summary(app, *d))
        .collect();
    let total_count = domains.iter().map(|d| d.count).sum();
    let total_value = domains.iter().map(|d| d.total_value).sum();
    ArmorySummary {
        domains,
        total_count,
        total_value,
    }
}

/// Blocking spinner only while something is loading AND no data has
/// streamed in yet; once any collection has items the spinner stays gone.
pub fn show_blocking_spinner(app: &AppState) -> bool {
    let any_loading = app.firearms.is_loading()
        || app.ammo.is_loading()
        || app.gear.is_loading()
        || app.documents.is_loading()
        || app.nfa.is_loading()
        || app.counts.is_loading();
    let all_empty = app.firearms.is_empty()
        && app.ammo.is_empty()
        && app.gear.is_empty()
        && app.documents.is_empty()
        && app.nfa.is_empty();
    any_loading && all_empty
}

/// First constituent error in the fixed check order: firearms, ammo, gear,
/// documents, NFA, then the counts snapshot.
pub fn first_error(app: &AppState) -> Option<String> {
    app.firearms
        .error()
        .or_else(|| app.ammo.error())
        .or_else(|| app.gear.error())
        .or_else(|| app.documents.error())
        .or_else(|| app.nfa.error())
        .or_else(|| app.counts.error())
}

/// "Try Again": clear every constituent error, then refetch the counts
/// snapshot. Per-item collections re-fetch lazily from their own screens.
pub async fn retry(app: &AppState, token: Option<&str>) -> Result<(), AuthRequired> {
    app.firearms.set_error(None);
    app.ammo.set_error(None);
    app.gear.set_error(None);
    app.documents.set_error(None);
    app.nfa.set_error(None);
    app.counts.set_error(None);
    app.counts.fetch(token).await
}
