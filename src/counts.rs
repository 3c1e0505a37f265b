//! Armory counts snapshot store.
//!
//! The server computes per-domain item counts independently of the item
//! collections, so totals can render before any per-item detail has loaded.
//! The snapshot may be stale relative to the per-kind stores; consumers
//! prefer it when present (zero counts as present) and fall back to local
//! collection length otherwise.

use crate::client::{ApiClient, ApiRequest};
use crate::error::AuthRequired;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// The five tracked domains, in the fixed order the aggregate view checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Firearms,
    Ammo,
    Gear,
    Documents,
    Nfa,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Firearms,
        Domain::Ammo,
        Domain::Gear,
        Domain::Documents,
        Domain::Nfa,
    ];
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Domain::Firearms => "firearms",
            Domain::Ammo => "ammo",
            Domain::Gear => "gear",
            Domain::Documents => "documents",
            Domain::Nfa => "nfa",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmoryCounts {
    pub firearms: u64,
    pub ammo: u64,
    pub gear: u64,
    pub nfa: u64,
    pub documents: u64,
}

impl ArmoryCounts {
    pub fn get(&self, domain: Domain) -> u64 {
        match domain {
            Domain::Firearms => self.firearms,
            Domain::Ammo => self.ammo,
            Domain::Gear => self.gear,
            Domain::Documents => self.documents,
            Domain::Nfa => self.nfa,
        }
    }
}

#[derive(Default)]
struct CountsState {
    snapshot: Option<ArmoryCounts>,
    is_loading: bool,
    error: Option<String>,
}

pub struct CountsStore {
    client: ApiClient,
    state: Mutex<CountsState>,
}

impl CountsStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(CountsState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CountsState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn fetch(&self, token: Option<&str>) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        {
            let mut st = self.state();
            st.is_loading = true;
            st.error = None;
        }

        let req = ApiRequest::get("/armory/counts").with_token(token);
        match self.client.request::<ArmoryCounts>(req).await {
            Ok(counts) => {
                log::debug!("[counts] snapshot {counts:?}");
                let mut st = self.state();
                st.snapshot = Some(counts);
                st.is_loading = false;
            }
            Err(e) => {
                log::warn!("[counts] failed to fetch snapshot: {e}");
                let mut st = self.state();
                st.error = Some(e.to_string());
                st.is_loading = false;
            }
        }
        Ok(())
    }

    /// Snapshot count for one domain; `None` means no snapshot yet, while
    /// `Some(0)` is an authoritative zero.
    pub fn count(&self, domain: Domain) -> Option<u64> {
        self.state().snapshot.map(|s| s.get(domain))
    }

    pub fn snapshot(&self) -> Option<ArmoryCounts> {
        self.state().snapshot
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state().error = error;
    }
}
