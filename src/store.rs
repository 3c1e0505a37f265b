//! Per-domain item stores.
//!
//! One generic `ItemStore<K>` instantiated per record kind. Each store owns
//! its collection plus `is_loading`/`error` flags and reconciles local state
//! from API responses. State sits behind a mutex that is only held for
//! synchronous transitions, never across an await, so overlapping requests
//! on the same store race exactly as the product always has: the last
//! response to resolve wins.

use crate::client::{ApiClient, ApiRequest, Method};
use crate::error::AuthRequired;
use crate::models::{
    Ammo, CreateAmmoPayload, CreateDocumentPayload, CreateFirearmPayload, CreateGearPayload,
    CreateNfaPayload, Document, Firearm, Gear, NfaItem, UpdateAmmoPayload, UpdateDocumentPayload,
    UpdateFirearmPayload, UpdateGearPayload, UpdateNfaPayload,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

/// Static description of one record kind: wire types, REST path, and the
/// accessors the aggregate view needs.
pub trait ItemKind: Send + Sync + 'static {
    type Record: Clone + Send + Sync + DeserializeOwned + 'static;
    type CreatePayload: Serialize + Send + Sync;
    type UpdatePayload: Serialize + Send + Sync;

    /// Short name used in log messages and error strings ("gear", "ammo").
    const NAME: &'static str;
    /// Collection path, e.g. `/gear`; item paths append `/:id`.
    const PATH: &'static str;
    /// PATCH for firearms/ammo/gear, PUT for documents/NFA.
    const UPDATE_VERB: Method;

    fn id(record: &Self::Record) -> i64;
    /// Monetary value for aggregate totals; 0 for kinds without one.
    fn value(record: &Self::Record) -> f64;
}

pub struct FirearmKind;

impl ItemKind for FirearmKind {
    type Record = Firearm;
    type CreatePayload = CreateFirearmPayload;
    type UpdatePayload = UpdateFirearmPayload;

    const NAME: &'static str = "firearm";
    const PATH: &'static str = "/firearms";
    const UPDATE_VERB: Method = Method::Patch;

    fn id(r: &Firearm) -> i64 {
        r.id
    }

    fn value(r: &Firearm) -> f64 {
        r.value.or(r.purchase_price).unwrap_or(0.0)
    }
}

pub struct AmmoKind;

impl ItemKind for AmmoKind {
    type Record = Ammo;
    type CreatePayload = CreateAmmoPayload;
    type UpdatePayload = UpdateAmmoPayload;

    const NAME: &'static str = "ammo";
    const PATH: &'static str = "/ammos";
    const UPDATE_VERB: Method = Method::Patch;

    fn id(r: &Ammo) -> i64 {
        r.id
    }

    fn value(r: &Ammo) -> f64 {
        r.purchase_price.unwrap_or(0.0)
    }
}

pub struct GearKind;

impl ItemKind for GearKind {
    type Record = Gear;
    type CreatePayload = CreateGearPayload;
    type UpdatePayload = UpdateGearPayload;

    const NAME: &'static str = "gear";
    const PATH: &'static str = "/gear";
    const UPDATE_VERB: Method = Method::Patch;

    fn id(r: &Gear) -> i64 {
        r.id
    }

    fn value(r: &Gear) -> f64 {
        r.purchase_price.unwrap_or(0.0)
    }
}

pub struct DocumentKind;

impl ItemKind for DocumentKind {
    type Record = Document;
    type CreatePayload = CreateDocumentPayload;
    type UpdatePayload = UpdateDocumentPayload;

    const NAME: &'static str = "document";
    const PATH: &'static str = "/documents";
    const UPDATE_VERB: Method = Method::Put;

    fn id(r: &Document) -> i64 {
        r.id
    }

    fn value(_: &Document) -> f64 {
        0.0
    }
}

pub struct NfaKind;

impl ItemKind for NfaKind {
    type Record = NfaItem;
    type CreatePayload = CreateNfaPayload;
    type UpdatePayload = UpdateNfaPayload;

    const NAME: &'static str = "nfa";
    const PATH: &'static str = "/nfa";
    const UPDATE_VERB: Method = Method::Put;

    fn id(r: &NfaItem) -> i64 {
        r.id
    }

    fn value(r: &NfaItem) -> f64 {
        r.value.unwrap_or(0.0)
    }
}

struct StoreState<R> {
    items: Vec<R>,
    is_loading: bool,
    error: Option<String>,
    attempted_initial_fetch: bool,
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
            attempted_initial_fetch: false,
        }
    }
}

/// Generic domain store. Constructed per kind with an injected client so
/// tests get isolated instances instead of process-wide singletons.
pub struct ItemStore<K: ItemKind> {
    client: ApiClient,
    state: Mutex<StoreState<K::Record>>,
}

impl<K: ItemKind> ItemStore<K> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState<K::Record>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self) {
        let mut st = self.state();
        st.is_loading = true;
        st.error = None;
    }

    fn fail(&self, message: String) {
        log::warn!("[store] {} operation failed: {message}", K::NAME);
        let mut st = self.state();
        st.error = Some(message);
        st.is_loading = false;
    }

    /// Replace the whole collection from the server.
    ///
    /// Rejects with `AuthRequired` before touching state or the network when
    /// no token is supplied; on transport failure records the error and
    /// leaves the current items alone.
    pub async fn fetch_all(
        &self,
        token: Option<&str>,
        params: &[(&str, &str)],
    ) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        self.begin();

        let mut req = ApiRequest::get(K::PATH).with_token(token);
        for (k, v) in params {
            req = req.with_query(k, v);
        }

        match self.client.request::<Vec<K::Record>>(req).await {
            Ok(items) => {
                log::debug!("[store] fetched {} {} items", items.len(), K::NAME);
                let mut st = self.state();
                st.items = items;
                st.is_loading = false;
                st.attempted_initial_fetch = true;
            }
            Err(e) => {
                let mut st = self.state();
                st.error = Some(e.to_string());
                st.is_loading = false;
                st.attempted_initial_fetch = true;
                log::warn!("[store] failed to fetch {}: {e}", K::NAME);
            }
        }
        Ok(())
    }

    /// Create a record server-side; on success the server-assigned record is
    /// appended locally. Returns whether the server accepted the create.
    pub async fn create(
        &self,
        payload: &K::CreatePayload,
        token: Option<&str>,
    ) -> Result<bool, AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        self.begin();

        let body = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                self.fail(format!("failed to encode {} payload: {e}", K::NAME));
                return Ok(false);
            }
        };
        let req = ApiRequest::post(K::PATH).with_token(token).with_body(body);

        match self.client.request::<K::Record>(req).await {
            Ok(record) => {
                log::debug!("[store] created {} {}", K::NAME, K::id(&record));
                let mut st = self.state();
                st.items.push(record);
                st.is_loading = false;
                Ok(true)
            }
            Err(e) => {
                self.fail(e.to_string());
                Ok(false)
            }
        }
    }

    /// Update a record in place. A success for an id we no longer hold is a
    /// non-fatal inconsistency: logged, items untouched, no synthetic insert.
    pub async fn update(
        &self,
        id: i64,
        payload: &K::UpdatePayload,
        token: Option<&str>,
    ) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        self.begin();

        let body = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                self.fail(format!("failed to encode {} payload: {e}", K::NAME));
                return Ok(());
            }
        };
        let req = ApiRequest::new(K::UPDATE_VERB, format!("{}/{id}", K::PATH))
            .with_token(token)
            .with_body(body);

        match self.client.request::<K::Record>(req).await {
            Ok(updated) => {
                let mut st = self.state();
                match st.items.iter_mut().find(|r| K::id(r) == id) {
                    Some(slot) => *slot = updated,
                    None => {
                        log::debug!("[store] updated {} {id} not present locally", K::NAME)
                    }
                }
                st.is_loading = false;
            }
            Err(e) => self.fail(e.to_string()),
        }
        Ok(())
    }

    /// Delete by id. Idempotent when the id is already gone locally.
    pub async fn delete(&self, id: i64, token: Option<&str>) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        self.begin();

        let req = ApiRequest::delete(format!("{}/{id}", K::PATH)).with_token(token);
        match self.client.request_unit(req).await {
            Ok(()) => {
                log::debug!("[store] deleted {} {id}", K::NAME);
                let mut st = self.state();
                st.items.retain(|r| K::id(r) != id);
                st.is_loading = false;
            }
            Err(e) => self.fail(e.to_string()),
        }
        Ok(())
    }

    /// Direct error setter; the aggregate view uses this for its bulk
    /// clear-and-retry action.
    pub fn set_error(&self, error: Option<String>) {
        self.state().error = error;
    }

    /// Pure lookup for drawer content views instantiated with only an id.
    pub fn get_by_id(&self, id: i64) -> Option<K::Record> {
        self.state().items.iter().find(|r| K::id(r) == id).cloned()
    }

    pub fn items(&self) -> Vec<K::Record> {
        self.state().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn attempted_initial_fetch(&self) -> bool {
        self.state().attempted_initial_fetch
    }

    /// Sum of per-record monetary values over the locally loaded items.
    pub fn total_value(&self) -> f64 {
        self.state().items.iter().map(K::value).sum()
    }
}

/// Parse a JSON-encoded picture list column; malformed input reads as empty.
fn parse_pictures(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
}

impl ItemStore<GearKind> {
    /// Add gear, merging into an existing row when the same item is already
    /// shelved: match on name, manufacturer, model, and type
    /// (case-insensitive), bump quantity, join notes, union pictures.
    /// Falls through to a plain create when there is no match.
    pub async fn add_or_merge(
        &self,
        payload: &CreateGearPayload,
        token: Option<&str>,
    ) -> Result<bool, AuthRequired> {
        let existing = {
            let st = self.state();
            st.items
                .iter()
                .find(|g| {
                    g.name.eq_ignore_ascii_case(&payload.name)
                        && eq_opt_ci(g.manufacturer.as_deref(), payload.manufacturer.as_deref())
                        && eq_opt_ci(g.model.as_deref(), payload.model.as_deref())
                        && g.kind.eq_ignore_ascii_case(&payload.kind)
                })
                .cloned()
        };

        let Some(existing) = existing else {
            return self.create(payload, token).await;
        };

        log::debug!(
            "[store] merging new gear into existing row {}",
            existing.id
        );

        let mut update = UpdateGearPayload {
            quantity: Some(existing.quantity + payload.quantity),
            ..Default::default()
        };

        if let Some(new_notes) = payload.notes.as_deref().filter(|n| !n.is_empty()) {
            update.notes = Some(match existing.notes.as_deref().filter(|n| !n.is_empty()) {
                Some(old) => format!("{old}\n---\n{new_notes}"),
                None => new_notes.to_string(),
            });
        }

        if payload.pictures.is_some() {
            let mut merged = parse_pictures(existing.pictures.as_deref());
            for uri in parse_pictures(payload.pictures.as_deref()) {
                if !merged.contains(&uri) {
                    merged.push(uri);
                }
            }
            if let Ok(encoded) = serde_json::to_string(&merged) {
                update.pictures = Some(encoded);
            }
        }

        self.update(existing.id, &update, token).await?;
        Ok(self.error().is_none())
    }
}

fn eq_opt_ci(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pictures_parse_tolerates_garbage() {
        assert!(parse_pictures(None).is_empty());
        assert!(parse_pictures(Some("not json")).is_empty());
        assert_eq!(
            parse_pictures(Some(r#"["a","b"]"#)),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn optional_field_comparison_is_case_insensitive() {
        assert!(eq_opt_ci(Some("Magpul"), Some("magpul")));
        assert!(eq_opt_ci(None, None));
        assert!(!eq_opt_ci(Some("Magpul"), None));
    }

    #[test]
    fn kind_metadata_matches_api_routes() {
        assert_eq!(FirearmKind::PATH, "/firearms");
        assert_eq!(AmmoKind::PATH, "/ammos");
        assert_eq!(GearKind::PATH, "/gear");
        assert_eq!(DocumentKind::UPDATE_VERB, Method::Put);
        assert_eq!(NfaKind::UPDATE_VERB, Method::Put);
        assert_eq!(GearKind::UPDATE_VERB, Method::Patch);
    }
}
