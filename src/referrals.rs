//! Referral program store: code, stats, paginated history, and the public
//! code validation endpoint.

use crate::client::{ApiClient, ApiRequest};
use crate::error::{ApiError, AuthRequired};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferralCode {
    pub referral_code: String,
    pub generated_at: String,
    pub share_url: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferralStats {
    pub user_id: i64,
    pub referral_code: Option<String>,
    pub total_referrals: u64,
    pub wallet_created_referrals: u64,
    pub conversion_rate_to_wallet: f64,
    #[serde(default)]
    pub first_referral_at: Option<String>,
    #[serde(default)]
    pub most_recent_referral_at: Option<String>,
    pub last_calculated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferralHistoryItem {
    pub id: i64,
    pub referred_user_code: String,
    pub signup_date: String,
    pub wallet_created: bool,
    #[serde(default)]
    pub wallet_created_at: Option<String>,
    #[serde(default)]
    pub conversion_source: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferralHistory {
    pub referrals: Vec<ReferralHistoryItem>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Domain-logic result of validating someone else's code; never a store
/// error even when `valid` is false.
#[derive(Clone, Debug, Deserialize)]
pub struct ValidatedReferral {
    pub valid: bool,
    #[serde(default)]
    pub referrer_name: Option<String>,
    pub message: String,
}

#[derive(Default)]
struct ReferralState {
    code: Option<ReferralCode>,
    stats: Option<ReferralStats>,
    history: Option<ReferralHistory>,
    is_loading: bool,
    error: Option<String>,
}

pub struct ReferralStore {
    client: ApiClient,
    state: Mutex<ReferralState>,
}

impl ReferralStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(ReferralState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ReferralState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self) {
        let mut st = self.state();
        st.is_loading = true;
        st.error = None;
    }

    fn finish_code(&self, result: Result<ReferralCode, ApiError>, what: &str) {
        let mut st = self.state();
        match result {
            Ok(code) => st.code = Some(code),
            Err(e) => {
                log::warn!("[referrals] {what} failed: {e}");
                st.error = Some(e.to_string());
            }
        }
        st.is_loading = false;
    }

    /// Fetch the user's referral code, generating one server-side if absent.
    pub async fn fetch_code(&self, token: Option<&str>) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        self.begin();
        let result = self
            .client
            .request(ApiRequest::get("/referrals/code").with_token(token))
            .await;
        self.finish_code(result, "code fetch");
        Ok(())
    }

    /// Rotate the referral code; the previous one stops working.
    pub async fn regenerate_code(&self, token: Option<&str>) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        self.begin();
        let result = self
            .client
            .request(ApiRequest::post("/referrals/code/regenerate").with_token(token))
            .await;
        self.finish_code(result, "code regenerate");
        Ok(())
    }

    pub async fn fetch_stats(&self, token: Option<&str>) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        self.begin();
        let result = self
            .client
            .request::<ReferralStats>(ApiRequest::get("/referrals/stats").with_token(token))
            .await;
        let mut st = self.state();
        match result {
            Ok(stats) => st.stats = Some(stats),
            Err(e) => {
                log::warn!("[referrals] stats fetch failed: {e}");
                st.error = Some(e.to_string());
            }
        }
        st.is_loading = false;
        Ok(())
    }

    pub async fn fetch_history(
        &self,
        token: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        self.begin();
        let req = ApiRequest::get("/referrals/history")
            .with_token(token)
            .with_query("page", page)
            .with_query("page_size", page_size);
        let result = self.client.request::<ReferralHistory>(req).await;
        let mut st = self.state();
        match result {
            Ok(history) => st.history = Some(history),
            Err(e) => {
                log::warn!("[referrals] history fetch failed: {e}");
                st.error = Some(e.to_string());
            }
        }
        st.is_loading = false;
        Ok(())
    }

    /// Validate a referral code. Public endpoint, no token; the outcome is a
    /// domain result (`valid: false` is a normal answer, not an error).
    pub async fn validate(&self, referral_code: &str) -> Result<ValidatedReferral, ApiError> {
        let req = ApiRequest::post("/referrals/validate")
            .with_body(json!({ "referral_code": referral_code }));
        self.client.request(req).await
    }

    pub fn code(&self) -> Option<ReferralCode> {
        self.state().code.clone()
    }

    pub fn stats(&self) -> Option<ReferralStats> {
        self.state().stats.clone()
    }

    pub fn history(&self) -> Option<ReferralHistory> {
        self.state().history.clone()
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
