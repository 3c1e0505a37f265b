//! Presale code check and redemption.
//!
//! Outcomes here are domain results carried inside 2xx bodies: an invalid or
//! already-redeemed code is a normal answer rendered inline, never a store
//! error. Transport failures degrade into a failed outcome carrying the
//! error message so the drawer flow has one rendering path.

use crate::client::{ApiClient, ApiRequest};
use crate::error::AuthRequired;
use serde::Deserialize;
use serde_json::json;

/// Code type whose redemption pays out to an explicit destination wallet.
pub const WALLET_BOUND_CODE_TYPE: u32 = 2;

#[derive(Clone, Debug, Deserialize)]
pub struct CheckOutcome {
    #[serde(rename = "isValid")]
    pub valid: bool,
    #[serde(default)]
    pub redeemed: bool,
    /// Present when `valid`; type 2 requires a destination wallet address.
    #[serde(rename = "type", default)]
    pub code_type: Option<u32>,
    pub message: String,
}

impl CheckOutcome {
    fn failed(message: String) -> Self {
        Self {
            valid: false,
            redeemed: false,
            code_type: None,
            message,
        }
    }

    pub fn needs_wallet_address(&self) -> bool {
        self.code_type == Some(WALLET_BOUND_CODE_TYPE)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RedeemOutcome {
    pub success: bool,
    pub message: String,
}

pub struct PresaleClient {
    client: ApiClient,
}

impl PresaleClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Check a presale code's validity and redemption status.
    pub async fn check(&self, code: &str, token: Option<&str>) -> CheckOutcome {
        let mut req = ApiRequest::get(format!("/presale/check/{code}"));
        if let Some(token) = token {
            req = req.with_token(token);
        }
        match self.client.request::<CheckOutcome>(req).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("[presale] check failed: {e}");
                CheckOutcome::failed(e.to_string())
            }
        }
    }

    /// Redeem a presale code. Wallet-bound codes carry the destination
    /// address; others omit it.
    pub async fn redeem(
        &self,
        code: &str,
        wallet_address: Option<&str>,
        token: Option<&str>,
    ) -> Result<RedeemOutcome, AuthRequired> {
        let token = token.ok_or(AuthRequired)?;

        let mut body = json!({ "code": code });
        if let Some(address) = wallet_address {
            body["walletAddress"] = json!(address);
        }

        let req = ApiRequest::post("/presale/redeem")
            .with_token(token)
            .with_body(body);
        match self.client.request::<RedeemOutcome>(req).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                log::warn!("[presale] redeem failed: {e}");
                Ok(RedeemOutcome {
                    success: false,
                    message: e.to_string(),
                })
            }
        }
    }
}
