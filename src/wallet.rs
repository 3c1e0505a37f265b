//! Wallet balances and transaction history store.
//!
//! Holds two token balance/price pairs (native SOL and the TEAM token) and a
//! list of already-signed on-chain transaction results for display. No
//! signing or transaction construction happens here; the API returns
//! finished results and this store only reconciles and normalizes them.

use crate::client::{ApiClient, ApiRequest};
use crate::error::AuthRequired;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Mutex, MutexGuard};

/// Structured memo prefix merchant payments are tagged with on-chain.
pub const PAY_MEMO_PREFIX: &str = "Armory Pay";
/// Canonical type label for normalized merchant payments.
pub const PAY_TYPE: &str = "Armory Pay";
const DEFAULT_MERCHANT: &str = "Armory Merchant";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub signature: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(rename = "businessName", default)]
    pub business_name: Option<String>,
    #[serde(rename = "businessId", default)]
    pub business_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct TransactionsResponse {
    transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
struct BalancePriceResponse {
    balance: f64,
    #[serde(default)]
    price: Option<f64>,
}

/// One token's balance/price pair with its own loading/error flags.
/// `balance: None` means never fetched, which gates the loading spinner to
/// the first load only.
#[derive(Clone, Debug, Default)]
pub struct TokenBalance {
    pub balance: Option<f64>,
    pub price: Option<f64>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct WalletState {
    sol: TokenBalance,
    team: TokenBalance,
    transactions: Vec<Transaction>,
    transactions_loading: bool,
    transactions_error: Option<String>,
}

/// Tag merchant payments from the structured memo and extract the business
/// name. Transactions already labelled as merchant pay keep their label but
/// get a default business name when the memo carried none.
pub fn normalize_transactions(transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions
        .into_iter()
        .map(|mut tx| {
            let labelled_pay = tx.kind.eq_ignore_ascii_case(PAY_TYPE)
                || tx.kind.eq_ignore_ascii_case("armorypay");
            let memo_pay = tx
                .memo
                .as_deref()
                .is_some_and(|m| m.starts_with(PAY_MEMO_PREFIX));

            if labelled_pay || memo_pay || tx.business_name.is_some() || tx.business_id.is_some() {
                tx.kind = PAY_TYPE.to_string();
                if tx.business_name.is_none() {
                    tx.business_name = tx
                        .memo
                        .as_deref()
                        .and_then(extract_business_name)
                        .or_else(|| Some(DEFAULT_MERCHANT.to_string()));
                }
            }
            tx
        })
        .collect()
}

/// Pull the merchant name out of a `... Business: <name> | ...` memo.
fn extract_business_name(memo: &str) -> Option<String> {
    let rest = &memo[memo.find("Business: ")? + "Business: ".len()..];
    let name = rest.split('|').next().unwrap_or(rest).trim();
    (!name.is_empty()).then(|| name.to_string())
}

pub struct WalletStore {
    client: ApiClient,
    state: Mutex<WalletState>,
}

impl WalletStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(WalletState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, WalletState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn fetch_balance(
        &self,
        path: &str,
        token: Option<&str>,
        select: fn(&mut WalletState) -> &mut TokenBalance,
    ) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        {
            let mut st = self.state();
            let slot = select(&mut st);
            // Spinner only on the first load; refreshes stay quiet.
            if slot.balance.is_none() {
                slot.is_loading = true;
            }
            slot.error = None;
        }

        let req = ApiRequest::get(path).with_token(token);
        match self.client.request::<BalancePriceResponse>(req).await {
            Ok(resp) => {
                let mut st = self.state();
                let slot = select(&mut st);
                slot.balance = Some(resp.balance);
                slot.price = resp.price;
                slot.is_loading = false;
            }
            Err(e) => {
                log::warn!("[wallet] balance fetch {path} failed: {e}");
                let mut st = self.state();
                let slot = select(&mut st);
                slot.error = Some(e.to_string());
                slot.is_loading = false;
            }
        }
        Ok(())
    }

    pub async fn fetch_sol_balance(&self, token: Option<&str>) -> Result<(), AuthRequired> {
        self.fetch_balance("/wallet/balance", token, |st| &mut st.sol)
            .await
    }

    pub async fn fetch_team_balance(&self, token: Option<&str>) -> Result<(), AuthRequired> {
        self.fetch_balance("/wallet/balance/team", token, |st| &mut st.team)
            .await
    }

    /// Fetch and normalize transaction history for a wallet address.
    pub async fn fetch_transactions(
        &self,
        token: Option<&str>,
        address: &str,
        limit: Option<u32>,
    ) -> Result<(), AuthRequired> {
        let token = token.ok_or(AuthRequired)?;
        {
            let mut st = self.state();
            st.transactions_loading = true;
            st.transactions_error = None;
        }

        let req = ApiRequest::post("/wallet/transactions")
            .with_token(token)
            .with_body(json!({ "address": address, "limit": limit }));

        match self.client.request::<TransactionsResponse>(req).await {
            Ok(resp) => {
                let normalized = normalize_transactions(resp.transactions);
                log::debug!("[wallet] fetched {} transactions", normalized.len());
                let mut st = self.state();
                st.transactions = normalized;
                st.transactions_loading = false;
            }
            Err(e) => {
                log::warn!("[wallet] transaction fetch failed: {e}");
                let mut st = self.state();
                st.transactions = Vec::new();
                st.transactions_error = Some(e.to_string());
                st.transactions_loading = false;
            }
        }
        Ok(())
    }

    pub fn sol(&self) -> TokenBalance {
        self.state().sol.clone()
    }

    pub fn team(&self) -> TokenBalance {
        self.state().team.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state().transactions.clone()
    }

    pub fn transactions_loading(&self) -> bool {
        self.state().transactions_loading
    }

    pub fn transactions_error(&self) -> Option<String> {
        self.state().transactions_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(kind: &str, memo: Option<&str>) -> Transaction {
        Transaction {
            signature: "sig".into(),
            kind: kind.into(),
            amount: Some(1.0),
            memo: memo.map(String::from),
            business_name: None,
            business_id: None,
            timestamp: None,
        }
    }

    #[test]
    fn memo_prefix_tags_merchant_payments() {
        let txs = normalize_transactions(vec![tx(
            "transfer",
            Some("Armory Pay | Business: Front Sight Range | Order: 42"),
        )]);
        assert_eq!(txs[0].kind, PAY_TYPE);
        assert_eq!(txs[0].business_name.as_deref(), Some("Front Sight Range"));
    }

    #[test]
    fn plain_transfers_pass_through_untouched() {
        let txs = normalize_transactions(vec![tx("transfer", Some("thanks for lunch"))]);
        assert_eq!(txs[0].kind, "transfer");
        assert!(txs[0].business_name.is_none());
    }

    #[test]
    fn labelled_pay_without_memo_gets_default_merchant() {
        let txs = normalize_transactions(vec![tx("armorypay", None)]);
        assert_eq!(txs[0].kind, PAY_TYPE);
        assert_eq!(txs[0].business_name.as_deref(), Some(DEFAULT_MERCHANT));
    }

    #[test]
    fn business_name_extraction_stops_at_pipe() {
        assert_eq!(
            extract_business_name("Armory Pay | Business: Ace Armory | Ref: 9"),
            Some("Ace Armory".to_string())
        );
        assert_eq!(extract_business_name("no marker here"), None);
    }
}
