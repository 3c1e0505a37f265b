//! Multi-step drawer flows.
//!
//! A flow is local step state inside one content view, so exactly one drawer
//! stays active for the whole sequence. The payment flow walks details →
//! password confirmation → sending → receipt/failure; the presale flow walks
//! code entry → check → optional wallet address → redeem. Actual transaction
//! signing and submission belong to the host application and are injected as
//! an async callback.

use crate::content::{PaymentReceipt, PaymentRequest};
use crate::error::AuthRequired;
use crate::presale::{PresaleClient, RedeemOutcome};
use std::future::Future;

/// Items a standard (non-presale) account may add per kind.
pub const STANDARD_ITEM_LIMIT: u32 = 2;

pub const ITEM_LIMIT_MESSAGE: &str =
    "Item limit reached. Standard users can add up to 2 items. Presale members have unlimited additions.";

/// Add-item gate applied at the flow layer so stores stay plain CRUD.
#[derive(Clone, Copy, Debug, Default)]
pub struct ItemLimitPolicy {
    pub presale_member: bool,
}

impl ItemLimitPolicy {
    pub fn can_add(&self, items_added: u32) -> bool {
        self.presale_member || items_added < STANDARD_ITEM_LIMIT
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PaymentStep {
    /// Reviewing recipient and amount.
    Details,
    /// Password entry before sending.
    Confirm,
    /// Submission in flight.
    Sending,
    Done(PaymentReceipt),
    Failed(String),
}

/// Confirm-payment drawer state machine.
pub struct PaymentFlow {
    request: PaymentRequest,
    step: PaymentStep,
    password: String,
}

impl PaymentFlow {
    pub fn new(request: PaymentRequest) -> Self {
        Self {
            request,
            step: PaymentStep::Details,
            password: String::new(),
        }
    }

    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    pub fn step(&self) -> &PaymentStep {
        &self.step
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Details → Confirm. No-op from any other step.
    pub fn advance(&mut self) {
        if self.step == PaymentStep::Details {
            self.step = PaymentStep::Confirm;
        }
    }

    /// Confirm → Details. No-op once sending has started.
    pub fn back(&mut self) {
        if self.step == PaymentStep::Confirm {
            self.step = PaymentStep::Details;
        }
    }

    /// Submit the payment through the host-supplied sender. Requires the
    /// Confirm step and a non-empty password; the password is cleared after
    /// the attempt regardless of outcome.
    pub async fn submit<F, Fut>(&mut self, send: F)
    where
        F: FnOnce(PaymentRequest, String) -> Fut,
        Fut: Future<Output = Result<PaymentReceipt, String>>,
    {
        if self.step != PaymentStep::Confirm {
            return;
        }
        if self.password.is_empty() {
            self.step = PaymentStep::Failed("Password is required.".to_string());
            return;
        }

        let password = std::mem::take(&mut self.password);
        self.step = PaymentStep::Sending;
        match send(self.request.clone(), password).await {
            Ok(receipt) => {
                log::debug!("[flows] payment sent: {}", receipt.signature);
                self.step = PaymentStep::Done(receipt);
            }
            Err(message) => {
                log::warn!("[flows] payment failed: {message}");
                self.step = PaymentStep::Failed(message);
            }
        }
    }

    /// Failed → Confirm, for another attempt without losing the request.
    pub fn retry(&mut self) {
        if matches!(self.step, PaymentStep::Failed(_)) {
            self.step = PaymentStep::Confirm;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedeemStep {
    /// Entering the presale code.
    EnterCode,
    /// Code checked out valid but needs a destination wallet address.
    AwaitWallet,
    /// Checked and ready to redeem.
    Ready,
    Done { success: bool },
}

/// Redeem-presale drawer state machine. Check/redeem outcomes are domain
/// results and land in `message` for inline rendering.
pub struct RedeemPresaleFlow {
    pub code: String,
    pub wallet_address: String,
    step: RedeemStep,
    code_type: Option<u32>,
    message: Option<String>,
}

impl Default for RedeemPresaleFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RedeemPresaleFlow {
    pub fn new() -> Self {
        Self {
            code: String::new(),
            wallet_address: String::new(),
            step: RedeemStep::EnterCode,
            code_type: None,
            message: None,
        }
    }

    pub fn step(&self) -> RedeemStep {
        self.step
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn code_type(&self) -> Option<u32> {
        self.code_type
    }

    /// Check the entered code. Invalid or already-redeemed codes leave the
    /// flow at code entry with the server's message shown inline.
    pub async fn check(&mut self, presale: &PresaleClient, token: Option<&str>) {
        let code = self.code.trim();
        if code.is_empty() {
            self.message = Some("Please enter a presale code.".to_string());
            return;
        }

        let outcome = presale.check(code, token).await;
        self.message = Some(outcome.message.clone());

        if !outcome.valid || outcome.redeemed {
            self.step = RedeemStep::EnterCode;
            return;
        }
        self.code_type = outcome.code_type;
        self.step = if outcome.needs_wallet_address() {
            RedeemStep::AwaitWallet
        } else {
            RedeemStep::Ready
        };
    }

    pub fn set_wallet_address(&mut self, address: impl Into<String>) {
        self.wallet_address = address.into();
        if self.step == RedeemStep::AwaitWallet && !self.wallet_address.trim().is_empty() {
            self.step = RedeemStep::Ready;
        }
    }

    /// Redeem the checked code. Wallet-bound codes refuse to submit without
    /// a destination address.
    pub async fn redeem(
        &mut self,
        presale: &PresaleClient,
        token: Option<&str>,
    ) -> Result<(), AuthRequired> {
        match self.step {
            RedeemStep::Ready => {}
            RedeemStep::AwaitWallet => {
                self.message =
                    Some("A destination wallet address is required for this code.".to_string());
                return Ok(());
            }
            _ => return Ok(()),
        }

        let wallet = match self.code_type {
            Some(crate::presale::WALLET_BOUND_CODE_TYPE) => {
                let address = self.wallet_address.trim();
                if address.is_empty() {
                    self.message = Some(
                        "A destination wallet address is required for this code.".to_string(),
                    );
                    self.step = RedeemStep::AwaitWallet;
                    return Ok(());
                }
                Some(address.to_string())
            }
            _ => None,
        };

        let RedeemOutcome { success, message } = presale
            .redeem(self.code.trim(), wallet.as_deref(), token)
            .await?;
        self.message = Some(message);
        self.step = RedeemStep::Done { success };
        Ok(())
    }
}
