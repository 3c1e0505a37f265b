//! Error taxonomy for the armory client core.
//!
//! Three classes, kept deliberately distinct:
//! - precondition errors (`AuthRequired`) are raised client-side before any
//!   network activity and never recorded in store state;
//! - transport/HTTP errors (`ApiError`) are normalized into a store's
//!   `error` string and never propagate past the store boundary;
//! - domain-logic results inside 2xx bodies (presale check/redeem) are plain
//!   values, not errors, and live in `presale`.

use thiserror::Error;

/// Missing authentication token, detected before any network call.
///
/// Distinct from a server-side 401 so callers can tell "you never logged in"
/// apart from "the server rejected you".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("authentication token not provided")]
pub struct AuthRequired;

/// Transport and HTTP failures from the REST client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx response; `message` is the server's `{"error": ...}` body
    /// when parseable, the raw body text otherwise.
    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, DNS, or timeout failure before any status was received.
    #[error("network error: {0}")]
    Network(String),

    /// 2xx response whose body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}
