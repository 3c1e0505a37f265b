//! armory-core - client-side domain state and drawer orchestration
//!
//! Headless core of a consumer wallet + inventory ("armory") client: the
//! per-domain item stores, the counts snapshot, wallet balances and
//! transaction history, referral and presale operations, the single-active
//! drawer controller with its typed content router, the aggregate summary
//! derivation, and the responsive navigation shell selection.
//!
//! ## Architecture
//!
//! Everything network-bound goes through one injected `ApiClient` over a
//! `Transport` seam, so the whole layer runs against a scripted transport in
//! tests. Stores are explicit instances owned by `AppState`, not globals;
//! each holds its collection plus `is_loading`/`error` flags and applies
//! synchronous state transitions when async calls complete. Overlapping
//! requests on one store are not serialized: the last response to resolve
//! wins.
//!
//! The visual layer, router framework, secure storage, and any transaction
//! signing live in the host application.

pub mod app;
pub mod client;
pub mod config;
pub mod content;
pub mod counts;
pub mod drawer;
pub mod error;
pub mod flows;
pub mod models;
pub mod nav;
pub mod presale;
pub mod referrals;
pub mod store;
pub mod summary;
pub mod toast;
pub mod wallet;
