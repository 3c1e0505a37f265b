//! Scripted transport shared by the integration tests.
//!
//! Responses are consumed in request-arrival order. A response may carry a
//! `Notify` gate; the transport records the request, then parks until the
//! test releases the gate, which makes response-ordering races fully
//! deterministic.

#![allow(dead_code)] // not every test file uses every helper

use armory_core::client::{ApiRequest, Transport};
use armory_core::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

struct Scripted {
    result: Result<Value, ApiError>,
    gate: Option<Arc<Notify>>,
}

#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response for the next unclaimed request.
    pub fn respond(&self, result: Result<Value, ApiError>) {
        self.script.lock().unwrap().push_back(Scripted { result, gate: None });
    }

    /// Queue a response that is withheld until `gate` is notified.
    pub fn respond_gated(&self, result: Result<Value, ApiError>, gate: Arc<Notify>) {
        self.script.lock().unwrap().push_back(Scripted {
            result,
            gate: Some(gate),
        });
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, req: &ApiRequest) -> Result<Value, ApiError> {
        self.seen.lock().unwrap().push(req.clone());
        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted request: {} {}", req.method, req.path));
        if let Some(gate) = scripted.gate {
            gate.notified().await;
        }
        scripted.result
    }
}

/// Minimal gear record JSON the way the server ships it.
pub fn gear_json(id: i64, name: &str, price: f64, quantity: i64) -> Value {
    serde_json::json!({
        "id": id,
        "owner_user_id": 1,
        "name": name,
        "type": "armor",
        "quantity": quantity,
        "purchasePrice": price
    })
}
