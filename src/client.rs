//! Thin REST client wrapper over the external armory API.
//!
//! `ApiClient` describes requests as data (`ApiRequest`) and hands them to a
//! `Transport`. Production uses `HttpTransport` over a process-shared
//! `reqwest::Client`; tests inject a scripted transport so store semantics
//! can be exercised without a network.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

/// A fully described API request: method, path relative to the configured
/// base URL, optional bearer token, optional JSON body, query params.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub token: Option<String>,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            token: None,
            body: None,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Seam between the stores and the wire. Implementations return the decoded
/// JSON body (`Value::Null` for empty/204 responses) or a typed `ApiError`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: &ApiRequest) -> Result<Value, ApiError>;
}

/// Production transport over the shared `reqwest` client.
pub struct HttpTransport {
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, req: &ApiRequest) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, req.path);

        let mut builder = match req.method {
            Method::Get => http_client().get(&url),
            Method::Post => http_client().post(&url),
            Method::Patch => http_client().patch(&url),
            Method::Put => http_client().put(&url),
            Method::Delete => http_client().delete(&url),
        }
        .timeout(self.timeout);

        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }
        if let Some(token) = &req.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
            log::debug!("[client] {} {} (authenticated)", req.method, req.path);
        } else {
            log::debug!("[client] {} {} (public)", req.method, req.path);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Servers report failures as {"error": "..."}; fall back to the
            // raw body when the shape doesn't match.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| {
                    if text.is_empty() {
                        format!("request failed with status {}", status.as_u16())
                    } else {
                        text
                    }
                });
            log::warn!(
                "[client] {} {} failed: {} {}",
                req.method,
                req.path,
                status.as_u16(),
                message
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        // 204 No Content and empty bodies decode as null.
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// The typed client every store is constructed with.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Convenience constructor for the production HTTP transport.
    pub fn http(base_url: &str, timeout: Duration) -> Self {
        Self::new(Arc::new(HttpTransport::new(base_url, timeout)))
    }

    /// Send a request and decode the JSON body into `T`.
    pub async fn request<T: DeserializeOwned>(&self, req: ApiRequest) -> Result<T, ApiError> {
        let value = self.transport.send(&req).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request whose response body is irrelevant (deletes, 204s).
    pub async fn request_unit(&self, req: ApiRequest) -> Result<(), ApiError> {
        self.transport.send(&req).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_accumulates_fields() {
        let req = ApiRequest::get("/gear")
            .with_token("tok")
            .with_query("limit", 10);
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/gear");
        assert_eq!(req.token.as_deref(), Some("tok"));
        assert_eq!(req.query, vec![("limit".to_string(), "10".to_string())]);
        assert!(req.body.is_none());
    }

    #[test]
    fn http_transport_strips_trailing_slash() {
        let t = HttpTransport::new("https://api.example.com/", Duration::from_secs(8));
        assert_eq!(t.base_url, "https://api.example.com");
    }
}
