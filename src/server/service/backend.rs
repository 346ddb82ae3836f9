//! HTTP calls to a single tenant service.
//!
//! Every tenant exposes a private HTTP API on a local port. Calls carry the internal
//! shared secret as an `api_key` query parameter and always resolve to a
//! `Result<Value, BackendFailure>`; transport errors never escape this module.

use std::time::Duration;

use dioxus_logger::tracing;
use reqwest::{header::CONTENT_TYPE, Method, StatusCode};
use serde_json::{json, Value};
use url::Url;

use crate::server::{error::backend::BackendFailure, util::limit::OutboundLimiter};

/// Timeout of ordinary tenant calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout of lookup probes sent to every tenant.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one tenant call.
pub type BackendResult = Result<Value, BackendFailure>;

/// Splits a call outcome into the `(ok, data)` pair exposed to callers.
///
/// Failures are rendered as their JSON error payload.
pub fn into_parts(result: BackendResult) -> (bool, Value) {
    match result {
        Ok(data) => (true, data),
        Err(failure) => (false, failure.to_json()),
    }
}

/// Client for the tenant services' private HTTP API.
///
/// Cheap to clone; clones share the connection pool and the in-flight limits.
#[derive(Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    host: String,
    api_key: String,
    limiter: OutboundLimiter,
}

impl BackendClient {
    /// Creates a client.
    ///
    /// # Arguments
    /// - `http_client` - Pooled HTTP client shared with the rest of the application
    /// - `host` - Host the tenant services listen on
    /// - `api_key` - Internal shared secret appended to every call
    /// - `limiter` - Caps on concurrent calls, shared with the storefront proxy
    pub fn new(
        http_client: reqwest::Client,
        host: impl Into<String>,
        api_key: impl Into<String>,
        limiter: OutboundLimiter,
    ) -> Self {
        Self {
            http_client,
            host: host.into(),
            api_key: api_key.into(),
            limiter,
        }
    }

    /// Builds the URL of `path` on the tenant listening on `port`.
    ///
    /// `path` may already carry a query string; the `api_key` parameter is appended
    /// to it.
    pub fn url(&self, port: u16, path: &str) -> Result<Url, BackendFailure> {
        let mut url = Url::parse(&format!("http://{}:{}{}", self.host, port, path))
            .map_err(|e| BackendFailure::Failed(format!("invalid URL: {}", e)))?;

        url.query_pairs_mut().append_pair("api_key", &self.api_key);

        Ok(url)
    }

    /// Sends one request to a tenant.
    ///
    /// A body, when given, is sent as JSON. Non-200 answers are reported with their JSON
    /// error body, or `{"error": "Unknown error"}` when the tenant did not answer JSON.
    ///
    /// `timeout` covers the whole call: waiting for an in-flight slot, sending, and
    /// reading the body.
    ///
    /// # Arguments
    /// - `port` - Local port of the tenant
    /// - `path` - Absolute path, optionally with a query string
    /// - `method` - HTTP method
    /// - `timeout` - Total time allowed for the call, queueing included
    /// - `body` - Optional JSON body
    ///
    /// # Returns
    /// - `Ok(Value)` - 200 answer with a JSON body
    /// - `Err(BackendFailure::Rejected)` - Tenant answered with another status
    /// - `Err(BackendFailure::Unreachable)` - Nothing listening on the port
    /// - `Err(BackendFailure::Timeout)` - No answer within `timeout`
    /// - `Err(BackendFailure::Failed)` - Any other failure, including invalid JSON
    pub async fn request(
        &self,
        port: u16,
        path: &str,
        method: Method,
        timeout: Duration,
        body: Option<&Value>,
    ) -> BackendResult {
        let url = self.url(port, path)?;
        let authority = format!("{}:{}", self.host, port);

        let call = async {
            let _permit = match self.limiter.acquire(&authority).await {
                Ok(permit) => permit,
                Err(e) => return Err(BackendFailure::Failed(e.to_string())),
            };

            let mut request = self.http_client.request(method.clone(), url);
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => read_response(response).await,
                Err(e) => Err(classify(e)),
            }
        };

        let result = tokio::time::timeout(timeout, call)
            .await
            .unwrap_or(Err(BackendFailure::Timeout));

        if let Err(failure) = &result {
            tracing::debug!("{} {} on port {} failed: {}", method, path, port, failure);
        }

        result
    }

    /// `GET path` with the default timeout.
    pub async fn get(&self, port: u16, path: &str) -> BackendResult {
        self.request(port, path, Method::GET, DEFAULT_TIMEOUT, None)
            .await
    }

    /// `POST path` with a JSON body and the default timeout.
    pub async fn post(&self, port: u16, path: &str, body: &Value) -> BackendResult {
        self.request(port, path, Method::POST, DEFAULT_TIMEOUT, Some(body))
            .await
    }
}

async fn read_response(response: reqwest::Response) -> BackendResult {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    let bytes = response.bytes().await.map_err(classify)?;

    if status == StatusCode::OK {
        return serde_json::from_slice(&bytes)
            .map_err(|e| BackendFailure::Failed(format!("invalid JSON body: {}", e)));
    }

    let body = if is_json {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({ "error": "Unknown error" }))
    } else {
        json!({ "error": "Unknown error" })
    };

    Err(BackendFailure::Rejected {
        status: status.as_u16(),
        body,
    })
}

fn classify(error: reqwest::Error) -> BackendFailure {
    if error.is_timeout() {
        BackendFailure::Timeout
    } else if error.is_connect() {
        BackendFailure::Unreachable
    } else {
        BackendFailure::Failed(error.to_string())
    }
}
