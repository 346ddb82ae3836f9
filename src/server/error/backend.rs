use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Classified failure of a single call to a tenant service.
///
/// Produced by `BackendClient` instead of a transport error so that callers, and the
/// fan-out aggregation in particular, always receive a value they can inspect.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendFailure {
    /// The tenant answered with a non-200 status.
    ///
    /// `body` holds the JSON error body, or `{"error": "Unknown error"}` when the
    /// tenant did not answer with JSON.
    #[error("Backend answered with status {status}")]
    Rejected { status: u16, body: Value },

    /// Nothing is listening on the tenant's port.
    #[error("Bot is not responding")]
    Unreachable,

    /// The call did not complete within its timeout.
    #[error("Request timed out")]
    Timeout,

    /// Any other failure, including a 200 answer whose body is not JSON.
    #[error("Request failed: {0}")]
    Failed(String),
}

impl BackendFailure {
    /// Renders the failure as the JSON payload exposed to callers.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Rejected { body, .. } => body.clone(),
            other => json!({ "error": other.to_string() }),
        }
    }

    /// The `error` message of the failure payload.
    pub fn message(&self) -> String {
        self.to_json()
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string()
    }

    /// The `detail` message of the failure payload, falling back to `error`.
    pub fn detail(&self) -> String {
        match self.to_json().get("detail").and_then(Value::as_str) {
            Some(detail) => detail.to_string(),
            None => self.message(),
        }
    }
}

/// A tenant call made on behalf of an inbound request failed.
#[derive(Error, Debug)]
#[error("Failed to {action} on bot '{bot}': {failure}")]
pub struct BackendError {
    /// Tenant the call was addressed to.
    pub bot: String,
    /// Human readable description of the forwarded operation, e.g. `fetch stats`.
    pub action: &'static str,
    pub failure: BackendFailure,
}

impl BackendError {
    pub fn new(bot: impl Into<String>, action: &'static str, failure: BackendFailure) -> Self {
        Self {
            bot: bot.into(),
            action,
            failure,
        }
    }
}

/// Converts tenant call failures into HTTP responses.
///
/// # Returns
/// - 503 Service Unavailable - Tenant not listening or timed out
/// - 500 Internal Server Error - Tenant answered with an error or garbage
impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        dioxus_logger::tracing::warn!("{}", self);

        let (status, error) = match &self.failure {
            BackendFailure::Unreachable => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Bot '{}' is not responding", self.bot),
            ),
            BackendFailure::Timeout => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Bot '{}' timed out", self.bot),
            ),
            failure => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {}: {}", self.action, failure.detail()),
            ),
        };

        (status, Json(ErrorDto { error })).into_response()
    }
}
