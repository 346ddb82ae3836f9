//! Query parameters and body helpers shared by controllers.

use axum::body::Bytes;
use serde::Deserialize;
use serde_json::Value;

use crate::server::{
    error::{auth::AuthError, AppError},
    state::AppState,
};

/// Optional `api_key` query parameter guarding administrative endpoints.
#[derive(Deserialize)]
pub struct ApiKeyParam {
    pub api_key: Option<String>,
}

/// Parses an inbound body as JSON.
///
/// Handlers take the raw body so that a malformed payload is reported as a 400 with
/// the same `{"error": ...}` shape as every other validation failure.
pub fn json_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body)
        .map_err(|_| AppError::BadRequest("Invalid JSON in request body".to_string()))
}

/// Checks the `api_key` of an administrative request against the configured key.
///
/// An unset `API_KEY` rejects every request.
pub fn require_api_key(state: &AppState, api_key: Option<&str>) -> Result<(), AppError> {
    let expected = state.config.api_key.as_str();

    match api_key {
        Some(key) if !expected.is_empty() && key == expected => Ok(()),
        _ => Err(AuthError::InvalidApiKey.into()),
    }
}
