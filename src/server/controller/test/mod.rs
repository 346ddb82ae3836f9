use std::sync::Arc;

use axum::{
    body::{to_bytes, Bytes},
    extract::{Path, Query, State},
    http::{
        header::{CONTENT_TYPE, COOKIE, HOST, LOCATION, ORIGIN, SET_COOKIE},
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use test_utils::{
    builder::TestBuilder,
    context::TestContext,
    error::TestError,
    fixture,
    mock::{MockResponse, MockService},
};

use crate::server::{state::AppState, util::clock::SystemClock};

mod auth;
mod domain;

fn state(test: &TestContext) -> AppState {
    AppState::for_test(test, Arc::new(SystemClock))
}

async fn login(state: &AppState, discord_id: &str) -> HeaderMap {
    let session = state
        .sessions
        .create(discord_id, fixture::discord::user(discord_id, "steve"))
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("session_id={}", session.session_id)).unwrap(),
    );
    headers
}

/// Renders a handler result into a response, errors included.
fn respond<T: IntoResponse>(result: Result<T, crate::server::error::AppError>) -> Response {
    match result {
        Ok(response) => response.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
