use std::sync::Arc;

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use serde_json::json;
use test_utils::{
    builder::TestBuilder,
    context::TestContext,
    error::TestError,
    fixture,
    mock::{MockResponse, MockService},
};

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::auth::{AuthGuard, Permission},
    state::AppState,
    util::clock::{ManualClock, SystemClock},
};

mod require;
mod session;

fn state(test: &TestContext) -> AppState {
    AppState::for_test(test, Arc::new(SystemClock))
}

/// Headers carrying the session cookie of a freshly logged in user.
async fn login(state: &AppState, discord_id: &str) -> HeaderMap {
    let session = state
        .sessions
        .create(discord_id, fixture::discord::user(discord_id, "steve"))
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("theme=dark; session_id={}", session.session_id)).unwrap(),
    );
    headers
}

fn owned_by(owner: serde_json::Value) -> MockService {
    MockService::new().get("/bot/owner", MockResponse::json(owner))
}
