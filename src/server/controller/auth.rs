use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use dioxus_logger::tracing;
use serde::Deserialize;
use serde_json::json;

use crate::{
    model::{
        api::ErrorDto,
        auth::{CacheTokenDto, CurrentUserDto, SessionStatsDto},
    },
    server::{
        error::AppError,
        middleware::{
            auth::AuthGuard,
            session::{login_cookie, removal_cookie, SessionCookie},
        },
        service::oauth::DiscordAuthService,
        state::AppState,
    },
};

/// Tag for grouping authentication endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

#[derive(Deserialize)]
pub struct LoginParams {
    /// Page to return to once logged in.
    pub redirect_url: Option<String>,
}

/// Query parameters for the OAuth callback endpoint.
///
/// # Fields
/// - `code` - Authorization code used to exchange for access tokens
/// - `state` - Page to return to, as passed to the login endpoint
#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Starts the Discord login flow.
///
/// Redirects to Discord's authorize page. `redirect_url` travels through Discord as
/// the OAuth `state` and is where the callback sends the user afterwards.
#[utoipa::path(
    get,
    path = "/auth/discord/login",
    tag = AUTH_TAG,
    params(
        ("redirect_url" = Option<String>, Query, description = "Page to return to after login")
    ),
    responses(
        (status = 307, description = "Redirect to the Discord authorize page")
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> impl IntoResponse {
    let auth_service = DiscordAuthService::new(
        &state.oauth_client,
        &state.http_client,
        &state.config.discord_user_url,
    );

    let url = auth_service.login_url(params.redirect_url);

    Redirect::temporary(url.as_str())
}

/// Completes the Discord login flow.
///
/// Exchanges the authorization code, creates a session for the Discord user and sets
/// the `session_id` cookie before redirecting to `state`, or `/` when absent.
///
/// # Returns
/// - `307 Temporary Redirect` - Logged in, cookie set
/// - `400 Bad Request` - Missing code, or Discord rejected the exchange
#[utoipa::path(
    get,
    path = "/auth/discord/callback",
    tag = AUTH_TAG,
    params(
        ("code" = String, Query, description = "Authorization code issued by Discord"),
        ("state" = Option<String>, Query, description = "Page to return to")
    ),
    responses(
        (status = 307, description = "Session created, redirect to the requested page"),
        (status = 400, description = "Missing or rejected authorization code", body = ErrorDto)
    ),
)]
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, AppError> {
    let Some(code) = params.code.filter(|code| !code.is_empty()) else {
        return Err(AppError::BadRequest(
            "Missing authorization code".to_string(),
        ));
    };

    let auth_service = DiscordAuthService::new(
        &state.oauth_client,
        &state.http_client,
        &state.config.discord_user_url,
    );

    let login = auth_service.callback(code).await?;
    let session = state
        .sessions
        .create(&login.discord_id, login.user_info)
        .await;

    let redirect_url = params
        .state
        .filter(|state| !state.is_empty())
        .unwrap_or_else(|| "/".to_string());

    let cookie = login_cookie(
        &session.session_id,
        &redirect_url,
        state.sessions.lifetime(),
        &state.config.cookie_domain,
    );

    tracing::info!(
        "Set session cookie for user {} with domain: {}",
        session.subject_id,
        cookie.domain().unwrap_or("None")
    );

    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Redirect::temporary(&redirect_url),
    ))
}

/// Logs the user out.
///
/// Deletes the session named by the cookie, if any, clears the cookie and redirects
/// to `/`.
#[utoipa::path(
    get,
    path = "/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Session deleted, redirect to /")
    ),
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(session_id) = SessionCookie::new(&headers).session_id() {
        state.sessions.delete(&session_id).await;
    }

    (
        [(SET_COOKIE, removal_cookie().to_string())],
        Redirect::temporary("/"),
    )
}

/// Returns the user behind the current session.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "The authenticated user", body = CurrentUserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto)
    ),
)]
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let session = AuthGuard::new(&state, &headers).require(&[]).await?;

    Ok((StatusCode::OK, Json(session.into_dto())))
}

/// Issues a cache token for the current session.
///
/// The token is the base64 encoded JSON `{session_id, discord_id, expires_at}`; the
/// storefront keeps it client-side to avoid calling `/auth/me` on every page.
#[utoipa::path(
    get,
    path = "/auth/token",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Cache token for the session", body = CacheTokenDto),
        (status = 401, description = "User not authenticated", body = ErrorDto)
    ),
)]
pub async fn token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let session = AuthGuard::new(&state, &headers).require(&[]).await?;

    let expires_at = session.expires_at.to_rfc3339();
    let payload = json!({
        "session_id": session.session_id,
        "discord_id": session.subject_id,
        "expires_at": expires_at,
    });

    let dto = CacheTokenDto {
        cache_token: STANDARD.encode(payload.to_string()),
        discord_id: session.subject_id,
        expires_at,
    };

    Ok((StatusCode::OK, Json(dto)))
}

/// Number of active sessions and the configured lifetime.
#[utoipa::path(
    get,
    path = "/auth/sessions/stats",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Session statistics", body = SessionStatsDto)
    ),
)]
pub async fn session_stats(State(state): State<AppState>) -> impl IntoResponse {
    let dto = SessionStatsDto {
        active_sessions: state.sessions.active_count().await,
        session_lifetime_hours: state.sessions.lifetime().num_seconds() as f64 / 3600.0,
    };

    (StatusCode::OK, Json(dto))
}
