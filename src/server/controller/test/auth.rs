use base64::{engine::general_purpose::STANDARD, Engine};

use super::*;
use crate::server::controller::auth::{
    callback, login as login_handler, logout, me, session_stats, token, CallbackParams,
    LoginParams,
};

fn discord() -> MockService {
    MockService::new()
        .post(
            "/api/oauth2/token",
            MockResponse::json(json!({
                "access_token": "discord-token",
                "token_type": "Bearer",
                "expires_in": 604800,
            })),
        )
        .get(
            "/api/users/@me",
            MockResponse::json(fixture::discord::user("42", "steve")),
        )
}

/// Tests the redirect to Discord.
///
/// Expected: 307 to the authorize URL carrying the return page as `state`
#[tokio::test]
async fn login_redirects_to_discord() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;

    let response = login_handler(
        State(state(&test)),
        Query(LoginParams {
            redirect_url: Some("/transcript/alpha/7".to_string()),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let url = url::Url::parse(location(&response)).unwrap();
    assert_eq!(url.path(), "/oauth2/authorize");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("state".to_string(), "/transcript/alpha/7".to_string())));
    assert!(pairs.contains(&("scope".to_string(), "identify".to_string())));
    assert!(pairs.contains(&("client_id".to_string(), "client".to_string())));

    Ok(())
}

/// Tests a callback without an authorization code.
///
/// Expected: 400
#[tokio::test]
async fn callback_requires_code() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;

    let response = respond(
        callback(
            State(state(&test)),
            Query(CallbackParams {
                code: None,
                state: None,
            }),
        )
        .await,
    );

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Missing authorization code" })
    );

    Ok(())
}

/// Tests a complete login against a mock Discord.
///
/// Expected: a session for the Discord user, the cookie set, and a redirect to `state`
#[tokio::test]
async fn callback_creates_session() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let discord = discord().spawn().await?;

    let mut config = AppState::test_config(&test);
    config.discord_token_url = format!("http://127.0.0.1:{}/api/oauth2/token", discord.port);
    config.discord_user_url = format!("http://127.0.0.1:{}/api/users/@me", discord.port);
    let state = AppState::from_test_config(config, Arc::new(SystemClock));

    let response = respond(
        callback(
            State(state.clone()),
            Query(CallbackParams {
                code: Some("abc".to_string()),
                state: Some("https://v2.noemt.dev/dashboard".to_string()),
            }),
        )
        .await,
    );

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "https://v2.noemt.dev/dashboard");

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session_id="));
    assert!(cookie.contains("Domain=noemt.dev") || cookie.contains("Domain=.noemt.dev"));
    assert_eq!(state.sessions.active_count().await, 1);

    let user_request = &discord.requests_to("/api/users/@me")[0];
    assert_eq!(
        user_request.headers.get("authorization").unwrap(),
        "Bearer discord-token"
    );

    Ok(())
}

/// Tests a callback whose code Discord rejects.
///
/// Expected: 400 and no session
#[tokio::test]
async fn callback_with_rejected_code() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let discord = MockService::new()
        .post(
            "/api/oauth2/token",
            MockResponse::json(json!({ "error": "invalid_grant" })).status(400),
        )
        .spawn()
        .await?;

    let mut config = AppState::test_config(&test);
    config.discord_token_url = format!("http://127.0.0.1:{}/api/oauth2/token", discord.port);
    let state = AppState::from_test_config(config, Arc::new(SystemClock));

    let response = respond(
        callback(
            State(state.clone()),
            Query(CallbackParams {
                code: Some("expired".to_string()),
                state: None,
            }),
        )
        .await,
    );

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.sessions.active_count().await, 0);

    Ok(())
}

/// Tests the current user endpoint.
///
/// Expected: 200 with the Discord profile, 401 without a session
#[tokio::test]
async fn me_returns_profile() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let response = respond(me(State(state.clone()), headers).await);
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["discord_id"], "42");

    let response = respond(me(State(state), HeaderMap::new()).await);
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Tests the cache token.
///
/// Expected: base64 JSON naming the session, expiring with it
#[tokio::test]
async fn token_encodes_session() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let response = respond(token(State(state), headers).await);
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let decoded = STANDARD
        .decode(body["cache_token"].as_str().unwrap())
        .unwrap();
    let payload: Value = serde_json::from_slice(&decoded).unwrap();

    assert_eq!(payload["discord_id"], "42");
    assert_eq!(payload["expires_at"], body["expires_at"]);
    assert!(payload["session_id"].as_str().is_some_and(|id| !id.is_empty()));

    Ok(())
}

/// Tests logging out.
///
/// Expected: session removed, cookie cleared, redirect to `/`
#[tokio::test]
async fn logout_clears_session() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let response = logout(State(state.clone()), headers).await.into_response();

    assert_eq!(location(&response), "/");
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("session_id="));
    assert_eq!(state.sessions.active_count().await, 0);

    Ok(())
}

/// Tests session statistics.
///
/// Expected: active count and the configured lifetime in hours
#[tokio::test]
async fn reports_session_stats() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state = state(&test);
    login(&state, "1").await;
    login(&state, "2").await;

    let response = session_stats(State(state)).await.into_response();

    assert_eq!(
        body_json(response).await,
        json!({ "active_sessions": 2, "session_lifetime_hours": 24.0 })
    );

    Ok(())
}
