use chrono::Duration;

use super::*;

/// Tests resolving the session named by the cookie.
///
/// Expected: Some(Session) for the logged in user
#[tokio::test]
async fn finds_session_from_cookie() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let session = AuthGuard::new(&state, &headers).session().await.unwrap();

    assert_eq!(session.subject_id, "42");
    assert_eq!(session.username(), "steve");

    Ok(())
}

/// Tests requests without a cookie or with an unknown session ID.
///
/// Expected: None
#[tokio::test]
async fn no_session_without_valid_cookie() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state = state(&test);

    assert!(AuthGuard::new(&state, &HeaderMap::new()).session().await.is_none());

    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static("session_id=unknown"));
    assert!(AuthGuard::new(&state, &headers).session().await.is_none());

    Ok(())
}

/// Tests that an expired session is no longer honoured.
///
/// Expected: None once the lifetime has elapsed
#[tokio::test]
async fn expired_session_is_ignored() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let clock = Arc::new(ManualClock::new());
    let state = AppState::for_test(&test, clock.clone());
    let headers = login(&state, "42").await;

    clock.advance(Duration::hours(24) + Duration::seconds(1));

    assert!(AuthGuard::new(&state, &headers).session().await.is_none());

    Ok(())
}
