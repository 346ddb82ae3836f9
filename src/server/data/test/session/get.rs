use super::*;

/// Tests that a session expires exactly at the end of its lifetime.
///
/// Expected: visible one second before expiry, gone at expiry
#[tokio::test]
async fn hides_session_at_expiry() {
    let clock = Arc::new(ManualClock::new());
    let sessions = store(&clock);
    let session = sessions.create("42", json!({})).await;

    clock.advance(Duration::hours(24) - Duration::seconds(1));
    assert!(sessions.get(&session.session_id).await.is_some());

    clock.advance(Duration::seconds(1));
    assert!(sessions.get(&session.session_id).await.is_none());
    assert_eq!(sessions.active_count().await, 0);
}

/// Tests looking up unknown and deleted sessions.
///
/// Expected: None for both, and deleting twice reports false the second time
#[tokio::test]
async fn unknown_and_deleted_sessions_are_absent() {
    let clock = Arc::new(ManualClock::new());
    let sessions = store(&clock);
    let session = sessions.create("42", json!({})).await;

    assert!(sessions.get("not-a-session").await.is_none());

    assert!(sessions.delete(&session.session_id).await);
    assert!(!sessions.delete(&session.session_id).await);
    assert!(sessions.get(&session.session_id).await.is_none());
}
