use super::*;

/// Tests creating a session.
///
/// Verifies that the session carries the subject and attributes and expires exactly
/// one lifetime after creation.
///
/// Expected: a readable session with `expires_at = created_at + 24h`
#[tokio::test]
async fn creates_readable_session() {
    let clock = Arc::new(ManualClock::new());
    let sessions = store(&clock);

    let session = sessions
        .create("42", json!({ "id": "42", "username": "seller" }))
        .await;

    assert_eq!(session.subject_id, "42");
    assert_eq!(session.username(), "seller");
    assert_eq!(session.expires_at - session.created_at, Duration::hours(24));
    assert_eq!(sessions.get(&session.session_id).await, Some(session));
}

/// Tests that session identifiers are unique.
///
/// Expected: two sessions for the same user get different identifiers
#[tokio::test]
async fn issues_unique_identifiers() {
    let clock = Arc::new(ManualClock::new());
    let sessions = store(&clock);

    let first = sessions.create("42", json!({})).await;
    let second = sessions.create("42", json!({})).await;

    assert_ne!(first.session_id, second.session_id);
    assert_eq!(sessions.active_count().await, 2);
}
