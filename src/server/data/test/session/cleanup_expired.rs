use super::*;

/// Tests the sweep of expired sessions.
///
/// Verifies that only sessions past their expiry are removed and that the sweep
/// reports how many it removed.
///
/// Expected: one removed, one still active
#[tokio::test]
async fn removes_only_expired_sessions() {
    let clock = Arc::new(ManualClock::new());
    let sessions = store(&clock);

    let old = sessions.create("1", json!({})).await;
    clock.advance(Duration::hours(12));
    let recent = sessions.create("2", json!({})).await;
    clock.advance(Duration::hours(12));

    assert_eq!(sessions.cleanup_expired().await, 1);
    assert!(sessions.get(&old.session_id).await.is_none());
    assert!(sessions.get(&recent.session_id).await.is_some());
    assert_eq!(sessions.cleanup_expired().await, 0);
}

/// Tests concurrent session creation.
///
/// Expected: every concurrently created session is stored
#[tokio::test]
async fn concurrent_creates_are_all_stored() {
    let clock = Arc::new(ManualClock::new());
    let sessions = store(&clock);

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..50 {
        let sessions = sessions.clone();
        tasks.spawn(async move { sessions.create(&i.to_string(), json!({})).await });
    }
    while tasks.join_next().await.is_some() {}

    assert_eq!(sessions.active_count().await, 50);
}
