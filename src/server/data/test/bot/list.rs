use super::*;

/// Tests that bots are listed from sub-directories in sorted order.
///
/// Verifies that bots with and without a registered port are both listed, that
/// plain files are ignored, and that the parent API's own directory is excluded.
///
/// Expected: sorted bot names without `parent_api` or files
#[tokio::test]
async fn lists_sorted_directories() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_tenant("zeta", MockService::new())
        .with_unported_bot("alpha")
        .with_unported_bot("parent_api")
        .with_raw_file("bots/notes.txt", "not a bot")
        .build()
        .await?;

    let directory = BotDirectory::new(&test.bots_dir, Arc::new(ManualClock::new()));
    let bots = directory.list().await;

    assert_eq!(*bots, vec!["alpha".to_string(), "zeta".to_string()]);

    Ok(())
}

/// Tests that the listing is cached for its TTL and refreshed afterwards.
///
/// Expected: a new directory appears only once five minutes have passed
#[tokio::test]
async fn caches_listing_for_ttl() -> Result<(), TestError> {
    let test = TestBuilder::new().with_unported_bot("alpha").build().await?;
    let clock = Arc::new(ManualClock::new());

    let directory = BotDirectory::new(&test.bots_dir, clock.clone());
    assert_eq!(directory.list().await.len(), 1);

    std::fs::create_dir(test.bots_dir.join("beta"))?;
    clock.advance(Duration::minutes(4));
    assert_eq!(directory.list().await.len(), 1);

    clock.advance(Duration::minutes(1));
    assert_eq!(directory.list().await.len(), 2);

    Ok(())
}

/// Tests an unreadable bots directory.
///
/// Expected: an empty list, and the directory is read again on the next call
#[tokio::test]
async fn missing_directory_yields_empty_list() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let root = test.root().join("missing");

    let directory = BotDirectory::new(&root, Arc::new(ManualClock::new()));
    assert!(directory.list().await.is_empty());

    std::fs::create_dir_all(root.join("alpha"))?;
    assert_eq!(*directory.list().await, vec!["alpha".to_string()]);

    Ok(())
}
