use super::*;

/// Tests loading and lower-casing the approved domains.
///
/// Expected: every entry present in lower case
#[tokio::test]
async fn loads_lowercased_domains() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_approved_domains(&["Shop.Example.com", "store.test"])
        .build()
        .await?;

    let domains = ApprovedDomains::new(&test.domains_file, Arc::new(ManualClock::new()));
    let loaded = domains.load();

    assert_eq!(loaded.len(), 2);
    assert!(loaded.contains("shop.example.com"));
    assert!(loaded.contains("store.test"));

    Ok(())
}

/// Tests that a file which is not a list fails closed.
///
/// Expected: an empty set
#[tokio::test]
async fn non_list_file_fails_closed() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_raw_file("custom_domains.json", r#"{"shop.example.com": true}"#)
        .build()
        .await?;

    let domains = ApprovedDomains::new(&test.domains_file, Arc::new(ManualClock::new()));

    assert!(domains.load().is_empty());

    Ok(())
}

/// Tests that a missing file fails closed and is retried on the next call.
///
/// Expected: an empty set, then the domains once the file exists
#[tokio::test]
async fn missing_file_fails_closed_and_retries() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;

    let domains = ApprovedDomains::new(&test.domains_file, Arc::new(ManualClock::new()));
    assert!(domains.load().is_empty());

    std::fs::write(&test.domains_file, r#"["shop.example.com"]"#)?;
    assert!(domains.load().contains("shop.example.com"));

    Ok(())
}

/// Tests that the set is cached for twenty seconds.
///
/// Expected: removal of a domain is visible only after the TTL
#[tokio::test]
async fn caches_for_twenty_seconds() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_approved_domains(&["shop.example.com"])
        .build()
        .await?;
    let clock = Arc::new(ManualClock::new());

    let domains = ApprovedDomains::new(&test.domains_file, clock.clone());
    assert!(domains.is_approved("shop.example.com").await);

    std::fs::write(&test.domains_file, "[]")?;
    clock.advance(Duration::seconds(19));
    assert!(domains.is_approved("shop.example.com").await);

    clock.advance(Duration::seconds(1));
    assert!(!domains.is_approved("shop.example.com").await);

    Ok(())
}

/// Tests the refresh used on the request path, which reads on the blocking pool.
///
/// Expected: empty while the file is missing, then the same set `load` returns
#[tokio::test]
async fn async_load_reads_off_the_runtime() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let clock = Arc::new(ManualClock::new());

    let domains = ApprovedDomains::new(&test.domains_file, clock.clone());
    assert!(domains.load_async().await.is_empty());

    std::fs::write(&test.domains_file, r#"["Shop.Example.com"]"#)?;
    let loaded = domains.load_async().await;

    assert!(loaded.contains("shop.example.com"));
    assert_eq!(loaded, domains.load());

    Ok(())
}
