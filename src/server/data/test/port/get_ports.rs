use super::*;

/// Tests loading the ports file on first access.
///
/// Verifies that every registered tenant, live or dead, is present with the port
/// written by the builder.
///
/// Expected: Ok with both tenants mapped to their ports
#[tokio::test]
async fn loads_ports_from_file() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_tenant("alpha", MockService::new())
        .with_dead_tenant("beta")
        .build()
        .await?;

    let registry = PortRegistry::new(&test.ports_file, Arc::new(ManualClock::new()));
    let ports = registry.get_ports().await.unwrap();

    assert_eq!(ports.len(), 2);
    assert_eq!(ports.get("alpha").copied(), test.port("alpha"));
    assert_eq!(ports.get("beta").copied(), test.port("beta"));

    Ok(())
}

/// Tests that a snapshot is served from cache while it is fresh.
///
/// Verifies that rewriting the file within the TTL has no visible effect.
///
/// Expected: Ok with the originally loaded mapping
#[tokio::test]
async fn serves_cached_snapshot_within_ttl() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_raw_file("ports.json", r#"{"alpha": 9001}"#)
        .build()
        .await?;
    let clock = Arc::new(ManualClock::new());

    let registry = PortRegistry::new(&test.ports_file, clock.clone());
    registry.get_ports().await.unwrap();

    std::fs::write(&test.ports_file, r#"{"alpha": 9002}"#)?;
    clock.advance(Duration::seconds(299));

    let ports = registry.get_ports().await.unwrap();
    assert_eq!(ports.get("alpha"), Some(&9001));

    Ok(())
}

/// Tests that an expired snapshot is reloaded from disk.
///
/// Expected: Ok with the rewritten mapping once the TTL has elapsed
#[tokio::test]
async fn reloads_after_ttl() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_raw_file("ports.json", r#"{"alpha": 9001}"#)
        .build()
        .await?;
    let clock = Arc::new(ManualClock::new());

    let registry = PortRegistry::new(&test.ports_file, clock.clone());
    registry.get_ports().await.unwrap();

    std::fs::write(&test.ports_file, r#"{"alpha": 9002, "beta": 9003}"#)?;
    clock.advance(Duration::seconds(300));

    let ports = registry.get_ports().await.unwrap();
    assert_eq!(ports.get("alpha"), Some(&9002));
    assert_eq!(ports.len(), 2);

    Ok(())
}

/// Tests a missing ports file with nothing loaded before.
///
/// Expected: Err(ConfigError::Unavailable)
#[tokio::test]
async fn fails_when_file_missing_and_nothing_cached() -> Result<(), TestError> {
    let test = TestBuilder::new().without_ports_file().build().await?;

    let registry = PortRegistry::new(&test.ports_file, Arc::new(ManualClock::new()));
    let result = registry.get_ports().await;

    assert!(matches!(result, Err(ConfigError::Unavailable { .. })));

    Ok(())
}

/// Tests that a corrupt file after a successful load falls back to the old snapshot.
///
/// Expected: Ok with the previous mapping, and the file is retried on the next call
#[tokio::test]
async fn keeps_stale_snapshot_when_reload_fails() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_raw_file("ports.json", r#"{"alpha": 9001}"#)
        .build()
        .await?;
    let clock = Arc::new(ManualClock::new());

    let registry = PortRegistry::new(&test.ports_file, clock.clone());
    registry.get_ports().await.unwrap();

    std::fs::write(&test.ports_file, "{not json")?;
    clock.advance(Duration::seconds(301));

    let ports = registry.get_ports().await.unwrap();
    assert_eq!(ports.get("alpha"), Some(&9001));

    std::fs::write(&test.ports_file, r#"{"alpha": 9005}"#)?;
    let ports = registry.get_ports().await.unwrap();
    assert_eq!(ports.get("alpha"), Some(&9005));

    Ok(())
}

/// Tests that a file which is not a name to port object is rejected.
///
/// Expected: Err(ConfigError::Unavailable)
#[tokio::test]
async fn rejects_non_object_file() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_raw_file("ports.json", r#"["alpha"]"#)
        .build()
        .await?;

    let registry = PortRegistry::new(&test.ports_file, Arc::new(ManualClock::new()));

    assert!(registry.get_ports().await.is_err());

    Ok(())
}
