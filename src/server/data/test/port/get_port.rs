use super::*;

/// Tests port lookups for registered and unknown tenants.
///
/// Expected: Some(port) for a registered tenant, None otherwise
#[tokio::test]
async fn returns_port_for_known_tenant_only() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_raw_file("ports.json", r#"{"alpha": 9001}"#)
        .build()
        .await?;

    let registry = PortRegistry::new(&test.ports_file, Arc::new(ManualClock::new()));

    assert_eq!(registry.get_port("alpha").await.unwrap(), Some(9001));
    assert_eq!(registry.get_port("ghost").await.unwrap(), None);

    Ok(())
}
