use super::*;

/// Tests case-insensitive approval checks.
///
/// Expected: true for any casing of an approved domain, false for others
#[tokio::test]
async fn compares_case_insensitively() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_approved_domains(&["shop.example.com"])
        .build()
        .await?;

    let domains = ApprovedDomains::new(&test.domains_file, Arc::new(ManualClock::new()));

    assert!(domains.is_approved("SHOP.example.COM").await);
    assert!(!domains.is_approved("other.example.com").await);
    assert!(!domains.is_approved("").await);

    Ok(())
}

/// Tests that a corrupt file denies every domain.
///
/// Expected: false for a domain that would otherwise be approved
#[tokio::test]
async fn corrupt_file_denies_everything() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_raw_file("custom_domains.json", "[\"shop.example.com\"")
        .build()
        .await?;

    let domains = ApprovedDomains::new(&test.domains_file, Arc::new(ManualClock::new()));

    assert!(!domains.is_approved("shop.example.com").await);

    Ok(())
}
