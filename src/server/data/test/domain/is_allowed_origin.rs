use super::*;

/// Tests CORS origin checks against platform and custom domain origins.
///
/// Expected: platform origins and `https://` approved domains are allowed
#[tokio::test]
async fn allows_platform_and_approved_origins() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_approved_domains(&["shop.example.com"])
        .build()
        .await?;

    let domains = ApprovedDomains::new(&test.domains_file, Arc::new(ManualClock::new()));

    assert!(domains.is_allowed_origin("https://v2.noemt.dev"));
    assert!(domains.is_allowed_origin("http://localhost:3000"));
    assert!(domains.is_allowed_origin("https://shop.example.com"));
    assert!(!domains.is_allowed_origin("http://shop.example.com"));
    assert!(!domains.is_allowed_origin("https://evil.example.com"));
    assert!(domains.is_allowed_origin("https://dashboard.noemt.dev"));

    Ok(())
}
