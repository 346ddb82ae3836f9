use super::*;
use crate::server::controller::domain::{check_domain, custom_bot_name, CheckDomainParams};

fn check(domain: Option<&str>) -> Query<CheckDomainParams> {
    Query(CheckDomainParams {
        domain: domain.map(str::to_string),
    })
}

/// Tests the certificate gate for an approved domain.
///
/// Expected: 200 with a plain-text confirmation
#[tokio::test]
async fn approves_listed_domain() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_approved_domains(&["shop.example.com"])
        .build()
        .await?;

    let response = respond(check_domain(State(state(&test)), check(Some("Shop.Example.com"))).await);

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Domain is approved.");

    Ok(())
}

/// Tests the certificate gate for other domains.
///
/// Expected: 403 for an unlisted domain, 400 without a domain
#[tokio::test]
async fn denies_unlisted_domain() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_approved_domains(&["shop.example.com"])
        .build()
        .await?;

    let response = respond(check_domain(State(state(&test)), check(Some("evil.example.com"))).await);
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Domain is not authorized for this service." })
    );

    let response = respond(check_domain(State(state(&test)), check(None)).await);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Tests the certificate gate without an approved domains file.
///
/// Expected: 403 for every domain
#[tokio::test]
async fn denies_all_without_domains_file() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;

    let response = respond(check_domain(State(state(&test)), check(Some("shop.example.com"))).await);

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

fn origin(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ORIGIN, HeaderValue::from_static(value));
    headers
}

/// Tests naming the bot behind a custom domain.
///
/// Expected: 200 with the bot name
#[tokio::test]
async fn names_bot_for_custom_origin() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_tenant(
            "alpha",
            MockService::new().get(
                "/api/domain",
                MockResponse::json(fixture::tenant::domain("shop.example.com")),
            ),
        )
        .build()
        .await?;

    let response = respond(
        custom_bot_name(State(state(&test)), origin("https://shop.example.com")).await,
    );

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "name": "alpha" }));

    Ok(())
}

/// Tests platform and unclaimed origins.
///
/// Expected: 404 with the matching message
#[tokio::test]
async fn no_bot_for_platform_or_unclaimed_origin() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;

    let response = respond(custom_bot_name(State(state(&test)), origin("https://v2.noemt.dev")).await);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "This endpoint is only available for custom domains." })
    );

    let response = respond(custom_bot_name(State(state(&test)), HeaderMap::new()).await);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = respond(
        custom_bot_name(State(state(&test)), origin("https://unknown.example.com")).await,
    );
    assert_eq!(
        body_json(response).await,
        json!({ "error": "No bot found for domain 'unknown.example.com'." })
    );

    Ok(())
}
