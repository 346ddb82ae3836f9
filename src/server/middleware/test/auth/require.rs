use super::*;

/// Tests an anonymous request.
///
/// Expected: Err(AuthError::Unauthenticated)
#[tokio::test]
async fn requires_session() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state = state(&test);
    let headers = HeaderMap::new();

    let result = AuthGuard::new(&state, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::Unauthenticated))
    ));

    Ok(())
}

/// Tests that a session alone satisfies an empty permission list.
///
/// Expected: Ok(Session)
#[tokio::test]
async fn session_without_permissions() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let session = AuthGuard::new(&state, &headers).require(&[]).await.unwrap();

    assert_eq!(session.subject_id, "42");

    Ok(())
}

/// Tests the owner check against a string owner ID.
///
/// Expected: Ok(Session), and the ownership call carried the internal key
#[tokio::test]
async fn owner_with_string_id() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_tenant("alpha", owned_by(fixture::tenant::owner("42")))
        .build()
        .await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    AuthGuard::new(&state, &headers)
        .require(&[Permission::BotOwner("alpha".to_string())])
        .await
        .unwrap();

    let request = &test.service("alpha").unwrap().requests_to("/bot/owner")[0];
    assert_eq!(
        request.query_param("api_key").as_deref(),
        Some("internal-key")
    );

    Ok(())
}

/// Tests the owner check against a numeric owner ID.
///
/// Expected: Ok(Session)
#[tokio::test]
async fn owner_with_numeric_id() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_tenant("alpha", owned_by(json!({ "id": 123456789012345678u64 })))
        .build()
        .await?;
    let state = state(&test);
    let headers = login(&state, "123456789012345678").await;

    let result = AuthGuard::new(&state, &headers)
        .require(&[Permission::BotOwner("alpha".to_string())])
        .await;

    assert!(result.is_ok());

    Ok(())
}

/// Tests a logged in user who does not own the bot.
///
/// Expected: Err(AuthError::NotBotOwner)
#[tokio::test]
async fn rejects_other_owner() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_tenant("alpha", owned_by(fixture::tenant::owner("7")))
        .build()
        .await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let result = AuthGuard::new(&state, &headers)
        .require(&[Permission::BotOwner("alpha".to_string())])
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::NotBotOwner { .. }))
    ));

    Ok(())
}

/// Tests an owner check for a bot with no registered port.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn unknown_bot_is_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().with_unported_bot("alpha").build().await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let result = AuthGuard::new(&state, &headers)
        .require(&[Permission::BotOwner("alpha".to_string())])
        .await;

    match result {
        Err(AppError::NotFound(message)) => assert_eq!(message, "Bot 'alpha' not found"),
        other => panic!("expected NotFound, got {:?}", other.map(|s| s.subject_id)),
    }

    Ok(())
}

/// Tests an owner check for a bot that is down.
///
/// Expected: Err(AuthError::OwnershipUnverifiable)
#[tokio::test]
async fn dead_bot_cannot_verify_ownership() -> Result<(), TestError> {
    let test = TestBuilder::new().with_dead_tenant("alpha").build().await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let result = AuthGuard::new(&state, &headers)
        .require(&[Permission::BotOwner("alpha".to_string())])
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::OwnershipUnverifiable { .. }))
    ));

    Ok(())
}

/// Tests the seller permission.
///
/// Expected: Ok(Session) when one bot reports the user as a seller
#[tokio::test]
async fn seller_on_some_bot() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_dead_tenant("alpha")
        .with_tenant(
            "bravo",
            MockService::new().get(
                "/seller/get/accounts",
                MockResponse::json(fixture::tenant::seller_accounts(true)),
            ),
        )
        .build()
        .await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let result = AuthGuard::new(&state, &headers)
        .require(&[Permission::Seller])
        .await;

    assert!(result.is_ok());

    Ok(())
}

/// Tests the seller permission for a user unknown to every bot.
///
/// Expected: Err(AuthError::NotSeller)
#[tokio::test]
async fn not_seller_anywhere() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_tenant(
            "alpha",
            MockService::new().get(
                "/seller/get/accounts",
                MockResponse::json(fixture::tenant::seller_accounts(false)),
            ),
        )
        .build()
        .await?;
    let state = state(&test);
    let headers = login(&state, "42").await;

    let result = AuthGuard::new(&state, &headers)
        .require(&[Permission::Seller])
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::NotSeller(_)))
    ));

    Ok(())
}
