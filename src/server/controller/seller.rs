use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use reqwest::Method;
use serde_json::Value;
use url::form_urlencoded;

use crate::{
    model::{api::ErrorDto, tenant::FanOutSummaryDto},
    server::{
        controller::param::json_body,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::seller::{ListItemParam, SellerConfigParam},
        service::backend::DEFAULT_TIMEOUT,
        state::AppState,
    },
};

/// Tag for grouping seller endpoints in OpenAPI documentation
pub static SELLER_TAG: &str = "seller";

/// Sends a seller call to every bot and renders the per-bot summary.
async fn broadcast(
    state: &AppState,
    endpoint: &str,
    method: Method,
    body: Option<Value>,
) -> Result<FanOutSummaryDto, AppError> {
    let fan_out = state
        .dispatcher
        .dispatch_all(endpoint, method, body, DEFAULT_TIMEOUT)
        .await?;

    Ok(fan_out.into_summary())
}

fn for_user(path: &str, user_id: &str) -> String {
    format!(
        "{}?user_id={}",
        path,
        form_urlencoded::byte_serialize(user_id.as_bytes()).collect::<String>()
    )
}

/// Seller accounts of the current user on every bot.
///
/// # Access Control
/// - `Seller` - The user must be a seller on at least one bot
///
/// # Returns
/// - `200 OK` - Summary keyed by bot, including bots that failed to answer
/// - `401 Unauthorized` - User not authenticated
/// - `403 Forbidden` - User is not a seller anywhere
#[utoipa::path(
    get,
    path = "/api/seller/accounts",
    tag = SELLER_TAG,
    responses(
        (status = 200, description = "Per-bot seller accounts", body = FanOutSummaryDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a seller", body = ErrorDto)
    ),
)]
pub async fn get_accounts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let session = AuthGuard::new(&state, &headers)
        .require(&[Permission::Seller])
        .await?;

    let endpoint = for_user("/seller/get/accounts", &session.subject_id);
    let summary = broadcast(&state, &endpoint, Method::GET, None).await?;

    Ok((StatusCode::OK, Json(summary)))
}

#[utoipa::path(
    get,
    path = "/api/seller/configuration",
    tag = SELLER_TAG,
    responses(
        (status = 200, description = "Per-bot seller configuration", body = FanOutSummaryDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a seller", body = ErrorDto)
    ),
)]
pub async fn get_configuration(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let session = AuthGuard::new(&state, &headers)
        .require(&[Permission::Seller])
        .await?;

    let endpoint = for_user("/seller/get/configuration", &session.subject_id);
    let summary = broadcast(&state, &endpoint, Method::GET, None).await?;

    Ok((StatusCode::OK, Json(summary)))
}

/// Updates the seller configuration on every bot.
///
/// The body is forwarded with the seller's `user_id` added.
#[utoipa::path(
    post,
    path = "/api/seller/configuration",
    tag = SELLER_TAG,
    request_body = Object,
    responses(
        (status = 200, description = "Per-bot update results", body = FanOutSummaryDto),
        (status = 400, description = "Body is not a JSON object", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a seller", body = ErrorDto)
    ),
)]
pub async fn update_configuration(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let session = AuthGuard::new(&state, &headers)
        .require(&[Permission::Seller])
        .await?;

    let param = SellerConfigParam::parse(json_body(&body)?, &session.subject_id)?;
    let summary = broadcast(
        &state,
        "/seller/update/configuration",
        Method::POST,
        Some(param.0),
    )
    .await?;

    Ok((StatusCode::OK, Json(summary)))
}

/// Lists an item on every bot.
#[utoipa::path(
    post,
    path = "/api/seller/list",
    tag = SELLER_TAG,
    request_body = Object,
    responses(
        (status = 200, description = "Per-bot listing results", body = FanOutSummaryDto),
        (status = 400, description = "Invalid item", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a seller", body = ErrorDto)
    ),
)]
pub async fn list_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let session = AuthGuard::new(&state, &headers)
        .require(&[Permission::Seller])
        .await?;

    let param = ListItemParam::parse(json_body(&body)?, &session.subject_id)?;
    let summary = broadcast(&state, "/seller/list/item", Method::POST, Some(param.0)).await?;

    Ok((StatusCode::OK, Json(summary)))
}
