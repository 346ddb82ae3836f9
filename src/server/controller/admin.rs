//! Administrative endpoints called by the billing backend.
//!
//! Every endpoint is guarded by the `api_key` query parameter instead of a session.
//! Bots are located by their billing email through a probe of every bot.

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dioxus_logger::tracing;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    model::{
        api::ErrorDto,
        tenant::{BotExtendedDto, CreditsAddedDto},
    },
    server::{
        controller::param::{require_api_key, ApiKeyParam},
        error::AppError,
        model::tenant::TenantMatch,
        service::{
            backend::{into_parts, DEFAULT_TIMEOUT},
            tenant::TenantService,
        },
        state::AppState,
    },
};

/// Tag for grouping admin endpoints in OpenAPI documentation
pub static ADMIN_TAG: &str = "admin";

#[derive(Deserialize)]
pub struct ExtendParams {
    pub email: Option<String>,
    pub days: Option<i64>,
    pub api_key: Option<String>,
}

#[derive(Deserialize)]
pub struct CreditsParams {
    pub email: Option<String>,
    pub credits: Option<i64>,
    pub api_key: Option<String>,
}

async fn find_by_email(state: &AppState, email: Option<&str>) -> Result<TenantMatch, AppError> {
    let email = email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("email is required".to_string()))?;

    state
        .resolver
        .resolve_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No bot found with email: {}", email)))
}

fn positive(value: Option<i64>, message: &str) -> Result<u32, AppError> {
    value
        .filter(|value| *value > 0)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| AppError::BadRequest(message.to_string()))
}

/// Extends a bot's subscription by a number of days.
///
/// # Returns
/// - `200 OK` - Extension applied, with the bot's answer
/// - `400 Bad Request` - Missing email, or days not positive
/// - `403 Forbidden` - Wrong API key
/// - `404 Not Found` - No bot has this billing email
/// - `500`/`503` - The bot failed to apply the extension
#[utoipa::path(
    get,
    path = "/bot/extend",
    tag = ADMIN_TAG,
    params(
        ("email" = String, Query, description = "Billing email of the bot"),
        ("days" = i64, Query, description = "Number of days to extend"),
        ("api_key" = String, Query, description = "Administrative API key")
    ),
    responses(
        (status = 200, description = "Bot extended", body = BotExtendedDto),
        (status = 400, description = "Invalid parameters", body = ErrorDto),
        (status = 403, description = "Invalid API key", body = ErrorDto),
        (status = 404, description = "No bot with this email", body = ErrorDto)
    ),
)]
pub async fn extend_bot(
    State(state): State<AppState>,
    Query(params): Query<ExtendParams>,
) -> Result<impl IntoResponse, AppError> {
    require_api_key(&state, params.api_key.as_deref())?;
    let days = positive(params.days, "Days must be a positive number")?;

    let target = find_by_email(&state, params.email.as_deref()).await?;

    let result = TenantService::new(&state.ports, &state.backend)
        .call_port(
            &target.tenant_id,
            target.port,
            &format!("/bot/extend?days={}", days),
            None,
            "extend bot",
        )
        .await?;

    tracing::info!("Extended bot {} by {} days", target.tenant_id, days);

    Ok((
        StatusCode::OK,
        Json(BotExtendedDto {
            success: true,
            bot_name: target.tenant_id,
            days_extended: days,
            result,
        }),
    ))
}

/// Adds AI query credits to a bot.
#[utoipa::path(
    get,
    path = "/ai/credits/add",
    tag = ADMIN_TAG,
    params(
        ("email" = String, Query, description = "Billing email of the bot"),
        ("credits" = i64, Query, description = "Number of queries to add"),
        ("api_key" = String, Query, description = "Administrative API key")
    ),
    responses(
        (status = 200, description = "Credits added", body = CreditsAddedDto),
        (status = 400, description = "Invalid parameters", body = ErrorDto),
        (status = 403, description = "Invalid API key", body = ErrorDto),
        (status = 404, description = "No bot with this email", body = ErrorDto)
    ),
)]
pub async fn add_ai_credits(
    State(state): State<AppState>,
    Query(params): Query<CreditsParams>,
) -> Result<impl IntoResponse, AppError> {
    require_api_key(&state, params.api_key.as_deref())?;
    let credits = positive(params.credits, "Credits must be a positive number")?;

    let target = find_by_email(&state, params.email.as_deref()).await?;

    let result = TenantService::new(&state.ports, &state.backend)
        .call_port(
            &target.tenant_id,
            target.port,
            &format!("/ai/credits/add?credits={}", credits),
            None,
            "add credits",
        )
        .await?;

    tracing::info!("Added {} AI credits to bot {}", credits, target.tenant_id);

    Ok((
        StatusCode::OK,
        Json(CreditsAddedDto {
            success: true,
            bot_name: target.tenant_id,
            applied_credits: credits,
            result,
        }),
    ))
}

/// Every account known to every bot.
///
/// Each bot maps to its `[ok, data]` pair, failures included.
#[utoipa::path(
    get,
    path = "/api/accounts/all",
    tag = ADMIN_TAG,
    params(
        ("api_key" = String, Query, description = "Administrative API key")
    ),
    responses(
        (status = 200, description = "Accounts keyed by bot", body = Object),
        (status = 403, description = "Invalid API key", body = ErrorDto)
    ),
)]
pub async fn get_all_accounts(
    State(state): State<AppState>,
    Query(params): Query<ApiKeyParam>,
) -> Result<impl IntoResponse, AppError> {
    require_api_key(&state, params.api_key.as_deref())?;

    let fan_out = state
        .dispatcher
        .dispatch_all("/api/accounts/all", Method::GET, None, DEFAULT_TIMEOUT)
        .await?;

    let accounts: BTreeMap<String, Value> = fan_out
        .results
        .into_iter()
        .map(|result| {
            let (ok, data) = into_parts(result.outcome);
            (result.tenant_id, json!([ok, data]))
        })
        .collect();

    Ok((StatusCode::OK, Json(accounts)))
}
