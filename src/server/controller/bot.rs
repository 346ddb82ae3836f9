//! Endpoints forwarded to a single bot named in the path.
//!
//! Management endpoints require the caller to own the bot. Storefront endpoints
//! (`shop/info`, `users/info`, ticket opening) and `/stats` are public.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::{
    model::{api::ErrorDto, tenant::BotStatsDto},
    server::{
        controller::param::json_body,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::bot::{ConfigUpdateParam, UnlistItemParam, UsersInfoParam, VerifyUserParam},
        service::tenant::TenantService,
        state::AppState,
    },
};

/// Tag for grouping bot endpoints in OpenAPI documentation
pub static BOT_TAG: &str = "bot";

#[derive(Deserialize)]
pub struct StatsParams {
    /// Stats key forwarded to the bot as `key`.
    pub api_key: Option<String>,
}

/// Checks ownership, then forwards a `GET` to the bot and returns its answer as is.
async fn owner_get(
    state: &AppState,
    headers: &HeaderMap,
    bot: &str,
    path: &str,
    action: &'static str,
) -> Result<Json<Value>, AppError> {
    AuthGuard::new(state, headers)
        .require(&[Permission::BotOwner(bot.to_string())])
        .await?;

    let response = TenantService::new(&state.ports, &state.backend)
        .call(bot, path, None, action)
        .await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/bot/{bot}/auth/bots",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Authorized bots of the tenant", body = Object),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_auth_bots(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    owner_get(&state, &headers, &bot, "/auth/bots", "fetch stats").await
}

#[utoipa::path(
    get,
    path = "/api/bot/{bot}/auth/users",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Authorized users of the tenant", body = Object),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_auth_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    owner_get(&state, &headers, &bot, "/auth/users", "fetch stats").await
}

#[utoipa::path(
    get,
    path = "/api/bot/{bot}/listed/items",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Items currently listed", body = Object),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_listed_items(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    owner_get(&state, &headers, &bot, "/listed/items", "fetch stats").await
}

#[utoipa::path(
    get,
    path = "/api/bot/{bot}/auth/actions",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Pending verification actions", body = Object),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_auth_actions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    owner_get(&state, &headers, &bot, "/auth/actions", "fetch stats").await
}

#[utoipa::path(
    get,
    path = "/api/bot/{bot}/config",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Bot configuration settings", body = Object),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    owner_get(&state, &headers, &bot, "/config", "fetch configuration").await
}

#[utoipa::path(
    get,
    path = "/api/bot/{bot}/channels",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Guild channels and categories", body = Object),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_channels(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    owner_get(&state, &headers, &bot, "/channels", "fetch channels").await
}

#[utoipa::path(
    get,
    path = "/api/bot/{bot}/roles",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Guild roles", body = Object),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_roles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    owner_get(&state, &headers, &bot, "/roles", "fetch roles").await
}

/// Dashboard statistics of a bot, for its owner.
#[utoipa::path(
    get,
    path = "/dash/{bot}",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Bot statistics", body = Object),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    owner_get(&state, &headers, &bot, "/stats", "fetch stats").await
}

/// Approves a pending verification action.
///
/// # Returns
/// - `200 OK` - The bot's answer
/// - `400 Bad Request` - Missing or non-integer `action_id`
/// - `401`/`403`/`404`/`503` - As for every owner endpoint
#[utoipa::path(
    post,
    path = "/api/bot/{bot}/verify/user",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    request_body = Object,
    responses(
        (status = 200, description = "User verified", body = Object),
        (status = 400, description = "Invalid action_id", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn verify_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state, &headers)
        .require(&[Permission::BotOwner(bot.clone())])
        .await?;

    let param = VerifyUserParam::parse(json_body(&body)?)?;

    let response = TenantService::new(&state.ports, &state.backend)
        .call(&bot, "/verify/user", Some(&param.0), "verify user")
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/bot/{bot}/unlist/item",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    request_body = Object,
    responses(
        (status = 200, description = "Item unlisted", body = Object),
        (status = 400, description = "Invalid channel_id or message_id", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn unlist_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state, &headers)
        .require(&[Permission::BotOwner(bot.clone())])
        .await?;

    let param = UnlistItemParam::parse(json_body(&body)?)?;

    let response = TenantService::new(&state.ports, &state.backend)
        .call(&bot, "/unlist/item", Some(&param.0), "unlist item")
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/bot/{bot}/config",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    request_body = Object,
    responses(
        (status = 200, description = "Configuration updated", body = Object),
        (status = 400, description = "Malformed configuration update", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User does not own the bot", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn update_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bot): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state, &headers)
        .require(&[Permission::BotOwner(bot.clone())])
        .await?;

    let param = ConfigUpdateParam::parse(json_body(&body)?)?;

    let response = TenantService::new(&state.ports, &state.backend)
        .call(&bot, "/config", Some(&param.0), "update configuration")
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/bot/{bot}/shop/info",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Public storefront information", body = Object),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_shop_info(
    State(state): State<AppState>,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let response = TenantService::new(&state.ports, &state.backend)
        .call(&bot, "/shop/info", None, "fetch shop info")
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

/// Opens a support ticket from the storefront.
#[utoipa::path(
    get,
    path = "/api/{bot}/initialize/website/ticket/open",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    responses(
        (status = 200, description = "Ticket opened", body = Object),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn open_ticket(
    State(state): State<AppState>,
    Path(bot): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let response = TenantService::new(&state.ports, &state.backend)
        .call(
            &bot,
            "/initialize/website/ticket/open",
            None,
            "open ticket",
        )
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

/// Resolves Discord profiles for a list of user IDs.
///
/// Accepts either a bare list of IDs or `{"users": [...]}`; the bot always receives
/// the bare list.
#[utoipa::path(
    post,
    path = "/api/bot/{bot}/users/info",
    tag = BOT_TAG,
    params(("bot" = String, Path, description = "Bot name")),
    request_body = Object,
    responses(
        (status = 200, description = "User profiles", body = Object),
        (status = 400, description = "Malformed list of user IDs", body = ErrorDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_users_info(
    State(state): State<AppState>,
    Path(bot): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let tenants = TenantService::new(&state.ports, &state.backend);
    let port = tenants.port(&bot).await?;

    let users = UsersInfoParam::parse(json_body(&body)?)?.into_body();

    let response = tenants
        .call_port(&bot, port, "/users/info", Some(&users), "fetch user info")
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

/// Statistics of a bot.
///
/// The optional `api_key` is forwarded to the bot as its `key` parameter, which
/// unlocks the detailed figures.
#[utoipa::path(
    get,
    path = "/stats/{bot}",
    tag = BOT_TAG,
    params(
        ("bot" = String, Path, description = "Bot name"),
        ("api_key" = Option<String>, Query, description = "Key unlocking detailed statistics")
    ),
    responses(
        (status = 200, description = "Bot statistics", body = BotStatsDto),
        (status = 404, description = "Unknown bot", body = ErrorDto),
        (status = 503, description = "Bot not responding", body = ErrorDto)
    ),
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Path(bot): Path<String>,
    Query(params): Query<StatsParams>,
) -> Result<impl IntoResponse, AppError> {
    let path = match params.api_key.filter(|key| !key.is_empty()) {
        Some(key) => format!(
            "/stats?key={}",
            form_urlencoded::byte_serialize(key.as_bytes()).collect::<String>()
        ),
        None => "/stats".to_string(),
    };

    let stats = TenantService::new(&state.ports, &state.backend)
        .call(&bot, &path, None, "fetch stats")
        .await?;

    Ok((
        StatusCode::OK,
        Json(BotStatsDto {
            bot_name: bot,
            stats,
        }),
    ))
}
