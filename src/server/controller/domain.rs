use axum::{
    extract::{Query, State},
    http::{header::ORIGIN, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use dioxus_logger::tracing;
use serde::Deserialize;

use crate::{
    model::{api::ErrorDto, tenant::BotNameDto},
    server::{error::AppError, state::AppState, util::host::normalize_host},
};

/// Tag for grouping domain endpoints in OpenAPI documentation
pub static DOMAIN_TAG: &str = "domain";

/// Origin assumed when a request carries no `Origin` header.
const DEFAULT_ORIGIN: &str = "v2.noemt.dev";

#[derive(Deserialize)]
pub struct CheckDomainParams {
    pub domain: Option<String>,
}

/// Certificate issuance gate for the TLS terminating proxy.
///
/// The proxy asks before issuing a certificate for an unknown host. Only domains in
/// the approved-domains file are allowed; when that file cannot be read every domain
/// is denied.
///
/// # Returns
/// - `200 OK` - Domain is approved
/// - `400 Bad Request` - No domain given
/// - `403 Forbidden` - Domain is not approved
#[utoipa::path(
    get,
    path = "/api/check-domain",
    tag = DOMAIN_TAG,
    params(
        ("domain" = String, Query, description = "Host a certificate is requested for")
    ),
    responses(
        (status = 200, description = "Domain is approved"),
        (status = 400, description = "Missing domain", body = ErrorDto),
        (status = 403, description = "Domain is not approved", body = ErrorDto)
    ),
)]
pub async fn check_domain(
    State(state): State<AppState>,
    Query(params): Query<CheckDomainParams>,
) -> Result<impl IntoResponse, AppError> {
    let Some(domain) = params.domain.filter(|domain| !domain.trim().is_empty()) else {
        return Err(AppError::BadRequest(
            "Domain parameter is required.".to_string(),
        ));
    };

    if state.domains.is_approved(&domain).await {
        tracing::info!("Domain check PASSED for: {}", domain);
        return Ok((StatusCode::OK, "Domain is approved.").into_response());
    }

    tracing::warn!("Domain check FAILED for unauthorized domain: {}", domain);

    Ok((
        StatusCode::FORBIDDEN,
        Json(ErrorDto {
            error: "Domain is not authorized for this service.".to_string(),
        }),
    )
        .into_response())
}

/// Name of the bot serving the custom domain the request originates from.
///
/// The domain is taken from the `Origin` header. Platform domains have no bot.
#[utoipa::path(
    get,
    path = "/custom/bot/name",
    tag = DOMAIN_TAG,
    responses(
        (status = 200, description = "Bot serving the origin domain", body = BotNameDto),
        (status = 404, description = "Platform domain, or no bot claims the domain", body = ErrorDto)
    ),
)]
pub async fn custom_bot_name(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let origin = headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_ORIGIN);
    let host = normalize_host(origin);

    if host.is_empty() || state.resolver.is_reserved(&host) {
        return Err(AppError::NotFound(
            "This endpoint is only available for custom domains.".to_string(),
        ));
    }

    let Some(found) = state.resolver.resolve_domain(&host).await? else {
        return Err(AppError::NotFound(format!(
            "No bot found for domain '{}'.",
            host
        )));
    };

    Ok((StatusCode::OK, Json(BotNameDto { name: found.tenant_id })))
}
