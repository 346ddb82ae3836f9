//! Storefront routes serving every approved custom domain.
//!
//! Requests are routed by their `Host` header. Platform hosts have no storefront; any
//! other host must be claimed by a bot before the request is forwarded to the shared
//! renderer.

use std::path::{Component, Path as FsPath};

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, HOST},
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use dioxus_logger::tracing;

use crate::server::{error::AppError, service::proxy::ProxyMode, state::AppState};

/// Extensions the fallback route forwards verbatim instead of serving the SPA shell.
const ASSET_EXTENSIONS: [&str; 18] = [
    "css",
    "js",
    "map",
    "ico",
    "png",
    "jpg",
    "jpeg",
    "gif",
    "webp",
    "svg",
    "woff",
    "woff2",
    "ttf",
    "eot",
    "json",
    "xml",
    "txt",
    "webmanifest",
];

/// Inbound request forwarded to the renderer.
struct Forward {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl Forward {
    async fn to(
        self,
        state: &AppState,
        target_path: &str,
        mode: ProxyMode,
    ) -> Result<Response, AppError> {
        let response = state
            .proxy
            .forward(
                self.method,
                target_path,
                self.uri.query(),
                &self.headers,
                self.body,
                mode,
            )
            .await?;

        Ok(response)
    }
}

/// Outcome of the custom domain gate.
enum Gate {
    Open,
    Closed(Response),
}

/// Lets the request through when its host is a custom domain claimed by a bot.
///
/// # Returns
/// - `Gate::Open` - A bot serves the host
/// - `Gate::Closed` - 404 JSON for a missing or platform host, 404 text for an
///   unclaimed domain
async fn custom_domain_gate(state: &AppState, headers: &HeaderMap) -> Result<Gate, AppError> {
    let host = request_host(headers);

    let Some(host) = host.filter(|host| !state.resolver.is_reserved(host)) else {
        return Ok(Gate::Closed(
            AppError::NotFound("Endpoint not found.".to_string()).into_response(),
        ));
    };

    match state.resolver.resolve_domain(&host).await? {
        Some(found) => {
            tracing::debug!("Bot found for domain {}: {}", host, found.tenant_id);
            Ok(Gate::Open)
        }
        None => Ok(Gate::Closed(unconfigured_domain(&host))),
    }
}

fn request_host(headers: &HeaderMap) -> Option<String> {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .filter(|host| !host.is_empty())
}

fn unconfigured_domain(host: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Domain '{}' is not configured for our service.", host),
    )
        .into_response()
}

/// Static files.
///
/// A file present in the local static directory is served directly on every host.
/// Otherwise the request is forwarded to the renderer; custom domains must be
/// claimed by a bot first.
pub async fn static_files(
    State(state): State<AppState>,
    Path(path): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if let Some(response) = local_static_file(&state.config.static_dir, &path).await {
        return Ok(response);
    }

    if let Some(host) = request_host(&headers) {
        let is_custom = !state.resolver.is_reserved(&host);
        if is_custom && state.resolver.resolve_domain(&host).await?.is_none() {
            return Ok(AppError::NotFound(format!(
                "Domain '{}' is not configured for our service.",
                host
            ))
            .into_response());
        }
    }

    let request = Forward {
        method,
        uri,
        headers,
        body,
    };
    request
        .to(&state, &format!("/static/{}", path), ProxyMode::Verbatim)
        .await
}

/// Bundled assets of the storefront, for custom domains only.
pub async fn assets(
    State(state): State<AppState>,
    Path(path): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if let Gate::Closed(response) = custom_domain_gate(&state, &headers).await? {
        return Ok(response);
    }

    let request = Forward {
        method,
        uri,
        headers,
        body,
    };
    request
        .to(&state, &format!("/assets/{}", path), ProxyMode::Verbatim)
        .await
}

/// Storefront pages, for custom domains only.
///
/// Every page is rendered client-side, so the request is answered with the SPA
/// shell whatever the path below `/shop/`.
pub async fn shop(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if let Gate::Closed(response) = custom_domain_gate(&state, &headers).await? {
        return Ok(response);
    }

    let request = Forward {
        method,
        uri,
        headers,
        body,
    };
    request.to(&state, "/", ProxyMode::Shell).await
}

/// Any path not matched by another route, for custom domains only.
///
/// Static and asset paths and files with a known asset extension are forwarded as
/// is; anything else gets the SPA shell.
pub async fn fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if let Gate::Closed(response) = custom_domain_gate(&state, &headers).await? {
        return Ok(response);
    }

    let path = uri.path().trim_start_matches('/').to_string();
    let target = if is_asset_path(&path) {
        format!("/{}", path)
    } else {
        "/".to_string()
    };

    let request = Forward {
        method,
        uri,
        headers,
        body,
    };
    request.to(&state, &target, ProxyMode::Verbatim).await
}

fn is_asset_path(path: &str) -> bool {
    if path.starts_with("static/") || path.starts_with("assets/") {
        return true;
    }

    path.rsplit_once('.')
        .is_some_and(|(_, extension)| ASSET_EXTENSIONS.contains(&extension))
}

/// Serves a file of the local static directory, if it exists.
///
/// Paths escaping the directory are ignored.
async fn local_static_file(root: &FsPath, path: &str) -> Option<Response> {
    let relative = FsPath::new(path);
    if relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
    {
        return None;
    }

    let file = root.join(relative);
    if !tokio::fs::metadata(&file).await.is_ok_and(|meta| meta.is_file()) {
        return None;
    }

    let content = match tokio::fs::read(&file).await {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("Error serving local static file {}: {}", path, e);
            return None;
        }
    };

    let length = content.len();
    let mut response = Response::new(Body::from(content));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type(path)));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );

    Some(response)
}

fn content_type(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" => "image/jpg",
        "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "css" => "text/css",
        "js" => "application/javascript",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
