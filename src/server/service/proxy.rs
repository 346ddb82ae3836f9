//! Reverse proxy in front of the shared storefront renderer.
//!
//! Every approved custom domain is served by the same frontend process. Requests are
//! forwarded with their headers and body, the upstream answer is buffered, and framing
//! headers are recomputed from the buffered body before it is returned.

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{
        header::{
            ACCEPT, ACCEPT_ENCODING, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION, CONTENT_ENCODING,
            CONTENT_LENGTH, CONTENT_TYPE, HOST, TRANSFER_ENCODING,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::Response,
};
use dioxus_logger::tracing;

use crate::server::{error::proxy::ProxyError, util::limit::OutboundLimiter};

/// Longest a storefront request waits for an outbound slot.
const QUEUE_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_SHELL_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// How the upstream answer is post-processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    /// Forward the answer as is, apart from framing headers.
    Verbatim,
    /// The single page application shell: HTML gets an explicit charset, is never
    /// cached, and carries permissive CORS grants.
    Shell,
}

#[derive(Clone)]
pub struct ReverseProxy {
    http_client: reqwest::Client,
    /// `host:port` of the renderer, sent as the upstream `Host` header.
    authority: String,
    limiter: OutboundLimiter,
}

impl ReverseProxy {
    pub fn new(
        http_client: reqwest::Client,
        host: &str,
        port: u16,
        limiter: OutboundLimiter,
    ) -> Self {
        Self {
            http_client,
            authority: format!("{}:{}", host, port),
            limiter,
        }
    }

    /// Forwards one request to the renderer and returns its buffered answer.
    ///
    /// # Arguments
    /// - `method` - Method of the inbound request
    /// - `target_path` - Path requested from the renderer, e.g. `/assets/app.js` or `/`
    /// - `query` - Inbound query string, forwarded unchanged
    /// - `headers` - Inbound request headers
    /// - `body` - Buffered inbound body
    /// - `mode` - Post-processing applied to the answer
    ///
    /// # Returns
    /// - `Ok(Response)` - The renderer's answer with recomputed framing headers
    /// - `Err(ProxyError::Unreachable)` - The renderer could not be contacted (502)
    /// - `Err(ProxyError::Saturated)` - No outbound slot freed up in time (503)
    pub async fn forward(
        &self,
        method: Method,
        target_path: &str,
        query: Option<&str>,
        headers: &HeaderMap,
        body: Bytes,
        mode: ProxyMode,
    ) -> Result<Response, ProxyError> {
        let mut target = format!("http://{}{}", self.authority, target_path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }

        let mut upstream_headers = forwarded_headers(headers);
        if let Ok(host) = HeaderValue::from_str(&self.authority) {
            upstream_headers.insert(HOST, host);
        }
        if mode == ProxyMode::Shell && !upstream_headers.contains_key(ACCEPT) {
            upstream_headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_SHELL_ACCEPT));
        }

        tracing::debug!("Proxying {} {}", method, target);

        let unreachable = |source| ProxyError::Unreachable {
            target: target.clone(),
            source,
        };

        let slot = self.limiter.acquire(&self.authority);
        let _permit = match tokio::time::timeout(QUEUE_TIMEOUT, slot).await {
            Ok(Ok(permit)) => permit,
            _ => {
                return Err(ProxyError::Saturated {
                    target: target.clone(),
                })
            }
        };

        let upstream = self
            .http_client
            .request(method, &target)
            .headers(upstream_headers)
            .body(body)
            .send()
            .await
            .map_err(unreachable)?;

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        if mode == ProxyMode::Shell && !response_headers.contains_key(CONTENT_TYPE) {
            response_headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        }
        let content = upstream.bytes().await.map_err(unreachable)?;

        let mut response = build_response(status, &response_headers, content);
        if mode == ProxyMode::Shell && status != StatusCode::NOT_MODIFIED {
            apply_shell_headers(response.headers_mut());
        }

        Ok(response)
    }
}

/// Copies the inbound headers that may be forwarded upstream.
///
/// `accept-encoding` is dropped so the renderer answers with an identity encoding,
/// since `content-encoding` is stripped from the response.
fn forwarded_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = headers.clone();
    for name in [HOST, CONTENT_LENGTH, TRANSFER_ENCODING, CONNECTION, ACCEPT_ENCODING] {
        forwarded.remove(name);
    }

    forwarded
}

/// Builds the client-facing response from a buffered upstream answer.
///
/// Upstream framing headers are discarded and `Content-Length` is set to the length of
/// `body`. A `304 Not Modified` answer is returned with an empty body and without a
/// `Content-Length`. Every response allows any origin.
///
/// # Arguments
/// - `status` - Upstream status code
/// - `headers` - Upstream response headers
/// - `body` - Fully buffered upstream body
pub fn build_response(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Response {
    let mut response_headers = headers.clone();
    for name in [CONTENT_ENCODING, TRANSFER_ENCODING, CONTENT_LENGTH] {
        response_headers.remove(name);
    }
    response_headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    let body = if status == StatusCode::NOT_MODIFIED {
        Body::empty()
    } else {
        if !response_headers.contains_key(CONTENT_TYPE) {
            response_headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            );
        }
        response_headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        Body::from(body)
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;

    response
}

fn apply_shell_headers(headers: &mut HeaderMap) {
    let is_html = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("text/html"));
    let has_charset = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("charset"));

    if is_html {
        if !has_charset {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
        }
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }

    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(response: &'a Response, name: axum::http::HeaderName) -> Option<&'a str> {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// Tests that a stale upstream Content-Length is replaced.
    ///
    /// Expected: Content-Length equals the buffered body length
    #[test]
    fn recomputes_content_length() {
        let mut upstream = HeaderMap::new();
        upstream.insert(CONTENT_LENGTH, HeaderValue::from_static("999"));
        upstream.insert(CONTENT_TYPE, HeaderValue::from_static("text/css"));

        let response = build_response(StatusCode::OK, &upstream, Bytes::from(vec![b'a'; 123]));

        assert_eq!(header(&response, CONTENT_LENGTH), Some("123"));
        assert_eq!(header(&response, CONTENT_TYPE), Some("text/css"));
        assert_eq!(header(&response, ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    }

    /// Tests that encoding headers are stripped from the answer.
    ///
    /// Expected: no Content-Encoding or Transfer-Encoding header
    #[test]
    fn strips_encoding_headers() {
        let mut upstream = HeaderMap::new();
        upstream.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        upstream.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        upstream.insert("etag", HeaderValue::from_static("\"v1\""));

        let response = build_response(StatusCode::OK, &upstream, Bytes::from_static(b"body"));

        assert!(response.headers().get(CONTENT_ENCODING).is_none());
        assert!(response.headers().get(TRANSFER_ENCODING).is_none());
        assert_eq!(header(&response, "etag".parse().unwrap()), Some("\"v1\""));
    }

    /// Tests the 304 passthrough.
    ///
    /// Expected: status 304, no Content-Length, CORS header present
    #[test]
    fn not_modified_has_empty_body() {
        let mut upstream = HeaderMap::new();
        upstream.insert(CONTENT_LENGTH, HeaderValue::from_static("42"));
        upstream.insert("etag", HeaderValue::from_static("\"v1\""));

        let response = build_response(
            StatusCode::NOT_MODIFIED,
            &upstream,
            Bytes::from_static(b"ignored"),
        );

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(response.headers().get(CONTENT_LENGTH).is_none());
        assert_eq!(header(&response, ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    }

    /// Tests the SPA shell post-processing of an HTML answer.
    ///
    /// Expected: charset added, caching disabled, CORS grants present
    #[test]
    fn shell_html_gets_charset_and_no_cache() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));

        apply_shell_headers(&mut headers);

        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-cache");
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "*");
    }

    /// Tests that hop-by-hop and encoding request headers are not forwarded.
    ///
    /// Expected: Host, Content-Length and Accept-Encoding removed, others kept
    #[test]
    fn drops_framing_request_headers() {
        let mut inbound = HeaderMap::new();
        inbound.insert(HOST, HeaderValue::from_static("shop.example.com"));
        inbound.insert(CONTENT_LENGTH, HeaderValue::from_static("10"));
        inbound.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, br"));
        inbound.insert("cookie", HeaderValue::from_static("a=b"));

        let forwarded = forwarded_headers(&inbound);

        assert!(forwarded.get(HOST).is_none());
        assert!(forwarded.get(CONTENT_LENGTH).is_none());
        assert!(forwarded.get(ACCEPT_ENCODING).is_none());
        assert_eq!(forwarded.get("cookie").unwrap(), "a=b");
    }
}
