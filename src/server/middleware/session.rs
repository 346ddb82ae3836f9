//! Session cookie handling.
//!
//! The browser only ever holds an opaque session identifier in the `session_id`
//! cookie; the session itself lives in `SessionStore`. This module reads that cookie
//! from request headers and builds the cookies set at login and cleared at logout.
//!
//! # Cookie attributes
//!
//! - `HttpOnly` always, `Path=/`
//! - `SameSite=None; Secure` for deployed origins so the storefront on a custom domain
//!   can send it cross-site; `SameSite=Lax` without `Secure` when logging in from
//!   `localhost` or `127.0.0.1`
//! - `Domain=.<cookie domain>` when the post-login redirect targets the platform domain,
//!   so every sub-domain shares the session

use axum::http::{header::COOKIE, HeaderMap};
use tower_sessions::cookie::{Cookie, SameSite};

/// Name of the cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "session_id";

/// Read access to the session cookie of an inbound request.
pub struct SessionCookie<'a> {
    headers: &'a HeaderMap,
}

impl<'a> SessionCookie<'a> {
    /// Creates a new SessionCookie wrapper.
    ///
    /// # Arguments
    /// - `headers` - Headers of the inbound request
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self { headers }
    }

    /// Returns the session identifier sent by the browser, if any.
    ///
    /// Every `Cookie` header is inspected; malformed cookie pairs are skipped.
    ///
    /// # Returns
    /// - `Some(session_id)` - A non-empty `session_id` cookie was sent
    /// - `None` - No session cookie
    pub fn session_id(&self) -> Option<String> {
        self.headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| Cookie::split_parse(value.to_string()))
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == SESSION_COOKIE && !cookie.value().is_empty())
            .map(|cookie| cookie.value().to_string())
    }
}

/// Builds the cookie set after a successful login.
///
/// # Arguments
/// - `session_id` - Identifier of the freshly created session
/// - `redirect_url` - Where the user is sent after login; decides the cookie attributes
/// - `lifetime` - Session lifetime, used as `Max-Age`
/// - `cookie_domain` - Parent domain shared by the platform's sub-domains
///
/// # Returns
/// - `Cookie<'static>` - Cookie ready to be rendered into a `Set-Cookie` header
pub fn login_cookie(
    session_id: &str,
    redirect_url: &str,
    lifetime: chrono::Duration,
    cookie_domain: &str,
) -> Cookie<'static> {
    let is_localhost = redirect_url.contains("localhost") || redirect_url.contains("127.0.0.1");
    let shares_domain =
        !is_localhost && !cookie_domain.is_empty() && redirect_url.contains(cookie_domain);

    let mut builder = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(lifetime.num_seconds()))
        .same_site(if is_localhost {
            SameSite::Lax
        } else {
            SameSite::None
        })
        .secure(!is_localhost);

    if shares_domain {
        builder = builder.domain(format!(".{}", cookie_domain));
    }

    builder.build()
}

/// Builds the cookie that makes the browser forget its session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}
