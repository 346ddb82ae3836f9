use std::time::Duration;

use axum::{
    http::{request::Parts, HeaderValue},
    routing::{any, get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::server::{
    controller::{admin, auth, bot, docs, domain, seller, storefront, transcript},
    data::domain::ApprovedDomains,
    state::AppState,
};

/// How long browsers may cache a preflight answer.
const CORS_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Builds the full application router.
///
/// JSON endpoints carry the credentialed CORS layer. Storefront routes and the
/// fallback answer with their own permissive CORS headers and are matched last.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(api_router().layer(cors_layer(state.domains.clone())))
        .merge(storefront_router())
        .fallback(storefront::fallback)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/auth/discord/login", get(auth::login))
        .route("/auth/discord/callback", get(auth::callback))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/token", get(auth::token))
        .route("/auth/sessions/stats", get(auth::session_stats))
        .route("/transcript/{bot}/{id}", get(transcript::get_transcript))
        .route("/bot/extend", get(admin::extend_bot))
        .route("/ai/credits/add", get(admin::add_ai_credits))
        .route("/api/accounts/all", get(admin::get_all_accounts))
        .route("/stats/{bot}", get(bot::get_stats))
        .route("/dash/{bot}", get(bot::dashboard))
        .route("/api/bot/{bot}/auth/bots", get(bot::get_auth_bots))
        .route("/api/bot/{bot}/auth/users", get(bot::get_auth_users))
        .route("/api/bot/{bot}/listed/items", get(bot::get_listed_items))
        .route("/api/bot/{bot}/auth/actions", get(bot::get_auth_actions))
        .route(
            "/api/bot/{bot}/config",
            get(bot::get_config).post(bot::update_config),
        )
        .route("/api/bot/{bot}/channels", get(bot::get_channels))
        .route("/api/bot/{bot}/roles", get(bot::get_roles))
        .route("/api/bot/{bot}/verify/user", post(bot::verify_user))
        .route("/api/bot/{bot}/unlist/item", post(bot::unlist_item))
        .route("/api/bot/{bot}/shop/info", get(bot::get_shop_info))
        .route("/api/bot/{bot}/users/info", post(bot::get_users_info))
        .route(
            "/api/{bot}/initialize/website/ticket/open",
            get(bot::open_ticket),
        )
        .route("/api/seller/accounts", get(seller::get_accounts))
        .route(
            "/api/seller/configuration",
            get(seller::get_configuration).post(seller::update_configuration),
        )
        .route("/api/seller/list", post(seller::list_item))
        .route("/api/check-domain", get(domain::check_domain))
        .route("/custom/bot/name", get(domain::custom_bot_name))
        .route("/api-docs/openapi.json", get(docs::openapi))
}

fn storefront_router() -> Router<AppState> {
    Router::new()
        .route("/static/{*path}", any(storefront::static_files))
        .route("/assets/{*path}", any(storefront::assets))
        .route("/shop/{*path}", any(storefront::shop))
}

/// CORS for the JSON endpoints.
///
/// Allowed origins are the platform's own origins plus `https://` on every approved
/// custom domain, re-evaluated per request so newly approved domains work without a
/// restart.
fn cors_layer(domains: ApprovedDomains) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .is_ok_and(|origin| domains.is_allowed_origin(origin))
            },
        ))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}
