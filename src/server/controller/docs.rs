use axum::Json;
use utoipa::OpenApi;

use crate::{
    model::{
        api::ErrorDto,
        auth::{CacheTokenDto, CurrentUserDto, SessionStatsDto},
        tenant::{
            BotExtendedDto, BotNameDto, BotStatsDto, CreditsAddedDto, FanOutSummaryDto,
            ServerResultDto,
        },
    },
    server::controller::{
        admin::{self, ADMIN_TAG},
        auth::{self, AUTH_TAG},
        bot::{self, BOT_TAG},
        domain::{self, DOMAIN_TAG},
        seller::{self, SELLER_TAG},
        transcript::{self, TRANSCRIPT_TAG},
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Listing Gateway", description = "Parent API of the listing bots"),
    paths(
        auth::login,
        auth::callback,
        auth::logout,
        auth::me,
        auth::token,
        auth::session_stats,
        bot::get_auth_bots,
        bot::get_auth_users,
        bot::get_listed_items,
        bot::get_auth_actions,
        bot::get_config,
        bot::update_config,
        bot::get_channels,
        bot::get_roles,
        bot::verify_user,
        bot::unlist_item,
        bot::get_shop_info,
        bot::open_ticket,
        bot::get_users_info,
        bot::get_stats,
        bot::dashboard,
        seller::get_accounts,
        seller::get_configuration,
        seller::update_configuration,
        seller::list_item,
        admin::extend_bot,
        admin::add_ai_credits,
        admin::get_all_accounts,
        domain::check_domain,
        domain::custom_bot_name,
        transcript::get_transcript,
    ),
    components(schemas(
        ErrorDto,
        CurrentUserDto,
        CacheTokenDto,
        SessionStatsDto,
        BotNameDto,
        BotStatsDto,
        BotExtendedDto,
        CreditsAddedDto,
        ServerResultDto,
        FanOutSummaryDto,
    )),
    tags(
        (name = AUTH_TAG, description = "Discord login and sessions"),
        (name = BOT_TAG, description = "Calls forwarded to a single bot"),
        (name = SELLER_TAG, description = "Seller calls broadcast to every bot"),
        (name = ADMIN_TAG, description = "API key protected administration"),
        (name = DOMAIN_TAG, description = "Custom domain lookups"),
        (name = TRANSCRIPT_TAG, description = "Ticket transcripts"),
    )
)]
pub struct ApiDoc;

/// The OpenAPI document of every JSON endpoint.
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
