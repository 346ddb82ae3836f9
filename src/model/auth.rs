use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// The authenticated Discord user behind the current session.
#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CurrentUserDto {
    pub discord_id: String,
    /// Raw Discord `/users/@me` payload captured at login.
    #[schema(value_type = Object)]
    pub user_info: Value,
    pub authenticated: bool,
}

/// Opaque token the storefront caches client-side to skip a round trip to `/auth/me`.
#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CacheTokenDto {
    /// Base64 encoded JSON `{session_id, discord_id, expires_at}`.
    pub cache_token: String,
    pub discord_id: String,
    pub expires_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct SessionStatsDto {
    pub active_sessions: usize,
    pub session_lifetime_hours: f64,
}
