use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No session cookie, or the session it names is unknown or expired.
    ///
    /// Results in a 401 Unauthorized with a `WWW-Authenticate` challenge.
    #[error("Authentication required")]
    Unauthenticated,

    /// The authenticated user is not the owner of the requested bot.
    ///
    /// Results in a 403 Forbidden.
    #[error("Discord user {user_id} is not the owner of bot '{bot}'")]
    NotBotOwner { user_id: String, bot: String },

    /// The bot did not answer the ownership check.
    ///
    /// Results in a 503 Service Unavailable.
    #[error("Unable to verify ownership of bot '{bot}': {reason}")]
    OwnershipUnverifiable { bot: String, reason: String },

    /// The authenticated user is not a seller on any tenant.
    ///
    /// Results in a 403 Forbidden.
    #[error("Discord user {0} is not a seller in any server")]
    NotSeller(String),

    /// The `api_key` supplied to an administrative endpoint does not match.
    ///
    /// Results in a 403 Forbidden.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Discord rejected the authorization code exchange.
    ///
    /// Results in a 400 Bad Request.
    #[error("Failed to exchange Discord authorization code: {0}")]
    TokenExchange(String),

    /// Discord did not return the user behind a freshly issued access token.
    ///
    /// Results in a 400 Bad Request.
    #[error("Failed to retrieve Discord user information: {0}")]
    UserInfo(String),
}

/// Converts authentication errors into HTTP responses.
///
/// Every variant is logged at debug level; client-facing messages stay generic so
/// that ownership details of other users are not leaked.
///
/// # Returns
/// - 400 Bad Request - OAuth exchange failures
/// - 401 Unauthorized - Missing or expired session
/// - 403 Forbidden - Not an owner, not a seller, or wrong API key
/// - 503 Service Unavailable - Ownership could not be checked
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        dioxus_logger::tracing::debug!("{}", self);

        let (status, message) = match &self {
            Self::Unauthenticated => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(ErrorDto {
                        error: "Authentication required. Please login with Discord first."
                            .to_string(),
                    }),
                )
                    .into_response();
            }
            Self::NotBotOwner { bot, .. } => (
                StatusCode::FORBIDDEN,
                format!("Access denied. You are not the owner of bot '{}'", bot),
            ),
            Self::OwnershipUnverifiable { reason, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Unable to verify bot ownership: {}", reason),
            ),
            Self::NotSeller(_) => (
                StatusCode::FORBIDDEN,
                "Access denied. You are not a seller in any server.".to_string(),
            ),
            Self::InvalidApiKey => (StatusCode::FORBIDDEN, "Invalid API key".to_string()),
            Self::TokenExchange(_) => (
                StatusCode::BAD_REQUEST,
                "Failed to retrieve access token".to_string(),
            ),
            Self::UserInfo(_) => (
                StatusCode::BAD_REQUEST,
                "Failed to retrieve user information".to_string(),
            ),
        };

        (status, Json(ErrorDto { error: message })).into_response()
    }
}
