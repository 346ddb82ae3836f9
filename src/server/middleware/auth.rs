use axum::http::HeaderMap;
use dioxus_logger::tracing;
use serde_json::Value;

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::session::SessionCookie,
    model::session::Session,
    state::AppState,
};

pub enum Permission {
    /// The user owns the named bot, as reported by the bot's `/bot/owner`.
    BotOwner(String),
    /// The user is a seller on at least one bot.
    Seller,
}

pub struct AuthGuard<'a> {
    state: &'a AppState,
    headers: &'a HeaderMap,
}

impl<'a> AuthGuard<'a> {
    pub fn new(state: &'a AppState, headers: &'a HeaderMap) -> Self {
        Self { state, headers }
    }

    /// Returns the active session named by the request's cookie, if any.
    pub async fn session(&self) -> Option<Session> {
        let session_id = SessionCookie::new(self.headers).session_id()?;

        let session = self.state.sessions.get(&session_id).await;
        if session.is_none() {
            tracing::debug!("No valid session found for the session_id cookie");
        }

        session
    }

    /// Requires an authenticated session holding every listed permission.
    ///
    /// Permissions are checked in order and the first failing one is reported.
    ///
    /// # Arguments
    /// - `permissions` - Permissions the user must hold, possibly none
    ///
    /// # Returns
    /// - `Ok(Session)` - The caller's session
    /// - `Err(AuthError::Unauthenticated)` - No active session
    /// - `Err(AppError::NotFound)` - `BotOwner` names a bot without a port
    /// - `Err(AuthError::OwnershipUnverifiable)` - The bot did not answer the ownership check
    /// - `Err(AuthError::NotBotOwner)` - The user does not own the bot
    /// - `Err(AuthError::NotSeller)` - The user is not a seller anywhere
    pub async fn require(&self, permissions: &[Permission]) -> Result<Session, AppError> {
        let Some(session) = self.session().await else {
            return Err(AuthError::Unauthenticated.into());
        };

        for permission in permissions {
            match permission {
                Permission::BotOwner(bot) => self.require_owner(&session, bot).await?,
                Permission::Seller => self.require_seller(&session).await?,
            }
        }

        Ok(session)
    }

    async fn require_owner(&self, session: &Session, bot: &str) -> Result<(), AppError> {
        let Some(port) = self.state.ports.get_port(bot).await? else {
            return Err(AppError::NotFound(format!("Bot '{}' not found", bot)));
        };

        let owner = self
            .state
            .backend
            .get(port, "/bot/owner")
            .await
            .map_err(|failure| {
                tracing::warn!(
                    "Failed to check ownership for bot {}: {}",
                    bot,
                    failure.message()
                );
                AuthError::OwnershipUnverifiable {
                    bot: bot.to_string(),
                    reason: failure.message(),
                }
            })?;

        let owner_id = match owner.get("id") {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };

        if owner_id.as_deref() != Some(session.subject_id.as_str()) {
            tracing::info!(
                "Access denied: Discord user {} is not owner of bot {}",
                session.subject_id,
                bot
            );
            return Err(AuthError::NotBotOwner {
                user_id: session.subject_id.clone(),
                bot: bot.to_string(),
            }
            .into());
        }

        tracing::info!(
            "Bot {} accessed by owner {} ({})",
            bot,
            session.subject_id,
            session.username()
        );

        Ok(())
    }

    async fn require_seller(&self, session: &Session) -> Result<(), AppError> {
        if !self.state.resolver.is_seller(&session.subject_id).await? {
            tracing::info!(
                "Access denied: Discord user {} is not a seller in any server",
                session.subject_id
            );
            return Err(AuthError::NotSeller(session.subject_id.clone()).into());
        }

        tracing::info!(
            "Seller access granted to {} ({})",
            session.subject_id,
            session.username()
        );

        Ok(())
    }
}
