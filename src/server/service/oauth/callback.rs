use oauth2::{AuthorizationCode, TokenResponse};
use serde_json::Value;

use crate::server::{error::auth::AuthError, service::oauth::DiscordAuthService};

/// Discord user returned by a successful login.
pub struct DiscordLogin {
    pub discord_id: String,
    /// Raw `/users/@me` payload.
    pub user_info: Value,
}

impl<'a> DiscordAuthService<'a> {
    /// Exchanges an authorization code and fetches the user behind it.
    ///
    /// # Arguments
    /// - `authorization_code` - `code` query parameter of the OAuth callback
    ///
    /// # Returns
    /// - `Ok(DiscordLogin)` - The authenticated Discord user
    /// - `Err(AuthError::TokenExchange)` - Discord rejected the code
    /// - `Err(AuthError::UserInfo)` - The user could not be fetched or has no ID
    pub async fn callback(&self, authorization_code: String) -> Result<DiscordLogin, AuthError> {
        let token = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(authorization_code))
            .request_async(self.http_client)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let user_info = self
            .fetch_discord_user(token.access_token().secret())
            .await?;

        let discord_id = match user_info.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(AuthError::UserInfo("response has no user id".to_string())),
        };

        Ok(DiscordLogin {
            discord_id,
            user_info,
        })
    }

    /// Retrieves a Discord user's information using provided access token
    async fn fetch_discord_user(&self, access_token: &str) -> Result<Value, AuthError> {
        let response = self
            .http_client
            .get(self.user_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::UserInfo(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::UserInfo(format!(
                "Discord answered with status {}",
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AuthError::UserInfo(e.to_string()))
    }
}
