use serde_json::Value;

use crate::server::{
    data::port::PortRegistry,
    error::{backend::BackendError, AppError},
    service::backend::BackendClient,
};

/// Forwards calls made on behalf of an inbound request to one named bot.
pub struct TenantService<'a> {
    ports: &'a PortRegistry,
    backend: &'a BackendClient,
}

impl<'a> TenantService<'a> {
    pub fn new(ports: &'a PortRegistry, backend: &'a BackendClient) -> Self {
        Self { ports, backend }
    }

    /// Port of the named bot.
    ///
    /// # Returns
    /// - `Ok(u16)` - The bot's port
    /// - `Err(AppError::NotFound)` - No port configured for the bot
    /// - `Err(AppError::ConfigErr)` - The ports file could not be loaded
    pub async fn port(&self, bot: &str) -> Result<u16, AppError> {
        self.ports
            .get_port(bot)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bot '{}' not found", bot)))
    }

    /// Sends a call to the named bot and returns its JSON answer.
    ///
    /// The call is a `POST` when `body` is given, a `GET` otherwise.
    ///
    /// # Arguments
    /// - `bot` - Name of the bot
    /// - `path` - Path, optionally with a query string, on the bot's service
    /// - `body` - Optional JSON body
    /// - `action` - Description of the operation used in error messages, e.g. `fetch stats`
    ///
    /// # Returns
    /// - `Ok(Value)` - The bot's answer
    /// - `Err(AppError::NotFound)` - Unknown bot
    /// - `Err(AppError::BackendErr)` - The bot was unreachable, timed out, or answered an error
    pub async fn call(
        &self,
        bot: &str,
        path: &str,
        body: Option<&Value>,
        action: &'static str,
    ) -> Result<Value, AppError> {
        let port = self.port(bot).await?;
        self.call_port(bot, port, path, body, action).await
    }

    /// Same as `call` for a bot whose port is already known.
    pub async fn call_port(
        &self,
        bot: &str,
        port: u16,
        path: &str,
        body: Option<&Value>,
        action: &'static str,
    ) -> Result<Value, AppError> {
        let result = match body {
            Some(body) => self.backend.post(port, path, body).await,
            None => self.backend.get(port, path).await,
        };

        result.map_err(|failure| BackendError::new(bot, action, failure).into())
    }
}
