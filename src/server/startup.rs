use std::time::Duration;

use oauth2::{basic::BasicClient, AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use tokio_cron_scheduler::JobScheduler;

use crate::server::{
    config::Config,
    error::{config::ConfigError, AppError},
    scheduler::session_cleanup,
    state::{AppState, OAuth2Client},
};

const USER_AGENT: &str = "ListingGateway/1.0";
const IDLE_CONNECTIONS_PER_HOST: usize = 30;

/// Builds the pooled HTTP client shared by Discord, tenant and storefront calls.
///
/// Redirects are never followed so a tenant or the renderer cannot bounce a call to an
/// arbitrary host. The pool only bounds idle sockets; active calls to tenants and the
/// renderer are capped by `OutboundLimiter`.
///
/// # Returns
/// - `Ok(reqwest::Client)` - Configured client
/// - `Err(AppError::ReqwestErr)` - TLS backend could not be initialized
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(IDLE_CONNECTIONS_PER_HOST)
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()?;

    Ok(client)
}

/// Builds the Discord OAuth2 client from configuration.
///
/// # Returns
/// - `Ok(OAuth2Client)` - Client with authorize, token and redirect URLs set
/// - `Err(ConfigError::InvalidEnvVar)` - One of the URLs is malformed
pub fn setup_oauth_client(config: &Config) -> Result<OAuth2Client, ConfigError> {
    let invalid = |name: &str, value: &str| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value: value.to_string(),
    };

    let auth_url = AuthUrl::new(config.discord_auth_url.clone())
        .map_err(|_| invalid("DISCORD_AUTH_URL", &config.discord_auth_url))?;
    let token_url = TokenUrl::new(config.discord_token_url.clone())
        .map_err(|_| invalid("DISCORD_TOKEN_URL", &config.discord_token_url))?;
    let redirect_url = RedirectUrl::new(config.discord_redirect_url.clone())
        .map_err(|_| invalid("DISCORD_REDIRECT_URI", &config.discord_redirect_url))?;

    let client = BasicClient::new(ClientId::new(config.discord_client_id.clone()))
        .set_client_secret(ClientSecret::new(config.discord_client_secret.clone()))
        .set_auth_uri(auth_url)
        .set_token_uri(token_url)
        .set_redirect_uri(redirect_url);

    Ok(client)
}

/// Starts the background jobs.
///
/// # Returns
/// - `Ok(JobScheduler)` - Running scheduler; keep it alive for the process lifetime
/// - `Err(AppError::SchedulerErr)` - A job could not be registered or started
pub async fn start_scheduler(state: &AppState) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    session_cleanup::register(&scheduler, state.sessions.clone()).await?;

    scheduler.start().await?;

    Ok(scheduler)
}
