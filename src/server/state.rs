//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Configuration loaded from the environment
//! - HTTP client for Discord and tenant requests
//! - OAuth2 client for Discord authentication
//! - File-backed caches of tenant ports and approved domains
//! - Session table
//! - Tenant call, fan-out, lookup and proxy services

use std::sync::Arc;

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};

use crate::server::{
    config::Config,
    data::{bot::BotDirectory, domain::ApprovedDomains, port::PortRegistry, session::SessionStore},
    service::{
        backend::BackendClient, dispatch::FanOutDispatcher, domain::DomainResolver,
        proxy::ReverseProxy,
    },
    util::{clock::Clock, limit::OutboundLimiter},
};

/// Type alias for the OAuth2 client configured for Discord authentication.
pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone: caches and services share their inner state
/// through `Arc`, and `reqwest::Client` is reference counted internally.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// HTTP client for Discord API calls.
    ///
    /// Configured without redirects. Its connection pool is shared with the tenant
    /// client and the storefront proxy.
    pub http_client: reqwest::Client,

    /// OAuth2 client for the Discord login flow.
    pub oauth_client: OAuth2Client,

    pub ports: PortRegistry,
    pub domains: ApprovedDomains,
    pub sessions: SessionStore,

    /// Calls to a single tenant service.
    pub backend: BackendClient,
    /// Calls to every tenant service at once.
    pub dispatcher: FanOutDispatcher,
    /// Custom domain, email and seller lookups.
    pub resolver: DomainResolver,
    /// Forwarding to the storefront renderer.
    pub proxy: ReverseProxy,
}

impl AppState {
    /// Creates the application state from configuration and shared clients.
    ///
    /// Every cache starts empty and is filled on first use.
    ///
    /// # Arguments
    /// - `config` - Application configuration
    /// - `http_client` - Pooled HTTP client
    /// - `oauth_client` - OAuth2 client for Discord authentication
    /// - `clock` - Time source for caches and sessions
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        config: Config,
        http_client: reqwest::Client,
        oauth_client: OAuth2Client,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ports = PortRegistry::new(&config.ports_file, Arc::clone(&clock));
        let bots = BotDirectory::new(&config.bots_dir, Arc::clone(&clock));
        let domains = ApprovedDomains::new(&config.custom_domains_file, Arc::clone(&clock));
        let sessions = SessionStore::new(config.session_lifetime, Arc::clone(&clock));

        let limiter = OutboundLimiter::default();
        let backend = BackendClient::new(
            http_client.clone(),
            config.bot_service_host.clone(),
            config.internal_api_key.clone(),
            limiter.clone(),
        );
        let dispatcher = FanOutDispatcher::new(backend.clone(), bots, ports.clone());
        let resolver = DomainResolver::new(dispatcher.clone(), config.primary_domains.clone());
        let proxy = ReverseProxy::new(
            http_client.clone(),
            &config.shop_frontend_host,
            config.shop_frontend_port,
            limiter,
        );

        Self {
            config: Arc::new(config),
            http_client,
            oauth_client,
            ports,
            domains,
            sessions,
            backend,
            dispatcher,
            resolver,
            proxy,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Configuration pointed at the fixture files of a test deployment.
    ///
    /// Tenant calls and the storefront proxy go to `127.0.0.1`; Discord endpoints
    /// point at an unroutable placeholder until a test overrides them.
    pub fn test_config(test: &test_utils::context::TestContext) -> Config {
        Config {
            bind_address: ([127, 0, 0, 1], 0).into(),
            api_key: "admin-key".to_string(),
            internal_api_key: "internal-key".to_string(),
            bot_service_host: "127.0.0.1".to_string(),
            shop_frontend_host: "127.0.0.1".to_string(),
            shop_frontend_port: test.renderer_port().unwrap_or(1),
            ports_file: test.ports_file.clone(),
            bots_dir: test.bots_dir.clone(),
            custom_domains_file: test.domains_file.clone(),
            static_dir: test.static_dir.clone(),
            session_lifetime: chrono::Duration::hours(24),
            primary_domains: vec!["v2.noemt.dev".to_string(), "localhost".to_string()],
            cookie_domain: "noemt.dev".to_string(),
            transcript_denied_url: "https://noemt.dev/denied".to_string(),
            discord_client_id: "client".to_string(),
            discord_client_secret: "secret".to_string(),
            discord_redirect_url: "http://localhost/auth/discord/callback".to_string(),
            discord_auth_url: "http://discord.invalid/oauth2/authorize".to_string(),
            discord_token_url: "http://discord.invalid/api/oauth2/token".to_string(),
            discord_user_url: "http://discord.invalid/api/users/@me".to_string(),
        }
    }

    /// State built from `config` with a fresh HTTP client.
    pub fn from_test_config(config: Config, clock: Arc<dyn Clock>) -> Self {
        let http_client = reqwest::Client::new();
        let oauth_client = crate::server::startup::setup_oauth_client(&config)
            .unwrap_or_else(|e| panic!("test OAuth client: {}", e));

        Self::new(config, http_client, oauth_client, clock)
    }

    /// State pointed at the fixture files of a test deployment.
    pub fn for_test(test: &test_utils::context::TestContext, clock: Arc<dyn Clock>) -> Self {
        Self::from_test_config(Self::test_config(test), clock)
    }
}
