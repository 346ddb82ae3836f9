use std::{net::SocketAddr, path::PathBuf};

use chrono::TimeDelta;

use crate::server::error::{config::ConfigError, AppError};

const DISCORD_AUTH_URL: &str = "https://discord.com/api/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_USER_URL: &str = "https://discord.com/api/users/@me";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:7000";
const DEFAULT_SERVICE_HOST: &str = "127.0.0.1";
const DEFAULT_SHOP_FRONTEND_PORT: u16 = 7878;
const DEFAULT_SESSION_LIFETIME_HOURS: &str = "24";
const DEFAULT_PRIMARY_DOMAINS: &str = "v2.noemt.dev,noemt.dev,localhost:7000,localhost:3000";
const DEFAULT_COOKIE_DOMAIN: &str = "noemt.dev";

pub struct Config {
    pub bind_address: SocketAddr,

    /// Key guarding the administrative endpoints (`/bot/extend`, `/ai/credits/add`, ...).
    pub api_key: String,
    /// Shared secret appended to every call made to a tenant service.
    pub internal_api_key: String,

    pub bot_service_host: String,
    pub shop_frontend_host: String,
    pub shop_frontend_port: u16,

    pub ports_file: PathBuf,
    pub bots_dir: PathBuf,
    pub custom_domains_file: PathBuf,
    pub static_dir: PathBuf,

    /// Lifetime of a login session, always positive.
    pub session_lifetime: TimeDelta,
    /// Hosts owned by the platform itself, never resolved to a tenant.
    pub primary_domains: Vec<String>,
    /// Parent domain the session cookie is scoped to when the login redirect targets it.
    pub cookie_domain: String,
    pub transcript_denied_url: String,

    pub discord_client_id: String,
    pub discord_client_secret: String,
    pub discord_redirect_url: String,

    pub discord_auth_url: String,
    pub discord_token_url: String,
    pub discord_user_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let server_host = optional_env("SERVER_HOST", DEFAULT_SERVICE_HOST);

        Ok(Self {
            bind_address: parse_env("BIND_ADDRESS", DEFAULT_BIND_ADDRESS)?,
            api_key: optional_env("API_KEY", ""),
            internal_api_key: optional_env("INTERNAL_API_KEY", ""),
            bot_service_host: optional_env("BOT_SERVICE_HOST", &server_host),
            shop_frontend_host: optional_env("SHOP_FRONTEND_HOST", &server_host),
            shop_frontend_port: parse_env(
                "SHOP_FRONTEND_PORT",
                &DEFAULT_SHOP_FRONTEND_PORT.to_string(),
            )?,
            ports_file: optional_env("PORTS_FILE", "./ports.json").into(),
            bots_dir: optional_env("BOTS_DIR", "../").into(),
            custom_domains_file: optional_env("CUSTOM_DOMAINS_FILE", "custom_domains.json").into(),
            static_dir: optional_env("STATIC_DIR", "static").into(),
            session_lifetime: session_lifetime(&optional_env(
                "SESSION_LIFETIME_HOURS",
                DEFAULT_SESSION_LIFETIME_HOURS,
            ))?,
            primary_domains: split_list(&optional_env("PRIMARY_DOMAINS", DEFAULT_PRIMARY_DOMAINS)),
            cookie_domain: optional_env("COOKIE_DOMAIN", DEFAULT_COOKIE_DOMAIN),
            transcript_denied_url: optional_env("TRANSCRIPT_DENIED_URL", "/"),
            discord_client_id: required_env("DISCORD_CLIENT_ID")?,
            discord_client_secret: required_env("DISCORD_CLIENT_SECRET")?,
            discord_redirect_url: required_env("DISCORD_REDIRECT_URI")?,
            discord_auth_url: DISCORD_AUTH_URL.to_string(),
            discord_token_url: DISCORD_TOKEN_URL.to_string(),
            discord_user_url: DISCORD_USER_URL.to_string(),
        })
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(name: &str, default: &str) -> Result<T, ConfigError> {
    let value = optional_env(name, default);

    value.parse::<T>().map_err(|_| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value,
    })
}

/// Parses a session lifetime given in whole hours.
///
/// # Returns
/// - `Ok(TimeDelta)` - A positive lifetime
/// - `Err(ConfigError::InvalidEnvVar)` - Not a number, not positive, or too large
fn session_lifetime(value: &str) -> Result<TimeDelta, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|hours| *hours > 0)
        .and_then(TimeDelta::try_hours)
        .ok_or_else(|| ConfigError::InvalidEnvVar {
            name: "SESSION_LIFETIME_HOURS".to_string(),
            value: value.to_string(),
        })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}
