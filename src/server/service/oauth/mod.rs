//! OAuth2 login with Discord

use crate::server::state::OAuth2Client;

pub mod callback;
pub mod login;

pub struct DiscordAuthService<'a> {
    pub oauth_client: &'a OAuth2Client,
    pub http_client: &'a reqwest::Client,
    /// Discord endpoint returning the user behind an access token.
    pub user_url: &'a str,
}

impl<'a> DiscordAuthService<'a> {
    pub fn new(
        oauth_client: &'a OAuth2Client,
        http_client: &'a reqwest::Client,
        user_url: &'a str,
    ) -> Self {
        Self {
            oauth_client,
            http_client,
            user_url,
        }
    }
}
