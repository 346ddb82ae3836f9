use oauth2::{CsrfToken, Scope};
use url::Url;

use crate::server::service::oauth::DiscordAuthService;

impl<'a> DiscordAuthService<'a> {
    /// Builds the Discord authorize URL.
    ///
    /// The page to return to after login travels through Discord as the OAuth `state`
    /// parameter and is read back verbatim by the callback.
    ///
    /// # Arguments
    /// - `redirect_url` - Where to send the user once logged in
    pub fn login_url(&self, redirect_url: Option<String>) -> Url {
        let state = redirect_url.unwrap_or_default();

        let (authorize_url, _state) = self
            .oauth_client
            .authorize_url(move || CsrfToken::new(state))
            .add_scope(Scope::new("identify".to_string()))
            .url();

        authorize_url
    }
}
