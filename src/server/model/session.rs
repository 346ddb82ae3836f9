//! Domain model for authenticated sessions.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::auth::CurrentUserDto;

/// A logged-in Discord user.
///
/// Sessions are created after a successful OAuth exchange and are only ever
/// mutated by `SessionStore`. `expires_at` is always `created_at` plus the
/// configured lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Opaque identifier carried by the `session_id` cookie.
    pub session_id: String,
    /// Discord ID of the user.
    pub subject_id: String,
    /// Discord `/users/@me` payload captured at login.
    pub attributes: Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is visible to readers at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.created_at <= now && now < self.expires_at
    }

    /// Display name used in access logs.
    pub fn username(&self) -> &str {
        self.attributes
            .get("username")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
    }

    pub fn into_dto(self) -> CurrentUserDto {
        CurrentUserDto {
            discord_id: self.subject_id,
            user_info: self.attributes,
            authenticated: true,
        }
    }
}
