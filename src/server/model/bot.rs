//! Validated request bodies forwarded to a single bot.
//!
//! Bodies are kept as raw JSON because each bot owns its payload schema; only the
//! keys the gateway relies on are checked before forwarding.

use serde_json::Value;

use crate::server::error::AppError;

/// Body of `POST /api/bot/{bot}/verify/user`.
pub struct VerifyUserParam(pub Value);

impl VerifyUserParam {
    /// Requires an `action_id` holding an integer, or a string that parses as one.
    pub fn parse(body: Value) -> Result<Self, AppError> {
        match body.get("action_id") {
            None | Some(Value::Null) => {
                return Err(AppError::BadRequest("action_id is required".to_string()))
            }
            Some(value) if !is_integer(value) => {
                return Err(AppError::BadRequest(
                    "action_id must be a valid integer".to_string(),
                ))
            }
            _ => {}
        }

        Ok(Self(body))
    }
}

/// Body of `POST /api/bot/{bot}/unlist/item`.
pub struct UnlistItemParam(pub Value);

impl UnlistItemParam {
    pub fn parse(body: Value) -> Result<Self, AppError> {
        let channel_id = body.get("channel_id").filter(|value| !value.is_null());
        let message_id = body.get("message_id").filter(|value| !value.is_null());

        let (Some(channel_id), Some(message_id)) = (channel_id, message_id) else {
            return Err(AppError::BadRequest(
                "Both channel_id and message_id are required".to_string(),
            ));
        };

        if !is_integer(channel_id) || !is_integer(message_id) {
            return Err(AppError::BadRequest(
                "channel_id and message_id must be valid integers".to_string(),
            ));
        }

        Ok(Self(body))
    }
}

/// Body of `POST /api/bot/{bot}/users/info`, normalized to the list of user IDs the
/// bot expects.
pub struct UsersInfoParam(pub Vec<Value>);

impl UsersInfoParam {
    /// Accepts either a bare list or an object with a `users` list.
    ///
    /// # Returns
    /// - `Ok(UsersInfoParam)` - Non-empty list of string or integer IDs
    /// - `Err(AppError::BadRequest)` - Any other shape
    pub fn parse(body: Value) -> Result<Self, AppError> {
        let users = match body {
            Value::Array(users) => Value::Array(users),
            Value::Object(mut object) if object.contains_key("users") => {
                object.remove("users").unwrap_or(Value::Null)
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Request body must be a list of user IDs or an object with a 'users' field containing a list"
                        .to_string(),
                ))
            }
        };

        let users = match users {
            Value::Array(users) if !users.is_empty() => users,
            _ => {
                return Err(AppError::BadRequest(
                    "User IDs must be provided as a non-empty list".to_string(),
                ))
            }
        };

        let valid = users
            .iter()
            .all(|user| user.is_string() || user.is_i64() || user.is_u64());
        if !valid {
            return Err(AppError::BadRequest(
                "All user IDs must be strings or integers".to_string(),
            ));
        }

        Ok(Self(users))
    }

    pub fn into_body(self) -> Value {
        Value::Array(self.0)
    }
}

/// Body of `POST /api/bot/{bot}/config`: a map of setting name to setting object.
pub struct ConfigUpdateParam(pub Value);

impl ConfigUpdateParam {
    pub fn parse(body: Value) -> Result<Self, AppError> {
        let Some(settings) = body.as_object().filter(|settings| !settings.is_empty()) else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object with configuration updates".to_string(),
            ));
        };

        for (key, setting) in settings {
            let Some(setting) = setting.as_object() else {
                return Err(AppError::BadRequest(format!(
                    "Configuration data for '{}' must be an object",
                    key
                )));
            };

            let has_value = setting.get("value").is_some_and(|value| !value.is_null());
            if has_value && !setting.contains_key("type") {
                return Err(AppError::BadRequest(format!(
                    "Configuration item '{}' must include 'type' field when value is provided",
                    key
                )));
            }
        }

        Ok(Self(body))
    }
}

/// Whether a JSON value is an integer or a string holding one.
fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.is_i64() || number.is_u64(),
        Value::String(text) => text.trim().parse::<i128>().is_ok(),
        _ => false,
    }
}
