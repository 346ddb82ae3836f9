use serde_json::{json, Value};

/// Discord `/users/@me` payload.
pub fn user(discord_id: &str, username: &str) -> Value {
    json!({
        "id": discord_id,
        "username": username,
        "global_name": username,
        "avatar": null,
        "discriminator": "0",
    })
}
