use serde_json::{json, Value};

/// `/bot/owner` answer naming the owner of the bot.
pub fn owner(discord_id: &str) -> Value {
    json!({ "id": discord_id })
}

/// `/api/domain` answer for a storefront domain.
pub fn domain(domain: &str) -> Value {
    json!({ "domain": domain })
}

/// `/get/email` answer for a billing email.
pub fn email(email: &str) -> Value {
    json!({ "email": email })
}

/// `/seller/get/accounts` answer.
pub fn seller_accounts(seller: bool) -> Value {
    json!({ "seller": seller, "accounts": [] })
}
