//! Validated seller request bodies broadcast to every bot.

use serde_json::{Map, Value};

use crate::server::{error::AppError, util::json::is_truthy};

const ITEM_TYPES: [&str; 3] = ["account", "profile", "alt"];

/// Body of `POST /api/seller/list`, tagged with the seller's Discord ID.
pub struct ListItemParam(pub Value);

impl ListItemParam {
    /// Validates the listing and injects `user_id`.
    ///
    /// # Arguments
    /// - `body` - Inbound JSON body
    /// - `user_id` - Discord ID of the authenticated seller
    ///
    /// # Returns
    /// - `Ok(ListItemParam)` - Body ready to be broadcast
    /// - `Err(AppError::BadRequest)` - Missing or invalid `type`, `item`, `username` or `price`
    pub fn parse(body: Value, user_id: &str) -> Result<Self, AppError> {
        let mut object = non_empty_object(body, "Request body must be a JSON object with item data")?;

        let item_type = object
            .get("type")
            .filter(|value| is_truthy(value))
            .ok_or_else(|| {
                AppError::BadRequest("type is required (account, profile, or alt)".to_string())
            })?;

        let item = object
            .get("item")
            .and_then(Value::as_object)
            .filter(|item| !item.is_empty())
            .ok_or_else(|| {
                AppError::BadRequest("item data is required and must be an object".to_string())
            })?;

        if !item_type
            .as_str()
            .is_some_and(|item_type| ITEM_TYPES.contains(&item_type))
        {
            return Err(AppError::BadRequest(
                "type must be 'account', 'profile', or 'alt'".to_string(),
            ));
        }

        if !item.get("username").is_some_and(is_truthy) {
            return Err(AppError::BadRequest(
                "username is required in item data".to_string(),
            ));
        }

        let price_valid = item
            .get("price")
            .and_then(Value::as_f64)
            .is_some_and(|price| price >= 0.0);
        if !price_valid {
            return Err(AppError::BadRequest(
                "price must be a non-negative number".to_string(),
            ));
        }

        object.insert("user_id".to_string(), Value::String(user_id.to_string()));

        Ok(Self(Value::Object(object)))
    }
}

/// Body of `POST /api/seller/configuration`, tagged with the seller's Discord ID.
pub struct SellerConfigParam(pub Value);

impl SellerConfigParam {
    pub fn parse(body: Value, user_id: &str) -> Result<Self, AppError> {
        let mut object = non_empty_object(
            body,
            "Request body must be a JSON object with configuration updates",
        )?;

        object.insert("user_id".to_string(), Value::String(user_id.to_string()));

        Ok(Self(Value::Object(object)))
    }
}

fn non_empty_object(body: Value, message: &str) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(object) if !object.is_empty() => Ok(object),
        _ => Err(AppError::BadRequest(message.to_string())),
    }
}
