use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Tenant owning the custom domain a request came from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct BotNameDto {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct BotStatsDto {
    pub bot_name: String,
    #[schema(value_type = Object)]
    pub stats: Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct BotExtendedDto {
    pub success: bool,
    pub bot_name: String,
    pub days_extended: u32,
    #[schema(value_type = Object)]
    pub result: Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreditsAddedDto {
    pub success: bool,
    pub bot_name: String,
    pub applied_credits: u32,
    #[schema(value_type = Object)]
    pub result: Value,
}

/// Outcome of one tenant inside a fan-out summary.
///
/// Exactly one of `data` (success) or `error` (failure) is present.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ServerResultDto {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate of the same request sent to every tenant.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct FanOutSummaryDto {
    pub total_servers: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    /// Per-tenant outcome keyed by tenant name.
    pub servers: BTreeMap<String, ServerResultDto>,
}
