//! Per-tenant outcomes of a fan-out call.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    model::tenant::{FanOutSummaryDto, ServerResultDto},
    server::error::backend::BackendFailure,
};

/// Outcome of one tenant's call within a fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub tenant_id: String,
    pub port: u16,
    pub outcome: Result<Value, BackendFailure>,
}

impl DispatchResult {
    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn into_dto(self) -> ServerResultDto {
        match self.outcome {
            Ok(data) => ServerResultDto {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(failure) => ServerResultDto {
                success: false,
                data: None,
                error: Some(failure.message()),
            },
        }
    }
}

/// Every tenant's outcome for one fan-out call, in scheduling order.
///
/// Holds exactly one entry per tenant that had a configured port, however many of
/// the calls failed or timed out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanOut {
    pub results: Vec<DispatchResult>,
}

impl FanOut {
    pub fn successful(&self) -> usize {
        self.results.iter().filter(|result| result.success()).count()
    }

    /// Aggregates the fan-out into the seller summary keyed by tenant.
    pub fn into_summary(self) -> FanOutSummaryDto {
        let total_servers = self.results.len();
        let successful_requests = self.successful();

        let servers: BTreeMap<String, ServerResultDto> = self
            .results
            .into_iter()
            .map(|result| (result.tenant_id.clone(), result.into_dto()))
            .collect();

        FanOutSummaryDto {
            total_servers,
            successful_requests,
            failed_requests: total_servers - successful_requests,
            servers,
        }
    }
}
