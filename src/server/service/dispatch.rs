//! Fan-out of the same tenant call to every tenant.
//!
//! The tenant set is every bot in the `BotDirectory` that also has a port in the
//! `PortRegistry`. Each call runs in its own task on a `JoinSet`; a failing or
//! panicking call only affects its own slot of the result.

use std::{sync::Arc, time::Duration};

use dioxus_logger::tracing;
use reqwest::Method;
use serde_json::Value;
use tokio::task::JoinSet;

use crate::server::{
    data::{bot::BotDirectory, port::PortRegistry},
    error::{backend::BackendFailure, config::ConfigError},
    model::{
        dispatch::{DispatchResult, FanOut},
        tenant::{TenantMatch, TenantTarget},
    },
    service::backend::{BackendClient, BackendResult},
};

#[derive(Clone)]
pub struct FanOutDispatcher {
    backend: BackendClient,
    bots: BotDirectory,
    ports: PortRegistry,
}

impl FanOutDispatcher {
    pub fn new(backend: BackendClient, bots: BotDirectory, ports: PortRegistry) -> Self {
        Self {
            backend,
            bots,
            ports,
        }
    }

    /// Tenants a fan-out is sent to, in scheduling order.
    ///
    /// Bots without a configured port are skipped silently.
    ///
    /// # Returns
    /// - `Ok(Vec<TenantTarget>)` - Bots with a port, sorted by name
    /// - `Err(ConfigError::Unavailable)` - The ports file could not be loaded
    pub async fn targets(&self) -> Result<Vec<TenantTarget>, ConfigError> {
        let ports = self.ports.get_ports().await?;
        let bots = self.bots.list().await;

        Ok(bots
            .iter()
            .filter_map(|bot| {
                ports.get(bot).map(|port| TenantTarget {
                    tenant_id: bot.clone(),
                    port: *port,
                })
            })
            .collect())
    }

    /// Sends the same call to every tenant and waits for all of them.
    ///
    /// A tenant that does not answer within `timeout` gets a `Timeout` slot, so the
    /// whole fan-out completes within roughly one `timeout`.
    ///
    /// # Arguments
    /// - `endpoint` - Path and optional query string sent to each tenant
    /// - `method` - HTTP method
    /// - `body` - Optional JSON body, identical for every tenant
    /// - `timeout` - Timeout of each individual call
    ///
    /// # Returns
    /// - `Ok(FanOut)` - Exactly one result per tenant, in scheduling order
    /// - `Err(ConfigError::Unavailable)` - The ports file could not be loaded
    pub async fn dispatch_all(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
        timeout: Duration,
    ) -> Result<FanOut, ConfigError> {
        let targets = self.targets().await?;
        let body = body.map(Arc::new);

        let mut tasks = JoinSet::new();
        for (index, target) in targets.iter().enumerate() {
            let backend = self.backend.clone();
            let endpoint = endpoint.to_string();
            let method = method.clone();
            let body = body.clone();
            let port = target.port;

            tasks.spawn(async move {
                let result = backend
                    .request(port, &endpoint, method, timeout, body.as_deref())
                    .await;
                (index, result)
            });
        }

        let mut outcomes: Vec<Option<BackendResult>> = (0..targets.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => outcomes[index] = Some(result),
                Err(e) => tracing::error!("Fan-out call to {} failed to complete: {}", endpoint, e),
            }
        }

        let results = targets
            .into_iter()
            .zip(outcomes)
            .map(|(target, outcome)| DispatchResult {
                tenant_id: target.tenant_id,
                port: target.port,
                outcome: outcome.unwrap_or_else(|| {
                    Err(BackendFailure::Failed("task did not complete".to_string()))
                }),
            })
            .collect();

        Ok(FanOut { results })
    }

    /// Probes every tenant and returns the first one whose answer satisfies `predicate`.
    ///
    /// "First" is by scheduling order, not completion order: a match is returned as
    /// soon as every earlier-scheduled probe has completed without matching. Probes
    /// still running at that point are aborted. Failed probes never match.
    ///
    /// # Arguments
    /// - `endpoint` - Path and optional query string sent to each tenant
    /// - `timeout` - Timeout of each individual probe
    /// - `predicate` - Test applied to each successful JSON answer
    ///
    /// # Returns
    /// - `Ok(Some(TenantMatch))` - The first matching tenant
    /// - `Ok(None)` - No tenant matched
    /// - `Err(ConfigError::Unavailable)` - The ports file could not be loaded
    pub async fn dispatch_first_match<F>(
        &self,
        endpoint: &str,
        timeout: Duration,
        predicate: F,
    ) -> Result<Option<TenantMatch>, ConfigError>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let targets = self.targets().await?;
        let predicate = Arc::new(predicate);

        let mut tasks = JoinSet::new();
        for (index, target) in targets.iter().enumerate() {
            let backend = self.backend.clone();
            let endpoint = endpoint.to_string();
            let predicate = Arc::clone(&predicate);
            let port = target.port;

            tasks.spawn(async move {
                let matched = backend
                    .request(port, &endpoint, Method::GET, timeout, None)
                    .await
                    .is_ok_and(|data| predicate(&data));
                (index, matched)
            });
        }

        let mut matched: Vec<Option<bool>> = vec![None; targets.len()];
        let mut next = 0;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, is_match)) => matched[index] = Some(is_match),
                Err(e) => tracing::error!("Probe of {} failed to complete: {}", endpoint, e),
            }

            while next < targets.len() {
                match matched[next] {
                    Some(true) => return Ok(Some(targets[next].clone().into())),
                    Some(false) => next += 1,
                    None => break,
                }
            }

            if next == targets.len() {
                return Ok(None);
            }
        }

        // Only reached when a probe panicked; its slot counts as a miss.
        Ok(targets
            .into_iter()
            .zip(matched)
            .skip(next)
            .find(|(_, is_match)| *is_match == Some(true))
            .map(|(target, _)| target.into()))
    }
}
