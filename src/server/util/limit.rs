//! Caps on concurrent outbound calls.
//!
//! Tenant calls and storefront proxying share one `reqwest::Client`. Its pool only
//! bounds idle sockets, so active calls are bounded here: a process-wide cap and a
//! cap per upstream `host:port`. The per-host table grows with the set of upstreams
//! (one entry per tenant port plus the renderer) and is never pruned.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Maximum number of outbound calls in flight across the whole process.
pub const MAX_IN_FLIGHT_REQUESTS: usize = 100;

/// Maximum number of outbound calls in flight to a single upstream.
pub const MAX_IN_FLIGHT_PER_HOST: usize = 30;

/// Shared limiter; clones share the same permits.
#[derive(Clone)]
pub struct OutboundLimiter {
    total: Arc<Semaphore>,
    per_host_limit: usize,
    per_host: Arc<Mutex<HashMap<String, Arc<Semaphore>>>>,
}

/// Slot held for the duration of one outbound call.
pub struct OutboundPermit {
    _host: OwnedSemaphorePermit,
    _total: OwnedSemaphorePermit,
}

impl OutboundLimiter {
    pub fn new(total: usize, per_host: usize) -> Self {
        Self {
            total: Arc::new(Semaphore::new(total)),
            per_host_limit: per_host,
            per_host: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Waits for a slot towards `authority` (`host:port`).
    ///
    /// The per-host slot is taken before the process-wide one, so a single busy
    /// upstream queues on its own semaphore instead of draining the shared cap.
    /// Callers bound the wait with their own timeout.
    pub async fn acquire(&self, authority: &str) -> Result<OutboundPermit, AcquireError> {
        let host = {
            let mut per_host = self.per_host.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                per_host
                    .entry(authority.to_string())
                    .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_limit))),
            )
        };

        let host = host.acquire_owned().await?;
        let total = Arc::clone(&self.total).acquire_owned().await?;

        Ok(OutboundPermit {
            _host: host,
            _total: total,
        })
    }

    /// Process-wide slots currently free.
    pub fn available(&self) -> usize {
        self.total.available_permits()
    }
}

impl Default for OutboundLimiter {
    fn default() -> Self {
        Self::new(MAX_IN_FLIGHT_REQUESTS, MAX_IN_FLIGHT_PER_HOST)
    }
}
