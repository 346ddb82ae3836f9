//! Tenant port registry backed by the shared `ports.json` file.
//!
//! The file maps every bot name to the local port its service listens on. It is owned
//! by the deployment tooling and only ever read here. Snapshots are cached for five
//! minutes and replaced as a whole, so concurrent readers never observe a partially
//! updated mapping.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Duration, Utc};
use dioxus_logger::tracing;
use tokio::sync::RwLock;

use crate::server::{error::config::ConfigError, util::clock::Clock};

/// Time-to-live of a loaded ports snapshot in seconds.
const PORTS_CACHE_TTL_SECONDS: i64 = 300;

/// Immutable `tenant -> port` mapping shared with readers.
pub type PortMap = Arc<HashMap<String, u16>>;

struct PortsSnapshot {
    ports: PortMap,
    loaded_at: DateTime<Utc>,
}

/// Cached view of the `tenant -> port` mapping.
///
/// Cheap to clone; clones share the same cache.
#[derive(Clone)]
pub struct PortRegistry {
    path: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    snapshot: Arc<RwLock<Option<PortsSnapshot>>>,
}

impl PortRegistry {
    /// Creates a registry reading `path` on first use.
    ///
    /// # Arguments
    /// - `path` - Location of the ports JSON object
    /// - `clock` - Time source used for TTL checks
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            ttl: Duration::seconds(PORTS_CACHE_TTL_SECONDS),
            clock,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the current `tenant -> port` mapping.
    ///
    /// Serves the cached snapshot while it is younger than the TTL, otherwise reloads
    /// the file. A failed reload falls back to the previous snapshot; its load time is
    /// left untouched so the next call retries the file.
    ///
    /// # Returns
    /// - `Ok(PortMap)` - Fresh or last known mapping
    /// - `Err(ConfigError::Unavailable)` - File unreadable and nothing was ever loaded
    pub async fn get_ports(&self) -> Result<PortMap, ConfigError> {
        let now = self.clock.now();

        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            if now - snapshot.loaded_at < self.ttl {
                return Ok(Arc::clone(&snapshot.ports));
            }
        }

        match read_ports(&self.path).await {
            Ok(ports) => {
                let ports = Arc::new(ports);
                *self.snapshot.write().await = Some(PortsSnapshot {
                    ports: Arc::clone(&ports),
                    loaded_at: now,
                });

                Ok(ports)
            }
            Err(reason) => {
                tracing::error!(
                    "Error loading ports configuration from {}: {}",
                    self.path.display(),
                    reason
                );

                match self.snapshot.read().await.as_ref() {
                    Some(snapshot) => Ok(Arc::clone(&snapshot.ports)),
                    None => Err(ConfigError::Unavailable {
                        path: self.path.clone(),
                        reason,
                    }),
                }
            }
        }
    }

    /// Returns the port of `tenant`, if it has one.
    pub async fn get_port(&self, tenant: &str) -> Result<Option<u16>, ConfigError> {
        Ok(self.get_ports().await?.get(tenant).copied())
    }
}

async fn read_ports(path: &Path) -> Result<HashMap<String, u16>, String> {
    let raw = tokio::fs::read(path).await.map_err(|e| e.to_string())?;
    let ports: HashMap<String, u16> = serde_json::from_slice(&raw).map_err(|e| e.to_string())?;

    let mut seen = HashSet::new();
    for (tenant, port) in &ports {
        if !seen.insert(*port) {
            tracing::warn!(
                "Port {} is assigned to more than one bot (including '{}')",
                port,
                tenant
            );
        }
    }

    Ok(ports)
}
