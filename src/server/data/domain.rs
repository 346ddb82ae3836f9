//! Allow-list of tenant custom domains.
//!
//! `custom_domains.json` is the definitive list of customers with an active storefront.
//! It is consulted by the TLS issuance gate and by the CORS layer. The CORS predicate
//! is synchronous, so the cache sits behind a std lock and `load` reads the file with
//! std I/O on the calling thread, at most once per TTL. The TLS gate goes through
//! `is_approved`, which moves that read onto the blocking pool.

use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, Duration, Utc};
use dioxus_logger::tracing;

use crate::server::util::{clock::Clock, host::normalize_host};

/// Time-to-live of the approved domain set in seconds.
const DOMAINS_CACHE_TTL_SECONDS: i64 = 20;

/// Platform origins that are always allowed to make credentialed API calls.
const BASE_ORIGINS: &[&str] = &[
    "https://v2.noemt.dev",
    "https://noemt.dev",
    "https://shop.noemt.dev",
    "https://sellers.noemt.dev",
    "https://dashboard.noemt.dev",
    "http://localhost:3000",
    "http://localhost:3001",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3001",
];

struct DomainsSnapshot {
    domains: Arc<HashSet<String>>,
    loaded_at: DateTime<Utc>,
}

/// Cached, fail-closed view of the approved custom domains.
#[derive(Clone)]
pub struct ApprovedDomains {
    path: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    snapshot: Arc<RwLock<Option<DomainsSnapshot>>>,
}

impl ApprovedDomains {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            ttl: Duration::seconds(DOMAINS_CACHE_TTL_SECONDS),
            clock,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the lower-cased set of approved domains.
    ///
    /// A missing or malformed file, or a file that is not a JSON array, yields an empty
    /// set. Failures are not cached; the file is read again on the next call.
    ///
    /// # Returns
    /// - `Arc<HashSet<String>>` - Approved domains, empty on any load failure
    pub fn load(&self) -> Arc<HashSet<String>> {
        let now = self.clock.now();

        match self.cached(now) {
            Some(domains) => domains,
            None => self.reload(now),
        }
    }

    /// Same as `load`, with the file read on the blocking pool.
    pub async fn load_async(&self) -> Arc<HashSet<String>> {
        let now = self.clock.now();

        if let Some(domains) = self.cached(now) {
            return domains;
        }

        let domains = self.clone();
        tokio::task::spawn_blocking(move || domains.reload(now))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Approved domains refresh did not complete: {}", e);
                Arc::new(HashSet::new())
            })
    }

    /// Whether `host` is an approved custom domain, compared case-insensitively.
    pub async fn is_approved(&self, host: &str) -> bool {
        let host = normalize_host(host);
        !host.is_empty() && self.load_async().await.contains(&host)
    }

    /// Whether a browser `Origin` header value is allowed by the CORS layer.
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        if BASE_ORIGINS.contains(&origin) {
            return true;
        }

        match origin.strip_prefix("https://") {
            Some(domain) => self.load().contains(&domain.to_lowercase()),
            None => false,
        }
    }

    fn cached(&self, now: DateTime<Utc>) -> Option<Arc<HashSet<String>>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|snapshot| now - snapshot.loaded_at < self.ttl)
            .map(|snapshot| Arc::clone(&snapshot.domains))
    }

    fn reload(&self, now: DateTime<Utc>) -> Arc<HashSet<String>> {
        match self.read_domains() {
            Ok(domains) => {
                tracing::info!("Successfully loaded {} custom domains.", domains.len());

                let domains = Arc::new(domains);
                *self
                    .snapshot
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Some(DomainsSnapshot {
                    domains: Arc::clone(&domains),
                    loaded_at: now,
                });

                domains
            }
            Err(reason) => {
                tracing::error!(
                    "Could not load or parse {}: {}",
                    self.path.display(),
                    reason
                );

                Arc::new(HashSet::new())
            }
        }
    }

    fn read_domains(&self) -> Result<HashSet<String>, String> {
        let raw = std::fs::read(&self.path).map_err(|e| e.to_string())?;
        let value: serde_json::Value = serde_json::from_slice(&raw).map_err(|e| e.to_string())?;

        let Some(entries) = value.as_array() else {
            return Err("expected a JSON list of domains".to_string());
        };

        Ok(entries
            .iter()
            .map(|entry| match entry {
                serde_json::Value::String(domain) => domain.to_lowercase(),
                other => other.to_string().to_lowercase(),
            })
            .collect())
    }
}
