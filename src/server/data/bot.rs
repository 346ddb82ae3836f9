//! Directory of deployed bot instances.
//!
//! Every tenant is deployed as a sibling directory of the parent API. The listing is
//! the tenant set used by fan-out calls and is cached for five minutes.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Duration, Utc};
use dioxus_logger::tracing;
use tokio::sync::RwLock;

use crate::server::util::clock::Clock;

/// Time-to-live of the bot listing in seconds.
const BOTS_CACHE_TTL_SECONDS: i64 = 300;

/// Directory names that are never treated as a tenant.
const EXCLUDED_DIRECTORIES: &[&str] = &["parent_api"];

struct BotsSnapshot {
    bots: Arc<Vec<String>>,
    loaded_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct BotDirectory {
    root: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    snapshot: Arc<RwLock<Option<BotsSnapshot>>>,
}

impl BotDirectory {
    pub fn new(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            ttl: Duration::seconds(BOTS_CACHE_TTL_SECONDS),
            clock,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    /// Lists every known bot, sorted by name.
    ///
    /// Only sub-directories count as bots. A directory that cannot be read is logged and
    /// yields an empty list which is not cached, so the next call retries.
    ///
    /// # Returns
    /// - `Arc<Vec<String>>` - Bot names, possibly empty
    pub async fn list(&self) -> Arc<Vec<String>> {
        let now = self.clock.now();

        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            if now - snapshot.loaded_at < self.ttl {
                return Arc::clone(&snapshot.bots);
            }
        }

        match read_bots(&self.root).await {
            Ok(bots) => {
                let bots = Arc::new(bots);
                *self.snapshot.write().await = Some(BotsSnapshot {
                    bots: Arc::clone(&bots),
                    loaded_at: now,
                });

                bots
            }
            Err(e) => {
                tracing::error!(
                    "Error reading bot directories in {}: {}",
                    self.root.display(),
                    e
                );

                Arc::new(Vec::new())
            }
        }
    }
}

async fn read_bots(root: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(root).await?;
    let mut bots = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };

        if EXCLUDED_DIRECTORIES.contains(&name.as_str()) || name.starts_with('.') {
            continue;
        }

        bots.push(name);
    }

    bots.sort();

    Ok(bots)
}
