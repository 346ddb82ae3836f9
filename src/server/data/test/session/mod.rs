use std::sync::Arc;

use chrono::Duration;
use serde_json::json;

use crate::server::{data::session::SessionStore, util::clock::ManualClock};

mod cleanup_expired;
mod create;
mod get;

fn store(clock: &Arc<ManualClock>) -> SessionStore {
    SessionStore::new(Duration::hours(24), clock.clone())
}
