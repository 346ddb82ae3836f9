use dioxus_logger::tracing;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{data::session::SessionStore, error::AppError};

/// Every hour, on the hour.
const SESSION_CLEANUP_SCHEDULE: &str = "0 0 * * * *";

/// Registers the hourly sweep of expired sessions.
///
/// Expired sessions are already invisible to readers; the sweep only bounds the
/// memory held by sessions that are never read again.
///
/// # Arguments
/// - `scheduler` - Scheduler the job is added to
/// - `sessions` - Session table to sweep
pub async fn register(scheduler: &JobScheduler, sessions: SessionStore) -> Result<(), AppError> {
    let job = Job::new_async(SESSION_CLEANUP_SCHEDULE, move |_uuid, _lock| {
        let sessions = sessions.clone();

        Box::pin(async move {
            let removed = sessions.cleanup_expired().await;
            tracing::debug!("Session sweep removed {} expired sessions", removed);
        })
    })?;

    scheduler.add(job).await?;

    tracing::info!("Session cleanup scheduler started");

    Ok(())
}
