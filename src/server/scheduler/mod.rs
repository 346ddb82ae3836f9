//! Background jobs run by `tokio-cron-scheduler`.

pub mod session_cleanup;
