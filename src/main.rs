mod model;
mod server;

use std::sync::Arc;

use dioxus_logger::tracing::{self, Level};

use crate::server::{
    config::Config, error::AppError, router, startup, state::AppState, util::clock::SystemClock,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    dioxus_logger::init(Level::INFO).map_err(|e| AppError::InternalError(e.to_string()))?;

    let config = Config::from_env()?;

    let http_client = startup::setup_reqwest_client()?;
    let oauth_client = startup::setup_oauth_client(&config)?;
    let bind_address = config.bind_address;

    let state = AppState::new(config, http_client, oauth_client, Arc::new(SystemClock));

    // Dropping the scheduler stops the session sweep.
    let _scheduler = startup::start_scheduler(&state).await?;

    let app = router::router(&state).with_state(state);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("Listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
