use thiserror::Error;

/// Errors that can occur while setting up a test environment.
#[derive(Error, Debug)]
pub enum TestError {
    /// Failed to create the fixture directory or write one of its files.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failed to render a fixture file as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
