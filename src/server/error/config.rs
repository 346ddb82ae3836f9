use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but cannot be parsed into the expected type.
    #[error("Invalid value '{value}' for environment variable {name}")]
    InvalidEnvVar { name: String, value: String },

    /// A shared configuration file (ports, approved domains) is missing or corrupt
    /// and no previously loaded snapshot is available.
    ///
    /// Results in a 500 Internal Server Error; callers fail closed.
    #[error("Configuration file {} is unavailable: {reason}", path.display())]
    Unavailable { path: PathBuf, reason: String },
}
