use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum ProxyError {
    /// The storefront renderer could not be reached or dropped the connection.
    ///
    /// Results in a 502 Bad Gateway. No retry is attempted.
    #[error("Could not contact the storefront renderer at {target}: {source}")]
    Unreachable {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// Every outbound slot stayed busy while the request waited.
    ///
    /// Results in a 503 Service Unavailable.
    #[error("No outbound slot to {target} freed up in time")]
    Saturated { target: String },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        dioxus_logger::tracing::error!("{}", self);

        match self {
            Self::Unreachable { .. } => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorDto {
                    error: "Could not contact the backend shop service.".to_string(),
                }),
            )
                .into_response(),
            Self::Saturated { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorDto {
                    error: "The shop service is busy, please retry shortly.".to_string(),
                }),
            )
                .into_response(),
        }
    }
}
