//! HTTP mapping for the unified error taxonomy.
//!
//! Handlers return `ApiError`, which picks the status from the error kind
//! and serves a stable JSON `{error}` body. Internal detail stays in the
//! logs, not the response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use plat_core::Error;
use serde_json::json;

/// Wrapper turning core errors into JSON error responses.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &self.0 {
            Error::InvalidInput(msg) => msg.clone(),
            Error::Config(_) => "API configuration error".to_string(),
            Error::Auth(_) => "Invalid API key. Please check the provider credential configuration.".to_string(),
            Error::NotFound(_) => "Property not found at the specified address".to_string(),
            Error::Upstream(_) => "Failed to fetch property data. Please try again.".to_string(),
            Error::Storage(_) | Error::CorruptRow(_) | Error::MigrationFailed(_) => {
                "Internal server error".to_string()
            }
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
