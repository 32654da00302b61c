use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Failure of a single call to a single provider.
///
/// An unexpected response *shape* is not a gateway error; the normalizer
/// decides whether a well-formed body is usable.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("network error calling {provider}: {message}")]
    Network { provider: String, message: String },

    #[error("{provider} timed out after {after:?}")]
    Timeout { provider: String, after: Duration },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unreadable body: {message}")]
    InvalidBody { provider: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("image generation is not configured: no provider token is set")]
    NotConfigured,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("{provider} did not return an image")]
    NotAnImage { provider: String },
}

/// Errors surfaced to HTTP clients as `{ "error": "..." }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No image file provided")]
    MissingImage,

    #[error("Only image files are allowed")]
    UnsupportedMediaType,

    #[error("Image is too large (limit is {limit} bytes)")]
    PayloadTooLarge { limit: usize },

    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::MissingPrompt | ApiError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Generate(GenerateError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Generate(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
