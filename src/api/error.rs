//! API error taxonomy and its mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use super::envelope::ErrorEnvelope;
use crate::error::StoreError;
use crate::metrics;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or blank.
    #[error("validation failed: {0}")]
    Validation(&'static str),

    /// The body is not JSON or does not have the expected shape.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// No item with the requested id.
    #[error("item not found")]
    NotFound,

    /// No route matches the request.
    #[error("route not found")]
    RouteNotFound,

    /// `/metrics` was hit without a recorder installed.
    #[error("metrics recorder not installed")]
    MetricsDisabled,

    /// Unexpected failure. Only `context` reaches the client.
    #[error("{context}: {source}")]
    Internal {
        /// Generic message for the client.
        context: &'static str,
        /// Underlying cause, logged only.
        source: StoreError,
    },
}

impl ApiError {
    /// Map a store error, using `context` as the client message for
    /// anything other than a missing item.
    pub fn from_store(context: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound,
            other => Self::Internal {
                context,
                source: other,
            },
        }
    }

    /// HTTP status for this error.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MetricsDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for the error counter.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidBody(_) => "invalid_body",
            Self::NotFound => "not_found",
            Self::RouteNotFound => "route_not_found",
            Self::MetricsDisabled => "metrics_disabled",
            Self::Internal { .. } => "internal",
        }
    }

    /// Message placed in the error envelope.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(message) => (*message).to_string(),
            Self::InvalidBody(detail) => format!("Invalid request body: {detail}"),
            Self::NotFound => "Item not found".to_string(),
            Self::RouteNotFound => "Route not found".to_string(),
            Self::MetricsDisabled => "Metrics are not enabled".to_string(),
            Self::Internal { context, .. } => (*context).to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal { .. } => error!(error = %self, "Request failed"),
            Self::InvalidBody(_) => warn!(error = %self, "Rejected request body"),
            _ => {}
        }
        metrics::inc_api_errors(self.kind());

        let status = self.status_code();
        (status, Json(ErrorEnvelope::new(self.public_message()))).into_response()
    }
}
