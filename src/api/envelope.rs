//! Uniform JSON response wrappers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Successful response: `{"success": true, "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Response payload.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failed response: `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message, shown verbatim by the UI.
    pub error: String,
}

impl ErrorEnvelope {
    /// Wrap an error message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Payload of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedItem {
    /// Id of the removed item.
    pub id: String,
    /// Always `true`.
    pub deleted: bool,
}
