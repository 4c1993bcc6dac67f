//! HTTP API: the `/items` REST endpoints plus health, status and metrics.

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod items;
pub mod routes;

pub use envelope::{DeletedItem, Envelope, ErrorEnvelope};
pub use error::ApiError;
pub use handlers::AppState;
pub use routes::{create_router, serve, ApiDoc};
