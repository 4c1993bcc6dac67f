//! Cherry CRUD: a small item board.
//!
//! A browser page manages a list of items (title, description, category,
//! completion flag, priority) through a REST API backed by an in-memory
//! store.
//!
//! ```text
//! UI ──HTTP──▶ api handler ──▶ ItemRepository ──▶ Vec<Item>
//!    ◀─JSON── {success, data} / {success: false, error}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`items`]: Item records, the repository trait and the in-memory store
//! - [`api`]: HTTP API for items, health, status and metrics
//! - [`ui`]: The browser page and its badge helpers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod items;
pub mod metrics;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result, StoreError};
