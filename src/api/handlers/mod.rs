//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod metrics;

pub use auth::{auth_url_handler, exchange_handler};
pub use health::health_handler;
pub use metrics::metrics_handler;
