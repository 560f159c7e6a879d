//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Payloads are camelCase to match the dashboard
//! client.

pub mod auth;
pub mod health;
pub mod metrics;
