//! Business logic services for the application layer.

pub mod auth_service;
pub mod report_service;

pub use auth_service::{AuthService, IssuedTokens};
pub use report_service::{MetricsReport, RawReports, ReportService};
