//! Domain layer: the report pipeline and the contracts it depends on.
//!
//! Everything here is pure except the provider traits, which describe the
//! upstream calls without implementing them.
//!
//! # Architecture
//!
//! - [`date_range`] - Caller period -> `segments.date` clause
//! - [`report`] - The six report definitions and their GAQL queries
//! - [`normalize`] - Raw nested rows -> flat display records
//! - [`totals`] - Summary totals over daily spend
//! - [`session`] - Customer identifiers and credentials
//! - [`providers`] - Upstream service traits
//!
//! # Report Flow
//!
//! 1. [`date_range::DateRange::resolve`] picks the filter clause
//! 2. [`report::ReportQuerySet`] renders six queries around it
//! 3. [`providers::ReportSource`] runs them (concurrently, see
//!    [`crate::application::services::ReportService`])
//! 4. [`normalize::normalize_rows`] flattens each report
//! 5. [`totals::Totals::from_rows`] sums the daily spend

pub mod date_range;
pub mod normalize;
pub mod providers;
pub mod report;
pub mod session;
pub mod totals;
