//! Infrastructure layer implementing the domain provider traits.
//!
//! # Modules
//!
//! - [`google`] - Google OAuth and Google Ads REST clients

pub mod google;
