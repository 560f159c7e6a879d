use std::sync::Arc;

use crate::application::services::{AuthService, ReportService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub report_service: Arc<ReportService>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, report_service: Arc<ReportService>) -> Self {
        Self {
            auth_service,
            report_service,
        }
    }
}
