//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{ImportService, MetricsService};
use crate::domain::ConnectorGateway;
use crate::error::{AppError, ConnectorError};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn ConnectorGateway>,
    pub import_service: Arc<ImportService>,
    pub metrics_service: Arc<MetricsService>,
}

impl AppState {
    /// Wires the services around a single gateway.
    pub fn new(gateway: Arc<dyn ConnectorGateway>, dashboard_page_cap: u32) -> Self {
        Self {
            import_service: Arc::new(ImportService::new(gateway.clone())),
            metrics_service: Arc::new(MetricsService::new(gateway.clone(), dashboard_page_cap)),
            gateway,
        }
    }

    /// Replaces the import service with one keeping at most `limit` jobs.
    pub fn with_job_history(mut self, limit: usize) -> Self {
        self.import_service =
            Arc::new(ImportService::new(self.gateway.clone()).with_history_limit(limit));
        self
    }

    /// Maps a connector failure to a response, pointing at the connector's
    /// auth link when the OAuth grant is missing.
    pub fn upstream(&self, err: ConnectorError) -> AppError {
        AppError::from_connector(err, &self.gateway.auth_link())
    }
}
