//! Async contract of the remote connector service.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::{
    AccessCheck, AuthStatus, ImportRequest, ImportResponse, MetricsQuery, MetricsResult, Property,
    ServiceHealth, UrlListQuery, UrlPage,
};
use crate::error::ConnectorError;

/// Non-blocking access to the connector, one upstream call per method.
///
/// Calls are independent: implementations do not queue, batch, retry or
/// cache. Every failure surfaces as a [`ConnectorError`], except
/// [`ConnectorGateway::health`] which folds failures into its result.
///
/// # Implementations
///
/// - [`crate::infrastructure::connector::HttpGateway`] - reqwest over HTTP
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectorGateway: Send + Sync {
    /// Absolute URL a human visits to (re-)authenticate the connector.
    fn auth_link(&self) -> String;

    /// `GET /auth/url`
    async fn auth_url(&self) -> Result<String, ConnectorError>;

    /// `GET /auth/status`
    async fn auth_status(&self) -> Result<AuthStatus, ConnectorError>;

    /// `GET /gsc/properties`
    async fn properties(&self) -> Result<Vec<Property>, ConnectorError>;

    /// `GET /gsc/check-access`
    async fn check_access(&self, property: &str) -> Result<AccessCheck, ConnectorError>;

    /// `POST /gsc/import`
    ///
    /// Returns once the connector has answered; for real imports that can
    /// take minutes.
    async fn import(&self, request: &ImportRequest) -> Result<ImportResponse, ConnectorError>;

    /// `GET /metrics/url`
    async fn url_metrics(&self, query: &MetricsQuery) -> Result<MetricsResult, ConnectorError>;

    /// `GET /metrics/urls`
    async fn url_list(&self, query: &UrlListQuery) -> Result<UrlPage, ConnectorError>;

    /// `GET /health` with the short liveness timeout.
    async fn health(&self) -> ServiceHealth;

    /// `GET /ready`
    async fn ready(&self) -> Result<Value, ConnectorError>;

    /// `GET /metrics`
    async fn service_metrics(&self) -> Result<Value, ConnectorError>;
}
