//! Async connector client backing [`ConnectorGateway`].

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::wire::{self, ImportPayload, UrlListParams, UrlMetricsParams};
use crate::config::ConnectorConfig;
use crate::domain::ConnectorGateway;
use crate::domain::entities::{
    AccessCheck, AuthStatus, ImportRequest, ImportResponse, MetricsQuery, MetricsResult, Property,
    ServiceHealth, UrlListQuery, UrlPage,
};
use crate::error::ConnectorError;

/// Non-blocking twin of [`super::ConnectorClient`].
///
/// Shares the wire format and error classification with the blocking client;
/// concurrent calls from many tasks are independent.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    config: ConnectorConfig,
    http: Client,
}

impl HttpGateway {
    pub fn new(config: ConnectorConfig) -> Result<Self, ConnectorError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("gsc-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConnectorError::Connectivity(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// Performs one authenticated call and returns the JSON body.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ConnectorError> {
        self.exchange(method, endpoint, query, body, self.config.timeout())
            .await
            .map(|(_, value)| value)
    }

    async fn exchange(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<(u16, Value), ConnectorError> {
        let result = self.send(method, endpoint, query, body, timeout).await;
        if let Err(err) = &result {
            wire::record_failure(endpoint, err);
        }
        result
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<(u16, Value), ConnectorError> {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!(%method, %url, "Calling connector");

        let mut builder = self
            .http
            .request(method, &url)
            .header(wire::API_KEY_HEADER, self.config.api_key())
            .timeout(timeout);

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ConnectorError::Connectivity(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ConnectorError::Connectivity(format!("failed to read body: {e}")))?;

        wire::classify(status, &text).map(|value| (status, value))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<T, ConnectorError> {
        let (status, value) = self
            .exchange(Method::GET, endpoint, query, None, self.config.timeout())
            .await?;
        wire::decode(status, value)
    }
}

#[async_trait]
impl ConnectorGateway for HttpGateway {
    fn auth_link(&self) -> String {
        self.config.auth_link()
    }

    async fn auth_url(&self) -> Result<String, ConnectorError> {
        self.get::<wire::AuthUrlEnvelope>(wire::AUTH_URL, &[])
            .await
            .map(|e| e.auth_url)
    }

    async fn auth_status(&self) -> Result<AuthStatus, ConnectorError> {
        self.get(wire::AUTH_STATUS, &[]).await
    }

    async fn properties(&self) -> Result<Vec<Property>, ConnectorError> {
        self.get::<wire::PropertiesEnvelope>(wire::PROPERTIES, &[])
            .await
            .map(|e| e.properties)
    }

    async fn check_access(&self, property: &str) -> Result<AccessCheck, ConnectorError> {
        if property.trim().is_empty() {
            return Err(ConnectorError::validation("property must not be empty"));
        }
        let query = wire::query_pairs(&wire::CheckAccessParams { property })?;
        self.get(wire::CHECK_ACCESS, &query).await
    }

    async fn import(&self, request: &ImportRequest) -> Result<ImportResponse, ConnectorError> {
        let body = wire::to_body(&ImportPayload::from_request(request)?)?;
        let (status, value) = self
            .exchange(
                Method::POST,
                wire::IMPORT,
                &[],
                Some(&body),
                self.config.timeout(),
            )
            .await?;
        wire::decode(status, value)
    }

    async fn url_metrics(&self, query: &MetricsQuery) -> Result<MetricsResult, ConnectorError> {
        let pairs = wire::query_pairs(&UrlMetricsParams::from_query(query)?)?;
        self.get::<wire::DataEnvelope<MetricsResult>>(wire::URL_METRICS, &pairs)
            .await
            .map(|e| e.data)
    }

    async fn url_list(&self, query: &UrlListQuery) -> Result<UrlPage, ConnectorError> {
        let pairs = wire::query_pairs(&UrlListParams::from_query(query)?)?;
        self.get::<wire::DataEnvelope<UrlPage>>(wire::URL_LIST, &pairs)
            .await
            .map(|e| e.data)
    }

    async fn health(&self) -> ServiceHealth {
        match self
            .exchange(
                Method::GET,
                wire::HEALTH,
                &[],
                None,
                self.config.health_timeout(),
            )
            .await
        {
            Ok(_) => ServiceHealth::ok(),
            Err(err) => wire::health_from_error(&err),
        }
    }

    async fn ready(&self) -> Result<Value, ConnectorError> {
        self.request(Method::GET, wire::READY, &[], None).await
    }

    async fn service_metrics(&self) -> Result<Value, ConnectorError> {
        self.request(Method::GET, wire::SERVICE_METRICS, &[], None)
            .await
    }
}
