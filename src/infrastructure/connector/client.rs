//! Blocking connector client.
//!
//! Every method performs exactly one HTTP exchange and returns its decoded
//! result or a [`ConnectorError`]. The client holds no mutable state, so a
//! single instance can be shared between threads.
//!
//! Do not call it from inside an async runtime; use
//! [`super::HttpGateway`] there.

use reqwest::Method;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::wire::{self, ImportPayload, UrlListParams, UrlMetricsParams};
use crate::config::ConnectorConfig;
use crate::domain::entities::{
    AccessCheck, AuthStatus, ImportRequest, ImportResponse, MetricsQuery, MetricsResult, Property,
    ServiceHealth, UrlListQuery, UrlPage,
};
use crate::error::ConnectorError;

#[derive(Debug, Clone)]
pub struct ConnectorClient {
    config: ConnectorConfig,
    http: Client,
}

impl ConnectorClient {
    pub fn new(config: ConnectorConfig) -> Result<Self, ConnectorError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("gsc-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConnectorError::Connectivity(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Performs one authenticated call and returns the JSON body.
    ///
    /// `query` pairs are URL-encoded; `body` is sent as JSON when present.
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ConnectorError> {
        self.exchange(method, endpoint, query, body, self.config.timeout())
            .map(|(_, value)| value)
    }

    fn exchange(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<(u16, Value), ConnectorError> {
        let result = self.send(method, endpoint, query, body, timeout);
        if let Err(err) = &result {
            wire::record_failure(endpoint, err);
        }
        result
    }

    fn send(
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
            .map_err(|e| ConnectorError::Connectivity(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| ConnectorError::Connectivity(format!("failed to read body: {e}")))?;

        wire::classify(status, &text).map(|value| (status, value))
    }

    fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<T, ConnectorError> {
        let (status, value) =
            self.exchange(Method::GET, endpoint, query, None, self.config.timeout())?;
        wire::decode(status, value)
    }

    pub fn auth_url(&self) -> Result<String, ConnectorError> {
        self.get::<wire::AuthUrlEnvelope>(wire::AUTH_URL, &[])
            .map(|e| e.auth_url)
    }

    pub fn auth_status(&self) -> Result<AuthStatus, ConnectorError> {
        self.get(wire::AUTH_STATUS, &[])
    }

    pub fn properties(&self) -> Result<Vec<Property>, ConnectorError> {
        self.get::<wire::PropertiesEnvelope>(wire::PROPERTIES, &[])
            .map(|e| e.properties)
    }

    pub fn check_access(&self, property: &str) -> Result<AccessCheck, ConnectorError> {
        if property.trim().is_empty() {
            return Err(ConnectorError::validation("property must not be empty"));
        }
        let query = wire::query_pairs(&wire::CheckAccessParams { property })?;
        self.get(wire::CHECK_ACCESS, &query)
    }

    /// Starts an import (or a dry run) and waits for the connector's answer.
    pub fn import(&self, request: &ImportRequest) -> Result<ImportResponse, ConnectorError> {
        let body = wire::to_body(&ImportPayload::from_request(request)?)?;
        let (status, value) = self.exchange(
            Method::POST,
            wire::IMPORT,
            &[],
            Some(&body),
            self.config.timeout(),
        )?;
        wire::decode(status, value)
    }

    pub fn url_metrics(&self, query: &MetricsQuery) -> Result<MetricsResult, ConnectorError> {
        let pairs = wire::query_pairs(&UrlMetricsParams::from_query(query)?)?;
        self.get::<wire::DataEnvelope<MetricsResult>>(wire::URL_METRICS, &pairs)
            .map(|e| e.data)
    }

    pub fn url_list(&self, query: &UrlListQuery) -> Result<UrlPage, ConnectorError> {
        let pairs = wire::query_pairs(&UrlListParams::from_query(query)?)?;
        self.get::<wire::DataEnvelope<UrlPage>>(wire::URL_LIST, &pairs)
            .map(|e| e.data)
    }

    /// Liveness probe with the short health timeout. Never fails.
    pub fn health_check(&self) -> ServiceHealth {
        match self.exchange(
            Method::GET,
            wire::HEALTH,
            &[],
            None,
            self.config.health_timeout(),
        ) {
            Ok(_) => ServiceHealth::ok(),
            Err(err) => wire::health_from_error(&err),
        }
    }

    pub fn ready(&self) -> Result<Value, ConnectorError> {
        self.request(Method::GET, wire::READY, &[], None)
    }

    pub fn service_metrics(&self) -> Result<Value, ConnectorError> {
        self.request(Method::GET, wire::SERVICE_METRICS, &[], None)
    }
}
