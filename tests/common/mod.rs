#![allow(dead_code)]

use axum_test::TestServer;
use gsc_gateway::config::ConnectorConfig;
use gsc_gateway::infrastructure::connector::HttpGateway;
use gsc_gateway::routes::router;
use gsc_gateway::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";

pub fn connector_config(server: &MockServer) -> ConnectorConfig {
    ConnectorConfig::new(&server.uri(), API_KEY)
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .with_health_timeout(Duration::from_secs(1))
}

pub fn create_test_state(server: &MockServer) -> AppState {
    create_test_state_with_cap(server, 50)
}

pub fn create_test_state_with_cap(server: &MockServer, dashboard_page_cap: u32) -> AppState {
    let gateway = HttpGateway::new(connector_config(server)).unwrap();
    AppState::new(Arc::new(gateway), dashboard_page_cap)
}

/// Full façade router in front of the mock connector.
pub fn create_test_server(connector: &MockServer) -> TestServer {
    TestServer::new(router(create_test_state(connector))).unwrap()
}

/// Mounts a JSON answer for `GET {endpoint}` that requires the API key.
pub async fn mount_get(server: &MockServer, endpoint: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(header("X-API-Key", API_KEY))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub fn page(url: &str, clicks: u64, impressions: u64, avg_position: f64) -> Value {
    let ctr = if impressions == 0 {
        0.0
    } else {
        clicks as f64 / impressions as f64
    };
    json!({
        "url": url,
        "clicks": clicks,
        "impressions": impressions,
        "ctr": ctr,
        "avg_position": avg_position
    })
}

/// Upstream `/metrics/urls` envelope.
pub fn url_list_body(urls: Vec<Value>, offset: u32, total: u64, has_more: bool) -> Value {
    let limit = urls.len();
    json!({
        "success": true,
        "data": {
            "urls": urls,
            "pagination": {
                "limit": limit,
                "offset": offset,
                "total": total,
                "has_more": has_more
            },
            "meta": {"source": "gsc"}
        }
    })
}

/// Upstream error envelope, as the connector's controllers write it.
pub fn error_body(code: &str, message: &str) -> Value {
    json!({"success": false, "error": code, "message": message, "request_id": "unknown"})
}
