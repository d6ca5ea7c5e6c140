//! Wire format of the connector API.
//!
//! Request parameter types use the connector's mixed-case field names
//! (`siteUrl`, `searchType`, `dryRun`, ...) verbatim. Response classification
//! is shared by the blocking and async clients so both map failures the same
//! way.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::{
    DataState, Device, Dimension, ImportFilters, ImportRequest, MAX_PAGE_SIZE, MetricsQuery,
    OrderBy, Property, SearchType, ServiceHealth, SortOrder, UrlListQuery, is_country_code,
};
use crate::error::ConnectorError;

pub const AUTH_URL: &str = "/auth/url";
pub const AUTH_STATUS: &str = "/auth/status";
pub const PROPERTIES: &str = "/gsc/properties";
pub const CHECK_ACCESS: &str = "/gsc/check-access";
pub const IMPORT: &str = "/gsc/import";
pub const URL_METRICS: &str = "/metrics/url";
pub const URL_LIST: &str = "/metrics/urls";
pub const HEALTH: &str = "/health";
pub const READY: &str = "/ready";
pub const SERVICE_METRICS: &str = "/metrics";

/// Name of the authentication header.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Body of `POST /gsc/import`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPayload<'a> {
    property: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    search_type: SearchType,
    data_state: DataState,
    dry_run: bool,
    dimensions: Vec<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<&'a ImportFilters>,
}

impl<'a> ImportPayload<'a> {
    pub fn from_request(request: &'a ImportRequest) -> Result<Self, ConnectorError> {
        request.validate()?;
        Ok(Self {
            property: &request.property,
            start: request.range.start(),
            end: request.range.end(),
            search_type: request.search_type,
            data_state: request.data_state,
            dry_run: request.dry_run,
            dimensions: request.dimensions.iter().copied().collect(),
            filters: request.filters.as_ref(),
        })
    }
}

/// Query of `GET /metrics/url`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMetricsParams<'a> {
    url: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    site_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<Device>,
}

impl<'a> UrlMetricsParams<'a> {
    pub fn from_query(query: &'a MetricsQuery) -> Result<Self, ConnectorError> {
        if query.url.trim().is_empty() {
            return Err(ConnectorError::validation("url must not be empty"));
        }
        if let Some(country) = query.country.as_deref()
            && !is_country_code(country)
        {
            return Err(ConnectorError::validation(format!(
                "country must be a 3-letter code, got '{country}'"
            )));
        }
        Ok(Self {
            url: &query.url,
            start: query.range.start(),
            end: query.range.end(),
            site_url: query.site_url.as_deref(),
            country: query.country.as_deref(),
            device: query.device,
        })
    }
}

/// Query of `GET /metrics/urls`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlListParams<'a> {
    site_url: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    limit: u32,
    offset: u32,
    order_by: OrderBy,
    order: SortOrder,
}

impl<'a> UrlListParams<'a> {
    pub fn from_query(query: &'a UrlListQuery) -> Result<Self, ConnectorError> {
        if query.site_url.trim().is_empty() {
            return Err(ConnectorError::validation("siteUrl must not be empty"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&query.limit) {
            return Err(ConnectorError::validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}, got {}",
                query.limit
            )));
        }
        Ok(Self {
            site_url: &query.site_url,
            start: query.range.start(),
            end: query.range.end(),
            limit: query.limit,
            offset: query.offset,
            order_by: query.order_by,
            order: query.order,
        })
    }
}

#[derive(Serialize)]
pub struct CheckAccessParams<'a> {
    pub property: &'a str,
}

/// `{"data": ...}` wrapper used by the metrics endpoints.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct AuthUrlEnvelope {
    pub auth_url: String,
}

#[derive(Debug, Deserialize)]
pub struct PropertiesEnvelope {
    pub properties: Vec<Property>,
}

/// Structured error body: `{"error": "<code>", "message": "<text>"}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
    #[serde(default)]
    message: Option<String>,
}

/// Flattens a serializable parameter struct into query pairs.
///
/// Absent optional fields are dropped; scalars are rendered without quotes.
pub fn query_pairs<T: Serialize>(params: &T) -> Result<Vec<(String, String)>, ConnectorError> {
    let value = serde_json::to_value(params)
        .map_err(|e| ConnectorError::validation(format!("unserializable query: {e}")))?;

    let Value::Object(map) = value else {
        return Err(ConnectorError::validation("query must be a key-value structure"));
    };

    Ok(map
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let rendered = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, rendered)
        })
        .collect())
}

pub fn to_body<T: Serialize>(payload: &T) -> Result<Value, ConnectorError> {
    serde_json::to_value(payload)
        .map_err(|e| ConnectorError::validation(format!("unserializable body: {e}")))
}

/// Maps a received response to a JSON value or a typed error.
///
/// - 2xx with a JSON body (or empty body) → `Ok`
/// - 2xx with anything else → [`ConnectorError::Protocol`]
/// - ≥400 with `{error, message}` → [`ConnectorError::Domain`]
/// - ≥400 with anything else → [`ConnectorError::Protocol`]
pub fn classify(status: u16, body: &str) -> Result<Value, ConnectorError> {
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(body).map_err(|_| ConnectorError::Protocol {
            status,
            body: body.to_string(),
        });
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => Err(ConnectorError::Domain {
            message: envelope.message.unwrap_or_else(|| envelope.error.clone()),
            code: envelope.error,
            status,
        }),
        Err(_) => Err(ConnectorError::Protocol {
            status,
            body: body.to_string(),
        }),
    }
}

/// Logs a failed call and counts it by kind.
pub fn record_failure(endpoint: &str, err: &ConnectorError) {
    metrics::counter!("gsc_upstream_errors_total", "kind" => err.kind()).increment(1);
    tracing::debug!(endpoint, kind = err.kind(), error = %err, "Connector call failed");
}

/// Folds a failed liveness probe into a health value.
///
/// Any 2xx answer counts as alive, whatever its body.
pub fn health_from_error(err: &ConnectorError) -> ServiceHealth {
    match err {
        ConnectorError::Connectivity(message) => ServiceHealth::unreachable(message.clone()),
        ConnectorError::Protocol { status, .. } if (200..300).contains(status) => {
            ServiceHealth::ok()
        }
        other => ServiceHealth::degraded(other.to_string()),
    }
}

/// Decodes a successful body into its expected shape.
pub fn decode<T: DeserializeOwned>(status: u16, value: Value) -> Result<T, ConnectorError> {
    let raw = value.to_string();
    serde_json::from_value(value).map_err(|_| ConnectorError::Protocol { status, body: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DateRange;
    use serde_json::json;

    fn range() -> DateRange {
        DateRange::parse("2024-01-01", "2024-01-31").unwrap()
    }

    #[test]
    fn test_import_payload_uses_wire_names() {
        let request = ImportRequest::new("https://example.com/", range()).dry_run(true);
        let body = to_body(&ImportPayload::from_request(&request).unwrap()).unwrap();

        assert_eq!(body["property"], "https://example.com/");
        assert_eq!(body["start"], "2024-01-01");
        assert_eq!(body["end"], "2024-01-31");
        assert_eq!(body["searchType"], "web");
        assert_eq!(body["dataState"], "all");
        assert_eq!(body["dryRun"], true);
        assert_eq!(body["dimensions"], json!(["page", "query", "country", "device"]));
        assert!(body.get("filters").is_none());
    }

    #[test]
    fn test_import_payload_filters() {
        let request = ImportRequest::new("https://example.com/", range()).with_filters(
            ImportFilters {
                country: Some("FRA".into()),
                device: Some(Device::Mobile),
                page_regex: Some("^/blog/".into()),
            },
        );
        let body = to_body(&ImportPayload::from_request(&request).unwrap()).unwrap();
        assert_eq!(
            body["filters"],
            json!({"country": "FRA", "device": "mobile", "pageRegex": "^/blog/"})
        );
    }

    #[test]
    fn test_import_payload_validates() {
        let request = ImportRequest::new("", range());
        assert!(matches!(
            ImportPayload::from_request(&request),
            Err(ConnectorError::Validation(_))
        ));
    }

    #[test]
    fn test_url_metrics_query_pairs() {
        let query = MetricsQuery::new("https://a.com/x", range())
            .with_site_url(Some("https://a.com/".into()))
            .with_device(Some(Device::Desktop));
        let pairs = query_pairs(&UrlMetricsParams::from_query(&query).unwrap()).unwrap();

        assert!(pairs.contains(&("url".into(), "https://a.com/x".into())));
        assert!(pairs.contains(&("siteUrl".into(), "https://a.com/".into())));
        assert!(pairs.contains(&("device".into(), "desktop".into())));
        assert!(pairs.contains(&("start".into(), "2024-01-01".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "country"));
    }

    #[test]
    fn test_url_metrics_rejects_bad_country() {
        let query = MetricsQuery::new("https://a.com/x", range()).with_country(Some("F".into()));
        assert!(UrlMetricsParams::from_query(&query).is_err());
    }

    #[test]
    fn test_url_list_query_pairs() {
        let query = UrlListQuery::new("https://a.com/", range())
            .page(50, 100)
            .ordered(OrderBy::Position, SortOrder::Asc);
        let pairs = query_pairs(&UrlListParams::from_query(&query).unwrap()).unwrap();

        assert!(pairs.contains(&("siteUrl".into(), "https://a.com/".into())));
        assert!(pairs.contains(&("limit".into(), "50".into())));
        assert!(pairs.contains(&("offset".into(), "100".into())));
        assert!(pairs.contains(&("orderBy".into(), "position".into())));
        assert!(pairs.contains(&("order".into(), "asc".into())));
    }

    #[test]
    fn test_url_list_limit_bounds() {
        let zero = UrlListQuery::new("https://a.com/", range()).page(0, 0);
        assert!(UrlListParams::from_query(&zero).is_err());
        let too_big = UrlListQuery::new("https://a.com/", range()).page(1001, 0);
        assert!(UrlListParams::from_query(&too_big).is_err());
        let max = UrlListQuery::new("https://a.com/", range()).page(1000, 0);
        assert!(UrlListParams::from_query(&max).is_ok());
    }

    #[test]
    fn test_classify_success() {
        assert_eq!(classify(200, r#"{"ok": true}"#).unwrap(), json!({"ok": true}));
        assert_eq!(classify(204, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_classify_success_with_garbage_is_protocol() {
        assert_eq!(
            classify(200, "<html>"),
            Err(ConnectorError::Protocol {
                status: 200,
                body: "<html>".into()
            })
        );
    }

    #[test]
    fn test_classify_structured_error() {
        let body = r#"{"success": false, "error": "invalid_range", "message": "end before start"}"#;
        assert_eq!(
            classify(400, body),
            Err(ConnectorError::Domain {
                code: "invalid_range".into(),
                message: "end before start".into(),
                status: 400
            })
        );
    }

    #[test]
    fn test_classify_error_without_message_uses_code() {
        let err = classify(404, r#"{"error": "property_not_found"}"#).unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Domain { ref message, .. } if message == "property_not_found"
        ));
    }

    #[test]
    fn test_classify_unstructured_error_keeps_raw_body() {
        assert_eq!(
            classify(502, "Bad Gateway"),
            Err(ConnectorError::Protocol {
                status: 502,
                body: "Bad Gateway".into()
            })
        );
    }

    #[test]
    fn test_health_from_error() {
        let down = health_from_error(&ConnectorError::Connectivity("refused".into()));
        assert_eq!(down.status, crate::domain::entities::HealthStatus::Unreachable);

        let sick = health_from_error(&ConnectorError::Protocol {
            status: 503,
            body: "starting".into(),
        });
        assert_eq!(sick.status, crate::domain::entities::HealthStatus::Degraded);
    }

    #[test]
    fn test_decode_shape_mismatch_is_protocol() {
        let err = decode::<PropertiesEnvelope>(200, json!({"items": []})).unwrap_err();
        assert!(matches!(err, ConnectorError::Protocol { status: 200, .. }));
    }
}
