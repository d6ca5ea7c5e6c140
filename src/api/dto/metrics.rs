//! DTOs for metrics, export and dashboard endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::query::PeriodDto;
use crate::domain::aggregation::{Dashboard, DashboardTotals};
use crate::domain::entities::{DateRange, Device, MetricsQuery, PageMetric};
use crate::error::ConnectorError;

/// `POST /gsc/metrics/url` body.
#[derive(Debug, Deserialize, Validate)]
pub struct UrlMetricsBody {
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    pub start_date: String,
    pub end_date: String,

    pub site_url: Option<String>,

    #[validate(length(equal = 3, message = "country must be a 3-letter code"))]
    pub country: Option<String>,

    pub device: Option<Device>,
}

impl UrlMetricsBody {
    pub fn into_query(self) -> Result<MetricsQuery, ConnectorError> {
        let range = DateRange::parse(&self.start_date, &self.end_date)?;
        Ok(MetricsQuery::new(self.url, range)
            .with_site_url(self.site_url)
            .with_country(self.country)
            .with_device(self.device))
    }
}

/// JSON rendering of a top-pages export.
#[derive(Debug, Serialize)]
pub struct TopPagesResponse {
    pub site_url: String,
    pub period: PeriodDto,
    pub pages: Vec<PageMetric>,
}

/// CSV rendering of a top-pages export.
#[derive(Debug, Serialize)]
pub struct CsvExportResponse {
    pub csv_data: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub site_url: String,
    pub period: PeriodDto,
    pub totals: DashboardTotals,
    pub top_pages: Vec<PageMetric>,
    pub all_pages: Vec<PageMetric>,
}

impl DashboardResponse {
    pub fn new(site_url: String, days: u32, dashboard: Dashboard) -> Self {
        Self {
            site_url,
            period: PeriodDto::new(dashboard.period, days),
            totals: dashboard.totals,
            top_pages: dashboard.top_pages,
            all_pages: dashboard.all_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_into_query() {
        let body: UrlMetricsBody = serde_json::from_value(json!({
            "url": "https://example.com/blog",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
            "country": "fra",
            "device": "mobile"
        }))
        .unwrap();
        assert!(body.validate().is_ok());

        let query = body.into_query().unwrap();
        assert_eq!(query.url, "https://example.com/blog");
        assert_eq!(query.country.as_deref(), Some("fra"));
        assert_eq!(query.device, Some(Device::Mobile));
        assert!(query.site_url.is_none());
    }

    #[test]
    fn test_body_validation() {
        let body: UrlMetricsBody = serde_json::from_value(json!({
            "url": "not a url",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
            "country": "FR"
        }))
        .unwrap();
        let errors = body.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("url"));
        assert!(fields.contains_key("country"));
    }

    #[test]
    fn test_bad_date_is_validation_error() {
        let body: UrlMetricsBody = serde_json::from_value(json!({
            "url": "https://example.com/",
            "start_date": "2024-13-01",
            "end_date": "2024-01-31"
        }))
        .unwrap();
        assert!(matches!(
            body.into_query(),
            Err(ConnectorError::Validation(_))
        ));
    }
}
