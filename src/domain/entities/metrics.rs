//! Search performance records and the queries that produce them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::date_range::DateRange;

/// Click-through rate, `0` when there were no impressions.
pub fn ctr(clicks: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        0.0
    } else {
        clicks as f64 / impressions as f64
    }
}

/// Aggregated performance of one page over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetric {
    pub url: String,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub avg_position: f64,
}

impl PageMetric {
    /// Builds a record with `ctr` derived from the counts.
    pub fn new(url: impl Into<String>, clicks: u64, impressions: u64, avg_position: f64) -> Self {
        Self {
            url: url.into(),
            clicks,
            impressions,
            ctr: ctr(clicks, impressions),
            avg_position,
        }
    }
}

/// One day of a single-URL timeseries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub avg_position: f64,
}

/// Page-shaped aggregate without a url.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTotals {
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub avg_position: f64,
}

/// Metrics for one URL: totals plus a chronological daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub url: String,
    pub site_url: String,
    pub period: DateRange,
    pub totals: MetricTotals,
    #[serde(default)]
    pub timeseries: Vec<DailyMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
    Tablet,
}

/// Numeric field used to rank page records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Clicks,
    Impressions,
    Ctr,
    Position,
}

impl OrderBy {
    pub fn value_of(self, metric: &PageMetric) -> f64 {
        match self {
            OrderBy::Clicks => metric.clicks as f64,
            OrderBy::Impressions => metric.impressions as f64,
            OrderBy::Ctr => metric.ctr,
            OrderBy::Position => metric.avg_position,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Read-only description of a single-URL metrics lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsQuery {
    pub url: String,
    /// Property to scope the lookup to; the connector infers it from `url`
    /// when absent.
    pub site_url: Option<String>,
    pub range: DateRange,
    pub country: Option<String>,
    pub device: Option<Device>,
}

impl MetricsQuery {
    pub fn new(url: impl Into<String>, range: DateRange) -> Self {
        Self {
            url: url.into(),
            site_url: None,
            range,
            country: None,
            device: None,
        }
    }

    pub fn with_site_url(mut self, site_url: Option<String>) -> Self {
        self.site_url = site_url;
        self
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    pub fn with_device(mut self, device: Option<Device>) -> Self {
        self.device = device;
        self
    }
}

/// Upstream hard limit on page size.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// One page request against `/metrics/urls`.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlListQuery {
    pub site_url: String,
    pub range: DateRange,
    pub limit: u32,
    pub offset: u32,
    pub order_by: OrderBy,
    pub order: SortOrder,
}

impl UrlListQuery {
    /// First page of 100 records ordered by clicks, descending.
    pub fn new(site_url: impl Into<String>, range: DateRange) -> Self {
        Self {
            site_url: site_url.into(),
            range,
            limit: 100,
            offset: 0,
            order_by: OrderBy::default(),
            order: SortOrder::default(),
        }
    }

    pub fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn ordered(mut self, order_by: OrderBy, order: SortOrder) -> Self {
        self.order_by = order_by;
        self.order = order;
        self
    }
}

/// Cursor over one page of per-URL results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    pub total: u64,
    pub has_more: bool,
}

/// One page of `/metrics/urls`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlPage {
    pub urls: Vec<PageMetric>,
    pub pagination: Pagination,
}
