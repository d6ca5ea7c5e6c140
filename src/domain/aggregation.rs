//! Pure aggregation over page-level metric records.
//!
//! Nothing here performs I/O or mutates its input: every function works on
//! borrowed records and returns fresh values.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::domain::entities::{DateRange, MetricTotals, OrderBy, PageMetric, ctr};

/// Column order of every CSV export.
pub const EXPORT_COLUMNS: [&str; 5] = ["url", "clicks", "impressions", "ctr", "avg_position"];

/// Number of pages highlighted on a dashboard.
pub const DASHBOARD_TOP: usize = 10;

/// Ranks records by `metric`, highest first, ties by ascending url.
pub fn top_pages(records: &[PageMetric], metric: OrderBy, limit: usize) -> Vec<PageMetric> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| compare_desc(metric, a, b));
    ranked.truncate(limit);
    ranked
}

fn compare_desc(metric: OrderBy, a: &PageMetric, b: &PageMetric) -> Ordering {
    metric
        .value_of(b)
        .total_cmp(&metric.value_of(a))
        .then_with(|| a.url.cmp(&b.url))
}

/// Sums counts and recomputes ratios from the sums.
///
/// `ctr` is `Σclicks / Σimpressions`, never an average of per-record ratios.
/// `avg_position` is weighted by impressions; both are `0` without impressions.
pub fn totals(records: &[PageMetric]) -> MetricTotals {
    let clicks: u64 = records.iter().map(|r| r.clicks).sum();
    let impressions: u64 = records.iter().map(|r| r.impressions).sum();
    let weighted_position: f64 = records
        .iter()
        .map(|r| r.avg_position * r.impressions as f64)
        .sum();

    let avg_position = if impressions == 0 {
        0.0
    } else {
        weighted_position / impressions as f64
    };

    MetricTotals {
        clicks,
        impressions,
        ctr: ctr(clicks, impressions),
        avg_position,
    }
}

/// Serializes records as CSV with the fixed [`EXPORT_COLUMNS`] header.
///
/// Any serializable record works; fields are looked up by name so the
/// record's own field order does not matter, and absent or null fields are
/// left empty.
pub fn to_csv<T: Serialize>(records: &[T]) -> Result<String, serde_json::Error> {
    let mut out = EXPORT_COLUMNS.join(",");
    out.push('\n');

    for record in records {
        let value = serde_json::to_value(record)?;
        let row: Vec<String> = EXPORT_COLUMNS
            .iter()
            .map(|column| csv_field(value.get(column)))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    Ok(out)
}

fn csv_field(value: Option<&Value>) -> String {
    let raw = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw
    }
}

/// Totals block of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardTotals {
    #[serde(flatten)]
    pub metrics: MetricTotals,
    pub pages_analyzed: usize,
}

/// Composite view: totals, the top pages by clicks, and every record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub period: DateRange,
    pub totals: DashboardTotals,
    pub top_pages: Vec<PageMetric>,
    pub all_pages: Vec<PageMetric>,
}

pub fn dashboard(records: &[PageMetric], period: DateRange) -> Dashboard {
    Dashboard {
        period,
        totals: DashboardTotals {
            metrics: totals(records),
            pages_analyzed: records.len(),
        },
        top_pages: top_pages(records, OrderBy::Clicks, DASHBOARD_TOP),
        all_pages: records.to_vec(),
    }
}
