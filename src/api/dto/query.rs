//! Query parameters for site-level reporting endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::{DateRange, MAX_PAGE_SIZE, OrderBy};

pub const DEFAULT_DAYS: u32 = 30;
pub const DEFAULT_EXPORT_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// `GET /gsc/export/top-pages/{site}` query.
///
/// `days` is capped at 480, roughly the 16 months of history the connector keeps.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct ExportParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 480))]
    pub days: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u32>,

    #[serde(default)]
    pub order_by: Option<OrderBy>,

    #[serde(default)]
    pub format: Option<ExportFormat>,
}

impl ExportParams {
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_DAYS)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_EXPORT_LIMIT).min(MAX_PAGE_SIZE)
    }
}

/// `GET /gsc/dashboard/{site}` query.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct DashboardParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 480))]
    pub days: Option<u32>,
}

impl DashboardParams {
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_DAYS)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckAccessParams {
    #[validate(length(min = 1, message = "property is required"))]
    pub property: String,
}

/// Reporting window echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct PeriodDto {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: u32,
}

impl PeriodDto {
    pub fn new(range: DateRange, days: u32) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
            days,
        }
    }
}
