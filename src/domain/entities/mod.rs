//! Value objects exchanged with the connector.

pub mod date_range;
pub mod health;
pub mod import;
pub mod metrics;
pub mod property;

pub use date_range::{DATE_FORMAT, DateRange};
pub use health::{HealthStatus, ServiceHealth};
pub use import::{
    DataState, Dimension, ImportFilters, ImportJob, ImportPreview, ImportRequest, ImportResponse,
    JobError, JobState, SearchType, is_country_code,
};
pub use metrics::{
    DailyMetric, Device, MAX_PAGE_SIZE, MetricTotals, MetricsQuery, MetricsResult, OrderBy,
    PageMetric, Pagination, SortOrder, UrlListQuery, UrlPage, ctr,
};
pub use property::{AccessCheck, AuthStatus, Property, PropertyType};
