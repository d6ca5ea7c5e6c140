//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod import;
pub mod metrics;
pub mod properties;
pub mod reports;

pub use auth::{auth_status_handler, auth_url_handler};
pub use health::{gsc_status_handler, health_handler};
pub use import::{import_handler, job_handler, job_list_handler};
pub use metrics::url_metrics_handler;
pub use properties::{check_access_handler, properties_handler};
pub use reports::{dashboard_handler, export_top_pages_handler};
