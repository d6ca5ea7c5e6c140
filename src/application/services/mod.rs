//! Business logic services for the application layer.

pub mod import_service;
pub mod metrics_service;

pub use import_service::{ImportHandle, ImportService, ImportStart};
pub use metrics_service::MetricsService;
