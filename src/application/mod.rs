//! Application layer services orchestrating connector calls.
//!
//! Services depend on [`crate::domain::ConnectorGateway`] only, so they run
//! against the HTTP gateway in production and against mocks in tests.
//!
//! # Available Services
//!
//! - [`services::ImportService`] - Background imports and job tracking
//! - [`services::MetricsService`] - Metrics lookup, pagination walks, dashboards

pub mod services;
