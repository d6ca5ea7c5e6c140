//! Domain layer: value objects, the connector contract and pure aggregation.
//!
//! # Architecture
//!
//! - [`entities`] - Properties, date ranges, metric records, import jobs
//! - [`gateway`] - [`gateway::ConnectorGateway`], the async connector contract
//! - [`aggregation`] - Totals, rankings, CSV export and dashboards
//!
//! # Design Principles
//!
//! - No I/O happens here; the gateway trait is implemented in
//!   [`crate::infrastructure`]
//! - Orchestration lives in [`crate::application::services`]

pub mod aggregation;
pub mod entities;
pub mod gateway;

pub use gateway::ConnectorGateway;

#[cfg(test)]
pub use gateway::MockConnectorGateway;
