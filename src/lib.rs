//! # GSC Gateway
//!
//! Client and HTTP façade for a Search Console connector service.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Value objects, the connector contract, pure aggregation
//! - **Application Layer** ([`application`]) - Background imports and metrics services
//! - **Infrastructure Layer** ([`infrastructure`]) - Blocking and async HTTP clients
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Features
//!
//! - Authenticated calls with typed error classification
//! - Non-blocking imports with observable job lifecycle
//! - Top pages, totals, dashboards and CSV export from paginated metrics
//! - Re-authentication hints when the connector's OAuth grant is missing
//!
//! ## Quick Start
//!
//! ```bash
//! export GSC_BASE_URL="http://localhost:8021"
//! export GSC_API_KEY="..."
//!
//! cargo run
//! ```
//!
//! ## Library use
//!
//! ```no_run
//! use gsc_gateway::config::ConnectorConfig;
//! use gsc_gateway::infrastructure::connector::ConnectorClient;
//!
//! let config = ConnectorConfig::new("http://localhost:8021", "my-key")?;
//! let client = ConnectorClient::new(config)?;
//! for property in client.properties()? {
//!     println!("{}", property.site_url);
//! }
//! # Ok::<(), gsc_gateway::error::ConnectorError>(())
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::{AppError, ConnectorError};
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ImportService, ImportStart, MetricsService};
    pub use crate::config::ConnectorConfig;
    pub use crate::domain::ConnectorGateway;
    pub use crate::domain::entities::{DateRange, ImportRequest, MetricsQuery, PageMetric};
    pub use crate::error::{AppError, ConnectorError};
    pub use crate::infrastructure::connector::{ConnectorClient, HttpGateway};
    pub use crate::state::AppState;
}
