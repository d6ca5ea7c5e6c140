//! HTTP access to the Search Console connector.
//!
//! - [`ConnectorClient`] - blocking, for scripts and synchronous callers
//! - [`HttpGateway`] - async, implements [`crate::domain::ConnectorGateway`]
//!
//! Both authenticate every call with `X-API-Key` and map failures through the
//! same classification in [`wire`].

pub mod client;
pub mod gateway;
pub mod wire;

pub use client::ConnectorClient;
pub use gateway::HttpGateway;
