//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! the HTTP clients that talk to the connector service.
//!
//! # Modules
//!
//! - [`connector`] - Blocking client and async gateway over reqwest

pub mod connector;
