//! Helpers shared by the site-level reporting handlers.
//!
//! - [`site`] - Bare host to Search Console property URL
//! - [`window`] - Reporting window ending today

pub mod site;
pub mod window;
