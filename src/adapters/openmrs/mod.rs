//! OpenMRS source adapter
//!
//! The [`SourceFetcher`] trait the core consumes, plus the pooled
//! relational client implementing it against the OpenMRS schema.

pub mod client;
pub mod traits;

pub use client::OpenmrsClient;
pub use traits::SourceFetcher;
