//! External integrations
//!
//! Adapters around the transformation core:
//!
//! - [`openmrs`] - the relational source (fetcher trait + pooled client)
//! - [`dhis2`] - the destination HTTP API (client + outbox submitter)

pub mod dhis2;
pub mod openmrs;
