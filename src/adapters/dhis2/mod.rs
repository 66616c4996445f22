//! DHIS2 destination adapter
//!
//! HTTP client for the tracker endpoints and the submitter that drains
//! the unit outbox to them.

pub mod client;
pub mod models;
pub mod submitter;

pub use client::Dhis2Client;
pub use submitter::{Dhis2Submitter, SubmitSummary};
