// Transit - OpenMRS to DHIS2 Migration Tool
// Copyright (c) 2025 Transit Contributors
// Licensed under the MIT License

//! # Transit - OpenMRS to DHIS2 Migration
//!
//! Transit is an ETL tool built in Rust that migrates clinical encounter
//! records from an OpenMRS relational store into DHIS2 tracker programs
//! (tracked entities, enrollments, events) over the DHIS2 web API.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** patients, encounters and observations from the source database
//! - **Transforming** them into destination payloads via configurable mapping tables
//! - **Persisting** one idempotent unit file per patient with resumable progress
//! - **Submitting** pending units to the DHIS2 tracker endpoints
//!
//! ## Architecture
//!
//! Transit follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (mapping, transform, ledger, outbox, migrate)
//! - [`adapters`] - External integrations (OpenMRS, DHIS2)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use transit::adapters::openmrs::OpenmrsClient;
//! use transit::config::load_config;
//! use transit::core::ledger::ProgressLedger;
//! use transit::core::mapping::MappingStore;
//! use transit::core::migrate::{MigrationContext, MigrationCoordinator};
//! use transit::core::outbox::UnitOutbox;
//! use transit::domain::ids::LocationId;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("transit.toml")?;
//!
//!     let fetcher = Arc::new(OpenmrsClient::new(config.openmrs.clone()).await?);
//!     let mappings = Arc::new(MappingStore::new(&config.mappings.directory)?);
//!     let ctx = MigrationContext::new(
//!         LocationId::new("100")?,
//!         mappings,
//!         config.mappings.citizenship_code.as_str(),
//!         config.mappings.tracked_entity_type.as_str(),
//!         config.migration.default_program.clone(),
//!     );
//!
//!     let ledger = ProgressLedger::open(&config.migration.ledger_path)?;
//!     let outbox = UnitOutbox::new(&config.migration.outbox_dir)?;
//!
//!     let mut coordinator = MigrationCoordinator::new(fetcher, ctx, ledger, outbox);
//!     let summary = coordinator.run(false).await?;
//!
//!     println!("Transformed {} units", summary.transformed);
//!     Ok(())
//! }
//! ```
//!
//! ## Resumable Runs
//!
//! Transit records each completed patient in a progress ledger, keyed by
//! location, with atomic write-through persistence. A terminated run can
//! be resumed; the coordinator processes exactly the patients the ledger
//! does not yet record:
//!
//! ```rust,no_run
//! use transit::core::ledger::ProgressLedger;
//!
//! # fn example() -> transit::domain::Result<()> {
//! let mut ledger = ProgressLedger::open("state/progress.json")?;
//! ledger.update("100", &[42, 43], false)?;
//! assert_eq!(ledger.get("100"), Some(&[42, 43][..]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Transit uses the [`domain::TransitError`] hierarchy. Errors scoped to
//! one unit of work (mapping resolution, malformed rows) are caught at
//! the orchestration boundary and logged; run-level errors (source
//! connectivity, ledger writes) terminate the process:
//!
//! ```rust,no_run
//! use transit::domain::{Result, TransitError};
//!
//! fn example() -> Result<()> {
//!     let config = transit::config::load_config("transit.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Transit uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting migration");
//! warn!(patient_id = 42, "Unit failed, continuing run");
//! error!(error = "connection refused", "Source unreachable");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
