//! Core business logic for Transit.
//!
//! This module contains the mapping, transformation and orchestration
//! logic for migration runs.
//!
//! # Modules
//!
//! - [`mapping`] - Mapping tables and the cached per-run mapping store
//! - [`transform`] - The pure transformation engine
//! - [`ledger`] - Resumable progress tracking per location
//! - [`outbox`] - Durable per-patient unit storage
//! - [`migrate`] - Unit-of-work orchestration
//!
//! # Migration Workflow
//!
//! The typical run:
//!
//! 1. **Load Mappings**: Open the mapping store over the configured directory
//! 2. **Fetch Scope**: Read the patient/encounter map for one location
//! 3. **Resume**: Subtract patients the progress ledger already records
//! 4. **Transform**: Per patient, map demographics and encounters
//! 5. **Persist**: Write the payload to the outbox, record the patient
//! 6. **Submit** (separate command): Drain the outbox to DHIS2
//!
//! # Example
//!
//! ```rust,no_run
//! use transit::core::ledger::ProgressLedger;
//! use transit::core::mapping::MappingStore;
//! use transit::core::migrate::{MigrationContext, MigrationCoordinator};
//! use transit::core::outbox::UnitOutbox;
//! use transit::domain::ids::LocationId;
//! use std::sync::Arc;
//!
//! # async fn example(fetcher: Arc<dyn transit::adapters::openmrs::SourceFetcher>)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let mappings = Arc::new(MappingStore::new("mappings")?);
//! let ctx = MigrationContext::new(
//!     LocationId::new("100")?,
//!     mappings,
//!     "RW",
//!     "nEenWmSyUEp",
//!     None,
//! );
//!
//! let ledger = ProgressLedger::open("state/progress.json")?;
//! let outbox = UnitOutbox::new("outbox")?;
//!
//! let mut coordinator = MigrationCoordinator::new(fetcher, ctx, ledger, outbox);
//! let summary = coordinator.run(false).await?;
//! println!("Transformed {} units", summary.transformed);
//! # Ok(())
//! # }
//! ```

pub mod ledger;
pub mod mapping;
pub mod migrate;
pub mod outbox;
pub mod transform;
