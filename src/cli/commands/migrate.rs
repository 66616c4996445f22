//! Migrate command implementation
//!
//! The transform phase: fetch one location's patients and encounters,
//! transform them into destination payloads, persist them to the outbox
//! and record progress. Submission to DHIS2 is a separate command.

use crate::adapters::openmrs::OpenmrsClient;
use crate::config::load_config;
use crate::core::ledger::ProgressLedger;
use crate::core::mapping::MappingStore;
use crate::core::migrate::{MigrationContext, MigrationCoordinator};
use crate::core::outbox::UnitOutbox;
use crate::domain::ids::{FormId, LocationId};
use crate::log_phase_complete;
use clap::Args;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Source location id to migrate
    #[arg(short, long)]
    pub location: String,

    /// Clear recorded progress for this location before starting
    #[arg(long, conflicts_with = "resume")]
    pub from_scratch: bool,

    /// Resume from recorded progress (the default when progress exists)
    #[arg(long)]
    pub resume: bool,

    /// Override the per-run unit limit
    #[arg(long)]
    pub limit: Option<usize>,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,
}

impl MigrateArgs {
    /// Execute the migrate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(location = %self.location, "Starting migrate command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if let Some(limit) = self.limit {
            config.migration.unit_limit = Some(limit);
        }

        let location = match LocationId::new(&self.location) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Invalid location id: {e}");
                return Ok(2);
            }
        };

        let mappings = match MappingStore::new(&config.mappings.directory) {
            Ok(m) => Arc::new(m),
            Err(e) => {
                tracing::error!(error = %e, "Failed to open mapping store");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let ledger = match ProgressLedger::open(&config.migration.ledger_path) {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open progress ledger");
                eprintln!("Error: {e}");
                return Ok(5);
            }
        };

        // Resume or scratch: flags win, otherwise ask when this location
        // has recorded history
        let recorded = ledger.get(location.as_str()).map(<[i64]>::len);
        let from_scratch = if self.from_scratch {
            true
        } else if self.resume || recorded.is_none() {
            false
        } else if self.yes {
            // Non-interactive default: resume
            false
        } else {
            let done = recorded.unwrap_or(0);
            println!(
                "Location {} has been handled before ({done} patient(s) recorded).",
                location
            );
            print!("Resume or start from scratch? [resume/scratch]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            match input.trim().to_lowercase().as_str() {
                "scratch" => true,
                "resume" | "" => false,
                other => {
                    eprintln!("Invalid choice: {other}. Expected 'resume' or 'scratch'.");
                    return Ok(2);
                }
            }
        };

        // Confirmation prompt (unless --yes)
        if !self.yes {
            println!("Migration Configuration:");
            println!("  Location: {location}");
            println!(
                "  Mode: {}",
                if from_scratch { "from scratch" } else { "resume" }
            );
            println!("  Mappings: {}", config.mappings.directory);
            println!("  Outbox: {}", config.migration.outbox_dir);
            if let Some(limit) = config.migration.unit_limit {
                println!("  Unit limit: {limit}");
            }
            println!();
            print!("Proceed with migration? [y/N]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Migration cancelled.");
                return Ok(0);
            }
        }

        let outbox = match UnitOutbox::new(&config.migration.outbox_dir) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open outbox");
                eprintln!("Error: {e}");
                return Ok(5);
            }
        };

        tracing::info!(
            connection = "openmrs",
            "Connecting to source database"
        );
        let fetcher = match OpenmrsClient::new(config.openmrs.clone()).await {
            Ok(client) => {
                if let Err(e) = client.test_connection().await {
                    tracing::error!(error = %e, "Source connection test failed");
                    eprintln!("Failed to connect to OpenMRS: {e}");
                    return Ok(4);
                }
                Arc::new(client)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create source client");
                eprintln!("Failed to connect to OpenMRS: {e}");
                return Ok(4);
            }
        };

        let ctx = MigrationContext::new(
            location,
            mappings,
            config.mappings.citizenship_code.as_str(),
            config.mappings.tracked_entity_type.as_str(),
            config.migration.default_program.clone(),
        );

        // form_ids are validated numeric on config load
        let form_filter: Vec<FormId> = config
            .migration
            .form_ids
            .iter()
            .filter_map(|f| FormId::from_str(f).ok())
            .collect();

        let mut coordinator = MigrationCoordinator::new(fetcher, ctx, ledger, outbox)
            .with_form_filter(form_filter)
            .with_unit_limit(config.migration.unit_limit);

        println!("🚀 Starting migration...");
        println!();

        let summary = match coordinator.run(from_scratch).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Migration failed");
                eprintln!("Migration failed: {e}");
                return Ok(5);
            }
        };

        log_phase_complete!("migrate", summary.transformed, summary.duration);

        println!();
        println!("📊 Migration Summary:");
        println!("  Location: {}", summary.location);
        println!("  Patients in scope: {}", summary.total_patients);
        println!("  Already processed: {}", summary.already_processed);
        println!("  Transformed: {}", summary.transformed);
        println!("  Failed: {}", summary.failed());
        if summary.deferred > 0 {
            println!("  Deferred (unit limit): {}", summary.deferred);
        }
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!("  Success rate: {:.2}%", summary.success_rate());
        println!();

        if !summary.failures.is_empty() {
            println!("⚠️  Failed units:");
            for failure in &summary.failures {
                println!(
                    "  - patient {} at stage {}: {}",
                    failure.patient, failure.stage, failure.message
                );
            }
            println!();
        }

        let exit_code = if summary.is_successful() {
            println!("✅ Migration completed successfully!");
            println!("Run 'transit submit' to deliver the pending units.");
            0
        } else {
            println!("⚠️  Migration completed with failures.");
            1
        };

        Ok(exit_code)
    }
}
