//! Status command implementation
//!
//! Displays recorded migration progress per location and the outbox
//! pending/submitted counts.

use crate::config::load_config;
use crate::core::ledger::ProgressLedger;
use crate::core::outbox::UnitOutbox;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Filter by location id
    #[arg(long)]
    pub location: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking migration status");

        println!("📊 Migration Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let ledger = match ProgressLedger::open(&config.migration.ledger_path) {
            Ok(l) => l,
            Err(e) => {
                println!("❌ Failed to load progress ledger");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        let scopes: Vec<(&str, usize)> = ledger
            .scopes()
            .filter(|(scope, _)| {
                self.location
                    .as_deref()
                    .map(|wanted| *scope == wanted)
                    .unwrap_or(true)
            })
            .collect();

        if scopes.is_empty() {
            println!("No migration history found.");
            println!("Run 'transit migrate --location <id>' to start migrating.");
        } else {
            println!("{:<20} {:<20}", "Location", "Patients recorded");
            println!("{}", "-".repeat(40));
            for (scope, count) in scopes {
                println!("{scope:<20} {count:<20}");
            }
        }
        println!();

        match UnitOutbox::new(&config.migration.outbox_dir).and_then(|o| o.counts()) {
            Ok((pending, submitted)) => {
                println!("Outbox ({}):", config.migration.outbox_dir);
                println!("  Pending:   {pending}");
                println!("  Submitted: {submitted}");
            }
            Err(e) => {
                println!("❌ Failed to read outbox");
                println!("   Error: {e}");
                return Ok(5);
            }
        }
        println!();

        Ok(0)
    }
}
