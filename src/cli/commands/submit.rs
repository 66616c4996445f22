//! Submit command implementation
//!
//! Drains pending outbox units to the DHIS2 API, oldest first.

use crate::adapters::dhis2::{Dhis2Client, Dhis2Submitter};
use crate::config::load_config;
use crate::core::outbox::UnitOutbox;
use crate::log_phase_complete;
use clap::Args;
use std::io::{self, Write};

/// Arguments for the submit command
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl SubmitArgs {
    /// Execute the submit command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting submit command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let outbox = match UnitOutbox::new(&config.migration.outbox_dir) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(5);
            }
        };

        let (pending, submitted) = match outbox.counts() {
            Ok(counts) => counts,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(5);
            }
        };

        if pending == 0 {
            println!("Nothing to submit ({submitted} unit(s) already delivered).");
            return Ok(0);
        }

        if !self.yes {
            println!("Submission Configuration:");
            println!("  Server: {}", config.dhis2.base_url);
            println!("  Pending units: {pending}");
            println!();
            print!("Proceed with submission? [y/N]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Submission cancelled.");
                return Ok(0);
            }
        }

        let client = match Dhis2Client::new(&config.dhis2) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create DHIS2 client");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = client.ping().await {
            tracing::error!(error = %e, "DHIS2 server unreachable");
            eprintln!("Failed to reach DHIS2: {e}");
            return Ok(4);
        }

        let submitter = Dhis2Submitter::new(client, outbox);

        println!("🚀 Submitting {pending} unit(s)...");
        println!();

        let summary = match submitter.run().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Submission failed");
                eprintln!("Submission failed: {e}");
                return Ok(5);
            }
        };

        log_phase_complete!("submit", summary.submitted, summary.duration);

        println!();
        println!("📊 Submission Summary:");
        println!("  Submitted: {}", summary.submitted);
        println!("  Rejected: {}", summary.failed);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        if !summary.errors.is_empty() {
            println!("⚠️  Rejected units (left pending):");
            for error in &summary.errors {
                println!("  - {error}");
            }
            println!();
        }

        let exit_code = if summary.is_successful() {
            println!("✅ All pending units submitted!");
            0
        } else {
            println!("⚠️  Submission completed with rejections.");
            1
        };

        Ok(exit_code)
    }
}
