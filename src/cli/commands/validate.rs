//! Validate config command implementation
//!
//! Validates the configuration file and reports which mapping tables
//! are present in the configured mappings directory.

use crate::config::load_config;
use crate::core::mapping::MappingName;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        // load_config already validated; re-run for the explicit report
        if let Err(e) = config.validate() {
            println!("❌ Configuration validation failed");
            println!("   Error: {e}");
            println!();
            return Ok(2);
        }

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  OpenMRS: {}",
            config
                .openmrs
                .connection_string
                .split('@')
                .next_back()
                .unwrap_or("***")
        );
        println!("  DHIS2 Server: {}", config.dhis2.base_url);
        println!("  Tracked Entity Type: {}", config.mappings.tracked_entity_type);
        println!("  Citizenship Code: {}", config.mappings.citizenship_code);
        println!("  Ledger: {}", config.migration.ledger_path);
        println!("  Outbox: {}", config.migration.outbox_dir);
        if !config.migration.form_ids.is_empty() {
            println!("  Form Filter: {:?}", config.migration.form_ids);
        }
        println!();

        // Mapping directory report
        let dir = Path::new(&config.mappings.directory);
        if !dir.is_dir() {
            println!("❌ Mappings directory not found: {}", dir.display());
            println!();
            return Ok(2);
        }

        println!("Mapping tables in {}:", dir.display());
        let mut missing_required = false;
        for name in [
            MappingName::Location,
            MappingName::Attribute,
            MappingName::Province,
            MappingName::District,
        ] {
            let present = dir.join(name.file_name()).is_file();
            let marker = if present { "✅" } else { "⚠️ " };
            println!("  {marker} {}", name.file_name());
            if !present && matches!(name, MappingName::Location | MappingName::Attribute) {
                missing_required = true;
            }
        }

        let forms_dir = dir.join("forms");
        let form_count = forms_dir
            .read_dir()
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0);
        println!("  📋 {form_count} form mapping(s) in forms/");
        println!();

        if missing_required {
            println!("⚠️  Location and attribute tables are required for every run.");
            return Ok(2);
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs {};
        // Just ensure it compiles and can be created
        let _ = format!("{args:?}");
    }
}
