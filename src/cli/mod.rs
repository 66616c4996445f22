//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Transit using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Transit - OpenMRS to DHIS2 migration tool
#[derive(Parser, Debug)]
#[command(name = "transit")]
#[command(version, about, long_about = None)]
#[command(author = "Transit Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "transit.toml", env = "TRANSIT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TRANSIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transform one location's patients into outbox units
    Migrate(commands::migrate::MigrateArgs),

    /// Submit pending outbox units to DHIS2
    Submit(commands::submit::SubmitArgs),

    /// Show migration progress and outbox state
    Status(commands::status::StatusArgs),

    /// Validate configuration file and mapping tables
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_migrate() {
        let cli = Cli::parse_from(["transit", "migrate", "--location", "100"]);
        assert_eq!(cli.config, "transit.toml");
        assert!(matches!(cli.command, Commands::Migrate(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["transit", "--config", "custom.toml", "submit"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Submit(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["transit", "--log-level", "debug", "status"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["transit", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["transit", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_migrate_requires_location() {
        let result = Cli::try_parse_from(["transit", "migrate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_migrate_scratch_conflicts_with_resume() {
        let result =
            Cli::try_parse_from(["transit", "migrate", "-l", "100", "--from-scratch", "--resume"]);
        assert!(result.is_err());
    }
}
