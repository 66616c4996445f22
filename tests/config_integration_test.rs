//! Configuration loading integration tests

use std::io::Write;
use tempfile::NamedTempFile;
use transit::config::load_config;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_full_config_round_trip() {
    let file = write_config(
        r#"
[application]
name = "transit"
log_level = "debug"

[openmrs]
connection_string = "postgresql://openmrs:secret@db:5432/openmrs"
max_connections = 8

[dhis2]
base_url = "https://dhis2.example.org"
username = "transit"
password = "district"
timeout_seconds = 60

[mappings]
directory = "conf/mappings"
citizenship_code = "RW"
tracked_entity_type = "nEenWmSyUEp"

[migration]
ledger_path = "var/progress.json"
outbox_dir = "var/outbox"
unit_limit = 20
form_ids = ["27", "31"]
default_program = "vIpBngITCYm"

[logging]
local_enabled = true
local_path = "var/logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.openmrs.max_connections, 8);
    assert_eq!(config.dhis2.timeout_seconds, 60);
    assert_eq!(config.mappings.directory, "conf/mappings");
    assert_eq!(config.migration.unit_limit, Some(20));
    assert_eq!(config.migration.form_ids, vec!["27", "31"]);
    assert_eq!(
        config.migration.default_program.as_deref(),
        Some("vIpBngITCYm")
    );
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_env_substitution_in_config() {
    std::env::set_var("TRANSIT_IT_DHIS2_PW", "sub-secret");
    let file = write_config(
        r#"
[openmrs]
connection_string = "postgresql://u:p@db:5432/openmrs"

[dhis2]
base_url = "https://dhis2.example.org"
username = "transit"
password = "${TRANSIT_IT_DHIS2_PW}"

[mappings]
citizenship_code = "RW"
tracked_entity_type = "nEenWmSyUEp"
"#,
    );

    let config = load_config(file.path()).unwrap();
    use secrecy::ExposeSecret;
    assert_eq!(config.dhis2.password.expose_secret().as_ref(), "sub-secret");
    std::env::remove_var("TRANSIT_IT_DHIS2_PW");
}

#[test]
fn test_missing_env_var_is_config_error() {
    std::env::remove_var("TRANSIT_IT_UNSET_VAR");
    let file = write_config(
        r#"
[openmrs]
connection_string = "postgresql://u:p@db:5432/openmrs"

[dhis2]
base_url = "https://dhis2.example.org"
username = "transit"
password = "${TRANSIT_IT_UNSET_VAR}"

[mappings]
citizenship_code = "RW"
tracked_entity_type = "nEenWmSyUEp"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TRANSIT_IT_UNSET_VAR"));
}

#[test]
fn test_validation_failure_reported() {
    let file = write_config(
        r#"
[openmrs]
connection_string = "postgresql://u:p@db:5432/openmrs"

[dhis2]
base_url = "not a url"
username = "transit"
password = "district"

[mappings]
citizenship_code = "RW"
tracked_entity_type = "nEenWmSyUEp"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("base_url"));
}

#[test]
fn test_malformed_toml_reported() {
    let file = write_config("this is = not [ valid toml");
    assert!(load_config(file.path()).is_err());
}
