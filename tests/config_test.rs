//! Configuration loading tests.

use std::io::Write;

use secrecy::ExposeSecret;
use tempfile::NamedTempFile;

use claimflow::config::{load_config, ServerMode};

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
[source]
server = "remote"
host = "claims.example.com"
port = 8443
max_idle_millis = 300000
min_idle_millis_before_connection_drop = 60000

[ingestion]
max_per_batch = 50
starting_sequence_number = 1000
version_requirement = "~0.15.1"
max_dead_letter_age_days = 30

[logging]
level = "debug"
local_enabled = false
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.source.server, ServerMode::Remote);
    assert_eq!(config.source.host, "claims.example.com");
    assert_eq!(config.source.port, 8443);
    assert_eq!(config.ingestion.max_per_batch, 50);
    assert_eq!(config.ingestion.starting_sequence_number, Some(1000));
    assert_eq!(config.ingestion.max_dead_letter_age_days, 30);
    assert_eq!(config.logging.level, "debug");
    assert!(!config.logging.local_enabled);

    let settings = config.orchestrator_settings().unwrap();
    assert_eq!(settings.max_per_batch, 50);
    assert!(settings.version_requirement.allows("0.15.7"));
    assert!(!settings.version_requirement.allows("0.16.0"));
}

#[test]
fn test_auth_token_substituted_from_environment() {
    std::env::set_var("CLAIMFLOW_IT_AUTH_TOKEN", "token-from-env");
    let file = write_config(
        r#"
[source]
server = "remote"
host = "claims.example.com"
auth_token = "${CLAIMFLOW_IT_AUTH_TOKEN}"

[ingestion]
version_requirement = "^0.15.0"
"#,
    );

    let config = load_config(file.path()).unwrap();
    let token = config.source.auth_token.as_ref().unwrap();
    assert_eq!(token.expose_secret(), "token-from-env");
    // The token never leaks through Debug output.
    assert!(!format!("{:?}", config.source).contains("token-from-env"));
    std::env::remove_var("CLAIMFLOW_IT_AUTH_TOKEN");
}

#[test]
fn test_in_process_server_config() {
    let file = write_config(
        r#"
[source]
server = "in-process"
in_process_server_name = "replay"

[ingestion]
version_requirement = "^0.15.0"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.source.server, ServerMode::InProcess);
    let settings = config.orchestrator_settings().unwrap();
    assert!(!settings.remote_server);
}

#[test]
fn test_missing_version_requirement_rejected() {
    let file = write_config(
        r#"
[source]
server = "remote"
host = "claims.example.com"

[ingestion]
max_per_batch = 10
"#,
    );

    assert!(load_config(file.path()).is_err());
}
