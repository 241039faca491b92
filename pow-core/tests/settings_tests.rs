//! Settings Loading Tests
//!
//! Layering of defaults, TOML files and `POW_*` variables, and logging setup.

use pow_core::util::logging::init_logging;
use pow_core::{ConsensusParams, Network, PowSettings, SettingsError};
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::Level;

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_file_values_override_defaults() {
    let file = toml_file(
        r#"
network = "regtest"
force_retarget = true
fork_activation_height = 4032
log_level = "debug"
"#,
    );

    let settings = PowSettings::load_with_vars(Some(file.path()), vars(&[])).unwrap();
    assert_eq!(settings.network, Network::Regtest);
    assert!(settings.force_retarget);
    assert_eq!(settings.fork_activation_height, Some(4032));
    assert_eq!(settings.drop_factor, None);
    assert_eq!(settings.level(), Level::DEBUG);

    let params = settings.consensus_params().unwrap();
    assert_eq!(params.fork_activation_height, 4032);
    assert_eq!(params.pow_limit, ConsensusParams::regtest().pow_limit);
}

#[test]
fn test_environment_overrides_file() {
    let file = toml_file("network = \"regtest\"\ndrop_factor = 2\n");

    let settings = PowSettings::load_with_vars(
        Some(file.path()),
        vars(&[("POW_NETWORK", "testnet"), ("POW_DROP_FACTOR", "8")]),
    )
    .unwrap();
    assert_eq!(settings.network, Network::Testnet);
    assert_eq!(settings.drop_factor, Some(8));
    assert_eq!(settings.consensus_params().unwrap().difficulty_drop_factor, 8);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let result = PowSettings::load_with_vars(Some(&path), vars(&[]));
    assert!(matches!(result, Err(SettingsError::Config(_))));
}

#[test]
fn test_invalid_override_is_rejected() {
    let file = toml_file("drop_factor = 0\n");

    let result = PowSettings::load_with_vars(Some(file.path()), vars(&[]));
    assert!(matches!(result, Err(SettingsError::Params(_))));
}

#[test]
fn test_logging_initializes_once() {
    assert!(init_logging(Some(Level::DEBUG)).is_ok());
    assert!(init_logging(None).is_err());
}
