//! Runtime settings for embedding the retarget core
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `POW_*` environment variables (for example `POW_NETWORK=regtest` or
//! `POW_FORK_ACTIVATION_HEIGHT=4032`).

use crate::consensus::params::{ConsensusParams, Network};
use crate::error::SettingsError;
use crate::util::logging::parse_level;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, Level};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "POW";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowSettings {
    /// Which network's consensus parameters to use
    pub network: Network,
    /// Disable the no-retargeting and minimum-difficulty shortcuts
    pub force_retarget: bool,
    /// Override for the network's fork activation height
    pub fork_activation_height: Option<u32>,
    /// Override for the reset path's drop factor
    pub drop_factor: Option<u32>,
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for PowSettings {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            force_retarget: false,
            fork_activation_height: None,
            drop_factor: None,
            log_level: "info".to_string(),
        }
    }
}

impl PowSettings {
    /// Load settings from defaults, `path` (if given) and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Like [`load`](Self::load), reading environment variables from `vars`
    /// instead of the process environment
    pub fn load_with_vars(
        path: Option<&Path>,
        vars: config::Map<String, String>,
    ) -> Result<Self, SettingsError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading settings from: {:?}", path);
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(env.try_parsing(true));

        let settings: PowSettings = builder.build()?.try_deserialize()?;
        settings.consensus_params()?;

        debug!(
            network = %settings.network,
            force_retarget = settings.force_retarget,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Consensus parameters for the configured network with overrides applied
    pub fn consensus_params(&self) -> Result<ConsensusParams, SettingsError> {
        let mut params = ConsensusParams::for_network(self.network);
        if let Some(height) = self.fork_activation_height {
            params.fork_activation_height = height;
        }
        if let Some(factor) = self.drop_factor {
            params.difficulty_drop_factor = factor;
        }
        params.validate()?;
        Ok(params)
    }

    /// Log level as a `tracing` level, INFO if unrecognised
    pub fn level(&self) -> Level {
        parse_level(&self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PowSettings::load_with_vars(None, config::Map::new()).unwrap();
        assert_eq!(settings, PowSettings::default());
        assert_eq!(
            settings.consensus_params().unwrap(),
            ConsensusParams::mainnet()
        );
        assert_eq!(settings.level(), Level::INFO);
    }

    #[test]
    fn test_overrides_apply_to_params() {
        let settings = PowSettings {
            network: Network::Regtest,
            fork_activation_height: Some(100),
            drop_factor: Some(2),
            ..PowSettings::default()
        };
        let params = settings.consensus_params().unwrap();
        assert_eq!(params.fork_activation_height, 100);
        assert_eq!(params.difficulty_drop_factor, 2);
        assert!(params.pow_no_retargeting);
    }

    #[test]
    fn test_zero_drop_factor_rejected() {
        let settings = PowSettings {
            drop_factor: Some(0),
            ..PowSettings::default()
        };
        assert!(matches!(
            settings.consensus_params(),
            Err(SettingsError::Params(_))
        ));
    }
}
