use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::model::ids::IdScheme;

/// File consulted for configuration, relative to the working directory.
pub const CONFIG_FILE: &str = "Voting.toml";

/// Prefix of environment variables that override the file, e.g. `VOTING_ID_SCHEME`.
pub const ENV_PREFIX: &str = "VOTING_";

/// Application configuration, derived from built-in defaults, then
/// `Voting.toml`, then `VOTING_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    id_scheme: IdScheme,
    log_config: PathBuf,
    sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_scheme: IdScheme::Sequential,
            log_config: PathBuf::from("log4rs.yaml"),
            sample_data: false,
        }
    }
}

impl Config {
    /// The layered configuration sources.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load the configuration from all sources.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// How new entity IDs are generated.
    /// Configured via `id_scheme`: `"sequential"` or `"timestamped"`.
    pub fn id_scheme(&self) -> IdScheme {
        self.id_scheme
    }

    /// Path of the log4rs configuration file.
    pub fn log_config(&self) -> &Path {
        &self.log_config
    }

    /// Whether to seed the sample voters, candidates and elections at startup.
    pub fn sample_data(&self) -> bool {
        self.sample_data
    }
}
