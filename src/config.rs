//! Runtime settings
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `DMCOMBAT_*` environment variables.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DMCOMBAT_";

/// Save bonus applied to every monster until stat blocks drive it
pub const DEFAULT_MONSTER_SAVE_BONUS: i32 = 3;

/// Engine and driver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Flat bonus added to monster saving throws
    pub monster_save_bonus: i32,
    /// Seed for reproducible dice; entropy when absent
    pub rng_seed: Option<u64>,
    /// Extra stat blocks (JSON array) merged over the built-ins
    pub catalog_path: Option<PathBuf>,
    /// Tracing filter used when RUST_LOG is unset
    pub log_filter: String,
    /// Emit logs as JSON
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monster_save_bonus: DEFAULT_MONSTER_SAVE_BONUS,
            rng_seed: None,
            catalog_path: None,
            log_filter: "dmcombat=info".to_string(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Figment with all layers; a missing file is skipped
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load settings from the layered sources
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(file).extract()
    }
}
