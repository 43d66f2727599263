//! dmcombat - tabletop combat tracker
//!
//! Tracks one encounter at a time: initiative order, hit points, conditions,
//! legendary actions and legendary resistances, driven through named tools.

pub mod catalog;
pub mod combat;
pub mod config;
pub mod error;
pub mod tools;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use catalog::StatBlockCatalog;
use combat::{CombatManager, RngRoller};

pub use config::Settings;
pub use error::CombatError;

/// Build a combat manager from settings
pub fn build_manager(settings: &Settings) -> Result<Arc<CombatManager>> {
    let mut catalog = StatBlockCatalog::builtin();
    if let Some(path) = &settings.catalog_path {
        let count = catalog
            .load_file(path)
            .with_context(|| format!("loading monster catalog {}", path.display()))?;
        info!("Loaded {} extra stat blocks", count);
    }

    let roller = match settings.rng_seed {
        Some(seed) => RngRoller::seeded(seed),
        None => RngRoller::from_entropy(),
    };

    Ok(CombatManager::builder()
        .catalog(catalog.shared())
        .roller(roller)
        .monster_save_bonus(settings.monster_save_bonus)
        .build()
        .shared())
}
