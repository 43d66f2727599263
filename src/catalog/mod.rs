//! Monster catalog
//!
//! Read-only stat-block data. The combat engine only asks it one question:
//! what legendary capability does a monster template start with. Full stat
//! blocks, the monster list and the rule summaries are served for reading.

pub mod rules;
mod stat_block;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use stat_block::{
    LairAction, LegendaryActionOption, LegendaryActionSet, MonsterAction, MonsterStat,
    MonsterTrait,
};

/// Legendary capability seeded into a monster at combat start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegendaryDefaults {
    /// Legendary actions per round
    pub actions_per_round: u32,
    /// Legendary resistances available
    pub resistances: u32,
}

/// One row of the monster list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSummary {
    pub name: String,
    #[serde(rename = "cr")]
    pub challenge_rating: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Template name -> legendary defaults lookup
pub trait MonsterCatalog: Send + Sync {
    /// `None` means the template is unknown; callers treat that as no
    /// legendary capability.
    fn legendary_defaults(&self, template: &str) -> Option<LegendaryDefaults>;

    /// Full stat block, for catalogs that carry one
    fn stat_block(&self, _name: &str) -> Option<MonsterStat> {
        None
    }

    /// Every monster with a stat block, sorted by name
    fn monsters(&self) -> Vec<MonsterSummary> {
        Vec::new()
    }
}

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Catalog backed by SRD stat blocks, keyed by exact monster name
#[derive(Debug, Clone, Default)]
pub struct StatBlockCatalog {
    monsters: HashMap<String, MonsterStat>,
}

impl StatBlockCatalog {
    /// Empty catalog (every template unknown)
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the built-in stat blocks
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for monster in stat_block::builtin() {
            catalog.insert(monster);
        }
        catalog
    }

    /// Create a shared instance
    pub fn shared(self) -> Arc<dyn MonsterCatalog> {
        Arc::new(self)
    }

    /// Add or replace a stat block
    pub fn insert(&mut self, monster: MonsterStat) {
        self.monsters.insert(monster.name.clone(), monster);
    }

    /// Merge stat blocks from a JSON file holding an array of `MonsterStat`
    pub fn load_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;
        let monsters: Vec<MonsterStat> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: display.clone(),
                source,
            })?;

        let count = monsters.len();
        for monster in monsters {
            self.insert(monster);
        }
        debug!("Loaded {} stat blocks from {}", count, path.display());
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Option<&MonsterStat> {
        self.monsters.get(name)
    }

    /// Monster names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.monsters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl MonsterCatalog for StatBlockCatalog {
    fn legendary_defaults(&self, template: &str) -> Option<LegendaryDefaults> {
        let monster = self.monsters.get(template)?;
        Some(LegendaryDefaults {
            actions_per_round: monster
                .legendary_actions
                .as_ref()
                .map_or(0, |set| set.actions_per_round),
            resistances: monster.legendary_resistances,
        })
    }

    fn stat_block(&self, name: &str) -> Option<MonsterStat> {
        self.get(name).cloned()
    }

    fn monsters(&self) -> Vec<MonsterSummary> {
        self.names()
            .into_iter()
            .filter_map(|name| self.get(name))
            .map(|monster| MonsterSummary {
                name: monster.name.clone(),
                challenge_rating: monster.challenge_rating,
                kind: monster.kind.clone(),
            })
            .collect()
    }
}

impl MonsterCatalog for HashMap<String, LegendaryDefaults> {
    fn legendary_defaults(&self, template: &str) -> Option<LegendaryDefaults> {
        self.get(template).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_dragon_defaults() {
        let catalog = StatBlockCatalog::builtin();
        assert_eq!(
            catalog.legendary_defaults("Ancient Red Dragon"),
            Some(LegendaryDefaults {
                actions_per_round: 3,
                resistances: 3,
            })
        );
    }

    #[test]
    fn test_non_legendary_and_unknown() {
        let catalog = StatBlockCatalog::builtin();
        assert_eq!(
            catalog.legendary_defaults("Goblin"),
            Some(LegendaryDefaults::default())
        );
        assert_eq!(catalog.legendary_defaults("Tarrasque"), None);
        assert_eq!(catalog.names(), vec!["Ancient Red Dragon", "Goblin"]);
    }

    #[test]
    fn test_stat_blocks_and_list() {
        let catalog = StatBlockCatalog::builtin();

        let goblin = catalog.stat_block("Goblin").unwrap();
        assert_eq!(goblin.hp, 7);
        assert_eq!(goblin.actions[0].damage_dice.as_deref(), Some("1d6+2"));
        assert!(catalog.stat_block("Tarrasque").is_none());

        let list = catalog.monsters();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Ancient Red Dragon");
        assert_eq!(list[0].kind, "dragon");
        assert_eq!(list[1].challenge_rating, 0.25);

        let row = serde_json::to_value(&list[1]).unwrap();
        assert_eq!(row["cr"], 0.25);
        assert_eq!(row["type"], "humanoid");
    }

    #[test]
    fn test_map_catalog() {
        let mut map = HashMap::new();
        map.insert(
            "Lich".to_string(),
            LegendaryDefaults {
                actions_per_round: 3,
                resistances: 3,
            },
        );
        assert_eq!(map.legendary_defaults("Lich").map(|d| d.resistances), Some(3));
        assert!(map.legendary_defaults("Goblin").is_none());
        assert!(map.stat_block("Lich").is_none());
        assert!(map.monsters().is_empty());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "name": "Adult Blue Dragon",
                "size": "Huge",
                "type": "dragon",
                "alignment": "lawful evil",
                "hp": 225,
                "ac": 19,
                "challenge_rating": 16,
                "legendary_actions": {{ "actions_per_round": 3 }},
                "legendary_resistances": 3
            }}]"#
        )
        .unwrap();

        let mut catalog = StatBlockCatalog::builtin();
        assert_eq!(catalog.load_file(file.path()).unwrap(), 1);
        assert_eq!(
            catalog.legendary_defaults("Adult Blue Dragon"),
            Some(LegendaryDefaults {
                actions_per_round: 3,
                resistances: 3,
            })
        );
        assert_eq!(catalog.get("Adult Blue Dragon").unwrap().kind, "dragon");
    }

    #[test]
    fn test_load_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let mut catalog = StatBlockCatalog::new();
        assert!(matches!(
            catalog.load_file(file.path()),
            Err(CatalogError::Parse { .. })
        ));
    }
}
