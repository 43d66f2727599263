//! Combatants

use serde::{Deserialize, Serialize};

use super::conditions::Conditions;
use super::resources::Resources;
use crate::catalog::LegendaryDefaults;

/// Definition of a combatant supplied when combat starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpec {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Initiative roll
    pub initiative: i32,
    /// Max hit points
    pub hp: i32,
    /// Armor class
    pub ac: i32,
    #[serde(default)]
    pub is_monster: bool,
    /// Monster template name used to seed legendary defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monster_name: Option<String>,
}

/// One combatant in the live encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub initiative: i32,
    pub max_hp: i32,
    pub current_hp: i32,
    pub armor_class: i32,
    pub conditions: Conditions,
    pub resources: Resources,
    pub is_monster: bool,
    pub monster_name: Option<String>,
    /// Legendary actions left this round
    pub legendary_actions: u32,
    pub max_legendary_actions: u32,
    pub legendary_resistances: u32,
}

impl Entity {
    /// Build a fresh combatant at full HP with no conditions or resources
    pub fn from_spec(spec: EntitySpec) -> Self {
        let max_hp = spec.hp.max(0);
        let monster_name = spec.monster_name.filter(|name| !name.is_empty());

        Self {
            id: spec.id,
            name: spec.name,
            initiative: spec.initiative,
            max_hp,
            current_hp: max_hp,
            armor_class: spec.ac,
            conditions: Conditions::default(),
            resources: Resources::default(),
            is_monster: spec.is_monster,
            monster_name,
            legendary_actions: 0,
            max_legendary_actions: 0,
            legendary_resistances: 0,
        }
    }

    /// Template to look up in the monster catalog, if any
    pub fn template(&self) -> Option<&str> {
        if self.is_monster {
            self.monster_name.as_deref()
        } else {
            None
        }
    }

    /// Seed legendary pools from catalog defaults
    pub fn apply_legendary_defaults(&mut self, defaults: LegendaryDefaults) {
        self.max_legendary_actions = defaults.actions_per_round;
        self.legendary_actions = defaults.actions_per_round;
        self.legendary_resistances = defaults.resistances;
    }

    pub fn is_unconscious(&self) -> bool {
        self.current_hp == 0
    }

    /// Status line: "name: cur/max HP [cond cond]"
    pub fn status_line(&self) -> String {
        let mut line = format!("{}: {}/{} HP", self.name, self.current_hp, self.max_hp);
        if !self.conditions.is_empty() {
            let names: Vec<&str> = self.conditions.names().collect();
            line.push_str(&format!(" [{}]", names.join(" ")));
        }
        line
    }
}
