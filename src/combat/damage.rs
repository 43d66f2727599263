//! Damage modifiers
//!
//! A target carrying a `resistances` resource halves all incoming damage,
//! whatever its type. The damage type is only a label for messages.

use serde::{Deserialize, Serialize};

use super::resources::Resources;

/// Resource key whose presence marks a target as resistant
pub const RESISTANCES_KEY: &str = "resistances";

/// Modifier applied to incoming damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageModifier {
    /// Takes 50% damage (rounded down)
    Resistant,
    /// Takes 100% damage
    Normal,
}

impl DamageModifier {
    /// Modifier for a target with the given resources
    pub fn for_resources(resources: &Resources) -> Self {
        if resources.contains(RESISTANCES_KEY) {
            DamageModifier::Resistant
        } else {
            DamageModifier::Normal
        }
    }

    /// Apply this modifier to a non-negative damage amount
    pub fn apply(&self, damage: i32) -> i32 {
        match self {
            DamageModifier::Resistant => damage / 2,
            DamageModifier::Normal => damage,
        }
    }

    /// Suffix appended to damage messages
    pub fn note(&self) -> &'static str {
        match self {
            DamageModifier::Resistant => " (resisted)",
            DamageModifier::Normal => "",
        }
    }
}

/// Result of applying damage to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageResult {
    /// Damage actually subtracted after modifiers
    pub final_damage: i32,
    /// Hit points left on the target
    pub remaining_hp: i32,
    /// True iff the target is at exactly 0 HP
    pub is_unconscious: bool,
    pub message: String,
}
