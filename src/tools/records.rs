//! Flat input/output records, one pair per tool

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::rules::RulesTopic;
use crate::catalog::MonsterSummary;
use crate::combat::{Entity, EntitySpec};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCombatInput {
    /// Combatants with initiative
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCombatOutput {
    /// Initiative order by entity id
    pub turn_order: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextTurnOutput {
    pub current_entity_id: String,
    pub current_entity_name: String,
    pub round_number: u32,
    /// Start-of-turn effects applied
    pub effects: Vec<String>,
    /// HP and conditions per entity id
    pub combat_status: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyDamageInput {
    pub target_id: String,
    pub damage: i32,
    #[serde(default)]
    pub damage_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyDamageOutput {
    pub final_damage: i32,
    pub remaining_hp: i32,
    pub message: String,
    pub is_unconscious: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyHealingInput {
    pub target_id: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyHealingOutput {
    pub amount_healed: i32,
    pub current_hp: i32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddConditionInput {
    pub target_id: String,
    pub condition: String,
    /// Turns remaining, -1 for permanent
    pub duration: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveConditionInput {
    pub target_id: String,
    pub condition: String,
}

/// Output of tools that only confirm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOutput {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrowInput {
    pub entity_id: String,
    /// STR, DEX, CON, INT, WIS or CHA
    #[serde(default)]
    pub save_type: String,
    pub dc: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrowOutput {
    pub roll: u32,
    pub bonus: i32,
    pub total: i32,
    pub success: bool,
    pub used_legendary_resistance: bool,
    pub remaining_legendary_resists: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendaryActionInput {
    pub monster_id: String,
    #[serde(default)]
    pub action_name: String,
    /// Number of legendary actions to spend
    pub cost: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendaryActionOutput {
    pub success: bool,
    pub remaining_actions: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackResourceInput {
    pub entity_id: String,
    pub resource_name: String,
    pub current_value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollD20Output {
    pub roll: u32,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollDiceInput {
    /// Dice notation, e.g. "2d6+3"
    pub notation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollDiceOutput {
    pub notation: String,
    pub rolls: Vec<u32>,
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStatusOutput {
    pub round_number: u32,
    /// Zero-based index into `turn_order`
    pub current_turn: usize,
    pub current_entity_id: Option<String>,
    pub turn_order: Vec<String>,
    pub combat_status: BTreeMap<String, String>,
    /// Full per-entity state, keyed by id
    pub entities: BTreeMap<String, EntityStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStatus {
    pub name: String,
    pub current_hp: i32,
    pub max_hp: i32,
    pub armor_class: i32,
    pub is_monster: bool,
    /// Turns remaining per condition, -1 for permanent
    pub conditions: BTreeMap<String, i32>,
    pub resources: BTreeMap<String, i32>,
    pub legendary_actions: u32,
    pub legendary_resistances: u32,
}

impl From<&Entity> for EntityStatus {
    fn from(entity: &Entity) -> Self {
        Self {
            name: entity.name.clone(),
            current_hp: entity.current_hp,
            max_hp: entity.max_hp,
            armor_class: entity.armor_class,
            is_monster: entity.is_monster,
            conditions: entity
                .conditions
                .iter()
                .map(|(name, duration)| (name.to_string(), duration.as_turns()))
                .collect(),
            resources: entity
                .resources
                .iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            legendary_actions: entity.legendary_actions,
            legendary_resistances: entity.legendary_resistances,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterStatBlockInput {
    /// Exact template name, e.g. "Goblin"
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterListOutput {
    pub monsters: Vec<MonsterSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrdRulesInput {
    pub topic: RulesTopic,
}
