//! Named tool operations
//!
//! Each tool takes a flat record and returns a flat record. [`dispatch`]
//! resolves a tool by name from JSON arguments, for drivers that only see
//! names and JSON.

mod records;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::catalog::rules::RulesDocument;
use crate::catalog::MonsterStat;
use crate::combat::CombatManager;
use crate::error::CombatError;

pub use records::*;

/// Every tool name accepted by [`dispatch`]
pub const TOOL_NAMES: &[&str] = &[
    "start_combat",
    "next_turn",
    "apply_damage",
    "apply_healing",
    "add_condition",
    "remove_condition",
    "make_saving_throw",
    "use_legendary_action",
    "track_resource",
    "roll_d20",
    "roll_dice",
    "combat_status",
    "monster_stat_block",
    "monster_list",
    "srd_rules",
];

/// Tool-layer errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {source}")]
    BadArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error("failed to encode result: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One tool invocation as read by a driver
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolRequest {
    pub tool: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Result of one invocation, ready to write back to a driver
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { tool: String, result: Value },
    Error { tool: String, error: String },
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }
}

impl ToolRequest {
    /// Run this request, folding failures into the outcome
    pub async fn execute(self, manager: &CombatManager) -> ToolOutcome {
        match dispatch(manager, &self.tool, self.arguments).await {
            Ok(result) => ToolOutcome::Success {
                tool: self.tool,
                result,
            },
            Err(e) => {
                warn!("Tool {} failed: {}", self.tool, e);
                ToolOutcome::Error {
                    tool: self.tool,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Run a tool by name with JSON arguments (`null` counts as `{}`)
pub async fn dispatch(
    manager: &CombatManager,
    tool: &str,
    arguments: Value,
) -> Result<Value, ToolError> {
    match tool {
        "start_combat" => encode(start_combat(manager, parse(tool, arguments)?).await),
        "next_turn" => encode(next_turn(manager).await?),
        "apply_damage" => encode(apply_damage(manager, parse(tool, arguments)?).await?),
        "apply_healing" => encode(apply_healing(manager, parse(tool, arguments)?).await?),
        "add_condition" => encode(add_condition(manager, parse(tool, arguments)?).await?),
        "remove_condition" => encode(remove_condition(manager, parse(tool, arguments)?).await?),
        "make_saving_throw" => encode(make_saving_throw(manager, parse(tool, arguments)?).await?),
        "use_legendary_action" => {
            encode(use_legendary_action(manager, parse(tool, arguments)?).await?)
        }
        "track_resource" => encode(track_resource(manager, parse(tool, arguments)?).await?),
        "roll_d20" => encode(roll_d20(manager)),
        "roll_dice" => encode(roll_dice(manager, parse(tool, arguments)?)?),
        "combat_status" => encode(combat_status(manager).await?),
        "monster_stat_block" => encode(monster_stat_block(manager, parse(tool, arguments)?)?),
        "monster_list" => encode(monster_list(manager)),
        "srd_rules" => encode(srd_rules(parse(tool, arguments)?)),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

fn parse<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|source| ToolError::BadArguments {
        tool: tool.to_string(),
        source,
    })
}

fn encode<T: Serialize>(output: T) -> Result<Value, ToolError> {
    serde_json::to_value(output).map_err(ToolError::Encode)
}

pub async fn start_combat(manager: &CombatManager, input: StartCombatInput) -> StartCombatOutput {
    let turn_order = manager.start_combat(input.entities).await;
    let message = format!(
        "Combat started with {} combatants. Round 1, turn 1.",
        turn_order.len()
    );
    StartCombatOutput {
        turn_order,
        message,
    }
}

pub async fn next_turn(manager: &CombatManager) -> Result<NextTurnOutput, CombatError> {
    let report = manager.next_turn().await?;
    Ok(NextTurnOutput {
        current_entity_id: report.entity_id,
        current_entity_name: report.entity_name,
        round_number: report.round,
        effects: report.effects,
        combat_status: report.status,
    })
}

pub async fn apply_damage(
    manager: &CombatManager,
    input: ApplyDamageInput,
) -> Result<ApplyDamageOutput, CombatError> {
    let result = manager
        .apply_damage(&input.target_id, input.damage, &input.damage_type)
        .await?;
    Ok(ApplyDamageOutput {
        final_damage: result.final_damage,
        remaining_hp: result.remaining_hp,
        message: result.message,
        is_unconscious: result.is_unconscious,
    })
}

pub async fn apply_healing(
    manager: &CombatManager,
    input: ApplyHealingInput,
) -> Result<ApplyHealingOutput, CombatError> {
    let result = manager.apply_healing(&input.target_id, input.amount).await?;
    Ok(ApplyHealingOutput {
        amount_healed: result.amount_healed,
        current_hp: result.current_hp,
        message: result.message,
    })
}

pub async fn add_condition(
    manager: &CombatManager,
    input: AddConditionInput,
) -> Result<MessageOutput, CombatError> {
    let message = manager
        .add_condition(&input.target_id, &input.condition, input.duration)
        .await?;
    Ok(MessageOutput { message })
}

pub async fn remove_condition(
    manager: &CombatManager,
    input: RemoveConditionInput,
) -> Result<MessageOutput, CombatError> {
    let message = manager
        .remove_condition(&input.target_id, &input.condition)
        .await?;
    Ok(MessageOutput { message })
}

pub async fn make_saving_throw(
    manager: &CombatManager,
    input: SavingThrowInput,
) -> Result<SavingThrowOutput, CombatError> {
    let save = manager
        .make_saving_throw(&input.entity_id, &input.save_type, input.dc)
        .await?;
    Ok(SavingThrowOutput {
        roll: save.roll,
        bonus: save.bonus,
        total: save.total,
        success: save.success,
        used_legendary_resistance: save.used_legendary_resistance,
        remaining_legendary_resists: save.remaining_legendary_resistances,
        message: save.message,
    })
}

pub async fn use_legendary_action(
    manager: &CombatManager,
    input: LegendaryActionInput,
) -> Result<LegendaryActionOutput, CombatError> {
    let result = manager
        .use_legendary_action(&input.monster_id, &input.action_name, input.cost)
        .await?;
    Ok(LegendaryActionOutput {
        success: result.success,
        remaining_actions: result.remaining_actions,
        message: result.message,
    })
}

pub async fn track_resource(
    manager: &CombatManager,
    input: TrackResourceInput,
) -> Result<MessageOutput, CombatError> {
    let message = manager
        .track_resource(&input.entity_id, &input.resource_name, input.current_value)
        .await?;
    Ok(MessageOutput { message })
}

pub fn roll_d20(manager: &CombatManager) -> RollD20Output {
    let roll = manager.roll_d20();
    RollD20Output {
        roll,
        note: format!("Rolled a {} on a d20", roll),
    }
}

pub fn roll_dice(
    manager: &CombatManager,
    input: RollDiceInput,
) -> Result<RollDiceOutput, CombatError> {
    let (dice, outcome) = manager.roll_dice(&input.notation)?;
    Ok(RollDiceOutput {
        notation: dice.to_string(),
        rolls: outcome.rolls,
        total: outcome.total,
    })
}

pub async fn combat_status(manager: &CombatManager) -> Result<CombatStatusOutput, CombatError> {
    let snapshot = manager.snapshot().await?;
    Ok(CombatStatusOutput {
        round_number: snapshot.round(),
        current_turn: snapshot.current_turn(),
        current_entity_id: snapshot.current_entity().map(|e| e.id.clone()),
        turn_order: snapshot.turn_order().to_vec(),
        combat_status: snapshot.status(),
        entities: snapshot
            .entities()
            .map(|e| (e.id.clone(), EntityStatus::from(e)))
            .collect(),
    })
}

pub fn monster_stat_block(
    manager: &CombatManager,
    input: MonsterStatBlockInput,
) -> Result<MonsterStat, CombatError> {
    manager.monster_stat_block(&input.name)
}

pub fn monster_list(manager: &CombatManager) -> MonsterListOutput {
    MonsterListOutput {
        monsters: manager.monster_list(),
    }
}

pub fn srd_rules(input: SrdRulesInput) -> RulesDocument {
    input.topic.document()
}
