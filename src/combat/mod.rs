//! Combat system module
//!
//! Tracks one tabletop encounter:
//! - Initiative order and the round/turn cursor
//! - Hit points, with a generic "resisted" halving
//! - Timed and permanent conditions
//! - Saving throws with legendary resistance
//! - Legendary action pools and free-form resource counters

mod conditions;
mod damage;
mod dice;
mod encounter;
mod entity;
mod manager;
mod resources;

pub use conditions::{ConditionDuration, Conditions, PERMANENT};
pub use damage::{DamageModifier, DamageResult, RESISTANCES_KEY};
pub use dice::{parse_dice, DiceOutcome, DiceRoll, DieRoller, RngRoller, ScriptedRoller};
pub use encounter::{
    Encounter, HealResult, LegendaryActionResult, SaveResult, TurnPreview, TurnReport,
};
pub use entity::{Entity, EntitySpec};
pub use manager::{CombatManager, CombatManagerBuilder};
pub use resources::Resources;
