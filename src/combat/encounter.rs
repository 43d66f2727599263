//! Encounter state and turn engine
//!
//! An [`Encounter`] owns the roster, the initiative order and the round/turn
//! cursor. Every operation validates its inputs and looks up its target
//! before writing anything, so a failed call leaves the encounter untouched.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info};

use super::conditions::ConditionDuration;
use super::damage::{DamageModifier, DamageResult};
use super::dice::DieRoller;
use super::entity::{Entity, EntitySpec};
use crate::catalog::MonsterCatalog;
use crate::error::{CombatError, Result};

/// The single live combat session
#[derive(Debug, Clone, Default, Serialize)]
pub struct Encounter {
    entities: HashMap<String, Entity>,
    turn_order: Vec<String>,
    current_turn: usize,
    round: u32,
}

/// What happened when the turn advanced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub entity_id: String,
    pub entity_name: String,
    pub round: u32,
    /// Start-of-turn effects, in the order they fired
    pub effects: Vec<String>,
    /// Status line per entity id
    pub status: BTreeMap<String, String>,
}

/// Who acts next, computed without advancing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnPreview {
    pub entity_id: String,
    pub entity_name: String,
    pub turn_index: usize,
    pub round: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealResult {
    /// Effective healing after the max-HP clamp
    pub amount_healed: i32,
    pub current_hp: i32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    pub roll: u32,
    pub bonus: i32,
    pub total: i32,
    pub dc: i32,
    pub success: bool,
    pub used_legendary_resistance: bool,
    pub remaining_legendary_resistances: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendaryActionResult {
    /// False when the pool could not cover the cost; nothing was spent
    pub success: bool,
    pub remaining_actions: u32,
    pub message: String,
}

impl Encounter {
    /// Build a new encounter from entity definitions.
    ///
    /// Turn order is descending by initiative; ties keep the order in which
    /// ids first appear. A repeated id replaces the earlier definition but
    /// keeps its first slot.
    pub fn start(specs: Vec<EntitySpec>, catalog: &dyn MonsterCatalog) -> Self {
        let mut entities: HashMap<String, Entity> = HashMap::with_capacity(specs.len());
        let mut turn_order: Vec<String> = Vec::with_capacity(specs.len());

        for spec in specs {
            let mut entity = Entity::from_spec(spec);
            if let Some(template) = entity.template() {
                let defaults = catalog.legendary_defaults(template).unwrap_or_default();
                entity.apply_legendary_defaults(defaults);
            }

            if !entities.contains_key(&entity.id) {
                turn_order.push(entity.id.clone());
            }
            entities.insert(entity.id.clone(), entity);
        }

        // stable: equal initiatives keep first-appearance order
        turn_order.sort_by_key(|id| Reverse(entities.get(id).map_or(i32::MIN, |e| e.initiative)));

        info!("Combat started with {} combatants", entities.len());

        Self {
            entities,
            turn_order,
            current_turn: 0,
            round: 1,
        }
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn turn_order(&self) -> &[String] {
        &self.turn_order
    }

    /// Index into the turn order of the acting entity
    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// The entity whose turn it is, if the order is non-empty
    pub fn current_entity(&self) -> Option<&Entity> {
        self.turn_order
            .get(self.current_turn)
            .and_then(|id| self.entities.get(id))
    }

    /// Status line for every entity, keyed by id
    pub fn status(&self) -> BTreeMap<String, String> {
        self.entities
            .iter()
            .map(|(id, e)| (id.clone(), e.status_line()))
            .collect()
    }

    /// Who would act after the current turn, without changing anything
    pub fn peek_next(&self) -> Result<TurnPreview> {
        let (turn_index, round) = self.next_cursor()?;
        let entity_id = self.turn_order[turn_index].clone();
        let entity_name = self
            .entities
            .get(&entity_id)
            .map(|e| e.name.clone())
            .ok_or_else(|| CombatError::entity(&entity_id))?;

        Ok(TurnPreview {
            entity_id,
            entity_name,
            turn_index,
            round,
        })
    }

    fn next_cursor(&self) -> Result<(usize, u32)> {
        if self.turn_order.is_empty() {
            return Err(CombatError::InvalidState("empty turn order"));
        }
        let next = self.current_turn + 1;
        if next >= self.turn_order.len() {
            Ok((0, self.round.saturating_add(1)))
        } else {
            Ok((next, self.round))
        }
    }

    /// Advance to the next actor and run its start-of-turn effects
    pub fn advance(&mut self) -> Result<TurnReport> {
        let (next, round) = self.next_cursor()?;
        let entity_id = self.turn_order[next].clone();
        if !self.entities.contains_key(&entity_id) {
            return Err(CombatError::entity(&entity_id));
        }

        if round != self.round {
            info!("Round {} begins", round);
        }
        self.current_turn = next;
        self.round = round;

        let mut effects = Vec::new();
        let entity = self
            .entities
            .get_mut(&entity_id)
            .ok_or_else(|| CombatError::entity(&entity_id))?;

        if entity.is_monster && entity.max_legendary_actions > 0 {
            entity.legendary_actions = entity.max_legendary_actions;
            effects.push(format!(
                "Legendary actions reset to {}",
                entity.max_legendary_actions
            ));
        }

        for condition in entity.conditions.tick() {
            effects.push(format!("Condition '{}' ended", condition));
        }

        let entity_name = entity.name.clone();
        debug!(
            "Turn {} of round {}: {} ({} effects)",
            next + 1,
            round,
            entity_id,
            effects.len()
        );

        Ok(TurnReport {
            entity_id,
            entity_name,
            round,
            effects,
            status: self.status(),
        })
    }

    /// Subtract damage from a target, halving it when the target is resistant
    pub fn apply_damage(
        &mut self,
        target_id: &str,
        amount: i32,
        damage_type: &str,
    ) -> Result<DamageResult> {
        let target = self
            .entities
            .get_mut(target_id)
            .ok_or_else(|| CombatError::target(target_id))?;
        if amount < 0 {
            return Err(CombatError::InvalidArgument(format!(
                "damage must not be negative, got {}",
                amount
            )));
        }

        let modifier = DamageModifier::for_resources(&target.resources);
        let final_damage = modifier.apply(amount);
        target.current_hp = target.current_hp.saturating_sub(final_damage).max(0);

        debug!(
            "{} takes {} {} damage, {} HP left",
            target_id, final_damage, damage_type, target.current_hp
        );

        Ok(DamageResult {
            final_damage,
            remaining_hp: target.current_hp,
            is_unconscious: target.is_unconscious(),
            message: format!(
                "{} takes {} {} damage{}. {} HP remaining.",
                target.name,
                final_damage,
                damage_type,
                modifier.note(),
                target.current_hp
            ),
        })
    }

    /// Restore hit points, never above max
    pub fn apply_healing(&mut self, target_id: &str, amount: i32) -> Result<HealResult> {
        let target = self
            .entities
            .get_mut(target_id)
            .ok_or_else(|| CombatError::target(target_id))?;
        if amount < 0 {
            return Err(CombatError::InvalidArgument(format!(
                "healing must not be negative, got {}",
                amount
            )));
        }

        let before = target.current_hp;
        target.current_hp = before.saturating_add(amount).min(target.max_hp);
        let healed = target.current_hp - before;

        debug!("{} healed for {}", target_id, healed);

        Ok(HealResult {
            amount_healed: healed,
            current_hp: target.current_hp,
            message: format!(
                "{} healed for {} HP. Now at {}/{}.",
                target.name, healed, target.current_hp, target.max_hp
            ),
        })
    }

    /// Set (or reset) a condition on a target
    pub fn add_condition(
        &mut self,
        target_id: &str,
        condition: &str,
        duration: ConditionDuration,
    ) -> Result<String> {
        let target = self
            .entities
            .get_mut(target_id)
            .ok_or_else(|| CombatError::target(target_id))?;

        target.conditions.set(condition, duration);
        debug!("{} gains {} ({})", target_id, condition, duration);

        Ok(format!("{} is now {} ({}).", target.name, condition, duration))
    }

    /// Remove a condition; succeeds whether or not it was present
    pub fn remove_condition(&mut self, target_id: &str, condition: &str) -> Result<String> {
        let target = self
            .entities
            .get_mut(target_id)
            .ok_or_else(|| CombatError::target(target_id))?;

        match target.conditions.remove(condition) {
            Some(_) => Ok(format!("{} is no longer {}.", target.name, condition)),
            None => Ok(format!("{} was not {}.", target.name, condition)),
        }
    }

    /// Roll a saving throw, spending a legendary resistance to turn a failure
    /// into a success when one is available
    pub fn saving_throw(
        &mut self,
        entity_id: &str,
        save_type: &str,
        dc: i32,
        monster_bonus: i32,
        roller: &mut dyn DieRoller,
    ) -> Result<SaveResult> {
        let entity = self
            .entities
            .get_mut(entity_id)
            .ok_or_else(|| CombatError::entity(entity_id))?;

        let roll = roller.d20();
        let bonus = if entity.is_monster { monster_bonus } else { 0 };
        let total = (roll as i32).saturating_add(bonus);
        let mut success = total >= dc;

        let mut used_legendary = false;
        if !success && entity.legendary_resistances > 0 {
            success = true;
            used_legendary = true;
            entity.legendary_resistances -= 1;
        }

        let mut message = format!(
            "{} rolled {}+{}={} vs DC {}: {}",
            entity.name,
            roll,
            bonus,
            total,
            dc,
            if success { "SUCCESS" } else { "FAILURE" }
        );
        if used_legendary {
            message.push_str(&format!(
                " (used legendary resistance, {} remaining)",
                entity.legendary_resistances
            ));
        }

        debug!("{} {} save: {}", entity_id, save_type, message);

        Ok(SaveResult {
            roll,
            bonus,
            total,
            dc,
            success,
            used_legendary_resistance: used_legendary,
            remaining_legendary_resistances: entity.legendary_resistances,
            message,
        })
    }

    /// Spend legendary actions; an empty pool is a normal `success = false`
    pub fn use_legendary_action(
        &mut self,
        monster_id: &str,
        action_name: &str,
        cost: i32,
    ) -> Result<LegendaryActionResult> {
        let monster = self
            .entities
            .get_mut(monster_id)
            .ok_or_else(|| CombatError::monster(monster_id))?;
        let cost = u32::try_from(cost).map_err(|_| {
            CombatError::InvalidArgument(format!(
                "legendary action cost must not be negative, got {}",
                cost
            ))
        })?;

        if monster.legendary_actions < cost {
            return Ok(LegendaryActionResult {
                success: false,
                remaining_actions: monster.legendary_actions,
                message: format!(
                    "Insufficient legendary actions. Has {}, needs {}.",
                    monster.legendary_actions, cost
                ),
            });
        }

        monster.legendary_actions -= cost;
        debug!("{} uses {} for {}", monster_id, action_name, cost);

        Ok(LegendaryActionResult {
            success: true,
            remaining_actions: monster.legendary_actions,
            message: format!(
                "{} uses {} (cost {}). {} legendary actions remaining.",
                monster.name, action_name, cost, monster.legendary_actions
            ),
        })
    }

    /// Overwrite a named resource counter
    pub fn track_resource(&mut self, entity_id: &str, resource: &str, value: i32) -> Result<String> {
        let entity = self
            .entities
            .get_mut(entity_id)
            .ok_or_else(|| CombatError::entity(entity_id))?;

        entity.resources.set(resource, value);
        Ok(format!("{} now has {} {}.", entity.name, value, resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StatBlockCatalog;
    use crate::combat::dice::ScriptedRoller;

    fn pc(id: &str, initiative: i32, hp: i32) -> EntitySpec {
        EntitySpec {
            id: id.to_string(),
            name: id.to_string(),
            initiative,
            hp,
            ac: 14,
            is_monster: false,
            monster_name: None,
        }
    }

    fn monster(id: &str, initiative: i32, hp: i32, template: &str) -> EntitySpec {
        EntitySpec {
            is_monster: true,
            monster_name: Some(template.to_string()),
            ..pc(id, initiative, hp)
        }
    }

    fn dragon_and_fighter() -> Encounter {
        Encounter::start(
            vec![
                pc("B", 10, 30),
                monster("A", 15, 546, "Ancient Red Dragon"),
            ],
            &StatBlockCatalog::builtin(),
        )
    }

    #[test]
    fn test_start_orders_by_initiative() {
        let encounter = dragon_and_fighter();
        assert_eq!(encounter.turn_order(), ["A", "B"]);
        assert_eq!(encounter.round(), 1);
        assert_eq!(encounter.current_turn(), 0);

        let dragon = encounter.entity("A").unwrap();
        assert_eq!(dragon.legendary_resistances, 3);
        assert_eq!(dragon.max_legendary_actions, 3);
        assert_eq!(dragon.legendary_actions, 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let encounter = Encounter::start(
            vec![pc("c", 12, 5), pc("a", 12, 5), pc("b", 18, 5), pc("d", 12, 5)],
            &StatBlockCatalog::new(),
        );
        assert_eq!(encounter.turn_order(), ["b", "c", "a", "d"]);
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let encounter = Encounter::start(
            vec![pc("x", 5, 10), pc("y", 5, 10), pc("x", 5, 99)],
            &StatBlockCatalog::new(),
        );
        assert_eq!(encounter.turn_order(), ["x", "y"]);
        assert_eq!(encounter.len(), 2);
        assert_eq!(encounter.entity("x").unwrap().max_hp, 99);
    }

    #[test]
    fn test_unknown_template_has_no_legendary_capability() {
        let encounter = Encounter::start(
            vec![monster("m", 10, 50, "Mystery Beast")],
            &StatBlockCatalog::builtin(),
        );
        let m = encounter.entity("m").unwrap();
        assert_eq!(m.max_legendary_actions, 0);
        assert_eq!(m.legendary_resistances, 0);
    }

    #[test]
    fn test_empty_encounter_cannot_advance() {
        let mut encounter = Encounter::start(Vec::new(), &StatBlockCatalog::new());
        assert!(encounter.turn_order().is_empty());
        assert_eq!(
            encounter.advance(),
            Err(CombatError::InvalidState("empty turn order"))
        );
        assert!(encounter.peek_next().is_err());
    }

    #[test]
    fn test_advance_wraps_and_increments_round() {
        let mut encounter = dragon_and_fighter();

        let first = encounter.advance().unwrap();
        assert_eq!(first.entity_id, "B");
        assert_eq!(first.round, 1);
        assert_eq!(encounter.current_turn(), 1);

        let second = encounter.advance().unwrap();
        assert_eq!(second.entity_id, "A");
        assert_eq!(second.round, 2);
        assert_eq!(encounter.current_turn(), 0);
        assert_eq!(second.effects, vec!["Legendary actions reset to 3"]);
    }

    #[test]
    fn test_peek_matches_advance() {
        let mut encounter = dragon_and_fighter();
        for _ in 0..5 {
            let preview = encounter.peek_next().unwrap();
            let report = encounter.advance().unwrap();
            assert_eq!(preview.entity_id, report.entity_id);
            assert_eq!(preview.round, report.round);
            assert_eq!(preview.turn_index, encounter.current_turn());
        }
    }

    #[test]
    fn test_single_entity_advances_rounds() {
        let mut encounter = Encounter::start(vec![pc("solo", 3, 10)], &StatBlockCatalog::new());
        let report = encounter.advance().unwrap();
        assert_eq!(report.entity_id, "solo");
        assert_eq!(report.round, 2);
        assert_eq!(encounter.current_turn(), 0);
    }

    #[test]
    fn test_conditions_expire_on_bearers_turn() {
        let mut encounter = dragon_and_fighter();
        encounter
            .add_condition("B", "stunned", ConditionDuration::Turns(1))
            .unwrap();
        encounter
            .add_condition("A", "frightened", ConditionDuration::Turns(1))
            .unwrap();

        // B's turn: only B's condition ticks
        let report = encounter.advance().unwrap();
        assert_eq!(report.effects, vec!["Condition 'stunned' ended"]);
        assert!(encounter.entity("A").unwrap().conditions.has("frightened"));
        assert_eq!(report.status["B"], "B: 30/30 HP");
        assert_eq!(report.status["A"], "A: 546/546 HP [frightened]");
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut encounter = dragon_and_fighter();

        let hit = encounter.apply_damage("B", 20, "slashing").unwrap();
        assert_eq!(hit.final_damage, 20);
        assert_eq!(hit.remaining_hp, 10);
        assert!(!hit.is_unconscious);

        let overkill = encounter.apply_damage("B", 50, "fire").unwrap();
        assert_eq!(overkill.final_damage, 50);
        assert_eq!(overkill.remaining_hp, 0);
        assert!(overkill.is_unconscious);
    }

    #[test]
    fn test_damage_resisted() {
        let mut encounter = dragon_and_fighter();
        encounter.track_resource("B", "resistances", 1).unwrap();

        let hit = encounter.apply_damage("B", 9, "cold").unwrap();
        assert_eq!(hit.final_damage, 4);
        assert_eq!(hit.remaining_hp, 26);
        assert_eq!(hit.message, "B takes 4 cold damage (resisted). 26 HP remaining.");
    }

    #[test]
    fn test_damage_rejects_bad_input_without_mutation() {
        let mut encounter = dragon_and_fighter();
        assert!(matches!(
            encounter.apply_damage("nobody", 5, "fire"),
            Err(CombatError::NotFound { .. })
        ));
        assert!(matches!(
            encounter.apply_damage("B", -5, "fire"),
            Err(CombatError::InvalidArgument(_))
        ));
        assert_eq!(encounter.entity("B").unwrap().current_hp, 30);
    }

    #[test]
    fn test_healing_reports_effective_amount() {
        let mut encounter = dragon_and_fighter();
        encounter.apply_damage("B", 8, "piercing").unwrap();

        let heal = encounter.apply_healing("B", 20).unwrap();
        assert_eq!(heal.amount_healed, 8);
        assert_eq!(heal.current_hp, 30);
        assert_eq!(heal.message, "B healed for 8 HP. Now at 30/30.");
    }

    #[test]
    fn test_healing_rejects_negative_without_mutation() {
        let mut encounter = dragon_and_fighter();
        encounter.apply_damage("B", 12, "acid").unwrap();

        assert!(matches!(
            encounter.apply_healing("B", -4),
            Err(CombatError::InvalidArgument(_))
        ));
        assert_eq!(encounter.entity("B").unwrap().current_hp, 18);
        assert_eq!(
            encounter.apply_healing("nobody", 4),
            Err(CombatError::target("nobody"))
        );
    }

    #[test]
    fn test_saving_throw_uses_legendary_resistance() {
        let mut encounter = dragon_and_fighter();
        let mut roller = ScriptedRoller::new(vec![2]);

        let save = encounter
            .saving_throw("A", "DEX", 24, 3, &mut roller)
            .unwrap();
        assert_eq!(save.roll, 2);
        assert_eq!(save.bonus, 3);
        assert_eq!(save.total, 5);
        assert!(save.success);
        assert!(save.used_legendary_resistance);
        assert_eq!(save.remaining_legendary_resistances, 2);
        assert_eq!(
            save.message,
            "A rolled 2+3=5 vs DC 24: SUCCESS (used legendary resistance, 2 remaining)"
        );
    }

    #[test]
    fn test_saving_throw_without_resistance_fails() {
        let mut encounter = dragon_and_fighter();
        let mut roller = ScriptedRoller::new(vec![4]);

        let save = encounter.saving_throw("B", "CON", 15, 3, &mut roller).unwrap();
        assert_eq!(save.bonus, 0);
        assert!(!save.success);
        assert!(!save.used_legendary_resistance);
        assert_eq!(save.message, "B rolled 4+0=4 vs DC 15: FAILURE");
    }

    #[test]
    fn test_saving_throw_success_keeps_resistances() {
        let mut encounter = dragon_and_fighter();
        let mut roller = ScriptedRoller::new(vec![20]);

        let save = encounter.saving_throw("A", "WIS", 20, 3, &mut roller).unwrap();
        assert!(save.success);
        assert!(!save.used_legendary_resistance);
        assert_eq!(save.remaining_legendary_resistances, 3);
    }

    #[test]
    fn test_saving_throw_bonus_saturates() {
        let mut encounter = dragon_and_fighter();
        let mut roller = ScriptedRoller::new(vec![20]);

        let save = encounter
            .saving_throw("A", "STR", 30, i32::MAX, &mut roller)
            .unwrap();
        assert_eq!(save.total, i32::MAX);
        assert!(save.success);
        assert_eq!(save.remaining_legendary_resistances, 3);
    }

    #[test]
    fn test_legendary_actions_spend_and_refresh() {
        let mut encounter = dragon_and_fighter();

        let wing = encounter.use_legendary_action("A", "Wing Attack", 2).unwrap();
        assert!(wing.success);
        assert_eq!(wing.remaining_actions, 1);

        let denied = encounter.use_legendary_action("A", "Wing Attack", 2).unwrap();
        assert!(!denied.success);
        assert_eq!(denied.remaining_actions, 1);
        assert_eq!(denied.message, "Insufficient legendary actions. Has 1, needs 2.");

        encounter.advance().unwrap();
        encounter.advance().unwrap();
        assert_eq!(encounter.entity("A").unwrap().legendary_actions, 3);
    }

    #[test]
    fn test_legendary_action_rejects_negative_cost() {
        let mut encounter = dragon_and_fighter();
        assert!(matches!(
            encounter.use_legendary_action("A", "Detect", -1),
            Err(CombatError::InvalidArgument(_))
        ));
        assert_eq!(encounter.entity("A").unwrap().legendary_actions, 3);
    }

    #[test]
    fn test_remove_condition() {
        let mut encounter = dragon_and_fighter();
        encounter
            .add_condition("B", "prone", ConditionDuration::Permanent)
            .unwrap();

        assert_eq!(
            encounter.remove_condition("B", "prone").unwrap(),
            "B is no longer prone."
        );
        assert_eq!(
            encounter.remove_condition("B", "prone").unwrap(),
            "B was not prone."
        );
        assert_eq!(
            encounter.remove_condition("nobody", "prone"),
            Err(CombatError::target("nobody"))
        );
    }
}
