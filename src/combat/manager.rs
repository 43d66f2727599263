//! Combat manager
//!
//! Single owner of the live encounter. Every mutation holds the encounter
//! write lock for its whole duration, so calls are serialized; the read
//! accessors never mutate. The die roller lock is never held while waiting on
//! the encounter lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::RwLock;

use super::conditions::ConditionDuration;
use super::damage::DamageResult;
use super::dice::{DiceOutcome, DiceRoll, DieRoller, RngRoller};
use super::encounter::{
    Encounter, HealResult, LegendaryActionResult, SaveResult, TurnPreview, TurnReport,
};
use super::entity::{Entity, EntitySpec};
use crate::catalog::{MonsterCatalog, MonsterStat, MonsterSummary, StatBlockCatalog};
use crate::config::DEFAULT_MONSTER_SAVE_BONUS;
use crate::error::{CombatError, Result};

const NO_ENCOUNTER: CombatError = CombatError::InvalidState("no active encounter");

/// Serializing owner of the encounter state
pub struct CombatManager {
    encounter: RwLock<Option<Encounter>>,
    roller: Mutex<Box<dyn DieRoller>>,
    catalog: Arc<dyn MonsterCatalog>,
    monster_save_bonus: i32,
}

impl Default for CombatManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CombatManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatManager")
            .field("monster_save_bonus", &self.monster_save_bonus)
            .finish_non_exhaustive()
    }
}

impl CombatManager {
    /// Manager with the built-in catalog and an entropy-seeded roller
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> CombatManagerBuilder {
        CombatManagerBuilder::default()
    }

    /// Create a shared instance
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Replace any existing encounter with a fresh one
    pub async fn start_combat(&self, specs: Vec<EntitySpec>) -> Vec<String> {
        let encounter = Encounter::start(specs, self.catalog.as_ref());
        let order = encounter.turn_order().to_vec();
        *self.encounter.write().await = Some(encounter);
        order
    }

    pub async fn next_turn(&self) -> Result<TurnReport> {
        self.with_encounter(|e| e.advance()).await
    }

    pub async fn apply_damage(
        &self,
        target_id: &str,
        amount: i32,
        damage_type: &str,
    ) -> Result<DamageResult> {
        self.with_encounter(|e| e.apply_damage(target_id, amount, damage_type))
            .await
    }

    pub async fn apply_healing(&self, target_id: &str, amount: i32) -> Result<HealResult> {
        self.with_encounter(|e| e.apply_healing(target_id, amount))
            .await
    }

    /// Set a condition; `duration` uses -1 for permanent
    pub async fn add_condition(&self, target_id: &str, condition: &str, duration: i32) -> Result<String> {
        let duration = ConditionDuration::from_turns(duration)?;
        self.with_encounter(|e| e.add_condition(target_id, condition, duration))
            .await
    }

    pub async fn remove_condition(&self, target_id: &str, condition: &str) -> Result<String> {
        self.with_encounter(|e| e.remove_condition(target_id, condition))
            .await
    }

    pub async fn make_saving_throw(&self, entity_id: &str, save_type: &str, dc: i32) -> Result<SaveResult> {
        let bonus = self.monster_save_bonus;
        self.with_encounter(|e| {
            let mut roller = self.roller.lock();
            e.saving_throw(entity_id, save_type, dc, bonus, &mut **roller)
        })
        .await
    }

    pub async fn use_legendary_action(
        &self,
        monster_id: &str,
        action_name: &str,
        cost: i32,
    ) -> Result<LegendaryActionResult> {
        self.with_encounter(|e| e.use_legendary_action(monster_id, action_name, cost))
            .await
    }

    pub async fn track_resource(&self, entity_id: &str, resource: &str, value: i32) -> Result<String> {
        self.with_encounter(|e| e.track_resource(entity_id, resource, value))
            .await
    }

    /// Roll a single d20 outside any encounter
    pub fn roll_d20(&self) -> u32 {
        self.roller.lock().d20()
    }

    /// Roll dice notation such as "2d6+3"
    pub fn roll_dice(&self, notation: &str) -> Result<(DiceRoll, DiceOutcome)> {
        let dice: DiceRoll = notation.parse().map_err(CombatError::InvalidArgument)?;
        let outcome = dice.roll_with(&mut **self.roller.lock());
        Ok((dice, outcome))
    }

    /// Full stat block for a monster template
    pub fn monster_stat_block(&self, name: &str) -> Result<MonsterStat> {
        self.catalog
            .stat_block(name)
            .ok_or_else(|| CombatError::stat_block(name))
    }

    /// Monsters available as templates
    pub fn monster_list(&self) -> Vec<MonsterSummary> {
        self.catalog.monsters()
    }

    /// Whether an encounter has been started
    pub async fn is_active(&self) -> bool {
        self.encounter.read().await.is_some()
    }

    /// Clone of one entity
    pub async fn entity(&self, id: &str) -> Result<Entity> {
        self.read(|e| e.entity(id).cloned().ok_or_else(|| CombatError::entity(id)))
            .await
    }

    pub async fn turn_order(&self) -> Result<Vec<String>> {
        self.read(|e| Ok(e.turn_order().to_vec())).await
    }

    pub async fn current_turn(&self) -> Result<usize> {
        self.read(|e| Ok(e.current_turn())).await
    }

    pub async fn round(&self) -> Result<u32> {
        self.read(|e| Ok(e.round())).await
    }

    /// Status line per entity id
    pub async fn status(&self) -> Result<BTreeMap<String, String>> {
        self.read(|e| Ok(e.status())).await
    }

    /// Who acts after the current turn, without advancing
    pub async fn preview_next_turn(&self) -> Result<TurnPreview> {
        self.read(|e| e.peek_next()).await
    }

    /// Point-in-time copy of the whole encounter
    pub async fn snapshot(&self) -> Result<Encounter> {
        self.read(|e| Ok(e.clone())).await
    }

    async fn with_encounter<T>(&self, op: impl FnOnce(&mut Encounter) -> Result<T>) -> Result<T> {
        let mut guard = self.encounter.write().await;
        let encounter = guard.as_mut().ok_or(NO_ENCOUNTER)?;
        op(encounter)
    }

    async fn read<T>(&self, op: impl FnOnce(&Encounter) -> Result<T>) -> Result<T> {
        let guard = self.encounter.read().await;
        let encounter = guard.as_ref().ok_or(NO_ENCOUNTER)?;
        op(encounter)
    }
}

/// Builder for [`CombatManager`]
pub struct CombatManagerBuilder {
    roller: Option<Box<dyn DieRoller>>,
    catalog: Option<Arc<dyn MonsterCatalog>>,
    monster_save_bonus: i32,
}

impl Default for CombatManagerBuilder {
    fn default() -> Self {
        Self {
            roller: None,
            catalog: None,
            monster_save_bonus: DEFAULT_MONSTER_SAVE_BONUS,
        }
    }
}

impl CombatManagerBuilder {
    /// Use this die roller for saves and dice tools
    pub fn roller(mut self, roller: impl DieRoller + 'static) -> Self {
        self.roller = Some(Box::new(roller));
        self
    }

    /// Use this catalog for monster templates
    pub fn catalog(mut self, catalog: Arc<dyn MonsterCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn monster_save_bonus(mut self, bonus: i32) -> Self {
        self.monster_save_bonus = bonus;
        self
    }

    pub fn build(self) -> CombatManager {
        CombatManager {
            encounter: RwLock::new(None),
            roller: Mutex::new(
                self.roller
                    .unwrap_or_else(|| Box::new(RngRoller::from_entropy())),
            ),
            catalog: self
                .catalog
                .unwrap_or_else(|| StatBlockCatalog::builtin().shared()),
            monster_save_bonus: self.monster_save_bonus,
        }
    }
}
