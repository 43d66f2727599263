//! Timed conditions
//!
//! Conditions are free-text names (stunned, prone, ...) with a remaining-turn
//! counter. They tick down at the start of their bearer's turn and expire on
//! reaching zero; permanent conditions never tick.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};

/// Wire sentinel for a permanent condition
pub const PERMANENT: i32 = -1;

/// How long a condition lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionDuration {
    /// Never decremented, never expires on its own
    Permanent,
    /// Turns remaining (always > 0 while stored)
    Turns(u32),
}

impl ConditionDuration {
    /// Convert from the integer form used by callers (-1 = permanent)
    pub fn from_turns(turns: i32) -> Result<Self> {
        match turns {
            PERMANENT => Ok(ConditionDuration::Permanent),
            n if n > 0 => Ok(ConditionDuration::Turns(n as u32)),
            n => Err(CombatError::InvalidArgument(format!(
                "condition duration must be positive or {} for permanent, got {}",
                PERMANENT, n
            ))),
        }
    }

    /// Integer form (-1 = permanent)
    pub fn as_turns(&self) -> i32 {
        match self {
            ConditionDuration::Permanent => PERMANENT,
            ConditionDuration::Turns(n) => i32::try_from(*n).unwrap_or(i32::MAX),
        }
    }
}

impl fmt::Display for ConditionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionDuration::Permanent => write!(f, "permanent"),
            ConditionDuration::Turns(n) => write!(f, "{} turns", n),
        }
    }
}

/// Conditions on a single entity, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions {
    active: BTreeMap<String, ConditionDuration>,
}

impl Conditions {
    /// Set a condition, replacing any existing duration
    pub fn set(&mut self, name: impl Into<String>, duration: ConditionDuration) {
        self.active.insert(name.into(), duration);
    }

    /// Remove a condition, returning its duration if it was present
    pub fn remove(&mut self, name: &str) -> Option<ConditionDuration> {
        self.active.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<ConditionDuration> {
        self.active.get(name).copied()
    }

    pub fn has(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    /// Decrement every timed condition and drop the expired ones.
    ///
    /// Returns the names that expired, in name order.
    pub fn tick(&mut self) -> Vec<String> {
        let mut expired = Vec::new();

        for (name, duration) in self.active.iter_mut() {
            if let ConditionDuration::Turns(n) = duration {
                *n = n.saturating_sub(1);
                if *n == 0 {
                    expired.push(name.clone());
                }
            }
        }

        for name in &expired {
            self.active.remove(name);
        }

        expired
    }

    /// Condition names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ConditionDuration)> {
        self.active.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
