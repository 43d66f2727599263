//! Named resource counters (spell slots, per-day abilities, ...)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Open-ended resource name -> count mapping.
///
/// Values are stored as given; their meaning is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resources {
    counters: BTreeMap<String, i32>,
}

impl Resources {
    /// Overwrite (or create) a counter
    pub fn set(&mut self, name: impl Into<String>, value: i32) {
        self.counters.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.counters.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counters.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.counters.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
