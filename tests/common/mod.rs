//! Common test utilities - CombatTest harness for end-to-end testing

#![allow(dead_code)]

use std::sync::Arc;

use dmcombat::combat::{CombatManager, EntitySpec, ScriptedRoller};
use dmcombat::tools::{ToolOutcome, ToolRequest};
use serde_json::{json, Value};

pub const DRAGON: &str = "Ancient Red Dragon";

/// Manager with scripted dice so saves are reproducible
pub struct CombatTest {
    pub manager: Arc<CombatManager>,
}

impl CombatTest {
    /// Fresh manager whose d20 returns `rolls` in a loop
    pub fn with_rolls(rolls: &[u32]) -> Self {
        let manager = CombatManager::builder()
            .roller(ScriptedRoller::new(rolls.to_vec()))
            .build()
            .shared();
        Self { manager }
    }

    pub fn new() -> Self {
        Self::with_rolls(&[10])
    }

    /// Send one tool call the way the driver does
    pub async fn call(&self, tool: &str, arguments: Value) -> ToolOutcome {
        let request: ToolRequest =
            serde_json::from_value(json!({ "tool": tool, "arguments": arguments }))
                .expect("request should decode");
        request.execute(&self.manager).await
    }

    /// Call a tool and return its result, panicking on failure
    pub async fn ok(&self, tool: &str, arguments: Value) -> Value {
        match self.call(tool, arguments).await {
            ToolOutcome::Success { result, .. } => result,
            ToolOutcome::Error { error, .. } => panic!("{} failed: {}", tool, error),
        }
    }

    /// Call a tool and return its error text, panicking on success
    pub async fn err(&self, tool: &str, arguments: Value) -> String {
        match self.call(tool, arguments).await {
            ToolOutcome::Error { error, .. } => error,
            ToolOutcome::Success { result, .. } => {
                panic!("{} should have failed, got {}", tool, result)
            }
        }
    }
}

pub fn pc(id: &str, initiative: i32, hp: i32) -> EntitySpec {
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

pub fn monster(id: &str, initiative: i32, hp: i32, template: &str) -> EntitySpec {
    EntitySpec {
        id: id.to_string(),
        name: id.to_string(),
        initiative,
        hp,
        ac: 22,
        is_monster: true,
        monster_name: Some(template.to_string()),
    }
}

/// Dragon "A" (init 15) and fighter "B" (init 10)
pub fn dragon_and_fighter() -> Vec<EntitySpec> {
    vec![
        pc("B", 10, 30),
        EntitySpec {
            name: "Dragon".to_string(),
            ..monster("A", 15, 546, DRAGON)
        },
    ]
}
