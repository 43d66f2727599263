//! SRD rule reference
//!
//! Static rule summaries for damage, conditions, saving throws and legendary
//! mechanics. Nothing here affects resolution; the engine keeps its own
//! simplified rules and these are served for reading only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which rule summary to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesTopic {
    Damage,
    Conditions,
    SavingThrows,
    Legendary,
}

impl RulesTopic {
    pub const ALL: [RulesTopic; 4] = [
        RulesTopic::Damage,
        RulesTopic::Conditions,
        RulesTopic::SavingThrows,
        RulesTopic::Legendary,
    ];

    pub fn document(self) -> RulesDocument {
        match self {
            RulesTopic::Damage => RulesDocument::Damage(damage_rules()),
            RulesTopic::Conditions => RulesDocument::Conditions(condition_rules()),
            RulesTopic::SavingThrows => RulesDocument::SavingThrows(saving_throw_rules()),
            RulesTopic::Legendary => RulesDocument::Legendary(legendary_rules()),
        }
    }
}

/// One rule summary, serialized without a wrapper
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RulesDocument {
    Damage(DamageRules),
    Conditions(Vec<ConditionRule>),
    SavingThrows(SavingThrowRules),
    Legendary(LegendaryRules),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageRules {
    pub resistance_multiplier: f64,
    pub vulnerability_multiplier: f64,
    pub immunity_effect: String,
    pub critical_multiplier: u32,
    pub condition_effects: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionRule {
    pub name: String,
    pub description: String,
    pub effects: Vec<String>,
    pub end_condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingThrowRules {
    pub types: Vec<String>,
    pub critical_success: String,
    pub critical_failure: String,
    pub modifiers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendaryRules {
    pub legendary_actions: LegendaryActionRule,
    pub legendary_resistances: LegendaryResistanceRule,
    pub lair_actions: LairActionRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendaryActionRule {
    pub description: String,
    pub timing: String,
    pub reset_timing: String,
    pub default_per_round: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendaryResistanceRule {
    pub description: String,
    pub default_count: u32,
    pub usage: String,
    pub reset_timing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LairActionRule {
    pub description: String,
    pub initiative: i32,
    pub frequency: String,
}

fn text_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn damage_rules() -> DamageRules {
    DamageRules {
        resistance_multiplier: 0.5,
        vulnerability_multiplier: 2.0,
        immunity_effect: "no damage taken".into(),
        critical_multiplier: 2,
        condition_effects: text_map(&[
            ("resistance", "Damage of specified type is halved"),
            ("vulnerability", "Damage of specified type is doubled"),
            ("immunity", "No damage of specified type is taken"),
        ]),
    }
}

fn condition(name: &str, description: &str, effects: &[&str], end: &str) -> ConditionRule {
    ConditionRule {
        name: name.into(),
        description: description.into(),
        effects: lines(effects),
        end_condition: end.into(),
    }
}

fn condition_rules() -> Vec<ConditionRule> {
    const UNTIL_REMOVED: &str = "End of specified duration or until condition is removed";

    vec![
        condition(
            "Stunned",
            "A stunned creature is incapacitated, can't move, and can speak only falteringly.",
            &[
                "Automatically fails Strength and Dexterity saving throws",
                "Attack rolls against the creature have advantage",
            ],
            UNTIL_REMOVED,
        ),
        condition(
            "Prone",
            "A prone creature's only movement option is to crawl.",
            &[
                "Disadvantage on attack rolls",
                "Attack rolls against creature have advantage if attacker is within 5 feet",
                "Attack rolls against creature have disadvantage if attacker is more than 5 feet away",
            ],
            "Use half movement to stand up",
        ),
        condition(
            "Paralyzed",
            "A paralyzed creature is incapacitated and can't move or speak.",
            &[
                "Automatically fails Strength and Dexterity saving throws",
                "Attack rolls against the creature have advantage",
                "Any attack that hits is a critical hit if attacker is within 5 feet",
            ],
            UNTIL_REMOVED,
        ),
        condition(
            "Poisoned",
            "A poisoned creature has disadvantage on attack rolls and ability checks.",
            &["Disadvantage on attack rolls", "Disadvantage on ability checks"],
            "End of poison duration",
        ),
    ]
}

fn saving_throw_rules() -> SavingThrowRules {
    SavingThrowRules {
        types: lines(&["STR", "DEX", "CON", "INT", "WIS", "CHA"]),
        critical_success: "Natural 20 always succeeds".into(),
        critical_failure: "Natural 1 always fails".into(),
        modifiers: text_map(&[
            ("proficiency", "Add proficiency bonus if proficient in that save"),
            ("advantage", "Roll twice, take higher result"),
            ("disadvantage", "Roll twice, take lower result"),
        ]),
    }
}

fn legendary_rules() -> LegendaryRules {
    LegendaryRules {
        legendary_actions: LegendaryActionRule {
            description: "Special actions that can be taken outside the creature's turn".into(),
            timing: "At the end of another creature's turn".into(),
            reset_timing: "Start of the legendary creature's turn".into(),
            default_per_round: 3,
        },
        legendary_resistances: LegendaryResistanceRule {
            description: "Ability to automatically succeed on a failed saving throw".into(),
            default_count: 3,
            usage: "Choose to succeed on a failed save".into(),
            reset_timing: "After a long rest or per encounter (DM discretion)".into(),
        },
        lair_actions: LairActionRule {
            description: "Environmental effects that occur in the creature's lair".into(),
            initiative: 20,
            frequency: "Once per round on initiative count 20".into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names() {
        let topic: RulesTopic = serde_json::from_str(r#""saving_throws""#).unwrap();
        assert_eq!(topic, RulesTopic::SavingThrows);
        assert!(serde_json::from_str::<RulesTopic>(r#""grappling""#).is_err());
    }

    #[test]
    fn test_documents_serialize_flat() {
        let damage = serde_json::to_value(RulesTopic::Damage.document()).unwrap();
        assert_eq!(damage["resistance_multiplier"], 0.5);
        assert_eq!(damage["critical_multiplier"], 2);

        let conditions = serde_json::to_value(RulesTopic::Conditions.document()).unwrap();
        let names: Vec<&str> = conditions
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c["name"].as_str())
            .collect();
        assert_eq!(names, vec!["Stunned", "Prone", "Paralyzed", "Poisoned"]);

        let legendary = serde_json::to_value(RulesTopic::Legendary.document()).unwrap();
        assert_eq!(legendary["legendary_actions"]["default_per_round"], 3);
        assert_eq!(legendary["lair_actions"]["initiative"], 20);
    }

    #[test]
    fn test_legendary_defaults_agree_with_dragon() {
        let RulesDocument::Legendary(rules) = RulesTopic::Legendary.document() else {
            panic!("legendary topic returned another document");
        };
        let dragon = crate::catalog::StatBlockCatalog::builtin();
        let defaults = crate::catalog::MonsterCatalog::legendary_defaults(&dragon, "Ancient Red Dragon")
            .unwrap();
        assert_eq!(rules.legendary_actions.default_per_round, defaults.actions_per_round);
        assert_eq!(rules.legendary_resistances.default_count, defaults.resistances);
    }
}
