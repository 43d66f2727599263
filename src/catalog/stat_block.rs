//! SRD monster stat blocks

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete monster stat block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterStat {
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub alignment: String,
    pub hp: i32,
    pub ac: i32,
    #[serde(default)]
    pub speed: BTreeMap<String, i32>,
    #[serde(default)]
    pub ability_scores: BTreeMap<String, i32>,
    #[serde(default)]
    pub saving_throws: BTreeMap<String, i32>,
    #[serde(default)]
    pub skills: BTreeMap<String, i32>,
    #[serde(default)]
    pub damage_resistances: Vec<String>,
    #[serde(default)]
    pub damage_immunities: Vec<String>,
    #[serde(default)]
    pub damage_vulnerabilities: Vec<String>,
    #[serde(default)]
    pub condition_immunities: Vec<String>,
    #[serde(default)]
    pub senses: BTreeMap<String, i32>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub challenge_rating: f64,
    #[serde(default)]
    pub traits: Vec<MonsterTrait>,
    #[serde(default)]
    pub actions: Vec<MonsterAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legendary_actions: Option<LegendaryActionSet>,
    /// Legendary resistances per day (0 = none)
    #[serde(default)]
    pub legendary_resistances: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lair_actions: Vec<LairAction>,
}

/// A passive ability or feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTrait {
    pub name: String,
    pub description: String,
}

/// An action a monster can take on its turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterAction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_bonus: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_dice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_dc: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_type: Option<String>,
}

/// Legendary action options and per-round budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendaryActionSet {
    pub actions_per_round: u32,
    #[serde(default)]
    pub options: Vec<LegendaryActionOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendaryActionOption {
    pub name: String,
    pub cost: u32,
    pub description: String,
}

/// Lair action, taken on initiative count 20
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LairAction {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_dc: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_type: Option<String>,
}

fn scores(pairs: &[(&str, i32)]) -> BTreeMap<String, i32> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in stat blocks
pub fn builtin() -> Vec<MonsterStat> {
    vec![ancient_red_dragon(), goblin()]
}

fn ancient_red_dragon() -> MonsterStat {
    MonsterStat {
        name: "Ancient Red Dragon".into(),
        size: "Gargantuan".into(),
        kind: "dragon".into(),
        alignment: "chaotic evil".into(),
        hp: 546,
        ac: 22,
        speed: scores(&[("walk", 40), ("climb", 40), ("fly", 80)]),
        ability_scores: scores(&[
            ("STR", 30),
            ("DEX", 10),
            ("CON", 29),
            ("INT", 18),
            ("WIS", 15),
            ("CHA", 23),
        ]),
        saving_throws: scores(&[("DEX", 7), ("CON", 16), ("WIS", 9), ("CHA", 13)]),
        skills: scores(&[("Perception", 16), ("Stealth", 7)]),
        damage_resistances: Vec::new(),
        damage_immunities: strings(&["fire"]),
        damage_vulnerabilities: Vec::new(),
        condition_immunities: Vec::new(),
        senses: scores(&[("blindsight", 60), ("darkvision", 120), ("perception", 26)]),
        languages: strings(&["Common", "Draconic"]),
        challenge_rating: 24.0,
        traits: vec![MonsterTrait {
            name: "Legendary Resistance".into(),
            description:
                "If the dragon fails a saving throw, it can choose to succeed instead (3/day)."
                    .into(),
        }],
        actions: vec![
            MonsterAction {
                name: "Multiattack".into(),
                description: "The dragon can use its Frightful Presence. It then makes three \
                              attacks: one with its bite and two with its claws."
                    .into(),
                ..Default::default()
            },
            MonsterAction {
                name: "Bite".into(),
                attack_bonus: Some(17),
                damage_type: Some("piercing".into()),
                damage_dice: Some("2d10+10".into()),
                ..Default::default()
            },
            MonsterAction {
                name: "Fire Breath".into(),
                description: "The dragon exhales fire in a 90-foot cone. Each creature must make \
                              a DC 24 Dexterity saving throw, taking 91 (26d6) fire damage on a \
                              failed save, or half as much on a successful one."
                    .into(),
                save_dc: Some(24),
                save_type: Some("DEX".into()),
                ..Default::default()
            },
        ],
        legendary_actions: Some(LegendaryActionSet {
            actions_per_round: 3,
            options: vec![
                LegendaryActionOption {
                    name: "Detect".into(),
                    cost: 1,
                    description: "The dragon makes a Wisdom (Perception) check.".into(),
                },
                LegendaryActionOption {
                    name: "Tail Attack".into(),
                    cost: 1,
                    description: "The dragon makes a tail attack.".into(),
                },
                LegendaryActionOption {
                    name: "Wing Attack".into(),
                    cost: 2,
                    description: "The dragon beats its wings. Each creature within 15 feet must \
                                  succeed on a DC 25 Dexterity saving throw or take 17 (2d6+10) \
                                  bludgeoning damage and be knocked prone."
                        .into(),
                },
            ],
        }),
        legendary_resistances: 3,
        lair_actions: vec![LairAction {
            description: "Magma erupts from a point on the ground the dragon can see within 120 \
                          feet. Each creature within 20 feet must make a DC 15 Dexterity saving \
                          throw or take 21 (6d6) fire damage."
                .into(),
            save_dc: Some(15),
            save_type: Some("DEX".into()),
        }],
    }
}

fn goblin() -> MonsterStat {
    MonsterStat {
        name: "Goblin".into(),
        size: "Small".into(),
        kind: "humanoid".into(),
        alignment: "neutral evil".into(),
        hp: 7,
        ac: 15,
        speed: scores(&[("walk", 30)]),
        ability_scores: scores(&[
            ("STR", 8),
            ("DEX", 14),
            ("CON", 10),
            ("INT", 10),
            ("WIS", 8),
            ("CHA", 8),
        ]),
        saving_throws: BTreeMap::new(),
        skills: scores(&[("Stealth", 6)]),
        damage_resistances: Vec::new(),
        damage_immunities: Vec::new(),
        damage_vulnerabilities: Vec::new(),
        condition_immunities: Vec::new(),
        senses: scores(&[("darkvision", 60)]),
        languages: strings(&["Common", "Goblin"]),
        challenge_rating: 0.25,
        traits: vec![MonsterTrait {
            name: "Nimble Escape".into(),
            description: "The goblin can take the Disengage or Hide action as a bonus action on \
                          each of its turns."
                .into(),
        }],
        actions: vec![MonsterAction {
            name: "Scimitar".into(),
            attack_bonus: Some(4),
            damage_type: Some("slashing".into()),
            damage_dice: Some("1d6+2".into()),
            ..Default::default()
        }],
        legendary_actions: None,
        legendary_resistances: 0,
        lair_actions: Vec::new(),
    }
}
