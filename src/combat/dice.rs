//! Dice rolling
//!
//! Parses notation like "2d6+3", "1d20", "4d6-2" and rolls it through a
//! [`DieRoller`], so callers can swap the random source for a scripted one.

use std::collections::VecDeque;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of individual die results
pub trait DieRoller: Send {
    /// Roll one die with the given number of sides, returning 1..=sides
    fn roll(&mut self, sides: u32) -> u32;

    /// Roll a single d20
    fn d20(&mut self) -> u32 {
        self.roll(20)
    }
}

/// Die roller backed by a seedable RNG
#[derive(Debug, Clone)]
pub struct RngRoller {
    rng: StdRng,
}

impl RngRoller {
    /// Seed from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DieRoller for RngRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

/// Die roller that replays a fixed list of results, cycling when exhausted.
///
/// Each scripted value is clamped into the die's range.
#[derive(Debug, Clone)]
pub struct ScriptedRoller {
    script: Vec<u32>,
    queue: VecDeque<u32>,
}

impl ScriptedRoller {
    pub fn new(script: impl Into<Vec<u32>>) -> Self {
        let script = script.into();
        let queue = script.iter().copied().collect();
        Self { script, queue }
    }
}

impl DieRoller for ScriptedRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        if self.queue.is_empty() {
            self.queue.extend(self.script.iter().copied());
        }
        let value = self.queue.pop_front().unwrap_or(1);
        value.clamp(1, sides.max(1))
    }
}

/// A parsed dice expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier to add/subtract
    pub modifier: i32,
}

/// Individual dice plus the modified total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceOutcome {
    pub rolls: Vec<u32>,
    pub total: i32,
}

impl DiceRoll {
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Roll every die and apply the modifier
    pub fn roll_with(&self, roller: &mut dyn DieRoller) -> DiceOutcome {
        let rolls: Vec<u32> = (0..self.count).map(|_| roller.roll(self.sides)).collect();
        let sum: i64 = rolls.iter().map(|&r| i64::from(r)).sum();
        let total = (sum + i64::from(self.modifier)).clamp(i64::from(i32::MIN), i64::from(i32::MAX));

        DiceOutcome {
            rolls,
            total: total as i32,
        }
    }
}

impl FromStr for DiceRoll {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dice(s)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Upper bound on dice in one expression
const MAX_DICE: u32 = 1000;

/// Parse a dice notation string like "2d6+3"
pub fn parse_dice(notation: &str) -> Result<DiceRoll, String> {
    let notation = notation.trim().to_ascii_lowercase();
    let (count, rest) = notation
        .split_once('d')
        .ok_or_else(|| format!("expected NdS[+M], got {:?}", notation))?;

    let count = match count {
        "" => 1,
        n => n
            .parse::<u32>()
            .map_err(|_| format!("bad dice count {:?}", n))?,
    };
    if !(1..=MAX_DICE).contains(&count) {
        return Err(format!("dice count must be between 1 and {}", MAX_DICE));
    }

    // the modifier keeps its sign: "8-2" -> ("8", "-2")
    let (sides, modifier) = match rest.find(|c: char| c == '+' || c == '-') {
        Some(at) => rest.split_at(at),
        None => (rest, "+0"),
    };
    let sides = sides
        .parse::<u32>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| format!("bad die size {:?}", sides))?;
    let modifier = modifier
        .parse::<i32>()
        .map_err(|_| format!("bad modifier {:?}", modifier))?;

    Ok(DiceRoll::new(count, sides, modifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let roll = parse_dice("2d6").unwrap();
        assert_eq!(roll, DiceRoll::new(2, 6, 0));
    }

    #[test]
    fn test_parse_modifiers() {
        assert_eq!(parse_dice("1d20+5").unwrap(), DiceRoll::new(1, 20, 5));
        assert_eq!(parse_dice("3d8-2").unwrap(), DiceRoll::new(3, 8, -2));
        assert_eq!(parse_dice("d6").unwrap(), DiceRoll::new(1, 6, 0));
        assert_eq!(parse_dice("  2D10+3 ").unwrap(), DiceRoll::new(2, 10, 3));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_dice("abc").is_err());
        assert!(parse_dice("2d").is_err());
        assert!(parse_dice("d").is_err());
        assert!(parse_dice("0d6").is_err());
        assert!(parse_dice("2d0").is_err());
        assert!(parse_dice("2d-3").is_err());
        assert!(parse_dice("5000d6").is_err());
        assert!(parse_dice("2d6+").is_err());
        assert!(parse_dice("2d6+-3").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceRoll::new(2, 6, 0).to_string(), "2d6");
        assert_eq!(DiceRoll::new(1, 20, 5).to_string(), "1d20+5");
        assert_eq!(DiceRoll::new(3, 8, -2).to_string(), "3d8-2");
    }

    #[test]
    fn test_seeded_roller_bounds() {
        let mut roller = RngRoller::seeded(7);
        for _ in 0..200 {
            let r = roller.d20();
            assert!((1..=20).contains(&r), "d20 produced {}", r);
        }
    }

    #[test]
    fn test_seeded_roller_is_reproducible() {
        let mut a = RngRoller::seeded(42);
        let mut b = RngRoller::seeded(42);
        let left: Vec<u32> = (0..10).map(|_| a.d20()).collect();
        let right: Vec<u32> = (0..10).map(|_| b.d20()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_scripted_roller_cycles_and_clamps() {
        let mut roller = ScriptedRoller::new(vec![4, 25]);
        assert_eq!(roller.d20(), 4);
        assert_eq!(roller.d20(), 20);
        assert_eq!(roller.d20(), 4);
        assert_eq!(roller.roll(6), 6);
    }

    #[test]
    fn test_roll_with_totals() {
        let mut roller = ScriptedRoller::new(vec![3, 5, 6]);
        let outcome = DiceRoll::new(3, 6, 2).roll_with(&mut roller);
        assert_eq!(outcome.rolls, vec![3, 5, 6]);
        assert_eq!(outcome.total, 16);
    }
}
