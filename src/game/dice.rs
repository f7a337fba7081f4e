//! Dice With Stable Identity
//!
//! Two dice showing the same face are still separate selectable entities:
//! identity is the position in the roll, never the face value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::rng::DiceRng;

/// Stable identity of a die within one round.
///
/// Implements Ord so dice sort by roll position, not face value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DieId(pub u8);

/// A single die: identity plus rolled face value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    /// Position-stable identity.
    pub id: DieId,
    /// Face value in `[1, max_value]`.
    pub value: i64,
}

/// The dice of one round, ordered for display.
///
/// Order is irrelevant to solvability and preserved only so the
/// presentation layer shows dice where they were rolled.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roll {
    dice: Vec<Die>,
}

impl Roll {
    /// Roll `count` dice with faces in `[1, max_value]`.
    pub fn sample(rng: &mut DiceRng, count: usize, max_value: i64) -> Self {
        let dice = (0..count)
            .map(|i| Die {
                id: DieId(i as u8),
                value: rng.roll_die(max_value),
            })
            .collect();
        Self { dice }
    }

    /// Build a roll from explicit face values (tests, replays).
    pub fn from_values(values: &[i64]) -> Self {
        let dice = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Die {
                id: DieId(i as u8),
                value,
            })
            .collect();
        Self { dice }
    }

    /// The dice in display order.
    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    /// Face values in display order, the solver's input shape.
    pub fn values(&self) -> Vec<i64> {
        self.dice.iter().map(|d| d.value).collect()
    }

    /// Number of dice.
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    /// Whether the roll holds no dice.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}]", faces.join(" "))
    }
}
