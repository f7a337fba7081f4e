//! Round Outcomes
//!
//! Exactly one outcome terminates each round. When several activities
//! become ready in the same scheduling tick, resolution follows a fixed
//! priority so a last-second solve is never discarded in favor of a
//! simultaneous timeout.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The player reduced the roll to the target.
    Solved,
    /// The player quit the round explicitly.
    Retired,
    /// The round deadline expired.
    TimedOut,
    /// The player-solve loop ended abnormally (input source closed,
    /// navigation away). Restarts the round without touching score/combo.
    Aborted,
}

impl RoundOutcome {
    /// Resolution priority; lower value = takes precedence.
    ///
    /// Solved beats the losing outcomes, which beat an internal abort.
    pub fn priority(self) -> u8 {
        match self {
            RoundOutcome::Solved => 0,
            RoundOutcome::Retired | RoundOutcome::TimedOut => 1,
            RoundOutcome::Aborted => 2,
        }
    }

    /// Whether this outcome awards a win.
    pub fn is_win(self) -> bool {
        matches!(self, RoundOutcome::Solved)
    }

    /// Whether this outcome counts as a loss (resets the combo).
    ///
    /// An abort is neither a win nor a loss.
    pub fn is_loss(self) -> bool {
        matches!(self, RoundOutcome::Retired | RoundOutcome::TimedOut)
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundOutcome::Solved => "solved",
            RoundOutcome::Retired => "retired",
            RoundOutcome::TimedOut => "timed-out",
            RoundOutcome::Aborted => "aborted",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(RoundOutcome::Solved.priority() < RoundOutcome::Retired.priority());
        assert!(RoundOutcome::Solved.priority() < RoundOutcome::TimedOut.priority());
        assert!(RoundOutcome::Retired.priority() < RoundOutcome::Aborted.priority());
        assert_eq!(
            RoundOutcome::Retired.priority(),
            RoundOutcome::TimedOut.priority()
        );
    }

    #[test]
    fn test_win_loss_partition() {
        assert!(RoundOutcome::Solved.is_win());
        assert!(!RoundOutcome::Solved.is_loss());
        assert!(RoundOutcome::Retired.is_loss());
        assert!(RoundOutcome::TimedOut.is_loss());
        assert!(!RoundOutcome::Aborted.is_win());
        assert!(!RoundOutcome::Aborted.is_loss());
    }
}
