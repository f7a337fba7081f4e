//! Solvable-Roll Sampling
//!
//! Rolls dice until the solver confirms at least one formula reaches the
//! target. After the first rejected roll the player is notified before
//! every retry, so a long resample never looks like a hang.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::core::rng::DiceRng;
use crate::game::dice::Roll;
use crate::round::ports::Presenter;
use crate::solver::search::{solve, SolverError};
use crate::{DEFAULT_DICE_COUNT, DEFAULT_DICE_MAX_VALUE, DEFAULT_RETIRE_SECS};

/// Game configuration.
///
/// Dice count and face range are overridden per round by the loaded
/// player profile; the target and timings come from here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of dice per roll.
    pub number_of_dice: usize,
    /// Maximum die face value (faces are `1..=dice_max_value`).
    pub dice_max_value: i64,
    /// The answer value every round targets.
    pub target: i64,
    /// Seconds before a round times out.
    pub retire_secs: u64,
    /// Ceiling on reshuffle attempts per round; `None` = unbounded.
    pub max_shuffle_attempts: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            number_of_dice: DEFAULT_DICE_COUNT,
            dice_max_value: DEFAULT_DICE_MAX_VALUE,
            target: 24,
            retire_secs: DEFAULT_RETIRE_SECS,
            max_shuffle_attempts: None,
        }
    }
}

impl GameConfig {
    /// Round deadline as a duration.
    pub fn retire_after(&self) -> Duration {
        Duration::from_secs(self.retire_secs)
    }
}

/// An accepted puzzle: a roll with at least one solution.
///
/// The generator owns the roll until the round starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    /// The accepted roll.
    pub roll: Roll,
    /// The target the roll can reach.
    pub target: i64,
    /// Every distinct formula reaching the target, discovery order.
    pub solutions: Vec<String>,
}

/// Puzzle generation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// The configured attempt ceiling was hit without a solvable roll.
    #[error("no solvable roll after {attempts} attempts")]
    AttemptsExhausted {
        /// How many rolls were tried.
        attempts: u32,
    },

    /// The solver rejected the configuration (e.g. zero dice).
    #[error("solver rejected configuration: {0}")]
    Solver(#[from] SolverError),
}

/// Samples rolls until one is solvable.
#[derive(Debug)]
pub struct PuzzleGenerator {
    config: GameConfig,
    rng: DiceRng,
}

impl PuzzleGenerator {
    /// Create a generator for one round.
    pub fn new(config: GameConfig, rng: DiceRng) -> Self {
        Self { config, rng }
    }

    /// Sample rolls until the solver accepts one.
    ///
    /// The presenter's notice is awaited before every retry after the
    /// first rejected roll. Unsolvable rolls are normal; only an
    /// exhausted attempt ceiling or a solver contract violation errors.
    pub async fn next_puzzle<P: Presenter>(
        &mut self,
        presenter: &mut P,
    ) -> Result<Puzzle, GeneratorError> {
        let mut attempts = 0u32;
        loop {
            if attempts > 0 {
                presenter.show_notice().await;
            }

            let roll = Roll::sample(
                &mut self.rng,
                self.config.number_of_dice,
                self.config.dice_max_value,
            );
            let result = solve(&roll.values(), self.config.target)?;
            attempts += 1;

            if result.can_solve {
                debug!(%roll, target = self.config.target, attempts,
                       solutions = result.solutions.len(), "roll accepted");
                return Ok(Puzzle {
                    roll,
                    target: self.config.target,
                    solutions: result.solutions,
                });
            }

            debug!(%roll, target = self.config.target, attempts, "roll unsolvable, reshuffling");

            if let Some(max) = self.config.max_shuffle_attempts {
                if attempts >= max {
                    return Err(GeneratorError::AttemptsExhausted { attempts });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::outcome::RoundOutcome;
    use crate::solver::expr::Operator;

    /// Presenter stub that counts notices and ignores everything else.
    #[derive(Default)]
    struct CountingPresenter {
        notices: u32,
    }

    impl Presenter for CountingPresenter {
        fn begin_round(&mut self, _roll: &Roll, _target: i64) {}

        async fn select_operator(&mut self, _is_calculable: bool) -> Option<Operator> {
            None
        }

        fn render_formula(&mut self, _text: &str) {}

        async fn show_notice(&mut self) {
            self.notices += 1;
        }

        async fn play_outcome_animation(&mut self, _outcome: RoundOutcome) {}
    }

    fn config(dice: usize, max_value: i64, target: i64, cap: Option<u32>) -> GameConfig {
        GameConfig {
            number_of_dice: dice,
            dice_max_value: max_value,
            target,
            max_shuffle_attempts: cap,
            ..GameConfig::default()
        }
    }

    #[tokio::test]
    async fn test_accepted_roll_is_solvable() {
        let mut generator = PuzzleGenerator::new(config(2, 6, 6, Some(1000)), DiceRng::new(11));
        let mut presenter = CountingPresenter::default();

        let puzzle = generator.next_puzzle(&mut presenter).await.unwrap();
        let check = solve(&puzzle.roll.values(), puzzle.target).unwrap();
        assert!(check.can_solve);
        assert_eq!(puzzle.solutions, check.solutions);
    }

    #[tokio::test]
    async fn test_deterministic_under_fixed_seed() {
        let cfg = config(3, 6, 10, Some(1000));
        let mut presenter = CountingPresenter::default();

        let a = PuzzleGenerator::new(cfg.clone(), DiceRng::new(42))
            .next_puzzle(&mut presenter)
            .await
            .unwrap();
        let b = PuzzleGenerator::new(cfg, DiceRng::new(42))
            .next_puzzle(&mut presenter)
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_notice_only_after_first_failure() {
        // A single die never reaches 100, so every roll is rejected:
        // 5 attempts, notices before attempts 2..=5.
        let mut generator = PuzzleGenerator::new(config(1, 6, 100, Some(5)), DiceRng::new(3));
        let mut presenter = CountingPresenter::default();

        let err = generator.next_puzzle(&mut presenter).await.unwrap_err();
        assert_eq!(err, GeneratorError::AttemptsExhausted { attempts: 5 });
        assert_eq!(presenter.notices, 4);
    }

    #[tokio::test]
    async fn test_no_notice_when_first_roll_accepted() {
        // Any single die in 1..=6 solves "reach its own face" for a
        // 1-valued target... use a target every roll satisfies.
        let mut generator = PuzzleGenerator::new(config(2, 1, 2, Some(10)), DiceRng::new(9));
        let mut presenter = CountingPresenter::default();

        let puzzle = generator.next_puzzle(&mut presenter).await.unwrap();
        assert_eq!(puzzle.roll.values(), vec![1, 1]);
        assert_eq!(presenter.notices, 0);
    }

    #[tokio::test]
    async fn test_zero_dice_is_contract_violation() {
        let mut generator = PuzzleGenerator::new(config(0, 6, 6, None), DiceRng::new(1));
        let mut presenter = CountingPresenter::default();

        let err = generator.next_puzzle(&mut presenter).await.unwrap_err();
        assert_eq!(err, GeneratorError::Solver(SolverError::EmptyRoll));
    }
}
