//! # Dice Fusion Puzzle Engine
//!
//! Dice-based arithmetic puzzle: combine every die with `+ - * /` to reach
//! the target number before the clock runs out.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DICE FUSION ENGINE                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  └── rng.rs       - Xorshift128+ PRNG, round seed derivation │
//! │                                                              │
//! │  solver/          - Exhaustive formula search (pure)         │
//! │  ├── expr.rs      - Operators, exact integer arithmetic      │
//! │  └── search.rs    - Pairwise-reduction enumeration           │
//! │                                                              │
//! │  game/            - Puzzle and player state                  │
//! │  ├── dice.rs      - Dice with stable identity                │
//! │  ├── generator.rs - Solvable-roll sampling                   │
//! │  ├── history.rs   - Live operands and committed formulas     │
//! │  ├── profile.rs   - Player profile and persistence           │
//! │  └── session.rs   - Shared score/combo/timer surface         │
//! │                                                              │
//! │  round/           - Timed round orchestration (async)        │
//! │  ├── outcome.rs   - Outcome set and resolution priority      │
//! │  ├── ports.rs     - Input / presentation / storage seams     │
//! │  └── orchestrator.rs - Phase machine, four-activity race     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/`, `solver/`, and `game/` modules are deterministic: all
//! randomness flows from a seeded Xorshift128+ generator, the solver is a
//! pure function of its inputs, and solution order is reproducible. Given
//! the same seed and configuration, every round presents the same puzzle.
//!
//! The `round/` module is async (tokio) but structured: the four per-round
//! activities are joined in a single `select!` with a fixed priority order,
//! so simultaneous completions resolve identically on every run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod round;
pub mod solver;

// Re-export commonly used types
pub use crate::core::rng::DiceRng;
pub use game::dice::{Die, DieId, Roll};
pub use game::generator::{GameConfig, Puzzle, PuzzleGenerator};
pub use game::history::{FormulaHistory, OperandId};
pub use game::profile::PlayerProfile;
pub use round::orchestrator::RoundOrchestrator;
pub use round::outcome::RoundOutcome;
pub use solver::expr::Operator;
pub use solver::search::{solve, SolveResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of dice per roll
pub const DEFAULT_DICE_COUNT: usize = 5;

/// Default maximum die face value
pub const DEFAULT_DICE_MAX_VALUE: i64 = 6;

/// Default round duration before a forced time-out
pub const DEFAULT_RETIRE_SECS: u64 = 90;
