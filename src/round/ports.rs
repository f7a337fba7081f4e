//! Collaborator Seams
//!
//! The orchestrator never talks to a screen or a pointer directly; it
//! drives these traits. Implementations suspend on real gestures and UI
//! prompts; a round cancels them by dropping the in-flight future.

use crate::game::dice::Roll;
use crate::game::history::OperandId;
use crate::round::outcome::RoundOutcome;
use crate::solver::expr::Operator;

/// A gesture that landed on a number box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    /// The live operand the gesture resolved to.
    pub operand: OperandId,
}

/// Player gesture source.
///
/// `None` means the input source is gone (window closed, navigation
/// away); the round treats that as an internal abort.
#[allow(async_fn_in_trait)]
pub trait InputPort {
    /// Suspend until a hold gesture begins on a number box.
    async fn await_hold_start(&mut self) -> Option<Selection>;

    /// Suspend until the hold is released over a number box.
    async fn await_hold_release(&mut self) -> Option<Selection>;
}

/// Presentation surface.
#[allow(async_fn_in_trait)]
pub trait Presenter {
    /// A new puzzle was accepted; the round is about to start.
    fn begin_round(&mut self, roll: &Roll, target: i64);

    /// Prompt for an operator choice. `is_calculable` tells the UI
    /// whether any operator is legal for the selected pair. `None` means
    /// the player backed out of the choice.
    async fn select_operator(&mut self, is_calculable: bool) -> Option<Operator>;

    /// Show the latest committed formula text.
    fn render_formula(&mut self, text: &str);

    /// Acknowledge an unsolvable-roll resample before the next shuffle.
    async fn show_notice(&mut self);

    /// Play the win/lose acknowledgement before scores settle.
    async fn play_outcome_animation(&mut self, outcome: RoundOutcome);
}
