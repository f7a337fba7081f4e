//! Round Phase Machine and Activity Race
//!
//! One round = load profile, shuffle until solvable, then race four
//! concurrent activities: the player-solve loop, a cosmetic countdown,
//! the retire deadline, and the solved detector. The first to complete
//! resolves the round; the rest are cancelled by dropping their futures,
//! so nothing outlives the round boundary.
//!
//! Simultaneous completions resolve deterministically: the race is a
//! `biased` select whose arm order is the outcome priority (solved, then
//! retire/timeout, then internal abort).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::time::{interval, sleep, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::rng::DiceRng;
use crate::game::generator::{GameConfig, GeneratorError, PuzzleGenerator};
use crate::game::history::FormulaHistory;
use crate::game::profile::{ProfileError, ProfileStore};
use crate::game::session::SessionState;
use crate::round::outcome::RoundOutcome;
use crate::round::ports::{InputPort, Presenter};

/// How often the cosmetic countdown refreshes the session timer.
const COUNTDOWN_TICK: Duration = Duration::from_millis(100);

/// Phase of the round state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// Loading the player profile.
    Loading,
    /// Sampling rolls until one is solvable.
    Shuffling,
    /// A solvable roll was accepted.
    Solvable,
    /// The four activities are racing.
    Playing,
    /// An activity completed and resolved the round.
    Resolved(RoundOutcome),
    /// Outcome acknowledged; scores settling and persisting.
    Settling,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundPhase::Loading => write!(f, "loading"),
            RoundPhase::Shuffling => write!(f, "shuffling"),
            RoundPhase::Solvable => write!(f, "solvable"),
            RoundPhase::Playing => write!(f, "playing"),
            RoundPhase::Resolved(outcome) => write!(f, "resolved({outcome})"),
            RoundPhase::Settling => write!(f, "settling"),
        }
    }
}

/// Errors that abort the round loop.
///
/// Cancellation is not an error; losing activities end by being dropped.
#[derive(Debug, Error)]
pub enum RoundError {
    /// Profile load/save failed. The loop never proceeds past a failed
    /// save with a stale profile.
    #[error("profile persistence failed: {0}")]
    Profile(#[from] ProfileError),

    /// Puzzle generation failed (attempt ceiling or bad configuration).
    #[error("puzzle generation failed: {0}")]
    Generator(#[from] GeneratorError),
}

/// Cloneable handle for the UI shell to retire the current round.
#[derive(Clone, Debug)]
pub struct RetireHandle {
    tx: mpsc::Sender<()>,
}

impl RetireHandle {
    /// Request an explicit quit of the round in flight.
    pub async fn retire(&self) {
        let _ = self.tx.send(()).await;
    }
}

/// Drives rounds from profile load to outcome persistence.
pub struct RoundOrchestrator<I, P, S> {
    config: GameConfig,
    input: I,
    presenter: P,
    store: S,
    session: SessionState,
    session_id: Uuid,
    round_index: u64,
    phase: RoundPhase,
    retire_tx: mpsc::Sender<()>,
    retire_rx: mpsc::Receiver<()>,
}

impl<I, P, S> RoundOrchestrator<I, P, S>
where
    I: InputPort,
    P: Presenter,
    S: ProfileStore,
{
    /// Create an orchestrator with a fresh session id.
    pub fn new(config: GameConfig, input: I, presenter: P, store: S) -> Self {
        let (retire_tx, retire_rx) = mpsc::channel(4);
        Self {
            config,
            input,
            presenter,
            store,
            session: SessionState::new(),
            session_id: Uuid::new_v4(),
            round_index: 0,
            phase: RoundPhase::Loading,
            retire_tx,
            retire_rx,
        }
    }

    /// Pin the session id (reproducible dice for replays and tests).
    pub fn with_session_id(mut self, session_id: Uuid) -> Self {
        self.session_id = session_id;
        self
    }

    /// Handle to the shared score/combo/timer surface.
    pub fn session(&self) -> SessionState {
        self.session.clone()
    }

    /// Handle the UI shell uses to quit the round in flight.
    pub fn retire_handle(&self) -> RetireHandle {
        RetireHandle {
            tx: self.retire_tx.clone(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Run rounds until an error surfaces.
    pub async fn run(&mut self) -> Result<(), RoundError> {
        loop {
            self.run_round().await?;
        }
    }

    /// Run a single round to resolution.
    ///
    /// An `Aborted` outcome returns early: scores untouched, nothing
    /// persisted, the caller restarts at shuffling. Every other outcome
    /// passes through settling and persistence.
    pub async fn run_round(&mut self) -> Result<RoundOutcome, RoundError> {
        self.set_phase(RoundPhase::Loading);
        let mut profile = self.store.load().await?;

        self.set_phase(RoundPhase::Shuffling);
        self.session.reset(profile.score, profile.combo).await;

        // The profile carries the player's dice setup; the target and
        // timings come from the game config.
        let round_config = GameConfig {
            number_of_dice: profile.number_of_dice,
            dice_max_value: profile.dice_max_value,
            ..self.config.clone()
        };
        let rng = DiceRng::for_round(&self.session_id, self.round_index);
        self.round_index += 1;

        let mut generator = PuzzleGenerator::new(round_config.clone(), rng);
        let puzzle = generator.next_puzzle(&mut self.presenter).await?;

        self.set_phase(RoundPhase::Solvable);
        info!(roll = %puzzle.roll, target = puzzle.target,
              solutions = puzzle.solutions.len(), "puzzle accepted");

        let mut history = FormulaHistory::new();
        history.reset(&puzzle.roll);
        self.presenter.begin_round(&puzzle.roll, puzzle.target);

        self.set_phase(RoundPhase::Playing);
        let outcome = {
            let history = Arc::new(RwLock::new(history));
            let (revision_tx, revision_rx) = watch::channel(0u64);

            let solved = solved_detector(history.clone(), revision_rx, puzzle.target);
            let retire = retire_timer(round_config.retire_after(), &mut self.retire_rx);
            let player = player_loop(
                &mut self.input,
                &mut self.presenter,
                &history,
                &revision_tx,
            );
            let ticker = countdown(self.session.clone());
            tokio::pin!(solved, retire, player, ticker);

            // Arm order IS the resolution priority for same-tick
            // completions; the ticker never completes.
            tokio::select! {
                biased;
                () = &mut solved => RoundOutcome::Solved,
                outcome = &mut retire => outcome,
                () = &mut player => RoundOutcome::Aborted,
                () = &mut ticker => unreachable!("countdown is cosmetic and never resolves"),
            }
        };
        self.set_phase(RoundPhase::Resolved(outcome));
        info!(%outcome, "round resolved");

        if outcome == RoundOutcome::Aborted {
            return Ok(outcome);
        }

        self.set_phase(RoundPhase::Settling);
        self.presenter.play_outcome_animation(outcome).await;

        if outcome.is_win() {
            profile.apply_win();
        } else {
            profile.apply_lose();
        }
        self.session.set_scores(profile.score, profile.combo).await;
        self.store.save(&profile).await?;
        debug!(score = profile.score, combo = profile.combo, "round settled");

        Ok(outcome)
    }

    fn set_phase(&mut self, phase: RoundPhase) {
        debug!(from = %self.phase, to = %phase, "round phase");
        self.phase = phase;
    }
}

/// Player-solve activity: gesture pair, operator choice, commit.
///
/// Returns only when the input source closes, which the race maps to an
/// internal abort. Rejected combinations are reported and the selection
/// restarts; they never end the round.
async fn player_loop<I: InputPort, P: Presenter>(
    input: &mut I,
    presenter: &mut P,
    history: &Arc<RwLock<FormulaHistory>>,
    revision: &watch::Sender<u64>,
) {
    loop {
        let Some(first) = input.await_hold_start().await else {
            return;
        };
        let Some(second) = input.await_hold_release().await else {
            return;
        };
        if first.operand == second.operand {
            continue;
        }

        let legal = match history
            .read()
            .await
            .legal_operators(first.operand, second.operand)
        {
            Ok(ops) => ops,
            Err(e) => {
                warn!(error = %e, "stale selection, restarting gesture");
                continue;
            }
        };

        let Some(op) = presenter.select_operator(!legal.is_empty()).await else {
            continue;
        };

        let committed = {
            let mut h = history.write().await;
            match h.record_combination(first.operand, second.operand, op) {
                Ok(entry) => Some(entry.formula_text.clone()),
                Err(e) => {
                    warn!(error = %e, "combination rejected");
                    None
                }
            }
        };

        if let Some(text) = committed {
            presenter.render_formula(&text);
            revision.send_modify(|r| *r += 1);
        }
    }
}

/// Solved-detector activity: completes when one live operand equals the
/// target. Checks once up front, then wakes on every history revision.
async fn solved_detector(
    history: Arc<RwLock<FormulaHistory>>,
    mut revision: watch::Receiver<u64>,
    target: i64,
) {
    loop {
        if history.read().await.is_solved(target) {
            return;
        }
        if revision.changed().await.is_err() {
            // The writer is gone; no further mutation can solve this.
            std::future::pending::<()>().await;
        }
    }
}

/// Retire activity: explicit quit resolves `Retired`, the deadline
/// resolves `TimedOut`. A quit received in the same tick as the deadline
/// wins (quitting is a deliberate act; expiring is not).
async fn retire_timer(after: Duration, quit: &mut mpsc::Receiver<()>) -> RoundOutcome {
    let deadline = sleep(after);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            biased;
            received = quit.recv() => match received {
                Some(()) => return RoundOutcome::Retired,
                None => break,
            },
            () = &mut deadline => return RoundOutcome::TimedOut,
        }
    }
    // Every retire handle was dropped; only the deadline remains.
    deadline.await;
    RoundOutcome::TimedOut
}

/// Cosmetic countdown: publishes elapsed seconds to the session surface.
/// Never resolves the round; ends when the race drops it.
async fn countdown(session: SessionState) {
    let start = Instant::now();
    let mut ticks = interval(COUNTDOWN_TICK);
    loop {
        ticks.tick().await;
        session.set_timer(start.elapsed().as_secs_f32()).await;
    }
}
