//! Dice Fusion Demo Shell
//!
//! Runs scripted rounds end to end: loads the profile, generates a
//! solvable puzzle, and lets an auto-player follow one of the solver's
//! own reduction plans while the countdown and retire activities race it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dice_fusion::game::profile::JsonProfileStore;
use dice_fusion::round::ports::{InputPort, Presenter, Selection};
use dice_fusion::solver::search::{solution_plan, PlanStep};
use dice_fusion::{GameConfig, OperandId, Operator, Roll, RoundOrchestrator, RoundOutcome, VERSION};

/// Pacing for the scripted gestures, so the log reads like a play-through.
const GESTURE_PACE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Dice Fusion v{}", VERSION);

    let config = GameConfig::default();
    info!(
        dice = config.number_of_dice,
        max_face = config.dice_max_value,
        target = config.target,
        retire_secs = config.retire_secs,
        "configuration"
    );

    let store = JsonProfileStore::new("dice-fusion-profile.json");
    let bot = ScriptedPlayer::default();
    let mut orchestrator = RoundOrchestrator::new(config, bot.clone(), bot, store);
    let session = orchestrator.session();

    for round in 1..=3u32 {
        info!(round, "=== starting round ===");
        let outcome = orchestrator.run_round().await?;
        let snap = session.snapshot().await;
        info!(round, %outcome, score = snap.score, combo = snap.combo, "=== round finished ===");
    }

    let snap = session.snapshot().await;
    info!(score = snap.score, combo = snap.combo, "session complete");
    Ok(())
}

#[derive(Default)]
struct ScriptState {
    steps: Vec<PlanStep>,
    idx: usize,
}

/// Auto-player that replays one of the solver's reduction plans.
#[derive(Clone, Default)]
struct ScriptedPlayer {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedPlayer {
    fn current_step(&self) -> Option<PlanStep> {
        let state = self.state.lock().expect("script state poisoned");
        state.steps.get(state.idx).copied()
    }
}

impl InputPort for ScriptedPlayer {
    async fn await_hold_start(&mut self) -> Option<Selection> {
        tokio::time::sleep(GESTURE_PACE).await;
        match self.current_step() {
            Some(step) => Some(Selection {
                operand: OperandId(step.left),
            }),
            // Plan exhausted: the puzzle is solved, idle until the
            // solved detector ends the round.
            None => std::future::pending().await,
        }
    }

    async fn await_hold_release(&mut self) -> Option<Selection> {
        tokio::time::sleep(GESTURE_PACE).await;
        self.current_step().map(|step| Selection {
            operand: OperandId(step.right),
        })
    }
}

impl Presenter for ScriptedPlayer {
    fn begin_round(&mut self, roll: &Roll, target: i64) {
        info!(%roll, target, "puzzle ready");
        let mut state = self.state.lock().expect("script state poisoned");
        state.steps = solution_plan(&roll.values(), target)
            .expect("orchestrator only starts rounds with solvable rolls");
        state.idx = 0;
    }

    async fn select_operator(&mut self, _is_calculable: bool) -> Option<Operator> {
        tokio::time::sleep(GESTURE_PACE / 2).await;
        let mut state = self.state.lock().expect("script state poisoned");
        let op = state.steps[state.idx].op;
        state.idx += 1;
        Some(op)
    }

    fn render_formula(&mut self, text: &str) {
        info!(formula = text, "committed");
    }

    async fn show_notice(&mut self) {
        info!("roll had no solution, shuffling again");
        tokio::time::sleep(GESTURE_PACE).await;
    }

    async fn play_outcome_animation(&mut self, outcome: RoundOutcome) {
        info!(%outcome, "playing outcome animation");
        tokio::time::sleep(GESTURE_PACE).await;
    }
}
