//! Shared Session Surface
//!
//! The score/combo/timer values the presentation layer reads while a
//! round is in flight. Written only by the orchestrator (scores at
//! settling, timer by the countdown activity) and reset at every
//! shuffle, replacing the ambient global state of a typical game shell
//! with an explicitly owned handle.

use std::sync::Arc;
use tokio::sync::RwLock;

/// Point-in-time view of the session surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Current score.
    pub score: u32,
    /// Current combo.
    pub combo: u32,
    /// Seconds elapsed in the current round.
    pub timer_secs: f32,
}

/// Cloneable handle to the shared surface.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    inner: Arc<RwLock<SessionSnapshot>>,
}

impl SessionState {
    /// Create a zeroed surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new round: scores from the loaded profile, timer to
    /// zero. Called at every shuffle transition.
    pub async fn reset(&self, score: u32, combo: u32) {
        let mut s = self.inner.write().await;
        *s = SessionSnapshot {
            score,
            combo,
            timer_secs: 0.0,
        };
    }

    /// Update the round timer (countdown activity only).
    pub async fn set_timer(&self, secs: f32) {
        self.inner.write().await.timer_secs = secs;
    }

    /// Publish settled scores.
    pub async fn set_scores(&self, score: u32, combo: u32) {
        let mut s = self.inner.write().await;
        s.score = score;
        s.combo = combo;
    }

    /// Read the current surface.
    pub async fn snapshot(&self) -> SessionSnapshot {
        *self.inner.read().await
    }
}
