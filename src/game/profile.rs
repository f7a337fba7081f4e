//! Player Profile and Persistence
//!
//! Score, combo, and dice configuration survive across sessions. The
//! profile is loaded before a round starts and saved only at round
//! boundaries; a failed save is surfaced, never swallowed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::{DEFAULT_DICE_COUNT, DEFAULT_DICE_MAX_VALUE};

/// Persistent player state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Accumulated score.
    pub score: u32,
    /// Consecutive solved rounds.
    pub combo: u32,
    /// Dice per roll for this player.
    pub number_of_dice: usize,
    /// Maximum die face value for this player.
    pub dice_max_value: i64,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            score: 0,
            combo: 0,
            number_of_dice: DEFAULT_DICE_COUNT,
            dice_max_value: DEFAULT_DICE_MAX_VALUE,
        }
    }
}

impl PlayerProfile {
    /// Apply a solved round: the combo grows, the score grows by it.
    pub fn apply_win(&mut self) {
        self.combo += 1;
        self.score += self.combo;
    }

    /// Apply a losing round: the combo resets, the score stands.
    pub fn apply_lose(&mut self) {
        self.combo = 0;
    }
}

/// Persistence failures.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The backing store could not be read or written.
    #[error("profile io failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored record did not parse.
    #[error("profile record malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Persistence collaborator, awaited at round boundaries only.
#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// Load the profile; a store with no record yields the default.
    async fn load(&self) -> Result<PlayerProfile, ProfileError>;

    /// Persist the profile.
    async fn save(&self, profile: &PlayerProfile) -> Result<(), ProfileError>;
}

/// On-disk shape: the profile plus a save timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct ProfileRecord {
    profile: PlayerProfile,
    saved_at: DateTime<Utc>,
}

/// JSON-file-backed profile store.
#[derive(Clone, Debug)]
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    /// Store profiles at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileStore for JsonProfileStore {
    async fn load(&self) -> Result<PlayerProfile, ProfileError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let record: ProfileRecord = serde_json::from_slice(&bytes)?;
                debug!(path = %self.path.display(), saved_at = %record.saved_at, "profile loaded");
                Ok(record.profile)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no profile record, using default");
                Ok(PlayerProfile::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, profile: &PlayerProfile) -> Result<(), ProfileError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let record = ProfileRecord {
            profile: profile.clone(),
            saved_at: Utc::now(),
        };
        let bytes = serde_json::to_vec_pretty(&record)?;
        tokio::fs::write(&self.path, bytes).await?;
        debug!(path = %self.path.display(), score = profile.score, combo = profile.combo,
               "profile saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rule() {
        let mut profile = PlayerProfile {
            score: 10,
            combo: 2,
            ..PlayerProfile::default()
        };
        profile.apply_win();
        assert_eq!(profile.score, 13);
        assert_eq!(profile.combo, 3);
    }

    #[test]
    fn test_lose_rule() {
        let mut profile = PlayerProfile {
            score: 10,
            combo: 2,
            ..PlayerProfile::default()
        };
        profile.apply_lose();
        assert_eq!(profile.score, 10);
        assert_eq!(profile.combo, 0);
    }

    #[test]
    fn test_combo_compounds_across_wins() {
        let mut profile = PlayerProfile::default();
        profile.apply_win();
        profile.apply_win();
        profile.apply_win();
        assert_eq!(profile.combo, 3);
        assert_eq!(profile.score, 1 + 2 + 3);
    }

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(dir.path().join("profile.json"));

        let profile = PlayerProfile {
            score: 42,
            combo: 7,
            number_of_dice: 6,
            dice_max_value: 8,
        };
        store.save(&profile).await.unwrap();
        assert_eq!(store.load().await.unwrap(), profile);
    }

    #[tokio::test]
    async fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().await.unwrap(), PlayerProfile::default());
    }

    #[tokio::test]
    async fn test_malformed_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = JsonProfileStore::new(path);
        assert!(matches!(
            store.load().await,
            Err(ProfileError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProfileStore::new(dir.path().join("nested/deeper/profile.json"));
        store.save(&PlayerProfile::default()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), PlayerProfile::default());
    }
}
