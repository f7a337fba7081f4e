//! Deterministic Random Number Generator
//!
//! Uses Xorshift128+ for fast, high-quality, deterministic randomness.
//! Given the same seed, produces the identical dice sequence on all
//! platforms, which makes generated puzzles reproducible in tests and
//! replays.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Deterministic PRNG using the Xorshift128+ algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG produces the exact same sequence of
/// values on any platform.
///
/// # Example
///
/// ```
/// use dice_fusion::core::rng::DiceRng;
///
/// let mut rng = DiceRng::new(12345);
/// let value = rng.next_u64();
/// assert_eq!(value, 6233086606872742541); // Always the same!
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiceRng {
    state: [u64; 2],
}

impl Default for DiceRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DiceRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Create an RNG for one round of a session.
    ///
    /// Derives a deterministic seed from the session id and the round
    /// index, so every round of a session gets a fresh but reproducible
    /// dice sequence.
    pub fn for_round(session_id: &Uuid, round_index: u64) -> Self {
        Self::new(derive_round_seed(session_id, round_index))
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random integer in range [0, max).
    ///
    /// Uses rejection sampling for uniform distribution.
    #[inline]
    pub fn next_int(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }

        // Rejection sampling: reject values in the biased tail
        let threshold = u64::MAX - (u64::MAX % max);
        loop {
            let value = self.next_u64();
            if value < threshold {
                return value % max;
            }
        }
    }

    /// Roll a single die face in `[1, max_value]`.
    #[inline]
    pub fn roll_die(&mut self, max_value: i64) -> i64 {
        debug_assert!(max_value >= 1);
        self.next_int(max_value as u64) as i64 + 1
    }

    /// Expose the internal state (for diagnostics and replay capture).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }
}

/// SplitMix64 generator used for seed expansion.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a round seed from session id and round index.
///
/// SHA-256 over both inputs, truncated to 64 bits. The session id is
/// unique per play session, the round index makes consecutive rounds
/// independent.
pub fn derive_round_seed(session_id: &Uuid, round_index: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(round_index.to_le_bytes());
    let digest = hasher.finalize();

    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
