//! Deterministic Primitives
//!
//! Seeded randomness shared by the puzzle generator and tests.
//!
//! - `rng`: Xorshift128+ PRNG and round seed derivation

pub mod rng;
