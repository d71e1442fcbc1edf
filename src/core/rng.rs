//! Deterministic random number generation and RNG fingerprints.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Serializable**: O(1) state capture and restore via ChaCha word position
//! - **Fingerprintable**: a deterministic *peek* at the next word, without
//!   advancing the stream, so two states with the same seed but different
//!   stream positions hash differently
//!
//! ## Usage
//!
//! ```
//! use rust_bge::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let before = rng.state().fingerprint();
//!
//! // Peeking never advances the stream
//! assert_eq!(before, rng.state().fingerprint());
//!
//! let _roll = rng.gen_range(1..7);
//! assert_ne!(before, rng.state().fingerprint());
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG for dice and shuffles.
///
/// Uses ChaCha8 for speed while keeping a seekable stream. States are
/// immutable snapshots, so rules that consume randomness store the advanced
/// `GameRngState` in the resulting `GameState`.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Generate a random integer in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<i64>) -> i64 {
        self.inner.gen_range(range)
    }

    /// Next raw 64-bit word.
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for storage in a `GameState`.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl GameRngState {
    /// Compute the hash fingerprint of this position.
    ///
    /// The peek replays the stream from `word_pos` on a throwaway generator,
    /// so it is a pure function of `(seed, word_pos)`.
    #[must_use]
    pub fn fingerprint(&self) -> RngFingerprint {
        let mut probe = GameRng::from_state(self);
        RngFingerprint {
            seed: self.seed,
            word_pos: self.word_pos,
            peek: probe.next_u64(),
        }
    }
}

/// What the state hasher folds in for the RNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RngFingerprint {
    pub seed: u64,
    pub word_pos: u128,
    /// The next word the stream would produce.
    pub peek: u64,
}
