//! xxh3 hashing of canonical state encodings.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use super::encoder::CanonicalEncoder;
use crate::core::{ArtifactEntry, ArtifactId, GameRngState, GameState};

/// 64-bit and 128-bit hashes of one state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateHash {
    pub h64: u64,
    pub h128: u128,
}

impl std::fmt::Display for StateHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}/{:032x}", self.h64, self.h128)
    }
}

/// Computes state hashes.
pub struct StateHasher;

impl StateHasher {
    /// Recompute the hashes of a state from its content.
    ///
    /// Always equal to `state.hash()`; exposed for verification.
    #[must_use]
    pub fn compute(state: &GameState) -> StateHash {
        Self::compute_parts(state.len(), state.iter(), state.rng())
    }

    /// Hash `count` artifacts (in ascending id order) plus RNG position.
    pub fn compute_parts<'a>(
        count: usize,
        artifacts: impl Iterator<Item = (&'a ArtifactId, &'a ArtifactEntry)>,
        rng: Option<&GameRngState>,
    ) -> StateHash {
        let mut encoder = CanonicalEncoder::new(count);
        for (id, entry) in artifacts {
            encoder.artifact(*id, entry);
        }
        encoder.rng(rng.map(GameRngState::fingerprint).as_ref());

        Self::digest(encoder.as_bytes())
    }

    /// Hash raw canonical bytes.
    #[must_use]
    pub fn digest(bytes: &[u8]) -> StateHash {
        let mut hasher = Xxh3::new();
        hasher.update(bytes);
        StateHash {
            h64: hasher.digest(),
            h128: hasher.digest128(),
        }
    }
}
