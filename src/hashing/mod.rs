//! Deterministic state hashing.
//!
//! Every `GameState` carries a 64-bit and a 128-bit hash computed over a
//! canonical byte encoding of its artifacts (ordered by artifact id) and,
//! when present, a fingerprint of its RNG position.
//!
//! The hashes are pure functions of that input: no process-level seeds,
//! no pointer values, no iteration order other than artifact id order.
//!
//! ## Key Components
//!
//! - [`CanonicalEncoder`]: the byte layout that is hashed
//! - [`StateHasher`]: xxh3 64/128 over the encoding
//! - [`StateHash`]: the pair of hashes

mod encoder;
mod hasher;

pub use encoder::CanonicalEncoder;
pub use hasher::{StateHash, StateHasher};
