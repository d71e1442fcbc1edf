//! Canonical byte encoding of state content.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! header     : b"BGS" version:u8
//! count      : u32
//! artifact*  : id:u32 kind:u32 state_type:u16 payload
//! rng        : 0:u8 | 1:u8 seed:u64 word_pos:u128 peek:u64
//! ```
//!
//! Payloads: `PieceOnTile` tile:u32, `Captured` nothing, `Value` i64,
//! `Flag` u8, `Values` len:u32 i64*.

use crate::core::{ArtifactEntry, ArtifactId, ArtifactState, RngFingerprint};

const HEADER: &[u8; 3] = b"BGS";
const VERSION: u8 = 1;

/// Writes the canonical encoding into a reusable buffer.
#[derive(Debug, Default)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    /// Create an encoder and write the header and artifact count.
    #[must_use]
    pub fn new(artifact_count: usize) -> Self {
        let mut encoder = Self {
            buf: Vec::with_capacity(16 + artifact_count * 16),
        };
        encoder.buf.extend_from_slice(HEADER);
        encoder.buf.push(VERSION);
        encoder.write_u32(artifact_count as u32);
        encoder
    }

    /// Append one artifact.
    pub fn artifact(&mut self, id: ArtifactId, entry: &ArtifactEntry) {
        self.write_u32(id.raw());
        self.write_u32(entry.kind.tag());
        self.write_u16(entry.state.state_type());

        match &entry.state {
            ArtifactState::PieceOnTile { tile } => self.write_u32(tile.raw()),
            ArtifactState::Captured => {}
            ArtifactState::Value(value) => self.write_i64(*value),
            ArtifactState::Flag(flag) => self.buf.push(u8::from(*flag)),
            ArtifactState::Values(values) => {
                self.write_u32(values.len() as u32);
                for value in values {
                    self.write_i64(*value);
                }
            }
        }
    }

    /// Append the RNG section. Must be called exactly once, last.
    pub fn rng(&mut self, fingerprint: Option<&RngFingerprint>) {
        match fingerprint {
            None => self.buf.push(0),
            Some(fp) => {
                self.buf.push(1);
                self.buf.extend_from_slice(&fp.seed.to_le_bytes());
                self.buf.extend_from_slice(&fp.word_pos.to_le_bytes());
                self.buf.extend_from_slice(&fp.peek.to_le_bytes());
            }
        }
    }

    /// The encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }
}
