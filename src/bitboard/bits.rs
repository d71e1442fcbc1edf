//! Dense and segmented bitsets with value semantics.
//!
//! All operations are pure: `with_set` and `with_cleared` return a new value
//! and leave the receiver untouched.

use std::ops::{BitAnd, BitOr};

use smallvec::{smallvec, SmallVec};

/// Bits per word.
const WORD_BITS: usize = 64;

/// Single-word bitboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    /// All bits zero.
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Number of addressable bits.
    pub const CAPACITY: usize = WORD_BITS;

    /// Test whether `bit` is set. Out-of-range bits read as unset.
    #[inline]
    #[must_use]
    pub const fn test(self, bit: usize) -> bool {
        bit < WORD_BITS && (self.0 >> bit) & 1 != 0
    }

    /// Copy with `bit` set. Out-of-range bits leave the value unchanged.
    #[inline]
    #[must_use]
    pub const fn with_set(self, bit: usize) -> Self {
        if bit >= WORD_BITS {
            return self;
        }
        Bitboard(self.0 | (1u64 << bit))
    }

    /// Copy with `bit` cleared. Out-of-range bits leave the value unchanged.
    #[inline]
    #[must_use]
    pub const fn with_cleared(self, bit: usize) -> Self {
        if bit >= WORD_BITS {
            return self;
        }
        Bitboard(self.0 & !(1u64 << bit))
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn pop_count(self) -> u32 {
        self.0.count_ones()
    }

    /// True if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate set bits in ascending order.
    pub fn iter(self) -> Ones {
        Ones(self.0)
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

/// Iterator over the set bits of one word.
#[derive(Clone, Debug)]
pub struct Ones(u64);

impl Iterator for Ones {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(bit)
    }
}

/// Multi-word bitboard. Segment `i` holds bits `64*i .. 64*i+63`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SegmentedBitboard {
    segments: SmallVec<[u64; 4]>,
}

impl SegmentedBitboard {
    /// Empty bitboard able to hold `bit_count` bits.
    #[must_use]
    pub fn with_capacity(bit_count: usize) -> Self {
        let words = bit_count.div_ceil(WORD_BITS).max(1);
        Self {
            segments: smallvec![0; words],
        }
    }

    /// Number of `u64` segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The raw segments, lowest bits first.
    #[must_use]
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Test whether `bit` is set. Out-of-range bits read as unset.
    #[inline]
    #[must_use]
    pub fn test(&self, bit: usize) -> bool {
        self.segments
            .get(bit / WORD_BITS)
            .is_some_and(|word| (word >> (bit % WORD_BITS)) & 1 != 0)
    }

    /// Copy with `bit` set. Out-of-range bits leave the value unchanged.
    #[must_use]
    pub fn with_set(&self, bit: usize) -> Self {
        let mut next = self.clone();
        if let Some(word) = next.segments.get_mut(bit / WORD_BITS) {
            *word |= 1u64 << (bit % WORD_BITS);
        }
        next
    }

    /// Copy with `bit` cleared. Out-of-range bits leave the value unchanged.
    #[must_use]
    pub fn with_cleared(&self, bit: usize) -> Self {
        let mut next = self.clone();
        if let Some(word) = next.segments.get_mut(bit / WORD_BITS) {
            *word &= !(1u64 << (bit % WORD_BITS));
        }
        next
    }

    /// Number of set bits across all segments.
    #[must_use]
    pub fn pop_count(&self) -> u32 {
        self.segments.iter().map(|w| w.count_ones()).sum()
    }

    /// True if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|&w| w == 0)
    }

    /// Iterate set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        iter_words(&self.segments)
    }

    fn zip_with(&self, other: &Self, op: impl Fn(u64, u64) -> u64) -> Self {
        let len = self.segments.len().max(other.segments.len());
        let word = |s: &Self, i: usize| s.segments.get(i).copied().unwrap_or(0);
        Self {
            segments: (0..len).map(|i| op(word(self, i), word(other, i))).collect(),
        }
    }
}

impl BitAnd for &SegmentedBitboard {
    type Output = SegmentedBitboard;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a & b)
    }
}

impl BitOr for &SegmentedBitboard {
    type Output = SegmentedBitboard;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a | b)
    }
}

fn iter_words(words: &[u64]) -> impl Iterator<Item = usize> + '_ {
    words
        .iter()
        .enumerate()
        .flat_map(|(i, &word)| Ones(word).map(move |bit| i * WORD_BITS + bit))
}

/// Representation-transparent bitset for tile or piece occupancy.
///
/// Boards of at most 64 bits use a single word; larger ones use segments.
/// Both answer `test`/`with_set`/`with_cleared`/`pop_count` identically.
///
/// ```
/// use rust_bge::bitboard::BoardBits;
///
/// for size in [16, 200] {
///     let bits = BoardBits::empty(size).with_set(3).with_set(size - 1);
///     assert!(bits.test(3));
///     assert_eq!(bits.pop_count(), 2);
///     assert!(!bits.with_cleared(3).test(3));
///     assert!(bits.test(3)); // unchanged
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BoardBits {
    Dense(Bitboard),
    Segmented(SegmentedBitboard),
}

impl BoardBits {
    /// Empty bitset sized for `bit_count` bits.
    #[must_use]
    pub fn empty(bit_count: usize) -> Self {
        if bit_count <= Bitboard::CAPACITY {
            BoardBits::Dense(Bitboard::EMPTY)
        } else {
            BoardBits::Segmented(SegmentedBitboard::with_capacity(bit_count))
        }
    }

    /// Test whether `bit` is set.
    #[inline]
    #[must_use]
    pub fn test(&self, bit: usize) -> bool {
        match self {
            BoardBits::Dense(bb) => bb.test(bit),
            BoardBits::Segmented(sb) => sb.test(bit),
        }
    }

    /// Copy with `bit` set.
    #[must_use]
    pub fn with_set(&self, bit: usize) -> Self {
        match self {
            BoardBits::Dense(bb) => BoardBits::Dense(bb.with_set(bit)),
            BoardBits::Segmented(sb) => BoardBits::Segmented(sb.with_set(bit)),
        }
    }

    /// Copy with `bit` cleared.
    #[must_use]
    pub fn with_cleared(&self, bit: usize) -> Self {
        match self {
            BoardBits::Dense(bb) => BoardBits::Dense(bb.with_cleared(bit)),
            BoardBits::Segmented(sb) => BoardBits::Segmented(sb.with_cleared(bit)),
        }
    }

    /// Number of set bits.
    #[must_use]
    pub fn pop_count(&self) -> u32 {
        match self {
            BoardBits::Dense(bb) => bb.pop_count(),
            BoardBits::Segmented(sb) => sb.pop_count(),
        }
    }

    /// True if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            BoardBits::Dense(bb) => bb.is_empty(),
            BoardBits::Segmented(sb) => sb.is_empty(),
        }
    }

    /// True if any bit is set in both.
    #[must_use]
    pub fn intersects(&self, other: &BoardBits) -> bool {
        self.words()
            .iter()
            .zip(other.words())
            .any(|(a, b)| a & b != 0)
    }

    /// The raw words, lowest bits first.
    #[must_use]
    pub fn words(&self) -> &[u64] {
        match self {
            BoardBits::Dense(bb) => std::slice::from_ref(&bb.0),
            BoardBits::Segmented(sb) => sb.segments(),
        }
    }

    /// Iterate set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        iter_words(self.words())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitboard_pure_operations() {
        let empty = Bitboard::EMPTY;
        let one = empty.with_set(5);

        assert!(!empty.test(5));
        assert!(one.test(5));
        assert!(!one.with_cleared(5).test(5));
        assert!(one.test(5));
        assert_eq!(one.with_set(63).pop_count(), 2);
        assert!(!one.test(64));
    }

    #[test]
    fn test_bitboard_iter() {
        let bb = Bitboard::EMPTY.with_set(0).with_set(9).with_set(63);
        assert_eq!(bb.iter().collect::<Vec<_>>(), vec![0, 9, 63]);
    }

    #[test]
    fn test_bitboard_ops() {
        let a = Bitboard(0b1100);
        let b = Bitboard(0b1010);
        assert_eq!(a & b, Bitboard(0b1000));
        assert_eq!(a | b, Bitboard(0b1110));
    }

    #[test]
    fn test_segmented_capacity() {
        assert_eq!(SegmentedBitboard::with_capacity(64).segment_count(), 1);
        assert_eq!(SegmentedBitboard::with_capacity(65).segment_count(), 2);
        assert_eq!(SegmentedBitboard::with_capacity(128).segment_count(), 2);
        assert_eq!(SegmentedBitboard::with_capacity(0).segment_count(), 1);
    }

    #[test]
    fn test_segmented_crosses_word_boundary() {
        let sb = SegmentedBitboard::with_capacity(130)
            .with_set(63)
            .with_set(64)
            .with_set(129);

        assert!(sb.test(63));
        assert!(sb.test(64));
        assert!(sb.test(129));
        assert!(!sb.test(65));
        assert!(!sb.test(1000));
        assert_eq!(sb.pop_count(), 3);
        assert_eq!(sb.iter().collect::<Vec<_>>(), vec![63, 64, 129]);
    }

    #[test]
    fn test_segmented_ops() {
        let a = SegmentedBitboard::with_capacity(128).with_set(1).with_set(100);
        let b = SegmentedBitboard::with_capacity(128).with_set(100).with_set(101);

        assert_eq!((&a & &b).iter().collect::<Vec<_>>(), vec![100]);
        assert_eq!((&a | &b).pop_count(), 3);
    }

    #[test]
    fn test_board_bits_representation() {
        assert!(matches!(BoardBits::empty(64), BoardBits::Dense(_)));
        assert!(matches!(BoardBits::empty(65), BoardBits::Segmented(_)));
    }

    #[test]
    fn test_out_of_range_bits_ignored_by_both_representations() {
        let dense = BoardBits::empty(10).with_set(2);
        let segmented = BoardBits::empty(100).with_set(2);

        for bit in [200, 1000, usize::MAX] {
            let d = dense.with_set(bit);
            let s = segmented.with_set(bit);
            assert_eq!(d, dense, "bit {}", bit);
            assert_eq!(s, segmented, "bit {}", bit);
            assert!(!d.test(bit));
            assert!(!s.test(bit));
            assert_eq!(d.pop_count(), s.pop_count());
            assert_eq!(d.with_cleared(bit).pop_count(), s.with_cleared(bit).pop_count());
        }

        // Past one word, the dense form must not wrap onto a low tile.
        let wrapped = BoardBits::empty(10).with_set(70);
        assert!(!wrapped.test(70));
        assert!(!wrapped.test(6));
        assert_eq!(wrapped.pop_count(), 0);
        assert_eq!(Bitboard::EMPTY.with_set(64), Bitboard::EMPTY);
        assert_eq!(Bitboard(1).with_cleared(64), Bitboard(1));
    }

    #[test]
    fn test_board_bits_same_semantics_both_representations() {
        let bits = [3usize, 17, 40, 63];

        let dense = bits.iter().fold(BoardBits::empty(64), |b, &i| b.with_set(i));
        let segmented = bits.iter().fold(BoardBits::empty(256), |b, &i| b.with_set(i));

        for i in 0..64 {
            assert_eq!(dense.test(i), segmented.test(i), "bit {}", i);
        }
        assert_eq!(dense.pop_count(), segmented.pop_count());
        assert_eq!(dense.iter().collect::<Vec<_>>(), segmented.iter().collect::<Vec<_>>());
        assert_eq!(
            dense.with_cleared(17).pop_count(),
            segmented.with_cleared(17).pop_count()
        );
    }

    #[test]
    fn test_intersects() {
        let a = BoardBits::empty(200).with_set(150);
        let b = BoardBits::empty(200).with_set(150).with_set(2);
        let c = BoardBits::empty(200).with_set(2);

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
