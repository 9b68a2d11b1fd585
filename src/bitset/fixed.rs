use super::{
    contract,
    word::{locate, words_for_bits, Word, BITS},
    IterOnes,
};
use paste::paste;
use std::fmt;

/// A fixed-capacity bitset for compact per-record state.
///
/// `N` is the number of addressable bits and `W` the number of 32-bit words
/// backing them; `W` must be [words_for_bits]`(N)` and `N` must be non-zero,
/// otherwise the first use of the type fails to compile. The `FixedBitsetN`
/// aliases fill in `W` for common sizes.
///
/// Besides the bits it keeps two counters:
/// - [count](Self::count): how many set operations were performed,
/// - [size](Self::size): one past the highest index ever set.
///
/// [clear](Self::clear) only zeroes the bits and keeps both counters, so after
/// clearing and setting again `count` no longer equals the number of 1's.
/// Use [reset](Self::reset) to start over completely.
///
/// Indexing at or past `N` panics.
///
/// ```
/// use seen_bits::FixedBitset8;
///
/// let mut bits = FixedBitset8::new();
/// bits.set(3);
/// bits.set(7);
///
/// assert_eq!(bits.count(), 2);
/// assert_eq!(bits.size(), 8);
/// assert_eq!(bits.to_string(), "10001000");
/// ```
#[derive(Clone, Copy)]
pub struct FixedBitset<const N: usize, const W: usize> {
    count: usize,
    size: usize,
    words: [Word; W],
}

impl<const N: usize, const W: usize> FixedBitset<N, W> {
    /// Number of addressable bits.
    pub const CAPACITY: usize = N;

    const VALID: () = assert!(
        N > 0 && W == words_for_bits(N),
        "FixedBitset<N, W> needs N > 0 and W == words_for_bits(N)"
    );

    /// All bits 0, both counters 0.
    #[inline]
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self {
            count: 0,
            size: 0,
            words: [0; W],
        }
    }

    /// Unset all bits. `count` and `size` are left as they are.
    #[inline]
    pub fn clear(&mut self) {
        self.words = [0; W];
    }

    /// Unset all bits and zero `count` and `size`.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Return `true` iff the bit at `index` is set.
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn test(&self, index: usize) -> bool {
        let (i, mask) = Self::locate(index);
        self.words[i] & mask != 0
    }

    /// Set the bit at `index`, which must not already be set.
    ///
    /// Panics if `index >= N`. The "not already set" part is only asserted when
    /// [CONTRACT_CHECKS](super::CONTRACT_CHECKS) is on.
    #[inline]
    pub fn set(&mut self, index: usize) {
        let (i, mask) = Self::locate(index);
        contract!(self.words[i] & mask == 0, "bit {index} is already set");
        self.mark(i, mask, index);
    }

    /// Set the bit at `index`, whether or not it was already set.
    ///
    /// Panics if `index >= N`. Counts as a set operation either way.
    #[inline]
    pub fn set_over(&mut self, index: usize) {
        let (i, mask) = Self::locate(index);
        self.mark(i, mask, index);
    }

    /// Number of set operations performed since construction or the last [reset](Self::reset).
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// One past the highest index ever set.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of bits currently 1.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Indices of the set bits below [size](Self::size), ascending.
    #[inline]
    pub fn iter_ones(&self) -> IterOnes<'_> {
        IterOnes::new(&self.words, self.size)
    }

    #[inline]
    pub fn words(&self) -> &[Word; W] {
        &self.words
    }

    #[inline(always)]
    fn locate(index: usize) -> (usize, Word) {
        assert!(
            index < N,
            "bit index {index} out of range for FixedBitset of {N} bits"
        );
        locate(index)
    }

    #[inline(always)]
    fn mark(&mut self, i: usize, mask: Word, index: usize) {
        self.words[i] |= mask;
        self.count += 1;
        if index >= self.size {
            self.size = index + 1;
        }
    }
}

impl<const N: usize, const W: usize> Default for FixedBitset<N, W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares the bits only; `count` and `size` are ignored.
impl<const N: usize, const W: usize> PartialEq for FixedBitset<N, W> {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words
    }
}

impl<const N: usize, const W: usize> Eq for FixedBitset<N, W> {}

/// Bits from `size() - 1` down to 0 as '1'/'0'. Empty when nothing was ever set.
impl<const N: usize, const W: usize> fmt::Display for FixedBitset<N, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in (0..self.size).rev() {
            f.write_str(if self.test(index) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl<const N: usize, const W: usize> fmt::Debug for FixedBitset<N, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedBitset<{N}>(")?;
        for word in self.words.iter().rev() {
            write!(f, "{word:0>BITS$b}")?;
        }
        write!(f, ", count: {}, size: {})", self.count, self.size)
    }
}

macro_rules! impl_fixed_aliases {
    ($($bits:literal),+ $(,)?) => {
        paste! {
            $(
                #[doc = "A [FixedBitset] of " $bits " bits."]
                pub type [<FixedBitset $bits>] = FixedBitset<$bits, { words_for_bits($bits) }>;
            )+
        }
    };
}

impl_fixed_aliases!(8, 16, 32, 64, 128, 256, 512, 1024);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_count_size_and_string() {
        let mut bits = FixedBitset8::new();
        bits.set(3);
        bits.set(7);

        assert_eq!(bits.count(), 2);
        assert_eq!(bits.size(), 8);
        assert_eq!(bits.to_string(), "10001000");
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), vec![3, 7]);
    }

    #[test]
    fn test_empty() {
        let bits = FixedBitset64::default();
        assert_eq!(bits.to_string(), "");
        assert_eq!(bits.count(), 0);
        assert_eq!(bits.size(), 0);
        assert!(bits.is_zero());
        assert_eq!(bits.iter_ones().next(), None);
    }

    #[test]
    fn test_size_is_high_water_mark() {
        let mut bits = FixedBitset128::new();
        bits.set(100);
        bits.set(2);
        assert_eq!(bits.size(), 101);

        let s = bits.to_string();
        assert_eq!(s.len(), 101);
        assert!(s.starts_with('1'));
        assert!(s.ends_with("100"));
        assert_eq!(s.matches('1').count(), 2);
    }

    #[test]
    fn test_set_over_counts_every_call() {
        let mut bits = FixedBitset16::new();
        bits.set_over(4);
        bits.set_over(4);
        bits.set_over(1);

        assert_eq!(bits.count(), 3);
        assert_eq!(bits.count_ones(), 2);
        assert_eq!(bits.size(), 5);
    }

    #[test]
    fn test_clear_keeps_counters() {
        let mut bits = FixedBitset32::new();
        bits.set(10);
        bits.set(20);
        bits.clear();

        assert!(bits.is_zero());
        assert!(!bits.test(10));
        assert_eq!(bits.count(), 2);
        assert_eq!(bits.size(), 21);

        // count now overshoots the population
        bits.set(10);
        assert_eq!(bits.count(), 3);
        assert_eq!(bits.count_ones(), 1);
        assert_eq!(bits.to_string(), "000000000010000000000");
    }

    #[test]
    fn test_reset() {
        let mut bits = FixedBitset32::new();
        bits.set(10);
        bits.reset();

        assert_eq!(bits.count(), 0);
        assert_eq!(bits.size(), 0);
        assert!(bits.is_zero());
        bits.set(10);
        assert_eq!(bits.count(), 1);
    }

    #[test]
    fn test_equality() {
        let mut a = FixedBitset64::new();
        let mut b = FixedBitset64::new();
        for i in [0, 31, 32, 63] {
            a.set(i);
            b.set(i);
        }
        assert_eq!(a, b);

        b.set(5);
        assert_ne!(a, b);
        a.set(5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_ignores_counters() {
        let mut a = FixedBitset8::new();
        let mut b = FixedBitset8::new();
        a.set(2);
        b.set_over(2);
        b.set_over(2);
        assert_eq!(a, b);

        b.set(6);
        b.clear();
        a.clear();
        assert_eq!(a, b);
        assert_ne!(a.size(), b.size());
    }

    #[test]
    fn test_word_boundaries() {
        let mut bits = FixedBitset::<33, 2>::new();
        bits.set(31);
        bits.set(32);
        assert_eq!(bits.words(), &[1u32 << 31, 1]);
        assert!(bits.test(32));
        assert_eq!(FixedBitset::<33, 2>::CAPACITY, 33);
    }

    #[test]
    #[should_panic(expected = "bit index 8 out of range")]
    fn test_test_at_capacity_panics() {
        let bits = FixedBitset8::new();
        bits.test(8);
    }

    #[test]
    #[should_panic(expected = "bit index 8 out of range")]
    fn test_set_at_capacity_panics() {
        let mut bits = FixedBitset8::new();
        bits.set(8);
    }

    #[test]
    #[should_panic(expected = "bit index 1024 out of range")]
    fn test_set_over_at_capacity_panics() {
        let mut bits = FixedBitset1024::new();
        bits.set_over(1024);
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict"))]
    #[should_panic(expected = "bit 3 is already set")]
    fn test_strict_set_twice_panics() {
        let mut bits = FixedBitset8::new();
        bits.set(3);
        bits.set(3);
    }

    #[test]
    #[cfg(not(any(debug_assertions, feature = "strict")))]
    fn test_strict_set_twice_unchecked() {
        let mut bits = FixedBitset8::new();
        bits.set(3);
        bits.set(3);
        assert_eq!(bits.count(), 2);
        assert_eq!(bits.to_string(), "1000");
    }

    #[test]
    fn test_debug() {
        let mut bits = FixedBitset8::new();
        bits.set(0);
        assert_eq!(
            format!("{bits:?}"),
            "FixedBitset<8>(00000000000000000000000000000001, count: 1, size: 1)"
        );
    }

    proptest! {
        #[test]
        fn equal_iff_same_bits(
            a in prop::collection::btree_set(0usize..256, 0..40),
            b in prop::collection::btree_set(0usize..256, 0..40),
        ) {
            let mut x = FixedBitset256::new();
            let mut y = FixedBitset256::new();
            a.iter().for_each(|&i| x.set(i));
            b.iter().for_each(|&i| y.set(i));

            prop_assert_eq!(x == y, a == b);
            prop_assert_eq!(x != y, a != b);
            prop_assert_eq!(x.count(), a.len());
            prop_assert_eq!(x.size(), a.iter().next_back().map_or(0, |&m| m + 1));
        }

        #[test]
        fn string_matches_bits(indices in prop::collection::vec(0usize..64, 0..20)) {
            let mut bits = FixedBitset64::new();
            indices.iter().for_each(|&i| bits.set_over(i));

            let s = bits.to_string();
            prop_assert_eq!(s.len(), bits.size());
            for (pos, c) in s.chars().enumerate() {
                let index = bits.size() - 1 - pos;
                prop_assert_eq!(c == '1', indices.contains(&index));
            }
        }
    }
}
