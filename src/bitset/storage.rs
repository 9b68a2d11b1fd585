use super::word::{locate, Word, BITS};
use crate::error::{AllocError, Result};
use std::fmt;

/// Owned word storage of the growable bitsets.
///
/// Capacity is always `words.len() * BITS` bits, at least one word, and never shrinks.
/// Every fallible step goes through `try_reserve_exact` so allocation failures can be
/// reported through the owner's failure hook instead of aborting inside the allocator.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct WordBuf {
    words: Vec<Word>,
}

impl WordBuf {
    /// Allocate `hint / 32 + 1` zeroed words.
    pub(crate) fn with_hint(hint: usize) -> Result<Self> {
        let len = hint / BITS + 1;
        let bits = len
            .checked_mul(BITS)
            .ok_or(AllocError::CapacityOverflow { index: hint })?;

        let mut words = Vec::new();
        words
            .try_reserve_exact(len)
            .map_err(|source| AllocError::Reserve { bits, source })?;
        words.resize(len, 0);

        Ok(Self { words })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.words.len() * BITS
    }

    #[inline]
    pub(crate) fn words(&self) -> &[Word] {
        &self.words
    }

    /// Bits past the capacity read as `false`.
    #[inline]
    pub(crate) fn test(&self, index: usize) -> bool {
        let (i, mask) = locate(index);
        match self.words.get(i) {
            Some(word) => word & mask != 0,
            None => false,
        }
    }

    /// Set a bit that is known to be within capacity.
    #[inline]
    pub(crate) fn insert(&mut self, index: usize) {
        let (i, mask) = locate(index);
        self.words[i] |= mask;
    }

    /// Grow until `index` fits. No-op when it already does.
    ///
    /// Old words are kept as they are and the new words are zeroed.
    pub(crate) fn ensure(&mut self, index: usize) -> Result<()> {
        let old_bits = self.capacity();
        if index < old_bits {
            return Ok(());
        }

        let (new_bits, steps) = grow_to_fit(old_bits, index)?;
        let new_len = new_bits / BITS;

        self.words
            .try_reserve_exact(new_len - self.words.len())
            .map_err(|source| AllocError::Reserve {
                bits: new_bits,
                source,
            })?;
        self.words.resize(new_len, 0);

        tracing::trace!(old_bits, new_bits, steps, index, "grew bitset storage");
        Ok(())
    }

    pub(crate) fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

impl fmt::Debug for WordBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.words.iter().rev() {
            write!(f, "{word:0>BITS$b}")?;
        }
        Ok(())
    }
}

/// One growth step: add 50%, round up to a multiple of 8, then to a whole word.
///
/// Always strictly greater than `bits`; `None` on overflow.
#[inline]
pub(crate) fn next_capacity(bits: usize) -> Option<usize> {
    let grown = bits.checked_add((bits / 2).max(1))?;
    let grown = round_up(grown, 8)?;
    round_up(grown, BITS)
}

/// Apply [next_capacity] until `index` fits.
/// Returns the final capacity and the number of steps taken.
pub(crate) fn grow_to_fit(mut bits: usize, index: usize) -> Result<(usize, usize)> {
    let mut steps = 0;
    while index >= bits {
        let next = next_capacity(bits).ok_or(AllocError::CapacityOverflow { index })?;
        debug_assert!(next > bits);
        bits = next;
        steps += 1;
    }
    Ok((bits, steps))
}

#[inline]
fn round_up(n: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    Some(n.checked_add(align - 1)? & !(align - 1))
}

/// Iterates over each word of a bitset,
/// and then over each set bit in the word, in ascending order.
///
/// Stops at the first index at or past its limit.
pub struct IterOnes<'a> {
    words: &'a [Word],
    array_index: usize,
    current: Word,
    limit: usize,
}

impl<'a> IterOnes<'a> {
    pub(crate) fn new(words: &'a [Word], limit: usize) -> Self {
        Self {
            words,
            array_index: 0,
            current: words.first().copied().unwrap_or(0),
            limit,
        }
    }
}

impl<'a> Iterator for IterOnes<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current == 0 {
            self.array_index += 1;
            if self.array_index >= self.words.len() {
                return None;
            }
            self.current = self.words[self.array_index];
        }

        let trailing_zeros = self.current.trailing_zeros();
        self.current &= !(1 << trailing_zeros);

        let index = self.array_index * BITS + trailing_zeros as usize;
        if index >= self.limit {
            // everything after this is past the limit too
            self.current = 0;
            self.array_index = self.words.len();
            return None;
        }
        Some(index)
    }
}
