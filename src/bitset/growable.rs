use super::{contract, storage::WordBuf, IterOnes};
use crate::{config::Config, error::FailurePolicy};
use std::{borrow::Cow, fmt};

/// A single-threaded bit vector that grows when a bit past its capacity is set.
///
/// Bits are stored in 32-bit words, bit `i` at word `i / 32`, position `i % 32`.
/// Capacity starts at `hint / 32 + 1` words and grows by 50% per step
/// (rounded up to 8 bits, then to a whole word) until the index fits.
/// It never shrinks.
///
/// Reading a bit past the capacity returns `false`.
///
/// If storage cannot be allocated the process is terminated, after printing the
/// diagnostic message given at construction (see [Config]).
///
/// ```
/// use seen_bits::GrowableBitset;
///
/// let mut seen = GrowableBitset::new(10);
/// assert_eq!(seen.capacity(), 32);
///
/// seen.set(100);
/// assert!(seen.test(100));
/// assert!(!seen.test(50));
/// assert!(seen.capacity() > 100);
/// ```
#[derive(Clone)]
pub struct GrowableBitset {
    buf: WordBuf,
    policy: FailurePolicy,
}

impl GrowableBitset {
    /// Allocate enough words for at least `bits` bits.
    #[inline]
    pub fn new(bits: usize) -> Self {
        Config::new(bits).build_growable()
    }

    /// Like [GrowableBitset::new], printing `errmsg` if an allocation ever fails.
    #[inline]
    pub fn with_errmsg(bits: usize, errmsg: impl Into<Cow<'static, str>>) -> Self {
        Config::new(bits).errmsg(errmsg).build_growable()
    }

    pub(crate) fn from_parts(buf: WordBuf, policy: FailurePolicy) -> Self {
        Self { buf, policy }
    }

    pub(crate) fn into_parts(self) -> (WordBuf, FailurePolicy) {
        (self.buf, self.policy)
    }

    /// Number of bits currently backed by storage. Always a multiple of 32.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Get the bit at the given index.
    ///
    /// If the bit index is out of range, it will return `false`.
    #[inline]
    pub fn test(&self, index: usize) -> bool {
        self.buf.test(index)
    }

    /// Set a bit that hasn't been set before, growing the storage if needed.
    ///
    /// The bit must currently be 0. This is asserted when
    /// [CONTRACT_CHECKS](super::CONTRACT_CHECKS) is on; otherwise setting an
    /// already set bit is the same as [GrowableBitset::set_over].
    #[inline]
    pub fn set(&mut self, index: usize) {
        self.ensure(index);
        contract!(!self.buf.test(index), "bit {index} is already set");
        self.buf.insert(index);
    }

    /// Set a bit that might already be set, growing the storage if needed.
    #[inline]
    pub fn set_over(&mut self, index: usize) {
        self.ensure(index);
        self.buf.insert(index);
    }

    /// Count the number of 1's in the bit vector.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.buf.count_ones()
    }

    /// Check if no bit is set.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.buf.is_zero()
    }

    /// Iterate over bits and return the bit index of each `true` bit.
    #[inline]
    pub fn iter_ones(&self) -> IterOnes<'_> {
        IterOnes::new(self.buf.words(), usize::MAX)
    }

    #[inline]
    fn ensure(&mut self, index: usize) {
        if index >= self.buf.capacity() {
            if let Err(err) = self.buf.ensure(index) {
                self.policy.fail(&err);
            }
        }
    }
}

impl Extend<usize> for GrowableBitset {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.set_over(index);
        }
    }
}

impl FromIterator<usize> for GrowableBitset {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bits = Self::new(iter.size_hint().0);
        bits.extend(iter);
        bits
    }
}

impl fmt::Debug for GrowableBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrowableBitset({:?})", self.buf)
    }
}
