//! bitset implementations.
//!
//! - [GrowableBitset]: single-threaded, grows by 50% when a bit past its capacity is set.
//! - [SyncBitset]: same growth rules, every operation serialized by one mutex.
//! - [FixedBitset]: compile-time capacity, tracks set count and high-water mark.

/// Whether the "bit must not already be set" precondition of the strict `set`
/// operations is asserted.
///
/// On in debug builds and whenever the `strict` feature is enabled.
/// When off, a strict `set` on an already set bit behaves like `set_over`.
pub const CONTRACT_CHECKS: bool = cfg!(any(debug_assertions, feature = "strict"));

macro_rules! contract {
    ($cond:expr, $($arg:tt)+) => {
        if $crate::bitset::CONTRACT_CHECKS {
            assert!($cond, $($arg)+);
        }
    };
}
pub(crate) use contract;

mod fixed;
pub use fixed::{
    FixedBitset, FixedBitset1024, FixedBitset128, FixedBitset16, FixedBitset256, FixedBitset32,
    FixedBitset512, FixedBitset64, FixedBitset8,
};

mod growable;
pub use growable::GrowableBitset;

pub(crate) mod storage;
pub use storage::IterOnes;

mod sync;
pub use sync::SyncBitset;

pub use word::{words_for_bits, Word, BITS};

mod word {
    /// Storage granularity of every bitset in this crate.
    pub type Word = u32;

    pub const BITS: usize = Word::BITS as usize;

    /// Number of words needed to hold `bits` bits.
    #[inline]
    pub const fn words_for_bits(bits: usize) -> usize {
        (bits + BITS - 1) / BITS
    }

    /// Word index and in-word mask of a bit index.
    #[inline(always)]
    pub(crate) const fn locate(index: usize) -> (usize, Word) {
        (index / BITS, 1 << (index % BITS))
    }

}
