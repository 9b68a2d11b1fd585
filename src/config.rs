//! Construction options shared by the growable bitsets.

use crate::{
    bitset::{storage::WordBuf, GrowableBitset, SyncBitset},
    error::{FailureHook, FailurePolicy},
};
use std::borrow::Cow;

/// Builder for [GrowableBitset] and [SyncBitset].
///
/// ```
/// use seen_bits::Config;
///
/// let mut seen = Config::new(1_000)
///     .errmsg("could not allocate the seen-read bitset\n")
///     .build_growable();
///
/// seen.set(12);
/// assert!(seen.test(12));
/// assert!(seen.capacity() >= 1_000);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    initial_bits: usize,
    policy: FailurePolicy,
}

impl Config {
    /// Start with room for at least `initial_bits` bits.
    ///
    /// The storage is always rounded up to a whole number of 32-bit words, with
    /// one extra word when `initial_bits` is already a multiple of 32.
    pub fn new(initial_bits: usize) -> Self {
        Self {
            initial_bits,
            policy: FailurePolicy::default(),
        }
    }

    /// Message written to stderr if the storage can ever not be allocated.
    pub fn errmsg(mut self, errmsg: impl Into<Cow<'static, str>>) -> Self {
        self.policy = self.policy.with_errmsg(errmsg.into());
        self
    }

    /// Replace [default_failure_hook](crate::error::default_failure_hook), which exits the process.
    pub fn failure_hook(mut self, hook: FailureHook) -> Self {
        self.policy = self.policy.with_hook(hook);
        self
    }

    #[inline]
    pub fn initial_bits(&self) -> usize {
        self.initial_bits
    }

    pub fn build_growable(self) -> GrowableBitset {
        let buf = self.alloc();
        GrowableBitset::from_parts(buf, self.policy)
    }

    pub fn build_sync(self) -> SyncBitset {
        let buf = self.alloc();
        SyncBitset::from_parts(buf, self.policy)
    }

    fn alloc(&self) -> WordBuf {
        let buf = WordBuf::with_hint(self.initial_bits).unwrap_or_else(|err| self.policy.fail(&err));
        tracing::debug!(
            hint = self.initial_bits,
            capacity = buf.capacity(),
            "allocated bitset storage"
        );
        buf
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}
