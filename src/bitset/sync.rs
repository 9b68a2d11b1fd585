use super::{contract, storage::WordBuf, GrowableBitset};
use crate::{config::Config, error::FailurePolicy};
use parking_lot::Mutex;
use std::{borrow::Cow, fmt};

/// A growable bit vector that can be shared between threads.
///
/// Same growth rules as [GrowableBitset]. Capacity and words sit behind a single
/// [Mutex], and [test](Self::test), [set](Self::set) and [set_over](Self::set_over)
/// hold it for their whole duration, including any growth they trigger. So:
/// - a reader never sees a half-finished resize,
/// - two writers that both need a bigger buffer are serialized, and the second one
///   finds its index already fits if the first growth was enough,
/// - every completed set is visible to every later test, from any thread.
///
/// [test_unsync](Self::test_unsync) skips the lock; it needs `&mut self`, which is
/// how a caller proves no other thread is using the bitset at that point.
///
/// ```
/// use seen_bits::SyncBitset;
/// use std::{sync::Arc, thread};
///
/// let seen = Arc::new(SyncBitset::new(64));
///
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let seen = Arc::clone(&seen);
///         thread::spawn(move || {
///             for i in (t * 1000)..(t * 1000 + 1000) {
///                 seen.set(i);
///             }
///         })
///     })
///     .collect();
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert!((0..4000).all(|i| seen.test(i)));
/// ```
pub struct SyncBitset {
    buf: Mutex<WordBuf>,
    policy: FailurePolicy,
}

impl SyncBitset {
    /// Allocate enough words for at least `bits` bits.
    #[inline]
    pub fn new(bits: usize) -> Self {
        Config::new(bits).build_sync()
    }

    /// Like [SyncBitset::new], printing `errmsg` if an allocation ever fails.
    #[inline]
    pub fn with_errmsg(bits: usize, errmsg: impl Into<Cow<'static, str>>) -> Self {
        Config::new(bits).errmsg(errmsg).build_sync()
    }

    pub(crate) fn from_parts(buf: WordBuf, policy: FailurePolicy) -> Self {
        Self {
            buf: Mutex::new(buf),
            policy,
        }
    }

    /// Number of bits currently backed by storage.
    ///
    /// Another thread may grow it right after this returns.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.lock().capacity()
    }

    /// Test whether the given bit is set. Takes the lock.
    ///
    /// Bits past the capacity read as `false`.
    #[inline]
    pub fn test(&self, index: usize) -> bool {
        self.buf.lock().test(index)
    }

    /// Test whether the given bit is set without locking.
    ///
    /// The exclusive borrow guarantees that no other thread is inside
    /// any operation on this bitset.
    #[inline]
    pub fn test_unsync(&mut self, index: usize) -> bool {
        self.buf.get_mut().test(index)
    }

    /// Set a bit that hasn't been set before. Takes the lock.
    ///
    /// The bit must currently be 0; see [GrowableBitset::set].
    #[inline]
    pub fn set(&self, index: usize) {
        let mut buf = self.buf.lock();
        self.ensure(&mut buf, index);
        contract!(!buf.test(index), "bit {index} is already set");
        buf.insert(index);
    }

    /// Set a bit that might already be set. Takes the lock.
    #[inline]
    pub fn set_over(&self, index: usize) {
        let mut buf = self.buf.lock();
        self.ensure(&mut buf, index);
        buf.insert(index);
    }

    /// Count the number of 1's. Takes the lock.
    pub fn count_ones(&self) -> usize {
        self.buf.lock().count_ones()
    }

    /// Copy the current state into a [GrowableBitset] under the lock.
    pub fn snapshot(&self) -> GrowableBitset {
        let buf = self.buf.lock().clone();
        GrowableBitset::from_parts(buf, self.policy.clone())
    }

    /// Unwrap into a single-threaded bitset, keeping the failure settings.
    pub fn into_inner(self) -> GrowableBitset {
        GrowableBitset::from_parts(self.buf.into_inner(), self.policy)
    }

    /// Grow while the caller holds the lock.
    #[inline]
    fn ensure(&self, buf: &mut WordBuf, index: usize) {
        if index >= buf.capacity() {
            if let Err(err) = buf.ensure(index) {
                self.policy.fail(&err);
            }
        }
    }
}

impl From<GrowableBitset> for SyncBitset {
    fn from(bits: GrowableBitset) -> Self {
        let (buf, policy) = bits.into_parts();
        Self::from_parts(buf, policy)
    }
}

impl fmt::Debug for SyncBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SyncBitset({:?})", *self.buf.lock())
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    use super::SyncBitset;
    use rayon::iter::{IntoParallelIterator, ParallelExtend, ParallelIterator};

    /// Marks every index with [SyncBitset::set_over] from the rayon pool.
    impl ParallelExtend<usize> for SyncBitset {
        fn par_extend<I>(&mut self, par_iter: I)
        where
            I: IntoParallelIterator<Item = usize>,
        {
            let this = &*self;
            par_iter.into_par_iter().for_each(|index| this.set_over(index));
        }
    }
}
