//! Bitsets for marking which indices have been seen or processed.
//!
//! Three containers, chosen by concurrency and sizing needs:
//!
//! - [GrowableBitset]: single-threaded, grows by 50% whenever a bit past its capacity is set.
//! - [SyncBitset]: same growth, every operation serialized by one mutex so it can be shared
//!   between threads.
//! - [FixedBitset]: capacity fixed at compile time, tracks how many sets were performed and the
//!   highest index set, compares by value and renders as a string of '1'/'0'.
//!
//! All of them store bit `i` in 32-bit word `i / 32` at position `i % 32`.
//!
//! The growable bitsets never report allocation failure to the caller. Storage that cannot be
//! allocated prints the diagnostic message given at construction and terminates the process;
//! see [Config] and [error].
//!
//! # Features
//!
//! - `parallel` (default): [SyncBitset] implements rayon's `ParallelExtend<usize>`.
//! - `strict`: assert the "bit is not already set" precondition of the strict `set`
//!   operations in release builds too. It is always asserted in debug builds.
//!
//! # Example
//!
//! ```
//! use seen_bits::{FixedBitset16, GrowableBitset, SyncBitset};
//!
//! let mut seen = GrowableBitset::new(10);
//! seen.set(100);
//! assert!(seen.test(100));
//!
//! let shared = SyncBitset::new(10);
//! shared.set_over(7);
//! shared.set_over(7);
//! assert!(shared.test(7));
//!
//! let mut record = FixedBitset16::new();
//! record.set(0);
//! record.set(2);
//! assert_eq!(record.to_string(), "101");
//! ```

pub mod bitset;
pub use bitset::{
    FixedBitset, FixedBitset1024, FixedBitset128, FixedBitset16, FixedBitset256, FixedBitset32,
    FixedBitset512, FixedBitset64, FixedBitset8, GrowableBitset, SyncBitset,
};

pub mod config;
pub use config::Config;

pub mod error;
pub use error::{AllocError, FailureHook};
