//! Allocation failure reporting.
//!
//! Bitsets in this crate never hand an allocation error back to their caller.
//! Storage routines describe what went wrong with an [AllocError], and the owning
//! bitset passes it to its [FailureHook], which must not return.

use std::{borrow::Cow, collections::TryReserveError, fmt};
use thiserror::Error;

/// Result type of the internal fallible storage routines.
pub type Result<T> = std::result::Result<T, AllocError>;

/// Why backing storage for a bitset could not be provided.
#[derive(Debug, Error)]
pub enum AllocError {
    /// Growing the capacity far enough to hold `index` overflows `usize`.
    #[error("bitset capacity overflows usize while growing to fit bit {index}")]
    CapacityOverflow { index: usize },

    /// The allocator refused to provide storage for `bits` bits.
    #[error("failed to allocate storage for {bits} bits")]
    Reserve {
        bits: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Called with the allocation error and the caller-supplied diagnostic message.
///
/// The hook must diverge: either terminate the process or unwind.
pub type FailureHook = fn(&AllocError, Option<&str>) -> !;

/// Logs the failure, writes the diagnostic message (if any) to stderr, and exits with status 1.
pub fn default_failure_hook(err: &AllocError, errmsg: Option<&str>) -> ! {
    tracing::error!(error = %err, "bitset allocation failed, terminating");
    if let Some(msg) = errmsg {
        eprint!("{msg}");
    }
    std::process::exit(1)
}

/// What a bitset does when its storage cannot be allocated.
#[derive(Clone)]
pub(crate) struct FailurePolicy {
    errmsg: Option<Cow<'static, str>>,
    hook: FailureHook,
}

impl FailurePolicy {
    pub(crate) fn new(errmsg: Option<Cow<'static, str>>, hook: FailureHook) -> Self {
        Self { errmsg, hook }
    }

    pub(crate) fn with_errmsg(self, errmsg: Cow<'static, str>) -> Self {
        Self {
            errmsg: Some(errmsg),
            ..self
        }
    }

    pub(crate) fn with_hook(self, hook: FailureHook) -> Self {
        Self { hook, ..self }
    }

    pub(crate) fn errmsg(&self) -> Option<&str> {
        self.errmsg.as_deref()
    }

    #[cold]
    pub(crate) fn fail(&self, err: &AllocError) -> ! {
        (self.hook)(err, self.errmsg())
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::new(None, default_failure_hook)
    }
}

impl fmt::Debug for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailurePolicy")
            .field("errmsg", &self.errmsg)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrowableBitset;
    use std::process::Command;

    const EXIT_CHILD_ENV: &str = "SEEN_BITS_EXIT_CHILD";

    fn panicking_hook(err: &AllocError, errmsg: Option<&str>) -> ! {
        panic!("{}|{err}", errmsg.unwrap_or("<none>"))
    }

    #[test]
    fn test_error_messages() {
        let err = AllocError::CapacityOverflow { index: 7 };
        assert_eq!(
            err.to_string(),
            "bitset capacity overflows usize while growing to fit bit 7"
        );
    }

    #[test]
    #[should_panic(expected = "out of memory marking reads|bitset capacity overflows")]
    fn test_policy_passes_errmsg_to_hook() {
        let policy = FailurePolicy::new(Some("out of memory marking reads".into()), panicking_hook);
        policy.fail(&AllocError::CapacityOverflow { index: usize::MAX });
    }

    #[test]
    #[should_panic(expected = "<none>|")]
    fn test_policy_without_errmsg() {
        let policy = FailurePolicy::new(None, panicking_hook);
        assert_eq!(policy.errmsg(), None);
        policy.fail(&AllocError::CapacityOverflow { index: 1 });
    }

    #[test]
    fn test_policy_debug_omits_hook() {
        let policy = FailurePolicy::new(Some("boom".into()), panicking_hook);
        assert_eq!(
            format!("{policy:?}"),
            "FailurePolicy { errmsg: Some(\"boom\"), .. }"
        );
    }

    #[test]
    fn test_default_hook_exits_with_errmsg() {
        if std::env::var_os(EXIT_CHILD_ENV).is_some() {
            let mut bits = GrowableBitset::with_errmsg(10, "seen bits exhausted\n");
            bits.set_over(usize::MAX);
            unreachable!("default failure hook returned");
        }

        // rerun just this test in a child process that takes the real exit path
        let exe = std::env::current_exe().unwrap();
        let output = Command::new(exe)
            .args([
                "--exact",
                "error::tests::test_default_hook_exits_with_errmsg",
                "--nocapture",
            ])
            .env(EXIT_CHILD_ENV, "1")
            .output()
            .unwrap();

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
        assert!(stderr.contains("seen bits exhausted"), "stderr: {stderr}");
    }
}
