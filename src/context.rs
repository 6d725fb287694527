//! Process-global context: one-shot initialization and the shared thread
//! configuration.
//!
//! [`initialize`] must run once before the algorithms; it installs the
//! default thread counts and is idempotent-once (a second call reports
//! [`GraphError::AlreadyInitialized`]).  [`finalize`] tears the context
//! down again, after which a fresh [`initialize`] is permitted.  The
//! `(outer, inner)` thread counts feed the sort primitives and are plain
//! data here: no file-scope mutable state leaks into the algorithms.

use crate::error::{GraphError, Result};
use lazy_static::lazy_static;
use log::debug;
use std::sync::Mutex;

/// Outer and inner thread counts, as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreadCounts {
    /// Threads for outer-level parallel regions (the sort primitives).
    pub outer: usize,
    /// Threads for nested parallel kernels.
    pub inner: usize,
}

impl Default for ThreadCounts {
    fn default() -> Self {
        Self { outer: 1, inner: 1 }
    }
}

#[derive(Debug, Default)]
struct Context {
    initialized: bool,
    threads: ThreadCounts,
}

lazy_static! {
    static ref CONTEXT: Mutex<Context> = Mutex::new(Context::default());
}

/// Install the process-global context.  The second call without an
/// intervening [`finalize`] fails with [`GraphError::AlreadyInitialized`].
pub fn initialize() -> Result<()> {
    let mut ctx = CONTEXT.lock().expect("context lock");
    if ctx.initialized {
        return Err(GraphError::AlreadyInitialized);
    }
    ctx.initialized = true;
    ctx.threads = ThreadCounts::default();
    debug!("context initialized");
    Ok(())
}

/// Tear the context down.  Safe to call even when never initialized.
pub fn finalize() {
    let mut ctx = CONTEXT.lock().expect("context lock");
    ctx.initialized = false;
    ctx.threads = ThreadCounts::default();
    debug!("context finalized");
}

/// Current `(outer, inner)` thread counts.
pub fn num_threads() -> ThreadCounts {
    CONTEXT.lock().expect("context lock").threads
}

/// Set the `(outer, inner)` thread counts.  Zero for either is
/// [`GraphError::InvalidValue`].
pub fn set_num_threads(outer: usize, inner: usize) -> Result<()> {
    if outer == 0 || inner == 0 {
        return Err(GraphError::invalid_value(
            "set_num_threads",
            "thread counts must be positive",
        ));
    }
    let mut ctx = CONTEXT.lock().expect("context lock");
    ctx.threads = ThreadCounts { outer, inner };
    Ok(())
}
