//! Process-wide mutual exclusion around external command execution.
//!
//! Concurrent migrations against the same cluster can corrupt schema state, so
//! every run holds the gate for the lifetime of its subprocess. The lock is
//! global; there is no per-keyspace sharding.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Single async lock shared by every run request.
///
/// Cheaply cloneable; all clones guard the same lock. Initialized free.
#[derive(Debug, Clone, Default)]
pub struct ExecutionGate {
    lock: Arc<Mutex<()>>,
}

/// Proof that the gate is held. Dropping it releases the gate, so every exit
/// path (including errors, panics and task cancellation) frees it.
#[derive(Debug)]
pub struct GatePermit {
    _guard: OwnedMutexGuard<()>,
}

impl ExecutionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until the gate is free and take it.
    ///
    /// Only the calling task suspends; the runtime keeps serving other work.
    pub async fn acquire(&self) -> GatePermit {
        let start = Instant::now();
        let guard = Arc::clone(&self.lock).lock_owned().await;
        tracing::debug!(
            waited_ms = start.elapsed().as_millis() as u64,
            "Execution gate acquired"
        );
        GatePermit { _guard: guard }
    }

    /// Whether a run currently holds the gate.
    pub fn is_held(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}
