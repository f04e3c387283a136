//! Asynchronous interface for submitting deferred chains for resolution.
//!
//! This module provides a minimal task-per-chain runner: submitted chains
//! resolve concurrently with each other while every chain keeps its strict
//! internal sequencing. The goal is to keep runtime concerns here without
//! invasive changes to the chain itself. Callers submit chains and await
//! their outcomes by handle.
//!
//! There is no cancellation and no timeout: a collaborator method that never
//! resolves stalls that one chain indefinitely.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::chain::Deferred;
use crate::error::{ChainError, Result};

/// Opaque resolution identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolutionId(u64);

/// Handle to a chain resolving in the background.
#[derive(Debug)]
pub struct Resolution {
    id: ResolutionId,
    started: Instant,
    join: JoinHandle<Result<Option<Value>>>,
}

impl Resolution {
    pub fn id(&self) -> ResolutionId {
        self.id
    }

    /// Elapsed time since submission.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Wait for the chain to finish. Consumes the handle, so the outcome is
    /// delivered exactly once. A resolution task that died before completing
    /// surfaces as an execution error.
    pub async fn outcome(self) -> Result<Option<Value>> {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(id = self.id.0, error = %e, "resolution task failed");
                Err(ChainError::Execution(format!(
                    "resolution task failed: {e}"
                )))
            }
        }
    }
}

/// Spawns one resolution task per submitted chain.
pub struct ChainRunner {
    next_id: Mutex<u64>,
}

impl ChainRunner {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(0),
        }
    }

    fn allocate_id(&self) -> ResolutionId {
        let mut g = self.next_id.lock().unwrap();
        *g += 1;
        ResolutionId(*g)
    }

    /// Submit a chain for background resolution. Must be called from within a
    /// tokio runtime. Termination still happens inside the chain itself, so a
    /// chain can only ever be submitted once.
    pub fn submit(&self, mut chain: Deferred) -> Resolution {
        let id = self.allocate_id();
        let join = tokio::spawn(async move { chain.done().await });
        Resolution {
            id,
            started: Instant::now(),
            join,
        }
    }

    /// Resolve a chain inline on the current task, for one-off use.
    pub async fn resolve(&self, mut chain: Deferred) -> Result<Option<Value>> {
        chain.done().await
    }
}

impl Default for ChainRunner {
    fn default() -> Self {
        Self::new()
    }
}
