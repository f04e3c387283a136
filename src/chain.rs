//! The deferred object itself: an ordered chain of pending operations that is
//! built up, optionally refined with query options, and resolved exactly once.

use serde_json::Value;
use tracing::debug;

use crate::error::{ChainError, Result};
use crate::executor;
use crate::operation::Operation;

/// A buffered call chain. Created with one initial operation, grown
/// append-only while building, and resolved by a single terminal [`done`].
///
/// Query options (`limit`, `skip`, `sort`) do not append operations; they
/// mutate the criteria of the most recent criteria-accepting operation
/// already in the chain.
///
/// The chain is single-use: once [`done`] has been entered the chain is
/// terminated, and every further mutating or resolving call fails with a
/// usage error.
///
/// [`done`]: Deferred::done
#[derive(Debug)]
pub struct Deferred {
    chain: Vec<Operation>,
    terminated: bool,
}

impl Deferred {
    pub fn new(operation: Operation) -> Self {
        Self {
            chain: vec![operation],
            terminated: false,
        }
    }

    /// Append a follow-up operation. Only valid while the chain is building.
    pub fn append(&mut self, operation: Operation) -> Result<&mut Self> {
        self.guard()?;
        self.chain.push(operation);
        Ok(self)
    }

    pub fn limit(&mut self, limit: impl Into<Value>) -> Result<&mut Self> {
        self.apply_query_option("limit", limit.into())
    }

    pub fn skip(&mut self, skip: impl Into<Value>) -> Result<&mut Self> {
        self.apply_query_option("skip", skip.into())
    }

    pub fn sort(&mut self, sort: impl Into<Value>) -> Result<&mut Self> {
        self.apply_query_option("sort", sort.into())
    }

    // limit, skip and sort differ only in the option name.
    fn apply_query_option(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        self.guard()?;
        attach_option(&mut self.chain, name, value);
        Ok(self)
    }

    fn guard(&self) -> Result<()> {
        if self.terminated {
            return Err(ChainError::Usage("chain is already terminated".into()));
        }
        Ok(())
    }

    pub fn operations(&self) -> &[Operation] {
        &self.chain
    }

    pub fn terminated(&self) -> bool {
        self.terminated
    }

    /// Terminal resolution: freeze the chain, execute every operation in
    /// order, and deliver either the first error or the accumulated result
    /// set (`None` when no operation in the chain produces one).
    pub async fn done(&mut self) -> Result<Option<Value>> {
        self.guard()?;
        // Frozen before anything runs: at most one resolution, ever.
        self.terminated = true;
        executor::run(&self.chain).await
    }
}

/// Walk the chain backward from the most recently added operation and merge
/// the option into the first one that accepts criteria. Later
/// criteria-accepting operations shadow earlier ones. With no target in the
/// whole chain the option is dropped.
fn attach_option(chain: &mut [Operation], name: &str, value: Value) {
    for operation in chain.iter_mut().rev() {
        if operation.kind().accepts_criteria() {
            operation.merge_option(name, value);
            return;
        }
    }
    debug!(
        option = name,
        "no criteria-accepting operation in the chain, option dropped"
    );
}
