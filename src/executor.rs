//! Sequential execution of a frozen chain: one operation at a time, in chain
//! order, failing fast and accumulating at most one result set.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ChainError, Result};
use crate::operation::Operation;

/// Run every operation in chain order and hand back the single result set.
///
/// Strictly sequential: operation N+1 is not started until operation N's
/// future has resolved, because later operations may depend on collaborator
/// state mutated by earlier ones and because the first error must stop all
/// remaining work.
///
/// An empty chain is a bug in chain construction upstream and panics rather
/// than reporting through the error slot.
pub(crate) async fn run(chain: &[Operation]) -> Result<Option<Value>> {
    assert!(
        !chain.is_empty(),
        "trying to resolve a deferred chain, but the call chain is empty"
    );
    let started = Instant::now();
    let outcome = run_inner(chain).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match &outcome {
        Ok(result) => info!(
            ms = elapsed_ms,
            operations = chain.len(),
            produced = result.is_some(),
            "chain resolved"
        ),
        Err(e) => warn!(ms = elapsed_ms, error = %e, "chain aborted"),
    }
    outcome
}

async fn run_inner(chain: &[Operation]) -> Result<Option<Value>> {
    let mut result_set: Option<Value> = None;
    for operation in chain {
        let collection = operation.collection();
        if !collection.provides(operation.method()) {
            // Fail through the error slot without attempting the call.
            return Err(ChainError::MissingMethod {
                method: operation.method().to_string(),
                collection: collection.identity().to_string(),
            });
        }
        // The criteria bundle rides along exactly when the method takes one.
        let criteria = operation
            .kind()
            .accepts_criteria()
            .then(|| operation.criteria())
            .flatten();
        debug!(
            collection = collection.identity(),
            method = operation.method(),
            "executing chained operation"
        );
        let data = collection
            .call(operation.method(), criteria)
            .await
            .map_err(ChainError::Collaborator)?;
        if operation.kind().produces_result() {
            if result_set.is_some() {
                return Err(ChainError::DuplicateResult {
                    method: operation.method().to_string(),
                });
            }
            result_set = Some(data);
        }
        // Data returned by effect-style methods is not part of the chain's
        // result and is dropped here.
    }
    Ok(result_set)
}
