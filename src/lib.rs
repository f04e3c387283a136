//! Callchain – a deferred call-chain builder for data-access operations.
//!
//! A [`chain::Deferred`] buffers a sequence of pending calls against
//! data-access collaborators without executing anything:
//! * An [`operation::Operation`] is one pending call: which collaborator,
//!   which method name, and an optional criteria bundle. Its
//!   [`operation::MethodKind`] is classified once, at construction.
//! * Query options (`limit`, `skip`, `sort`) attach retroactively to the most
//!   recent criteria-accepting operation already in the chain. Later options
//!   with the same name overwrite, and options with no target are dropped.
//! * The terminal [`chain::Deferred::done`] freezes the chain and executes
//!   its operations strictly in order, propagating the first error and
//!   accumulating at most one result set. A chain resolves exactly once.
//!
//! ## Modules
//! * [`chain`] – the deferred object: building, query options, terminal resolution.
//! * [`operation`] – operation records, criteria bundles and method-kind classification.
//! * [`collection`] – the collaborator boundary trait plus an in-memory reference collection.
//! * [`interface`] – submitting chains for concurrent background resolution.
//! * [`error`] – structured error values for the whole crate.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use callchain::chain::Deferred;
//! use callchain::collection::MemoryCollection;
//! use callchain::operation::{criteria, Operation};
//!
//! let users = Arc::new(MemoryCollection::new("users"));
//! users.insert(json!({"id": 1, "name": "Mike"}));
//! users.insert(json!({"id": 2, "name": "Lisa"}));
//!
//! let mut chain = Deferred::new(
//!     Operation::new(users, "find").with_criteria(criteria(json!({"name": "Mike"}))),
//! );
//! chain.limit(10).unwrap();
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let result = runtime.block_on(chain.done()).unwrap();
//! assert_eq!(result, Some(json!([{"id": 1, "name": "Mike"}])));
//! ```

pub mod chain;
pub mod collection;
pub mod error;
mod executor;
pub mod interface;
pub mod operation;
