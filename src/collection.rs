//! The collaborator boundary: data-access endpoints that execute named
//! methods on behalf of a chain.
//!
//! A collaborator exposes named methods. Each method optionally receives a
//! criteria bundle and resolves exactly once with either data or an error.
//! The chain core never interprets criteria contents; `limit`, `skip`, `sort`
//! and any filter fields are passed through verbatim and mean whatever the
//! collaborator says they mean.
//!
//! [`MemoryCollection`] is a small reference collaborator keeping JSON rows in
//! memory. It is what the tests, docs and benches run chains against.

use std::cmp::Ordering;
use std::sync::Mutex;

use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::error::CollaboratorError;
use crate::operation::Criteria;

/// A data-access endpoint that chained operations execute against.
pub trait Collection: Send + Sync {
    /// Name of the collection, used when reporting errors against it.
    fn identity(&self) -> &str;

    /// Whether a method of this name can be called. Checked by the executor
    /// before any invocation, so an unknown method fails an operation without
    /// the call ever being attempted.
    fn provides(&self, method: &str) -> bool;

    /// Invoke a named method. The criteria argument is present exactly when
    /// the chained operation accepts criteria. The returned future resolves
    /// exactly once; implementations copy what they need out of the borrowed
    /// arguments before going async.
    fn call(
        &self,
        method: &str,
        criteria: Option<&Criteria>,
    ) -> BoxFuture<'_, std::result::Result<Value, CollaboratorError>>;
}

// ------------- MemoryCollection -------------

/// Criteria keys reserved for query options; everything else is an equality
/// filter against row fields.
const OPTION_KEYS: [&str; 3] = ["limit", "skip", "sort"];

#[derive(Error, Debug)]
pub enum MemoryCollectionError {
    #[error("Lock poisoned: {0}")]
    Lock(String),
    #[error("{0} is not a method of this collection")]
    UnknownMethod(String),
}

/// In-memory reference collaborator. Rows are JSON objects behind a mutex.
///
/// Methods: `find` resolves with the array of matching rows, `findOne` with
/// the first matching row (or null), `destroy` clears all rows. Failures
/// surface as collaborator errors, never as panics.
#[derive(Debug)]
pub struct MemoryCollection {
    identity: String,
    rows: Mutex<Vec<Value>>,
}

impl MemoryCollection {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Seed one row. Intended for test and example setup.
    pub fn insert(&self, row: Value) {
        self.rows.lock().unwrap().push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, criteria: Option<&Criteria>) -> Result<Vec<Value>, CollaboratorError> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| MemoryCollectionError::Lock(e.to_string()))?;
        let mut matched: Vec<Value> = rows
            .iter()
            .filter(|row| matches_criteria(row, criteria))
            .cloned()
            .collect();
        drop(rows);
        if let Some(criteria) = criteria {
            if let Some(sort) = criteria.get("sort") {
                sort_rows(&mut matched, sort);
            }
            if let Some(skip) = criteria.get("skip").and_then(Value::as_u64) {
                let skip = (skip as usize).min(matched.len());
                matched.drain(..skip);
            }
            if let Some(limit) = criteria.get("limit").and_then(Value::as_u64) {
                matched.truncate(limit as usize);
            }
        }
        Ok(matched)
    }

    fn destroy(&self) -> Result<Value, CollaboratorError> {
        self.rows
            .lock()
            .map_err(|e| MemoryCollectionError::Lock(e.to_string()))?
            .clear();
        Ok(Value::Null)
    }
}

impl Collection for MemoryCollection {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn provides(&self, method: &str) -> bool {
        matches!(method, "find" | "findOne" | "destroy")
    }

    fn call(
        &self,
        method: &str,
        criteria: Option<&Criteria>,
    ) -> BoxFuture<'_, std::result::Result<Value, CollaboratorError>> {
        let method = method.to_string();
        let criteria = criteria.cloned();
        Box::pin(async move {
            match method.as_str() {
                "find" => self.find(criteria.as_ref()).map(Value::Array),
                "findOne" => self
                    .find(criteria.as_ref())
                    .map(|rows| rows.into_iter().next().unwrap_or(Value::Null)),
                "destroy" => self.destroy(),
                other => Err(MemoryCollectionError::UnknownMethod(other.to_string()).into()),
            }
        })
    }
}

/// Every non-option criteria key must equal the row's field of the same name.
fn matches_criteria(row: &Value, criteria: Option<&Criteria>) -> bool {
    let Some(criteria) = criteria else {
        return true;
    };
    criteria
        .iter()
        .filter(|(name, _)| !OPTION_KEYS.contains(&name.as_str()))
        .all(|(name, expected)| row.get(name) == Some(expected))
}

/// Sort spec is a field name, optionally suffixed with "desc".
fn sort_rows(rows: &mut [Value], sort: &Value) {
    let Some(spec) = sort.as_str() else {
        return;
    };
    let (field, descending) = match spec.split_once(' ') {
        Some((field, direction)) => (field, direction.eq_ignore_ascii_case("desc")),
        None => (spec, false),
    };
    rows.sort_by(|a, b| {
        let ordering = compare_fields(a.get(field), b.get(field));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
