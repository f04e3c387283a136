use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::collection::Collection;

/// Option names and filter criteria are opaque here. They are merged verbatim
/// into one bundle and interpreted by whichever collaborator receives them.
pub type Criteria = Map<String, Value>;

/// Convenience for building a criteria bundle out of a `json!` object literal.
/// Anything that is not a JSON object yields an empty bundle.
pub fn criteria(value: Value) -> Criteria {
    match value {
        Value::Object(map) => map,
        _ => Criteria::new(),
    }
}

// ------------- MethodKind -------------

/// Capability classification of a chained method, fixed when the operation is
/// constructed. The source system inferred this from the method name on every
/// execution; here the predicate runs once and the executor dispatches on the
/// stored kind.
///
/// Find-style methods both accept a criteria argument and produce the chain's
/// result set. The two capabilities are deliberately answered by the same
/// variant, matching the behavior of the system this was lifted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Criteria-accepting and result-producing ("find", "findOne", ...).
    Find,
    /// Neither; return data is discarded by the executor ("destroy", ...).
    Effect,
}

impl MethodKind {
    /// A method name containing "find" covers singular and plural find-style
    /// operations. Intentionally coarse.
    pub fn classify(method: &str) -> Self {
        if method.contains("find") {
            Self::Find
        } else {
            Self::Effect
        }
    }
    pub fn accepts_criteria(self) -> bool {
        matches!(self, Self::Find)
    }
    pub fn produces_result(self) -> bool {
        matches!(self, Self::Find)
    }
}

// ------------- Operation -------------

/// One pending call: which collaborator to call, which method name, and an
/// optional criteria bundle. Mutable until the owning chain is frozen.
pub struct Operation {
    collection: Arc<dyn Collection>,
    method: String,
    kind: MethodKind,
    criteria: Option<Criteria>,
}

impl Operation {
    pub fn new(collection: Arc<dyn Collection>, method: impl Into<String>) -> Self {
        let method = method.into();
        let kind = MethodKind::classify(&method);
        Self {
            collection,
            method,
            kind,
            criteria: None,
        }
    }

    /// Attach the original filter criteria the call was issued with.
    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn collection(&self) -> &Arc<dyn Collection> {
        &self.collection
    }
    pub fn method(&self) -> &str {
        &self.method
    }
    pub fn kind(&self) -> MethodKind {
        self.kind
    }
    pub fn criteria(&self) -> Option<&Criteria> {
        self.criteria.as_ref()
    }

    /// Merge one query option into the criteria bundle, creating the bundle
    /// on first use. A later option with the same name overwrites.
    pub(crate) fn merge_option(&mut self, name: &str, value: Value) {
        self.criteria
            .get_or_insert_with(Criteria::new)
            .insert(name.to_string(), value);
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("collection", &self.collection.identity())
            .field("method", &self.method)
            .field("kind", &self.kind)
            .field("criteria", &self.criteria)
            .finish()
    }
}
