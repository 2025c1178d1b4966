//! The ordered issue document and its transformations.

use crate::errors::IssueError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Canonical key order for issue serialization. Keys present in the payload
/// appear in this relative order; unrecognized keys are appended after them
/// in their original relative order.
pub const CANONICAL_KEYS: [&str; 10] = [
    "uid",
    "title",
    "description",
    "project",
    "severity",
    "status",
    "urls",
    "materials",
    "datasets",
    "facets",
];

/// Key of the facets section within the issue document.
pub const FACETS_KEY: &str = "facets";

/// One issue record, held as an ordered JSON object.
///
/// The wrapper validates the document shape at the deserialization boundary
/// so that absent or mistyped fields surface as typed errors instead of
/// silent missing-key behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuePayload {
    fields: Map<String, Value>,
}

impl IssuePayload {
    /// Wrap a parsed JSON value, requiring a top-level object.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::MalformedIssueDocument`] if the value is not an
    /// object. `origin` names the document in the error (a file path or the
    /// remote service).
    pub fn from_value(value: Value, origin: &str) -> Result<Self, IssueError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(IssueError::MalformedIssueDocument {
                path: origin.to_string(),
                reason: format!("expected a JSON object at the top level, found {}", json_kind(&other)),
            }),
        }
    }

    /// Consume the payload, yielding the underlying JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// The project this issue belongs to.
    ///
    /// # Errors
    ///
    /// Returns a typed error if the field is absent or not a string.
    pub fn project(&self) -> Result<&str, IssueError> {
        self.required_str("project")
    }

    /// The unique identifier of this issue.
    ///
    /// # Errors
    ///
    /// Returns a typed error if the field is absent or not a string.
    pub fn uid(&self) -> Result<&str, IssueError> {
        self.required_str("uid")
    }

    /// The affected dataset identifiers recorded in the document, if any.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::FieldTypeMismatch`] if `datasets` exists but is
    /// not a list of strings.
    pub fn datasets(&self) -> Result<Vec<String>, IssueError> {
        match self.fields.get("datasets") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or(IssueError::FieldTypeMismatch {
                        field: "datasets",
                        expected: "a list of strings",
                    })
                })
                .collect(),
            Some(_) => Err(IssueError::FieldTypeMismatch {
                field: "datasets",
                expected: "a list of strings",
            }),
        }
    }

    /// Set a string field, replacing any previous value.
    pub fn set_str(&mut self, key: &str, value: &str) {
        let _ = self.fields.insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Set a field to an arbitrary value, replacing any previous value.
    pub fn set(&mut self, key: &str, value: Value) {
        let _ = self.fields.insert(key.to_string(), value);
    }

    /// Whether the document carries the given key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Merge newly-extracted facets into the document's facets section.
    ///
    /// Values are lower-cased on insertion. A facet absent from the section
    /// is created with a single-element list; an existing facet only gains
    /// the value if it is not already listed, preserving first-seen order.
    /// Merging the same facets twice leaves the document unchanged.
    pub fn merge_facets(&mut self, facets: &BTreeMap<String, String>) {
        let section = self
            .fields
            .entry(FACETS_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(section) = section else {
            // A mistyped facets section is replaced outright; facet history
            // cannot be preserved from a non-object value.
            *section = Value::Object(Map::new());
            return self.merge_facets(facets);
        };

        for (name, value) in facets {
            let value = value.to_lowercase();
            match section.get_mut(name) {
                Some(Value::Array(values)) => {
                    if !values.iter().any(|v| v.as_str() == Some(value.as_str())) {
                        values.push(Value::String(value));
                    }
                }
                _ => {
                    let _ = section.insert(name.clone(), Value::Array(vec![Value::String(value)]));
                }
            }
        }
    }

    /// Produce an ordered view holding only the recognized canonical keys
    /// present in the document, in canonical order.
    #[must_use]
    pub fn ordered(&self) -> Map<String, Value> {
        let mut ordered = Map::new();
        for key in CANONICAL_KEYS {
            if let Some(value) = self.fields.get(key) {
                let _ = ordered.insert(key.to_string(), value.clone());
            }
        }
        ordered
    }

    /// Produce the full document with canonical keys first, then any
    /// unrecognized keys in their original relative order.
    #[must_use]
    pub fn ordered_full(&self) -> Map<String, Value> {
        let mut ordered = self.ordered();
        for (key, value) in &self.fields {
            if !ordered.contains_key(key) {
                let _ = ordered.insert(key.clone(), value.clone());
            }
        }
        ordered
    }

    /// Remove every empty field from the document.
    ///
    /// A field is empty when its value is null, an empty string, an empty
    /// list, or a list whose only content is empty strings (empty-string
    /// items are dropped from surviving lists). The operation is shallow
    /// and idempotent.
    pub fn compact(&mut self) {
        let mut compacted = Map::new();
        for (key, value) in &self.fields {
            match value {
                Value::Null => {}
                Value::String(s) if s.is_empty() => {}
                Value::Array(items) => {
                    let kept: Vec<Value> = items
                        .iter()
                        .filter(|item| item.as_str() != Some(""))
                        .cloned()
                        .collect();
                    if !kept.is_empty() {
                        let _ = compacted.insert(key.clone(), Value::Array(kept));
                    }
                }
                other => {
                    let _ = compacted.insert(key.clone(), other.clone());
                }
            }
        }
        self.fields = compacted;
    }

    fn required_str(&self, field: &'static str) -> Result<&str, IssueError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Err(IssueError::FieldMissing { field }),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(IssueError::FieldTypeMismatch { field, expected: "a string" }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
