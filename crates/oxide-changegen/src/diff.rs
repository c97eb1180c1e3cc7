//! Diff result input model.
//!
//! A [`DiffResult`] is produced by an external comparison step: it holds the
//! objects missing from the comparison schema, the objects it has that the
//! reference lacks, and the objects present in both with attribute
//! differences.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChangeGenError, Result};
use crate::kind::ObjectKind;
use crate::object::{DatabaseObject, SchemaObject};

/// A single attribute's reference and compared values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    /// Value in the reference schema.
    pub reference: Value,
    /// Value in the comparison schema.
    pub compared: Value,
}

/// Attribute differences of one changed object, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectDifferences {
    differences: BTreeMap<String, Difference>,
}

impl ObjectDifferences {
    /// Creates an empty difference set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a difference. Equal values are not recorded.
    #[must_use]
    pub fn with(
        mut self,
        attribute: impl Into<String>,
        reference: impl Into<Value>,
        compared: impl Into<Value>,
    ) -> Self {
        let reference = reference.into();
        let compared = compared.into();
        if reference != compared {
            self.differences.insert(
                attribute.into(),
                Difference {
                    reference,
                    compared,
                },
            );
        }
        self
    }

    /// Returns the difference recorded for an attribute.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Difference> {
        self.differences.get(attribute)
    }

    /// Returns true if the attribute differs.
    #[must_use]
    pub fn has(&self, attribute: &str) -> bool {
        self.differences.contains_key(attribute)
    }

    /// Returns true if no attribute differs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// Iterates over differing attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Difference)> {
        self.differences.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// An object present in both schemas, with its differences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedObject {
    /// The object as it appears in the reference schema.
    pub object: SchemaObject,
    /// Differing attributes.
    #[serde(default)]
    pub differences: ObjectDifferences,
}

/// The outcome of comparing a reference schema to a comparison schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Objects in the reference but not the comparison schema.
    #[serde(default)]
    pub missing: Vec<SchemaObject>,
    /// Objects in the comparison but not the reference schema.
    #[serde(default)]
    pub unexpected: Vec<SchemaObject>,
    /// Objects in both, with differences.
    #[serde(default)]
    pub changed: Vec<ChangedObject>,
}

impl DiffResult {
    /// Creates an empty diff result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a diff result from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ChangeGenError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Adds a missing object.
    #[must_use]
    pub fn missing(mut self, object: impl Into<SchemaObject>) -> Self {
        self.missing.push(object.into());
        self
    }

    /// Adds an unexpected object.
    #[must_use]
    pub fn unexpected(mut self, object: impl Into<SchemaObject>) -> Self {
        self.unexpected.push(object.into());
        self
    }

    /// Adds a changed object.
    #[must_use]
    pub fn changed(
        mut self,
        object: impl Into<SchemaObject>,
        differences: ObjectDifferences,
    ) -> Self {
        self.changed.push(ChangedObject {
            object: object.into(),
            differences,
        });
        self
    }

    /// Missing objects of one kind, in input order.
    pub fn missing_of(&self, kind: ObjectKind) -> impl Iterator<Item = &SchemaObject> {
        self.missing.iter().filter(move |o| o.kind() == kind)
    }

    /// Unexpected objects of one kind, in input order.
    pub fn unexpected_of(&self, kind: ObjectKind) -> impl Iterator<Item = &SchemaObject> {
        self.unexpected.iter().filter(move |o| o.kind() == kind)
    }

    /// Changed objects of one kind, in input order.
    pub fn changed_of(&self, kind: ObjectKind) -> impl Iterator<Item = &ChangedObject> {
        self.changed.iter().filter(move |c| c.object.kind() == kind)
    }

    /// Returns true if nothing differs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.changed.is_empty()
    }
}
