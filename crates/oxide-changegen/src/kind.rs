//! Object kinds and diff operations.
//!
//! Kinds are the unit of ordering: generators declare `run_before` and
//! `run_after` constraints over kinds, never over individual objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChangeGenError;

/// A category of schema object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A database catalog.
    Catalog,
    /// A schema inside a catalog.
    Schema,
    /// A table.
    Table,
    /// A view.
    View,
    /// A column of a table or view.
    Column,
    /// A primary key constraint.
    PrimaryKey,
    /// A unique constraint.
    UniqueConstraint,
    /// An index.
    Index,
    /// A foreign key constraint.
    ForeignKey,
    /// A sequence.
    Sequence,
    /// A stored procedure or function.
    StoredProcedure,
    /// The row content of a table.
    Data,
}

impl ObjectKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Catalog,
        Self::Schema,
        Self::Table,
        Self::View,
        Self::Column,
        Self::PrimaryKey,
        Self::UniqueConstraint,
        Self::Index,
        Self::ForeignKey,
        Self::Sequence,
        Self::StoredProcedure,
        Self::Data,
    ];

    /// Returns the snake_case name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Schema => "schema",
            Self::Table => "table",
            Self::View => "view",
            Self::Column => "column",
            Self::PrimaryKey => "primary_key",
            Self::UniqueConstraint => "unique_constraint",
            Self::Index => "index",
            Self::ForeignKey => "foreign_key",
            Self::Sequence => "sequence",
            Self::StoredProcedure => "stored_procedure",
            Self::Data => "data",
        }
    }

    /// Returns true for kinds that live inside a table.
    #[must_use]
    pub fn is_table_owned(&self) -> bool {
        matches!(
            self,
            Self::Column
                | Self::PrimaryKey
                | Self::UniqueConstraint
                | Self::Index
                | Self::ForeignKey
                | Self::Data
        )
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = ChangeGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let kind = match normalized.as_str() {
            "catalog" => Self::Catalog,
            "schema" => Self::Schema,
            "table" => Self::Table,
            "view" => Self::View,
            "column" => Self::Column,
            "primary_key" | "primarykey" => Self::PrimaryKey,
            "unique_constraint" | "uniqueconstraint" => Self::UniqueConstraint,
            "index" => Self::Index,
            "foreign_key" | "foreignkey" => Self::ForeignKey,
            "sequence" => Self::Sequence,
            "stored_procedure" | "storedprocedure" | "procedure" => Self::StoredProcedure,
            "data" => Self::Data,
            _ => return Err(ChangeGenError::UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}

/// The three ways an object can differ between reference and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOperation {
    /// Present in reference, absent in comparison: needs creating.
    Missing,
    /// Present in comparison, absent in reference: needs removing.
    Unexpected,
    /// Present in both with differing attributes: needs altering.
    Changed,
}

impl DiffOperation {
    /// All operations, in the order the driver processes them within a kind.
    pub const ALL: [Self; 3] = [Self::Missing, Self::Unexpected, Self::Changed];
}

impl fmt::Display for DiffOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "missing",
            Self::Unexpected => "unexpected",
            Self::Changed => "changed",
        })
    }
}
