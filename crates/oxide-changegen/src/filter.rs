//! Include/exclude filtering of objects before change generation.
//!
//! A filter expression is a comma-separated list of entries. Each entry is
//! either `kind:regex` or a bare `regex` that applies to every kind; text
//! before a `:` that does not name a kind stays part of the regex. Patterns
//! match the whole object name, case-insensitively. A `table:` entry also
//! matches objects owned by a matching table (columns, indexes, keys, data).

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ChangeGenError, Result};
use crate::kind::ObjectKind;
use crate::object::DatabaseObject;

/// Whether matching objects are kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Only matching objects are output.
    Include,
    /// Matching objects are skipped.
    Exclude,
}

#[derive(Debug, Clone)]
struct FilterEntry {
    kind: Option<ObjectKind>,
    pattern: Regex,
}

impl FilterEntry {
    fn parse(expression: &str) -> Result<Self> {
        // Text before the first ':' is a kind only if it names one; regex
        // syntax such as `(?:a|b)` keeps the whole entry as the pattern.
        let (kind, pattern) = match expression.split_once(':') {
            Some((kind, pattern)) => match kind.trim().parse::<ObjectKind>() {
                Ok(kind) => (Some(kind), pattern),
                Err(_) => (None, expression),
            },
            None => (None, expression),
        };

        let pattern = RegexBuilder::new(&format!("^(?:{})$", pattern.trim()))
            .case_insensitive(true)
            .build()
            .map_err(|e| ChangeGenError::InvalidFilter {
                expression: expression.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { kind, pattern })
    }

    fn matches(&self, object: &dyn DatabaseObject) -> bool {
        match self.kind {
            None => object.object_name().is_some_and(|n| self.pattern.is_match(n)),
            Some(kind) if kind == object.kind() => object
                .object_name()
                .is_some_and(|n| self.pattern.is_match(n)),
            Some(ObjectKind::Table) => object
                .owning_table()
                .is_some_and(|t| self.pattern.is_match(&t.name)),
            Some(_) => false,
        }
    }
}

/// Decides which objects the driver hands to generators.
#[derive(Debug, Clone)]
pub struct ObjectChangeFilter {
    mode: FilterMode,
    entries: Vec<FilterEntry>,
}

impl ObjectChangeFilter {
    /// Parses a filter expression such as `table:order.*, column:.*_tmp`.
    pub fn parse(mode: FilterMode, expression: &str) -> Result<Self> {
        let entries = expression
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(FilterEntry::parse)
            .collect::<Result<Vec<_>>>()?;

        if entries.is_empty() {
            return Err(ChangeGenError::InvalidFilter {
                expression: expression.to_string(),
                message: "no filter entries".to_string(),
            });
        }

        Ok(Self { mode, entries })
    }

    /// Returns the filter mode.
    #[must_use]
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Returns true if the object passes the filter.
    #[must_use]
    pub fn include(&self, object: &dyn DatabaseObject) -> bool {
        let matched = self.entries.iter().any(|e| e.matches(object));
        match self.mode {
            FilterMode::Include => matched,
            FilterMode::Exclude => !matched,
        }
    }
}
