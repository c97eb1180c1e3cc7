//! Change generator capability traits.
//!
//! A generator turns one differing object into zero or more
//! [`ChangeOperation`]s. Every generator reports a [`Priority`] per kind and
//! may constrain the global kind order with `run_before` / `run_after`.
//! The fix method receives the run's [`DiffOutputControl`] and the
//! [`ChangeGeneratorChain`] so it can resolve related objects as well.

use std::fmt;

use crate::chain::ChangeGeneratorChain;
use crate::control::DiffOutputControl;
use crate::diff::ObjectDifferences;
use crate::error::GeneratorError;
use crate::kind::ObjectKind;
use crate::object::SchemaObject;
use crate::operations::ChangeOperation;

/// How strongly a generator claims a kind. Only positive priorities apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// The generator does not handle the kind.
    pub const NONE: Self = Self(-1);
    /// Generic, database-independent handling.
    pub const DEFAULT: Self = Self(1);
    /// Database-specific handling; wins over `DEFAULT`.
    pub const DATABASE: Self = Self(5);
    /// Extension handling; wins over everything built in.
    pub const ADDITIONAL: Self = Self(50);

    /// Returns true if this priority takes part in selection.
    #[must_use]
    pub fn is_applicable(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of a single fix: `None` means the generator declined.
pub type GeneratorResult = Result<Option<Vec<ChangeOperation>>, GeneratorError>;

/// Registration metadata shared by every generator.
pub trait ChangeGenerator: Send + Sync {
    /// Name used in logs and error reports.
    fn name(&self) -> &str;

    /// Priority for the given kind; `Priority::NONE` when not handled.
    fn priority(&self, kind: ObjectKind) -> Priority;

    /// Kinds whose objects must be processed after this generator's kinds.
    fn run_before(&self) -> &[ObjectKind] {
        &[]
    }

    /// Kinds whose objects must be processed before this generator's kinds.
    fn run_after(&self) -> &[ObjectKind] {
        &[]
    }
}

/// Fixes objects present in the reference schema only.
pub trait MissingObjectChangeGenerator: ChangeGenerator {
    /// Produces the changes that create `object`.
    fn fix_missing(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
        chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult;
}

/// Fixes objects present in the comparison schema only.
pub trait UnexpectedObjectChangeGenerator: ChangeGenerator {
    /// Produces the changes that remove `object`.
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
        chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult;
}

/// Fixes objects present in both schemas with differing attributes.
pub trait ChangedObjectChangeGenerator: ChangeGenerator {
    /// Produces the changes that bring `object` in line with the reference.
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        control: &mut DiffOutputControl,
        chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_applicability() {
        assert!(!Priority::NONE.is_applicable());
        assert!(!Priority(0).is_applicable());
        assert!(Priority::DEFAULT.is_applicable());
        assert!(Priority::ADDITIONAL > Priority::DATABASE);
        assert!(Priority::DATABASE > Priority::DEFAULT);
    }
}
