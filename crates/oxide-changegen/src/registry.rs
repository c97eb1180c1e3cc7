//! Generator registry and selection.
//!
//! The registry is populated once, before any run, by explicit `register_*`
//! calls, and is read-only afterwards. Selection filters generators by
//! operation and applicable priority, highest priority first; generators
//! with equal priority keep their registration order.

use std::fmt;

use crate::generator::{
    ChangedObjectChangeGenerator, MissingObjectChangeGenerator, Priority,
    UnexpectedObjectChangeGenerator,
};
use crate::kind::{DiffOperation, ObjectKind};

/// A generator registered for one diff operation.
pub enum RegisteredGenerator {
    /// Handles missing objects.
    Missing(Box<dyn MissingObjectChangeGenerator>),
    /// Handles unexpected objects.
    Unexpected(Box<dyn UnexpectedObjectChangeGenerator>),
    /// Handles changed objects.
    Changed(Box<dyn ChangedObjectChangeGenerator>),
}

impl RegisteredGenerator {
    /// The diff operation this generator handles.
    #[must_use]
    pub fn operation(&self) -> DiffOperation {
        match self {
            Self::Missing(_) => DiffOperation::Missing,
            Self::Unexpected(_) => DiffOperation::Unexpected,
            Self::Changed(_) => DiffOperation::Changed,
        }
    }

    /// Generator name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Missing(g) => g.name(),
            Self::Unexpected(g) => g.name(),
            Self::Changed(g) => g.name(),
        }
    }

    /// Priority for a kind.
    #[must_use]
    pub fn priority(&self, kind: ObjectKind) -> Priority {
        match self {
            Self::Missing(g) => g.priority(kind),
            Self::Unexpected(g) => g.priority(kind),
            Self::Changed(g) => g.priority(kind),
        }
    }

    /// Declared `run_before` kinds.
    #[must_use]
    pub fn run_before(&self) -> &[ObjectKind] {
        match self {
            Self::Missing(g) => g.run_before(),
            Self::Unexpected(g) => g.run_before(),
            Self::Changed(g) => g.run_before(),
        }
    }

    /// Declared `run_after` kinds.
    #[must_use]
    pub fn run_after(&self) -> &[ObjectKind] {
        match self {
            Self::Missing(g) => g.run_after(),
            Self::Unexpected(g) => g.run_after(),
            Self::Changed(g) => g.run_after(),
        }
    }

    /// Kinds this generator reports an applicable priority for.
    pub fn own_kinds(&self) -> impl Iterator<Item = ObjectKind> + '_ {
        ObjectKind::ALL
            .into_iter()
            .filter(move |k| self.priority(*k).is_applicable())
    }
}

impl fmt::Debug for RegisteredGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredGenerator")
            .field("name", &self.name())
            .field("operation", &self.operation())
            .finish()
    }
}

/// All known generators, in registration order.
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: Vec<RegisteredGenerator>,
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a generator for missing objects.
    pub fn register_missing<G>(&mut self, generator: G) -> &mut Self
    where
        G: MissingObjectChangeGenerator + 'static,
    {
        self.generators
            .push(RegisteredGenerator::Missing(Box::new(generator)));
        self
    }

    /// Registers a generator for unexpected objects.
    pub fn register_unexpected<G>(&mut self, generator: G) -> &mut Self
    where
        G: UnexpectedObjectChangeGenerator + 'static,
    {
        self.generators
            .push(RegisteredGenerator::Unexpected(Box::new(generator)));
        self
    }

    /// Registers a generator for changed objects.
    pub fn register_changed<G>(&mut self, generator: G) -> &mut Self
    where
        G: ChangedObjectChangeGenerator + 'static,
    {
        self.generators
            .push(RegisteredGenerator::Changed(Box::new(generator)));
        self
    }

    /// Returns all registered generators.
    #[must_use]
    pub fn generators(&self) -> &[RegisteredGenerator] {
        &self.generators
    }

    /// Returns the number of registered generators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Generators that claim `kind` for `operation`, highest priority first.
    #[must_use]
    pub fn candidates_for(
        &self,
        kind: ObjectKind,
        operation: DiffOperation,
    ) -> Vec<&RegisteredGenerator> {
        let mut candidates: Vec<(Priority, &RegisteredGenerator)> = self
            .generators
            .iter()
            .filter(|g| g.operation() == operation)
            .map(|g| (g.priority(kind), g))
            .filter(|(p, _)| p.is_applicable())
            .collect();

        // Stable: equal priorities keep registration order.
        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        candidates.into_iter().map(|(_, g)| g).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChangeGeneratorChain;
    use crate::control::DiffOutputControl;
    use crate::generator::{ChangeGenerator, GeneratorResult};
    use crate::object::SchemaObject;

    struct Fixed {
        name: &'static str,
        kind: ObjectKind,
        priority: Priority,
    }

    impl ChangeGenerator for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self, kind: ObjectKind) -> Priority {
            if kind == self.kind {
                self.priority
            } else {
                Priority::NONE
            }
        }
    }

    impl MissingObjectChangeGenerator for Fixed {
        fn fix_missing(
            &self,
            _object: &SchemaObject,
            _control: &mut DiffOutputControl,
            _chain: &ChangeGeneratorChain<'_>,
        ) -> GeneratorResult {
            Ok(None)
        }
    }

    impl UnexpectedObjectChangeGenerator for Fixed {
        fn fix_unexpected(
            &self,
            _object: &SchemaObject,
            _control: &mut DiffOutputControl,
            _chain: &ChangeGeneratorChain<'_>,
        ) -> GeneratorResult {
            Ok(None)
        }
    }

    fn fixed(name: &'static str, kind: ObjectKind, priority: Priority) -> Fixed {
        Fixed {
            name,
            kind,
            priority,
        }
    }

    fn names(candidates: &[&RegisteredGenerator]) -> Vec<String> {
        candidates.iter().map(|g| g.name().to_string()).collect()
    }

    #[test]
    fn test_candidates_sorted_by_priority() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register_missing(fixed("generic", ObjectKind::Table, Priority::DEFAULT))
            .register_missing(fixed("extension", ObjectKind::Table, Priority::ADDITIONAL))
            .register_missing(fixed("vendor", ObjectKind::Table, Priority::DATABASE));

        let candidates = registry.candidates_for(ObjectKind::Table, DiffOperation::Missing);
        assert_eq!(names(&candidates), vec!["extension", "vendor", "generic"]);
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register_missing(fixed("first", ObjectKind::Index, Priority::DEFAULT))
            .register_missing(fixed("second", ObjectKind::Index, Priority::DEFAULT));

        let candidates = registry.candidates_for(ObjectKind::Index, DiffOperation::Missing);
        assert_eq!(names(&candidates), vec!["first", "second"]);
    }

    #[test]
    fn test_not_applicable_priorities_are_excluded() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register_missing(fixed("zero", ObjectKind::View, Priority(0)))
            .register_missing(fixed("none", ObjectKind::View, Priority::NONE))
            .register_missing(fixed("other_kind", ObjectKind::Table, Priority::DEFAULT));

        assert!(registry
            .candidates_for(ObjectKind::View, DiffOperation::Missing)
            .is_empty());
    }

    #[test]
    fn test_candidates_match_operation() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register_missing(fixed("create", ObjectKind::Table, Priority::DEFAULT))
            .register_unexpected(fixed("drop", ObjectKind::Table, Priority::DEFAULT));

        let candidates = registry.candidates_for(ObjectKind::Table, DiffOperation::Unexpected);
        assert_eq!(names(&candidates), vec!["drop"]);
        assert!(registry
            .candidates_for(ObjectKind::Table, DiffOperation::Changed)
            .is_empty());
    }

    #[test]
    fn test_own_kinds() {
        let mut registry = GeneratorRegistry::new();
        registry.register_missing(fixed("seq", ObjectKind::Sequence, Priority::DEFAULT));
        let kinds: Vec<_> = registry.generators()[0].own_kinds().collect();
        assert_eq!(kinds, vec![ObjectKind::Sequence]);
    }
}
