//! Diff-to-changelog driver.
//!
//! [`DiffToChangeLog`] resolves the kind order once, at construction, and
//! then turns any number of [`DiffResult`]s into ordered change operations.
//! For each kind in order it fixes the missing objects, then the unexpected
//! ones, then the changed ones, each in input order. A generator failure
//! aborts the whole run.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::chain::ChangeGeneratorChain;
use crate::control::DiffOutputControl;
use crate::diff::DiffResult;
use crate::error::Result;
use crate::object::{DatabaseObject, SchemaObject};
use crate::operations::ChangeOperation;
use crate::order::KindOrder;
use crate::registry::GeneratorRegistry;

/// Author and id settings for generated change sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSetOptions {
    /// Author recorded on every change set.
    pub author: String,
    /// Prefix of every change set id.
    pub id_root: String,
}

impl Default for ChangeSetOptions {
    fn default() -> Self {
        Self {
            author: "generated".to_string(),
            id_root: Utc::now().timestamp_millis().to_string(),
        }
    }
}

impl ChangeSetOptions {
    /// Creates options with a fixed author and id root.
    #[must_use]
    pub fn new(author: impl Into<String>, id_root: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            id_root: id_root.into(),
        }
    }
}

/// The operations produced for one object, with a generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedChangeSet {
    /// `"{id_root}-{n}"`, n counting from 1.
    pub id: String,
    /// Author.
    pub author: String,
    /// Operations, in output order.
    pub changes: Vec<ChangeOperation>,
}

/// Turns diff results into ordered change operations.
#[derive(Debug, Clone)]
pub struct DiffToChangeLog {
    registry: Arc<GeneratorRegistry>,
    order: Arc<KindOrder>,
}

impl DiffToChangeLog {
    /// Takes ownership of a registry and resolves its kind order.
    ///
    /// Fails when the registered generators declare an ordering cycle.
    pub fn new(registry: GeneratorRegistry) -> Result<Self> {
        Self::from_shared(Arc::new(registry))
    }

    /// Resolves the kind order of a shared registry.
    pub fn from_shared(registry: Arc<GeneratorRegistry>) -> Result<Self> {
        let order = Arc::new(KindOrder::resolve(&registry)?);
        Ok(Self { registry, order })
    }

    /// The resolved kind order.
    #[must_use]
    pub fn kind_order(&self) -> &KindOrder {
        &self.order
    }

    /// The generator registry.
    #[must_use]
    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Produces the ordered change operations for a diff.
    pub fn generate(
        &self,
        diff: &DiffResult,
        control: DiffOutputControl,
    ) -> Result<Vec<ChangeOperation>> {
        let mut operations = Vec::new();
        self.run(diff, control, |changes| operations.extend(changes))?;
        Ok(operations)
    }

    /// Produces one change set per fixed object.
    pub fn generate_change_sets(
        &self,
        diff: &DiffResult,
        control: DiffOutputControl,
        options: &ChangeSetOptions,
    ) -> Result<Vec<GeneratedChangeSet>> {
        let mut change_sets = Vec::new();
        self.run(diff, control, |changes| {
            change_sets.push(GeneratedChangeSet {
                id: format!("{}-{}", options.id_root, change_sets.len() + 1),
                author: options.author.clone(),
                changes,
            });
        })?;
        Ok(change_sets)
    }

    fn run<F>(&self, diff: &DiffResult, mut control: DiffOutputControl, mut emit: F) -> Result<()>
    where
        F: FnMut(Vec<ChangeOperation>),
    {
        info!(
            missing = diff.missing.len(),
            unexpected = diff.unexpected.len(),
            changed = diff.changed.len(),
            "Generating changes"
        );

        let chain = ChangeGeneratorChain::new(&self.registry);
        let mut emitted = 0usize;

        for &kind in self.order.kinds() {
            for object in diff.missing_of(kind) {
                if !Self::should_output(&control, object) {
                    continue;
                }
                if let Some(changes) = chain.fix_missing(object, &mut control)? {
                    emitted += changes.len();
                    emit(changes);
                }
            }

            for object in diff.unexpected_of(kind) {
                if !Self::should_output(&control, object) {
                    continue;
                }
                if let Some(changes) = chain.fix_unexpected(object, &mut control)? {
                    emitted += changes.len();
                    emit(changes);
                }
            }

            for changed in diff.changed_of(kind) {
                if !Self::should_output(&control, &changed.object) {
                    continue;
                }
                if let Some(changes) =
                    chain.fix_changed(&changed.object, &changed.differences, &mut control)?
                {
                    emitted += changes.len();
                    emit(changes);
                }
            }
        }

        info!(operations = emitted, "Change generation complete");
        Ok(())
    }

    fn should_output(control: &DiffOutputControl, object: &SchemaObject) -> bool {
        let keep = control.should_output(object);
        if !keep {
            trace!(kind = %object.kind(), key = %object.natural_key(), "Filtered out");
        }
        keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChangeGenError, GeneratorError};
    use crate::filter::{FilterMode, ObjectChangeFilter};
    use crate::generator::{
        ChangeGenerator, GeneratorResult, MissingObjectChangeGenerator, Priority,
        UnexpectedObjectChangeGenerator,
    };
    use crate::kind::ObjectKind;
    use crate::object::{ObjectName, Sequence, Table};

    struct SequenceGenerator;

    impl ChangeGenerator for SequenceGenerator {
        fn name(&self) -> &str {
            "sequence"
        }

        fn priority(&self, kind: ObjectKind) -> Priority {
            if kind == ObjectKind::Sequence {
                Priority::DEFAULT
            } else {
                Priority::NONE
            }
        }
    }

    impl MissingObjectChangeGenerator for SequenceGenerator {
        fn fix_missing(
            &self,
            object: &SchemaObject,
            _control: &mut DiffOutputControl,
            _chain: &ChangeGeneratorChain<'_>,
        ) -> GeneratorResult {
            let SchemaObject::Sequence(sequence) = object else {
                return Err(GeneratorError::UnsupportedKind(object.kind()));
            };
            if sequence.name.name == "broken_seq" {
                return Err(GeneratorError::InvalidObject("no start value".to_string()));
            }
            Ok(Some(vec![ChangeOperation::CreateSequence {
                sequence: sequence.name.clone(),
                start_value: sequence.start_value,
                increment_by: sequence.increment_by,
                min_value: None,
                max_value: None,
                cycle: false,
            }]))
        }
    }

    impl UnexpectedObjectChangeGenerator for SequenceGenerator {
        fn fix_unexpected(
            &self,
            object: &SchemaObject,
            _control: &mut DiffOutputControl,
            _chain: &ChangeGeneratorChain<'_>,
        ) -> GeneratorResult {
            let SchemaObject::Sequence(sequence) = object else {
                return Err(GeneratorError::UnsupportedKind(object.kind()));
            };
            Ok(Some(vec![ChangeOperation::DropSequence {
                sequence: sequence.name.clone(),
            }]))
        }
    }

    fn engine() -> DiffToChangeLog {
        let mut registry = GeneratorRegistry::new();
        registry
            .register_missing(SequenceGenerator)
            .register_unexpected(SequenceGenerator);
        DiffToChangeLog::new(registry).unwrap()
    }

    #[test]
    fn test_empty_diff_produces_nothing() {
        let ops = engine()
            .generate(&DiffResult::new(), DiffOutputControl::new())
            .unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_missing_before_unexpected_within_kind() {
        let diff = DiffResult::new()
            .unexpected(Sequence::new("old_seq"))
            .missing(Sequence::new("new_seq"));

        let ops = engine().generate(&diff, DiffOutputControl::new()).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], ChangeOperation::CreateSequence { .. }));
        assert!(matches!(ops[1], ChangeOperation::DropSequence { .. }));
    }

    #[test]
    fn test_unclaimed_kinds_are_skipped() {
        let diff = DiffResult::new()
            .missing(Table::new("orders"))
            .missing(Sequence::new("orders_seq"));

        let ops = engine().generate(&diff, DiffOutputControl::new()).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].subject().name, "orders_seq");
    }

    #[test]
    fn test_filtered_objects_are_skipped() {
        let diff = DiffResult::new()
            .missing(Sequence::new("orders_seq"))
            .missing(Sequence::new("tmp_seq"));
        let control = DiffOutputControl::new().with_filter(
            ObjectChangeFilter::parse(FilterMode::Exclude, "sequence:tmp_.*").unwrap(),
        );

        let ops = engine().generate(&diff, control).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].subject().name, "orders_seq");
    }

    #[test]
    fn test_failure_aborts_run() {
        let diff = DiffResult::new()
            .missing(Sequence::new("good_seq"))
            .missing(Sequence::new(ObjectName::new("broken_seq").in_schema("app")));

        let err = engine()
            .generate(&diff, DiffOutputControl::new())
            .unwrap_err();
        match err {
            ChangeGenError::GeneratorFailed { key, kind, .. } => {
                assert_eq!(kind, ObjectKind::Sequence);
                assert_eq!(key.to_string(), "app.broken_seq");
            }
            other => panic!("Expected GeneratorFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_change_set_ids() {
        let diff = DiffResult::new()
            .missing(Sequence::new("a_seq"))
            .missing(Sequence::new("b_seq"));

        let sets = engine()
            .generate_change_sets(
                &diff,
                DiffOutputControl::new(),
                &ChangeSetOptions::new("dba", "1700000000000"),
            )
            .unwrap();
        let ids: Vec<_> = sets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1700000000000-1", "1700000000000-2"]);
        assert!(sets.iter().all(|s| s.author == "dba"));
    }

    #[test]
    fn test_default_change_set_options() {
        let options = ChangeSetOptions::default();
        assert_eq!(options.author, "generated");
        assert!(options.id_root.parse::<i64>().is_ok());
    }
}
