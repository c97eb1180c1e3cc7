use crate::chain::ChangeGeneratorChain;
use crate::control::DiffOutputControl;
use crate::diff::ObjectDifferences;
use crate::generator::{
    ChangeGenerator, ChangedObjectChangeGenerator, GeneratorResult, MissingObjectChangeGenerator,
    Priority, UnexpectedObjectChangeGenerator,
};
use crate::kind::ObjectKind;
use crate::object::SchemaObject;
use crate::operations::ChangeOperation;

use super::{claim, unsupported};

/// Creates, drops and alters sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceChangeGenerator;

impl ChangeGenerator for SequenceChangeGenerator {
    fn name(&self) -> &str {
        "sequence"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::Sequence, kind)
    }

    fn run_before(&self) -> &[ObjectKind] {
        &[ObjectKind::Table]
    }
}

impl MissingObjectChangeGenerator for SequenceChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Sequence(sequence) = object else {
            return Err(unsupported(object));
        };
        Ok(Some(vec![ChangeOperation::CreateSequence {
            sequence: sequence.name.clone(),
            start_value: sequence.start_value,
            increment_by: sequence.increment_by,
            min_value: sequence.min_value,
            max_value: sequence.max_value,
            cycle: sequence.cycle,
        }]))
    }
}

impl UnexpectedObjectChangeGenerator for SequenceChangeGenerator {
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Sequence(sequence) = object else {
            return Err(unsupported(object));
        };
        Ok(Some(vec![ChangeOperation::DropSequence {
            sequence: sequence.name.clone(),
        }]))
    }
}

impl ChangedObjectChangeGenerator for SequenceChangeGenerator {
    /// Only `increment_by`, `min_value`, `max_value` and `cycle` can be
    /// altered in place; a differing start value is ignored.
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Sequence(sequence) = object else {
            return Err(unsupported(object));
        };

        let increment_by = sequence.increment_by.filter(|_| differences.has("increment_by"));
        let min_value = sequence.min_value.filter(|_| differences.has("min_value"));
        let max_value = sequence.max_value.filter(|_| differences.has("max_value"));
        let cycle = differences.has("cycle").then_some(sequence.cycle);

        if increment_by.is_none() && min_value.is_none() && max_value.is_none() && cycle.is_none()
        {
            return Ok(None);
        }

        Ok(Some(vec![ChangeOperation::AlterSequence {
            sequence: sequence.name.clone(),
            increment_by,
            min_value,
            max_value,
            cycle,
        }]))
    }
}
