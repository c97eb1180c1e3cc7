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

/// Creates, drops and replaces stored procedures.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredProcedureChangeGenerator;

impl ChangeGenerator for StoredProcedureChangeGenerator {
    fn name(&self) -> &str {
        "stored_procedure"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::StoredProcedure, kind)
    }

    fn run_after(&self) -> &[ObjectKind] {
        &[ObjectKind::Table, ObjectKind::View]
    }
}

impl MissingObjectChangeGenerator for StoredProcedureChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::StoredProcedure(procedure) = object else {
            return Err(unsupported(object));
        };
        Ok(Some(vec![ChangeOperation::CreateProcedure {
            procedure: procedure.name.clone(),
            body: procedure.body.clone(),
            replace_if_exists: false,
        }]))
    }
}

impl UnexpectedObjectChangeGenerator for StoredProcedureChangeGenerator {
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::StoredProcedure(procedure) = object else {
            return Err(unsupported(object));
        };
        Ok(Some(vec![ChangeOperation::DropProcedure {
            procedure: procedure.name.clone(),
        }]))
    }
}

impl ChangedObjectChangeGenerator for StoredProcedureChangeGenerator {
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::StoredProcedure(procedure) = object else {
            return Err(unsupported(object));
        };
        if !differences.has("body") {
            return Ok(None);
        }
        Ok(Some(vec![ChangeOperation::CreateProcedure {
            procedure: procedure.name.clone(),
            body: procedure.body.clone(),
            replace_if_exists: true,
        }]))
    }
}
