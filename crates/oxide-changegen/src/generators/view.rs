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

/// Creates, drops and replaces views.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewChangeGenerator;

impl ChangeGenerator for ViewChangeGenerator {
    fn name(&self) -> &str {
        "view"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::View, kind)
    }

    fn run_after(&self) -> &[ObjectKind] {
        &[ObjectKind::Table, ObjectKind::Column]
    }
}

impl MissingObjectChangeGenerator for ViewChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::View(view) = object else {
            return Err(unsupported(object));
        };
        Ok(Some(vec![ChangeOperation::CreateView {
            view: view.name.clone(),
            definition: view.definition.clone(),
            replace_if_exists: false,
        }]))
    }
}

impl UnexpectedObjectChangeGenerator for ViewChangeGenerator {
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::View(view) = object else {
            return Err(unsupported(object));
        };
        Ok(Some(vec![ChangeOperation::DropView {
            view: view.name.clone(),
        }]))
    }
}

impl ChangedObjectChangeGenerator for ViewChangeGenerator {
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::View(view) = object else {
            return Err(unsupported(object));
        };
        if !differences.has("definition") {
            return Ok(None);
        }
        Ok(Some(vec![ChangeOperation::CreateView {
            view: view.name.clone(),
            definition: view.definition.clone(),
            replace_if_exists: true,
        }]))
    }
}
