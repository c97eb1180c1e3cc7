use crate::chain::ChangeGeneratorChain;
use crate::control::DiffOutputControl;
use crate::diff::ObjectDifferences;
use crate::error::GeneratorError;
use crate::generator::{
    ChangeGenerator, ChangedObjectChangeGenerator, GeneratorResult, MissingObjectChangeGenerator,
    Priority, UnexpectedObjectChangeGenerator,
};
use crate::kind::ObjectKind;
use crate::object::{Index, SchemaObject};
use crate::operations::ChangeOperation;

use super::{claim, unsupported};

/// Creates, drops and recreates indexes.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexChangeGenerator;

impl IndexChangeGenerator {
    fn create_operation(index: &Index) -> ChangeOperation {
        ChangeOperation::CreateIndex {
            table: index.table.clone(),
            name: index.name.clone(),
            columns: index.columns.clone(),
            unique: index.unique,
            tablespace: index.tablespace.clone(),
        }
    }

    fn drop_operation(index: &Index) -> ChangeOperation {
        ChangeOperation::DropIndex {
            table: index.table.clone(),
            name: index.name.clone(),
        }
    }

    fn cast(object: &SchemaObject) -> Result<&Index, GeneratorError> {
        match object {
            SchemaObject::Index(index) => Ok(index),
            other => Err(unsupported(other)),
        }
    }
}

impl ChangeGenerator for IndexChangeGenerator {
    fn name(&self) -> &str {
        "index"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::Index, kind)
    }

    fn run_before(&self) -> &[ObjectKind] {
        &[ObjectKind::ForeignKey]
    }

    fn run_after(&self) -> &[ObjectKind] {
        &[
            ObjectKind::Table,
            ObjectKind::Column,
            ObjectKind::PrimaryKey,
            ObjectKind::UniqueConstraint,
        ]
    }
}

impl MissingObjectChangeGenerator for IndexChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let index = Self::cast(object)?;
        Ok(Some(vec![Self::create_operation(index)]))
    }
}

impl UnexpectedObjectChangeGenerator for IndexChangeGenerator {
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let index = Self::cast(object)?;
        Ok(Some(vec![Self::drop_operation(index)]))
    }
}

impl ChangedObjectChangeGenerator for IndexChangeGenerator {
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let index = Self::cast(object)?;
        if differences.is_empty() {
            return Ok(None);
        }
        Ok(Some(vec![
            Self::drop_operation(index),
            Self::create_operation(index),
        ]))
    }
}
