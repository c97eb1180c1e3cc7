use crate::chain::ChangeGeneratorChain;
use crate::control::DiffOutputControl;
use crate::diff::ObjectDifferences;
use crate::error::GeneratorError;
use crate::generator::{
    ChangeGenerator, ChangedObjectChangeGenerator, GeneratorResult, MissingObjectChangeGenerator,
    Priority, UnexpectedObjectChangeGenerator,
};
use crate::kind::ObjectKind;
use crate::object::{ForeignKey, SchemaObject};
use crate::operations::ChangeOperation;

use super::{claim, unsupported};

/// Adds, drops and recreates foreign keys.
///
/// Foreign keys come last so every referenced table, key and index exists
/// by the time they are added.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForeignKeyChangeGenerator;

impl ForeignKeyChangeGenerator {
    fn add_operation(fk: &ForeignKey) -> ChangeOperation {
        ChangeOperation::AddForeignKey {
            table: fk.table.clone(),
            constraint_name: fk.name.clone(),
            columns: fk.columns.clone(),
            referenced_table: fk.referenced_table.clone(),
            referenced_columns: fk.referenced_columns.clone(),
            on_delete: fk.on_delete,
            on_update: fk.on_update,
        }
    }

    fn drop_operation(fk: &ForeignKey) -> ChangeOperation {
        ChangeOperation::DropForeignKey {
            table: fk.table.clone(),
            constraint_name: fk.name.clone(),
        }
    }

    fn cast(object: &SchemaObject) -> Result<&ForeignKey, GeneratorError> {
        match object {
            SchemaObject::ForeignKey(fk) => Ok(fk),
            other => Err(unsupported(other)),
        }
    }
}

impl ChangeGenerator for ForeignKeyChangeGenerator {
    fn name(&self) -> &str {
        "foreign_key"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::ForeignKey, kind)
    }

    fn run_after(&self) -> &[ObjectKind] {
        &[
            ObjectKind::Table,
            ObjectKind::Column,
            ObjectKind::PrimaryKey,
            ObjectKind::UniqueConstraint,
            ObjectKind::Index,
        ]
    }
}

impl MissingObjectChangeGenerator for ForeignKeyChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let fk = Self::cast(object)?;
        if fk.columns.len() != fk.referenced_columns.len() {
            return Err(GeneratorError::InvalidObject(format!(
                "foreign key {} has {} column(s) but references {}",
                fk.name.as_deref().unwrap_or("<unnamed>"),
                fk.columns.len(),
                fk.referenced_columns.len()
            )));
        }
        Ok(Some(vec![Self::add_operation(fk)]))
    }
}

impl UnexpectedObjectChangeGenerator for ForeignKeyChangeGenerator {
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let fk = Self::cast(object)?;
        Ok(Some(vec![Self::drop_operation(fk)]))
    }
}

impl ChangedObjectChangeGenerator for ForeignKeyChangeGenerator {
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let fk = Self::cast(object)?;
        if differences.is_empty() {
            return Ok(None);
        }
        Ok(Some(vec![Self::drop_operation(fk), Self::add_operation(fk)]))
    }
}
