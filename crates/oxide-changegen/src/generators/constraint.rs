//! Primary key and unique constraint generators.
//!
//! Both constraints are backed by an index the database maintains on its
//! own. Whatever happens to the constraint happens to that index, so it is
//! marked handled for the same operation and never reaches the index
//! generator.

use crate::chain::ChangeGeneratorChain;
use crate::control::DiffOutputControl;
use crate::diff::ObjectDifferences;
use crate::error::GeneratorError;
use crate::generator::{
    ChangeGenerator, ChangedObjectChangeGenerator, GeneratorResult, MissingObjectChangeGenerator,
    Priority, UnexpectedObjectChangeGenerator,
};
use crate::kind::{DiffOperation, ObjectKind};
use crate::object::{PrimaryKey, SchemaObject, UniqueConstraint};
use crate::operations::ChangeOperation;

use super::{claim, unsupported};

const CONSTRAINT_RUN_AFTER: &[ObjectKind] = &[ObjectKind::Table, ObjectKind::Column];
const CONSTRAINT_RUN_BEFORE: &[ObjectKind] = &[ObjectKind::Index];

/// Adds, drops and recreates primary keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryKeyChangeGenerator;

impl PrimaryKeyChangeGenerator {
    fn add_operation(pk: &PrimaryKey) -> ChangeOperation {
        ChangeOperation::AddPrimaryKey {
            table: pk.table.clone(),
            constraint_name: pk.name.clone(),
            columns: pk.columns.clone(),
            tablespace: pk.tablespace.clone(),
        }
    }

    fn drop_operation(pk: &PrimaryKey) -> ChangeOperation {
        ChangeOperation::DropPrimaryKey {
            table: pk.table.clone(),
            constraint_name: pk.name.clone(),
        }
    }

    fn cast(object: &SchemaObject) -> Result<&PrimaryKey, GeneratorError> {
        match object {
            SchemaObject::PrimaryKey(pk) => Ok(pk),
            other => Err(unsupported(other)),
        }
    }
}

impl ChangeGenerator for PrimaryKeyChangeGenerator {
    fn name(&self) -> &str {
        "primary_key"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::PrimaryKey, kind)
    }

    fn run_before(&self) -> &[ObjectKind] {
        CONSTRAINT_RUN_BEFORE
    }

    fn run_after(&self) -> &[ObjectKind] {
        CONSTRAINT_RUN_AFTER
    }
}

impl MissingObjectChangeGenerator for PrimaryKeyChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let pk = Self::cast(object)?;
        control.mark_all_already_handled(DiffOperation::Missing, pk.backing_index.as_ref());
        Ok(Some(vec![Self::add_operation(pk)]))
    }
}

impl UnexpectedObjectChangeGenerator for PrimaryKeyChangeGenerator {
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let pk = Self::cast(object)?;
        control.mark_all_already_handled(DiffOperation::Unexpected, pk.backing_index.as_ref());
        Ok(Some(vec![Self::drop_operation(pk)]))
    }
}

impl ChangedObjectChangeGenerator for PrimaryKeyChangeGenerator {
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let pk = Self::cast(object)?;
        if differences.is_empty() {
            return Ok(None);
        }
        control.mark_all_already_handled(DiffOperation::Changed, pk.backing_index.as_ref());
        Ok(Some(vec![Self::drop_operation(pk), Self::add_operation(pk)]))
    }
}

/// Adds, drops and recreates unique constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueConstraintChangeGenerator;

impl UniqueConstraintChangeGenerator {
    fn add_operation(constraint: &UniqueConstraint) -> ChangeOperation {
        ChangeOperation::AddUniqueConstraint {
            table: constraint.table.clone(),
            constraint_name: constraint.name.clone(),
            columns: constraint.columns.clone(),
            tablespace: constraint.tablespace.clone(),
        }
    }

    fn drop_operation(constraint: &UniqueConstraint) -> ChangeOperation {
        ChangeOperation::DropUniqueConstraint {
            table: constraint.table.clone(),
            constraint_name: constraint.name.clone(),
        }
    }

    fn cast(object: &SchemaObject) -> Result<&UniqueConstraint, GeneratorError> {
        match object {
            SchemaObject::UniqueConstraint(constraint) => Ok(constraint),
            other => Err(unsupported(other)),
        }
    }
}

impl ChangeGenerator for UniqueConstraintChangeGenerator {
    fn name(&self) -> &str {
        "unique_constraint"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::UniqueConstraint, kind)
    }

    fn run_before(&self) -> &[ObjectKind] {
        CONSTRAINT_RUN_BEFORE
    }

    fn run_after(&self) -> &[ObjectKind] {
        CONSTRAINT_RUN_AFTER
    }
}

impl MissingObjectChangeGenerator for UniqueConstraintChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let constraint = Self::cast(object)?;
        control.mark_all_already_handled(DiffOperation::Missing, constraint.backing_index.as_ref());
        Ok(Some(vec![Self::add_operation(constraint)]))
    }
}

impl UnexpectedObjectChangeGenerator for UniqueConstraintChangeGenerator {
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let constraint = Self::cast(object)?;
        control.mark_all_already_handled(
            DiffOperation::Unexpected,
            constraint.backing_index.as_ref(),
        );
        Ok(Some(vec![Self::drop_operation(constraint)]))
    }
}

impl ChangedObjectChangeGenerator for UniqueConstraintChangeGenerator {
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let constraint = Self::cast(object)?;
        if differences.is_empty() {
            return Ok(None);
        }
        control.mark_all_already_handled(DiffOperation::Changed, constraint.backing_index.as_ref());
        Ok(Some(vec![Self::drop_operation(constraint), Self::add_operation(constraint)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Index;
    use crate::registry::GeneratorRegistry;

    #[test]
    fn test_missing_pk_marks_backing_index() {
        let registry = GeneratorRegistry::new();
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let pk = PrimaryKey::new(&["id"])
            .named("users_pkey")
            .on("users")
            .backed_by(Index::new("users_pkey", &["id"]).unique());

        let ops = PrimaryKeyChangeGenerator
            .fix_missing(&SchemaObject::PrimaryKey(pk.clone()), &mut control, &chain)
            .unwrap()
            .unwrap();
        assert_eq!(ops.len(), 1);
        let index = pk.backing_index.as_ref().unwrap();
        assert!(control.is_already_handled(DiffOperation::Missing, index));
        assert!(!control.is_already_handled(DiffOperation::Changed, index));
    }

    #[test]
    fn test_changed_unique_constraint_is_recreated() {
        let registry = GeneratorRegistry::new();
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let constraint = UniqueConstraint::new("uq_users_email", &["email", "tenant_id"]).on("users");
        let differences = ObjectDifferences::new().with("columns", "email, tenant_id", "email");

        let ops = UniqueConstraintChangeGenerator
            .fix_changed(
                &SchemaObject::UniqueConstraint(constraint),
                &differences,
                &mut control,
                &chain,
            )
            .unwrap()
            .unwrap();
        assert!(matches!(ops[0], ChangeOperation::DropUniqueConstraint { .. }));
        assert!(matches!(ops[1], ChangeOperation::AddUniqueConstraint { .. }));
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let registry = GeneratorRegistry::new();
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let index = SchemaObject::Index(Index::new("idx", &["a"]).on("t"));

        let err = PrimaryKeyChangeGenerator
            .fix_missing(&index, &mut control, &chain)
            .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::UnsupportedKind(ObjectKind::Index)
        ));
    }
}
