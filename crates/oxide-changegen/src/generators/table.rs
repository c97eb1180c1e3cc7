use crate::chain::ChangeGeneratorChain;
use crate::control::DiffOutputControl;
use crate::diff::ObjectDifferences;
use crate::generator::{
    ChangeGenerator, ChangedObjectChangeGenerator, GeneratorResult, MissingObjectChangeGenerator,
    Priority, UnexpectedObjectChangeGenerator,
};
use crate::kind::{DiffOperation, ObjectKind};
use crate::object::{SchemaObject, Table};
use crate::operations::ChangeOperation;

use super::{claim, unsupported};

/// Creates, drops and comments tables.
///
/// A created table carries its columns and primary key inline, so neither
/// is added again in its own kind slot. A dropped table takes all of its
/// columns, keys, constraints and indexes with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableChangeGenerator;

impl ChangeGenerator for TableChangeGenerator {
    fn name(&self) -> &str {
        "table"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::Table, kind)
    }

    fn run_before(&self) -> &[ObjectKind] {
        &[ObjectKind::Column]
    }

    fn run_after(&self) -> &[ObjectKind] {
        &[ObjectKind::Sequence]
    }
}

impl MissingObjectChangeGenerator for TableChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Table(table) = object else {
            return Err(unsupported(object));
        };

        let op = DiffOperation::Missing;
        control.mark_all_already_handled(op, &table.columns);
        if let Some(pk) = &table.primary_key {
            control.mark_already_handled(op, pk);
            control.mark_all_already_handled(op, pk.backing_index.as_ref());
        }

        Ok(Some(vec![ChangeOperation::CreateTable {
            table: table.name.clone(),
            columns: table.columns.clone(),
            primary_key: table.primary_key.clone(),
            tablespace: table.tablespace.clone(),
            remarks: table.remarks.clone(),
        }]))
    }
}

impl UnexpectedObjectChangeGenerator for TableChangeGenerator {
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Table(table) = object else {
            return Err(unsupported(object));
        };

        mark_contents_dropped(table, control);

        Ok(Some(vec![ChangeOperation::DropTable {
            table: table.name.clone(),
            cascade_constraints: true,
        }]))
    }
}

impl ChangedObjectChangeGenerator for TableChangeGenerator {
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Table(table) = object else {
            return Err(unsupported(object));
        };

        if !differences.has("remarks") {
            return Ok(None);
        }

        Ok(Some(vec![ChangeOperation::SetTableRemarks {
            table: table.name.clone(),
            remarks: table.remarks.clone(),
        }]))
    }
}

fn mark_contents_dropped(table: &Table, control: &mut DiffOutputControl) {
    let op = DiffOperation::Unexpected;
    control.mark_all_already_handled(op, &table.columns);
    if let Some(pk) = &table.primary_key {
        control.mark_already_handled(op, pk);
        control.mark_all_already_handled(op, pk.backing_index.as_ref());
    }
    for constraint in &table.unique_constraints {
        control.mark_already_handled(op, constraint);
        control.mark_all_already_handled(op, constraint.backing_index.as_ref());
    }
    control.mark_all_already_handled(op, &table.indexes);
    for fk in &table.foreign_keys {
        control.mark_already_handled(op, fk);
        control.mark_all_already_handled(op, fk.backing_index.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Column, ForeignKey, Index, PrimaryKey, SqlType};
    use crate::registry::GeneratorRegistry;

    fn orders() -> Table {
        Table::new("orders")
            .column(Column::new("id", SqlType::BigInt).not_null())
            .column(Column::new("customer_id", SqlType::BigInt))
            .primary_key(PrimaryKey::new(&["id"]).backed_by(Index::new("orders_pkey", &["id"])))
            .index(Index::new("idx_orders_customer", &["customer_id"]))
            .foreign_key(ForeignKey::new(
                "fk_orders_customer",
                &["customer_id"],
                "customers",
                &["id"],
            ))
    }

    #[test]
    fn test_drop_marks_contents_handled() {
        let registry = GeneratorRegistry::new();
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let table = orders();

        let ops = TableChangeGenerator
            .fix_unexpected(&SchemaObject::Table(table.clone()), &mut control, &chain)
            .unwrap()
            .unwrap();
        assert_eq!(ops.len(), 1);

        let op = DiffOperation::Unexpected;
        assert!(control.is_already_handled(op, &table.columns[1]));
        assert!(control.is_already_handled(op, table.primary_key.as_ref().unwrap()));
        assert!(control.is_already_handled(
            op,
            table
                .primary_key
                .as_ref()
                .unwrap()
                .backing_index
                .as_ref()
                .unwrap()
        ));
        assert!(control.is_already_handled(op, &table.indexes[0]));
        assert!(control.is_already_handled(op, &table.foreign_keys[0]));
        // Only the unexpected memo is touched.
        assert_eq!(control.handled_count(DiffOperation::Missing), 0);
    }

    #[test]
    fn test_create_inlines_columns() {
        let registry = GeneratorRegistry::new();
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let table = orders();

        let ops = TableChangeGenerator
            .fix_missing(&SchemaObject::Table(table.clone()), &mut control, &chain)
            .unwrap()
            .unwrap();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            ChangeOperation::CreateTable {
                columns,
                primary_key,
                ..
            } => {
                assert_eq!(columns.len(), 2);
                assert_eq!(primary_key.as_ref(), table.primary_key.as_ref());
            }
            other => panic!("Expected CreateTable, got {other:?}"),
        }

        let op = DiffOperation::Missing;
        let pk = table.primary_key.as_ref().unwrap();
        assert!(control.is_already_handled(op, &table.columns[0]));
        assert!(control.is_already_handled(op, pk));
        assert!(control.is_already_handled(op, pk.backing_index.as_ref().unwrap()));
    }

    #[test]
    fn test_unrelated_change_is_ignored() {
        let registry = GeneratorRegistry::new();
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let differences = ObjectDifferences::new().with("row_count", 10, 20);

        let ops = TableChangeGenerator
            .fix_changed(
                &SchemaObject::Table(orders()),
                &differences,
                &mut control,
                &chain,
            )
            .unwrap();
        assert!(ops.is_none());
    }
}
