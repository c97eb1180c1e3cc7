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

/// Adds, drops and alters columns.
///
/// Changed columns are handled per attribute: `data_type`, `nullable`,
/// `default` and `remarks` each map to their own operation, in that order.
/// Other attributes are ignored.
///
/// A dropped column is emitted in the column slot, ahead of any foreign key
/// drop on the same column. Callers targeting engines that reject that order
/// must drop such foreign keys first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnChangeGenerator;

impl ChangeGenerator for ColumnChangeGenerator {
    fn name(&self) -> &str {
        "column"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::Column, kind)
    }

    fn run_before(&self) -> &[ObjectKind] {
        &[ObjectKind::PrimaryKey, ObjectKind::Index]
    }

    fn run_after(&self) -> &[ObjectKind] {
        &[ObjectKind::Table]
    }
}

impl MissingObjectChangeGenerator for ColumnChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Column(column) = object else {
            return Err(unsupported(object));
        };
        Ok(Some(vec![ChangeOperation::AddColumn {
            table: column.table.clone(),
            column: column.clone(),
        }]))
    }
}

impl UnexpectedObjectChangeGenerator for ColumnChangeGenerator {
    fn fix_unexpected(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Column(column) = object else {
            return Err(unsupported(object));
        };
        Ok(Some(vec![ChangeOperation::DropColumn {
            table: column.table.clone(),
            column_name: column.name.clone(),
        }]))
    }
}

impl ChangedObjectChangeGenerator for ColumnChangeGenerator {
    fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Column(column) = object else {
            return Err(unsupported(object));
        };

        let table = &column.table;
        let mut changes = Vec::new();

        if differences.has("data_type") {
            changes.push(ChangeOperation::ModifyDataType {
                table: table.clone(),
                column_name: column.name.clone(),
                new_data_type: column.data_type.clone(),
            });
        }

        if differences.has("nullable") {
            changes.push(if column.nullable {
                ChangeOperation::DropNotNullConstraint {
                    table: table.clone(),
                    column_name: column.name.clone(),
                    data_type: Some(column.data_type.clone()),
                }
            } else {
                ChangeOperation::AddNotNullConstraint {
                    table: table.clone(),
                    column_name: column.name.clone(),
                    data_type: Some(column.data_type.clone()),
                }
            });
        }

        if differences.has("default") {
            changes.push(if column.default.is_set() {
                ChangeOperation::AddDefaultValue {
                    table: table.clone(),
                    column_name: column.name.clone(),
                    default: column.default.clone(),
                }
            } else {
                ChangeOperation::DropDefaultValue {
                    table: table.clone(),
                    column_name: column.name.clone(),
                }
            });
        }

        if differences.has("remarks") {
            changes.push(ChangeOperation::SetColumnRemarks {
                table: table.clone(),
                column_name: column.name.clone(),
                remarks: column.remarks.clone(),
            });
        }

        Ok(Some(changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Column, DefaultValue, SqlType};
    use crate::registry::GeneratorRegistry;

    fn fix(column: Column, differences: &ObjectDifferences) -> Option<Vec<ChangeOperation>> {
        let registry = GeneratorRegistry::new();
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        ColumnChangeGenerator
            .fix_changed(
                &SchemaObject::Column(column),
                differences,
                &mut control,
                &chain,
            )
            .unwrap()
    }

    #[test]
    fn test_type_and_nullability() {
        let column = Column::new("email", SqlType::Varchar(320))
            .on("users")
            .not_null();
        let differences = ObjectDifferences::new()
            .with("data_type", "VARCHAR(320)", "VARCHAR(255)")
            .with("nullable", false, true);

        let ops = fix(column, &differences).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0],
            ChangeOperation::ModifyDataType { new_data_type: SqlType::Varchar(320), .. }
        ));
        assert!(matches!(&ops[1], ChangeOperation::AddNotNullConstraint { .. }));
    }

    #[test]
    fn test_default_removed() {
        let column = Column::new("status", SqlType::Text).on("orders");
        let differences = ObjectDifferences::new().with("default", serde_json::Value::Null, "'new'");

        let ops = fix(column, &differences).unwrap();
        assert_eq!(
            ops,
            vec![ChangeOperation::DropDefaultValue {
                table: "orders".into(),
                column_name: "status".to_string(),
            }]
        );
    }

    #[test]
    fn test_default_added() {
        let column = Column::new("active", SqlType::Boolean)
            .on("users")
            .default(DefaultValue::Bool(true));
        let differences = ObjectDifferences::new().with("default", true, serde_json::Value::Null);

        let ops = fix(column, &differences).unwrap();
        assert!(matches!(
            &ops[0],
            ChangeOperation::AddDefaultValue { default: DefaultValue::Bool(true), .. }
        ));
    }

    #[test]
    fn test_unknown_attributes_produce_nothing() {
        let column = Column::new("id", SqlType::BigInt).on("users");
        let differences = ObjectDifferences::new().with("ordinal_position", 1, 2);

        // An empty list is treated as declined by the chain.
        assert_eq!(fix(column, &differences), Some(Vec::new()));
    }
}
