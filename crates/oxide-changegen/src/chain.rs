//! Per-object generator dispatch.
//!
//! The chain looks up the candidates for an object's kind and operation and
//! invokes the highest-priority one. Dispatch is single: if that generator
//! declines or returns nothing, no lower-priority candidate is tried.
//! Generators receive the chain itself so they can request fixes for related
//! objects; those go through the same already-handled check.

use tracing::{debug, trace};

use crate::control::DiffOutputControl;
use crate::diff::ObjectDifferences;
use crate::error::{ChangeGenError, GeneratorError, Result};
use crate::kind::DiffOperation;
use crate::object::{DatabaseObject, SchemaObject};
use crate::operations::ChangeOperation;
use crate::registry::{GeneratorRegistry, RegisteredGenerator};

/// Dispatches fixes to registered generators.
#[derive(Debug, Clone, Copy)]
pub struct ChangeGeneratorChain<'a> {
    registry: &'a GeneratorRegistry,
}

impl<'a> ChangeGeneratorChain<'a> {
    /// Creates a chain over a registry.
    #[must_use]
    pub fn new(registry: &'a GeneratorRegistry) -> Self {
        Self { registry }
    }

    /// Fixes an object missing from the comparison schema.
    ///
    /// Returns `Ok(None)` when the object was already handled, no generator
    /// claims it, or the chosen generator produced nothing.
    pub fn fix_missing(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
    ) -> Result<Option<Vec<ChangeOperation>>> {
        self.dispatch(DiffOperation::Missing, object, control, |generator, control| {
            match generator {
                RegisteredGenerator::Missing(g) => g.fix_missing(object, control, self),
                _ => Ok(None),
            }
        })
    }

    /// Fixes an object the comparison schema has but the reference lacks.
    pub fn fix_unexpected(
        &self,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
    ) -> Result<Option<Vec<ChangeOperation>>> {
        self.dispatch(DiffOperation::Unexpected, object, control, |generator, control| {
            match generator {
                RegisteredGenerator::Unexpected(g) => g.fix_unexpected(object, control, self),
                _ => Ok(None),
            }
        })
    }

    /// Fixes an object whose attributes differ between the schemas.
    pub fn fix_changed(
        &self,
        object: &SchemaObject,
        differences: &ObjectDifferences,
        control: &mut DiffOutputControl,
    ) -> Result<Option<Vec<ChangeOperation>>> {
        self.dispatch(DiffOperation::Changed, object, control, |generator, control| {
            match generator {
                RegisteredGenerator::Changed(g) => {
                    g.fix_changed(object, differences, control, self)
                }
                _ => Ok(None),
            }
        })
    }

    fn dispatch<F>(
        &self,
        operation: DiffOperation,
        object: &SchemaObject,
        control: &mut DiffOutputControl,
        invoke: F,
    ) -> Result<Option<Vec<ChangeOperation>>>
    where
        F: FnOnce(
            &RegisteredGenerator,
            &mut DiffOutputControl,
        ) -> std::result::Result<Option<Vec<ChangeOperation>>, GeneratorError>,
    {
        let kind = object.kind();

        if control.is_already_handled(operation, object) {
            trace!(
                %kind,
                key = %object.natural_key(),
                %operation,
                "Already handled, skipping"
            );
            return Ok(None);
        }

        let Some(generator) = self
            .registry
            .candidates_for(kind, operation)
            .into_iter()
            .next()
        else {
            trace!(%kind, %operation, "No generator claims this kind");
            return Ok(None);
        };

        debug!(
            generator = generator.name(),
            %kind,
            key = %object.natural_key(),
            %operation,
            "Dispatching fix"
        );

        // Marked before invoking so a generator recursing back to this
        // object through the chain cannot fix it twice.
        control.mark_already_handled(operation, object);

        let changes = invoke(generator, control).map_err(|source| {
            ChangeGenError::GeneratorFailed {
                generator: generator.name().to_string(),
                kind,
                key: object.natural_key(),
                operation,
                source,
            }
        })?;

        match changes {
            Some(mut changes) if !changes.is_empty() => {
                for change in &mut changes {
                    change.shape_output(
                        control.include_catalog(),
                        control.include_schema(),
                        control.include_tablespace(),
                    );
                }
                Ok(Some(changes))
            }
            _ => {
                trace!(generator = generator.name(), %kind, %operation, "Generator declined");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{
        ChangeGenerator, ChangedObjectChangeGenerator, GeneratorResult,
        MissingObjectChangeGenerator, Priority,
    };
    use crate::kind::ObjectKind;
    use crate::object::{Column, ObjectName, SqlType, Table};

    /// Creates the table and, through the chain, its columns.
    struct CreateTableWithColumns;

    impl ChangeGenerator for CreateTableWithColumns {
        fn name(&self) -> &str {
            "create_table_with_columns"
        }

        fn priority(&self, kind: ObjectKind) -> Priority {
            if kind == ObjectKind::Table {
                Priority::DEFAULT
            } else {
                Priority::NONE
            }
        }
    }

    impl MissingObjectChangeGenerator for CreateTableWithColumns {
        fn fix_missing(
            &self,
            object: &SchemaObject,
            control: &mut DiffOutputControl,
            chain: &ChangeGeneratorChain<'_>,
        ) -> GeneratorResult {
            let SchemaObject::Table(table) = object else {
                return Err(GeneratorError::UnsupportedKind(object.kind()));
            };
            let mut changes = vec![ChangeOperation::CreateTable {
                table: table.name.clone(),
                columns: Vec::new(),
                primary_key: None,
                tablespace: table.tablespace.clone(),
                remarks: None,
            }];
            for column in &table.columns {
                let related = SchemaObject::Column(column.clone());
                if let Some(more) = chain.fix_missing(&related, control)? {
                    changes.extend(more);
                }
            }
            Ok(Some(changes))
        }
    }

    struct AddColumn {
        priority: Priority,
        name: &'static str,
        declines: bool,
    }

    impl ChangeGenerator for AddColumn {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self, kind: ObjectKind) -> Priority {
            if kind == ObjectKind::Column {
                self.priority
            } else {
                Priority::NONE
            }
        }
    }

    impl MissingObjectChangeGenerator for AddColumn {
        fn fix_missing(
            &self,
            object: &SchemaObject,
            _control: &mut DiffOutputControl,
            _chain: &ChangeGeneratorChain<'_>,
        ) -> GeneratorResult {
            match object {
                SchemaObject::Column(_) if self.declines => Ok(None),
                SchemaObject::Column(column) => Ok(Some(vec![ChangeOperation::AddColumn {
                    table: column.table.clone(),
                    column: column.clone(),
                }])),
                other => Err(GeneratorError::UnsupportedKind(other.kind())),
            }
        }
    }

    struct Failing;

    impl ChangeGenerator for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn priority(&self, _kind: ObjectKind) -> Priority {
            Priority::DEFAULT
        }
    }

    impl ChangedObjectChangeGenerator for Failing {
        fn fix_changed(
            &self,
            _object: &SchemaObject,
            _differences: &ObjectDifferences,
            _control: &mut DiffOutputControl,
            _chain: &ChangeGeneratorChain<'_>,
        ) -> GeneratorResult {
            Err(GeneratorError::Other("boom".to_string()))
        }
    }

    fn orders() -> Table {
        Table::new(ObjectName::new("orders").in_schema("sales"))
            .column(Column::new("id", SqlType::BigInt).not_null())
    }

    #[test]
    fn test_no_candidates_is_not_an_error() {
        let registry = GeneratorRegistry::new();
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let result = chain
            .fix_missing(&SchemaObject::Table(orders()), &mut control)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_already_handled_skips_generator() {
        let mut registry = GeneratorRegistry::new();
        registry.register_missing(CreateTableWithColumns);
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let table = orders();
        control.mark_already_handled(DiffOperation::Missing, &table);

        let result = chain
            .fix_missing(&SchemaObject::Table(table), &mut control)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_recursive_fix_marks_related_object() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register_missing(CreateTableWithColumns)
            .register_missing(AddColumn {
                priority: Priority::DEFAULT,
                name: "add_column",
                declines: false,
            });
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let table = orders();

        let changes = chain
            .fix_missing(&SchemaObject::Table(table.clone()), &mut control)
            .unwrap()
            .unwrap();
        assert_eq!(changes.len(), 2);

        // The driver reaching the column afterwards gets nothing.
        let column = SchemaObject::Column(table.columns[0].clone());
        assert!(chain.fix_missing(&column, &mut control).unwrap().is_none());
    }

    #[test]
    fn test_single_dispatch_does_not_fall_through() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register_missing(AddColumn {
                priority: Priority::DEFAULT,
                name: "add_column",
                declines: false,
            })
            .register_missing(AddColumn {
                priority: Priority::DATABASE,
                name: "declining",
                declines: true,
            });
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let column = SchemaObject::Column(Column::new("id", SqlType::BigInt).on("orders"));

        assert!(chain.fix_missing(&column, &mut control).unwrap().is_none());
    }

    #[test]
    fn test_output_is_shaped_by_control() {
        let mut registry = GeneratorRegistry::new();
        registry.register_missing(CreateTableWithColumns);
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new().with_schema(false);

        let changes = chain
            .fix_missing(&SchemaObject::Table(orders()), &mut control)
            .unwrap()
            .unwrap();
        assert_eq!(changes[0].subject(), &ObjectName::new("orders"));
    }

    #[test]
    fn test_generator_failure_carries_context() {
        let mut registry = GeneratorRegistry::new();
        registry.register_changed(Failing);
        let chain = ChangeGeneratorChain::new(&registry);
        let mut control = DiffOutputControl::new();
        let column = SchemaObject::Column(Column::new("total", SqlType::Double).on("orders"));

        let err = chain
            .fix_changed(&column, &ObjectDifferences::new(), &mut control)
            .unwrap_err();
        match &err {
            ChangeGenError::GeneratorFailed {
                generator,
                kind,
                key,
                operation,
                ..
            } => {
                assert_eq!(generator, "failing");
                assert_eq!(*kind, ObjectKind::Column);
                assert_eq!(key.to_string(), "orders.total");
                assert_eq!(*operation, DiffOperation::Changed);
            }
            other => panic!("Expected GeneratorFailed, got {other:?}"),
        }
        assert!(err.to_string().contains("boom"));
    }
}
