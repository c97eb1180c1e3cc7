use crate::chain::ChangeGeneratorChain;
use crate::control::DiffOutputControl;
use crate::error::GeneratorError;
use crate::generator::{ChangeGenerator, GeneratorResult, MissingObjectChangeGenerator, Priority};
use crate::kind::ObjectKind;
use crate::object::SchemaObject;
use crate::operations::ChangeOperation;

use super::{claim, unsupported};

/// Inserts the rows of tables whose content is missing.
///
/// Rows go in before foreign keys are added, so referencing rows never
/// trip a constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataChangeGenerator;

impl ChangeGenerator for DataChangeGenerator {
    fn name(&self) -> &str {
        "data"
    }

    fn priority(&self, kind: ObjectKind) -> Priority {
        claim(ObjectKind::Data, kind)
    }

    fn run_before(&self) -> &[ObjectKind] {
        &[ObjectKind::ForeignKey]
    }

    fn run_after(&self) -> &[ObjectKind] {
        &[ObjectKind::Table, ObjectKind::Column, ObjectKind::PrimaryKey]
    }
}

impl MissingObjectChangeGenerator for DataChangeGenerator {
    fn fix_missing(
        &self,
        object: &SchemaObject,
        _control: &mut DiffOutputControl,
        _chain: &ChangeGeneratorChain<'_>,
    ) -> GeneratorResult {
        let SchemaObject::Data(data) = object else {
            return Err(unsupported(object));
        };
        if data.rows.is_empty() {
            return Ok(None);
        }
        if let Some(row) = data.rows.iter().find(|r| r.len() != data.columns.len()) {
            return Err(GeneratorError::InvalidObject(format!(
                "row for {} has {} value(s), expected {}",
                data.table,
                row.len(),
                data.columns.len()
            )));
        }
        Ok(Some(vec![ChangeOperation::InsertData {
            table: data.table.clone(),
            columns: data.columns.clone(),
            rows: data.rows.clone(),
        }]))
    }
}
