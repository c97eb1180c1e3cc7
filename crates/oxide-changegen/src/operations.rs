//! Abstract change operations.
//!
//! This module defines the schema changes a generator can emit. They carry
//! enough structure for a renderer to produce SQL or a changelog document
//! later; nothing here renders SQL.

use serde::{Deserialize, Serialize};

use crate::object::{Column, DefaultValue, ForeignKeyAction, ObjectName, PrimaryKey, SqlType};

/// A single abstract change operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ChangeOperation {
    /// Create a new table.
    CreateTable {
        /// Table name.
        table: ObjectName,
        /// Column definitions.
        columns: Vec<Column>,
        /// Primary key declared with the table.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        primary_key: Option<PrimaryKey>,
        /// Tablespace.
        tablespace: Option<String>,
        /// Table comment.
        remarks: Option<String>,
    },

    /// Drop a table.
    DropTable {
        /// Table name.
        table: ObjectName,
        /// Whether dependent constraints are dropped too.
        cascade_constraints: bool,
    },

    /// Set or clear a table comment.
    SetTableRemarks {
        /// Table name.
        table: ObjectName,
        /// New comment.
        remarks: Option<String>,
    },

    /// Add a column to a table.
    AddColumn {
        /// Table name.
        table: ObjectName,
        /// Column definition.
        column: Column,
    },

    /// Drop a column from a table.
    DropColumn {
        /// Table name.
        table: ObjectName,
        /// Column name.
        column_name: String,
    },

    /// Change a column's data type.
    ModifyDataType {
        /// Table name.
        table: ObjectName,
        /// Column name.
        column_name: String,
        /// New data type.
        new_data_type: SqlType,
    },

    /// Make a column NOT NULL.
    AddNotNullConstraint {
        /// Table name.
        table: ObjectName,
        /// Column name.
        column_name: String,
        /// Column type, required by some databases.
        data_type: Option<SqlType>,
    },

    /// Make a column nullable.
    DropNotNullConstraint {
        /// Table name.
        table: ObjectName,
        /// Column name.
        column_name: String,
        /// Column type, required by some databases.
        data_type: Option<SqlType>,
    },

    /// Set a column default.
    AddDefaultValue {
        /// Table name.
        table: ObjectName,
        /// Column name.
        column_name: String,
        /// New default.
        default: DefaultValue,
    },

    /// Remove a column default.
    DropDefaultValue {
        /// Table name.
        table: ObjectName,
        /// Column name.
        column_name: String,
    },

    /// Set or clear a column comment.
    SetColumnRemarks {
        /// Table name.
        table: ObjectName,
        /// Column name.
        column_name: String,
        /// New comment.
        remarks: Option<String>,
    },

    /// Add a primary key.
    AddPrimaryKey {
        /// Table name.
        table: ObjectName,
        /// Constraint name.
        constraint_name: Option<String>,
        /// Key columns.
        columns: Vec<String>,
        /// Tablespace of the backing index.
        tablespace: Option<String>,
    },

    /// Drop a primary key.
    DropPrimaryKey {
        /// Table name.
        table: ObjectName,
        /// Constraint name.
        constraint_name: Option<String>,
    },

    /// Add a unique constraint.
    AddUniqueConstraint {
        /// Table name.
        table: ObjectName,
        /// Constraint name.
        constraint_name: Option<String>,
        /// Columns that form the unique constraint.
        columns: Vec<String>,
        /// Tablespace of the backing index.
        tablespace: Option<String>,
    },

    /// Drop a unique constraint.
    DropUniqueConstraint {
        /// Table name.
        table: ObjectName,
        /// Constraint name.
        constraint_name: Option<String>,
    },

    /// Create an index.
    CreateIndex {
        /// Table name.
        table: ObjectName,
        /// Index name.
        name: Option<String>,
        /// Columns to index.
        columns: Vec<String>,
        /// Whether this is a unique index.
        unique: bool,
        /// Tablespace.
        tablespace: Option<String>,
    },

    /// Drop an index.
    DropIndex {
        /// Table name (needed for some databases).
        table: ObjectName,
        /// Index name.
        name: Option<String>,
    },

    /// Add a foreign key constraint.
    AddForeignKey {
        /// Referencing table.
        table: ObjectName,
        /// Constraint name.
        constraint_name: Option<String>,
        /// Referencing columns.
        columns: Vec<String>,
        /// Referenced table.
        referenced_table: ObjectName,
        /// Referenced columns.
        referenced_columns: Vec<String>,
        /// Action on delete.
        on_delete: ForeignKeyAction,
        /// Action on update.
        on_update: ForeignKeyAction,
    },

    /// Drop a foreign key constraint.
    DropForeignKey {
        /// Referencing table.
        table: ObjectName,
        /// Constraint name.
        constraint_name: Option<String>,
    },

    /// Create a view.
    CreateView {
        /// View name.
        view: ObjectName,
        /// SELECT statement.
        definition: String,
        /// Whether to use CREATE OR REPLACE.
        replace_if_exists: bool,
    },

    /// Drop a view.
    DropView {
        /// View name.
        view: ObjectName,
    },

    /// Create a sequence.
    CreateSequence {
        /// Sequence name.
        sequence: ObjectName,
        /// First value.
        start_value: Option<i64>,
        /// Step.
        increment_by: Option<i64>,
        /// Lower bound.
        min_value: Option<i64>,
        /// Upper bound.
        max_value: Option<i64>,
        /// Whether the sequence wraps around.
        cycle: bool,
    },

    /// Alter a sequence. `None` fields are left unchanged.
    AlterSequence {
        /// Sequence name.
        sequence: ObjectName,
        /// New step.
        increment_by: Option<i64>,
        /// New lower bound.
        min_value: Option<i64>,
        /// New upper bound.
        max_value: Option<i64>,
        /// New wrap-around setting.
        cycle: Option<bool>,
    },

    /// Drop a sequence.
    DropSequence {
        /// Sequence name.
        sequence: ObjectName,
    },

    /// Create a stored procedure.
    CreateProcedure {
        /// Procedure name.
        procedure: ObjectName,
        /// Full procedure source.
        body: String,
        /// Whether to use CREATE OR REPLACE.
        replace_if_exists: bool,
    },

    /// Drop a stored procedure.
    DropProcedure {
        /// Procedure name.
        procedure: ObjectName,
    },

    /// Insert rows.
    InsertData {
        /// Target table.
        table: ObjectName,
        /// Column names.
        columns: Vec<String>,
        /// Row values, in column order.
        rows: Vec<Vec<serde_json::Value>>,
    },
}

impl ChangeOperation {
    /// Returns the object this operation acts on.
    #[must_use]
    pub fn subject(&self) -> &ObjectName {
        match self {
            Self::CreateTable { table, .. }
            | Self::DropTable { table, .. }
            | Self::SetTableRemarks { table, .. }
            | Self::AddColumn { table, .. }
            | Self::DropColumn { table, .. }
            | Self::ModifyDataType { table, .. }
            | Self::AddNotNullConstraint { table, .. }
            | Self::DropNotNullConstraint { table, .. }
            | Self::AddDefaultValue { table, .. }
            | Self::DropDefaultValue { table, .. }
            | Self::SetColumnRemarks { table, .. }
            | Self::AddPrimaryKey { table, .. }
            | Self::DropPrimaryKey { table, .. }
            | Self::AddUniqueConstraint { table, .. }
            | Self::DropUniqueConstraint { table, .. }
            | Self::CreateIndex { table, .. }
            | Self::DropIndex { table, .. }
            | Self::AddForeignKey { table, .. }
            | Self::DropForeignKey { table, .. }
            | Self::InsertData { table, .. } => table,
            Self::CreateView { view, .. } | Self::DropView { view } => view,
            Self::CreateSequence { sequence, .. }
            | Self::AlterSequence { sequence, .. }
            | Self::DropSequence { sequence } => sequence,
            Self::CreateProcedure { procedure, .. } | Self::DropProcedure { procedure } => {
                procedure
            }
        }
    }

    /// Removes qualifiers the caller asked not to emit.
    pub fn shape_output(
        &mut self,
        include_catalog: bool,
        include_schema: bool,
        include_tablespace: bool,
    ) {
        match self {
            Self::CreateTable {
                table,
                columns,
                primary_key,
                tablespace,
                ..
            } => {
                table.strip_qualifiers(include_catalog, include_schema);
                for column in columns {
                    column
                        .table
                        .strip_qualifiers(include_catalog, include_schema);
                }
                if let Some(pk) = primary_key {
                    pk.table.strip_qualifiers(include_catalog, include_schema);
                    if let Some(index) = &mut pk.backing_index {
                        index
                            .table
                            .strip_qualifiers(include_catalog, include_schema);
                    }
                    if !include_tablespace {
                        pk.tablespace = None;
                    }
                }
                if !include_tablespace {
                    *tablespace = None;
                }
            }
            Self::AddColumn { table, column } => {
                table.strip_qualifiers(include_catalog, include_schema);
                column
                    .table
                    .strip_qualifiers(include_catalog, include_schema);
            }
            Self::AddPrimaryKey {
                table, tablespace, ..
            }
            | Self::AddUniqueConstraint {
                table, tablespace, ..
            }
            | Self::CreateIndex {
                table, tablespace, ..
            } => {
                table.strip_qualifiers(include_catalog, include_schema);
                if !include_tablespace {
                    *tablespace = None;
                }
            }
            Self::AddForeignKey {
                table,
                referenced_table,
                ..
            } => {
                table.strip_qualifiers(include_catalog, include_schema);
                referenced_table.strip_qualifiers(include_catalog, include_schema);
            }
            Self::DropTable { table, .. }
            | Self::SetTableRemarks { table, .. }
            | Self::DropColumn { table, .. }
            | Self::ModifyDataType { table, .. }
            | Self::AddNotNullConstraint { table, .. }
            | Self::DropNotNullConstraint { table, .. }
            | Self::AddDefaultValue { table, .. }
            | Self::DropDefaultValue { table, .. }
            | Self::SetColumnRemarks { table, .. }
            | Self::DropPrimaryKey { table, .. }
            | Self::DropUniqueConstraint { table, .. }
            | Self::DropIndex { table, .. }
            | Self::DropForeignKey { table, .. }
            | Self::InsertData { table, .. } => {
                table.strip_qualifiers(include_catalog, include_schema);
            }
            Self::CreateView { view, .. } | Self::DropView { view } => {
                view.strip_qualifiers(include_catalog, include_schema);
            }
            Self::CreateSequence { sequence, .. }
            | Self::AlterSequence { sequence, .. }
            | Self::DropSequence { sequence } => {
                sequence.strip_qualifiers(include_catalog, include_schema);
            }
            Self::CreateProcedure { procedure, .. } | Self::DropProcedure { procedure } => {
                procedure.strip_qualifiers(include_catalog, include_schema);
            }
        }
    }

    /// Returns a human-readable description of this operation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateTable {
                table,
                primary_key: Some(pk),
                ..
            } => format!(
                "Create table '{}' with primary key ({})",
                table,
                pk.columns.join(", ")
            ),
            Self::CreateTable { table, .. } => format!("Create table '{}'", table),
            Self::DropTable { table, .. } => format!("Drop table '{}'", table),
            Self::SetTableRemarks { table, .. } => format!("Set remarks on table '{}'", table),
            Self::AddColumn { table, column } => {
                format!("Add column '{}' to table '{}'", column.name, table)
            }
            Self::DropColumn { table, column_name } => {
                format!("Drop column '{}' from table '{}'", column_name, table)
            }
            Self::ModifyDataType {
                table,
                column_name,
                new_data_type,
            } => format!(
                "Modify type of column '{}' in table '{}' to {}",
                column_name, table, new_data_type
            ),
            Self::AddNotNullConstraint {
                table, column_name, ..
            } => format!(
                "Add NOT NULL constraint to column '{}' in table '{}'",
                column_name, table
            ),
            Self::DropNotNullConstraint {
                table, column_name, ..
            } => format!(
                "Drop NOT NULL constraint from column '{}' in table '{}'",
                column_name, table
            ),
            Self::AddDefaultValue {
                table, column_name, ..
            } => format!(
                "Add default value to column '{}' in table '{}'",
                column_name, table
            ),
            Self::DropDefaultValue { table, column_name } => format!(
                "Drop default value from column '{}' in table '{}'",
                column_name, table
            ),
            Self::SetColumnRemarks {
                table, column_name, ..
            } => format!(
                "Set remarks on column '{}' in table '{}'",
                column_name, table
            ),
            Self::AddPrimaryKey { table, columns, .. } => format!(
                "Add primary key ({}) to table '{}'",
                columns.join(", "),
                table
            ),
            Self::DropPrimaryKey { table, .. } => {
                format!("Drop primary key from table '{}'", table)
            }
            Self::AddUniqueConstraint {
                table,
                constraint_name,
                columns,
                ..
            } => format!(
                "Add unique constraint '{}' ({}) to table '{}'",
                constraint_name.as_deref().unwrap_or_default(),
                columns.join(", "),
                table
            ),
            Self::DropUniqueConstraint {
                table,
                constraint_name,
            } => format!(
                "Drop unique constraint '{}' from table '{}'",
                constraint_name.as_deref().unwrap_or_default(),
                table
            ),
            Self::CreateIndex { table, name, .. } => format!(
                "Create index '{}' on table '{}'",
                name.as_deref().unwrap_or_default(),
                table
            ),
            Self::DropIndex { table, name } => format!(
                "Drop index '{}' from table '{}'",
                name.as_deref().unwrap_or_default(),
                table
            ),
            Self::AddForeignKey {
                table,
                constraint_name,
                referenced_table,
                ..
            } => format!(
                "Add foreign key '{}' from table '{}' to '{}'",
                constraint_name.as_deref().unwrap_or_default(),
                table,
                referenced_table
            ),
            Self::DropForeignKey {
                table,
                constraint_name,
            } => format!(
                "Drop foreign key '{}' from table '{}'",
                constraint_name.as_deref().unwrap_or_default(),
                table
            ),
            Self::CreateView {
                view,
                replace_if_exists,
                ..
            } => {
                if *replace_if_exists {
                    format!("Replace view '{}'", view)
                } else {
                    format!("Create view '{}'", view)
                }
            }
            Self::DropView { view } => format!("Drop view '{}'", view),
            Self::CreateSequence { sequence, .. } => format!("Create sequence '{}'", sequence),
            Self::AlterSequence { sequence, .. } => format!("Alter sequence '{}'", sequence),
            Self::DropSequence { sequence } => format!("Drop sequence '{}'", sequence),
            Self::CreateProcedure {
                procedure,
                replace_if_exists,
                ..
            } => {
                if *replace_if_exists {
                    format!("Replace procedure '{}'", procedure)
                } else {
                    format!("Create procedure '{}'", procedure)
                }
            }
            Self::DropProcedure { procedure } => format!("Drop procedure '{}'", procedure),
            Self::InsertData { table, rows, .. } => {
                format!("Insert {} row(s) into table '{}'", rows.len(), table)
            }
        }
    }
}
