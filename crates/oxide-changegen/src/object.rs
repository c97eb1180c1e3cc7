//! Schema object model.
//!
//! Every object kind has its own struct; [`SchemaObject`] is the tagged union
//! the engine dispatches on. Objects coming from the reference and comparison
//! snapshots are separate instances, so deduplication never relies on
//! structural equality: each object derives an explicit [`NaturalKey`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::ObjectKind;

/// SQL data types understood by the change model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Integer (32-bit).
    Integer,
    /// Big integer (64-bit).
    BigInt,
    /// Small integer (16-bit).
    SmallInt,
    /// Unbounded text.
    Text,
    /// Variable-length character string.
    Varchar(usize),
    /// Fixed-length character string.
    Char(usize),
    /// Boolean.
    Boolean,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Timestamp.
    Timestamp,
    /// Floating point (double precision).
    Double,
    /// Decimal with precision and scale.
    Decimal(u8, u8),
    /// Binary large object.
    Blob,
    /// JSON data.
    Json,
    /// UUID.
    Uuid,
    /// Any vendor type, kept verbatim.
    Other(String),
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("INTEGER"),
            Self::BigInt => f.write_str("BIGINT"),
            Self::SmallInt => f.write_str("SMALLINT"),
            Self::Text => f.write_str("TEXT"),
            Self::Varchar(len) => write!(f, "VARCHAR({len})"),
            Self::Char(len) => write!(f, "CHAR({len})"),
            Self::Boolean => f.write_str("BOOLEAN"),
            Self::Date => f.write_str("DATE"),
            Self::Time => f.write_str("TIME"),
            Self::Timestamp => f.write_str("TIMESTAMP"),
            Self::Double => f.write_str("DOUBLE"),
            Self::Decimal(p, s) => write!(f, "DECIMAL({p}, {s})"),
            Self::Blob => f.write_str("BLOB"),
            Self::Json => f.write_str("JSON"),
            Self::Uuid => f.write_str("UUID"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DefaultValue {
    /// No default value.
    #[default]
    None,
    /// NULL default.
    Null,
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// SQL expression (e.g., "CURRENT_TIMESTAMP").
    Expression(String),
}

impl DefaultValue {
    /// Returns true if a default is set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ForeignKeyAction {
    /// No action (error if referenced row is deleted/updated).
    #[default]
    NoAction,
    /// Restrict (same as NoAction but checked immediately).
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the foreign key column to NULL.
    SetNull,
    /// Set the foreign key column to its default value.
    SetDefault,
}

/// A possibly qualified object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ObjectName {
    /// Catalog name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Schema name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Unqualified name.
    pub name: String,
}

impl ObjectName {
    /// Creates an unqualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    /// Qualifies the name with a schema.
    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Qualifies the name with a catalog.
    #[must_use]
    pub fn in_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Drops the qualifiers that are not included.
    pub fn strip_qualifiers(&mut self, include_catalog: bool, include_schema: bool) {
        if !include_catalog {
            self.catalog = None;
        }
        if !include_schema {
            self.schema = None;
        }
    }

    fn key_parts(&self) -> [String; 3] {
        [
            self.catalog.clone().unwrap_or_default(),
            self.schema.clone().unwrap_or_default(),
            self.name.clone(),
        ]
    }
}

impl From<&str> for ObjectName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ObjectName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(catalog) = &self.catalog {
            write!(f, "{catalog}.")?;
        }
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        f.write_str(&self.name)
    }
}

/// Identity of an object within its kind.
///
/// `path` always has the same length for a given kind: absent qualifiers are
/// stored as empty strings so two keys compare equal exactly when every part
/// matches. `columns` is the ordered column list of multi-column constructs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NaturalKey {
    /// Kind of the keyed object.
    pub kind: ObjectKind,
    /// Containment path, outermost first.
    pub path: Vec<String>,
    /// Ordered column list, empty for single-part objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
}

impl NaturalKey {
    fn new(kind: ObjectKind, path: Vec<String>) -> Self {
        Self {
            kind,
            path,
            columns: Vec::new(),
        }
    }

    fn with_columns(mut self, columns: &[String]) -> Self {
        self.columns = columns.to_vec();
        self
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<&str> = self
            .path
            .iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect();
        f.write_str(&path.join("."))?;
        if !self.columns.is_empty() {
            write!(f, "({})", self.columns.join(", "))?;
        }
        Ok(())
    }
}

/// Common behaviour of every schema object.
pub trait DatabaseObject {
    /// Returns the object's kind.
    fn kind(&self) -> ObjectKind;

    /// Derives the object's natural key.
    fn natural_key(&self) -> NaturalKey;

    /// Returns the object's own unqualified name, if it has one.
    fn object_name(&self) -> Option<&str>;

    /// Returns the table that owns this object, for table-owned kinds.
    fn owning_table(&self) -> Option<&ObjectName> {
        None
    }
}

fn table_owned_key(kind: ObjectKind, table: &ObjectName, name: Option<&str>) -> NaturalKey {
    let mut path = table.key_parts().to_vec();
    path.push(name.unwrap_or_default().to_string());
    NaturalKey::new(kind, path)
}

/// A database catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog name.
    pub name: String,
}

impl DatabaseObject for Catalog {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Catalog
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(ObjectKind::Catalog, vec![self.name.clone()])
    }

    fn object_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// A schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Owning catalog.
    #[serde(default)]
    pub catalog: Option<String>,
    /// Schema name.
    pub name: String,
}

impl DatabaseObject for Schema {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Schema
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(
            ObjectKind::Schema,
            vec![self.catalog.clone().unwrap_or_default(), self.name.clone()],
        )
    }

    fn object_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// A column of a table or view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Owning relation.
    #[serde(default)]
    pub table: ObjectName,
    /// Column name.
    pub name: String,
    /// SQL data type.
    pub data_type: SqlType,
    /// Whether the column allows NULL values.
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Default value.
    #[serde(default)]
    pub default: DefaultValue,
    /// Whether this column auto-increments.
    #[serde(default)]
    pub auto_increment: bool,
    /// Column comment.
    #[serde(default)]
    pub remarks: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Column {
    /// Creates a nullable column with no owning table yet.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: SqlType) -> Self {
        Self {
            table: ObjectName::default(),
            name: name.into(),
            data_type,
            nullable: true,
            default: DefaultValue::None,
            auto_increment: false,
            remarks: None,
        }
    }

    /// Sets the owning relation.
    #[must_use]
    pub fn on(mut self, table: impl Into<ObjectName>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = value;
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

impl DatabaseObject for Column {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Column
    }

    fn natural_key(&self) -> NaturalKey {
        table_owned_key(ObjectKind::Column, &self.table, Some(&self.name))
    }

    fn object_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn owning_table(&self) -> Option<&ObjectName> {
        Some(&self.table)
    }
}

/// An index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Indexed table.
    #[serde(default)]
    pub table: ObjectName,
    /// Index name.
    #[serde(default)]
    pub name: Option<String>,
    /// Indexed columns, in index order.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    #[serde(default)]
    pub unique: bool,
    /// Tablespace the index lives in.
    #[serde(default)]
    pub tablespace: Option<String>,
}

impl Index {
    /// Creates a named, non-unique index.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table: ObjectName::default(),
            name: Some(name.into()),
            columns: columns.iter().map(ToString::to_string).collect(),
            unique: false,
            tablespace: None,
        }
    }

    /// Sets the indexed table.
    #[must_use]
    pub fn on(mut self, table: impl Into<ObjectName>) -> Self {
        self.table = table.into();
        self
    }

    /// Makes this a unique index.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

impl DatabaseObject for Index {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Index
    }

    fn natural_key(&self) -> NaturalKey {
        table_owned_key(ObjectKind::Index, &self.table, self.name.as_deref())
            .with_columns(&self.columns)
    }

    fn object_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn owning_table(&self) -> Option<&ObjectName> {
        Some(&self.table)
    }
}

/// A primary key constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Constrained table.
    #[serde(default)]
    pub table: ObjectName,
    /// Constraint name.
    #[serde(default)]
    pub name: Option<String>,
    /// Key columns, in key order.
    pub columns: Vec<String>,
    /// Tablespace of the backing index.
    #[serde(default)]
    pub tablespace: Option<String>,
    /// The index the database maintains for this key.
    #[serde(default)]
    pub backing_index: Option<Index>,
}

impl PrimaryKey {
    /// Creates an unnamed primary key.
    #[must_use]
    pub fn new(columns: &[&str]) -> Self {
        Self {
            table: ObjectName::default(),
            name: None,
            columns: columns.iter().map(ToString::to_string).collect(),
            tablespace: None,
            backing_index: None,
        }
    }

    /// Sets the constraint name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the constrained table.
    #[must_use]
    pub fn on(mut self, table: impl Into<ObjectName>) -> Self {
        self.table = table.into();
        if let Some(index) = &mut self.backing_index {
            index.table = self.table.clone();
        }
        self
    }

    /// Sets the backing index.
    #[must_use]
    pub fn backed_by(mut self, index: Index) -> Self {
        self.backing_index = Some(index.on(self.table.clone()));
        self
    }
}

impl DatabaseObject for PrimaryKey {
    fn kind(&self) -> ObjectKind {
        ObjectKind::PrimaryKey
    }

    fn natural_key(&self) -> NaturalKey {
        table_owned_key(ObjectKind::PrimaryKey, &self.table, self.name.as_deref())
            .with_columns(&self.columns)
    }

    fn object_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn owning_table(&self) -> Option<&ObjectName> {
        Some(&self.table)
    }
}

/// A unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    /// Constrained table.
    #[serde(default)]
    pub table: ObjectName,
    /// Constraint name.
    #[serde(default)]
    pub name: Option<String>,
    /// Columns that form the unique constraint.
    pub columns: Vec<String>,
    /// Tablespace of the backing index.
    #[serde(default)]
    pub tablespace: Option<String>,
    /// The index the database maintains for this constraint.
    #[serde(default)]
    pub backing_index: Option<Index>,
}

impl UniqueConstraint {
    /// Creates a named unique constraint.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table: ObjectName::default(),
            name: Some(name.into()),
            columns: columns.iter().map(ToString::to_string).collect(),
            tablespace: None,
            backing_index: None,
        }
    }

    /// Sets the constrained table.
    #[must_use]
    pub fn on(mut self, table: impl Into<ObjectName>) -> Self {
        self.table = table.into();
        if let Some(index) = &mut self.backing_index {
            index.table = self.table.clone();
        }
        self
    }

    /// Sets the backing index.
    #[must_use]
    pub fn backed_by(mut self, index: Index) -> Self {
        self.backing_index = Some(index.on(self.table.clone()));
        self
    }
}

impl DatabaseObject for UniqueConstraint {
    fn kind(&self) -> ObjectKind {
        ObjectKind::UniqueConstraint
    }

    fn natural_key(&self) -> NaturalKey {
        table_owned_key(
            ObjectKind::UniqueConstraint,
            &self.table,
            self.name.as_deref(),
        )
        .with_columns(&self.columns)
    }

    fn object_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn owning_table(&self) -> Option<&ObjectName> {
        Some(&self.table)
    }
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referencing table.
    #[serde(default)]
    pub table: ObjectName,
    /// Constraint name.
    #[serde(default)]
    pub name: Option<String>,
    /// Column(s) in the referencing table.
    pub columns: Vec<String>,
    /// Referenced table.
    pub referenced_table: ObjectName,
    /// Referenced column(s).
    pub referenced_columns: Vec<String>,
    /// Action on delete.
    #[serde(default)]
    pub on_delete: ForeignKeyAction,
    /// Action on update.
    #[serde(default)]
    pub on_update: ForeignKeyAction,
    /// The index some databases create for the referencing columns.
    #[serde(default)]
    pub backing_index: Option<Index>,
}

impl ForeignKey {
    /// Creates a named foreign key.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        columns: &[&str],
        referenced_table: impl Into<ObjectName>,
        referenced_columns: &[&str],
    ) -> Self {
        Self {
            table: ObjectName::default(),
            name: Some(name.into()),
            columns: columns.iter().map(ToString::to_string).collect(),
            referenced_table: referenced_table.into(),
            referenced_columns: referenced_columns.iter().map(ToString::to_string).collect(),
            on_delete: ForeignKeyAction::NoAction,
            on_update: ForeignKeyAction::NoAction,
            backing_index: None,
        }
    }

    /// Sets the referencing table.
    #[must_use]
    pub fn on(mut self, table: impl Into<ObjectName>) -> Self {
        self.table = table.into();
        if let Some(index) = &mut self.backing_index {
            index.table = self.table.clone();
        }
        self
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Sets the backing index.
    #[must_use]
    pub fn backed_by(mut self, index: Index) -> Self {
        self.backing_index = Some(index.on(self.table.clone()));
        self
    }
}

impl DatabaseObject for ForeignKey {
    fn kind(&self) -> ObjectKind {
        ObjectKind::ForeignKey
    }

    fn natural_key(&self) -> NaturalKey {
        table_owned_key(ObjectKind::ForeignKey, &self.table, self.name.as_deref())
            .with_columns(&self.columns)
    }

    fn object_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn owning_table(&self) -> Option<&ObjectName> {
        Some(&self.table)
    }
}

/// A table, with the objects it contains.
///
/// Nested objects read from JSON may leave out their `table`; they are
/// attached to the enclosing table on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableDef")]
pub struct Table {
    /// Table name.
    pub name: ObjectName,
    /// Column definitions.
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Primary key.
    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,
    /// Unique constraints.
    #[serde(default)]
    pub unique_constraints: Vec<UniqueConstraint>,
    /// Indexes.
    #[serde(default)]
    pub indexes: Vec<Index>,
    /// Outgoing foreign keys.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    /// Tablespace.
    #[serde(default)]
    pub tablespace: Option<String>,
    /// Table comment.
    #[serde(default)]
    pub remarks: Option<String>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<ObjectName>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            unique_constraints: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            tablespace: None,
            remarks: None,
        }
    }

    /// Adds a column, attaching it to this table.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column.on(self.name.clone()));
        self
    }

    /// Sets the primary key, attaching it to this table.
    #[must_use]
    pub fn primary_key(mut self, primary_key: PrimaryKey) -> Self {
        self.primary_key = Some(primary_key.on(self.name.clone()));
        self
    }

    /// Adds a unique constraint.
    #[must_use]
    pub fn unique_constraint(mut self, constraint: UniqueConstraint) -> Self {
        self.unique_constraints
            .push(constraint.on(self.name.clone()));
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index.on(self.name.clone()));
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk.on(self.name.clone()));
        self
    }

    /// Sets the tablespace.
    #[must_use]
    pub fn tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.tablespace = Some(tablespace.into());
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Points every nested column, key, constraint, index and foreign key
    /// (backing indexes included) at this table.
    pub fn attach_contents(&mut self) {
        let name = &self.name;
        for column in &mut self.columns {
            column.table = name.clone();
        }
        if let Some(pk) = &mut self.primary_key {
            pk.table = name.clone();
            attach_index(pk.backing_index.as_mut(), name);
        }
        for constraint in &mut self.unique_constraints {
            constraint.table = name.clone();
            attach_index(constraint.backing_index.as_mut(), name);
        }
        for index in &mut self.indexes {
            index.table = name.clone();
        }
        for fk in &mut self.foreign_keys {
            fk.table = name.clone();
            attach_index(fk.backing_index.as_mut(), name);
        }
    }
}

fn attach_index(index: Option<&mut Index>, table: &ObjectName) {
    if let Some(index) = index {
        index.table = table.clone();
    }
}

/// Wire form of [`Table`], before nested objects are attached.
#[derive(Deserialize)]
struct TableDef {
    name: ObjectName,
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    primary_key: Option<PrimaryKey>,
    #[serde(default)]
    unique_constraints: Vec<UniqueConstraint>,
    #[serde(default)]
    indexes: Vec<Index>,
    #[serde(default)]
    foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    tablespace: Option<String>,
    #[serde(default)]
    remarks: Option<String>,
}

impl From<TableDef> for Table {
    fn from(def: TableDef) -> Self {
        let mut table = Self {
            name: def.name,
            columns: def.columns,
            primary_key: def.primary_key,
            unique_constraints: def.unique_constraints,
            indexes: def.indexes,
            foreign_keys: def.foreign_keys,
            tablespace: def.tablespace,
            remarks: def.remarks,
        };
        table.attach_contents();
        table
    }
}

impl DatabaseObject for Table {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Table
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(ObjectKind::Table, self.name.key_parts().to_vec())
    }

    fn object_name(&self) -> Option<&str> {
        Some(&self.name.name)
    }
}

/// A view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// View name.
    pub name: ObjectName,
    /// SELECT statement defining the view.
    pub definition: String,
    /// View comment.
    #[serde(default)]
    pub remarks: Option<String>,
}

impl DatabaseObject for View {
    fn kind(&self) -> ObjectKind {
        ObjectKind::View
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(ObjectKind::View, self.name.key_parts().to_vec())
    }

    fn object_name(&self) -> Option<&str> {
        Some(&self.name.name)
    }
}

/// A sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Sequence name.
    pub name: ObjectName,
    /// First value.
    #[serde(default)]
    pub start_value: Option<i64>,
    /// Step.
    #[serde(default)]
    pub increment_by: Option<i64>,
    /// Lower bound.
    #[serde(default)]
    pub min_value: Option<i64>,
    /// Upper bound.
    #[serde(default)]
    pub max_value: Option<i64>,
    /// Whether the sequence wraps around.
    #[serde(default)]
    pub cycle: bool,
}

impl Sequence {
    /// Creates a sequence with database defaults.
    #[must_use]
    pub fn new(name: impl Into<ObjectName>) -> Self {
        Self {
            name: name.into(),
            start_value: None,
            increment_by: None,
            min_value: None,
            max_value: None,
            cycle: false,
        }
    }
}

impl DatabaseObject for Sequence {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Sequence
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(ObjectKind::Sequence, self.name.key_parts().to_vec())
    }

    fn object_name(&self) -> Option<&str> {
        Some(&self.name.name)
    }
}

/// A stored procedure or function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProcedure {
    /// Procedure name.
    pub name: ObjectName,
    /// Full procedure source.
    pub body: String,
}

impl DatabaseObject for StoredProcedure {
    fn kind(&self) -> ObjectKind {
        ObjectKind::StoredProcedure
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(ObjectKind::StoredProcedure, self.name.key_parts().to_vec())
    }

    fn object_name(&self) -> Option<&str> {
        Some(&self.name.name)
    }
}

/// The row content of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data {
    /// Table the rows belong to.
    pub table: ObjectName,
    /// Column names, in row value order.
    pub columns: Vec<String>,
    /// Row values.
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl DatabaseObject for Data {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Data
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(ObjectKind::Data, self.table.key_parts().to_vec())
    }

    fn object_name(&self) -> Option<&str> {
        Some(&self.table.name)
    }

    fn owning_table(&self) -> Option<&ObjectName> {
        Some(&self.table)
    }
}

/// Any schema object, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaObject {
    /// A catalog.
    Catalog(Catalog),
    /// A schema.
    Schema(Schema),
    /// A table.
    Table(Table),
    /// A view.
    View(View),
    /// A column.
    Column(Column),
    /// A primary key.
    PrimaryKey(PrimaryKey),
    /// A unique constraint.
    UniqueConstraint(UniqueConstraint),
    /// An index.
    Index(Index),
    /// A foreign key.
    ForeignKey(ForeignKey),
    /// A sequence.
    Sequence(Sequence),
    /// A stored procedure.
    StoredProcedure(StoredProcedure),
    /// Table data.
    Data(Data),
}

impl SchemaObject {
    fn inner(&self) -> &dyn DatabaseObject {
        match self {
            Self::Catalog(o) => o,
            Self::Schema(o) => o,
            Self::Table(o) => o,
            Self::View(o) => o,
            Self::Column(o) => o,
            Self::PrimaryKey(o) => o,
            Self::UniqueConstraint(o) => o,
            Self::Index(o) => o,
            Self::ForeignKey(o) => o,
            Self::Sequence(o) => o,
            Self::StoredProcedure(o) => o,
            Self::Data(o) => o,
        }
    }
}

impl DatabaseObject for SchemaObject {
    fn kind(&self) -> ObjectKind {
        self.inner().kind()
    }

    fn natural_key(&self) -> NaturalKey {
        self.inner().natural_key()
    }

    fn object_name(&self) -> Option<&str> {
        self.inner().object_name()
    }

    fn owning_table(&self) -> Option<&ObjectName> {
        self.inner().owning_table()
    }
}

macro_rules! impl_from_object {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for SchemaObject {
                fn from(object: $variant) -> Self {
                    Self::$variant(object)
                }
            }
        )*
    };
}

impl_from_object!(
    Catalog,
    Schema,
    Table,
    View,
    Column,
    PrimaryKey,
    UniqueConstraint,
    Index,
    ForeignKey,
    Sequence,
    StoredProcedure,
    Data,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builder_attaches_children() {
        let table = Table::new(ObjectName::new("orders").in_schema("sales"))
            .column(Column::new("id", SqlType::BigInt).not_null())
            .primary_key(PrimaryKey::new(&["id"]).backed_by(Index::new("orders_pkey", &["id"])))
            .index(Index::new("idx_orders_id", &["id"]));

        let column = table.get_column("id").unwrap();
        assert_eq!(column.table, table.name);
        let pk = table.primary_key.as_ref().unwrap();
        assert_eq!(pk.table, table.name);
        assert_eq!(pk.backing_index.as_ref().unwrap().table, table.name);
        assert_eq!(table.indexes[0].table, table.name);
    }

    #[test]
    fn test_natural_key_ignores_non_identity_attributes() {
        let reference = Column::new("email", SqlType::Varchar(255)).on("users");
        let compared = Column::new("email", SqlType::Text).on("users").not_null();
        assert_eq!(reference.natural_key(), compared.natural_key());
    }

    #[test]
    fn test_natural_key_includes_owning_relation() {
        let a = Column::new("id", SqlType::BigInt).on("users");
        let b = Column::new("id", SqlType::BigInt).on("orders");
        assert_ne!(a.natural_key(), b.natural_key());
    }

    #[test]
    fn test_natural_key_column_order_matters() {
        let a = Index::new("idx", &["a", "b"]).on("t");
        let b = Index::new("idx", &["b", "a"]).on("t");
        assert_ne!(a.natural_key(), b.natural_key());
    }

    #[test]
    fn test_natural_key_distinguishes_kinds() {
        let table = Table::new("orders");
        let view = View {
            name: ObjectName::new("orders"),
            definition: "SELECT 1".to_string(),
            remarks: None,
        };
        assert_ne!(table.natural_key(), view.natural_key());
    }

    #[test]
    fn test_natural_key_absent_qualifier_differs_from_present() {
        let unqualified = Table::new("orders");
        let qualified = Table::new(ObjectName::new("orders").in_schema("public"));
        assert_ne!(unqualified.natural_key(), qualified.natural_key());
    }

    #[test]
    fn test_natural_key_display() {
        let index = Index::new("idx_total", &["total", "placed_at"])
            .on(ObjectName::new("orders").in_schema("sales"));
        assert_eq!(
            index.natural_key().to_string(),
            "sales.orders.idx_total(total, placed_at)"
        );
    }

    #[test]
    fn test_schema_object_delegates() {
        let object = SchemaObject::from(Column::new("id", SqlType::BigInt).on("orders"));
        assert_eq!(object.kind(), ObjectKind::Column);
        assert_eq!(object.object_name(), Some("id"));
        assert_eq!(object.owning_table().unwrap().name, "orders");
    }

    #[test]
    fn test_schema_object_json_tagging() {
        let json = r#"{"kind": "table", "name": {"schema": "public", "name": "orders"}}"#;
        let object: SchemaObject = serde_json::from_str(json).unwrap();
        match object {
            SchemaObject::Table(table) => {
                assert_eq!(table.name.schema.as_deref(), Some("public"));
                assert!(table.columns.is_empty());
            }
            other => panic!("Expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_deserialized_table_attaches_nested_objects() {
        let json = r#"{
            "kind": "table",
            "name": {"schema": "sales", "name": "orders"},
            "columns": [{"name": "id", "data_type": "BigInt"}],
            "primary_key": {
                "name": "orders_pkey",
                "columns": ["id"],
                "backing_index": {"name": "orders_pkey", "columns": ["id"]}
            },
            "unique_constraints": [{"name": "uq_orders_ref", "columns": ["ref"]}],
            "indexes": [{"name": "idx_orders_ref", "columns": ["ref"]}],
            "foreign_keys": [{
                "name": "fk_orders_customer",
                "columns": ["customer_id"],
                "referenced_table": {"name": "customers"},
                "referenced_columns": ["id"]
            }]
        }"#;
        let SchemaObject::Table(table) = serde_json::from_str(json).unwrap() else {
            panic!("Expected table");
        };

        let pk = table.primary_key.as_ref().unwrap();
        assert_eq!(table.columns[0].table, table.name);
        assert_eq!(pk.table, table.name);
        assert_eq!(pk.backing_index.as_ref().unwrap().table, table.name);
        assert_eq!(table.unique_constraints[0].table, table.name);
        assert_eq!(table.indexes[0].table, table.name);
        assert_eq!(table.foreign_keys[0].table, table.name);
        assert_eq!(
            table.columns[0].natural_key(),
            Column::new("id", SqlType::BigInt)
                .on(ObjectName::new("orders").in_schema("sales"))
                .natural_key()
        );
    }
}
