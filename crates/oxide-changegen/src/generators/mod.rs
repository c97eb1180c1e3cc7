//! Built-in change generators.
//!
//! One generator per object kind, each handling the missing, unexpected and
//! changed cases it supports at [`Priority::DEFAULT`]. Database-specific or
//! extension generators override them by registering with a higher priority.
//!
//! ```
//! use oxide_changegen::generators::standard_registry;
//!
//! let registry = standard_registry();
//! assert!(!registry.is_empty());
//! ```

mod column;
mod constraint;
mod data;
mod foreign_key;
mod index;
mod procedure;
mod sequence;
mod table;
mod view;

pub use column::ColumnChangeGenerator;
pub use constraint::{PrimaryKeyChangeGenerator, UniqueConstraintChangeGenerator};
pub use data::DataChangeGenerator;
pub use foreign_key::ForeignKeyChangeGenerator;
pub use index::IndexChangeGenerator;
pub use procedure::StoredProcedureChangeGenerator;
pub use sequence::SequenceChangeGenerator;
pub use table::TableChangeGenerator;
pub use view::ViewChangeGenerator;

use crate::error::GeneratorError;
use crate::generator::Priority;
use crate::kind::ObjectKind;
use crate::object::{DatabaseObject, SchemaObject};
use crate::registry::GeneratorRegistry;

/// Builds a registry holding every built-in generator.
#[must_use]
pub fn standard_registry() -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    register_standard(&mut registry);
    registry
}

/// Registers every built-in generator into an existing registry.
pub fn register_standard(registry: &mut GeneratorRegistry) -> &mut GeneratorRegistry {
    registry
        .register_missing(SequenceChangeGenerator)
        .register_unexpected(SequenceChangeGenerator)
        .register_changed(SequenceChangeGenerator)
        .register_missing(TableChangeGenerator)
        .register_unexpected(TableChangeGenerator)
        .register_changed(TableChangeGenerator)
        .register_missing(ColumnChangeGenerator)
        .register_unexpected(ColumnChangeGenerator)
        .register_changed(ColumnChangeGenerator)
        .register_missing(PrimaryKeyChangeGenerator)
        .register_unexpected(PrimaryKeyChangeGenerator)
        .register_changed(PrimaryKeyChangeGenerator)
        .register_missing(UniqueConstraintChangeGenerator)
        .register_unexpected(UniqueConstraintChangeGenerator)
        .register_changed(UniqueConstraintChangeGenerator)
        .register_missing(IndexChangeGenerator)
        .register_unexpected(IndexChangeGenerator)
        .register_changed(IndexChangeGenerator)
        .register_missing(ForeignKeyChangeGenerator)
        .register_unexpected(ForeignKeyChangeGenerator)
        .register_changed(ForeignKeyChangeGenerator)
        .register_missing(ViewChangeGenerator)
        .register_unexpected(ViewChangeGenerator)
        .register_changed(ViewChangeGenerator)
        .register_missing(StoredProcedureChangeGenerator)
        .register_unexpected(StoredProcedureChangeGenerator)
        .register_changed(StoredProcedureChangeGenerator)
        .register_missing(DataChangeGenerator)
}

/// `DEFAULT` for the generator's own kind, `NONE` otherwise.
fn claim(own: ObjectKind, kind: ObjectKind) -> Priority {
    if own == kind {
        Priority::DEFAULT
    } else {
        Priority::NONE
    }
}

fn unsupported(object: &SchemaObject) -> GeneratorError {
    GeneratorError::UnsupportedKind(object.kind())
}
