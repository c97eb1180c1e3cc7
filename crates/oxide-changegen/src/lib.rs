//! Diff-to-changelog synthesis for database schemas.
//!
//! `oxide-changegen` takes the result of comparing a reference schema with a
//! comparison schema and turns it into an ordered list of abstract change
//! operations:
//! - Every object kind has pluggable generators for its missing, unexpected
//!   and changed objects, selected by priority
//! - Generators declare ordering constraints between kinds, resolved once
//!   into a single global order
//! - A run-scoped context remembers objects already resolved as a side
//!   effect of another fix, so nothing is emitted twice
//!
//! # Architecture
//!
//! - **Kinds** - [`kind::ObjectKind`] and the per-kind object model in [`object`]
//! - **Diff** - The [`diff::DiffResult`] input
//! - **Generators** - Capability traits in [`generator`], built-ins in [`generators`]
//! - **Registry** - Registration and priority selection
//! - **Order** - Topological kind order with cycle detection
//! - **Chain** - Single dispatch of one fix, recursion for related objects
//! - **Driver** - [`changelog::DiffToChangeLog`], the top-level loop
//!
//! # Example
//!
//! ```rust
//! use oxide_changegen::prelude::*;
//!
//! let users = Table::new("users")
//!     .column(Column::new("id", SqlType::BigInt).not_null())
//!     .column(Column::new("email", SqlType::Varchar(255)));
//!
//! let diff = DiffResult::new()
//!     .missing(users.clone())
//!     .missing(users.columns[0].clone())
//!     .missing(users.columns[1].clone());
//!
//! let engine = DiffToChangeLog::new(standard_registry()).unwrap();
//! let changes = engine.generate(&diff, DiffOutputControl::new()).unwrap();
//!
//! // The columns were created inline with the table.
//! assert_eq!(changes.len(), 1);
//! assert_eq!(changes[0].description(), "Create table 'users'");
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the change operations for a diff file
//! oxide-changegen generate --diff diff.json
//!
//! # Group them into change sets and drop schema names
//! oxide-changegen generate --diff diff.json --change-sets --no-schema
//!
//! # Show the resolved kind order
//! oxide-changegen order
//! ```

pub mod chain;
pub mod changelog;
pub mod control;
pub mod diff;
pub mod error;
pub mod filter;
pub mod generator;
pub mod generators;
pub mod kind;
pub mod object;
pub mod operations;
pub mod order;
pub mod registry;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::chain::ChangeGeneratorChain;
    pub use crate::changelog::{ChangeSetOptions, DiffToChangeLog, GeneratedChangeSet};
    pub use crate::control::DiffOutputControl;
    pub use crate::diff::{ChangedObject, DiffResult, Difference, ObjectDifferences};
    pub use crate::error::{ChangeGenError, GeneratorError, Result};
    pub use crate::filter::{FilterMode, ObjectChangeFilter};
    pub use crate::generator::{
        ChangeGenerator, ChangedObjectChangeGenerator, GeneratorResult,
        MissingObjectChangeGenerator, Priority, UnexpectedObjectChangeGenerator,
    };
    pub use crate::generators::{register_standard, standard_registry};
    pub use crate::kind::{DiffOperation, ObjectKind};
    pub use crate::object::{
        Catalog, Column, Data, DatabaseObject, DefaultValue, ForeignKey, ForeignKeyAction, Index,
        NaturalKey, ObjectName, PrimaryKey, Schema, SchemaObject, Sequence, SqlType,
        StoredProcedure, Table, UniqueConstraint, View,
    };
    pub use crate::operations::ChangeOperation;
    pub use crate::order::KindOrder;
    pub use crate::registry::{GeneratorRegistry, RegisteredGenerator};
}
