//! Run-scoped reconciliation context.
//!
//! A [`DiffOutputControl`] is created once per diff-to-changes run. Its
//! output-shaping flags are fixed at construction; its already-handled memo
//! grows as generators resolve objects as a side effect of other fixes.

use std::collections::HashSet;

use crate::filter::ObjectChangeFilter;
use crate::kind::DiffOperation;
use crate::object::{DatabaseObject, NaturalKey};

/// Output flags and already-handled memo for one run.
#[derive(Debug, Clone)]
pub struct DiffOutputControl {
    include_catalog: bool,
    include_schema: bool,
    include_tablespace: bool,
    filter: Option<ObjectChangeFilter>,
    handled_missing: HashSet<NaturalKey>,
    handled_unexpected: HashSet<NaturalKey>,
    handled_changed: HashSet<NaturalKey>,
}

impl Default for DiffOutputControl {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffOutputControl {
    /// Creates a control that emits schema and tablespace but not catalog names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_catalog: false,
            include_schema: true,
            include_tablespace: true,
            filter: None,
            handled_missing: HashSet::new(),
            handled_unexpected: HashSet::new(),
            handled_changed: HashSet::new(),
        }
    }

    /// Sets whether catalog names are emitted.
    #[must_use]
    pub fn with_catalog(mut self, include: bool) -> Self {
        self.include_catalog = include;
        self
    }

    /// Sets whether schema names are emitted.
    #[must_use]
    pub fn with_schema(mut self, include: bool) -> Self {
        self.include_schema = include;
        self
    }

    /// Sets whether tablespaces are emitted.
    #[must_use]
    pub fn with_tablespace(mut self, include: bool) -> Self {
        self.include_tablespace = include;
        self
    }

    /// Restricts which objects are output.
    #[must_use]
    pub fn with_filter(mut self, filter: ObjectChangeFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Whether catalog names are emitted.
    #[must_use]
    pub fn include_catalog(&self) -> bool {
        self.include_catalog
    }

    /// Whether schema names are emitted.
    #[must_use]
    pub fn include_schema(&self) -> bool {
        self.include_schema
    }

    /// Whether tablespaces are emitted.
    #[must_use]
    pub fn include_tablespace(&self) -> bool {
        self.include_tablespace
    }

    /// Returns true if the object passes the configured filter.
    #[must_use]
    pub fn should_output(&self, object: &dyn DatabaseObject) -> bool {
        self.filter.as_ref().is_none_or(|f| f.include(object))
    }

    fn memo(&self, operation: DiffOperation) -> &HashSet<NaturalKey> {
        match operation {
            DiffOperation::Missing => &self.handled_missing,
            DiffOperation::Unexpected => &self.handled_unexpected,
            DiffOperation::Changed => &self.handled_changed,
        }
    }

    fn memo_mut(&mut self, operation: DiffOperation) -> &mut HashSet<NaturalKey> {
        match operation {
            DiffOperation::Missing => &mut self.handled_missing,
            DiffOperation::Unexpected => &mut self.handled_unexpected,
            DiffOperation::Changed => &mut self.handled_changed,
        }
    }

    /// Returns true if the object was already resolved for this operation.
    #[must_use]
    pub fn is_already_handled<O>(&self, operation: DiffOperation, object: &O) -> bool
    where
        O: DatabaseObject + ?Sized,
    {
        self.memo(operation).contains(&object.natural_key())
    }

    /// Records the object as resolved for this operation. Idempotent.
    pub fn mark_already_handled<O>(&mut self, operation: DiffOperation, object: &O)
    where
        O: DatabaseObject + ?Sized,
    {
        self.memo_mut(operation).insert(object.natural_key());
    }

    /// Records every given object as resolved. Passing `None` is a no-op.
    pub fn mark_all_already_handled<'a, O, I>(&mut self, operation: DiffOperation, objects: I)
    where
        O: DatabaseObject + 'a,
        I: IntoIterator<Item = &'a O>,
    {
        let memo = self.memo_mut(operation);
        memo.extend(objects.into_iter().map(|o| o.natural_key()));
    }

    /// Number of objects recorded for an operation.
    #[must_use]
    pub fn handled_count(&self, operation: DiffOperation) -> usize {
        self.memo(operation).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMode;
    use crate::object::{Column, Index, SqlType, Table};

    #[test]
    fn test_default_flags() {
        let control = DiffOutputControl::new();
        assert!(!control.include_catalog());
        assert!(control.include_schema());
        assert!(control.include_tablespace());
    }

    #[test]
    fn test_mark_is_per_operation() {
        let mut control = DiffOutputControl::new();
        let table = Table::new("orders");
        control.mark_already_handled(DiffOperation::Missing, &table);

        assert!(control.is_already_handled(DiffOperation::Missing, &table));
        assert!(!control.is_already_handled(DiffOperation::Unexpected, &table));
        assert!(!control.is_already_handled(DiffOperation::Changed, &table));
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut control = DiffOutputControl::new();
        let column = Column::new("id", SqlType::BigInt).on("orders");
        control.mark_already_handled(DiffOperation::Changed, &column);
        control.mark_already_handled(DiffOperation::Changed, &column);
        assert_eq!(control.handled_count(DiffOperation::Changed), 1);
    }

    #[test]
    fn test_lookup_is_by_natural_key() {
        let mut control = DiffOutputControl::new();
        control.mark_already_handled(
            DiffOperation::Unexpected,
            &Column::new("id", SqlType::Integer).on("orders"),
        );
        let other_instance = Column::new("id", SqlType::BigInt).on("orders").not_null();
        assert!(control.is_already_handled(DiffOperation::Unexpected, &other_instance));
    }

    #[test]
    fn test_mark_none_is_noop() {
        let mut control = DiffOutputControl::new();
        let absent: Option<&Index> = None;
        control.mark_all_already_handled(DiffOperation::Missing, absent);
        assert_eq!(control.handled_count(DiffOperation::Missing), 0);

        let index = Index::new("idx", &["a"]).on("t");
        control.mark_all_already_handled(DiffOperation::Missing, Some(&index));
        assert!(control.is_already_handled(DiffOperation::Missing, &index));
    }

    #[test]
    fn test_should_output_uses_filter() {
        let control = DiffOutputControl::new().with_filter(
            ObjectChangeFilter::parse(FilterMode::Exclude, "table:audit_.*").unwrap(),
        );
        assert!(control.should_output(&Table::new("orders")));
        assert!(!control.should_output(&Table::new("audit_log")));
    }

    #[test]
    fn test_should_output_without_filter_keeps_everything() {
        let control = DiffOutputControl::new();
        assert!(control.should_output(&Table::new("audit_log")));
        assert!(control.should_output(&Index::new("idx", &["a"]).on("t")));
    }
}
