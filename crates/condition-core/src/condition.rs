//! The `{fieldSet, root}` pair produced by parsers/builders and consumed by
//! the normalization pipeline and exporters.

use crate::fieldset::FieldSet;
use crate::group::{Logical, ValuesGroup};

/// The triple `(field set, root group)`.
///
/// The field set is a borrowed, read-only collaborator for the condition's
/// lifetime; the condition owns its group tree outright.
#[derive(Debug)]
pub struct Condition<'a, FS: FieldSet> {
    field_set: &'a FS,
    root: ValuesGroup,
}

impl<'a, FS: FieldSet> Condition<'a, FS> {
    /// Wraps an already-built root group with its field set.
    pub fn new(field_set: &'a FS, root: ValuesGroup) -> Self {
        Self { field_set, root }
    }

    /// Creates an empty condition with an AND root.
    pub fn empty(field_set: &'a FS) -> Self {
        Self::new(field_set, ValuesGroup::new(Logical::And))
    }

    /// The field set this condition was built/parsed against.
    pub fn field_set(&self) -> &'a FS {
        self.field_set
    }

    /// The root group.
    pub fn root(&self) -> &ValuesGroup {
        &self.root
    }

    /// Mutable access to the root group, used during construction and by
    /// the normalization pipeline.
    pub fn root_mut(&mut self) -> &mut ValuesGroup {
        &mut self.root
    }

    /// Whether any bag in the tree has accumulated errors.
    pub fn has_errors(&self) -> bool {
        self.root.has_errors()
    }
}
