//! The fluent condition builder (C11).
//!
//! Design Note (`spec.md` §9): the source's builder returns a nested
//! builder whose `end()` returns the parent, which in a naive translation
//! becomes a cyclic parent-pointer object. Instead, `ConditionBuilder` keeps
//! an explicit stack of open group scopes, and `group`/`end` push/pop that
//! stack — there is exactly one owned builder, never a graph of them.

use crate::bag::ValuesBag;
use crate::condition::Condition;
use crate::fieldset::FieldSet;
use crate::group::{Logical, ValuesGroup};
use crate::value::{Comparison, PatternMatch, Range, SingleValue};

/// Fluent builder for a [`Condition`]'s group tree.
///
/// Start with [`ConditionBuilder::create`], add fields with
/// [`ConditionBuilder::field`], open nested groups with
/// [`ConditionBuilder::group`] (closed with [`ConditionBuilder::end`]), and
/// finish with [`ConditionBuilder::build`].
pub struct ConditionBuilder<'a, FS: FieldSet> {
    field_set: &'a FS,
    // stack[0] is the root group under construction; later entries are
    // open nested groups, innermost last.
    stack: Vec<ValuesGroup>,
}

impl<'a, FS: FieldSet> ConditionBuilder<'a, FS> {
    /// Starts building a condition against `field_set`, with an empty AND root.
    pub fn create(field_set: &'a FS) -> Self {
        Self {
            field_set,
            stack: vec![ValuesGroup::new(Logical::And)],
        }
    }

    /// Starts (or continues) building the bag for `name` on the currently
    /// open group. Pass `force_new = true` to discard any existing bag for
    /// `name` rather than extending it.
    pub fn field(&mut self, name: impl Into<String>, force_new: bool) -> ValuesBuilder<'_, 'a, FS> {
        let name = name.into();
        let existing = if force_new {
            None
        } else {
            self.current().get_field(&name).cloned()
        };
        ValuesBuilder {
            parent: self,
            field_name: name,
            bag: existing.unwrap_or_default(),
        }
    }

    /// Opens a nested group with the given logical mode. Close it with [`Self::end`].
    pub fn group(&mut self, logical: Logical) -> &mut Self {
        self.stack.push(ValuesGroup::new(logical));
        self
    }

    /// Closes the innermost open group, attaching it as a subgroup of its parent.
    /// A no-op if only the root scope is open.
    pub fn end(&mut self) -> &mut Self {
        if self.stack.len() > 1 {
            let child = self.stack.pop().expect("checked len > 1");
            self.current_mut().add_group(child);
        }
        self
    }

    /// The currently open group (read-only).
    fn current(&self) -> &ValuesGroup {
        self.stack.last().expect("root scope always present")
    }

    /// The currently open group (mutable).
    fn current_mut(&mut self) -> &mut ValuesGroup {
        self.stack.last_mut().expect("root scope always present")
    }

    /// Finishes construction, closing any still-open nested groups, and
    /// returns the resulting [`Condition`].
    ///
    /// Takes `&mut self` rather than `self` so the common chain —
    /// `.field(...).add_single(...).end().build()` — works: `end()` hands
    /// back `&mut Self`, and a by-value `build(self)` could not be called
    /// through that reference without moving out of it.
    pub fn build(&mut self) -> Condition<'a, FS> {
        while self.stack.len() > 1 {
            self.end();
        }
        let mut stack = std::mem::take(&mut self.stack);
        let root = stack.pop().expect("root scope always present");
        Condition::new(self.field_set, root)
    }
}

/// Builder for a single field's [`ValuesBag`], returned by
/// [`ConditionBuilder::field`]. Chain `add_*` calls, then [`Self::end`] to
/// commit the bag and get the parent builder back.
pub struct ValuesBuilder<'b, 'a, FS: FieldSet> {
    parent: &'b mut ConditionBuilder<'a, FS>,
    field_name: String,
    bag: ValuesBag,
}

impl<'b, 'a, FS: FieldSet> ValuesBuilder<'b, 'a, FS> {
    /// Adds an included single value.
    #[must_use]
    pub fn add_single(mut self, value: impl Into<SingleValue>) -> Self {
        self.bag.add_single(value);
        self
    }

    /// Adds an excluded single value.
    #[must_use]
    pub fn add_excluded_single(mut self, value: impl Into<SingleValue>) -> Self {
        self.bag.add_excluded_single(value);
        self
    }

    /// Adds an included range.
    #[must_use]
    pub fn add_range(mut self, value: Range) -> Self {
        self.bag.add_range(value);
        self
    }

    /// Adds an excluded range.
    #[must_use]
    pub fn add_excluded_range(mut self, value: Range) -> Self {
        self.bag.add_excluded_range(value);
        self
    }

    /// Adds a comparison.
    #[must_use]
    pub fn add_comparison(mut self, value: Comparison) -> Self {
        self.bag.add_comparison(value);
        self
    }

    /// Adds a pattern-match.
    #[must_use]
    pub fn add_pattern_match(mut self, value: PatternMatch) -> Self {
        self.bag.add_pattern_match(value);
        self
    }

    /// Commits the bag onto the parent's currently open group and returns
    /// the parent builder.
    pub fn end(self) -> &'b mut ConditionBuilder<'a, FS> {
        self.parent.current_mut().add_field(self.field_name, self.bag);
        self.parent
    }
}
