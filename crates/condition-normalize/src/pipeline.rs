//! The [`Pass`] trait and the [`Pipeline`] that chains passes together.

use condition_core::{Condition, FieldSet, ValuesBag, ValuesGroup};

/// One stage of the normalization pipeline.
///
/// A pass walks the whole group tree and mutates bags in place; it never
/// reorders fields or subgroups. Implementations should be cheap to
/// construct (most are unit structs) since [`Pipeline::standard`] builds a
/// fresh set on every call.
pub trait Pass<FS: FieldSet> {
    /// A short, lowercase name used in `tracing` events.
    fn name(&self) -> &'static str;

    /// Runs this pass over `group`, consulting `field_set` for per-field
    /// configuration.
    fn run(&self, group: &mut ValuesGroup, field_set: &FS);
}

/// An ordered chain of [`Pass`]es run once over a [`Condition`].
pub struct Pipeline<FS: FieldSet> {
    passes: Vec<Box<dyn Pass<FS>>>,
}

impl<FS: FieldSet> Default for Pipeline<FS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FS: FieldSet> Pipeline<FS> {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Appends a pass to the chain.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass<FS> + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// The five defined passes in their fixed order: `Transform`,
    /// `Validate`, `DuplicateRemover`, `ValuesToRange`, `RangeOptimizer`.
    pub fn standard() -> Self {
        Self::new()
            .with_pass(crate::transform::Transform)
            .with_pass(crate::validate::Validate)
            .with_pass(crate::duplicate_remover::DuplicateRemover)
            .with_pass(crate::values_to_range::ValuesToRange)
            .with_pass(crate::range_optimizer::RangeOptimizer)
    }

    /// Runs every pass in order, short-circuiting once `condition` carries
    /// any bag errors.
    pub fn run(&self, condition: &mut Condition<'_, FS>) {
        let field_set = condition.field_set();
        for pass in &self.passes {
            tracing::debug!(pass = pass.name(), "running normalization pass");
            pass.run(condition.root_mut(), field_set);
            if condition.has_errors() {
                tracing::debug!(pass = pass.name(), "short-circuiting: errors present");
                break;
            }
        }
    }
}

/// Recursively visits every field's bag in `group` (and its subgroups),
/// calling `visit(bag, field, field_name)` for each field name the field
/// set recognizes. Fields absent from `field_set` are silently skipped —
/// the parser/codec already reject unknown fields before a tree reaches
/// the pipeline.
pub(crate) fn walk_bags_mut<FS: FieldSet>(
    group: &mut ValuesGroup,
    field_set: &FS,
    visit: &mut impl FnMut(&mut ValuesBag, &FS::Field, &str),
) {
    for (name, bag) in group.fields_mut() {
        if let Some(field) = field_set.get(name) {
            visit(bag, field, name);
        }
    }
    for sub in group.groups_mut() {
        walk_bags_mut(sub, field_set, visit);
    }
}
