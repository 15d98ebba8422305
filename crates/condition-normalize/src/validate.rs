//! Pass 2: `Validate` (§4.8.2), optional — only meaningful for fields
//! whose [`FieldConfig::validate`] is overridden with an actual validator
//! collaborator. The default accepts everything, so running this pass
//! against a bare field set is a no-op.

use condition_core::{ConditionError, FieldConfig, FieldSet, ValuesBag, ValuesGroup};

use crate::pipeline::{walk_bags_mut, Pass};

/// See the module docs.
pub struct Validate;

impl<FS: FieldSet> Pass<FS> for Validate {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn run(&self, group: &mut ValuesGroup, field_set: &FS) {
        walk_bags_mut(group, field_set, &mut |bag, field, field_name| {
            validate_bag(bag, field, field_name);
        });
    }
}

fn validate_bag<F: FieldConfig>(bag: &mut ValuesBag, field: &F, field_name: &str) {
    let mut errors = Vec::new();

    for v in bag.singles() {
        check(v.comparable(), field, field_name, &mut errors);
    }
    for v in bag.excluded_singles() {
        check(v.comparable(), field, field_name, &mut errors);
    }
    for r in bag.ranges() {
        check(r.lower.comparable(), field, field_name, &mut errors);
        check(r.upper.comparable(), field, field_name, &mut errors);
    }
    for r in bag.excluded_ranges() {
        check(r.lower.comparable(), field, field_name, &mut errors);
        check(r.upper.comparable(), field, field_name, &mut errors);
    }
    for c in bag.comparisons() {
        check(c.operand.comparable(), field, field_name, &mut errors);
    }
    for p in bag.pattern_matches() {
        check(p.pattern.comparable(), field, field_name, &mut errors);
    }

    for error in errors {
        bag.add_error(error);
    }
}

fn check<F: FieldConfig>(
    value: &str,
    field: &F,
    field_name: &str,
    errors: &mut Vec<ConditionError>,
) {
    if let Some(message) = field.validate(value) {
        errors.push(ConditionError::Validation {
            field_name: field_name.to_string(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{Field, FieldSetFixture};
    use condition_core::ConditionBuilder;

    #[test]
    fn rejected_value_attaches_bag_error() {
        let fs = FieldSetFixture::default().with("a", Field::default().reject("bad"));
        let mut cond = ConditionBuilder::create(&fs)
            .field("a", false)
            .add_single("bad")
            .end()
            .build();

        Validate.run(cond.root_mut(), &fs);

        assert!(cond.has_errors());
    }

    #[test]
    fn accepted_value_has_no_errors() {
        let fs = FieldSetFixture::default().with("a", Field::default().reject("bad"));
        let mut cond = ConditionBuilder::create(&fs)
            .field("a", false)
            .add_single("fine")
            .end()
            .build();

        Validate.run(cond.root_mut(), &fs);

        assert!(!cond.has_errors());
    }
}
