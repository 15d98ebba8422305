//! Pass 1: `Transform` (§4.8.1).
//!
//! Applies each field's [`FieldConfig::transform`] to every value in every
//! bag, filling in `SingleValue::normalized`. A field with no transformer
//! chain configured uses the default identity transform, so this pass is
//! always safe to run even against a bare field set.

use condition_core::{ConditionError, FieldConfig, FieldSet, SingleValue, ValuesBag, ValuesGroup};

use crate::pipeline::{walk_bags_mut, Pass};

/// See the module docs.
pub struct Transform;

impl<FS: FieldSet> Pass<FS> for Transform {
    fn name(&self) -> &'static str {
        "transform"
    }

    fn run(&self, group: &mut ValuesGroup, field_set: &FS) {
        walk_bags_mut(group, field_set, &mut |bag, field, field_name| {
            transform_bag(bag, field, field_name);
        });
    }
}

fn transform_bag<F: FieldConfig>(bag: &mut ValuesBag, field: &F, field_name: &str) {
    let mut errors = Vec::new();

    for v in bag.singles_mut() {
        apply(v, field, field_name, &mut errors);
    }
    for v in bag.excluded_singles_mut() {
        apply(v, field, field_name, &mut errors);
    }
    for r in bag.ranges_mut() {
        apply(&mut r.lower, field, field_name, &mut errors);
        apply(&mut r.upper, field, field_name, &mut errors);
    }
    for r in bag.excluded_ranges_mut() {
        apply(&mut r.lower, field, field_name, &mut errors);
        apply(&mut r.upper, field, field_name, &mut errors);
    }
    for c in bag.comparisons_mut() {
        apply(&mut c.operand, field, field_name, &mut errors);
    }
    for p in bag.pattern_matches_mut() {
        apply(&mut p.pattern, field, field_name, &mut errors);
    }

    for error in errors {
        bag.add_error(error);
    }
}

fn apply<F: FieldConfig>(
    value: &mut SingleValue,
    field: &F,
    field_name: &str,
    errors: &mut Vec<ConditionError>,
) {
    match field.transform(&value.raw) {
        Ok(normalized) => value.normalized = Some(normalized),
        Err(message) => errors.push(ConditionError::Transform {
            field_name: field_name.to_string(),
            message,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{Field, FieldSetFixture};
    use condition_core::ConditionBuilder;

    #[test]
    fn fills_normalized_form_on_every_value_kind() {
        let fs = FieldSetFixture::default().with("a", Field::default().transform_upper());
        let mut cond = ConditionBuilder::create(&fs)
            .field("a", false)
            .add_single("value")
            .end()
            .build();

        Transform.run(cond.root_mut(), &fs);

        let bag = cond.root().get_field("a").unwrap();
        assert_eq!(
            bag.singles().next().unwrap().normalized.as_deref(),
            Some("VALUE")
        );
    }

    #[test]
    fn failing_transform_attaches_bag_error() {
        struct Noop;
        impl condition_core::ValueComparison for Noop {
            fn is_equal(&self, a: &str, b: &str, _options: &dyn std::any::Any) -> bool {
                a == b
            }
        }

        struct AlwaysFails(Noop);
        impl FieldConfig for AlwaysFails {
            fn is_required(&self) -> bool {
                false
            }
            fn accept_ranges(&self) -> bool {
                true
            }
            fn accept_compares(&self) -> bool {
                true
            }
            fn accept_pattern_match(&self) -> bool {
                true
            }
            fn value_comparison(&self) -> &dyn condition_core::ValueComparison {
                &self.0
            }
            fn options(&self) -> &dyn std::any::Any {
                &()
            }
            fn transform(&self, _raw: &str) -> Result<String, String> {
                Err("rejected".to_string())
            }
        }

        let mut bag = ValuesBag::new();
        bag.add_single("value");
        transform_bag(&mut bag, &AlwaysFails(Noop), "a");
        assert!(bag.has_errors());
    }
}
