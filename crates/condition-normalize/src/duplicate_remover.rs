//! Pass 3: `DuplicateRemover` (§4.8.3).
//!
//! Within each bag (never across subgroups), drops later entries that are
//! duplicates of an earlier one under the field's
//! [`condition_core::ValueComparison::is_equal`]. First occurrence wins.

use condition_core::{Comparison, FieldConfig, FieldSet, PatternMatch, Range, ValuesBag, ValuesGroup};

use crate::pipeline::{walk_bags_mut, Pass};

/// See the module docs.
pub struct DuplicateRemover;

impl<FS: FieldSet> Pass<FS> for DuplicateRemover {
    fn name(&self) -> &'static str {
        "duplicate-remover"
    }

    fn run(&self, group: &mut ValuesGroup, field_set: &FS) {
        walk_bags_mut(group, field_set, &mut |bag, field, _field_name| {
            dedupe_bag(bag, field);
        });
    }
}

/// Scans `items` in order, keeping the first of each group of entries
/// `eq` considers equal and collecting the slot indices of the rest.
fn duplicate_slots<T>(items: &[(usize, T)], eq: impl Fn(&T, &T) -> bool) -> Vec<usize> {
    let mut survivors: Vec<&T> = Vec::new();
    let mut duplicates = Vec::new();
    for (slot, value) in items {
        if survivors.iter().any(|s| eq(s, value)) {
            duplicates.push(*slot);
        } else {
            survivors.push(value);
        }
    }
    duplicates
}

fn dedupe_bag<F: FieldConfig>(bag: &mut ValuesBag, field: &F) {
    let cmp = field.value_comparison();
    let options = field.options();

    let singles: Vec<(usize, String)> = bag
        .singles_indexed()
        .map(|(i, v)| (i, v.comparable().to_string()))
        .collect();
    for slot in duplicate_slots(&singles, |a, b| cmp.is_equal(a, b, options)) {
        bag.remove_single(slot);
    }

    let excluded: Vec<(usize, String)> = bag
        .excluded_singles_indexed()
        .map(|(i, v)| (i, v.comparable().to_string()))
        .collect();
    for slot in duplicate_slots(&excluded, |a, b| cmp.is_equal(a, b, options)) {
        bag.remove_excluded_single(slot);
    }

    let ranges: Vec<(usize, Range)> = bag.ranges_indexed().map(|(i, r)| (i, r.clone())).collect();
    for slot in duplicate_slots(&ranges, |a, b| ranges_equal(a, b, cmp, options)) {
        bag.remove_range(slot);
    }

    let excluded_ranges: Vec<(usize, Range)> = bag
        .excluded_ranges_indexed()
        .map(|(i, r)| (i, r.clone()))
        .collect();
    for slot in duplicate_slots(&excluded_ranges, |a, b| ranges_equal(a, b, cmp, options)) {
        bag.remove_excluded_range(slot);
    }

    let comparisons: Vec<(usize, Comparison)> = bag
        .comparisons_indexed()
        .map(|(i, c)| (i, c.clone()))
        .collect();
    for slot in duplicate_slots(&comparisons, |a, b| {
        a.operator == b.operator && cmp.is_equal(a.operand.comparable(), b.operand.comparable(), options)
    }) {
        bag.remove_comparison(slot);
    }

    let patterns: Vec<(usize, PatternMatch)> = bag
        .pattern_matches_indexed()
        .map(|(i, p)| (i, p.clone()))
        .collect();
    for slot in duplicate_slots(&patterns, |a, b| {
        a.kind == b.kind
            && a.case_insensitive == b.case_insensitive
            && cmp.is_equal(a.pattern.comparable(), b.pattern.comparable(), options)
    }) {
        bag.remove_pattern_match(slot);
    }
}

fn ranges_equal(
    a: &Range,
    b: &Range,
    cmp: &dyn condition_core::ValueComparison,
    options: &dyn std::any::Any,
) -> bool {
    a.lower_inclusive == b.lower_inclusive
        && a.upper_inclusive == b.upper_inclusive
        && cmp.is_equal(a.lower.comparable(), b.lower.comparable(), options)
        && cmp.is_equal(a.upper.comparable(), b.upper.comparable(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{fixture_field_set, Field, FieldSetFixture};
    use condition_core::{ComparisonOperator, ConditionBuilder, PatternKind};

    #[test]
    fn removes_duplicate_singles_keeping_first() {
        let fs = fixture_field_set();
        let mut cond = ConditionBuilder::create(&fs)
            .field("a", false)
            .add_single("x")
            .add_single("y")
            .add_single("x")
            .end()
            .build();

        DuplicateRemover.run(cond.root_mut(), &fs);

        let bag = cond.root().get_field("a").unwrap();
        let values: Vec<_> = bag.singles().map(|v| v.raw.as_str()).collect();
        assert_eq!(values, vec!["x", "y"]);
    }

    #[test]
    fn removes_duplicate_ranges_with_equal_inclusivity() {
        let fs = fixture_field_set();
        let mut cond = ConditionBuilder::create(&fs)
            .field("a", false)
            .add_range(Range::new("1", "10"))
            .add_range(Range::new("1", "10"))
            .end()
            .build();

        DuplicateRemover.run(cond.root_mut(), &fs);

        assert_eq!(cond.root().get_field("a").unwrap().ranges().count(), 1);
    }

    #[test]
    fn keeps_ranges_with_different_inclusivity() {
        let fs = fixture_field_set();
        let mut cond = ConditionBuilder::create(&fs)
            .field("a", false)
            .add_range(Range::new("1", "10"))
            .add_range(Range::new("1", "10").with_lower_inclusive(false))
            .end()
            .build();

        DuplicateRemover.run(cond.root_mut(), &fs);

        assert_eq!(cond.root().get_field("a").unwrap().ranges().count(), 2);
    }

    #[test]
    fn removes_duplicate_comparisons() {
        let fs = fixture_field_set();
        let mut cond = ConditionBuilder::create(&fs)
            .field("a", false)
            .add_comparison(Comparison::new(ComparisonOperator::GreaterThan, "5"))
            .add_comparison(Comparison::new(ComparisonOperator::GreaterThan, "5"))
            .add_comparison(Comparison::new(ComparisonOperator::LessThan, "5"))
            .end()
            .build();

        DuplicateRemover.run(cond.root_mut(), &fs);

        assert_eq!(cond.root().get_field("a").unwrap().comparisons().count(), 2);
    }

    #[test]
    fn removes_duplicate_pattern_matches() {
        let fs = fixture_field_set();
        let mut cond = ConditionBuilder::create(&fs)
            .field("a", false)
            .add_pattern_match(PatternMatch::new(PatternKind::Contains, "foo", false))
            .add_pattern_match(PatternMatch::new(PatternKind::Contains, "foo", false))
            .end()
            .build();

        DuplicateRemover.run(cond.root_mut(), &fs);

        assert_eq!(
            cond.root().get_field("a").unwrap().pattern_matches().count(),
            1
        );
    }

    #[test]
    fn does_not_cross_subgroup_boundaries() {
        let fs = FieldSetFixture::default().with("a", Field::default());
        let mut cond = ConditionBuilder::create(&fs)
            .field("a", false)
            .add_single("x")
            .end()
            .group(condition_core::Logical::Or)
            .field("a", false)
            .add_single("x")
            .end()
            .end()
            .build();

        DuplicateRemover.run(cond.root_mut(), &fs);

        assert_eq!(cond.root().get_field("a").unwrap().singles().count(), 1);
        let child = cond.root().groups().next().unwrap();
        assert_eq!(child.get_field("a").unwrap().singles().count(), 1);
    }
}
