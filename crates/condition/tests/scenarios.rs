//! Integration tests covering the testable properties and concrete
//! scenarios from the condition-tree specification: FilterQuery round
//! trips, the structured codec, and the normalization pipeline working
//! together against one field set.

#![allow(clippy::tests_outside_test_module)]

use std::any::Any;

use condition::{
    codec, filterquery, normalize, ConditionBuilder, ConditionError, FieldConfig, FieldSet,
    Limits, Logical, Range, ValueComparison,
};

struct NumericComparison;

impl ValueComparison for NumericComparison {
    fn is_equal(&self, a: &str, b: &str, _options: &dyn Any) -> bool {
        a == b
    }

    fn successor(&self, value: &str) -> Option<String> {
        value.parse::<i64>().ok().map(|n| (n + 1).to_string())
    }
}

struct Field {
    required: bool,
    ranges: bool,
    compares: bool,
    pattern_match: bool,
    comparison: NumericComparison,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            required: false,
            ranges: true,
            compares: true,
            pattern_match: true,
            comparison: NumericComparison,
        }
    }
}

impl Field {
    fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl FieldConfig for Field {
    fn is_required(&self) -> bool {
        self.required
    }
    fn accept_ranges(&self) -> bool {
        self.ranges
    }
    fn accept_compares(&self) -> bool {
        self.compares
    }
    fn accept_pattern_match(&self) -> bool {
        self.pattern_match
    }
    fn value_comparison(&self) -> &dyn ValueComparison {
        &self.comparison
    }
    fn options(&self) -> &dyn Any {
        &()
    }
}

#[derive(Default)]
struct Fields {
    fields: Vec<(String, Field)>,
}

impl Fields {
    fn with(mut self, name: &str, field: Field) -> Self {
        self.fields.push((name.to_string(), field));
        self
    }
}

impl FieldSet for Fields {
    type Field = Field;

    fn has(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    fn all(&self) -> Vec<(&str, &Field)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f)).collect()
    }
}

fn fields() -> Fields {
    Fields::default().with("field1", Field::default())
}

#[test]
fn e1_two_singles_on_one_field() {
    let fs = fields();
    let cond = filterquery::parse("field1: value, value2;", &fs, &Limits::default())
        .unwrap()
        .unwrap();
    let bag = cond.root().get_field("field1").unwrap();
    let singles: Vec<_> = bag.singles().map(|v| v.raw.clone()).collect();
    assert_eq!(singles, vec!["value".to_string(), "value2".to_string()]);
}

#[test]
fn e2_exclusive_range_and_excluded_range() {
    let fs = fields();
    let cond = filterquery::parse("field1: ]1 - 10[, !15 - 30;", &fs, &Limits::default())
        .unwrap()
        .unwrap();
    let bag = cond.root().get_field("field1").unwrap();
    let range = bag.ranges().next().unwrap();
    assert_eq!((range.lower.raw.as_str(), range.upper.raw.as_str()), ("1", "10"));
    assert!(!range.lower_inclusive && !range.upper_inclusive);
    let excluded = bag.excluded_ranges().next().unwrap();
    assert_eq!(
        (excluded.lower.raw.as_str(), excluded.upper.raw.as_str()),
        ("15", "30")
    );
    assert!(excluded.lower_inclusive && excluded.upper_inclusive);
}

#[test]
fn e3_pattern_matches_with_flags() {
    let fs = fields();
    let cond = filterquery::parse(
        r#"field1: ~i!*bla, ~?"(\w+|\d+)";"#,
        &fs,
        &Limits::default(),
    )
    .unwrap()
    .unwrap();
    let bag = cond.root().get_field("field1").unwrap();
    let matches: Vec<_> = bag.pattern_matches().collect();
    assert_eq!(matches[0].pattern.raw, "bla");
    assert!(matches[0].case_insensitive);
    assert_eq!(matches[1].pattern.raw, r"(\w+|\d+)");
    assert!(!matches[1].case_insensitive);
}

#[test]
fn e4_field_pair_then_and_subgroup() {
    let fs = fields();
    let cond = filterquery::parse("field1: value; (field1: v3, v4);", &fs, &Limits::default())
        .unwrap()
        .unwrap();
    assert_eq!(cond.root().field_count(), 1);
    assert_eq!(cond.root().group_count(), 1);
    let sub = cond.root().groups().next().unwrap();
    assert_eq!(sub.logical(), Logical::And);
    assert_eq!(sub.field_count(), 1);
}

#[test]
fn e5_star_prefixed_subgroup_is_or() {
    let fs = fields();
    let cond = filterquery::parse("*(field1: value, value2);", &fs, &Limits::default())
        .unwrap()
        .unwrap();
    assert_eq!(cond.root().logical(), Logical::And);
    assert_eq!(cond.root().group_count(), 1);
    let sub = cond.root().groups().next().unwrap();
    assert_eq!(sub.logical(), Logical::Or);
}

#[test]
fn e6_nesting_beyond_max_depth() {
    let fs = fields();
    let limits = Limits::default().with_max_depth(1);
    let err = filterquery::parse("((field1: v))", &fs, &limits).unwrap_err();
    assert!(matches!(
        err,
        ConditionError::GroupsNesting { max: 1, level: 2, .. }
    ));
}

#[test]
fn empty_input_is_no_condition() {
    let fs = fields();
    assert!(filterquery::parse("  ", &fs, &Limits::default())
        .unwrap()
        .is_none());
}

#[test]
fn export_quoting_matrix() {
    let fs = fields();
    let cond = filterquery::parse(
        r#"field1: "value ", "-value2", "value2-", 10.00, "10,00";"#,
        &fs,
        &Limits::default(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        filterquery::export(&cond),
        r#"field1: "value ", "-value2", "value2-", 10.00, "10,00";"#
    );
}

#[test]
fn round_trip_through_filterquery_is_stable() {
    let fs = fields();
    let cond = filterquery::parse(
        "field1: value, value2; *(field1: v3;);",
        &fs,
        &Limits::default(),
    )
    .unwrap()
    .unwrap();
    let text = filterquery::export(&cond);
    let reparsed = filterquery::parse(&text, &fs, &Limits::default())
        .unwrap()
        .unwrap();
    assert_eq!(filterquery::export(&reparsed), text);
}

#[test]
fn codec_round_trips_a_nested_condition() {
    let fs = fields();
    let cond = filterquery::parse("field1: value; *(field1: v3;);", &fs, &Limits::default())
        .unwrap()
        .unwrap();
    let doc = codec::export(&cond).unwrap();
    let reimported = codec::import(&doc, &fs, &Limits::default()).unwrap();
    assert_eq!(filterquery::export(&reimported), filterquery::export(&cond));
}

#[test]
fn normalization_dedupes_and_coalesces_into_a_range() {
    let fs = fields();
    let mut cond = filterquery::parse("field1: 1, 2, 3, 2;", &fs, &Limits::default())
        .unwrap()
        .unwrap();
    normalize::Pipeline::standard().run(&mut cond);
    let bag = cond.root().get_field("field1").unwrap();
    assert_eq!(bag.singles().count(), 0);
    let range = bag.ranges().next().unwrap();
    assert_eq!((range.lower.raw.as_str(), range.upper.raw.as_str()), ("1", "3"));
}

#[test]
fn normalization_merges_overlapping_ranges() {
    let fs = fields();
    let mut cond = filterquery::parse("field1: 1-10, 5-15;", &fs, &Limits::default())
        .unwrap()
        .unwrap();
    normalize::Pipeline::standard().run(&mut cond);
    let bag = cond.root().get_field("field1").unwrap();
    assert_eq!(bag.ranges().count(), 1);
    let range = bag.ranges().next().unwrap();
    assert_eq!((range.lower.raw.as_str(), range.upper.raw.as_str()), ("1", "15"));
}

#[test]
fn required_field_must_appear_in_every_non_empty_group() {
    let fs = Fields::default().with("field1", Field::default().required());

    // Root carries field1 directly, and so does its subgroup: satisfied
    // at both levels.
    let cond = filterquery::parse("field1: a; (field1: b;)", &fs, &Limits::default()).unwrap();
    assert!(cond.is_some());

    // The subgroup is non-empty but omits the required field.
    let other = Fields::default()
        .with("field1", Field::default().required())
        .with("other", Field::default());
    let err = filterquery::parse("field1: a; (other: b;)", &other, &Limits::default()).unwrap_err();
    assert!(matches!(err, ConditionError::FieldRequired { .. }));
}

#[test]
fn export_scenario_ranges() {
    let fs = fields();
    let mut builder = ConditionBuilder::create(&fs);
    let cond = builder
        .field("field1", false)
        .add_range(Range::new("10", "20"))
        .add_range(Range::new("30", "50"))
        .add_range(Range::new("30", "50").with_upper_inclusive(false))
        .add_range(Range::new("30", "50").with_lower_inclusive(false))
        .end()
        .build();
    assert_eq!(
        filterquery::export(&cond),
        "field1: 10-20, 30-50, 30-50[, ]30-50;"
    );
}
