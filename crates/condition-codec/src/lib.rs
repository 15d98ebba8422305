//! The structured (JSON) document codec for condition trees (C8).
//!
//! A document mirrors the condition tree directly:
//!
//! ```json
//! {
//!   "logical": "AND",
//!   "fields": {
//!     "name": {
//!       "single-values": ["value1"],
//!       "excluded-values": ["value2"],
//!       "ranges": [{"lower": "1", "upper": "10", "inclusive-lower": true, "inclusive-upper": true}],
//!       "excluded-ranges": [],
//!       "comparisons": [{"operator": ">=", "value": "5"}],
//!       "pattern-matches": [{"type": "CONTAINS", "value": "foo", "case-insensitive": false}]
//!     }
//!   },
//!   "groups": []
//! }
//! ```
//!
//! An XML encoding of the same shape is an equally valid transport but is
//! not implemented here. Field order is preserved with `indexmap::IndexMap`
//! rather than a plain `HashMap`, matching the condition tree's own
//! insertion-ordered field list — JSON object key order carries no meaning
//! to a generic parser, but it is still worth preserving for readability of
//! round-tripped documents.

#![warn(missing_docs)]

use condition_core::{
    Comparison, ComparisonOperator, Condition, ConditionError, FieldConfig, FieldSet, Limits,
    Logical, PatternKind, PatternMatch, Range, ValueKind, ValuesBag, ValuesGroup,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Parses a JSON document into a [`Condition`] against `field_set`, enforcing `limits`.
pub fn import<'a, FS: FieldSet>(
    input: &str,
    field_set: &'a FS,
    limits: &Limits,
) -> Result<Condition<'a, FS>, ConditionError> {
    let doc: GroupDoc =
        serde_json::from_str(input).map_err(|e| ConditionError::InputProcessor {
            message: e.to_string(),
        })?;
    let root = build_group(&doc, field_set, limits, 0, 0)?;
    Ok(Condition::new(field_set, root))
}

/// Renders `condition` as a pretty-printed JSON document.
pub fn export<FS: FieldSet>(condition: &Condition<'_, FS>) -> Result<String, ConditionError> {
    let doc = group_to_doc(condition.root());
    serde_json::to_string_pretty(&doc).map_err(|e| ConditionError::InputProcessor {
        message: e.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum LogicalDoc {
    And,
    Or,
}

impl From<LogicalDoc> for Logical {
    fn from(value: LogicalDoc) -> Self {
        match value {
            LogicalDoc::And => Logical::And,
            LogicalDoc::Or => Logical::Or,
        }
    }
}

impl From<Logical> for LogicalDoc {
    fn from(value: Logical) -> Self {
        match value {
            Logical::And => LogicalDoc::And,
            Logical::Or => LogicalDoc::Or,
        }
    }
}

fn default_logical() -> LogicalDoc {
    LogicalDoc::And
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct GroupDoc {
    #[serde(default = "default_logical")]
    logical: LogicalDoc,
    #[serde(default)]
    fields: IndexMap<String, BagDoc>,
    #[serde(default)]
    groups: Vec<GroupDoc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct BagDoc {
    #[serde(default)]
    single_values: Vec<String>,
    #[serde(default)]
    excluded_values: Vec<String>,
    #[serde(default)]
    ranges: Vec<RangeDoc>,
    #[serde(default)]
    excluded_ranges: Vec<RangeDoc>,
    #[serde(default)]
    comparisons: Vec<ComparisonDoc>,
    #[serde(default)]
    pattern_matches: Vec<PatternMatchDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RangeDoc {
    lower: String,
    upper: String,
    #[serde(default = "default_true")]
    inclusive_lower: bool,
    #[serde(default = "default_true")]
    inclusive_upper: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ComparisonDoc {
    operator: String,
    value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PatternMatchDoc {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(default)]
    case_insensitive: bool,
}

fn comparison_operator_from_str(s: &str) -> Option<ComparisonOperator> {
    Some(match s {
        "<" => ComparisonOperator::LessThan,
        "<=" => ComparisonOperator::LessThanOrEqual,
        "<>" => ComparisonOperator::NotEqual,
        ">" => ComparisonOperator::GreaterThan,
        ">=" => ComparisonOperator::GreaterThanOrEqual,
        _ => return None,
    })
}

fn pattern_kind_from_str(s: &str) -> Option<PatternKind> {
    Some(match s {
        "CONTAINS" => PatternKind::Contains,
        "STARTS_WITH" => PatternKind::StartsWith,
        "ENDS_WITH" => PatternKind::EndsWith,
        "REGEX" => PatternKind::Regex,
        "NOT_CONTAINS" => PatternKind::NotContains,
        "NOT_STARTS_WITH" => PatternKind::NotStartsWith,
        "NOT_ENDS_WITH" => PatternKind::NotEndsWith,
        "NOT_REGEX" => PatternKind::NotRegex,
        _ => return None,
    })
}

fn pattern_kind_to_str(kind: PatternKind) -> &'static str {
    match kind {
        PatternKind::Contains => "CONTAINS",
        PatternKind::StartsWith => "STARTS_WITH",
        PatternKind::EndsWith => "ENDS_WITH",
        PatternKind::Regex => "REGEX",
        PatternKind::NotContains => "NOT_CONTAINS",
        PatternKind::NotStartsWith => "NOT_STARTS_WITH",
        PatternKind::NotEndsWith => "NOT_ENDS_WITH",
        PatternKind::NotRegex => "NOT_REGEX",
    }
}

fn check_overflow(
    bag: &ValuesBag,
    field_name: &str,
    limits: &Limits,
    group_idx: usize,
    level: usize,
) -> Result<(), ConditionError> {
    if bag.count() > limits.max_values() {
        return Err(ConditionError::ValuesOverflow {
            field_name: field_name.to_string(),
            max: limits.max_values(),
            current: bag.count(),
            group_idx,
            level,
        });
    }
    Ok(())
}

fn build_bag<F: FieldConfig>(
    doc: &BagDoc,
    field: &F,
    field_name: &str,
    limits: &Limits,
    group_idx: usize,
    level: usize,
) -> Result<ValuesBag, ConditionError> {
    let mut bag = ValuesBag::new();

    for v in &doc.single_values {
        bag.add_single(v.clone());
        check_overflow(&bag, field_name, limits, group_idx, level)?;
    }
    for v in &doc.excluded_values {
        bag.add_excluded_single(v.clone());
        check_overflow(&bag, field_name, limits, group_idx, level)?;
    }

    if (!doc.ranges.is_empty() || !doc.excluded_ranges.is_empty()) && !field.accept_ranges() {
        return Err(ConditionError::UnsupportedValueType {
            field_name: field_name.to_string(),
            value_type: ValueKind::Range,
        });
    }
    for r in &doc.ranges {
        let range = Range::new(r.lower.clone(), r.upper.clone())
            .with_lower_inclusive(r.inclusive_lower)
            .with_upper_inclusive(r.inclusive_upper);
        bag.add_range(range);
        check_overflow(&bag, field_name, limits, group_idx, level)?;
    }
    for r in &doc.excluded_ranges {
        let range = Range::new(r.lower.clone(), r.upper.clone())
            .with_lower_inclusive(r.inclusive_lower)
            .with_upper_inclusive(r.inclusive_upper);
        bag.add_excluded_range(range);
        check_overflow(&bag, field_name, limits, group_idx, level)?;
    }

    if !doc.comparisons.is_empty() && !field.accept_compares() {
        return Err(ConditionError::UnsupportedValueType {
            field_name: field_name.to_string(),
            value_type: ValueKind::Comparison,
        });
    }
    for c in &doc.comparisons {
        let operator = comparison_operator_from_str(&c.operator).ok_or_else(|| {
            ConditionError::InputProcessor {
                message: format!("unknown comparison operator '{}'", c.operator),
            }
        })?;
        bag.add_comparison(Comparison::new(operator, c.value.clone()));
        check_overflow(&bag, field_name, limits, group_idx, level)?;
    }

    if !doc.pattern_matches.is_empty() && !field.accept_pattern_match() {
        return Err(ConditionError::UnsupportedValueType {
            field_name: field_name.to_string(),
            value_type: ValueKind::PatternMatch,
        });
    }
    for p in &doc.pattern_matches {
        let kind = pattern_kind_from_str(&p.kind).ok_or_else(|| ConditionError::InputProcessor {
            message: format!("unknown pattern-match type '{}'", p.kind),
        })?;
        bag.add_pattern_match(PatternMatch::new(kind, p.value.clone(), p.case_insensitive));
        check_overflow(&bag, field_name, limits, group_idx, level)?;
    }

    Ok(bag)
}

fn check_required_fields<FS: FieldSet>(
    group: &ValuesGroup,
    field_set: &FS,
    group_idx: usize,
    level: usize,
) -> Result<(), ConditionError> {
    if group.field_count() == 0 && group.group_count() == 0 {
        return Ok(());
    }
    for (name, field) in field_set.all() {
        if field.is_required() && !group.has_field(name) {
            return Err(ConditionError::FieldRequired {
                field_name: name.to_string(),
                group_idx,
                level,
            });
        }
    }
    Ok(())
}

fn build_group<FS: FieldSet>(
    doc: &GroupDoc,
    field_set: &FS,
    limits: &Limits,
    group_idx: usize,
    level: usize,
) -> Result<ValuesGroup, ConditionError> {
    if level > limits.max_depth() {
        return Err(ConditionError::GroupsNesting {
            max: limits.max_depth(),
            group_idx,
            level,
        });
    }

    let mut group = ValuesGroup::new(doc.logical.into());

    for (name, bag_doc) in &doc.fields {
        if !field_set.has(name) {
            return Err(ConditionError::UnknownField {
                field_name: name.clone(),
            });
        }
        let field = field_set.get(name).expect("checked has() above");
        let bag = build_bag(bag_doc, field, name, limits, group_idx, level)?;
        group.add_field(name.clone(), bag);
    }

    if doc.groups.len() > limits.max_groups() {
        return Err(ConditionError::GroupsOverflow {
            max: limits.max_groups(),
            current: doc.groups.len(),
            group_idx,
            level,
        });
    }
    for (i, child_doc) in doc.groups.iter().enumerate() {
        let child = build_group(child_doc, field_set, limits, i, level + 1)?;
        group.add_group(child);
    }

    check_required_fields(&group, field_set, group_idx, level)?;

    Ok(group)
}

fn bag_to_doc(bag: &ValuesBag) -> BagDoc {
    BagDoc {
        single_values: bag.singles().map(|v| v.raw.clone()).collect(),
        excluded_values: bag.excluded_singles().map(|v| v.raw.clone()).collect(),
        ranges: bag.ranges().map(range_to_doc).collect(),
        excluded_ranges: bag.excluded_ranges().map(range_to_doc).collect(),
        comparisons: bag
            .comparisons()
            .map(|c| ComparisonDoc {
                operator: c.operator.as_str().to_string(),
                value: c.operand.raw.clone(),
            })
            .collect(),
        pattern_matches: bag
            .pattern_matches()
            .map(|p| PatternMatchDoc {
                kind: pattern_kind_to_str(p.kind).to_string(),
                value: p.pattern.raw.clone(),
                case_insensitive: p.case_insensitive,
            })
            .collect(),
    }
}

fn range_to_doc(range: &Range) -> RangeDoc {
    RangeDoc {
        lower: range.lower.raw.clone(),
        upper: range.upper.raw.clone(),
        inclusive_lower: range.lower_inclusive,
        inclusive_upper: range.upper_inclusive,
    }
}

fn group_to_doc(group: &ValuesGroup) -> GroupDoc {
    GroupDoc {
        logical: group.logical().into(),
        fields: group
            .fields()
            .map(|(name, bag)| (name.to_string(), bag_to_doc(bag)))
            .collect(),
        groups: group.groups().map(group_to_doc).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condition_core::{FieldConfig, ValueComparison};
    use std::any::Any;

    struct PlainComparison;
    impl ValueComparison for PlainComparison {
        fn is_equal(&self, a: &str, b: &str, _options: &dyn Any) -> bool {
            a == b
        }
    }

    struct Field {
        required: bool,
        comparison: PlainComparison,
    }
    impl Default for Field {
        fn default() -> Self {
            Self {
                required: false,
                comparison: PlainComparison,
            }
        }
    }
    impl FieldConfig for Field {
        fn is_required(&self) -> bool {
            self.required
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

    #[test]
    fn imports_single_values() {
        let fs = Fields::default().with("name", Field::default());
        let doc = r#"{"fields": {"name": {"single-values": ["a", "b"]}}}"#;
        let cond = import(doc, &fs, &Limits::default()).unwrap();
        assert_eq!(cond.root().get_field("name").unwrap().count(), 2);
    }

    #[test]
    fn round_trips_through_export_and_import() {
        let fs = Fields::default().with("name", Field::default());
        let doc = r#"{"fields": {"name": {"single-values": ["a"], "excluded-values": ["b"]}}}"#;
        let cond = import(doc, &fs, &Limits::default()).unwrap();
        let exported = export(&cond).unwrap();
        let reimported = import(&exported, &fs, &Limits::default()).unwrap();
        let bag = reimported.root().get_field("name").unwrap();
        assert_eq!(bag.singles().next().unwrap().raw, "a");
        assert_eq!(bag.excluded_singles().next().unwrap().raw, "b");
    }

    #[test]
    fn imports_nested_or_group() {
        let fs = Fields::default().with("name", Field::default());
        let doc = r#"{
            "fields": {"name": {"single-values": ["a"]}},
            "groups": [
                {"logical": "OR", "fields": {"name": {"single-values": ["b"]}}}
            ]
        }"#;
        let cond = import(doc, &fs, &Limits::default()).unwrap();
        assert_eq!(cond.root().group_count(), 1);
        assert_eq!(cond.root().groups().next().unwrap().logical(), Logical::Or);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let fs = Fields::default();
        let doc = r#"{"fields": {"bogus": {"single-values": ["a"]}}}"#;
        let err = import(doc, &fs, &Limits::default()).unwrap_err();
        assert!(matches!(err, ConditionError::UnknownField { .. }));
    }

    #[test]
    fn malformed_json_is_input_processor_error() {
        let fs = Fields::default();
        let err = import("not json", &fs, &Limits::default()).unwrap_err();
        assert!(matches!(err, ConditionError::InputProcessor { .. }));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let fs = Fields::default()
            .with("name", Field { required: true, ..Field::default() })
            .with("id", Field::default());
        let doc = r#"{"fields": {"id": {"single-values": ["1"]}}}"#;
        let err = import(doc, &fs, &Limits::default()).unwrap_err();
        assert!(matches!(err, ConditionError::FieldRequired { .. }));
    }

    #[test]
    fn values_overflow_is_rejected() {
        let fs = Fields::default().with("name", Field::default());
        let limits = Limits::default().with_max_values(1);
        let doc = r#"{"fields": {"name": {"single-values": ["a", "b"]}}}"#;
        let err = import(doc, &fs, &limits).unwrap_err();
        assert!(matches!(err, ConditionError::ValuesOverflow { .. }));
    }
}
