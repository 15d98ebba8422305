//! The four value-kinds a [`crate::bag::ValuesBag`] can hold.

use std::fmt;

/// A single value as received from a codec, plus its normalized form.
///
/// Parsers only ever produce the `raw` form; `normalized` is filled in later
/// by the transform pass of the normalization pipeline. Equality used by the
/// duplicate-remover pass compares `normalized` when present, falling back to
/// `raw` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleValue {
    /// The original textual representation, exactly as parsed/imported.
    pub raw: String,
    /// The normalized/model representation, filled in by the transform pass.
    pub normalized: Option<String>,
}

impl SingleValue {
    /// Creates a single value from its raw form; `normalized` starts empty.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            normalized: None,
        }
    }

    /// The value to use for comparisons: normalized if present, else raw.
    pub fn comparable(&self) -> &str {
        self.normalized.as_deref().unwrap_or(&self.raw)
    }
}

impl fmt::Display for SingleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<S: Into<String>> From<S> for SingleValue {
    fn from(raw: S) -> Self {
        Self::new(raw)
    }
}

/// An inclusive-or-exclusive bound range between two single values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    /// The lower bound.
    pub lower: SingleValue,
    /// The upper bound.
    pub upper: SingleValue,
    /// Whether the lower bound itself is included in the range. Default `true`.
    pub lower_inclusive: bool,
    /// Whether the upper bound itself is included in the range. Default `true`.
    pub upper_inclusive: bool,
}

impl Range {
    /// Creates a range with both bounds inclusive.
    pub fn new(lower: impl Into<SingleValue>, upper: impl Into<SingleValue>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
            lower_inclusive: true,
            upper_inclusive: true,
        }
    }

    /// Sets whether the lower bound is inclusive.
    #[must_use]
    pub fn with_lower_inclusive(mut self, inclusive: bool) -> Self {
        self.lower_inclusive = inclusive;
        self
    }

    /// Sets whether the upper bound is inclusive.
    #[must_use]
    pub fn with_upper_inclusive(mut self, inclusive: bool) -> Self {
        self.upper_inclusive = inclusive;
        self
    }
}

/// A comparison operator for [`Comparison`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `<>`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
}

impl ComparisonOperator {
    /// The canonical textual representation, as used by the FilterQuery exporter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::NotEqual => "<>",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{operator} {operand}` comparison value, e.g. `>= 10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// The value being compared against.
    pub operand: SingleValue,
    /// The comparison operator.
    pub operator: ComparisonOperator,
}

impl Comparison {
    /// Creates a new comparison.
    pub fn new(operator: ComparisonOperator, operand: impl Into<SingleValue>) -> Self {
        Self {
            operand: operand.into(),
            operator,
        }
    }
}

/// The eight pattern-match kinds, four polarities times {contains, starts,
/// ends, regex}. `NOT_*` kinds are the sole source of truth for exclusivity
/// (see `spec.md` Open Question 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// `*value*`
    Contains,
    /// `value*`
    StartsWith,
    /// `*value`
    EndsWith,
    /// regular expression match
    Regex,
    /// negated [`Self::Contains`]
    NotContains,
    /// negated [`Self::StartsWith`]
    NotStartsWith,
    /// negated [`Self::EndsWith`]
    NotEndsWith,
    /// negated [`Self::Regex`]
    NotRegex,
}

impl PatternKind {
    /// Whether this kind is a negated (`NOT_*`) kind.
    pub fn is_exclusive(self) -> bool {
        matches!(
            self,
            Self::NotContains | Self::NotStartsWith | Self::NotEndsWith | Self::NotRegex
        )
    }

    /// The FilterQuery symbol for this kind's base operator (`*`, `>`, `<`, `?`).
    pub fn symbol(self) -> char {
        match self {
            Self::Contains | Self::NotContains => '*',
            Self::StartsWith | Self::NotStartsWith => '>',
            Self::EndsWith | Self::NotEndsWith => '<',
            Self::Regex | Self::NotRegex => '?',
        }
    }

    /// Builds a kind from a base symbol and exclusivity flag.
    pub fn from_symbol(symbol: char, exclusive: bool) -> Option<Self> {
        Some(match (symbol, exclusive) {
            ('*', false) => Self::Contains,
            ('*', true) => Self::NotContains,
            ('>', false) => Self::StartsWith,
            ('>', true) => Self::NotStartsWith,
            ('<', false) => Self::EndsWith,
            ('<', true) => Self::NotEndsWith,
            ('?', false) => Self::Regex,
            ('?', true) => Self::NotRegex,
            _ => return None,
        })
    }
}

/// A pattern-match value: `~[i][!]{symbol}{pattern}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// The pattern text (a literal for contains/starts/ends, a regex for `Regex`).
    pub pattern: SingleValue,
    /// Which of the eight kinds this is.
    pub kind: PatternKind,
    /// Whether matching ignores case.
    pub case_insensitive: bool,
}

impl PatternMatch {
    /// Creates a new pattern-match value.
    pub fn new(kind: PatternKind, pattern: impl Into<SingleValue>, case_insensitive: bool) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
            case_insensitive,
        }
    }

    /// Whether this pattern-match is exclusive (`NOT_*`), derived from `kind`.
    pub fn is_exclusive(&self) -> bool {
        self.kind.is_exclusive()
    }
}

/// The kind of value a [`crate::bag::ValuesBag`] entry can be, used by
/// [`crate::fieldset::FieldConfig`] acceptance checks and
/// [`crate::error::ConditionError::UnsupportedValueType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A plain (possibly excluded) single value.
    Single,
    /// A (possibly excluded) range.
    Range,
    /// A comparison.
    Comparison,
    /// A pattern-match.
    PatternMatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparable_prefers_normalized() {
        let mut v = SingleValue::new("10");
        assert_eq!(v.comparable(), "10");
        v.normalized = Some("0010".into());
        assert_eq!(v.comparable(), "0010");
    }

    #[test]
    fn pattern_kind_roundtrips_symbol() {
        for (symbol, exclusive) in [('*', false), ('*', true), ('>', false), ('?', true)] {
            let kind = PatternKind::from_symbol(symbol, exclusive).unwrap();
            assert_eq!(kind.symbol(), symbol);
            assert_eq!(kind.is_exclusive(), exclusive);
        }
    }

    #[test]
    fn range_defaults_to_inclusive() {
        let r = Range::new("1", "10");
        assert!(r.lower_inclusive && r.upper_inclusive);
        let r = r.with_lower_inclusive(false);
        assert!(!r.lower_inclusive);
        assert!(r.upper_inclusive);
    }
}
