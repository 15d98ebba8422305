//! The canonical FilterQuery exporter (C7).
//!
//! Renders a [`Condition`] back into FilterQuery text. The rendering is
//! canonical, not necessarily textually identical to whatever was originally
//! parsed (insignificant whitespace, bracket choice for default-inclusive
//! bounds, and quoting are normalized), but re-parsing the output always
//! reproduces the same condition tree for any tree this crate's own parser
//! can produce.
//!
//! The root is written bare (no enclosing parens) whenever it is an AND
//! group that has at least one direct field or subgroup — its subgroups,
//! if any, still each get their own `[*](…);` wrapping via
//! [`render_wrapped`], just not a second enclosing one for the root itself.
//! An OR root, or a genuinely empty AND root (no fields, no subgroups), is
//! wrapped as `[*](…);` so the logical and the "this is a present, if
//! empty, condition" distinction both survive a round trip.
//!
//! Quoting rule: a value round-trips unquoted only if every character is a
//! Unicode letter or digit, or it is a plain (non-negative) decimal literal
//! with at most one `.`. Anything else — a leading `-`, a comma decimal
//! separator, embedded punctuation, or whitespace — is wrapped in `"..."`
//! with embedded `"` doubled.

use condition_core::{Condition, FieldSet, Logical, PatternMatch, Range, ValuesBag, ValuesGroup};

/// Renders `condition` as canonical FilterQuery text.
pub fn export<FS: FieldSet>(condition: &Condition<'_, FS>) -> String {
    let root = condition.root();
    let is_empty = root.field_count() == 0 && root.group_count() == 0;
    if root.logical() == Logical::And && !is_empty {
        render_contents(root)
    } else {
        render_wrapped(root)
    }
}

/// Renders `group` as `[*](<contents>);`, used for every subgroup and for
/// a root that can't be written bare.
fn render_wrapped(group: &ValuesGroup) -> String {
    let prefix = if group.logical() == Logical::Or { "*" } else { "" };
    format!("{prefix}({});", render_contents(group))
}

/// Renders a group's direct field pairs (in insertion order), then its
/// direct subgroups (in insertion order) — never an interleaved order,
/// since `ValuesGroup` tracks the two sequences separately.
fn render_contents(group: &ValuesGroup) -> String {
    let mut parts: Vec<String> = group
        .fields()
        .map(|(name, bag)| render_field_pair(name, bag))
        .collect();
    parts.extend(group.groups().map(render_wrapped));
    parts.join(" ")
}

fn render_field_pair(name: &str, bag: &ValuesBag) -> String {
    let mut values = Vec::new();
    values.extend(bag.singles().map(|v| render_simple(&v.raw)));
    values.extend(
        bag.excluded_singles()
            .map(|v| format!("!{}", render_simple(&v.raw))),
    );
    values.extend(bag.ranges().map(|r| render_range(r, false)));
    values.extend(bag.excluded_ranges().map(|r| render_range(r, true)));
    values.extend(bag.comparisons().map(|c| {
        format!("{}{}", c.operator.as_str(), render_simple(&c.operand.raw))
    }));
    values.extend(bag.pattern_matches().map(render_pattern));

    format!("{name}: {};", values.join(", "))
}

fn render_range(range: &Range, excluded: bool) -> String {
    let mut out = String::new();
    if excluded {
        out.push('!');
    }
    if !range.lower_inclusive {
        out.push(']');
    }
    out.push_str(&render_simple(&range.lower.raw));
    out.push('-');
    out.push_str(&render_simple(&range.upper.raw));
    if !range.upper_inclusive {
        out.push('[');
    }
    out
}

fn render_pattern(pattern: &PatternMatch) -> String {
    let mut out = String::from("~");
    if pattern.case_insensitive {
        out.push('i');
    }
    if pattern.kind.is_exclusive() {
        out.push('!');
    }
    out.push(pattern.kind.symbol());
    out.push_str(&render_simple(&pattern.pattern.raw));
    out
}

fn render_simple(raw: &str) -> String {
    if is_unquoted_literal(raw) {
        raw.to_string()
    } else {
        quote(raw)
    }
}

/// A value round-trips unquoted when it is made entirely of Unicode
/// letters and/or digits (covers non-ASCII digits like Arabic-Indic), or
/// is a plain decimal literal. Everything else gets quoted.
fn is_unquoted_literal(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let all_alphanumeric = s.chars().all(|c| c.is_alphabetic() || c.is_numeric());
    all_alphanumeric || is_plain_number(s)
}

/// ASCII digits with at most one `.` separator, and at least one digit.
/// A comma decimal separator (`10,00`) deliberately does not match here.
fn is_plain_number(s: &str) -> bool {
    let mut saw_digit = false;
    let mut saw_dot = false;
    for c in s.chars() {
        if c.is_ascii_digit() {
            saw_digit = true;
        } else if c == '.' && !saw_dot {
            saw_dot = true;
        } else {
            return false;
        }
    }
    saw_digit
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
