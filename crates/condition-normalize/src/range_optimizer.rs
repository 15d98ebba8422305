//! Pass 5: `RangeOptimizer` (§4.8.5).
//!
//! Merges overlapping or touching included ranges (respecting
//! inclusivity), which also subsumes dropping a range entirely contained
//! in another, then drops excluded ranges that no longer overlap anything
//! in the (now-merged) included set — excluding values nothing would
//! include in the first place is a no-op.
//!
//! Ordering comparisons need a total order on bound values, which
//! [`condition_core::ValueComparison`] does not provide (only equality and
//! an optional successor). This pass parses bounds as `f64` and only
//! optimizes ranges where both bounds parse; non-numeric bounds are left
//! exactly as they are, rather than risking an incorrect merge on an
//! unordered domain.

use condition_core::{FieldConfig, FieldSet, Range, ValuesBag, ValuesGroup};

use crate::pipeline::{walk_bags_mut, Pass};

/// See the module docs.
pub struct RangeOptimizer;

impl<FS: FieldSet> Pass<FS> for RangeOptimizer {
    fn name(&self) -> &'static str {
        "range-optimizer"
    }

    fn run(&self, group: &mut ValuesGroup, field_set: &FS) {
        walk_bags_mut(group, field_set, &mut |bag, field, _field_name| {
            optimize_bag(bag, field);
        });
    }
}

#[derive(Clone, Copy)]
struct Bound {
    value: f64,
    inclusive: bool,
}

struct ParsedRange {
    slot: usize,
    lower: Bound,
    upper: Bound,
    lower_raw: String,
    upper_raw: String,
}

fn parse_ranges<'a>(ranges: impl Iterator<Item = (usize, &'a Range)>) -> Vec<ParsedRange> {
    ranges
        .filter_map(|(slot, r)| {
            let lower = r.lower.comparable().parse::<f64>().ok()?;
            let upper = r.upper.comparable().parse::<f64>().ok()?;
            Some(ParsedRange {
                slot,
                lower: Bound {
                    value: lower,
                    inclusive: r.lower_inclusive,
                },
                upper: Bound {
                    value: upper,
                    inclusive: r.upper_inclusive,
                },
                lower_raw: r.lower.raw.clone(),
                upper_raw: r.upper.raw.clone(),
            })
        })
        .collect()
}

/// Whether `a` and `b` overlap or touch without a gap, given their inclusivity.
fn touches_or_overlaps(a_upper: Bound, b_lower: Bound) -> bool {
    a_upper.value > b_lower.value || (a_upper.value == b_lower.value && (a_upper.inclusive || b_lower.inclusive))
}

fn optimize_bag<F: FieldConfig>(bag: &mut ValuesBag, _field: &F) {
    let merged = optimize_included(bag);
    drop_redundant_excluded(bag, &merged);
}

/// Merges the bag's included ranges in place and returns the resulting
/// merged set (by value, not slot) for use by [`drop_redundant_excluded`].
fn optimize_included(bag: &mut ValuesBag) -> Vec<ParsedRange> {
    let mut parsed = parse_ranges(bag.ranges_indexed());
    if parsed.len() < 2 {
        return parsed;
    }
    parsed.sort_by(|a, b| {
        a.lower
            .value
            .partial_cmp(&b.lower.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut merged: Vec<ParsedRange> = Vec::new();
    for current in parsed {
        match merged.last_mut() {
            Some(last) if touches_or_overlaps(last.upper, current.lower) => {
                if current.upper.value > last.upper.value
                    || (current.upper.value == last.upper.value && current.upper.inclusive)
                {
                    last.upper = current.upper;
                    last.upper_raw = current.upper_raw;
                }
            }
            _ => merged.push(current),
        }
    }

    let original_slots: Vec<usize> = bag.ranges_indexed().map(|(i, _)| i).collect();
    let changed = merged.len() != original_slots.len();
    if changed {
        for slot in original_slots {
            bag.remove_range(slot);
        }
        for range in &merged {
            let r = Range::new(range.lower_raw.clone(), range.upper_raw.clone())
                .with_lower_inclusive(range.lower.inclusive)
                .with_upper_inclusive(range.upper.inclusive);
            bag.add_range(r);
        }
    }

    merged
}

fn drop_redundant_excluded(bag: &mut ValuesBag, included: &[ParsedRange]) {
    let excluded = parse_ranges(bag.excluded_ranges_indexed());
    if excluded.is_empty() || included.is_empty() {
        return;
    }

    for ex in excluded {
        let overlaps_something = included.iter().any(|inc| {
            touches_or_overlaps(inc.upper, ex.lower) && touches_or_overlaps(ex.upper, inc.lower)
        });
        if !overlaps_something {
            bag.remove_excluded_range(ex.slot);
        }
    }
}
