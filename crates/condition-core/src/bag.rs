//! The per-field values container (C2).

use crate::error::ConditionError;
use crate::value::{Comparison, PatternMatch, Range, SingleValue};

/// A slot-based sequence: removing an entry clears its slot instead of
/// shifting later entries, so indices handed out by `add_*` stay valid for
/// `remove_*` calls made later in the same pass.
type Slots<T> = Vec<Option<T>>;

fn push<T>(slots: &mut Slots<T>, value: T) -> usize {
    slots.push(Some(value));
    slots.len() - 1
}

fn remove<T>(slots: &mut Slots<T>, index: usize) -> Option<T> {
    slots.get_mut(index).and_then(Option::take)
}

fn live<T>(slots: &Slots<T>) -> impl Iterator<Item = &T> {
    slots.iter().filter_map(Option::as_ref)
}

fn live_mut<T>(slots: &mut Slots<T>) -> impl Iterator<Item = &mut T> {
    slots.iter_mut().filter_map(Option::as_mut)
}

fn live_indexed<T>(slots: &Slots<T>) -> impl Iterator<Item = (usize, &T)> {
    slots
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.as_ref().map(|v| (i, v)))
}

/// The per-field container of typed value entries (C2 in the design).
///
/// Holds six ordered, independently-indexed sequences — single,
/// excluded-single, range, excluded-range, comparison, pattern-match — plus
/// an accumulated error list. `count()` is the sum of the six sequences'
/// live lengths; exporter ordering follows this same field order.
#[derive(Debug, Clone, Default)]
pub struct ValuesBag {
    singles: Slots<SingleValue>,
    excluded_singles: Slots<SingleValue>,
    ranges: Slots<Range>,
    excluded_ranges: Slots<Range>,
    comparisons: Slots<Comparison>,
    pattern_matches: Slots<PatternMatch>,
    errors: Vec<ConditionError>,
}

impl ValuesBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an included single value, returning its index.
    pub fn add_single(&mut self, value: impl Into<SingleValue>) -> usize {
        push(&mut self.singles, value.into())
    }

    /// Adds an excluded single value, returning its index.
    pub fn add_excluded_single(&mut self, value: impl Into<SingleValue>) -> usize {
        push(&mut self.excluded_singles, value.into())
    }

    /// Adds an included range, returning its index.
    pub fn add_range(&mut self, value: Range) -> usize {
        push(&mut self.ranges, value)
    }

    /// Adds an excluded range, returning its index.
    pub fn add_excluded_range(&mut self, value: Range) -> usize {
        push(&mut self.excluded_ranges, value)
    }

    /// Adds a comparison, returning its index.
    pub fn add_comparison(&mut self, value: Comparison) -> usize {
        push(&mut self.comparisons, value)
    }

    /// Adds a pattern-match, returning its index.
    pub fn add_pattern_match(&mut self, value: PatternMatch) -> usize {
        push(&mut self.pattern_matches, value)
    }

    /// Removes the single value at `index`, if still present.
    pub fn remove_single(&mut self, index: usize) -> Option<SingleValue> {
        remove(&mut self.singles, index)
    }

    /// Removes the excluded single value at `index`, if still present.
    pub fn remove_excluded_single(&mut self, index: usize) -> Option<SingleValue> {
        remove(&mut self.excluded_singles, index)
    }

    /// Removes the range at `index`, if still present.
    pub fn remove_range(&mut self, index: usize) -> Option<Range> {
        remove(&mut self.ranges, index)
    }

    /// Removes the excluded range at `index`, if still present.
    pub fn remove_excluded_range(&mut self, index: usize) -> Option<Range> {
        remove(&mut self.excluded_ranges, index)
    }

    /// Removes the comparison at `index`, if still present.
    pub fn remove_comparison(&mut self, index: usize) -> Option<Comparison> {
        remove(&mut self.comparisons, index)
    }

    /// Removes the pattern-match at `index`, if still present.
    pub fn remove_pattern_match(&mut self, index: usize) -> Option<PatternMatch> {
        remove(&mut self.pattern_matches, index)
    }

    /// Included single values, in insertion order.
    pub fn singles(&self) -> impl Iterator<Item = &SingleValue> {
        live(&self.singles)
    }

    /// Mutable access to included single values, for the transform pass.
    pub fn singles_mut(&mut self) -> impl Iterator<Item = &mut SingleValue> {
        live_mut(&mut self.singles)
    }

    /// Excluded single values, in insertion order.
    pub fn excluded_singles(&self) -> impl Iterator<Item = &SingleValue> {
        live(&self.excluded_singles)
    }

    /// Mutable access to excluded single values, for the transform pass.
    pub fn excluded_singles_mut(&mut self) -> impl Iterator<Item = &mut SingleValue> {
        live_mut(&mut self.excluded_singles)
    }

    /// Included ranges, in insertion order.
    pub fn ranges(&self) -> impl Iterator<Item = &Range> {
        live(&self.ranges)
    }

    /// Mutable access to included ranges, for the transform and range-optimizer passes.
    pub fn ranges_mut(&mut self) -> impl Iterator<Item = &mut Range> {
        live_mut(&mut self.ranges)
    }

    /// Excluded ranges, in insertion order.
    pub fn excluded_ranges(&self) -> impl Iterator<Item = &Range> {
        live(&self.excluded_ranges)
    }

    /// Mutable access to excluded ranges.
    pub fn excluded_ranges_mut(&mut self) -> impl Iterator<Item = &mut Range> {
        live_mut(&mut self.excluded_ranges)
    }

    /// Comparisons, in insertion order.
    pub fn comparisons(&self) -> impl Iterator<Item = &Comparison> {
        live(&self.comparisons)
    }

    /// Mutable access to comparisons, for the transform pass.
    pub fn comparisons_mut(&mut self) -> impl Iterator<Item = &mut Comparison> {
        live_mut(&mut self.comparisons)
    }

    /// Pattern-matches, in insertion order.
    pub fn pattern_matches(&self) -> impl Iterator<Item = &PatternMatch> {
        live(&self.pattern_matches)
    }

    /// Mutable access to pattern-matches, for the transform pass.
    pub fn pattern_matches_mut(&mut self) -> impl Iterator<Item = &mut PatternMatch> {
        live_mut(&mut self.pattern_matches)
    }

    /// Included single values with their stable indices, for passes that
    /// need to remove specific entries by index (duplicate-remover,
    /// values-to-range).
    pub fn singles_indexed(&self) -> impl Iterator<Item = (usize, &SingleValue)> {
        live_indexed(&self.singles)
    }

    /// Excluded single values with their stable indices.
    pub fn excluded_singles_indexed(&self) -> impl Iterator<Item = (usize, &SingleValue)> {
        live_indexed(&self.excluded_singles)
    }

    /// Included ranges with their stable indices.
    pub fn ranges_indexed(&self) -> impl Iterator<Item = (usize, &Range)> {
        live_indexed(&self.ranges)
    }

    /// Excluded ranges with their stable indices.
    pub fn excluded_ranges_indexed(&self) -> impl Iterator<Item = (usize, &Range)> {
        live_indexed(&self.excluded_ranges)
    }

    /// Comparisons with their stable indices.
    pub fn comparisons_indexed(&self) -> impl Iterator<Item = (usize, &Comparison)> {
        live_indexed(&self.comparisons)
    }

    /// Pattern-matches with their stable indices.
    pub fn pattern_matches_indexed(&self) -> impl Iterator<Item = (usize, &PatternMatch)> {
        live_indexed(&self.pattern_matches)
    }

    /// Total count of live members across all six sequences.
    pub fn count(&self) -> usize {
        live(&self.singles).count()
            + live(&self.excluded_singles).count()
            + live(&self.ranges).count()
            + live(&self.excluded_ranges).count()
            + live(&self.comparisons).count()
            + live(&self.pattern_matches).count()
    }

    /// Whether this bag has any accumulated errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Appends an error raised against this bag (typically by the
    /// normalization pipeline's transform or validate passes).
    pub fn add_error(&mut self, error: ConditionError) {
        self.errors.push(error);
    }

    /// The errors accumulated so far.
    pub fn errors(&self) -> &[ConditionError] {
        &self.errors
    }
}
