//! Pass 4: `ValuesToRange` (§4.8.4), optional.
//!
//! Coalesces runs of included single values that form a contiguous chain
//! under the field's [`condition_core::ValueComparison::successor`] into a
//! single range. Fields whose `successor` returns `None` (the default) are
//! left untouched — this pass only ever does something for field types
//! that opt into a discrete successor function (integers, dates).
//!
//! A chain shorter than [`MIN_RUN_LENGTH`] is left as separate singles:
//! turning a run of two adjacent values into a range saves nothing and
//! loses the values' individual identity for no benefit.

use condition_core::{FieldConfig, FieldSet, Range, ValuesBag, ValuesGroup};

use crate::pipeline::{walk_bags_mut, Pass};

const MIN_RUN_LENGTH: usize = 3;

/// See the module docs.
pub struct ValuesToRange;

impl<FS: FieldSet> Pass<FS> for ValuesToRange {
    fn name(&self) -> &'static str {
        "values-to-range"
    }

    fn run(&self, group: &mut ValuesGroup, field_set: &FS) {
        walk_bags_mut(group, field_set, &mut |bag, field, _field_name| {
            if field.accept_ranges() {
                coalesce(bag, field);
            }
        });
    }
}

fn coalesce<F: FieldConfig>(bag: &mut ValuesBag, field: &F) {
    let items: Vec<(usize, String)> = bag
        .singles_indexed()
        .map(|(i, v)| (i, v.comparable().to_string()))
        .collect();
    if items.len() < MIN_RUN_LENGTH {
        return;
    }

    let cmp = field.value_comparison();
    let mut used = vec![false; items.len()];
    let mut new_ranges: Vec<Range> = Vec::new();
    let mut slots_to_remove: Vec<usize> = Vec::new();

    for start in 0..items.len() {
        if used[start] {
            continue;
        }
        let mut chain = vec![start];
        let mut current = items[start].1.clone();
        loop {
            let Some(next_val) = cmp.successor(&current) else {
                break;
            };
            let next_pos = items
                .iter()
                .position(|(_, v)| *v == next_val)
                .filter(|&p| !used[p]);
            let Some(next_pos) = next_pos else {
                break;
            };
            chain.push(next_pos);
            used[next_pos] = true;
            current = next_val;
        }

        if chain.len() >= MIN_RUN_LENGTH {
            used[start] = true;
            let lower = items[chain[0]].1.clone();
            let upper = items[*chain.last().expect("chain non-empty")].1.clone();
            new_ranges.push(Range::new(lower, upper));
            for &pos in &chain {
                slots_to_remove.push(items[pos].0);
            }
        } else {
            for &pos in chain.iter().skip(1) {
                used[pos] = false;
            }
        }
    }

    for range in new_ranges {
        bag.add_range(range);
    }
    for slot in slots_to_remove {
        bag.remove_single(slot);
    }
}
