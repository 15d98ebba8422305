//! The condition tree node (C3): field bags plus ordered subgroups.

use crate::bag::ValuesBag;

/// The logical combinator a [`ValuesGroup`] applies across its fields and subgroups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logical {
    /// All members must match.
    And,
    /// Any member may match.
    Or,
}

/// A tree node holding field bags and ordered subgroups, tagged AND or OR.
///
/// Fields are kept in an insertion-ordered `Vec` rather than a hash map —
/// the exporter's determinism depends on this order being observable, and
/// groups rarely hold more than a handful of fields.
#[derive(Debug, Clone)]
pub struct ValuesGroup {
    fields: Vec<(String, ValuesBag)>,
    subgroups: Vec<ValuesGroup>,
    logical: Logical,
}

impl ValuesGroup {
    /// Creates an empty group with the given logical mode.
    pub fn new(logical: Logical) -> Self {
        Self {
            fields: Vec::new(),
            subgroups: Vec::new(),
            logical,
        }
    }

    /// Adds (or replaces) the bag for `name`. Callers that want to merge
    /// into an existing bag must `get_field_mut` and mutate it directly —
    /// this method always overwrites.
    pub fn add_field(&mut self, name: impl Into<String>, bag: ValuesBag) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = bag;
        } else {
            self.fields.push((name, bag));
        }
    }

    /// The bag for `name`, if present.
    pub fn get_field(&self, name: &str) -> Option<&ValuesBag> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, b)| b)
    }

    /// Mutable access to the bag for `name`, if present.
    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut ValuesBag> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b)
    }

    /// Whether a bag for `name` exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ValuesBag)> {
        self.fields.iter().map(|(n, b)| (n.as_str(), b))
    }

    /// Mutable access to fields in insertion order, for the normalization pipeline.
    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&str, &mut ValuesBag)> {
        self.fields.iter_mut().map(|(n, b)| (n.as_str(), b))
    }

    /// Number of distinct fields directly on this group.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Appends a subgroup.
    pub fn add_group(&mut self, child: ValuesGroup) {
        self.subgroups.push(child);
    }

    /// Direct subgroups in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = &ValuesGroup> {
        self.subgroups.iter()
    }

    /// Mutable access to direct subgroups in insertion order.
    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut ValuesGroup> {
        self.subgroups.iter_mut()
    }

    /// Number of direct subgroups.
    pub fn group_count(&self) -> usize {
        self.subgroups.len()
    }

    /// Sets the logical mode.
    pub fn set_logical(&mut self, logical: Logical) {
        self.logical = logical;
    }

    /// The logical mode.
    pub fn logical(&self) -> Logical {
        self.logical
    }

    /// True iff any own bag has errors, or any subgroup does (recursively).
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|(_, bag)| bag.has_errors())
            || self.subgroups.iter().any(ValuesGroup::has_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_field_replaces_existing() {
        let mut group = ValuesGroup::new(Logical::And);
        let mut bag_a = ValuesBag::new();
        bag_a.add_single("a");
        group.add_field("f", bag_a);

        let mut bag_b = ValuesBag::new();
        bag_b.add_single("b");
        group.add_field("f", bag_b);

        assert_eq!(group.field_count(), 1);
        let bag = group.get_field("f").unwrap();
        assert_eq!(bag.singles().next().unwrap().raw, "b");
    }

    #[test]
    fn fields_preserve_insertion_order() {
        let mut group = ValuesGroup::new(Logical::And);
        group.add_field("z", ValuesBag::new());
        group.add_field("a", ValuesBag::new());
        let names: Vec<_> = group.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn has_errors_is_recursive() {
        let mut root = ValuesGroup::new(Logical::And);
        assert!(!root.has_errors());

        let mut child = ValuesGroup::new(Logical::Or);
        let mut bag = ValuesBag::new();
        bag.add_error(crate::error::ConditionError::InputProcessor {
            message: "x".into(),
        });
        child.add_field("f", bag);
        root.add_group(child);

        assert!(root.has_errors());
    }
}
