//! Configurable limits enforced by the FilterQuery parser and structured codec.

/// The three configurable limits named in `spec.md` §6: `max_values`,
/// `max_groups`, `max_depth`. Each defaults to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_values: usize,
    max_groups: usize,
    max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_values: 100,
            max_groups: 100,
            max_depth: 100,
        }
    }
}

impl Limits {
    /// Creates a `Limits` with the spec's defaults (100/100/100).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum live value count per bag.
    #[must_use]
    pub fn with_max_values(mut self, max_values: usize) -> Self {
        self.max_values = max_values;
        self
    }

    /// Sets the maximum direct subgroup count per group.
    #[must_use]
    pub fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = max_groups;
        self
    }

    /// Sets the maximum group nesting depth (root is depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The maximum live value count per bag.
    pub fn max_values(&self) -> usize {
        self.max_values
    }

    /// The maximum direct subgroup count per group.
    pub fn max_groups(&self) -> usize {
        self.max_groups
    }

    /// The maximum group nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let limits = Limits::default();
        assert_eq!(limits.max_values(), 100);
        assert_eq!(limits.max_groups(), 100);
        assert_eq!(limits.max_depth(), 100);
    }

    #[test]
    fn fluent_setters_chain() {
        let limits = Limits::new().with_max_values(5).with_max_depth(2);
        assert_eq!(limits.max_values(), 5);
        assert_eq!(limits.max_depth(), 2);
        assert_eq!(limits.max_groups(), 100);
    }
}
