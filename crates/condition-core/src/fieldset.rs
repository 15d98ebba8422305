//! The read-only field-configuration catalog consumed by parsers and
//! exporters (C4). Implementations live outside this crate — a metadata
//! loader, an annotation scanner, a hand-written registry — this module
//! only names the contract.

use std::any::Any;

/// A field-provided equality predicate used by the normalization pipeline's
/// duplicate-remover pass, and an optional successor function used by the
/// values-to-range pass.
pub trait ValueComparison {
    /// Whether `a` and `b` are semantically equal under `options`
    /// (typically the field's own [`FieldConfig::options`]).
    fn is_equal(&self, a: &str, b: &str, options: &dyn Any) -> bool;

    /// The next value after `value` in this field's domain, if the field
    /// type supports a total, discrete ordering (integers, dates). Used by
    /// the values-to-range pass to detect contiguous runs of singles.
    /// `None` means the field does not support coalescing.
    fn successor(&self, _value: &str) -> Option<String> {
        None
    }
}

/// A single field's configuration, as resolved from the (external) field
/// type registry.
pub trait FieldConfig {
    /// Whether every group containing any fields/subgroups must mention this field.
    fn is_required(&self) -> bool;
    /// Whether this field accepts range values.
    fn accept_ranges(&self) -> bool;
    /// Whether this field accepts comparison values.
    fn accept_compares(&self) -> bool;
    /// Whether this field accepts pattern-match values.
    fn accept_pattern_match(&self) -> bool;
    /// The field's value-comparison collaborator.
    fn value_comparison(&self) -> &dyn ValueComparison;
    /// Opaque per-field options, passed through to [`ValueComparison::is_equal`].
    fn options(&self) -> &dyn Any;

    /// Applies this field's view-transformer chain to `raw`, producing the
    /// normalized form stored on a value's `normalized` slot. The default
    /// identity transform is used by fields with no transformer chain
    /// configured. `Err` attaches a `ConditionError::Transform` to the
    /// owning bag instead of setting `normalized`.
    fn transform(&self, raw: &str) -> Result<String, String> {
        Ok(raw.to_string())
    }

    /// Checks `value` (already transformed) against this field's validator
    /// collaborator, if one is configured. `Some(message)` attaches a
    /// `ConditionError::Validation` to the owning bag. The default accepts
    /// everything, matching a field with no validator configured.
    fn validate(&self, _value: &str) -> Option<String> {
        None
    }
}

/// A read-only catalog of field configurations keyed by field name.
///
/// This is the sole contract the condition core has with the (external)
/// field type registry: it does not resolve types, load metadata, or apply
/// view transformers itself.
pub trait FieldSet {
    /// Concrete field-configuration type this field set hands out.
    type Field: FieldConfig;

    /// Whether `name` is a known field.
    fn has(&self, name: &str) -> bool;
    /// The configuration for `name`, if known.
    fn get(&self, name: &str) -> Option<&Self::Field>;
    /// All fields, in the field set's own enumeration order.
    fn all(&self) -> Vec<(&str, &Self::Field)>;
}
