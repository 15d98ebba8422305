//! Condition tree data model: value variants, per-field bags, tree nodes,
//! the field-set collaborator contract, the error taxonomy, and a fluent
//! builder.
//!
//! This crate has no notion of transport syntax (FilterQuery text or a
//! structured document) — see the sibling `filterquery` and
//! `condition-codec` crates for that, and `condition-normalize` for the
//! post-parse rewriting passes.

#![warn(missing_docs)]

mod bag;
mod builder;
mod condition;
mod error;
mod fieldset;
mod group;
mod limits;
mod value;

pub use bag::ValuesBag;
pub use builder::{ConditionBuilder, ValuesBuilder};
pub use condition::Condition;
pub use error::ConditionError;
pub use fieldset::{FieldConfig, FieldSet, ValueComparison};
pub use group::{Logical, ValuesGroup};
pub use limits::Limits;
pub use value::{
    Comparison, ComparisonOperator, PatternKind, PatternMatch, Range, SingleValue, ValueKind,
};
