//! The normalization pipeline (C9): an ordered chain of passes run once
//! over a parsed or built [`condition_core::Condition`].
//!
//! Each pass sees the whole mutable tree and the pass chain short-circuits
//! as soon as `condition.has_errors()` becomes true, the way
//! `ra_query`'s own multi-stage resolution bails out of later stages once
//! an earlier one has recorded a failure.
//!
//! [`Pipeline::standard`] wires up the five passes in the fixed order
//! `Transform → Validate → DuplicateRemover → ValuesToRange →
//! RangeOptimizer`; build a custom [`Pipeline`] with [`Pipeline::new`] and
//! [`Pipeline::with_pass`] to run a subset.

#![warn(missing_docs)]

mod duplicate_remover;
mod pipeline;
mod range_optimizer;
mod transform;
mod validate;
mod values_to_range;

pub use duplicate_remover::DuplicateRemover;
pub use pipeline::{Pass, Pipeline};
pub use range_optimizer::RangeOptimizer;
pub use transform::Transform;
pub use validate::Validate;
pub use values_to_range::ValuesToRange;
