//! Facade crate tying together the condition core, its two transport
//! codecs, and the normalization pipeline, mirroring how `ra` ties
//! together `ra-config`/`ra-document`/`ra-query`/`ra-index` into one
//! crate downstream consumers depend on instead of the individual pieces.
//!
//! Typical use:
//!
//! ```ignore
//! use condition::{filterquery, normalize, Limits};
//!
//! let Some(mut condition) = filterquery::parse("name: foo;", &field_set, &Limits::default())?
//! else {
//!     return Ok(()); // empty input: no condition
//! };
//! normalize::Pipeline::standard().run(&mut condition);
//! let text = filterquery::export(&condition);
//! ```

#![warn(missing_docs)]

pub use condition_core::{
    Comparison, ComparisonOperator, Condition, ConditionBuilder, ConditionError, FieldConfig,
    FieldSet, Limits, Logical, PatternKind, PatternMatch, Range, SingleValue, ValueComparison,
    ValueKind, ValuesBag, ValuesBuilder, ValuesGroup,
};

/// The FilterQuery textual surface syntax — re-exported as a module so
/// call sites read `filterquery::parse`/`filterquery::export`, matching
/// the sibling crate's own public API.
pub mod filterquery {
    pub use ::filterquery::{export, parse, Token};
}

/// The structured (JSON) document codec.
pub mod codec {
    pub use condition_codec::{export, import};
}

/// The normalization pipeline.
pub mod normalize {
    pub use condition_normalize::{DuplicateRemover, Pass, Pipeline, RangeOptimizer, Transform, Validate, ValuesToRange};
}
