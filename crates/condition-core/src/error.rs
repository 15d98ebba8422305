//! The error taxonomy surfaced by every component in the condition core.

use crate::value::ValueKind;

/// A domain error raised by the lexer, parser, exporter, structured codec,
/// or normalization pipeline.
///
/// Parse/import errors fail the whole call (no partial tree is handed back);
/// normalization errors instead attach to a bag's error list and are
/// observed through `Condition::has_errors`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    /// Lexer/parser grammar mismatch.
    #[error("line 0, col {position}: Error: Expected '{expected}', got '{got}'")]
    Syntax {
        /// Byte offset into the original input where the mismatch was found.
        position: usize,
        /// What the parser was expecting.
        expected: String,
        /// What it found instead.
        got: String,
    },

    /// A field name referenced in a group does not exist in the field set.
    #[error("unknown field: {field_name}")]
    UnknownField {
        /// The unrecognized field name.
        field_name: String,
    },

    /// A field rejects the kind of value it was given.
    #[error("field '{field_name}' does not accept {value_type:?} values")]
    UnsupportedValueType {
        /// The field the value was added to.
        field_name: String,
        /// The kind of value that was rejected.
        value_type: ValueKind,
    },

    /// A field declared `required` by the field set is missing from a group.
    #[error("field '{field_name}' is required in group {group_idx} at level {level}")]
    FieldRequired {
        /// The missing required field.
        field_name: String,
        /// Index of the group (among its siblings) missing the field.
        group_idx: usize,
        /// Nesting depth of that group (root is level 0).
        level: usize,
    },

    /// A bag's value count exceeded the configured `max_values`.
    #[error(
        "field '{field_name}' exceeds max values ({current} > {max}) in group {group_idx} at level {level}"
    )]
    ValuesOverflow {
        /// The offending field.
        field_name: String,
        /// The configured limit.
        max: usize,
        /// The count that exceeded it.
        current: usize,
        /// Index of the group containing the field.
        group_idx: usize,
        /// Nesting depth of that group.
        level: usize,
    },

    /// A group's direct subgroup count exceeded the configured `max_groups`.
    #[error("group {group_idx} at level {level} exceeds max direct subgroups ({current} > {max})")]
    GroupsOverflow {
        /// The configured limit.
        max: usize,
        /// The count that exceeded it.
        current: usize,
        /// Index of the group (among its siblings).
        group_idx: usize,
        /// Nesting depth of that group.
        level: usize,
    },

    /// Group nesting depth exceeded the configured `max_depth`.
    #[error("group {group_idx} at level {level} exceeds max nesting depth ({max})")]
    GroupsNesting {
        /// The configured limit.
        max: usize,
        /// Index of the group (among its siblings) that tripped the check.
        group_idx: usize,
        /// Nesting depth that tripped the check.
        level: usize,
    },

    /// A structured document (JSON/XML) was malformed at the transport level.
    #[error("malformed input: {message}")]
    InputProcessor {
        /// Description of what was malformed.
        message: String,
    },

    /// A field's view-transformer chain rejected a value during the
    /// normalization pipeline's transform pass.
    #[error("field '{field_name}' failed transform: {message}")]
    Transform {
        /// The field whose transformer chain raised this error.
        field_name: String,
        /// Description of the failure.
        message: String,
    },

    /// A field's validator collaborator rejected a (transformed) value
    /// during the normalization pipeline's validate pass.
    #[error("field '{field_name}' failed validation: {message}")]
    Validation {
        /// The field whose validator raised this error.
        field_name: String,
        /// Description of the constraint violation.
        message: String,
    },
}
