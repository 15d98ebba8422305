//! FilterQuery: the textual surface syntax for condition trees.
//!
//! `filterquery::parse` turns FilterQuery text into a
//! `condition_core::Condition`, or `None` for empty/whitespace-only input;
//! `filterquery::export` renders one back. Between the two sits a
//! hand-rolled lexer and a recursive-descent parser, in the shape of
//! `ra_query`'s lexer/parser pair, generalized to this grammar's
//! range/comparison/pattern-match value forms.

#![warn(missing_docs)]

mod exporter;
mod lexer;
mod parser;

pub use exporter::export;
pub use lexer::Token;
pub use parser::parse;
