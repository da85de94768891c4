//! Filter query compiler and evaluator.
//!
//! This module turns the textual query language used in the `q` parameter of
//! list endpoints into an immutable [`FilterExpr`] and evaluates it against
//! [`Record`](crate::Record)s.
//!
//! # Supported Syntax
//!
//! ## Comparisons
//! - `field eq value` - equal
//! - `field ne value` - not equal
//! - `field gt value` - greater than
//! - `field lt value` - less than
//!
//! ## Literals
//! - `'2016-05-01'` or `"text"` - quoted strings
//! - `20`, `-3`, `3.5` - numbers
//! - `true`, `false` - booleans
//!
//! ## Boolean Operators
//! - `AND` - binds tighter than `OR`
//! - `OR`
//! - `()` or `{}` - Grouping
//!
//! Keywords are case-sensitive.
//!
//! Queries may nest groups at most [`MAX_NESTING_DEPTH`] levels deep and hold
//! at most [`MAX_COMPARISONS`] comparisons.
//!
//! # Example
//!
//! ```
//! use jogq_core::filter::{compile, filter_records};
//! use jogq_core::{FieldWhitelist, Record};
//!
//! let whitelist = FieldWhitelist::new(["date", "distance"]);
//! let query = "(date eq '2016-05-01') AND ((distance gt 20) OR (distance lt 10))";
//! let filter = compile(query, &whitelist).unwrap();
//!
//! let records = vec![
//!     Record::new().with("date", "2016-05-01").with("distance", 25),
//!     Record::new().with("date", "2016-05-01").with("distance", 15),
//! ];
//! let matched = filter_records(&filter, &records).unwrap();
//! assert_eq!(matched.len(), 1);
//! ```

mod ast;
mod error;
mod evaluator;
mod executor;
mod lexer;
mod negation;
mod parser;

pub use ast::{ComparisonOp, FilterExpr, Literal};
pub use error::{EvalError, EvalResult, FilterError, FilterResult, SyntaxError, SyntaxResult};
pub use evaluator::{evaluate, FilterEvaluator};
pub use executor::{filter, filter_lazy, filter_records, par_filter, FilterIter};
pub use lexer::{tokenize, CompareToken, FilterToken, Lexer, PositionedToken};
pub use negation::resolve_comparison;
pub use parser::{compile, parse, FilterParser, MAX_COMPARISONS, MAX_NESTING_DEPTH};

#[cfg(test)]
mod tests;
