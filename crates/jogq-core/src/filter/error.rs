//! Error types for filter compilation and evaluation.
//!
//! The two phases have disjoint taxonomies: [`SyntaxError`] is raised before
//! any record is examined, [`EvalError`] while testing a specific record.
//! Neither is ever turned into a silent "no match".

use thiserror::Error;

use super::ast::{ComparisonOp, Literal};

/// A specialized Result type for query compilation.
pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// A specialized Result type for predicate evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// A specialized Result type for operations spanning both phases.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors detected while tokenizing or parsing a query.
///
/// Offsets (`at`) are byte positions in the original query string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// The query is empty or only whitespace.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// A word that is neither a keyword, an identifier nor a literal.
    #[error("unknown token '{token}' at position {at}")]
    UnknownToken {
        /// The text that could not be classified.
        token: String,
        /// Where the text starts.
        at: usize,
    },

    /// A quoted literal without its closing quote.
    #[error("unterminated quoted literal starting at position {at}")]
    UnterminatedQuote {
        /// Position of the opening quote.
        at: usize,
    },

    /// A token that does not fit the grammar at this point.
    #[error("unexpected {found} at position {at}")]
    UnexpectedToken {
        /// Description of what was found.
        found: String,
        /// Where it was found.
        at: usize,
    },

    /// A `(` without matching `)` or a `)` without matching `(`.
    #[error("unbalanced parenthesis at position {at}")]
    UnbalancedParens {
        /// Position of the unmatched parenthesis.
        at: usize,
    },

    /// Groups nested deeper than [`MAX_NESTING_DEPTH`](super::MAX_NESTING_DEPTH).
    #[error("groups nested deeper than {limit} levels at position {at}")]
    TooDeep {
        /// Position of the group that crossed the limit.
        at: usize,
        /// The nesting limit.
        limit: usize,
    },

    /// More comparisons than [`MAX_COMPARISONS`](super::MAX_COMPARISONS).
    #[error("query has more than {limit} comparisons (position {at})")]
    TooManyComparisons {
        /// Position of the first comparison past the limit.
        at: usize,
        /// The comparison limit.
        limit: usize,
    },

    /// A field outside the whitelist.
    #[error("unknown field '{name}'{}", suggestion_hint(.suggestion))]
    UnknownField {
        /// The rejected field name.
        name: String,
        /// The closest whitelisted name, if one is close enough.
        suggestion: Option<String>,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl SyntaxError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(found: impl Into<String>, at: usize) -> Self {
        SyntaxError::UnexpectedToken {
            found: found.into(),
            at,
        }
    }

    /// Creates an unknown token error.
    pub fn unknown_token(token: impl Into<String>, at: usize) -> Self {
        SyntaxError::UnknownToken {
            token: token.into(),
            at,
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(name: impl Into<String>, suggestion: Option<&str>) -> Self {
        SyntaxError::UnknownField {
            name: name.into(),
            suggestion: suggestion.map(str::to_string),
        }
    }
}

/// Errors detected while testing a record against a compiled query.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    /// The record has no such field.
    #[error("record has no field '{field}'")]
    MissingField {
        /// The field the query referenced.
        field: String,
    },

    /// The literal cannot be compared against the field's value.
    #[error("cannot apply '{op}' to {field_type} field '{field}' and {literal}")]
    TypeMismatch {
        /// The field being compared.
        field: String,
        /// The comparison operator.
        op: ComparisonOp,
        /// Type of the record's value.
        field_type: &'static str,
        /// The literal from the query.
        literal: Literal,
    },
}

impl EvalError {
    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        EvalError::MissingField {
            field: field.into(),
        }
    }
}

/// Either phase's error, for callers that compile and evaluate in one go.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterError {
    /// The query could not be compiled.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// A record could not be evaluated.
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}
