//! Filter evaluation against records.
//!
//! This module provides the [`FilterEvaluator`] for testing parsed filter
//! expressions against [`Record`]s. It is a closed interpreter over the
//! [`FilterExpr`] tree: nothing in a query can reach any other code path.
//!
//! # Comparison rules
//!
//! | record value | literal            | comparison                               |
//! |--------------|--------------------|------------------------------------------|
//! | number       | number             | numeric                                  |
//! | number       | numeric text       | numeric                                  |
//! | numeric text | number             | numeric                                  |
//! | string       | string             | lexicographic                            |
//! | timestamp    | string             | as ISO-8601 (date-only compares the day) |
//! | boolean      | boolean            | `eq` only                                |
//! | null         | anything           | never matches                            |
//!
//! Every other combination is an [`EvalError::TypeMismatch`].
//!
//! # Example
//!
//! ```
//! use jogq_core::filter::{FilterEvaluator, FilterParser};
//! use jogq_core::{FieldWhitelist, Record};
//!
//! let whitelist = FieldWhitelist::jogs();
//! let filter = FilterParser::parse("(distance gt 20)", &whitelist).unwrap();
//! let evaluator = FilterEvaluator::new(&filter);
//!
//! let record = Record::new().with("distance", 25);
//! assert!(evaluator.matches(&record).unwrap());
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveDate};

use super::ast::{ComparisonOp, FilterExpr, Literal};
use super::error::{EvalError, EvalResult};
use crate::record::{Record, Value};

/// Evaluates a parsed filter against records.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    filter: &'a FilterExpr,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    pub fn new(filter: &'a FilterExpr) -> Self {
        Self { filter }
    }

    /// The expression being evaluated.
    pub fn filter(&self) -> &'a FilterExpr {
        self.filter
    }

    /// Returns whether the record matches the filter.
    ///
    /// # Errors
    ///
    /// Returns `EvalError::MissingField` if a comparison that has to be
    /// evaluated refers to a field the record lacks, and
    /// `EvalError::TypeMismatch` if the literal cannot be compared against
    /// the field's value.
    pub fn matches(&self, record: &Record) -> EvalResult<bool> {
        evaluate_filter(self.filter, record)
    }
}

/// Evaluates `expr` against a single record.
pub fn evaluate(expr: &FilterExpr, record: &Record) -> EvalResult<bool> {
    evaluate_filter(expr, record)
}

fn evaluate_filter(filter: &FilterExpr, record: &Record) -> EvalResult<bool> {
    match filter {
        FilterExpr::Comparison { field, op, value } => {
            let actual = record
                .get(field)
                .ok_or_else(|| EvalError::missing_field(field.as_str()))?;
            compare(field, *op, actual, value)
        }
        FilterExpr::Not { inner } => Ok(!evaluate_filter(inner, record)?),
        // The right operand is only evaluated when it can change the result.
        FilterExpr::And { left, right } => {
            Ok(evaluate_filter(left, record)? && evaluate_filter(right, record)?)
        }
        FilterExpr::Or { left, right } => {
            Ok(evaluate_filter(left, record)? || evaluate_filter(right, record)?)
        }
    }
}

/// Compares a record value against a query literal.
fn compare(field: &str, op: ComparisonOp, actual: &Value, literal: &Literal) -> EvalResult<bool> {
    let mismatch = || EvalError::TypeMismatch {
        field: field.to_string(),
        op,
        field_type: actual.type_name(),
        literal: literal.clone(),
    };

    let ordering = match (actual, literal) {
        (Value::Null, _) => return Ok(false),
        (Value::Bool(a), Literal::Bool(b)) if op == ComparisonOp::Eq => return Ok(a == b),
        (Value::Number(a), Literal::Number(b)) => a.partial_cmp(b),
        (Value::Number(a), Literal::String(b)) => {
            let b = parse_numeric_text(b).ok_or_else(mismatch)?;
            a.partial_cmp(&b)
        }
        (Value::String(a), Literal::Number(b)) => {
            let a = parse_numeric_text(a).ok_or_else(mismatch)?;
            a.partial_cmp(b)
        }
        (Value::String(a), Literal::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::Timestamp(a), Literal::String(b)) => Some(compare_timestamp(a, b)),
        _ => return Err(mismatch()),
    };

    let ordering = ordering.ok_or_else(mismatch)?;
    let matched = match op {
        ComparisonOp::Lt => ordering == Ordering::Less,
        ComparisonOp::Gt => ordering == Ordering::Greater,
        ComparisonOp::Eq => ordering == Ordering::Equal,
    };
    tracing::trace!(field, op = %op, matched, "evaluated comparison");
    Ok(matched)
}

/// Parses text such as `"25.00"` as a finite number.
fn parse_numeric_text(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Orders a timestamp against ISO-8601 text.
///
/// A `YYYY-MM-DD` literal compares against the timestamp's calendar day in
/// its own offset; a full RFC 3339 literal compares instants; anything else
/// falls back to comparing the rendered RFC 3339 text.
fn compare_timestamp(ts: &DateTime<FixedOffset>, literal: &str) -> Ordering {
    if let Ok(date) = NaiveDate::parse_from_str(literal, "%Y-%m-%d") {
        return ts.date_naive().cmp(&date);
    }
    if let Ok(other) = DateTime::parse_from_rfc3339(literal) {
        return ts.cmp(&other);
    }
    ts.to_rfc3339().as_str().cmp(literal)
}
