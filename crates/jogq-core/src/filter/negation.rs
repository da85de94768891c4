//! Folding of `ne` into a negated equality.
//!
//! The parser calls [`resolve_comparison`] from its comparison production, so
//! a `ne` only ever negates the single comparison it was written in, however
//! deeply that comparison is nested.

use super::ast::{ComparisonOp, FilterExpr, Literal};
use super::lexer::CompareToken;

/// Builds the AST node for `field <op> value`.
///
/// `lt`, `gt` and `eq` become a plain comparison; `ne` becomes
/// `Not(Comparison { op: Eq })`.
pub fn resolve_comparison(field: String, op: CompareToken, value: Literal) -> FilterExpr {
    match op {
        CompareToken::Lt => FilterExpr::comparison(field, ComparisonOp::Lt, value),
        CompareToken::Gt => FilterExpr::comparison(field, ComparisonOp::Gt, value),
        CompareToken::Eq => FilterExpr::comparison(field, ComparisonOp::Eq, value),
        CompareToken::Ne => {
            FilterExpr::negate(FilterExpr::comparison(field, ComparisonOp::Eq, value))
        }
    }
}
