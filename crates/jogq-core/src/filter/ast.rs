//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;

/// Comparison operators that survive parsing.
///
/// `ne` is not represented here: it is folded into [`FilterExpr::Not`] around
/// an [`ComparisonOp::Eq`] comparison while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// `lt`
    Lt,
    /// `gt`
    Gt,
    /// `eq`
    Eq,
}

impl ComparisonOp {
    /// The query keyword for this operator.
    pub fn keyword(self) -> &'static str {
        match self {
            ComparisonOp::Lt => "lt",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Eq => "eq",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A literal value written in a query.
///
/// Typing is deferred: the evaluator decides whether a literal can be
/// compared against a particular record value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A quoted string, e.g. `'2016-05-01'`.
    String(String),
    /// A bare integer or decimal, e.g. `20` or `3.5`.
    Number(f64),
    /// A bare `true` or `false`.
    Bool(bool),
}

impl Literal {
    /// Returns the name of this literal's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Number(_) => "number",
            Literal::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("'")
            }
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Represents a parsed filter expression.
///
/// The tree is immutable once built and holds no references, so it can be
/// shared across threads and reused for any number of records.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// `field op value`
    Comparison {
        /// Field looked up in each record.
        field: String,
        /// How the field's value is compared.
        op: ComparisonOp,
        /// The right-hand side.
        value: Literal,
    },

    /// Logical NOT. Only produced for `ne` comparisons.
    Not {
        /// The negated comparison.
        inner: Box<FilterExpr>,
    },

    /// Logical AND of two expressions.
    And {
        /// Evaluated first.
        left: Box<FilterExpr>,
        /// Evaluated only when `left` is true.
        right: Box<FilterExpr>,
    },

    /// Logical OR of two expressions.
    Or {
        /// Evaluated first.
        left: Box<FilterExpr>,
        /// Evaluated only when `left` is false.
        right: Box<FilterExpr>,
    },
}

impl FilterExpr {
    /// Creates a comparison node.
    ///
    /// # Example
    ///
    /// ```
    /// use jogq_core::filter::{ComparisonOp, FilterExpr, Literal};
    ///
    /// let expr = FilterExpr::comparison("distance", ComparisonOp::Gt, Literal::Number(20.0));
    /// assert_eq!(expr.to_string(), "(distance gt 20)");
    /// ```
    pub fn comparison(field: impl Into<String>, op: ComparisonOp, value: Literal) -> Self {
        FilterExpr::Comparison {
            field: field.into(),
            op,
            value,
        }
    }

    /// Creates an AND node from two expressions.
    pub fn and(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an OR node from two expressions.
    pub fn or(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a NOT node.
    pub fn negate(inner: FilterExpr) -> Self {
        FilterExpr::Not {
            inner: Box::new(inner),
        }
    }

    /// Collects the distinct field names referenced by the expression, in
    /// order of first appearance.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterExpr::Comparison { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
            FilterExpr::Not { inner } => inner.collect_fields(out),
            FilterExpr::And { left, right } | FilterExpr::Or { left, right } => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
        }
    }
}

/// Renders the canonical query text. Every comparison and every binary node
/// is parenthesized, so the output parses back to the same tree.
impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Comparison { field, op, value } => write!(f, "({field} {op} {value})"),
            FilterExpr::Not { inner } => match inner.as_ref() {
                FilterExpr::Comparison {
                    field,
                    op: ComparisonOp::Eq,
                    value,
                } => write!(f, "({field} ne {value})"),
                // Not outside a `ne` comparison cannot come out of the parser.
                other => write!(f, "NOT {other}"),
            },
            FilterExpr::And { left, right } => write!(f, "({left} AND {right})"),
            FilterExpr::Or { left, right } => write!(f, "({left} OR {right})"),
        }
    }
}
