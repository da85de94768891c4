//! Recursive descent parser for filter expressions.

use super::ast::FilterExpr;
use super::error::{SyntaxError, SyntaxResult};
use super::lexer::{FilterToken, Lexer, PositionedToken};
use super::negation::resolve_comparison;
use crate::schema::FieldWhitelist;

/// Maximum nesting depth of `(...)` groups.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum number of comparisons in one query.
///
/// Bounds the height of the expression tree, which chains of `AND`/`OR`
/// grow by one level per comparison.
pub const MAX_COMPARISONS: usize = 512;

/// Parser for filter query strings.
///
/// # Grammar
///
/// ```text
/// query      ::= or_expr
/// or_expr    ::= and_expr ("OR" and_expr)*
/// and_expr   ::= group ("AND" group)*
/// group      ::= "(" query ")" | comparison
/// comparison ::= ident ("lt" | "gt" | "eq" | "ne") literal
/// ```
///
/// `{` and `}` are accepted wherever `(` and `)` are.
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `AND` - binary, left-associative
/// 2. `OR` - binary, left-associative
///
/// Parentheses override precedence, so unparenthesized input such as
/// `a eq 1 OR b eq 2 AND c eq 3` is well defined.
///
/// # Example
///
/// ```
/// use jogq_core::filter::{FilterExpr, FilterParser};
/// use jogq_core::FieldWhitelist;
///
/// let whitelist = FieldWhitelist::jogs();
/// let filter = FilterParser::parse("(distance gt 20) OR (distance lt 10)", &whitelist).unwrap();
/// assert!(matches!(filter, FilterExpr::Or { .. }));
/// ```
pub struct FilterParser<'w> {
    tokens: Vec<PositionedToken>,
    position: usize,
    /// Offset reported for errors at end of input.
    end: usize,
    depth: usize,
    comparisons: usize,
    whitelist: &'w FieldWhitelist,
}

impl<'w> FilterParser<'w> {
    /// Creates a parser over an already tokenized query.
    pub fn new(tokens: Vec<PositionedToken>, whitelist: &'w FieldWhitelist) -> Self {
        let end = tokens.last().map_or(0, |t| t.position + 1);
        Self {
            tokens,
            position: 0,
            end,
            depth: 0,
            comparisons: 0,
            whitelist,
        }
    }

    /// Parses a filter query string into a [`FilterExpr`].
    ///
    /// # Errors
    ///
    /// Returns `SyntaxError::EmptyExpression` if the input is blank.
    ///
    /// Returns `SyntaxError::UnknownToken` or `SyntaxError::UnterminatedQuote`
    /// if the input cannot be tokenized.
    ///
    /// Returns `SyntaxError::UnbalancedParens` if parentheses do not pair up,
    /// `SyntaxError::UnexpectedToken` on any other structural mismatch, and
    /// `SyntaxError::UnknownField` if a field is not in `whitelist`.
    ///
    /// Returns `SyntaxError::TooDeep` or `SyntaxError::TooManyComparisons`
    /// if the query exceeds [`MAX_NESTING_DEPTH`] or [`MAX_COMPARISONS`].
    pub fn parse(input: &str, whitelist: &'w FieldWhitelist) -> SyntaxResult<FilterExpr> {
        if input.trim().is_empty() {
            return Err(SyntaxError::EmptyExpression);
        }

        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Self::new(tokens, whitelist);
        parser.end = input.len();

        let filter = parser.parse_all()?;
        tracing::debug!(query = input, compiled = %filter, "compiled filter query");
        Ok(filter)
    }

    /// Parses the whole token stream.
    pub fn parse_all(&mut self) -> SyntaxResult<FilterExpr> {
        if self.tokens.is_empty() {
            return Err(SyntaxError::EmptyExpression);
        }

        check_balance(&self.tokens)?;
        let filter = self.parse_query()?;

        // Check that we consumed all tokens
        if let Some(remaining) = self.peek() {
            return Err(SyntaxError::unexpected_token(
                remaining.token.describe(),
                remaining.position,
            ));
        }

        Ok(filter)
    }

    fn peek(&self) -> Option<&PositionedToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<PositionedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn check(&self, expected: &FilterToken) -> bool {
        self.peek().map(|t| &t.token) == Some(expected)
    }

    fn end_of_input(&self) -> SyntaxError {
        SyntaxError::unexpected_token("end of input", self.end)
    }

    fn parse_query(&mut self) -> SyntaxResult<FilterExpr> {
        self.parse_or_expr()
    }

    /// Parses OR expressions: `and_expr ("OR" and_expr)*`
    fn parse_or_expr(&mut self) -> SyntaxResult<FilterExpr> {
        let mut left = self.parse_and_expr()?;

        while self.check(&FilterToken::Or) {
            self.advance();
            let right = self.parse_and_expr()?;
            left = FilterExpr::or(left, right);
        }

        Ok(left)
    }

    /// Parses AND expressions: `group ("AND" group)*`
    fn parse_and_expr(&mut self) -> SyntaxResult<FilterExpr> {
        let mut left = self.parse_group()?;

        while self.check(&FilterToken::And) {
            self.advance();
            let right = self.parse_group()?;
            left = FilterExpr::and(left, right);
        }

        Ok(left)
    }

    /// Parses groups: `"(" query ")" | comparison`
    fn parse_group(&mut self) -> SyntaxResult<FilterExpr> {
        if !self.check(&FilterToken::OpenParen) {
            return self.parse_comparison();
        }

        let open = self.advance();
        if self.depth == MAX_NESTING_DEPTH {
            return Err(SyntaxError::TooDeep {
                at: open.map_or(self.end, |t| t.position),
                limit: MAX_NESTING_DEPTH,
            });
        }

        self.depth += 1;
        let inner = self.parse_query()?;
        self.depth -= 1;
        match self.advance() {
            Some(PositionedToken {
                token: FilterToken::CloseParen,
                ..
            }) => Ok(inner),
            Some(other) => Err(SyntaxError::unexpected_token(
                other.token.describe(),
                other.position,
            )),
            None => Err(self.end_of_input()),
        }
    }

    /// Parses comparisons: `ident op literal`
    fn parse_comparison(&mut self) -> SyntaxResult<FilterExpr> {
        let field = match self.advance() {
            Some(PositionedToken {
                token: FilterToken::Ident(name),
                position,
            }) => {
                if self.comparisons == MAX_COMPARISONS {
                    return Err(SyntaxError::TooManyComparisons {
                        at: position,
                        limit: MAX_COMPARISONS,
                    });
                }
                self.comparisons += 1;
                name
            }
            Some(other) => {
                return Err(SyntaxError::unexpected_token(
                    other.token.describe(),
                    other.position,
                ))
            }
            None => return Err(self.end_of_input()),
        };

        if !self.whitelist.contains(&field) {
            let suggestion = self.whitelist.suggest(&field);
            return Err(SyntaxError::unknown_field(field, suggestion));
        }

        let op = match self.advance() {
            Some(PositionedToken {
                token: FilterToken::Op(op),
                ..
            }) => op,
            Some(other) => {
                return Err(SyntaxError::unexpected_token(
                    other.token.describe(),
                    other.position,
                ))
            }
            None => return Err(self.end_of_input()),
        };

        let value = match self.advance() {
            Some(PositionedToken {
                token: FilterToken::Literal(value),
                ..
            }) => value,
            Some(other) => {
                return Err(SyntaxError::unexpected_token(
                    other.token.describe(),
                    other.position,
                ))
            }
            None => return Err(self.end_of_input()),
        };

        Ok(resolve_comparison(field, op, value))
    }
}

/// Verifies that every `(` has a matching `)` and vice versa.
///
/// Runs before the grammar so that a missing bracket is reported as such
/// rather than as whatever token happens to follow it.
fn check_balance(tokens: &[PositionedToken]) -> SyntaxResult<()> {
    let mut open = Vec::new();
    for t in tokens {
        match t.token {
            FilterToken::OpenParen => open.push(t.position),
            FilterToken::CloseParen => {
                if open.pop().is_none() {
                    return Err(SyntaxError::UnbalancedParens { at: t.position });
                }
            }
            _ => {}
        }
    }

    match open.last() {
        Some(&at) => Err(SyntaxError::UnbalancedParens { at }),
        None => Ok(()),
    }
}

/// Parses an already tokenized query.
pub fn parse(
    tokens: Vec<PositionedToken>,
    whitelist: &FieldWhitelist,
) -> SyntaxResult<FilterExpr> {
    FilterParser::new(tokens, whitelist).parse_all()
}

/// Tokenizes and parses a query string in one step.
pub fn compile(query: &str, whitelist: &FieldWhitelist) -> SyntaxResult<FilterExpr> {
    FilterParser::parse(query, whitelist)
}
