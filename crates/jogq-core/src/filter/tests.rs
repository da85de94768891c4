//! Tests for the filter parser.

use super::*;
use crate::FieldWhitelist;

// ==================== Helpers ====================

fn whitelist() -> FieldWhitelist {
    FieldWhitelist::new(["date", "distance", "role", "is_active", "email"])
}

fn parse_ok(input: &str) -> FilterExpr {
    FilterParser::parse(input, &whitelist()).unwrap()
}

fn parse_err(input: &str) -> SyntaxError {
    FilterParser::parse(input, &whitelist()).unwrap_err()
}

fn cmp(field: &str, op: ComparisonOp, value: Literal) -> FilterExpr {
    FilterExpr::comparison(field, op, value)
}

fn num(n: f64) -> Literal {
    Literal::Number(n)
}

fn text(s: &str) -> Literal {
    Literal::String(s.to_string())
}

// ==================== Comparison Tests ====================

#[test]
fn test_parse_single_comparison() {
    assert_eq!(
        parse_ok("(distance gt 20)"),
        cmp("distance", ComparisonOp::Gt, num(20.0))
    );
}

#[test]
fn test_parse_comparison_without_parens() {
    assert_eq!(
        parse_ok("distance lt 10"),
        cmp("distance", ComparisonOp::Lt, num(10.0))
    );
}

#[test]
fn test_parse_quoted_literal() {
    assert_eq!(
        parse_ok("(date eq '2016-05-01')"),
        cmp("date", ComparisonOp::Eq, text("2016-05-01"))
    );
}

#[test]
fn test_parse_boolean_literal() {
    assert_eq!(
        parse_ok("(is_active eq false)"),
        cmp("is_active", ComparisonOp::Eq, Literal::Bool(false))
    );
}

#[test]
fn test_parse_with_surrounding_whitespace() {
    assert_eq!(
        parse_ok("  (distance gt 20)\n"),
        cmp("distance", ComparisonOp::Gt, num(20.0))
    );
}

// ==================== Negation Tests ====================

#[test]
fn test_parse_ne_becomes_not_eq() {
    assert_eq!(
        parse_ok("(role ne 3)"),
        FilterExpr::negate(cmp("role", ComparisonOp::Eq, num(3.0)))
    );
}

#[test]
fn test_parse_ne_scoped_to_its_comparison() {
    // Only the `ne` comparison is negated, not the group around it.
    let filter = parse_ok("((distance gt 20) AND ((role ne 3) OR (date eq 'x')))");
    assert_eq!(
        filter,
        FilterExpr::and(
            cmp("distance", ComparisonOp::Gt, num(20.0)),
            FilterExpr::or(
                FilterExpr::negate(cmp("role", ComparisonOp::Eq, num(3.0))),
                cmp("date", ComparisonOp::Eq, text("x")),
            ),
        )
    );
}

#[test]
fn test_parse_multiple_ne() {
    let filter = parse_ok("(role ne 1) AND (role ne 2)");
    assert_eq!(
        filter,
        FilterExpr::and(
            FilterExpr::negate(cmp("role", ComparisonOp::Eq, num(1.0))),
            FilterExpr::negate(cmp("role", ComparisonOp::Eq, num(2.0))),
        )
    );
}

// ==================== Boolean Operator Tests ====================

#[test]
fn test_parse_documented_example() {
    let filter = parse_ok("(date eq '2016-05-01') AND ((distance gt 20) OR (distance lt 10))");
    assert_eq!(
        filter,
        FilterExpr::and(
            cmp("date", ComparisonOp::Eq, text("2016-05-01")),
            FilterExpr::or(
                cmp("distance", ComparisonOp::Gt, num(20.0)),
                cmp("distance", ComparisonOp::Lt, num(10.0)),
            ),
        )
    );
}

#[test]
fn test_parse_and_binds_tighter_than_or() {
    let filter = parse_ok("role eq 1 OR role eq 2 AND distance gt 5");
    assert_eq!(
        filter,
        FilterExpr::or(
            cmp("role", ComparisonOp::Eq, num(1.0)),
            FilterExpr::and(
                cmp("role", ComparisonOp::Eq, num(2.0)),
                cmp("distance", ComparisonOp::Gt, num(5.0)),
            ),
        )
    );
}

#[test]
fn test_parse_parentheses_override_precedence() {
    let filter = parse_ok("((role eq 1) OR (role eq 2)) AND (distance gt 5)");
    assert!(matches!(filter, FilterExpr::And { .. }));
}

#[test]
fn test_parse_and_is_left_associative() {
    let filter = parse_ok("(role eq 1) AND (role eq 2) AND (role eq 3)");
    assert_eq!(
        filter,
        FilterExpr::and(
            FilterExpr::and(
                cmp("role", ComparisonOp::Eq, num(1.0)),
                cmp("role", ComparisonOp::Eq, num(2.0)),
            ),
            cmp("role", ComparisonOp::Eq, num(3.0)),
        )
    );
}

#[test]
fn test_parse_or_is_left_associative() {
    let filter = parse_ok("(role eq 1) OR (role eq 2) OR (role eq 3)");
    assert_eq!(
        filter,
        FilterExpr::or(
            FilterExpr::or(
                cmp("role", ComparisonOp::Eq, num(1.0)),
                cmp("role", ComparisonOp::Eq, num(2.0)),
            ),
            cmp("role", ComparisonOp::Eq, num(3.0)),
        )
    );
}

#[test]
fn test_parse_braces_as_parens() {
    assert_eq!(
        parse_ok("{distance gt 20} OR {distance lt 10}"),
        parse_ok("(distance gt 20) OR (distance lt 10)")
    );
    // Mixed bracket styles pair up by nesting, not by shape.
    assert_eq!(
        parse_ok("{(distance gt 20})"),
        cmp("distance", ComparisonOp::Gt, num(20.0))
    );
}

#[test]
fn test_parse_redundant_parens() {
    assert_eq!(
        parse_ok("(((distance gt 20)))"),
        cmp("distance", ComparisonOp::Gt, num(20.0))
    );
}

// ==================== Determinism Tests ====================

#[test]
fn test_parse_is_deterministic() {
    let query = "(date eq '2016-05-01') AND ((distance gt 20) OR (role ne 3))";
    assert_eq!(parse_ok(query), parse_ok(query));
}

#[test]
fn test_display_round_trips() {
    for query in [
        "(date eq '2016-05-01') AND ((distance gt 20) OR (distance lt 10))",
        "role eq 1 OR role eq 2 AND distance gt 5",
        "(role ne 3)",
        "(email eq 'o\\'brien@example.com') OR (is_active eq true)",
        "{distance lt -2.5}",
    ] {
        let filter = parse_ok(query);
        let rendered = filter.to_string();
        assert_eq!(parse_ok(&rendered), filter, "round trip of {query}");
    }
}

#[test]
fn test_parse_from_tokens() {
    let query = "(distance gt 20) AND (role ne 3)";
    let tokens = tokenize(query).unwrap();
    assert_eq!(parse(tokens, &whitelist()).unwrap(), parse_ok(query));
    assert_eq!(compile(query, &whitelist()).unwrap(), parse_ok(query));
}

// ==================== Error Tests ====================

#[test]
fn test_parse_empty_expression() {
    assert_eq!(parse_err(""), SyntaxError::EmptyExpression);
    assert_eq!(parse_err("   "), SyntaxError::EmptyExpression);
    assert_eq!(
        parse(Vec::new(), &whitelist()).unwrap_err(),
        SyntaxError::EmptyExpression
    );
}

#[test]
fn test_parse_missing_close_paren() {
    assert_eq!(
        parse_err("(x gt 5"),
        SyntaxError::UnbalancedParens { at: 0 }
    );
    assert_eq!(
        parse_err("((distance gt 5)"),
        SyntaxError::UnbalancedParens { at: 0 }
    );
}

#[test]
fn test_parse_extra_close_paren() {
    assert_eq!(
        parse_err("x gt 5)"),
        SyntaxError::UnbalancedParens { at: 6 }
    );
    assert_eq!(
        parse_err("(distance gt 5))"),
        SyntaxError::UnbalancedParens { at: 15 }
    );
}

#[test]
fn test_parse_unknown_field() {
    let whitelist = FieldWhitelist::new(["date", "distance", "role"]);
    let err = FilterParser::parse("(unknown_field eq 1)", &whitelist).unwrap_err();
    assert_eq!(
        err,
        SyntaxError::UnknownField {
            name: "unknown_field".into(),
            suggestion: None,
        }
    );
}

#[test]
fn test_parse_unknown_field_suggestion() {
    let err = parse_err("(distanc gt 1)");
    assert_eq!(err, SyntaxError::unknown_field("distanc", Some("distance")));
    assert_eq!(
        err.to_string(),
        "unknown field 'distanc' (did you mean 'distance'?)"
    );
}

#[test]
fn test_parse_unknown_field_in_untaken_branch_still_fails() {
    // Whitelisting is checked at compile time, independent of evaluation.
    assert!(matches!(
        parse_err("(distance gt 1) OR (password eq 'x')"),
        SyntaxError::UnknownField { .. }
    ));
}

#[test]
fn test_parse_missing_literal() {
    assert_eq!(
        parse_err("(distance gt)"),
        SyntaxError::unexpected_token("')'", 12)
    );
}

#[test]
fn test_parse_missing_operator() {
    assert_eq!(
        parse_err("(distance 20)"),
        SyntaxError::unexpected_token("literal 20", 10)
    );
}

#[test]
fn test_parse_identifier_as_value() {
    assert_eq!(
        parse_err("distance eq date"),
        SyntaxError::unexpected_token("identifier 'date'", 12)
    );
}

#[test]
fn test_parse_trailing_operator() {
    assert_eq!(
        parse_err("distance gt 20 AND"),
        SyntaxError::unexpected_token("end of input", 18)
    );
}

#[test]
fn test_parse_leading_operator() {
    assert_eq!(parse_err("AND"), SyntaxError::unexpected_token("'AND'", 0));
}

#[test]
fn test_parse_missing_logical_operator() {
    assert_eq!(
        parse_err("(distance gt 20) (date eq 'x')"),
        SyntaxError::unexpected_token("'('", 17)
    );
    assert_eq!(
        parse_err("(distance gt 20 date eq 1)"),
        SyntaxError::unexpected_token("identifier 'date'", 16)
    );
}

#[test]
fn test_parse_empty_group() {
    assert_eq!(parse_err("()"), SyntaxError::unexpected_token("')'", 1));
}

#[test]
fn test_parse_lowercase_keywords_rejected() {
    assert!(matches!(
        parse_err("(distance gt 1) and (role eq 1)"),
        SyntaxError::UnexpectedToken { .. }
    ));
    assert!(matches!(
        parse_err("(distance GT 1)"),
        SyntaxError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_parse_lexer_errors_propagate() {
    assert!(matches!(
        parse_err("(distance >= 1)"),
        SyntaxError::UnknownToken { .. }
    ));
    assert!(matches!(
        parse_err("(date eq '2016)"),
        SyntaxError::UnterminatedQuote { .. }
    ));
}

#[test]
fn test_type_errors_are_not_syntax_errors() {
    // Field types are unknown at parse time.
    assert!(FilterParser::parse("(distance gt 'abc')", &whitelist()).is_ok());
    assert!(FilterParser::parse("(is_active gt true)", &whitelist()).is_ok());
}

// ==================== Limit Tests ====================

fn nested(depth: usize) -> String {
    format!("{}distance gt 1{}", "(".repeat(depth), ")".repeat(depth))
}

fn and_chain(len: usize) -> String {
    vec!["distance gt 1"; len].join(" AND ")
}

#[test]
fn test_parse_nesting_at_limit() {
    assert_eq!(
        parse_ok(&nested(MAX_NESTING_DEPTH)),
        cmp("distance", ComparisonOp::Gt, num(1.0))
    );
}

#[test]
fn test_parse_nesting_past_limit() {
    assert_eq!(
        parse_err(&nested(MAX_NESTING_DEPTH + 1)),
        SyntaxError::TooDeep {
            at: MAX_NESTING_DEPTH,
            limit: MAX_NESTING_DEPTH,
        }
    );
}

#[test]
fn test_parse_deep_nesting_is_an_error_not_a_crash() {
    assert!(matches!(
        parse_err(&nested(1500)),
        SyntaxError::TooDeep { at: 64, .. }
    ));
}

#[test]
fn test_long_chain_at_limit_evaluates() {
    let filter = parse_ok(&and_chain(MAX_COMPARISONS));
    assert_eq!(filter.fields().len(), 1);

    let record = crate::Record::new().with("distance", 5);
    assert!(evaluate(&filter, &record).unwrap());

    let rendered = filter.to_string();
    assert_eq!(rendered.matches(" AND ").count(), MAX_COMPARISONS - 1);
}

#[test]
fn test_chain_renders_within_nesting_limit() {
    // A chain of n comparisons renders n levels of parentheses.
    let filter = parse_ok(&and_chain(MAX_NESTING_DEPTH));
    assert_eq!(parse_ok(&filter.to_string()), filter);

    let filter = parse_ok(&and_chain(MAX_NESTING_DEPTH + 1));
    assert!(matches!(parse_err(&filter.to_string()), SyntaxError::TooDeep { .. }));
}

#[test]
fn test_long_chain_past_limit() {
    // Each "distance gt 1 AND " segment is 18 bytes.
    assert_eq!(
        parse_err(&and_chain(MAX_COMPARISONS + 1)),
        SyntaxError::TooManyComparisons {
            at: 18 * MAX_COMPARISONS,
            limit: MAX_COMPARISONS,
        }
    );
    assert!(matches!(
        parse_err(&and_chain(200_000)),
        SyntaxError::TooManyComparisons { .. }
    ));
}
