//! Lexer (tokenizer) for filter expressions.

use std::iter::Peekable;
use std::str::Chars;

use super::ast::Literal;
use super::error::{SyntaxError, SyntaxResult};

/// A comparison keyword as written in the query, before `ne` is folded away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareToken {
    /// `lt`
    Lt,
    /// `gt`
    Gt,
    /// `eq`
    Eq,
    /// `ne`
    Ne,
}

impl CompareToken {
    /// The query keyword for this operator.
    pub fn keyword(self) -> &'static str {
        match self {
            CompareToken::Lt => "lt",
            CompareToken::Gt => "gt",
            CompareToken::Eq => "eq",
            CompareToken::Ne => "ne",
        }
    }
}

/// A token in a filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterToken {
    /// A field name.
    Ident(String),

    /// A quoted string, number or boolean.
    Literal(Literal),

    /// One of `lt`, `gt`, `eq`, `ne`.
    Op(CompareToken),

    /// The `AND` keyword.
    And,

    /// The `OR` keyword.
    Or,

    /// `(` or `{`.
    OpenParen,

    /// `)` or `}`.
    CloseParen,
}

impl FilterToken {
    /// Short description used in parser error messages.
    pub fn describe(&self) -> String {
        match self {
            FilterToken::Ident(name) => format!("identifier '{name}'"),
            FilterToken::Literal(literal) => format!("literal {literal}"),
            FilterToken::Op(op) => format!("operator '{}'", op.keyword()),
            FilterToken::And => "'AND'".to_string(),
            FilterToken::Or => "'OR'".to_string(),
            FilterToken::OpenParen => "'('".to_string(),
            FilterToken::CloseParen => "')'".to_string(),
        }
    }
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    /// The token.
    pub token: FilterToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// Lexer for tokenizing filter expressions.
///
/// Keywords are case-sensitive and whitespace-delimited. Braces are accepted
/// as synonyms for parentheses. The lexer stops at the first word it cannot
/// classify; parenthesis balance is left to the parser.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Reads a quoted literal. Internal whitespace is kept as-is and a
    /// backslash escapes the following character.
    fn read_quoted_string(&mut self, quote_char: char) -> SyntaxResult<String> {
        let start = self.position;
        // Consume the opening quote
        self.next_char();

        let mut result = String::new();
        loop {
            match self.next_char() {
                Some(c) if c == quote_char => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some(escaped) => result.push(escaped),
                    None => break,
                },
                Some(c) => result.push(c),
                None => break,
            }
        }
        Err(SyntaxError::UnterminatedQuote { at: start })
    }

    /// Reads a bare word: everything up to whitespace, a bracket or a quote.
    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.peek() {
            if c.is_whitespace() || is_bracket(c) || is_quote(c) {
                break;
            }
            word.push(c);
            self.next_char();
        }
        word
    }

    /// Returns the next token with its position, or `None` at end of input.
    pub fn next_token(&mut self) -> SyntaxResult<Option<PositionedToken>> {
        self.skip_whitespace();

        let Some(&c) = self.peek() else {
            return Ok(None);
        };
        let position = self.position;

        let token = match c {
            '(' | '{' => {
                self.next_char();
                FilterToken::OpenParen
            }
            ')' | '}' => {
                self.next_char();
                FilterToken::CloseParen
            }
            '\'' | '"' => FilterToken::Literal(Literal::String(self.read_quoted_string(c)?)),
            _ => {
                let word = self.read_word();
                classify_word(&word, position)?
            }
        };

        Ok(Some(PositionedToken { token, position }))
    }

    /// Collects all tokens, failing on the first lexical error.
    pub fn tokenize(mut self) -> SyntaxResult<Vec<PositionedToken>> {
        let mut tokens = Vec::new();
        while let Some(positioned_token) = self.next_token()? {
            tokens.push(positioned_token);
        }
        Ok(tokens)
    }

    /// Collects all tokens without positions.
    #[cfg(test)]
    pub fn tokenize_kinds(self) -> SyntaxResult<Vec<FilterToken>> {
        Ok(self.tokenize()?.into_iter().map(|pt| pt.token).collect())
    }
}

/// Tokenizes a query string.
pub fn tokenize(query: &str) -> SyntaxResult<Vec<PositionedToken>> {
    Lexer::new(query).tokenize()
}

fn is_bracket(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}')
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

fn classify_word(word: &str, position: usize) -> SyntaxResult<FilterToken> {
    let token = match word {
        "AND" => FilterToken::And,
        "OR" => FilterToken::Or,
        "lt" => FilterToken::Op(CompareToken::Lt),
        "gt" => FilterToken::Op(CompareToken::Gt),
        "eq" => FilterToken::Op(CompareToken::Eq),
        "ne" => FilterToken::Op(CompareToken::Ne),
        "true" => FilterToken::Literal(Literal::Bool(true)),
        "false" => FilterToken::Literal(Literal::Bool(false)),
        _ if is_identifier(word) => FilterToken::Ident(word.to_string()),
        _ => match parse_number(word) {
            Some(n) => FilterToken::Literal(Literal::Number(n)),
            None => return Err(SyntaxError::unknown_token(word, position)),
        },
    };
    Ok(token)
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Parses plain decimal notation only (`20`, `-3`, `3.5`); rejects `inf`,
/// `NaN` and exponents.
fn parse_number(word: &str) -> Option<f64> {
    let plain = word
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+'));
    if !plain || !word.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    word.parse::<f64>().ok()
}
