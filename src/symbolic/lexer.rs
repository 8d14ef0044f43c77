//! # Lexer
//!
//! Splits an expression string into [`Token`]s on demand.
//!
//! Recognition is table driven: at every position the patterns of
//! [`PATTERNS`] are tried in order (number, function call head, identifier),
//! then the single-character operators and brackets. A token is produced
//! only when the parser asks for the next one.
//!
//! Juxtaposition means multiplication: when two adjacent tokens form one of the
//! pairs in [`IMPLICIT_MULTIPLICATION`] the lexer hands out a synthetic `*`
//! first and keeps the real token in a one-slot pushback buffer, so
//! `2x(3+4)` is read as `2 * x * (3 + 4)`.
use crate::symbolic::errors::ParseError;
use crate::symbolic::numeric_domain::Domain;
use regex::Regex;
use std::fmt;
use std::marker::PhantomData;
use std::sync::LazyLock;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    Number,
    ImaginaryUnit,
    Identifier,
    Operator,
    LeftParen,
    RightParen,
    /// function name together with its opening bracket, e.g. `sin(`
    Function,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str) -> Self {
        Token {
            kind,
            text: text.to_string(),
        }
    }

    pub fn end() -> Self {
        Token::new(TokenKind::EndOfInput, "")
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "end of input"),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// Ordered recognition table; earlier entries win
pub static PATTERNS: LazyLock<Vec<(TokenKind, Regex)>> = LazyLock::new(|| {
    vec![
        (
            TokenKind::Number,
            Regex::new(r"^(0|[1-9][0-9]*)(\.[0-9]+)?").unwrap(),
        ),
        (
            TokenKind::Function,
            Regex::new(r"(?i)^(sin|cos|ln|exp)\(").unwrap(),
        ),
        (TokenKind::Identifier, Regex::new(r"^[a-zA-Z_]+").unwrap()),
    ]
});

/// (previous, current) kinds between which a `*` is implied
pub const IMPLICIT_MULTIPLICATION: [(TokenKind, TokenKind); 11] = [
    (TokenKind::Number, TokenKind::Identifier),
    (TokenKind::Number, TokenKind::Function),
    (TokenKind::Number, TokenKind::LeftParen),
    (TokenKind::Number, TokenKind::ImaginaryUnit),
    (TokenKind::Identifier, TokenKind::LeftParen),
    (TokenKind::ImaginaryUnit, TokenKind::LeftParen),
    (TokenKind::RightParen, TokenKind::LeftParen),
    (TokenKind::RightParen, TokenKind::Number),
    (TokenKind::RightParen, TokenKind::ImaginaryUnit),
    (TokenKind::RightParen, TokenKind::Identifier),
    (TokenKind::RightParen, TokenKind::Function),
];

/// Lazy tokenizer over one input string.
///
/// The domain parameter decides whether `i` is the imaginary unit or a variable.
pub struct Lexer<T> {
    input: String,
    pos: usize,
    pushback: Option<Token>,
    prev_kind: TokenKind,
    exhausted: bool,
    _domain: PhantomData<T>,
}

impl<T: Domain> Lexer<T> {
    /// With `case_insensitive` set the input is lower-cased before scanning
    pub fn new(input: &str, case_insensitive: bool) -> Self {
        let input = if case_insensitive {
            input.to_lowercase()
        } else {
            input.to_string()
        };
        Lexer {
            input,
            pos: 0,
            pushback: None,
            prev_kind: TokenKind::EndOfInput,
            exhausted: false,
            _domain: PhantomData,
        }
    }

    /// Next token; keeps returning `EndOfInput` once the input is consumed
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        if let Some(token) = self.pushback.take() {
            return Ok(token);
        }

        let token = self.scan()?;
        if token.kind == TokenKind::EndOfInput {
            return Ok(token);
        }

        if IMPLICIT_MULTIPLICATION.contains(&(self.prev_kind, token.kind)) {
            self.prev_kind = token.kind;
            self.pushback = Some(token);
            return Ok(Token::new(TokenKind::Operator, "*"));
        }

        self.prev_kind = token.kind;
        Ok(token)
    }

    /// The real token held back behind a synthetic `*`, if one was just issued
    pub fn pending(&self) -> Option<&Token> {
        self.pushback.as_ref()
    }

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn scan(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();

        let Some(current) = self.rest().chars().next() else {
            return Ok(Token::end());
        };

        for (kind, regexp) in PATTERNS.iter() {
            if let Some(found) = regexp.find(self.rest()) {
                let text = found.as_str().to_string();
                self.pos += text.len();
                if *kind == TokenKind::Identifier
                    && text == "i"
                    && T::imaginary_unit().is_some()
                {
                    return Ok(Token::new(TokenKind::ImaginaryUnit, &text));
                }
                return Ok(Token { kind: *kind, text });
            }
        }

        let position = self.pos;
        self.pos += current.len_utf8();
        let kind = match current {
            '+' | '-' | '*' | '/' | '^' => TokenKind::Operator,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            _ => {
                return Err(ParseError::Lexical {
                    symbol: current,
                    position,
                });
            }
        };
        Ok(Token::new(kind, &current.to_string()))
    }
}

/// Yields every token up to and including `EndOfInput`, or up to the first error
impl<T: Domain> Iterator for Lexer<T> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let next = self.next_token();
        if !matches!(next, Ok(ref token) if token.kind != TokenKind::EndOfInput) {
            self.exhausted = true;
        }
        Some(next)
    }
}
