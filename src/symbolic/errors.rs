//! Error types of the expression engine.
//!
//! Parsing fails with [`ParseError`], evaluation with [`EvalError`].
//! Differentiation and rendering never fail.
use std::fmt;

/// Errors raised while turning a string into an expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// a character no token pattern accepts
    Lexical { symbol: char, position: usize },
    /// a token of the wrong kind at a grammar position
    UnexpectedToken { expected: String, found: String },
    UnknownOperator(String),
    UnknownFunction(String),
    /// the imaginary unit reached the parser of a real-valued expression
    ImaginaryUnitInReal,
    /// tokens left over after a complete expression
    TrailingInput(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Lexical { symbol, position } => {
                write!(f, "Unexpected symbol '{}' at position {}", symbol, position)
            }
            ParseError::UnexpectedToken { expected, found } => {
                write!(f, "Unexpected token \"{}\", expected {}", found, expected)
            }
            ParseError::UnknownOperator(op) => write!(f, "Unknown binary operator: \"{}\"", op),
            ParseError::UnknownFunction(name) => write!(f, "Unknown function: {}", name),
            ParseError::ImaginaryUnitInReal => {
                write!(f, "Imaginary unit is not supported for real numbers")
            }
            ParseError::TrailingInput(token) => {
                write!(f, "Unexpected token \"{}\" at the end of expression", token)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors raised while evaluating an expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UnresolvedVariable(String),
    DivisionByZero,
    /// argument outside the domain of a function (logarithm)
    Domain(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::UnresolvedVariable(name) => {
                write!(f, "Variable {} cannot be resolved without context", name)
            }
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::Domain(msg) => write!(f, "Domain error: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

/// Either kind of engine error, for callers that parse and evaluate in one go
#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExprError::Parse(err) => write!(f, "{}", err),
            ExprError::Eval(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ExprError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExprError::Parse(err) => Some(err),
            ExprError::Eval(err) => Some(err),
        }
    }
}

impl From<ParseError> for ExprError {
    fn from(err: ParseError) -> Self {
        ExprError::Parse(err)
    }
}

impl From<EvalError> for ExprError {
    fn from(err: EvalError) -> Self {
        ExprError::Eval(err)
    }
}
