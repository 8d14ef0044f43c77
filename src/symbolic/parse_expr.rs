//! a module turns a String expression into a symbolic expression
//!# Example
//! ```
//! use RustedExpr::symbolic::parse_expr::Parser;
//! let parsed = Parser::<f64>::new("2 + 3 * 4", false).and_then(|p| p.parse()).unwrap();
//! assert_eq!(parsed.to_string(), "(2 + (3 * 4))");
//! ```
//                  precedence climbing for "2 + 3 * 4 ^ 2"
//                |  left  | op | right                     |
//                |________|____|___________________________|
//                |   2    | +  | 3   next op * binds harder |
//                |        |    |  \|/ absorb from level 1  |
//                |        |    |  3  | * | 4  next ^ harder|
//                |        |    |     |   |  \|/ level 2    |
//                |        |    |     |   |  4 ^ 2          |
//                |________|____|_____|___|_________________|
//                  2 + (3 * (4 ^ 2))
use crate::symbolic::errors::ParseError;
use crate::symbolic::lexer::{Lexer, Token, TokenKind};
use crate::symbolic::numeric_domain::Domain;
use crate::symbolic::symbolic_engine::{Expression, Node};
use std::rc::Rc;

/// Binding strength of the binary operators, weakest first.
///
/// Division sits above multiplication: a `/` right after a product's right
/// operand is absorbed into it, so `a * b / c` is `a * (b / c)`, while
/// `a / b * c` stays `(a / b) * c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OpPrecedence {
    AddSub = 0,
    Mult = 1,
    Div = 2,
    Pow = 3,
}

impl OpPrecedence {
    pub fn of(op: &str) -> Result<OpPrecedence, ParseError> {
        match op {
            "+" | "-" => Ok(OpPrecedence::AddSub),
            "*" => Ok(OpPrecedence::Mult),
            "/" => Ok(OpPrecedence::Div),
            "^" => Ok(OpPrecedence::Pow),
            _ => Err(ParseError::UnknownOperator(op.to_string())),
        }
    }

    /// the level right above this one
    fn raised(self) -> OpPrecedence {
        match self {
            OpPrecedence::AddSub => OpPrecedence::Mult,
            OpPrecedence::Mult => OpPrecedence::Div,
            OpPrecedence::Div | OpPrecedence::Pow => OpPrecedence::Pow,
        }
    }
}

fn binary_node<T>(op: &str, left: Rc<Node<T>>, right: Rc<Node<T>>) -> Result<Node<T>, ParseError> {
    match op {
        "+" => Ok(Node::Add(left, right)),
        "-" => Ok(Node::Sub(left, right)),
        "*" => Ok(Node::Mul(left, right)),
        "/" => Ok(Node::Div(left, right)),
        "^" => Ok(Node::Pow(left, right)),
        _ => Err(ParseError::UnknownOperator(op.to_string())),
    }
}

fn function_node<T>(name: &str, argument: Rc<Node<T>>) -> Result<Node<T>, ParseError> {
    match name {
        "sin" => Ok(Node::Sin(argument)),
        "cos" => Ok(Node::Cos(argument)),
        "ln" => Ok(Node::Ln(argument)),
        "exp" => Ok(Node::Exp(argument)),
        _ => Err(ParseError::UnknownFunction(name.to_string())),
    }
}

/// Precedence-climbing parser reading tokens from a [`Lexer`] one at a time
pub struct Parser<T> {
    lexer: Lexer<T>,
    cur_token: Token,
}

impl<T: Domain> Parser<T> {
    /// Reads the first token; a lexical error there is reported right away
    pub fn new(input: &str, case_insensitive: bool) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input, case_insensitive);
        let cur_token = lexer.next_token()?;
        Ok(Parser { lexer, cur_token })
    }

    /// Parses the whole input into one expression
    pub fn parse(mut self) -> Result<Expression<T>, ParseError> {
        let root = self.parse_expression()?;
        if self.cur_token.kind != TokenKind::EndOfInput {
            return Err(ParseError::TrailingInput(self.cur_token.to_string()));
        }
        Ok(Expression::from_node(root))
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.cur_token = self.lexer.next_token()?;
        Ok(())
    }

    fn consume(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        if self.cur_token.kind != expected {
            return Err(self.unexpected(&expected.to_string()));
        }
        self.advance()
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.cur_token.to_string(),
        }
    }

    fn parse_expression(&mut self) -> Result<Rc<Node<T>>, ParseError> {
        let left = self.parse_primary()?;
        self.parse_op_right(OpPrecedence::AddSub, left)
    }

    fn parse_op_right(
        &mut self,
        min_precedence: OpPrecedence,
        mut left: Rc<Node<T>>,
    ) -> Result<Rc<Node<T>>, ParseError> {
        while !matches!(
            self.cur_token.kind,
            TokenKind::EndOfInput | TokenKind::RightParen
        ) {
            if self.cur_token.kind != TokenKind::Operator {
                return Err(self.unexpected("binary operator"));
            }
            let op = self.cur_token.text.clone();
            let op_precedence = OpPrecedence::of(&op)?;
            if op_precedence < min_precedence {
                break;
            }

            self.advance()?;
            let mut right = self.parse_primary()?;

            // a stronger operator after the right operand takes it over
            if self.cur_token.kind == TokenKind::Operator {
                let next_precedence = OpPrecedence::of(&self.cur_token.text)?;
                if op_precedence < next_precedence {
                    right = self.parse_op_right(op_precedence.raised(), right)?;
                }
            }

            left = Rc::new(binary_node(&op, left, right)?);
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Rc<Node<T>>, ParseError> {
        match self.cur_token.kind {
            TokenKind::LeftParen => self.parse_parentheses_expr(),
            TokenKind::Function => self.parse_function(),
            TokenKind::Number => self.parse_number(),
            TokenKind::ImaginaryUnit => self.parse_imaginary_unit(),
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::Operator if self.cur_token.text == "-" => self.parse_negation(),
            _ => Err(self.unexpected("operand")),
        }
    }

    /// true right after a number when the lexer inserted `*` before an `i`
    fn imaginary_unit_follows(&self) -> bool {
        self.cur_token.is_operator("*")
            && self
                .lexer
                .pending()
                .is_some_and(|token| token.kind == TokenKind::ImaginaryUnit)
    }

    // "2i" is one literal unless a power follows: "2i^2" is 2 * (i^2)
    fn parse_number(&mut self) -> Result<Rc<Node<T>>, ParseError> {
        let value: f64 = self
            .cur_token
            .text
            .parse()
            .map_err(|_| self.unexpected("number"))?;
        let coefficient = T::from_real(value);
        self.advance()?;
        if !self.imaginary_unit_follows() {
            return Ok(Rc::new(Node::Value(coefficient)));
        }

        self.advance()?;
        let unit = T::imaginary_unit().ok_or(ParseError::ImaginaryUnitInReal)?;
        self.advance()?;
        if self.cur_token.is_operator("^") {
            let power = self.parse_op_right(OpPrecedence::Pow, Rc::new(Node::Value(unit)))?;
            return Ok(Rc::new(Node::Mul(Rc::new(Node::Value(coefficient)), power)));
        }
        Ok(Rc::new(Node::Value(coefficient * unit)))
    }

    fn parse_imaginary_unit(&mut self) -> Result<Rc<Node<T>>, ParseError> {
        let unit = T::imaginary_unit().ok_or(ParseError::ImaginaryUnitInReal)?;
        self.advance()?;
        Ok(Rc::new(Node::Value(unit)))
    }

    fn parse_identifier(&mut self) -> Result<Rc<Node<T>>, ParseError> {
        let name = self.cur_token.text.clone();
        self.advance()?;
        Ok(Rc::new(Node::Variable(name)))
    }

    // leading minus applies after powers: -x^2 is -(x^2); a bare literal
    // operand folds into a negative literal, anything else becomes -1 * operand
    fn parse_negation(&mut self) -> Result<Rc<Node<T>>, ParseError> {
        self.advance()?;
        let mut operand = self.parse_primary()?;
        if self.cur_token.is_operator("^") {
            operand = self.parse_op_right(OpPrecedence::Pow, operand)?;
        } else if let Node::Value(value) = &*operand {
            return Ok(Rc::new(Node::Value(-*value)));
        }
        let minus_one = Rc::new(Node::Value(-T::one()));
        Ok(Rc::new(Node::Mul(minus_one, operand)))
    }

    fn parse_parentheses_expr(&mut self) -> Result<Rc<Node<T>>, ParseError> {
        self.consume(TokenKind::LeftParen)?;
        let expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;
        Ok(expr)
    }

    fn parse_function(&mut self) -> Result<Rc<Node<T>>, ParseError> {
        let text = &self.cur_token.text;
        let func_name = text[..text.len() - 1].to_string();
        self.consume(TokenKind::Function)?;
        let argument = self.parse_expression()?;
        self.consume(TokenKind::RightParen)?;
        Ok(Rc::new(function_node(&func_name, argument)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex;
    use std::collections::HashMap;

    fn parse(input: &str) -> Result<Expression<f64>, ParseError> {
        Parser::<f64>::new(input, true)?.parse()
    }

    fn eval(input: &str) -> f64 {
        parse(input).unwrap().eval().unwrap()
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse("42").unwrap();
        assert_eq!(**expr.root(), Node::Value(42.0));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse("x").unwrap();
        assert_eq!(**expr.root(), Node::Variable("x".to_string()));
    }

    #[test]
    fn test_precedence() {
        assert_relative_eq!(eval("2 + 3 * 4"), 14.0);
        assert_relative_eq!(eval("(2 + 3) * 4"), 20.0);
        assert_relative_eq!(eval("2 + 3 * 4 ^ 2"), 50.0);
        assert_relative_eq!(eval("2 ^ 3 + 1"), 9.0);
        assert_relative_eq!(eval("10 - 2 - 3"), 5.0);
    }

    #[test]
    fn test_division_binds_tighter_than_multiplication() {
        let expr = parse("a * b / c").unwrap();
        assert_eq!(expr.to_string(), "(a * (b / c))");
        let expr = parse("a * b / c / d").unwrap();
        assert_eq!(expr.to_string(), "(a * ((b / c) / d))");
        // only a strictly stronger operator is absorbed
        let expr = parse("a / b * c").unwrap();
        assert_eq!(expr.to_string(), "((a / b) * c)");
        assert_relative_eq!(eval("8 / 2 * 2"), 8.0);
    }

    #[test]
    fn test_parse_functions() {
        let expr = parse("sin(x) + cos(y)").unwrap();
        assert_eq!(expr.to_string(), "(sin(x) + cos(y))");
        let expr = parse("exp(ln(x))").unwrap();
        assert_eq!(expr.to_string(), "exp(ln(x))");
        assert_relative_eq!(eval("exp(0) + ln(1)"), 1.0);
    }

    #[test]
    fn test_implicit_multiplication() {
        let expr = parse("2x(3+4)").unwrap();
        assert_eq!(expr.to_string(), "((2 * x) * (3 + 4))");
        let bindings = HashMap::from([("x".to_string(), 2.0)]);
        assert_relative_eq!(expr.eval_with(&bindings).unwrap(), 28.0);
        assert_relative_eq!(eval("(1+1)(2+2)"), 8.0);
        assert_relative_eq!(eval("2sin(0)"), 0.0);
    }

    #[test]
    fn test_power_rendering() {
        let expr = parse("x^2").unwrap();
        assert_eq!(expr.to_string(), "(x) ^ (2)");
    }

    #[test]
    fn test_unary_minus() {
        assert_relative_eq!(eval("-3 + 5"), 2.0);
        assert_relative_eq!(eval("2 * -3"), -6.0);
        let expr = parse("-x").unwrap();
        assert_eq!(expr.to_string(), "(-1 * x)");
        assert_eq!(parse("-1").unwrap().to_string(), "-1");
    }

    #[test]
    fn test_unary_minus_applies_after_power() {
        let expr = parse("-x ^ 2").unwrap();
        assert_eq!(expr.to_string(), "(-1 * (x) ^ (2))");
        let bindings = HashMap::from([("x".to_string(), 3.0)]);
        assert_relative_eq!(expr.eval_with(&bindings).unwrap(), -9.0);
        assert_relative_eq!(eval("-2 ^ 2"), -4.0);
        assert_relative_eq!(eval("1 - -2 ^ 2"), 5.0);
        assert_relative_eq!(eval("-2 ^ 2 ^ 2"), -16.0);
        // brackets still make the sign part of the base
        assert_relative_eq!(eval("(-2) ^ 2"), 4.0);
        assert_relative_eq!(eval("2 * -3"), -6.0);
    }

    #[test]
    fn test_complex_product() {
        let expr = Parser::<Complex<f64>>::new("(2 + 3i) * (4 - 5i)", true)
            .unwrap()
            .parse()
            .unwrap();
        let value = expr.eval().unwrap();
        assert_relative_eq!(value.re, 23.0);
        assert_relative_eq!(value.im, 2.0);
    }

    #[test]
    fn test_complex_literals() {
        let expr = Parser::<Complex<f64>>::new("-i + 2", true)
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(expr.eval().unwrap(), Complex::new(2.0, -1.0));
        let expr = Parser::<Complex<f64>>::new("7", true)
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(**expr.root(), Node::Value(Complex::new(7.0, 0.0)));
    }

    #[test]
    fn test_imaginary_literal_is_one_value() {
        let parse_complex = |input: &str| {
            Parser::<Complex<f64>>::new(input, true)
                .unwrap()
                .parse()
                .unwrap()
        };
        let expr = parse_complex("1 / 2i");
        assert_eq!(expr.to_string(), "(1 / 2i)");
        assert_eq!(
            *expr.root(),
            Rc::new(Node::Div(
                Rc::new(Node::Value(Complex::new(1.0, 0.0))),
                Rc::new(Node::Value(Complex::new(0.0, 2.0)))
            ))
        );
        let value = expr.eval().unwrap();
        assert_relative_eq!(value.re, 0.0);
        assert_relative_eq!(value.im, -0.5);
        // an explicit product is not folded
        assert_eq!(parse_complex("2 * i").to_string(), "(2 * i)");
        // the power binds to the unit only
        let squared = parse_complex("2i^2");
        assert_eq!(squared.to_string(), "(2 * (i) ^ (2))");
        assert_relative_eq!(squared.eval().unwrap().re, -2.0, epsilon = 1e-12);
        assert_eq!(parse_complex("-3i").eval().unwrap(), Complex::new(0.0, -3.0));
    }

    #[test]
    fn test_imaginary_unit_in_real_mode_is_a_variable() {
        let expr = parse("2i").unwrap();
        assert_eq!(expr.variables(), vec!["i".to_string()]);
    }

    #[test]
    fn test_missing_closing_bracket() {
        let err = parse("(x + y").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "RightParen".to_string(),
                found: "end of input".to_string()
            }
        );
        assert!(parse("sin(x").is_err());
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(
            parse("(x))").unwrap_err(),
            ParseError::TrailingInput(")".to_string())
        );
    }

    #[test]
    fn test_operator_expected() {
        let err = parse("2 3").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_unexpected_primary() {
        assert!(parse("+ 2").is_err());
        assert!(parse("2 *").is_err());
        assert!(parse("").is_err());
        assert!(parse("()").is_err());
    }

    #[test]
    fn test_non_finite_values_do_not_read_back() {
        let expr = Expression::value(f64::INFINITY) + Expression::variable("x");
        assert_eq!(expr.to_string(), "(<inf> + x)");
        assert_eq!(
            parse(&expr.to_string()).unwrap_err(),
            ParseError::Lexical {
                symbol: '<',
                position: 1
            }
        );
    }

    #[test]
    fn test_lexical_error() {
        assert_eq!(
            parse("2 % 3").unwrap_err(),
            ParseError::Lexical {
                symbol: '%',
                position: 2
            }
        );
    }

    #[test]
    fn test_unknown_function_in_case_sensitive_mode() {
        let err = Parser::<f64>::new("SIN(x)", false)
            .unwrap()
            .parse()
            .unwrap_err();
        assert_eq!(err, ParseError::UnknownFunction("SIN".to_string()));
        let ok = Parser::<f64>::new("SIN(x)", true).unwrap().parse().unwrap();
        assert_eq!(ok.to_string(), "sin(x)");
    }

    #[test]
    fn test_precedence_table() {
        assert!(OpPrecedence::of("/").unwrap() > OpPrecedence::of("*").unwrap());
        assert!(OpPrecedence::of("^").unwrap() > OpPrecedence::of("/").unwrap());
        assert_eq!(
            OpPrecedence::of("%"),
            Err(ParseError::UnknownOperator("%".to_string()))
        );
    }
}
