/// error types of parsing and evaluation
pub mod errors;
/// ________________________________________________________________________________________________________________________________
/// # Lexer
/// splits a string into tokens on demand, inserting `*` where multiplication is implied
///# Example
/// ```
/// use RustedExpr::symbolic::lexer::{Lexer, TokenKind};
/// let kinds: Vec<TokenKind> = Lexer::<f64>::new("2x", true)
///     .map(|t| t.unwrap().kind)
///     .collect();
/// assert_eq!(
///     kinds,
///     vec![TokenKind::Number, TokenKind::Operator, TokenKind::Identifier, TokenKind::EndOfInput]
/// );
/// ```
pub mod lexer;
/// number sets an expression can be evaluated in: `f64` and `Complex<f64>`
pub mod numeric_domain;
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedExpr::symbolic::symbolic_engine::Expression;
/// use std::collections::HashMap;
/// let input = "x^2 + 3x - sin(y)";
/// let parsed_expression = Expression::<f64>::parse(input, true).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let values = HashMap::from([("x".to_string(), 2.0), ("y".to_string(), 0.0)]);
/// let f_res = parsed_expression.eval_with(&values).unwrap();
/// assert!((f_res - 10.0).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) differentiates a symbolic expression with respect to a variable
/// 3) evaluates a symbolic expression with variables taken from a map
/// 4) turns a symbolic expression into a string expression for printing and control results
///# Example#
/// ```
/// use RustedExpr::symbolic::symbolic_engine::Expression;
/// use std::collections::HashMap;
/// let input = "exp(x) * ln(y)";
/// // here you've got symbolic expression
/// let parsed_expression = Expression::<f64>::parse(input, true).unwrap();
/// // return vec of all variables
/// let variables = parsed_expression.variables();
/// assert_eq!(variables, vec!["x", "y"]);
/// // differentiate with respect to x and y
/// let df_dx = parsed_expression.diff("x");
/// let df_dy = parsed_expression.diff("y");
/// println!("df_dx = {}, df_dy = {}", df_dx, df_dy);
/// // bind y only, x stays symbolic
/// let partial = parsed_expression.with_context(&HashMap::from([("y".to_string(), 1.0)]));
/// assert_eq!(partial.to_string(), "(exp(x) * ln(1))");
/// ```
/// Example2#
/// ```
/// use RustedExpr::symbolic::symbolic_engine::Expression;
/// use num_complex::Complex;
/// let z = Expression::<Complex<f64>>::parse("(2 + 3i) * (4 - 5i)", true).unwrap();
/// assert_eq!(z.eval().unwrap(), Complex::new(23.0, 2.0));
/// assert_eq!(Expression::value(z.eval().unwrap()).to_string(), "(23 + 2i)");
/// ```
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
