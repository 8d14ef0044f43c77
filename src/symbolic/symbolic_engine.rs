//! # Symbolic Engine Module
//!
//! Core expression tree of the crate.
//!
//! ## Main Structures
//!
//! ### `Node<T>` Enum
//! One variant per node kind:
//! - **Literals**: `Value(T)` - a number of the domain `T`
//! - **Variables**: `Variable(String)` - a name bound only at evaluation time
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - binary arithmetic
//! - **Functions**: `Sin`, `Cos`, `Ln`, `Exp` - unary functions
//!
//! ### `Expression<T>`
//! The handle library users work with. It owns the root of a tree, and offers
//! parsing, evaluation, differentiation, substitution and rendering.
//!
//! ## Interesting Code Features
//!
//! 1. **Shared subtrees**: children are `Rc<Node<T>>`. Nodes are never mutated
//!    after construction, so the product, quotient and power rules point at the
//!    very same operand subtree from several places in the derivative instead of
//!    copying it. Trees are DAGs, never cyclic.
//!
//! 2. **Generic numeric domain**: the same tree works over `f64` and
//!    `Complex<f64>`; see [`crate::symbolic::numeric_domain`].
//!
//! 3. **Operator Overloading**: `std::ops` traits build trees with natural
//!    syntax: `x.clone() * y + Expression::value(2.0)`
//!
//! 4. **Unsimplified results**: no algebraic simplification is ever applied.
//!    `d/dx 5` is `Value(0)`, not a removed term.

use crate::symbolic::errors::{EvalError, ParseError};
use crate::symbolic::numeric_domain::Domain;
use crate::symbolic::parse_expr::Parser;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// One node of an expression tree.
///
/// The set of node kinds is closed; every operation on trees is an exhaustive
/// `match` over it.
#[derive(Clone, Debug, PartialEq)]
pub enum Node<T> {
    /// Numerical literal
    Value(T),
    /// Symbolic variable, e.g. "x"
    Variable(String),
    /// left + right
    Add(Rc<Node<T>>, Rc<Node<T>>),
    /// left - right
    Sub(Rc<Node<T>>, Rc<Node<T>>),
    /// left * right
    Mul(Rc<Node<T>>, Rc<Node<T>>),
    /// left / right
    Div(Rc<Node<T>>, Rc<Node<T>>),
    /// base ^ exponent
    Pow(Rc<Node<T>>, Rc<Node<T>>),
    Sin(Rc<Node<T>>),
    Cos(Rc<Node<T>>),
    /// natural logarithm
    Ln(Rc<Node<T>>),
    /// e^x
    Exp(Rc<Node<T>>),
}

/// Variable bindings used for evaluation and substitution
pub type Context<T> = HashMap<String, T>;

impl<T: Domain> Node<T> {
    /// Binds the variables found in `context`; other variables stay symbolic.
    pub fn with_context(&self, context: &Context<T>) -> Rc<Node<T>> {
        let node = match self {
            Node::Value(value) => Node::Value(*value),
            Node::Variable(name) => match context.get(name) {
                Some(value) => Node::Value(*value),
                None => Node::Variable(name.clone()),
            },
            Node::Add(lhs, rhs) => Node::Add(lhs.with_context(context), rhs.with_context(context)),
            Node::Sub(lhs, rhs) => Node::Sub(lhs.with_context(context), rhs.with_context(context)),
            Node::Mul(lhs, rhs) => Node::Mul(lhs.with_context(context), rhs.with_context(context)),
            Node::Div(lhs, rhs) => Node::Div(lhs.with_context(context), rhs.with_context(context)),
            Node::Pow(base, exp) => {
                Node::Pow(base.with_context(context), exp.with_context(context))
            }
            Node::Sin(arg) => Node::Sin(arg.with_context(context)),
            Node::Cos(arg) => Node::Cos(arg.with_context(context)),
            Node::Ln(arg) => Node::Ln(arg.with_context(context)),
            Node::Exp(arg) => Node::Exp(arg.with_context(context)),
        };
        Rc::new(node)
    }

    /// check if the tree contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Node::Value(_) => false,
            Node::Variable(name) => name == var_name,
            Node::Add(lhs, rhs)
            | Node::Sub(lhs, rhs)
            | Node::Mul(lhs, rhs)
            | Node::Div(lhs, rhs)
            | Node::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            Node::Sin(arg) | Node::Cos(arg) | Node::Ln(arg) | Node::Exp(arg) => {
                arg.contains_variable(var_name)
            }
        }
    }

    fn collect_variables(&self, acc: &mut Vec<String>) {
        match self {
            Node::Value(_) => {}
            Node::Variable(name) => acc.push(name.clone()),
            Node::Add(lhs, rhs)
            | Node::Sub(lhs, rhs)
            | Node::Mul(lhs, rhs)
            | Node::Div(lhs, rhs)
            | Node::Pow(lhs, rhs) => {
                lhs.collect_variables(acc);
                rhs.collect_variables(acc);
            }
            Node::Sin(arg) | Node::Cos(arg) | Node::Ln(arg) | Node::Exp(arg) => {
                arg.collect_variables(acc)
            }
        }
    }
}

/// Handle to an immutable expression tree.
///
/// Cloning is cheap: clones share the same root.
///
/// # Examples
/// ```
/// use RustedExpr::symbolic::symbolic_engine::Expression;
/// let expr = Expression::<f64>::parse("x^2 + 1", false).unwrap();
/// let df_dx = expr.diff("x");
/// println!("{}", df_dx);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Expression<T> {
    root: Rc<Node<T>>,
}

impl<T: Domain> Expression<T> {
    // BASIC FEATURES

    /// Builds an expression from text.
    ///
    /// With `case_insensitive` set, the input is lower-cased first so `SIN(X)`
    /// reads as `sin(x)`.
    pub fn parse(input: &str, case_insensitive: bool) -> Result<Expression<T>, ParseError> {
        Parser::new(input, case_insensitive)?.parse()
    }

    pub fn from_node(root: Rc<Node<T>>) -> Self {
        Expression { root }
    }

    /// Literal expression
    pub fn value(value: T) -> Self {
        Expression::from_node(Rc::new(Node::Value(value)))
    }

    /// Variable expression
    pub fn variable(name: &str) -> Self {
        Expression::from_node(Rc::new(Node::Variable(name.to_string())))
    }

    /// Creates several variables from a comma-separated list: "x, y, z"
    pub fn symbols(names: &str) -> Vec<Self> {
        names
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(Expression::variable)
            .collect()
    }

    pub fn root(&self) -> &Rc<Node<T>> {
        &self.root
    }

    /// Replaces bound variables with their values, leaving the others symbolic
    pub fn with_context(&self, context: &Context<T>) -> Expression<T> {
        Expression::from_node(self.root.with_context(context))
    }

    pub fn contains_variable(&self, var_name: &str) -> bool {
        self.root.contains_variable(var_name)
    }

    /// Sorted names of all variables in the expression, without duplicates
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.root.collect_variables(&mut names);
        names.sort();
        names.dedup();
        names
    }

    /// Evaluates an expression that has no unbound variables
    pub fn eval(&self) -> Result<T, EvalError> {
        self.root.eval(&Context::new())
    }

    /// Evaluates with variables taken from `context`
    pub fn eval_with(&self, context: &Context<T>) -> Result<T, EvalError> {
        self.root.eval(context)
    }

    /// Symbolic derivative with respect to `by`; the result is not simplified
    pub fn diff(&self, by: &str) -> Expression<T> {
        Expression::from_node(self.root.diff(by))
    }

    pub fn pow(&self, exponent: &Expression<T>) -> Expression<T> {
        Expression::from_node(Rc::new(Node::Pow(self.root.clone(), exponent.root.clone())))
    }

    pub fn sin(&self) -> Expression<T> {
        Expression::from_node(Rc::new(Node::Sin(self.root.clone())))
    }

    pub fn cos(&self) -> Expression<T> {
        Expression::from_node(Rc::new(Node::Cos(self.root.clone())))
    }

    pub fn ln(&self) -> Expression<T> {
        Expression::from_node(Rc::new(Node::Ln(self.root.clone())))
    }

    pub fn exp(&self) -> Expression<T> {
        Expression::from_node(Rc::new(Node::Exp(self.root.clone())))
    }
}

impl<T: Domain> From<T> for Expression<T> {
    fn from(value: T) -> Self {
        Expression::value(value)
    }
}

impl<T: Domain> fmt::Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl<T: Domain> std::ops::Add for Expression<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expression::from_node(Rc::new(Node::Add(self.root, rhs.root)))
    }
}

impl<T: Domain> std::ops::Sub for Expression<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expression::from_node(Rc::new(Node::Sub(self.root, rhs.root)))
    }
}

impl<T: Domain> std::ops::Mul for Expression<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expression::from_node(Rc::new(Node::Mul(self.root, rhs.root)))
    }
}

impl<T: Domain> std::ops::Div for Expression<T> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expression::from_node(Rc::new(Node::Div(self.root, rhs.root)))
    }
}

impl<T: Domain> std::ops::AddAssign for Expression<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.clone() + rhs;
    }
}

impl<T: Domain> std::ops::SubAssign for Expression<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.clone() - rhs;
    }
}

impl<T: Domain> std::ops::MulAssign for Expression<T> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.clone() * rhs;
    }
}

impl<T: Domain> std::ops::DivAssign for Expression<T> {
    fn div_assign(&mut self, rhs: Self) {
        *self = self.clone() / rhs;
    }
}
