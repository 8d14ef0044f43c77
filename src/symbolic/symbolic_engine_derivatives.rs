//! # Symbolic Engine Derivatives Module
//!
//! Per-node rules for the three tree walks:
//! - `diff(var)` - analytical derivative, returned unsimplified
//! - `eval(context)` - numeric value in the node's domain
//! - `Display` - fully parenthesized text that the parser reads back
//!
//! ## Differentiation rules
//! - sum/difference: term by term
//! - product rule: (f*g)' = f'*g + f*g'
//! - quotient rule: (f/g)' = (f'*g - f*g')/(g*g)
//! - general power: (f^g)' = f^g * (g'*ln(f) + g*f'/f)
//! - chain rule for sin, cos, ln, exp
//!
//! Operands are shared between the original tree and its derivative, never
//! copied.
use crate::symbolic::errors::EvalError;
use crate::symbolic::numeric_domain::Domain;
use crate::symbolic::symbolic_engine::{Context, Node};
use std::fmt;
use std::rc::Rc;

fn value<T: Domain>(value: T) -> Rc<Node<T>> {
    Rc::new(Node::Value(value))
}

fn mul<T>(lhs: Rc<Node<T>>, rhs: Rc<Node<T>>) -> Rc<Node<T>> {
    Rc::new(Node::Mul(lhs, rhs))
}

impl<T: Domain> Node<T> {
    // DIFFERENTIATION

    /// Computes the analytical derivative of the tree with respect to `var`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// // d/dx (x * y) = ((1 * y) + (x * 0))
    /// let df_dx = Node::Mul(x, y).diff("x");
    /// ```
    pub fn diff(&self, var: &str) -> Rc<Node<T>> {
        match self {
            Node::Value(_) => value(T::zero()),
            Node::Variable(name) => {
                if name == var {
                    value(T::one())
                } else {
                    value(T::zero())
                }
            }
            Node::Add(lhs, rhs) => Rc::new(Node::Add(lhs.diff(var), rhs.diff(var))),
            Node::Sub(lhs, rhs) => Rc::new(Node::Sub(lhs.diff(var), rhs.diff(var))),
            Node::Mul(lhs, rhs) => Rc::new(Node::Add(
                mul(lhs.diff(var), rhs.clone()),
                mul(lhs.clone(), rhs.diff(var)),
            )),
            Node::Div(lhs, rhs) => Rc::new(Node::Div(
                Rc::new(Node::Sub(
                    mul(lhs.diff(var), rhs.clone()),
                    mul(lhs.clone(), rhs.diff(var)),
                )),
                mul(rhs.clone(), rhs.clone()),
            )),
            Node::Pow(base, exp) => {
                // base^exp * (exp' * ln(base) + (exp * base') / base)
                let log_term = mul(exp.diff(var), Rc::new(Node::Ln(base.clone())));
                let ratio_term = Rc::new(Node::Div(mul(exp.clone(), base.diff(var)), base.clone()));
                mul(
                    Rc::new(Node::Pow(base.clone(), exp.clone())),
                    Rc::new(Node::Add(log_term, ratio_term)),
                )
            }
            Node::Sin(arg) => mul(Rc::new(Node::Cos(arg.clone())), arg.diff(var)),
            Node::Cos(arg) => mul(
                mul(Rc::new(Node::Sin(arg.clone())), value(-T::one())),
                arg.diff(var),
            ),
            Node::Ln(arg) => mul(
                Rc::new(Node::Div(value(T::one()), arg.clone())),
                arg.diff(var),
            ),
            Node::Exp(arg) => mul(Rc::new(Node::Exp(arg.clone())), arg.diff(var)),
        }
    } // end of diff

    // EVALUATION

    /// Numeric value of the tree with variables looked up in `context`.
    ///
    /// Fails on an unbound variable, a zero divisor or a logarithm outside its
    /// domain. The divisor of a quotient is evaluated before the dividend.
    pub fn eval(&self, context: &Context<T>) -> Result<T, EvalError> {
        match self {
            Node::Value(value) => Ok(*value),
            Node::Variable(name) => context
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::UnresolvedVariable(name.clone())),
            Node::Add(lhs, rhs) => Ok(lhs.eval(context)? + rhs.eval(context)?),
            Node::Sub(lhs, rhs) => Ok(lhs.eval(context)? - rhs.eval(context)?),
            Node::Mul(lhs, rhs) => Ok(lhs.eval(context)? * rhs.eval(context)?),
            Node::Div(lhs, rhs) => {
                let divisor = rhs.eval(context)?;
                if divisor.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(lhs.eval(context)? / divisor)
            }
            Node::Pow(base, exp) => Ok(base.eval(context)?.pow(exp.eval(context)?)),
            Node::Sin(arg) => Ok(arg.eval(context)?.sin()),
            Node::Cos(arg) => Ok(arg.eval(context)?.cos()),
            Node::Ln(arg) => arg.eval(context)?.ln(),
            Node::Exp(arg) => Ok(arg.eval(context)?.exp()),
        }
    }
}

/// Fully parenthesized rendering, e.g. `((1 * y) + (x * 0))`.
/// Powers wrap each operand separately: `(x) ^ (2)`.
impl<T: Domain> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Value(value) => write!(f, "{}", value.render()),
            Node::Variable(name) => write!(f, "{}", name),
            Node::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Node::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Node::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Node::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Node::Pow(base, exp) => write!(f, "({}) ^ ({})", base, exp),
            Node::Sin(arg) => write!(f, "sin({})", arg),
            Node::Cos(arg) => write!(f, "cos({})", arg),
            Node::Ln(arg) => write!(f, "ln({})", arg),
            Node::Exp(arg) => write!(f, "exp({})", arg),
        }
    }
}
