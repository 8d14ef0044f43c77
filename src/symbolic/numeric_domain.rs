//! # Numeric domains
//!
//! The expression engine is generic over the numbers it computes with. A
//! [`Domain`] provides field arithmetic, the transcendental functions used by
//! the node kinds, a test for the additive identity and its own rendering.
//!
//! Two domains are provided:
//! - `f64` - real numbers; `ln` fails for non-positive arguments
//! - `Complex<f64>` - complex numbers; `ln` always fails, rendering follows the
//!   `(re ± |im|i)` convention and the literal `i` is the imaginary unit
use crate::symbolic::errors::EvalError;
use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Div, Mul, Neg, Sub};
use strum_macros::Display;

/// Which of the supported number sets a domain is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DomainKind {
    #[strum(to_string = "real")]
    Real,
    #[strum(to_string = "complex")]
    Complex,
}

/// Capabilities a number type needs to back an expression tree
pub trait Domain:
    Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    const KIND: DomainKind;

    /// a numeric literal read by the parser
    fn from_real(value: f64) -> Self;
    /// value of the `i` literal; `None` where `i` is an ordinary variable name
    fn imaginary_unit() -> Option<Self>;
    fn pow(self, exponent: Self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn exp(self) -> Self;
    /// natural logarithm
    fn ln(self) -> Result<Self, EvalError>;
    fn render(&self) -> String;
}

impl Domain for f64 {
    const KIND: DomainKind = DomainKind::Real;

    fn from_real(value: f64) -> Self {
        value
    }

    fn imaginary_unit() -> Option<Self> {
        None
    }

    fn pow(self, exponent: Self) -> Self {
        self.powf(exponent)
    }

    fn sin(self) -> Self {
        f64::sin(self)
    }

    fn cos(self) -> Self {
        f64::cos(self)
    }

    fn exp(self) -> Self {
        f64::exp(self)
    }

    fn ln(self) -> Result<Self, EvalError> {
        if self <= 0.0 {
            return Err(EvalError::Domain(format!(
                "logarithm of non-positive value {}",
                self
            )));
        }
        Ok(f64::ln(self))
    }

    fn render(&self) -> String {
        render_real(*self)
    }
}

impl Domain for Complex<f64> {
    const KIND: DomainKind = DomainKind::Complex;

    fn from_real(value: f64) -> Self {
        Complex::new(value, 0.0)
    }

    fn imaginary_unit() -> Option<Self> {
        Some(Complex::i())
    }

    fn pow(self, exponent: Self) -> Self {
        self.powc(exponent)
    }

    fn sin(self) -> Self {
        Complex::sin(self)
    }

    fn cos(self) -> Self {
        Complex::cos(self)
    }

    fn exp(self) -> Self {
        Complex::exp(self)
    }

    fn ln(self) -> Result<Self, EvalError> {
        Err(EvalError::Domain(
            "logarithm of complex values is unsupported".to_string(),
        ))
    }

    fn render(&self) -> String {
        render_complex(self)
    }
}

/// Shortest round-trip form of a finite value. `NaN` and infinities come out
/// as `<NaN>`, `<inf>`, `<-inf>`: text the lexer refuses, so a tree holding
/// them never reads back as one with variables named `inf` or `NaN`.
pub fn render_real(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        format!("<{}>", value)
    }
}

// coefficient 1 is implied: "i" rather than "1i"
fn imaginary_term(magnitude: f64) -> String {
    if magnitude == 1.0 {
        "i".to_string()
    } else {
        format!("{}i", render_real(magnitude))
    }
}

/// Renders a complex number omitting vanishing parts: `0`, `2`, `-3i`, `(2 + i)`
pub fn render_complex(value: &Complex<f64>) -> String {
    let (re, im) = (value.re, value.im);
    match (re == 0.0, im == 0.0) {
        (true, true) => "0".to_string(),
        (false, true) => render_real(re),
        (true, false) if im < 0.0 => format!("-{}", imaginary_term(-im)),
        (true, false) => imaginary_term(im),
        (false, false) => {
            let sign = if im >= 0.0 { '+' } else { '-' };
            format!("({} {} {})", render_real(re), sign, imaginary_term(im.abs()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_render_complex() {
        assert_eq!(render_complex(&Complex::new(0.0, 0.0)), "0");
        assert_eq!(render_complex(&Complex::new(2.5, 0.0)), "2.5");
        assert_eq!(render_complex(&Complex::new(0.0, 3.0)), "3i");
        assert_eq!(render_complex(&Complex::new(0.0, 1.0)), "i");
        assert_eq!(render_complex(&Complex::new(0.0, -1.0)), "-i");
        assert_eq!(render_complex(&Complex::new(0.0, -2.0)), "-2i");
        assert_eq!(render_complex(&Complex::new(23.0, 2.0)), "(23 + 2i)");
        assert_eq!(render_complex(&Complex::new(-2.0, -3.0)), "(-2 - 3i)");
        assert_eq!(render_complex(&Complex::new(4.0, -1.0)), "(4 - i)");
    }

    #[test]
    fn test_render_real() {
        assert_eq!(10.5_f64.render(), "10.5");
        assert_eq!(10.0_f64.render(), "10");
        assert_eq!((-1.0_f64).render(), "-1");
    }

    #[test]
    fn test_render_non_finite() {
        assert_eq!(f64::INFINITY.render(), "<inf>");
        assert_eq!(f64::NEG_INFINITY.render(), "<-inf>");
        assert_eq!(f64::NAN.render(), "<NaN>");
        assert_eq!(
            render_complex(&Complex::new(1.0, f64::INFINITY)),
            "(1 + <inf>i)"
        );
    }

    #[test]
    fn test_real_ln() {
        assert_relative_eq!(Domain::ln(1.0_f64).unwrap(), 0.0);
        assert!(matches!(Domain::ln(-1.0_f64), Err(EvalError::Domain(_))));
        assert!(matches!(Domain::ln(0.0_f64), Err(EvalError::Domain(_))));
    }

    #[test]
    fn test_complex_ln_is_unsupported() {
        let z = Complex::new(1.0, 0.0);
        assert!(matches!(Domain::ln(z), Err(EvalError::Domain(_))));
    }

    #[test]
    fn test_imaginary_unit() {
        assert_eq!(<f64 as Domain>::imaginary_unit(), None);
        assert_eq!(
            <Complex<f64> as Domain>::imaginary_unit(),
            Some(Complex::new(0.0, 1.0))
        );
        assert_eq!(DomainKind::Real.to_string(), "real");
        assert_eq!(<Complex<f64> as Domain>::KIND.to_string(), "complex");
    }

    #[test]
    fn test_complex_transcendental() {
        // e^(i*pi) = -1
        let z = Complex::new(0.0, std::f64::consts::PI);
        let w = Domain::exp(z);
        assert_relative_eq!(w.re, -1.0, epsilon = 1e-12);
        assert_relative_eq!(w.im, 0.0, epsilon = 1e-12);
        let s = Domain::sin(Complex::new(0.0, 0.0));
        assert!(s.is_zero());
        assert_relative_eq!(Domain::pow(2.0_f64, 10.0), 1024.0);
    }
}
