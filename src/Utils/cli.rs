//! Command-line task description for the `RustedExpr` binary.
//!
//! ```text
//! RustedExpr --diff "x^2 + sin(x)" --by x --eval "x^2 + sin(x)" x=1.5
//! RustedExpr --complex --eval "z * (2 - i)" z=1+2i
//! ```
//! Flags are read by clap into [`CliArgs`] and validated into a [`CliTask`].
//! `--eval` and `--diff` both carry the expression and switch their mode on;
//! given together they must carry the same text. Bindings are `name=value`
//! pairs read in the task's domain once all flags are known, so `--complex`
//! may come after them.
use crate::symbolic::errors::{EvalError, ExprError, ParseError};
use crate::symbolic::numeric_domain::Domain;
use crate::symbolic::symbolic_engine::{Context, Expression};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, debug, info};
use num_complex::Complex;
use regex::Regex;
use std::ffi::OsString;
use std::fmt;
use std::sync::LazyLock;

static COMPLEX_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d*\.?\d*)([+-]?\d*\.?\d*)i$").unwrap());

#[derive(Debug, PartialEq)]
pub enum CliError {
    /// rejected by the argument parser
    Usage(String),
    NoExpression,
    /// `--eval` and `--diff` name different expressions
    ConflictingExpressions,
    /// a positional argument that is not `name=value`
    InvalidBinding(String),
    /// `--diff` without `--by`
    NoDiffVariable,
    InvalidNumber(String),
    InvalidComplex(String),
    InvalidLogLevel(String),
    Expr(ExprError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::NoExpression => write!(f, "No expression given, use --eval or --diff"),
            CliError::ConflictingExpressions => {
                write!(f, "--eval and --diff must name the same expression")
            }
            CliError::InvalidBinding(arg) => {
                write!(f, "Invalid binding {}, expected name=value", arg)
            }
            CliError::NoDiffVariable => write!(f, "No variable specified for --by"),
            CliError::InvalidNumber(text) => write!(f, "Invalid number format: {}", text),
            CliError::InvalidComplex(text) => write!(f, "Invalid complex number format: {}", text),
            CliError::InvalidLogLevel(text) => write!(f, "Unknown log level: {}", text),
            CliError::Expr(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Expr(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        CliError::Expr(err.into())
    }
}

impl From<EvalError> for CliError {
    fn from(err: EvalError) -> Self {
        CliError::Expr(err.into())
    }
}

/// Reads a binding value in a given domain
pub trait CliLiteral: Domain {
    fn parse_literal(text: &str) -> Result<Self, CliError>;
}

impl CliLiteral for f64 {
    fn parse_literal(text: &str) -> Result<Self, CliError> {
        text.trim()
            .parse::<f64>()
            .map_err(|_| CliError::InvalidNumber(text.to_string()))
    }
}

impl CliLiteral for Complex<f64> {
    fn parse_literal(text: &str) -> Result<Self, CliError> {
        parse_complex_literal(text)
    }
}

/// Coefficient text of a literal; a bare sign stands for one
fn coefficient(text: &str, whole: &str) -> Result<f64, CliError> {
    match text {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        _ => text
            .parse::<f64>()
            .map_err(|_| CliError::InvalidComplex(whole.to_string())),
    }
}

/// Parses `a+bi`, `a-bi`, `bi`, `i` or a plain real number.
///
/// # Examples
/// ```
/// use RustedExpr::Utils::cli::parse_complex_literal;
/// use num_complex::Complex;
/// assert_eq!(parse_complex_literal("3+4i").unwrap(), Complex::new(3.0, 4.0));
/// assert_eq!(parse_complex_literal("-2i").unwrap(), Complex::new(0.0, -2.0));
/// ```
pub fn parse_complex_literal(text: &str) -> Result<Complex<f64>, CliError> {
    let literal = text.trim();
    if let Ok(re) = literal.parse::<f64>() {
        return Ok(Complex::new(re, 0.0));
    }
    let caps = COMPLEX_LITERAL
        .captures(literal)
        .ok_or_else(|| CliError::InvalidComplex(text.to_string()))?;
    let first = caps.get(1).map_or("", |m| m.as_str());
    let second = caps.get(2).map_or("", |m| m.as_str());
    if second.is_empty() {
        // only an imaginary part: "5i", "-2i", "i"
        return Ok(Complex::new(0.0, coefficient(first, text)?));
    }
    let re = first
        .parse::<f64>()
        .map_err(|_| CliError::InvalidComplex(text.to_string()))?;
    Ok(Complex::new(re, coefficient(second, text)?))
}

pub fn parse_log_level(text: &str) -> Result<LevelFilter, CliError> {
    text.parse::<LevelFilter>()
        .map_err(|_| CliError::InvalidLogLevel(text.to_string()))
}

/// Raw command line of the binary
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about = "Parse, differentiate and evaluate infix expressions", long_about = None)]
pub struct CliArgs {
    /// Evaluate EXPR (with --diff: evaluate its derivative)
    #[arg(long = "eval", value_name = "EXPR", allow_hyphen_values = true)]
    pub eval: Option<String>,

    /// Differentiate EXPR with respect to the --by variable
    #[arg(long = "diff", value_name = "EXPR", allow_hyphen_values = true)]
    pub diff: Option<String>,

    /// Variable to differentiate by
    #[arg(long = "by", value_name = "NAME")]
    pub by: Option<String>,

    /// Compute with complex numbers; `i` is the imaginary unit
    #[arg(long)]
    pub complex: bool,

    /// Lower-case the expression before reading it
    #[arg(long)]
    pub ignore_case: bool,

    /// off, error, warn, info, debug or trace
    #[arg(long = "log", value_name = "LEVEL", default_value = "warn")]
    pub log: String,

    /// Also write the log to FILE
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<String>,

    /// Variable bindings, e.g. x=1.5 z=1+2i
    #[arg(value_name = "NAME=VALUE")]
    pub bindings: Vec<String>,
}

/// Everything the binary was asked to do, validated
#[derive(Debug, Clone, PartialEq)]
pub struct CliTask {
    pub expression: String,
    pub eval: bool,
    pub diff: bool,
    pub diff_by: Option<String>,
    pub complex: bool,
    pub ignore_case: bool,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
    /// `name=value` pairs in command-line order, values not yet parsed
    pub bindings: Vec<(String, String)>,
}

impl CliTask {
    /// Checks what clap cannot: one expression, `--by` with `--diff`, the log
    /// level and the shape of every binding
    pub fn from_cli(args: CliArgs) -> Result<CliTask, CliError> {
        let expression = match (&args.eval, &args.diff) {
            (Some(to_eval), Some(to_diff)) if to_eval != to_diff => {
                return Err(CliError::ConflictingExpressions);
            }
            (_, Some(expr)) | (Some(expr), None) => expr.clone(),
            (None, None) => return Err(CliError::NoExpression),
        };
        if args.diff.is_some() && args.by.is_none() {
            return Err(CliError::NoDiffVariable);
        }
        let log_level = parse_log_level(&args.log)?;
        let bindings = args
            .bindings
            .iter()
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Ok((name.trim().to_string(), value.to_string()))
                }
                _ => Err(CliError::InvalidBinding(pair.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CliTask {
            expression,
            eval: args.eval.is_some(),
            diff: args.diff.is_some(),
            diff_by: args.by,
            complex: args.complex,
            ignore_case: args.ignore_case,
            log_level,
            log_file: args.log_file,
            bindings,
        })
    }

    /// Reads a whole command line, program name first
    pub fn try_from_iter<I, S>(line: I) -> Result<CliTask, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let args = CliArgs::try_parse_from(line).map_err(|err| CliError::Usage(err.to_string()))?;
        CliTask::from_cli(args)
    }

    /// Bindings parsed in the domain `T`
    pub fn context<T: CliLiteral>(&self) -> Result<Context<T>, CliError> {
        self.bindings
            .iter()
            .map(|(name, value)| Ok((name.clone(), T::parse_literal(value)?)))
            .collect()
    }
}

/// Runs a task in the domain `T` and returns the text to print
pub fn run_task<T: CliLiteral>(task: &CliTask) -> Result<String, CliError> {
    info!("domain: {}", T::KIND);
    let context = task.context::<T>()?;
    let expression = Expression::<T>::parse(&task.expression, task.ignore_case)?;
    debug!("parsed tree: {}", expression);
    info!(
        "variables: [{}], bound: [{}]",
        expression.variables().iter().join(", "),
        context.keys().sorted().join(", ")
    );

    let mut lines = Vec::new();
    if task.diff {
        let by = task.diff_by.as_deref().ok_or(CliError::NoDiffVariable)?;
        let derivative = expression.diff(by);
        lines.push(format!("Differentiated: {}", derivative));
        if task.eval {
            let value = derivative.eval_with(&context)?;
            lines.push(format!("Evaluated derivative: {}", value.render()));
        }
    } else if task.eval {
        let value = expression.eval_with(&context)?;
        lines.push(format!("Evaluated: {}", value.render()));
    }
    Ok(lines.join("\n"))
}

/// Runs a task in the domain its flags ask for
pub fn run(task: &CliTask) -> Result<String, CliError> {
    if task.complex {
        run_task::<Complex<f64>>(task)
    } else {
        run_task::<f64>(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cli_task(line: &[&str]) -> Result<CliTask, CliError> {
        CliTask::try_from_iter(std::iter::once("RustedExpr").chain(line.iter().copied()))
    }

    #[test]
    fn test_complex_literals() {
        assert_eq!(parse_complex_literal("3+4i").unwrap(), Complex::new(3.0, 4.0));
        assert_eq!(parse_complex_literal("-2i").unwrap(), Complex::new(0.0, -2.0));
        assert_eq!(parse_complex_literal("5i").unwrap(), Complex::new(0.0, 5.0));
        assert_eq!(parse_complex_literal("i").unwrap(), Complex::new(0.0, 1.0));
        assert_eq!(parse_complex_literal("2-i").unwrap(), Complex::new(2.0, -1.0));
        assert_eq!(parse_complex_literal("7").unwrap(), Complex::new(7.0, 0.0));
        let z = parse_complex_literal("1.5-0.5i").unwrap();
        assert_relative_eq!(z.re, 1.5);
        assert_relative_eq!(z.im, -0.5);
    }

    #[test]
    fn test_bad_complex_literal() {
        assert_eq!(
            parse_complex_literal("abc"),
            Err(CliError::InvalidComplex("abc".to_string()))
        );
        assert!(parse_complex_literal("3+4j").is_err());
    }

    #[test]
    fn test_from_args() {
        let task = cli_task(&[
            "--diff", "x*y", "--by", "x", "--eval", "x*y", "x=2", "y=3", "--log", "debug",
        ])
        .unwrap();
        assert!(task.diff && task.eval);
        assert_eq!(task.expression, "x*y");
        assert_eq!(task.diff_by.as_deref(), Some("x"));
        assert_eq!(task.log_level, LevelFilter::Debug);
        assert_eq!(task.bindings.len(), 2);
        assert!(!task.complex);
        assert!(!task.ignore_case);
    }

    #[test]
    fn test_from_args_errors() {
        assert!(matches!(cli_task(&["--eval"]), Err(CliError::Usage(_))));
        assert!(matches!(
            cli_task(&["--eval", "x", "--verbose"]),
            Err(CliError::Usage(_))
        ));
        assert_eq!(cli_task(&["x=1"]), Err(CliError::NoExpression));
        assert_eq!(cli_task(&["--diff", "x"]), Err(CliError::NoDiffVariable));
        assert_eq!(
            cli_task(&["--eval", "x", "--log", "loud"]),
            Err(CliError::InvalidLogLevel("loud".to_string()))
        );
        assert_eq!(
            cli_task(&["--eval", "x", "--diff", "y", "--by", "x"]),
            Err(CliError::ConflictingExpressions)
        );
        assert_eq!(
            cli_task(&["--eval", "x", "x2"]),
            Err(CliError::InvalidBinding("x2".to_string()))
        );
    }

    #[test]
    fn test_flags_after_bindings() {
        let parsed = cli_task(&["z=1+2i", "--eval", "-z", "--complex", "--ignore-case"]).unwrap();
        assert!(parsed.complex && parsed.ignore_case && parsed.eval);
        assert_eq!(parsed.expression, "-z");
        assert_eq!(parsed.log_level, LevelFilter::Warn);
        assert_eq!(
            parsed.bindings,
            vec![("z".to_string(), "1+2i".to_string())]
        );
        assert_eq!(run(&parsed).unwrap(), "Evaluated: (-1 - 2i)");
    }

    #[test]
    fn test_run_eval() {
        let task = cli_task(&["--eval", "2x + 1", "x=3"]).unwrap();
        assert_eq!(run(&task).unwrap(), "Evaluated: 7");
    }

    #[test]
    fn test_run_diff_and_eval() {
        let task =
            cli_task(&["--eval", "x*y", "--diff", "x*y", "--by", "x", "x=2", "y=3"])
                .unwrap();
        assert_eq!(
            run(&task).unwrap(),
            "Differentiated: ((1 * y) + (x * 0))\nEvaluated derivative: 3"
        );
    }

    #[test]
    fn test_run_diff_only() {
        let task = cli_task(&["--diff", "sin(x)", "--by", "x"]).unwrap();
        assert_eq!(run(&task).unwrap(), "Differentiated: (cos(x) * 1)");
    }

    #[test]
    fn test_run_complex() {
        let task = cli_task(&[
            "--complex",
            "--eval",
            "(2 + 3i) * z",
            "z=4-5i",
        ])
        .unwrap();
        assert_eq!(run(&task).unwrap(), "Evaluated: (23 + 2i)");
    }

    #[test]
    fn test_run_case_handling() {
        let kept = cli_task(&["--eval", "SIN(0)"]).unwrap();
        assert_eq!(
            run(&kept),
            Err(CliError::Expr(ExprError::Parse(ParseError::UnknownFunction(
                "SIN".to_string()
            ))))
        );
        let lowered = cli_task(&["--eval", "SIN(0)", "--ignore-case"]).unwrap();
        assert_eq!(run(&lowered).unwrap(), "Evaluated: 0");
    }

    #[test]
    fn test_run_errors() {
        let unbound = cli_task(&["--eval", "x + 1"]).unwrap();
        assert_eq!(
            run(&unbound),
            Err(CliError::Expr(ExprError::Eval(EvalError::UnresolvedVariable(
                "x".to_string()
            ))))
        );
        let bad_value = cli_task(&["--eval", "x", "x=abc"]).unwrap();
        assert_eq!(
            run(&bad_value),
            Err(CliError::InvalidNumber("abc".to_string()))
        );
    }
}
