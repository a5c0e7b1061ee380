//! Threshold expressions.
//!
//! A rule's up and down conditions are written as `<op> <number>`, e.g.
//! `"> 0.75"` or `"==3"`. [`decode`] turns that text into a [`Predicate`],
//! an inspectable comparison against a fixed threshold.
//!
//! ```text
//! expr   = space* op space* number
//! op     = ">" | "<" | "==" | "!="
//! number = digit* ["."] digit*      (at least one digit)
//! ```
//!
//! Comparisons are strict and exact: `==` and `!=` use no epsilon.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::DecodeError;

static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:space:]]*(==|!=|>|<)[[:space:]]*(\d*\.?\d*)$")
        .expect("threshold expression pattern is valid")
});

/// A total comparison of a metric value against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Predicate {
    GreaterThan(f64),
    LessThan(f64),
    EqualTo(f64),
    NotEqualTo(f64),
    /// Never matches. Stands in for an expression that failed to decode.
    #[default]
    Never,
}

impl Predicate {
    /// Evaluate the predicate for a metric value.
    pub fn eval(&self, value: f64) -> bool {
        match *self {
            Self::GreaterThan(t) => value > t,
            Self::LessThan(t) => value < t,
            Self::EqualTo(t) => value == t,
            Self::NotEqualTo(t) => value != t,
            Self::Never => false,
        }
    }

    /// The threshold this predicate compares against, if any.
    pub fn threshold(&self) -> Option<f64> {
        match *self {
            Self::GreaterThan(t) | Self::LessThan(t) | Self::EqualTo(t) | Self::NotEqualTo(t) => {
                Some(t)
            }
            Self::Never => None,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterThan(t) => write!(f, "> {t}"),
            Self::LessThan(t) => write!(f, "< {t}"),
            Self::EqualTo(t) => write!(f, "== {t}"),
            Self::NotEqualTo(t) => write!(f, "!= {t}"),
            Self::Never => write!(f, "never"),
        }
    }
}

impl FromStr for Predicate {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Decode a threshold expression such as `">0.75"`.
///
/// On failure the caller gets an error and must not act on any predicate.
/// Code that still wants something to evaluate can fall back with
/// `decode(expr).unwrap_or_default()`, which never matches.
pub fn decode(expr: &str) -> Result<Predicate, DecodeError> {
    let caps = EXPRESSION
        .captures(expr)
        .ok_or_else(|| DecodeError::Syntax(expr.to_string()))?;

    let literal = &caps[2];
    if !literal.chars().any(char::is_numeric) {
        return Err(DecodeError::Syntax(expr.to_string()));
    }

    // `\d` accepts any Unicode digit, which f64 parsing does not.
    let threshold: f64 = literal.parse().map_err(|_| DecodeError::Number {
        expr: expr.to_string(),
        literal: literal.to_string(),
    })?;

    let predicate = match &caps[1] {
        ">" => Predicate::GreaterThan(threshold),
        "<" => Predicate::LessThan(threshold),
        "==" => Predicate::EqualTo(threshold),
        "!=" => Predicate::NotEqualTo(threshold),
        _ => return Err(DecodeError::Syntax(expr.to_string())),
    };
    Ok(predicate)
}
