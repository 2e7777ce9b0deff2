//! Typed values produced by placeholder conversion.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A value extracted from step text by a placeholder transformer.
///
/// Built-in placeholders produce the variant matching their kind; custom
/// transformers may return any variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Free text, including dequoted `{string}` captures.
    String(String),
    /// Decimal number from `{number}` or `{float}`.
    Number(f64),
    /// Integer from `{int}`.
    Int(i64),
    /// Boolean literal from `{boolean}`.
    Bool(bool),
    /// Single character from `{char}`.
    Char(char),
    /// Calendar date or timestamp from `{date}`, normalised to UTC when an
    /// offset was present.
    Date(NaiveDateTime),
    /// Comma-separated tokens from `{list}`.
    List(Vec<String>),
}

impl Value {
    /// Return the text when the value is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Return the numeric value of [`Value::Number`] or [`Value::Int`].
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "integers are widened for callers that want a single numeric view"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Int(int) => Some(*int as f64),
            _ => None,
        }
    }

    /// Return the integer when the value is a [`Value::Int`].
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(int) => Some(*int),
            _ => None,
        }
    }

    /// Return the boolean when the value is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Return the list items when the value is a [`Value::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
            Self::Int(int) => write!(f, "{int}"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Char(ch) => write!(f, "{ch}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%dT%H:%M:%S")),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
