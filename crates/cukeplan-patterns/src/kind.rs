//! Placeholder kinds: the built-in table and user-registered placeholders.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::value::Value;

/// Conversion applied to the raw capture of a custom placeholder.
pub type Transformer = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Placeholders understood without registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    /// `{string}`: text quoted with `"` or `'`.
    String,
    /// `{number}`: decimal number.
    Number,
    /// `{float}`: alias of `{number}`.
    Float,
    /// `{int}`: signed integer.
    Int,
    /// `{word}`: a single word.
    Word,
    /// `{char}`: a single non-whitespace character.
    Char,
    /// `{boolean}`: `true` or `false`.
    Boolean,
    /// `{email}`: an e-mail address.
    Email,
    /// `{date}`: ISO date or datetime, `MM/DD/YYYY` or `YYYY/MM/DD`.
    Date,
    /// `{list}`: comma-separated tokens.
    List,
}

impl BuiltinKind {
    /// Every built-in kind, in documentation order.
    pub const ALL: [Self; 10] = [
        Self::String,
        Self::Number,
        Self::Float,
        Self::Int,
        Self::Word,
        Self::Char,
        Self::Boolean,
        Self::Email,
        Self::Date,
        Self::List,
    ];

    /// Name used between braces in a pattern.
    ///
    /// # Examples
    /// ```
    /// use cukeplan_patterns::BuiltinKind;
    /// assert_eq!(BuiltinKind::Int.name(), "int");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Float => "float",
            Self::Int => "int",
            Self::Word => "word",
            Self::Char => "char",
            Self::Boolean => "boolean",
            Self::Email => "email",
            Self::Date => "date",
            Self::List => "list",
        }
    }

    /// Look up a built-in kind by its placeholder name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Regular-expression fragment matched by the placeholder. Fragments
    /// contain no capturing groups.
    #[must_use]
    pub const fn regex(self) -> &'static str {
        match self {
            Self::String => r#"(?:"[^"]*"|'[^']*')"#,
            Self::Number | Self::Float => r"[+-]?(?:\d+(?:\.\d+)?|\.\d+)(?:[eE][+-]?\d+)?",
            Self::Int => r"[+-]?\d+",
            Self::Word => r"\b\w+\b",
            Self::Char => r"\S",
            Self::Boolean => r"(?:true|false)",
            Self::Email => r"[^\s@]+@[^\s@]+\.[^\s@]+",
            Self::Date => concat!(
                r"(?:\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?",
                r"|\d{1,2}/\d{1,2}/\d{4}",
                r"|\d{4}/\d{1,2}/\d{1,2})"
            ),
            Self::List => r"\w+(?:\s*,\s*\w+)*",
        }
    }

    /// Convert a raw capture into a typed value.
    ///
    /// # Errors
    /// Returns a reason when the capture cannot be represented, such as an
    /// integer overflow or an impossible calendar date.
    pub fn convert(self, raw: &str) -> Result<Value, String> {
        match self {
            Self::String => Ok(Value::String(unquote(raw).to_owned())),
            Self::Number | Self::Float => raw
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|err| format!("invalid number {raw:?}: {err}")),
            Self::Int => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|err| format!("invalid integer {raw:?}: {err}")),
            Self::Word | Self::Email => Ok(Value::String(raw.to_owned())),
            Self::Char => raw
                .chars()
                .next()
                .map(Value::Char)
                .ok_or_else(|| "empty character capture".to_owned()),
            Self::Boolean => match raw {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                other => Err(format!("invalid boolean {other:?}")),
            },
            Self::Date => parse_date(raw).map(Value::Date),
            Self::List => Ok(Value::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_owned)
                    .collect(),
            )),
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn unquote(raw: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| raw.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(raw)
}

fn parse_date(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.naive_utc());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(stamp);
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"] {
        if let Ok(stamp) = DateTime::parse_from_str(raw, format) {
            return Ok(stamp.naive_utc());
        }
    }
    ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"]
        .into_iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid date {raw:?}"))
}

/// A placeholder registered at runtime with its own regex and transformer.
#[derive(Clone)]
pub struct CustomPlaceholder {
    name: String,
    regex: String,
    transformer: Transformer,
}

impl CustomPlaceholder {
    pub(crate) fn new(name: String, regex: String, transformer: Transformer) -> Self {
        Self {
            name,
            regex,
            transformer,
        }
    }

    /// Placeholder name used between braces.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Regular-expression fragment supplied at registration.
    #[must_use]
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Apply the transformer to a raw capture.
    #[must_use]
    pub fn transform(&self, raw: &str) -> Value {
        (self.transformer)(raw)
    }
}

impl fmt::Debug for CustomPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPlaceholder")
            .field("name", &self.name)
            .field("regex", &self.regex)
            .finish_non_exhaustive()
    }
}

/// Kind resolved for one placeholder occurrence during compilation.
#[derive(Debug, Clone)]
pub(crate) enum PlaceholderKind {
    Builtin(BuiltinKind),
    Custom(Arc<CustomPlaceholder>),
}

impl PlaceholderKind {
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Builtin(kind) => kind.name(),
            Self::Custom(custom) => custom.name(),
        }
    }

    pub(crate) fn regex(&self) -> &str {
        match self {
            Self::Builtin(kind) => kind.regex(),
            Self::Custom(custom) => custom.regex(),
        }
    }

    pub(crate) fn convert(&self, raw: &str) -> Result<Value, String> {
        match self {
            Self::Builtin(kind) => kind.convert(raw),
            Self::Custom(custom) => Ok(custom.transform(raw)),
        }
    }
}
