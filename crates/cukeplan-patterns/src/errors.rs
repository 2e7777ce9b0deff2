//! Error types shared by the expression modules.

use thiserror::Error;

/// Routine outcome of matching step text that an expression does not cover.
///
/// Step lookup tries many expressions per step, so a miss is an ordinary
/// value rather than a failure. Use [`ExpressionError::Mismatch`] when a miss
/// must abort.
///
/// # Examples
/// ```
/// use cukeplan_patterns::NoMatch;
/// let miss = NoMatch::new("I have {int} items", "I have many items", None);
/// assert_eq!(miss.text(), "I have many items");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("step text {text:?} does not match expression {pattern:?}")]
pub struct NoMatch {
    pattern: String,
    text: String,
    reason: Option<String>,
}

impl NoMatch {
    /// Describe a failed match, optionally with the conversion failure that
    /// rejected an otherwise matching capture.
    #[must_use]
    pub fn new(pattern: impl Into<String>, text: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            pattern: pattern.into(),
            text: text.into(),
            reason,
        }
    }

    /// Expression source that failed to match.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Step text that was tested.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Conversion failure, when the regex matched but a capture was rejected.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Errors surfaced while registering placeholders or matching expressions.
///
/// # Examples
/// ```
/// use cukeplan_patterns::ExpressionError;
/// let err = ExpressionError::DuplicatePlaceholder { name: "colour".into() };
/// assert_eq!(err.to_string(), "placeholder `{colour}` is already registered");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExpressionError {
    /// An expression containing placeholders did not match the step text.
    #[error("step text {text:?} does not match expression {pattern:?}{}", reason_suffix(.reason.as_deref()))]
    Mismatch {
        /// Expression source.
        pattern: String,
        /// Step text.
        text: String,
        /// Capture conversion failure, if any.
        reason: Option<String>,
    },
    /// A custom placeholder reused the name of a built-in placeholder.
    #[error("placeholder `{{{name}}}` is a built-in placeholder and cannot be redefined")]
    ReservedPlaceholder {
        /// Offending name.
        name: String,
    },
    /// A custom placeholder name was registered twice.
    #[error("placeholder `{{{name}}}` is already registered")]
    DuplicatePlaceholder {
        /// Offending name.
        name: String,
    },
    /// A custom placeholder name is not a usable identifier.
    #[error(
        "invalid placeholder name {name:?}: names start with a letter or '_', \
         contain only letters, digits and '_', and do not end with a digit"
    )]
    InvalidPlaceholderName {
        /// Offending name.
        name: String,
    },
    /// The regex supplied for a custom placeholder does not compile.
    #[error("invalid regular expression for placeholder `{{{name}}}`: {source}")]
    InvalidPlaceholderRegex {
        /// Placeholder name.
        name: String,
        /// Underlying regex failure.
        source: regex::Error,
    },
    /// The generated expression failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

fn reason_suffix(reason: Option<&str>) -> String {
    reason.map(|r| format!(" ({r})")).unwrap_or_default()
}

impl From<NoMatch> for ExpressionError {
    fn from(miss: NoMatch) -> Self {
        Self::Mismatch {
            pattern: miss.pattern,
            text: miss.text,
            reason: miss.reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_mismatch_without_reason() {
        let err = ExpressionError::from(NoMatch::new("I love {number} 3", "I love \"Vue\" 3", None));
        assert_eq!(
            err.to_string(),
            r#"step text "I love \"Vue\" 3" does not match expression "I love {number} 3""#
        );
    }

    #[test]
    fn formats_mismatch_with_reason() {
        let err = ExpressionError::from(NoMatch::new(
            "{int}",
            "99999999999999999999",
            Some("overflow".into()),
        ));
        assert!(err.to_string().ends_with("(overflow)"));
    }

    #[test]
    fn forwards_regex_error_display() {
        let err = ExpressionError::Regex(regex::Error::Syntax("bad".into()));
        assert_eq!(
            err.to_string(),
            regex::Error::Syntax("bad".into()).to_string()
        );
    }

    #[test]
    fn names_reserved_placeholder() {
        let err = ExpressionError::ReservedPlaceholder { name: "int".into() };
        assert!(err.to_string().contains("`{int}`"));
    }
}
