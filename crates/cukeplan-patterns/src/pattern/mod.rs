//! Step-pattern lexing and compilation helpers.

mod compiler;
mod lexer;
#[cfg(test)]
pub(crate) mod test_support;

use regex::Regex;

use crate::capture::extract_named_captures;
use crate::errors::{ExpressionError, NoMatch};
use crate::kind::PlaceholderKind;
use crate::specificity::SpecificityScore;
use crate::value::Value;

pub use compiler::build_regex_from_pattern;
pub(crate) use compiler::plan_regex;
pub(crate) use lexer::{Token, lex_pattern};

/// A step pattern compiled into an anchored regular expression.
///
/// Produced by [`ExpressionRegistry::compile`](crate::ExpressionRegistry::compile).
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    regex: Regex,
    kinds: Vec<PlaceholderKind>,
    groups: Vec<String>,
    specificity: SpecificityScore,
}

impl CompiledPattern {
    pub(crate) fn compile<F>(pattern: &str, resolve: F) -> Result<Self, ExpressionError>
    where
        F: Fn(&str) -> Option<PlaceholderKind>,
    {
        let plan = plan_regex(pattern, resolve);
        let regex = Regex::new(&plan.source)?;
        let specificity = SpecificityScore::new(plan.literal_len, plan.groups.len());
        let (kinds, groups) = plan.groups.into_iter().unzip();
        log::trace!("compiled expression {pattern:?} to {}", regex.as_str());
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
            kinds,
            groups,
            specificity,
        })
    }

    /// Source pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Compiled regular expression.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the pattern contains at least one recognised placeholder.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        !self.kinds.is_empty()
    }

    /// Placeholder kind names in left-to-right order.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.kinds.iter().map(PlaceholderKind::name)
    }

    /// Capture group names in left-to-right order.
    #[must_use]
    pub fn group_names(&self) -> &[String] {
        &self.groups
    }

    /// Specificity used to rank competing patterns.
    #[must_use]
    pub fn specificity(&self) -> SpecificityScore {
        self.specificity
    }

    /// Match `text` and convert each capture with its placeholder's
    /// transformer.
    ///
    /// Placeholder-free patterns match only identical text and yield no
    /// values.
    ///
    /// # Errors
    /// Returns [`NoMatch`] when the text does not match or a capture cannot
    /// be converted.
    pub fn captures(&self, text: &str) -> Result<Vec<Value>, NoMatch> {
        if !self.has_placeholders() {
            return (self.pattern == text)
                .then(Vec::new)
                .ok_or_else(|| NoMatch::new(&self.pattern, text, None));
        }
        let raw = extract_named_captures(&self.regex, &self.groups, text)
            .ok_or_else(|| NoMatch::new(&self.pattern, text, None))?;
        self.kinds
            .iter()
            .zip(raw)
            .map(|(kind, capture)| {
                kind.convert(&capture)
                    .map_err(|reason| NoMatch::new(&self.pattern, text, Some(reason)))
            })
            .collect()
    }

    /// Return `true` when `text` matches and every capture converts.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.captures(text).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{builtin, compile_ok};
    use super::*;
    use rstest::rstest;

    #[test]
    fn compiles_literal_patterns() {
        let compiled = compile_ok("Given a step");
        assert_eq!(compiled.regex().as_str(), "^Given a step$");
        assert!(!compiled.has_placeholders());
        assert_eq!(compiled.captures("Given a step"), Ok(Vec::new()));
        assert!(compiled.captures("Given a step!").is_err());
    }

    #[rstest]
    #[case::backslash(r"save to C:\temp")]
    #[case::doubled_braces("render {{x}}")]
    #[case::unknown_placeholder("pick {colour}")]
    fn placeholder_free_patterns_compare_source_text(#[case] pattern: &str) {
        let compiled = compile_ok(pattern);
        assert_eq!(compiled.captures(pattern), Ok(Vec::new()));
    }

    #[test]
    fn returns_values_in_placeholder_order() {
        let compiled = compile_ok("{word} has {int} and {string}");
        let values = compiled
            .captures(r#"alice has 3 and "hats""#)
            .unwrap_or_else(|miss| panic!("should match: {miss}"));
        assert_eq!(
            values,
            vec![Value::from("alice"), Value::Int(3), Value::from("hats")]
        );
    }

    #[test]
    fn treats_conversion_failure_as_no_match() {
        let compiled = compile_ok("on {date}");
        let Err(miss) = compiled.captures("on 2024-02-31") else {
            panic!("impossible date should not match");
        };
        assert!(miss.reason().is_some());
    }

    #[test]
    fn surfaces_regex_compilation_errors() {
        let heavy_pattern = format!("prefix {}", "{date}".repeat(20_000));
        let Err(err) = CompiledPattern::compile(&heavy_pattern, builtin) else {
            panic!("pattern should be too large");
        };
        assert!(matches!(
            err,
            ExpressionError::Regex(regex::Error::CompiledTooBig(_))
        ));
    }
}
