//! Parser configuration.
//!
//! A [`Config`] is built once, optionally from the process environment, and
//! then shared by reference with the parser and step resolver. It carries the
//! document language, the tag policy, the strict-examples switch and the
//! expression registry holding custom placeholders.
//!
//! Environment variables:
//!
//! - `CUKEPLAN_LANGUAGE`: default document language, e.g. `fr`.
//! - `CUKEPLAN_INCLUDE_TAGS`: comma-separated include filters.
//! - `CUKEPLAN_EXCLUDE_TAGS`: comma-separated exclude filters.
//! - `CUKEPLAN_STRICT_EXAMPLES`: reject outline rows lacking `Examples:`.

use cukeplan_patterns::{ExpressionError, ExpressionRegistry, Value};

use crate::error::ConfigError;
use crate::keywords::KeywordTable;
use crate::tags::{TagFilter, TagPolicy};

const LANGUAGE_VAR: &str = "CUKEPLAN_LANGUAGE";
const INCLUDE_TAGS_VAR: &str = "CUKEPLAN_INCLUDE_TAGS";
const EXCLUDE_TAGS_VAR: &str = "CUKEPLAN_EXCLUDE_TAGS";
const STRICT_EXAMPLES_VAR: &str = "CUKEPLAN_STRICT_EXAMPLES";

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes" | "on" | "ON" | "On" => Some(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "No" | "off" | "OFF" | "Off" => {
            Some(false)
        }
        _ => None,
    }
}

/// Settings shared by every parse and resolution pass.
#[derive(Debug, Clone)]
pub struct Config {
    language: String,
    tags: TagPolicy,
    strict_examples: bool,
    expressions: ExpressionRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            tags: TagPolicy::default(),
            strict_examples: false,
            expressions: ExpressionRegistry::new(),
        }
    }
}

impl Config {
    /// English, no tag filters, lenient examples, built-in placeholders only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from `CUKEPLAN_*` environment variables, falling back to
    /// defaults for unset ones.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which maps variable names to values.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "CUKEPLAN_LANGUAGE" => Some("fr".to_owned()),
    ///     "CUKEPLAN_STRICT_EXAMPLES" => Some("yes".to_owned()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.language(), "fr");
    /// assert!(config.strict_examples());
    /// # Ok::<(), cukeplan::ConfigError>(())
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(language) = lookup(LANGUAGE_VAR) {
            let language = language.trim();
            if !language.is_empty() {
                if !KeywordTable::is_supported(language) {
                    log::warn!("{LANGUAGE_VAR}={language} has no keyword table; using English");
                }
                config.language = language.to_owned();
            }
        }
        if let Some(include) = lookup(INCLUDE_TAGS_VAR) {
            config.tags = TagPolicy::new(
                parse_filters(INCLUDE_TAGS_VAR, &include)?,
                config.tags.exclude().to_vec(),
            );
        }
        if let Some(exclude) = lookup(EXCLUDE_TAGS_VAR) {
            config.tags = TagPolicy::new(
                config.tags.include().to_vec(),
                parse_filters(EXCLUDE_TAGS_VAR, &exclude)?,
            );
        }
        if let Some(strict) = lookup(STRICT_EXAMPLES_VAR) {
            config.strict_examples = parse_env_bool(&strict).ok_or_else(|| {
                ConfigError::new(
                    STRICT_EXAMPLES_VAR,
                    format!("expected a boolean, found `{}`", strict.trim()),
                )
            })?;
        }
        log::debug!("loaded configuration: {config:?}");
        Ok(config)
    }

    /// Set the default document language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the tag policy.
    #[must_use]
    pub fn with_tags(mut self, tags: TagPolicy) -> Self {
        self.tags = tags;
        self
    }

    /// Reject outline rows written without an `Examples:` keyword at parse
    /// time instead of deferring the failure to expansion.
    #[must_use]
    pub fn with_strict_examples(mut self, strict: bool) -> Self {
        self.strict_examples = strict;
        self
    }

    /// Register a custom placeholder usable in step patterns.
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the name is reserved, already
    /// registered or malformed, or when `regex` does not compile.
    pub fn register_placeholder<F>(
        &mut self,
        name: &str,
        regex: &str,
        transformer: F,
    ) -> Result<(), ExpressionError>
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.expressions.register(name, regex, transformer)
    }

    /// Default document language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Keyword table for the default language.
    #[must_use]
    pub fn keywords(&self) -> &'static KeywordTable {
        KeywordTable::for_language(&self.language)
    }

    /// Tag policy applied to scenario and rule selection.
    #[must_use]
    pub fn tags(&self) -> &TagPolicy {
        &self.tags
    }

    /// Whether missing `Examples:` keywords fail the parse.
    #[must_use]
    pub fn strict_examples(&self) -> bool {
        self.strict_examples
    }

    /// Registry of placeholders used to compile step patterns.
    #[must_use]
    pub fn expressions(&self) -> &ExpressionRegistry {
        &self.expressions
    }
}

fn parse_filters(key: &str, text: &str) -> Result<Vec<TagFilter>, ConfigError> {
    TagPolicy::parse_list(text).map_err(|err| ConfigError::new(key, err.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagSet;
    use rstest::rstest;

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[test]
    fn defaults_are_lenient_english() {
        let config = Config::default();
        assert_eq!(config.language(), "en");
        assert!(!config.strict_examples());
        assert!(config.tags().include().is_empty());
        assert_eq!(config.keywords().language(), "en");
    }

    #[test]
    fn parse_env_bool_understands_common_values() {
        for truthy in ["1", "true", "TRUE", "True", "yes", "YES", "Yes", "on", "ON", "On"] {
            assert_eq!(parse_env_bool(truthy), Some(true), "expected {truthy} to be truthy");
        }
        for falsy in ["0", "false", "FALSE", "False", "no", "NO", "No", "off", "OFF", "Off"] {
            assert_eq!(parse_env_bool(falsy), Some(false), "expected {falsy} to be falsy");
        }
        assert_eq!(parse_env_bool("maybe"), None);
    }

    #[test]
    fn reads_tag_filters() -> Result<(), ConfigError> {
        let config = Config::from_lookup(lookup_from(&[
            ("CUKEPLAN_INCLUDE_TAGS", "@smoke, @web+@fast"),
            ("CUKEPLAN_EXCLUDE_TAGS", "@wip"),
        ]))?;
        let web_fast: TagSet = ["web", "fast"].into_iter().collect();
        let wip: TagSet = ["smoke", "wip"].into_iter().collect();
        assert!(config.tags().should_run(&web_fast));
        assert!(!config.tags().should_run(&wip));
        Ok(())
    }

    #[rstest]
    #[case("CUKEPLAN_STRICT_EXAMPLES", "perhaps")]
    #[case("CUKEPLAN_INCLUDE_TAGS", "@a+")]
    #[case("CUKEPLAN_EXCLUDE_TAGS", "two words")]
    fn rejects_invalid_values(#[case] key: &'static str, #[case] value: &'static str) {
        let err = Config::from_lookup(|name| (name == key).then(|| value.to_owned()))
            .err()
            .map(|err| err.key);
        assert_eq!(err.as_deref(), Some(key));
    }

    #[test]
    fn blank_language_keeps_default() -> Result<(), ConfigError> {
        let config = Config::from_lookup(lookup_from(&[("CUKEPLAN_LANGUAGE", "  ")]))?;
        assert_eq!(config.language(), "en");
        Ok(())
    }

    #[test]
    fn registers_custom_placeholders() -> Result<(), ExpressionError> {
        let mut config = Config::default();
        config.register_placeholder("colour", "red|blue", |raw| Value::from(raw.to_uppercase()))?;
        assert!(config.expressions().custom_placeholder("colour").is_some());
        assert!(config.register_placeholder("colour", "x", |raw| Value::from(raw)).is_err());
        Ok(())
    }

    #[test]
    fn missing_variables_keep_defaults() -> Result<(), ConfigError> {
        let config = Config::from_lookup(|_| None)?;
        assert_eq!(config.language(), "en");
        assert!(!config.strict_examples());
        assert!(config.tags().include().is_empty());
        assert!(config.tags().exclude().is_empty());
        Ok(())
    }
}
