//! Placeholder registry and compiled-pattern cache.
//!
//! A registry owns the custom placeholders known to one configuration. It is
//! created empty (built-ins only), extended with [`ExpressionRegistry::register`]
//! and then shared by reference while patterns are compiled and matched.
//! Registering a placeholder drops every cached compilation so patterns that
//! mention the new name are recompiled on next use.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use hashbrown::HashMap;
use regex::Regex;

use crate::errors::ExpressionError;
use crate::kind::{BuiltinKind, CustomPlaceholder, PlaceholderKind, Transformer};
use crate::pattern::{CompiledPattern, Token, lex_pattern};
use crate::value::Value;

/// Placeholder kinds available to a configuration, plus a cache of compiled
/// patterns.
#[derive(Default)]
pub struct ExpressionRegistry {
    custom: Vec<Arc<CustomPlaceholder>>,
    cache: Mutex<HashMap<String, Arc<CompiledPattern>>>,
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        && !name.ends_with(|ch: char| ch.is_ascii_digit())
}

impl ExpressionRegistry {
    /// Create a registry that knows only the built-in placeholders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom placeholder.
    ///
    /// `regex` is the fragment matched in place of `{name}`; `transformer`
    /// converts each raw capture.
    ///
    /// # Errors
    /// - [`ExpressionError::ReservedPlaceholder`] when `name` is built in.
    /// - [`ExpressionError::DuplicatePlaceholder`] when `name` is registered.
    /// - [`ExpressionError::InvalidPlaceholderName`] when `name` is not an
    ///   identifier or ends with a digit.
    /// - [`ExpressionError::InvalidPlaceholderRegex`] when `regex` does not
    ///   compile.
    ///
    /// # Examples
    /// ```
    /// use cukeplan_patterns::{ExpressionRegistry, Value};
    ///
    /// let mut registry = ExpressionRegistry::new();
    /// registry
    ///     .register("colour", "red|green|blue", |raw| Value::from(raw.to_uppercase()))
    ///     .expect("colour is a fresh name");
    /// let values = registry
    ///     .match_text("paint it {colour}", "paint it green")
    ///     .expect("text matches");
    /// assert_eq!(values, vec![Value::from("GREEN")]);
    /// assert!(registry.register("int", r"\d+", |raw| Value::from(raw)).is_err());
    /// ```
    pub fn register<F>(
        &mut self,
        name: &str,
        regex: &str,
        transformer: F,
    ) -> Result<(), ExpressionError>
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.register_shared(name, regex, Arc::new(transformer))
    }

    /// Register a custom placeholder whose transformer is already shared.
    ///
    /// # Errors
    /// As for [`register`](Self::register).
    pub fn register_shared(
        &mut self,
        name: &str,
        regex: &str,
        transformer: Transformer,
    ) -> Result<(), ExpressionError> {
        if BuiltinKind::from_name(name).is_some() {
            return Err(ExpressionError::ReservedPlaceholder { name: name.into() });
        }
        if self.custom_placeholder(name).is_some() {
            return Err(ExpressionError::DuplicatePlaceholder { name: name.into() });
        }
        if !is_valid_name(name) {
            return Err(ExpressionError::InvalidPlaceholderName { name: name.into() });
        }
        Regex::new(&format!("^(?:{regex})$")).map_err(|source| {
            ExpressionError::InvalidPlaceholderRegex {
                name: name.into(),
                source,
            }
        })?;

        log::debug!("registered custom placeholder {{{name}}}");
        self.custom.push(Arc::new(CustomPlaceholder::new(
            name.to_owned(),
            regex.to_owned(),
            transformer,
        )));
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }

    /// Return the custom placeholder registered under `name`.
    #[must_use]
    pub fn custom_placeholder(&self, name: &str) -> Option<&CustomPlaceholder> {
        self.custom
            .iter()
            .find(|custom| custom.name() == name)
            .map(Arc::as_ref)
    }

    /// Names of all registered custom placeholders, in registration order.
    pub fn custom_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.custom.iter().map(|custom| custom.name())
    }

    fn kind(&self, name: &str) -> Option<PlaceholderKind> {
        BuiltinKind::from_name(name)
            .map(PlaceholderKind::Builtin)
            .or_else(|| {
                self.custom
                    .iter()
                    .find(|custom| custom.name() == name)
                    .cloned()
                    .map(PlaceholderKind::Custom)
            })
    }

    /// Whether `pattern` mentions at least one known placeholder.
    ///
    /// # Examples
    /// ```
    /// use cukeplan_patterns::ExpressionRegistry;
    /// let registry = ExpressionRegistry::new();
    /// assert!(registry.contains_placeholder("I have {int} items"));
    /// assert!(!registry.contains_placeholder("I have {many} items"));
    /// ```
    #[must_use]
    pub fn contains_placeholder(&self, pattern: &str) -> bool {
        lex_pattern(pattern).iter().any(|token| match token {
            Token::Placeholder { name, .. } => self.kind(name).is_some(),
            Token::Literal(_) => false,
        })
    }

    /// Compile `pattern`, reusing a cached compilation when available.
    ///
    /// # Errors
    /// Returns [`ExpressionError::Regex`] when the generated expression does
    /// not compile, for example because it exceeds the regex size limit.
    pub fn compile(&self, pattern: &str) -> Result<Arc<CompiledPattern>, ExpressionError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(compiled) = cache.get(pattern) {
            return Ok(Arc::clone(compiled));
        }
        let compiled = Arc::new(CompiledPattern::compile(pattern, |name| self.kind(name))?);
        cache.insert(pattern.to_owned(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Match step text against `pattern`, failing when it does not match.
    ///
    /// A placeholder-free pattern matches only identical text and yields no
    /// values; callers that want a literal comparison without an error can
    /// check [`contains_placeholder`](Self::contains_placeholder) first.
    ///
    /// # Errors
    /// Returns [`ExpressionError::Mismatch`] when the text does not match and
    /// [`ExpressionError::Regex`] when compilation fails.
    pub fn match_text(&self, pattern: &str, text: &str) -> Result<Vec<Value>, ExpressionError> {
        let compiled = self.compile(pattern)?;
        Ok(compiled.captures(text)?)
    }
}

impl Clone for ExpressionRegistry {
    fn clone(&self) -> Self {
        Self {
            custom: self.custom.clone(),
            cache: Mutex::default(),
        }
    }
}

impl fmt::Debug for ExpressionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionRegistry")
            .field("custom", &self.custom)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise registry fallibility")]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn text(raw: &str) -> Value {
        Value::from(raw)
    }

    #[fixture]
    fn registry() -> ExpressionRegistry {
        ExpressionRegistry::new()
    }

    #[rstest]
    fn matches_string_and_number(registry: ExpressionRegistry) {
        let values = registry
            .match_text("I love {string} {number}", r#"I love "Vue" 3"#)
            .unwrap();
        assert_eq!(values, vec![Value::from("Vue"), Value::Number(3.0)]);
    }

    #[rstest]
    fn placeholder_mismatch_is_an_error(registry: ExpressionRegistry) {
        let err = registry
            .match_text("I love {number} 3", r#"I love "Vue" 3"#)
            .unwrap_err();
        assert!(matches!(err, ExpressionError::Mismatch { .. }));
    }

    #[rstest]
    #[case("{boolean} it is", "true it is", Value::Bool(true))]
    #[case("mail {email}", "mail someone@example.com", Value::from("someone@example.com"))]
    #[case("key {char}", "key q", Value::Char('q'))]
    #[case("one {word}", "one token", Value::from("token"))]
    #[case("ratio {float}", "ratio 2.5", Value::Number(2.5))]
    #[case(
        "fruits {list}",
        "fruits apple, pear",
        Value::List(vec!["apple".into(), "pear".into()])
    )]
    fn converts_each_builtin(
        registry: ExpressionRegistry,
        #[case] pattern: &str,
        #[case] text: &str,
        #[case] expected: Value,
    ) {
        assert_eq!(registry.match_text(pattern, text).unwrap(), vec![expected]);
    }

    #[rstest]
    fn word_does_not_span_spaces(registry: ExpressionRegistry) {
        assert!(registry.match_text("say {word}", "say two words").is_err());
    }

    #[rstest]
    fn rejects_reserved_and_duplicate_names(mut registry: ExpressionRegistry) {
        assert!(matches!(
            registry.register("string", ".+", text),
            Err(ExpressionError::ReservedPlaceholder { .. })
        ));
        registry.register("colour", "red|blue", text).unwrap();
        assert!(matches!(
            registry.register("colour", "green", text),
            Err(ExpressionError::DuplicatePlaceholder { .. })
        ));
    }

    #[rstest]
    #[case("")]
    #[case("9lives")]
    #[case("level2")]
    #[case("with space")]
    fn rejects_invalid_names(mut registry: ExpressionRegistry, #[case] name: &str) {
        assert!(matches!(
            registry.register(name, ".+", text),
            Err(ExpressionError::InvalidPlaceholderName { .. })
        ));
    }

    #[rstest]
    fn rejects_invalid_custom_regex(mut registry: ExpressionRegistry) {
        assert!(matches!(
            registry.register("broken", "(", text),
            Err(ExpressionError::InvalidPlaceholderRegex { .. })
        ));
    }

    #[rstest]
    fn registration_invalidates_cached_patterns(mut registry: ExpressionRegistry) {
        let before = registry.compile("paint {colour}").unwrap();
        assert!(!before.has_placeholders());

        registry.register("colour", "red|blue", text).unwrap();
        let after = registry.compile("paint {colour}").unwrap();
        assert!(after.has_placeholders());
        assert_eq!(
            registry.match_text("paint {colour}", "paint blue").unwrap(),
            vec![Value::from("blue")]
        );
    }

    #[rstest]
    fn reuses_cached_compilations(registry: ExpressionRegistry) {
        let first = registry.compile("{int} items").unwrap();
        let second = registry.compile("{int} items").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[rstest]
    fn custom_alternation_is_isolated(mut registry: ExpressionRegistry) {
        registry.register("pet", "cat|dog", text).unwrap();
        assert!(registry.match_text("a {pet} sleeps", "a dog sleeps").is_ok());
        assert!(registry.match_text("a {pet} sleeps", "a cat").is_err());
    }

    #[rstest]
    fn clones_share_custom_placeholders(mut registry: ExpressionRegistry) {
        registry.register("pet", "cat|dog", text).unwrap();
        let clone = registry.clone();
        assert_eq!(clone.custom_names().collect::<Vec<_>>(), ["pet"]);
    }
}
