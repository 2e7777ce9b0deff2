//! Convert lexed tokens into anchored regular-expression sources.

use hashbrown::HashMap;

use crate::kind::PlaceholderKind;

use super::lexer::{Token, lex_pattern};

/// Regex source plus the placeholder layout it was generated from.
#[derive(Debug, Clone)]
pub(crate) struct RegexPlan {
    pub(crate) source: String,
    /// Placeholder kinds and their group names, in left-to-right order.
    pub(crate) groups: Vec<(PlaceholderKind, String)>,
    pub(crate) literal_len: usize,
}

/// Build an anchored regular expression from a pattern, resolving each
/// `{name}` through `resolve`. Unknown names stay literal.
///
/// Group names combine the kind name with a counter local to this call, so
/// the same kind used twice yields `int0` and `int1`.
pub(crate) fn plan_regex<F>(pattern: &str, resolve: F) -> RegexPlan
where
    F: Fn(&str) -> Option<PlaceholderKind>,
{
    let tokens = lex_pattern(pattern);
    let mut source = String::with_capacity(pattern.len().saturating_mul(2) + 2);
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut groups = Vec::new();
    let mut literal_len = 0usize;
    source.push('^');

    for token in tokens {
        match token {
            Token::Literal(text) => {
                literal_len += text.chars().count();
                source.push_str(&regex::escape(&text));
            }
            Token::Placeholder { name, .. } => {
                let Some(kind) = resolve(&name) else {
                    let text = format!("{{{name}}}");
                    literal_len += text.chars().count();
                    source.push_str(&regex::escape(&text));
                    continue;
                };
                let counter = counters.entry(name.clone()).or_insert(0);
                let group = format!("{name}{counter}");
                *counter += 1;
                source.push_str("(?P<");
                source.push_str(&group);
                source.push_str(">(?:");
                source.push_str(kind.regex());
                source.push_str("))");
                groups.push((kind, group));
            }
        }
    }

    source.push('$');
    RegexPlan {
        source,
        groups,
        literal_len,
    }
}

/// Build the regex source for a pattern using only the built-in placeholders.
///
/// # Examples
/// ```
/// use cukeplan_patterns::build_regex_from_pattern;
/// assert_eq!(
///     build_regex_from_pattern("I have {int} cukes"),
///     r"^I have (?P<int0>(?:[+-]?\d+)) cukes$"
/// );
/// ```
#[must_use]
pub fn build_regex_from_pattern(pattern: &str) -> String {
    plan_regex(pattern, |name| {
        crate::kind::BuiltinKind::from_name(name).map(PlaceholderKind::Builtin)
    })
    .source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::BuiltinKind;

    fn builtin(name: &str) -> Option<PlaceholderKind> {
        BuiltinKind::from_name(name).map(PlaceholderKind::Builtin)
    }

    #[test]
    fn builds_regex_for_placeholder_patterns() {
        let plan = plan_regex("I have {int} cukes", builtin);
        assert_eq!(plan.source, r"^I have (?P<int0>(?:[+-]?\d+)) cukes$");
        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.literal_len, 13);
    }

    #[test]
    fn numbers_repeated_kinds_independently() {
        let plan = plan_regex("{int} {word} {int}", builtin);
        let names: Vec<_> = plan.groups.iter().map(|(_, group)| group.as_str()).collect();
        assert_eq!(names, ["int0", "word0", "int1"]);
    }

    #[test]
    fn restarts_counters_for_each_pattern() {
        let first = plan_regex("{int} {int}", builtin);
        let second = plan_regex("{int}", builtin);
        assert_eq!(first.groups.len(), 2);
        assert_eq!(
            second.groups.first().map(|(_, group)| group.as_str()),
            Some("int0")
        );
    }

    #[test]
    fn escapes_unknown_placeholders_and_metacharacters() {
        let plan = plan_regex("cost (in $) is {colour}?", builtin);
        assert_eq!(plan.source, r"^cost \(in \$\) is \{colour\}\?$");
        assert!(plan.groups.is_empty());
    }
}
