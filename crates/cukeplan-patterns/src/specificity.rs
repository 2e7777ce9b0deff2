//! Ranking of expressions that match the same step text.

use std::cmp::Ordering;

use crate::kind::BuiltinKind;
use crate::pattern::{Token, lex_pattern};

/// How tightly an expression pins down the text it matches.
///
/// A score compares greater when the expression has more literal characters,
/// or the same literal length and fewer placeholders. Literal length counts
/// characters, not bytes.
///
/// # Examples
///
/// ```
/// use cukeplan_patterns::SpecificityScore;
///
/// let exact = SpecificityScore::calculate("the output is foo");
/// let loose = SpecificityScore::calculate("the output is {word}");
/// assert!(exact > loose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecificityScore {
    /// Characters of literal text.
    pub literal_len: usize,
    /// Placeholders that capture text.
    pub placeholders: usize,
}

impl SpecificityScore {
    pub(crate) fn new(literal_len: usize, placeholders: usize) -> Self {
        Self {
            literal_len,
            placeholders,
        }
    }

    /// Score `pattern` knowing only the builtin placeholders.
    ///
    /// Any other `{name}` is scored as the literal text it would match
    /// without a registry. [`CompiledPattern::specificity`](crate::CompiledPattern::specificity)
    /// also counts custom placeholders.
    ///
    /// ```
    /// use cukeplan_patterns::SpecificityScore;
    ///
    /// let score = SpecificityScore::calculate("I have {int} apples");
    /// assert_eq!((score.literal_len, score.placeholders), (14, 1));
    /// ```
    #[must_use]
    pub fn calculate(pattern: &str) -> Self {
        lex_pattern(pattern)
            .into_iter()
            .fold(Self::default(), |score, token| match token {
                Token::Literal(text) => Self {
                    literal_len: score.literal_len + text.chars().count(),
                    ..score
                },
                Token::Placeholder { name, .. } if BuiltinKind::from_name(&name).is_some() => {
                    Self {
                        placeholders: score.placeholders + 1,
                        ..score
                    }
                }
                Token::Placeholder { name, .. } => Self {
                    literal_len: score.literal_len + name.chars().count() + 2,
                    ..score
                },
            })
    }
}

impl Ord for SpecificityScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal_len
            .cmp(&other.literal_len)
            .then_with(|| other.placeholders.cmp(&self.placeholders))
    }
}

impl PartialOrd for SpecificityScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::literal_beats_placeholder("overlap apples", "overlap {word}")]
    #[case::longer_literal("the receipt total is {number} euros", "the receipt total is {number}")]
    #[case::fewer_placeholders("ab {int}", "a {int} {int}")]
    fn ranks_tighter_patterns_higher(#[case] tighter: &str, #[case] looser: &str) {
        assert!(SpecificityScore::calculate(tighter) > SpecificityScore::calculate(looser));
    }

    #[rstest]
    #[case("", 0, 0)]
    #[case("café {word}", 5, 1)]
    #[case("pick {colour}", 13, 0)]
    #[case("{int}{int}", 0, 2)]
    fn counts_characters_and_placeholders(
        #[case] pattern: &str,
        #[case] literal_len: usize,
        #[case] placeholders: usize,
    ) {
        assert_eq!(
            SpecificityScore::calculate(pattern),
            SpecificityScore::new(literal_len, placeholders)
        );
    }
}
