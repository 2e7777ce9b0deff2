//! Language-independent step types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a step line does, whatever word the document used for it.
///
/// `And` and `But` are conjunctions: they carry on from the step before, and
/// [`resolve`](Self::resolve) turns them into the primary type they continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKeyword {
    /// Precondition.
    Given,
    /// Action.
    When,
    /// Expected outcome.
    Then,
    /// Continues the previous step.
    And,
    /// Continues the previous step, in contrast.
    But,
}

impl StepKeyword {
    /// Every step type, in the order keyword tables list them.
    pub const ALL: [Self; 5] = [Self::Given, Self::When, Self::Then, Self::And, Self::But];

    /// English name of the step type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// `And` or `But`.
    #[must_use]
    pub const fn is_conjunction(self) -> bool {
        matches!(self, Self::And | Self::But)
    }

    /// Backgrounds only set up state, so they hold `Given` and `And` steps.
    #[must_use]
    pub const fn allowed_in_background(self) -> bool {
        matches!(self, Self::Given | Self::And)
    }

    /// Primary type of this step within a sequence.
    ///
    /// `previous` holds the last primary type seen. Conjunctions take it
    /// (`Given` when the sequence starts with one) and leave it alone; primary
    /// types replace it.
    ///
    /// ```
    /// use cukeplan::StepKeyword;
    ///
    /// let mut previous = None;
    /// let resolved: Vec<_> = [StepKeyword::When, StepKeyword::And, StepKeyword::Then]
    ///     .into_iter()
    ///     .map(|keyword| keyword.resolve(&mut previous))
    ///     .collect();
    /// assert_eq!(resolved, [StepKeyword::When, StepKeyword::When, StepKeyword::Then]);
    /// ```
    #[must_use]
    pub fn resolve(self, previous: &mut Option<Self>) -> Self {
        if self.is_conjunction() {
            return previous.unwrap_or(Self::Given);
        }
        *previous = Some(self);
        self
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string named no step type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a step keyword")]
pub struct StepKeywordParseError(pub String);

/// Parses the English names, ignoring case and surrounding whitespace.
impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let name = value.trim();
        Self::ALL
            .into_iter()
            .find(|keyword| name.eq_ignore_ascii_case(keyword.as_str()))
            .ok_or_else(|| StepKeywordParseError(name.to_owned()))
    }
}
