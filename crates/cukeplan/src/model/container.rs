//! Step containers: the shared capability of Backgrounds and Scenarios.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keywords::StepKeyword;
use crate::tags::TagSet;

use super::Step;

/// A container refused a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("`{keyword}` steps are not allowed in a {container}")]
pub struct DisallowedStep {
    /// Rejected keyword.
    pub keyword: StepKeyword,
    /// Kind of container that refused it.
    pub container: &'static str,
}

/// Ordered steps with executed-step bookkeeping.
///
/// Implementors supply storage through [`steps`](Self::steps),
/// [`steps_mut`](Self::steps_mut) and [`add_step`](Self::add_step); lookups
/// are provided.
pub trait StepContainer {
    /// Steps in source order.
    fn steps(&self) -> &[Step];

    /// Mutable access to the steps in source order.
    fn steps_mut(&mut self) -> &mut [Step];

    /// Append a step.
    ///
    /// # Errors
    /// Returns [`DisallowedStep`] when the container does not accept the
    /// step's keyword.
    fn add_step(&mut self, step: Step) -> Result<(), DisallowedStep>;

    /// First step with the given keyword and details.
    fn find_step(&self, keyword: StepKeyword, details: &str) -> Option<&Step> {
        self.steps()
            .iter()
            .find(|step| step.keyword() == keyword && step.details() == details)
    }

    /// First step not yet marked as executed.
    fn first_uncalled_step(&self) -> Option<&Step> {
        self.steps().iter().find(|step| !step.is_called())
    }

    /// Whether any step has not been executed.
    fn has_uncalled_steps(&self) -> bool {
        self.first_uncalled_step().is_some()
    }

    /// Mark the step at `index` as executed. Returns `false` when `index` is
    /// out of range.
    fn mark_step_called(&mut self, index: usize) -> bool {
        self.steps_mut()
            .get_mut(index)
            .map(Step::mark_called)
            .is_some()
    }
}

/// Steps run before every scenario of a Feature or Rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    pub(crate) name: String,
    pub(crate) keyword: String,
    pub(crate) description: Vec<String>,
    pub(crate) steps: Vec<Step>,
    pub(crate) tags: TagSet,
    pub(crate) line: usize,
    pub(crate) called: bool,
}

impl Background {
    /// Create an empty background.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyword: "Background".to_owned(),
            ..Self::default()
        }
    }

    /// Optional name written after `Background:`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Localised keyword as written.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Free-text description lines.
    #[must_use]
    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// Tags attached to the background.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// 1-based source line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether the runner marked the background as executed.
    #[must_use]
    pub fn is_called(&self) -> bool {
        self.called
    }

    /// Mark the background as executed. Marking twice is harmless.
    pub fn mark_called(&mut self) {
        self.called = true;
    }
}

impl StepContainer for Background {
    fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn steps_mut(&mut self) -> &mut [Step] {
        &mut self.steps
    }

    fn add_step(&mut self, step: Step) -> Result<(), DisallowedStep> {
        if !step.keyword().allowed_in_background() {
            return Err(DisallowedStep {
                keyword: step.keyword(),
                container: "Background",
            });
        }
        self.steps.push(step);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StepKeyword::When)]
    #[case(StepKeyword::Then)]
    #[case(StepKeyword::But)]
    #[expect(clippy::expect_used, reason = "test asserts the rejection path")]
    fn background_rejects_non_setup_steps(#[case] keyword: StepKeyword) {
        let mut background = Background::new("");
        let err = background
            .add_step(Step::new(keyword, "something"))
            .expect_err("step must be rejected");
        assert_eq!(err.keyword, keyword);
        assert!(err.to_string().contains(keyword.as_str()));
        assert!(background.steps().is_empty());
    }

    #[test]
    fn tracks_uncalled_steps() -> Result<(), DisallowedStep> {
        let mut background = Background::new("setup");
        background.add_step(Step::new(StepKeyword::Given, "a"))?;
        background.add_step(Step::new(StepKeyword::And, "b"))?;

        assert!(background.mark_step_called(0));
        assert!(!background.mark_step_called(5));
        assert_eq!(
            background.first_uncalled_step().map(Step::details),
            Some("b")
        );
        assert!(background.mark_step_called(1));
        assert!(!background.has_uncalled_steps());
        assert_eq!(
            background
                .find_step(StepKeyword::And, "b")
                .map(Step::line),
            Some(0)
        );
        Ok(())
    }
}
