//! Scenarios, outlines and example rows.

use serde::{Deserialize, Serialize};

use crate::outline::substitute;
use crate::tags::TagSet;

use super::container::{DisallowedStep, StepContainer};
use super::Step;

/// Whether a scenario is concrete or a template expanded per example row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// A concrete scenario.
    Scenario,
    /// A Scenario Outline.
    Outline,
}

/// One row of an Examples table, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRow {
    pub(crate) values: Vec<(String, Option<String>)>,
    pub(crate) tags: TagSet,
    pub(crate) line: usize,
}

impl ExampleRow {
    /// Build a row from `(column, value)` pairs; `None` marks a missing cell.
    #[must_use]
    pub fn new<K, V>(values: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(key, value)| (key.into(), value.map(Into::into)))
                .collect(),
            ..Self::default()
        }
    }

    /// Raw cell text for `column`, or `None` when the column is absent or the
    /// cell is missing.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Column names in table order.
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.iter().map(|(key, _)| key.as_str())
    }

    /// `(column, cell)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    /// Tags of the Examples block this row came from.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// 1-based source line, or `0` for rows built in code.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}

/// Example data carried by a Scenario Outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineData {
    pub(crate) examples: Vec<ExampleRow>,
    pub(crate) missing_examples_keyword: bool,
}

impl OutlineData {
    /// Example rows across every Examples block, in source order.
    #[must_use]
    pub fn examples(&self) -> &[ExampleRow] {
        &self.examples
    }

    /// Whether table rows appeared without an `Examples:` keyword.
    #[must_use]
    pub fn missing_examples_keyword(&self) -> bool {
        self.missing_examples_keyword
    }
}

/// A Scenario, or a Scenario Outline when it carries [`OutlineData`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub(crate) name: String,
    pub(crate) keyword: String,
    pub(crate) description: Vec<String>,
    pub(crate) steps: Vec<Step>,
    pub(crate) tags: TagSet,
    pub(crate) line: usize,
    pub(crate) called: bool,
    pub(crate) outline: Option<OutlineData>,
}

impl Scenario {
    /// Create a concrete scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyword: "Scenario".to_owned(),
            ..Self::default()
        }
    }

    /// Create a Scenario Outline with the given example rows.
    #[must_use]
    pub fn outline(name: impl Into<String>, examples: Vec<ExampleRow>) -> Self {
        Self {
            name: name.into(),
            keyword: "Scenario Outline".to_owned(),
            outline: Some(OutlineData {
                examples,
                missing_examples_keyword: false,
            }),
            ..Self::default()
        }
    }

    /// Add tags.
    #[must_use]
    pub fn with_tags<'a>(mut self, tags: impl IntoIterator<Item = &'a str>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Scenario name.
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

    /// Tags written on the scenario itself.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// 1-based source line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Concrete scenario or outline.
    #[must_use]
    pub fn kind(&self) -> ScenarioKind {
        if self.outline.is_some() {
            ScenarioKind::Outline
        } else {
            ScenarioKind::Scenario
        }
    }

    /// Whether this is a Scenario Outline.
    #[must_use]
    pub fn is_outline(&self) -> bool {
        self.kind() == ScenarioKind::Outline
    }

    /// Outline data, when this is a Scenario Outline.
    #[must_use]
    pub fn outline_data(&self) -> Option<&OutlineData> {
        self.outline.as_ref()
    }

    /// Example rows; empty for concrete scenarios.
    #[must_use]
    pub fn examples(&self) -> &[ExampleRow] {
        self.outline
            .as_ref()
            .map(OutlineData::examples)
            .unwrap_or_default()
    }

    /// Whether the runner marked this scenario as executed.
    #[must_use]
    pub fn is_called(&self) -> bool {
        self.called
    }

    /// Mark the scenario as executed. Marking twice is harmless.
    pub fn mark_called(&mut self) {
        self.called = true;
    }

    /// Title of `step` with every `<column>` replaced by the raw text of
    /// `row`. Placeholders without a value in the row are left untouched.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::{ExampleRow, Scenario, Step, StepKeyword};
    ///
    /// let outline = Scenario::outline("using", vec![]);
    /// let step = Step::new(StepKeyword::Given, "I use <x>");
    /// let row = ExampleRow::new([("x", Some("a"))]);
    /// assert_eq!(outline.step_title(&step, &row), "Given I use a");
    /// ```
    #[must_use]
    pub fn step_title(&self, step: &Step, row: &ExampleRow) -> String {
        format!(
            "{} {}",
            step.keyword_text(),
            substitute(step.details(), |name| row.get(name))
        )
    }

    pub(crate) fn ensure_outline(&mut self) -> &mut OutlineData {
        self.outline.get_or_insert_with(OutlineData::default)
    }
}

impl StepContainer for Scenario {
    fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn steps_mut(&mut self) -> &mut [Step] {
        &mut self.steps
    }

    fn add_step(&mut self, step: Step) -> Result<(), DisallowedStep> {
        self.steps.push(step);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::StepKeyword;

    #[test]
    fn kind_follows_outline_data() {
        let mut scenario = Scenario::new("plain");
        assert_eq!(scenario.kind(), ScenarioKind::Scenario);
        assert!(scenario.examples().is_empty());
        scenario.ensure_outline();
        assert_eq!(scenario.kind(), ScenarioKind::Outline);
    }

    #[test]
    fn example_row_distinguishes_missing_cells() {
        let row = ExampleRow::new([("a", Some("1")), ("b", None)]);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), None);
        assert_eq!(row.get("c"), None);
        assert_eq!(row.columns().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn step_title_keeps_unknown_placeholders() {
        let outline = Scenario::outline("o", Vec::new());
        let step = Step::new(StepKeyword::When, "<a> meets <b> and <a>");
        let row = ExampleRow::new([("a", Some("x"))]);
        assert_eq!(outline.step_title(&step, &row), "When x meets <b> and x");
    }

    #[test]
    fn scenarios_accept_every_keyword() -> Result<(), DisallowedStep> {
        let mut scenario = Scenario::new("all");
        for keyword in StepKeyword::ALL {
            scenario.add_step(Step::new(keyword, "x"))?;
        }
        assert_eq!(scenario.steps().len(), 5);
        Ok(())
    }
}
