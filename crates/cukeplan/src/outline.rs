//! Scenario Outline expansion.
//!
//! An outline is validated as a whole before any row is expanded, so a
//! failure never yields a partial set of expansions. Each example row then
//! produces one [`Expansion`]: the outline's steps with every `<column>`
//! replaced by the row's raw cell text, plus the typed variables handed to
//! step implementations.

use std::sync::LazyLock;

use cukeplan_patterns::Value;
use derive_more::{Deref, IntoIterator};
use hashbrown::HashMap;
use regex::{Captures, Regex};

use crate::error::OutlineError;
use crate::model::{ExampleRow, Scenario, Step, StepContainer};
use crate::tags::TagSet;

/// `<placeholder>` tokens, capturing the name without the angle brackets.
///
/// Names may contain spaces and punctuation but must not start with
/// whitespace.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^>\s][^>]*)>").unwrap_or_else(|_| unreachable!("placeholder regex is valid"))
});

/// Replace every `<name>` in `text` for which `lookup` yields a value;
/// other tokens are kept verbatim.
pub(crate) fn substitute<'v>(text: &str, lookup: impl Fn(&str) -> Option<&'v str>) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            caps.get(1)
                .and_then(|name| lookup(name.as_str()))
                .unwrap_or(whole)
                .to_owned()
        })
        .into_owned()
}

/// Placeholder names in `text`, in order of appearance.
pub(crate) fn placeholder_names(text: &str) -> impl Iterator<Item = &str> + '_ {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str())
}

/// Redirects raw example cells to typed values.
///
/// Only the [`Expansion::variables`] view is affected; step text always uses
/// the raw cell.
///
/// # Examples
/// ```
/// use cukeplan::ValueMapping;
/// use cukeplan_patterns::Value;
///
/// let mapping = ValueMapping::new().with("useful", Value::Bool(true));
/// assert_eq!(mapping.resolve("useful"), Value::Bool(true));
/// assert_eq!(mapping.resolve("other"), Value::from("other"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMapping {
    entries: HashMap<String, Value>,
}

impl ValueMapping {
    /// Create an empty mapping; every cell stays a string.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `raw` to `value`.
    #[must_use]
    pub fn with(mut self, raw: impl Into<String>, value: Value) -> Self {
        self.insert(raw, value);
        self
    }

    /// Map `raw` to `value`, replacing any previous mapping.
    pub fn insert(&mut self, raw: impl Into<String>, value: Value) {
        self.entries.insert(raw.into(), value);
    }

    /// Typed value for a raw cell.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Value {
        self.entries
            .get(raw)
            .cloned()
            .unwrap_or_else(|| Value::from(raw))
    }
}

/// Column values of one example row, in column order.
#[derive(Debug, Clone, Default, PartialEq, Deref, IntoIterator)]
pub struct Variables(#[into_iterator(owned, ref)] Vec<(String, Value)>);

impl Variables {
    /// Value bound to `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

/// One concrete instance of an outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// Typed column values after [`ValueMapping`] redirection.
    pub variables: Variables,
    /// Outline steps with placeholders replaced by raw cell text.
    pub steps: Vec<Step>,
    /// Outline tags followed by the tags of the row's Examples block.
    pub tags: TagSet,
    /// 0-based index of the example row.
    pub row: usize,
}

fn columns(examples: &[ExampleRow]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for column in examples.iter().flat_map(ExampleRow::columns) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns
}

fn validate(outline: &Scenario) -> Result<(), OutlineError> {
    let scenario = || outline.name().to_owned();
    let data = outline
        .outline_data()
        .ok_or_else(|| OutlineError::NotAnOutline {
            scenario: scenario(),
        })?;
    if data.missing_examples_keyword() {
        return Err(OutlineError::MissingExamplesKeyword {
            scenario: scenario(),
        });
    }
    if data.examples().is_empty() {
        return Err(OutlineError::NoExamples {
            scenario: scenario(),
        });
    }

    let declared = columns(data.examples());
    let mut used: Vec<&str> = Vec::new();
    for name in outline.steps().iter().flat_map(Step::texts).flat_map(placeholder_names) {
        if !declared.contains(&name) {
            return Err(OutlineError::UndeclaredVariable {
                scenario: scenario(),
                variable: name.to_owned(),
            });
        }
        used.push(name);
    }
    if let Some(column) = declared.iter().find(|column| !used.contains(column)) {
        return Err(OutlineError::UnusedColumn {
            scenario: scenario(),
            column: (*column).to_owned(),
        });
    }

    for (index, row) in data.examples().iter().enumerate() {
        if let Some(column) = declared.iter().find(|column| row.get(column).is_none()) {
            return Err(OutlineError::MissingValue {
                scenario: scenario(),
                row: index + 1,
                column: (*column).to_owned(),
            });
        }
    }
    Ok(())
}

/// Expand a Scenario Outline into one [`Expansion`] per example row.
///
/// # Errors
/// Returns an [`OutlineError`] when the scenario is not an outline, has no
/// examples, was written without an `Examples:` keyword, uses a `<name>` no
/// column declares, declares a column no step uses, or has a row missing a
/// value.
///
/// # Examples
/// ```
/// use cukeplan::{expand, parse_str, Config, ValueMapping};
///
/// let feature = parse_str(
///     "Feature: f\n\
///      Scenario Outline: o\n\
///        Given I use <x>\n\
///      Examples:\n\
///        | x |\n\
///        | a |\n\
///        | b |\n",
///     &Config::default(),
/// )?;
/// let expansions = expand(feature.outline("o")?, &ValueMapping::new())?;
/// let texts: Vec<_> = expansions
///     .iter()
///     .flat_map(|expansion| expansion.steps.iter().map(|step| step.details()))
///     .collect();
/// assert_eq!(texts, ["I use a", "I use b"]);
/// # Ok::<(), cukeplan::Error>(())
/// ```
pub fn expand(outline: &Scenario, mapping: &ValueMapping) -> Result<Vec<Expansion>, OutlineError> {
    validate(outline)?;
    let expansions: Vec<Expansion> = outline
        .examples()
        .iter()
        .enumerate()
        .map(|(index, row)| expand_row(outline, row, index, mapping))
        .collect();
    log::debug!(
        "expanded outline {:?} into {} scenarios",
        outline.name(),
        expansions.len()
    );
    Ok(expansions)
}

fn expand_row(outline: &Scenario, row: &ExampleRow, index: usize, mapping: &ValueMapping) -> Expansion {
    let steps = outline
        .steps()
        .iter()
        .map(|step| step.rewritten(|text| substitute(text, |name| row.get(name))))
        .collect();
    let variables = Variables(
        row.iter()
            .filter_map(|(column, raw)| raw.map(|raw| (column.to_owned(), mapping.resolve(raw))))
            .collect(),
    );
    Expansion {
        variables,
        steps,
        tags: row.tags().merged(outline.tags()),
        row: index,
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    reason = "tests inspect known expansion shapes"
)]
mod tests {
    use super::*;
    use crate::keywords::StepKeyword;
    use crate::model::DocString;
    use rstest::rstest;

    fn outline(steps: &[&str], rows: Vec<ExampleRow>) -> Scenario {
        let mut scenario = Scenario::outline("outline", rows);
        for details in steps {
            scenario.add_step(Step::new(StepKeyword::Given, *details)).unwrap();
        }
        scenario
    }

    fn row(cells: &[(&str, &str)]) -> ExampleRow {
        ExampleRow::new(cells.iter().map(|(key, value)| (*key, Some(*value))))
    }

    #[test]
    fn substitutes_every_occurrence() {
        let text = substitute("<a> and <a> and <b>", |name| (name == "a").then_some("1"));
        assert_eq!(text, "1 and 1 and <b>");
    }

    #[rstest]
    #[case("I have <count> items", vec!["count"])]
    #[case("<a> vs <b> vs <a>", vec!["a", "b", "a"])]
    #[case("no placeholders", vec![])]
    #[case("< spaced > is not one", vec![])]
    #[case("<with space>", vec!["with space"])]
    fn finds_placeholder_names(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(placeholder_names(text).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn expands_one_step_set_per_row() {
        let scenario = outline(&["I use <x>"], vec![row(&[("x", "a")]), row(&[("x", "b")])]);
        let expansions = expand(&scenario, &ValueMapping::new()).unwrap();
        let texts: Vec<_> = expansions
            .iter()
            .map(|expansion| expansion.steps[0].details().to_owned())
            .collect();
        assert_eq!(texts, ["I use a", "I use b"]);
        assert!(expansions.iter().all(|expansion| expansion
            .steps
            .iter()
            .all(|step| placeholder_names(step.details()).next().is_none())));
    }

    #[test]
    fn substitutes_doc_strings_and_tables() {
        let mut scenario = Scenario::outline("outline", vec![row(&[("who", "Ann"), ("n", "2")])]);
        scenario
            .add_step(
                Step::new(StepKeyword::Given, "a greeting")
                    .with_doc_string(DocString {
                        content: "Hello <who>".into(),
                        media_type: None,
                    })
                    .with_data_table(vec![vec!["count".to_owned()], vec!["<n>".to_owned()]]),
            )
            .unwrap();
        let expansion = expand(&scenario, &ValueMapping::new()).unwrap().remove(0);
        let step = &expansion.steps[0];
        assert_eq!(step.doc_string().unwrap().content, "Hello Ann");
        assert_eq!(step.data_table().unwrap()[1], vec!["2".to_owned()]);
    }

    #[test]
    fn value_mapping_changes_variables_not_titles() {
        let scenario = outline(&["the tool is <state>"], vec![row(&[("state", "useful")])]);
        let mapping = ValueMapping::new().with("useful", Value::Bool(true));
        let expansion = expand(&scenario, &mapping).unwrap().remove(0);
        assert_eq!(expansion.variables.get("state"), Some(&Value::Bool(true)));
        assert_eq!(expansion.steps[0].details(), "the tool is useful");
    }

    #[test]
    fn rejects_plain_scenarios() {
        let err = expand(&Scenario::new("plain"), &ValueMapping::new()).unwrap_err();
        assert!(matches!(err, OutlineError::NotAnOutline { .. }));
    }

    #[test]
    fn rejects_outline_without_examples() {
        let err = expand(&outline(&["x <a>"], Vec::new()), &ValueMapping::new()).unwrap_err();
        assert!(matches!(err, OutlineError::NoExamples { .. }));
    }

    #[test]
    fn rejects_missing_examples_keyword() {
        let mut scenario = outline(&["x <a>"], vec![row(&[("a", "1")])]);
        scenario.ensure_outline().missing_examples_keyword = true;
        let err = expand(&scenario, &ValueMapping::new()).unwrap_err();
        assert!(matches!(err, OutlineError::MissingExamplesKeyword { .. }));
    }

    #[test]
    fn rejects_undeclared_variables() {
        let scenario = outline(&["x <a> <b>"], vec![row(&[("a", "1")])]);
        let err = expand(&scenario, &ValueMapping::new()).unwrap_err();
        assert_eq!(
            err,
            OutlineError::UndeclaredVariable {
                scenario: "outline".into(),
                variable: "b".into(),
            }
        );
    }

    #[test]
    fn rejects_unused_columns() {
        let scenario = outline(&["x <a>"], vec![row(&[("a", "1"), ("b", "2")])]);
        let err = expand(&scenario, &ValueMapping::new()).unwrap_err();
        assert_eq!(
            err,
            OutlineError::UnusedColumn {
                scenario: "outline".into(),
                column: "b".into(),
            }
        );
    }

    #[test]
    fn rejects_rows_missing_values() {
        let scenario = outline(
            &["x <a> <b>"],
            vec![
                row(&[("a", "1"), ("b", "2")]),
                ExampleRow::new([("a", Some("3")), ("b", None)]),
            ],
        );
        let err = expand(&scenario, &ValueMapping::new()).unwrap_err();
        assert_eq!(
            err,
            OutlineError::MissingValue {
                scenario: "outline".into(),
                row: 2,
                column: "b".into(),
            }
        );
    }

    #[test]
    fn merges_outline_and_row_tags() {
        let mut examples = row(&[("a", "1")]);
        examples.tags.insert("slow");
        let scenario = outline(&["x <a>"], vec![examples]).with_tags(["web"]);
        let expansion = expand(&scenario, &ValueMapping::new()).unwrap().remove(0);
        assert_eq!(expansion.tags.iter().collect::<Vec<_>>(), ["web", "slow"]);
        assert_eq!(expansion.row, 0);
    }
}
