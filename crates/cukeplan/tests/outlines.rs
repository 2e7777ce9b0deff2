//! Behavioural tests for Scenario Outline expansion.
#![expect(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    reason = "tests inspect expansions directly"
)]

use cukeplan::{
    Config, OutlineError, StepContainer, Value, ValueMapping, expand, parse_str,
};
use rstest::rstest;

fn expansions_of(text: &str, outline: &str) -> Vec<cukeplan::Expansion> {
    let feature = parse_str(text, &Config::default()).unwrap();
    expand(feature.outline(outline).unwrap(), &ValueMapping::new()).unwrap()
}

#[test]
fn expands_one_step_set_per_row() {
    let expansions = expansions_of(
        "Feature: f\nScenario Outline: o\nGiven I use <x>\nExamples:\n| x |\n| a |\n| b |\n",
        "o",
    );
    let texts: Vec<_> = expansions
        .iter()
        .map(|expansion| expansion.steps[0].details().to_owned())
        .collect();
    assert_eq!(texts, ["I use a", "I use b"]);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(7)]
fn no_placeholder_survives_expansion(#[case] rows: usize) {
    let mut text = String::from(
        "Feature: f\nScenario Outline: o\nGiven <a> and <b>\nThen <a> equals <a>\nExamples:\n| a | b |\n",
    );
    for row in 0..rows {
        text.push_str(&format!("| v{row} | w{row} |\n"));
    }
    let expansions = expansions_of(&text, "o");
    assert_eq!(expansions.len(), rows);
    for (row, expansion) in expansions.iter().enumerate() {
        assert_eq!(expansion.row, row);
        for step in &expansion.steps {
            assert!(!step.details().contains('<'), "leftover placeholder in {}", step.details());
        }
        assert_eq!(
            expansion.steps[1].details(),
            format!("v{row} equals v{row}")
        );
    }
}

#[test]
fn substitutes_into_doc_strings() {
    let expansions = expansions_of(include_str!("features/receipt.feature"), "printing a receipt");
    assert_eq!(expansions.len(), 2);
    let doc = expansions[1].steps[0].doc_string().unwrap();
    assert_eq!(doc.content, "Dear Grace,\nyou spent 3.00.");
    assert_eq!(doc.media_type.as_deref(), Some("text/plain"));
    assert_eq!(expansions[1].steps[1].details(), "it is addressed to Grace");
}

#[test]
fn value_mapping_changes_variables_but_not_titles() {
    let feature = parse_str(
        "Feature: f\nScenario Outline: o\nGiven the tool is <state>\nExamples:\n| state |\n| useful |\n",
        &Config::default(),
    )
    .unwrap();
    let mapping = ValueMapping::new().with("useful", Value::Bool(true));
    let expansions = expand(feature.outline("o").unwrap(), &mapping).unwrap();
    assert_eq!(expansions[0].variables.get("state"), Some(&Value::Bool(true)));
    assert_eq!(expansions[0].steps[0].details(), "the tool is useful");
}

#[test]
fn expansion_inherits_outline_and_example_tags() {
    let feature = parse_str(include_str!("features/basket.feature"), &Config::default()).unwrap();
    let outline = feature.outline("adding several items").unwrap();
    let expansions = expand(outline, &ValueMapping::new()).unwrap();
    let tags: Vec<_> = expansions[0].tags.iter().map(String::as_str).collect();
    assert_eq!(tags, ["slow", "small"]);
}

#[test]
fn step_titles_use_raw_row_text() {
    let feature = parse_str(include_str!("features/basket.feature"), &Config::default()).unwrap();
    let outline = feature.outline("adding several items").unwrap();
    let titles: Vec<_> = outline
        .examples()
        .iter()
        .map(|row| outline.step_title(&outline.steps()[0], row))
        .collect();
    assert_eq!(titles, ["When I add 2 items", "When I add 5 items"]);
}

#[rstest]
#[case::missing_keyword(
    include_str!("features/broken_outline.feature"),
    "rows without a keyword",
    OutlineError::MissingExamplesKeyword { scenario: "rows without a keyword".into() }
)]
#[case::no_examples(
    "Feature: f\nScenario Outline: o\nGiven <x>\nExamples:\n",
    "o",
    OutlineError::NoExamples { scenario: "o".into() }
)]
#[case::undeclared(
    "Feature: f\nScenario Outline: o\nGiven <x> and <y>\nExamples:\n| x |\n| 1 |\n",
    "o",
    OutlineError::UndeclaredVariable { scenario: "o".into(), variable: "y".into() }
)]
#[case::unused_column(
    "Feature: f\nScenario Outline: o\nGiven <x>\nExamples:\n| x | z |\n| 1 | 2 |\n",
    "o",
    OutlineError::UnusedColumn { scenario: "o".into(), column: "z".into() }
)]
#[case::missing_value(
    "Feature: f\nScenario Outline: o\nGiven <x> <y>\nExamples:\n| x | y |\n| 1 | 2 |\n| 3 |\n",
    "o",
    OutlineError::MissingValue { scenario: "o".into(), row: 2, column: "y".into() }
)]
fn invalid_outlines_fail_before_expansion(
    #[case] text: &str,
    #[case] name: &str,
    #[case] expected: OutlineError,
) {
    let feature = parse_str(text, &Config::default()).unwrap();
    let err = expand(feature.outline(name).unwrap(), &ValueMapping::new()).unwrap_err();
    assert_eq!(err, expected);
}

#[test]
fn blank_line_after_examples_keyword_still_expands() {
    let expansions = expansions_of(
        "Feature: f\nScenario Outline: o\nGiven I use <x>\nExamples:\n\n| x |\n\n| a |\n| b |\n",
        "o",
    );
    assert_eq!(expansions.len(), 2);
    assert_eq!(expansions[1].steps[0].details(), "I use b");
}
