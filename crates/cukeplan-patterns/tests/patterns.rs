#![expect(clippy::expect_used, reason = "test asserts conversion path")]

use chrono::NaiveDate;
use regex::Regex;

use cukeplan_patterns::{
    ExpressionError, ExpressionRegistry, SpecificityScore, Value, build_regex_from_pattern,
    extract_named_captures,
};

fn shout(raw: &str) -> Value {
    Value::from(raw.to_uppercase())
}

#[test]
fn builds_regex_and_extracts_values() {
    let regex_src = build_regex_from_pattern("I have {int} cukes");
    let regex = Regex::new(&regex_src).expect("regex should compile");
    let captures = extract_named_captures(&regex, &["int0".to_owned()], "I have 12 cukes")
        .expect("expected captures for test step");
    assert_eq!(captures, vec!["12".to_string()]);
}

#[test]
fn matches_quoted_string_and_number() {
    let registry = ExpressionRegistry::new();
    let values = registry
        .match_text("I love {string} {number}", r#"I love "Vue" 3"#)
        .expect("text should match");
    assert_eq!(values, vec![Value::from("Vue"), Value::Number(3.0)]);
}

#[test]
fn converts_dates_to_midnight_timestamps() {
    let registry = ExpressionRegistry::new();
    let values = registry
        .match_text("released on {date}", "released on 03/01/2024")
        .expect("date should match");
    let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date");
    assert_eq!(values, vec![Value::Date(expected)]);
}

#[test]
fn custom_placeholders_transform_captures() {
    let mut registry = ExpressionRegistry::new();
    registry
        .register("colour", "red|green", shout)
        .expect("fresh placeholder registers");
    let values = registry
        .match_text("{colour} is {int}", "green is 4")
        .expect("text should match");
    assert_eq!(values, vec![Value::from("GREEN"), Value::Int(4)]);
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = ExpressionRegistry::new();
    registry
        .register("colour", "red|green", shout)
        .expect("fresh placeholder registers");
    let err = registry
        .register("colour", "blue", shout)
        .expect_err("second registration fails");
    assert!(matches!(err, ExpressionError::DuplicatePlaceholder { ref name } if name == "colour"));
}

#[test]
fn registries_are_independent() {
    let mut first = ExpressionRegistry::new();
    first
        .register("colour", "red|green", shout)
        .expect("fresh placeholder registers");
    let second = ExpressionRegistry::new();
    assert!(first.contains_placeholder("paint {colour}"));
    assert!(!second.contains_placeholder("paint {colour}"));
}

#[test]
fn literal_patterns_rank_above_placeholders() {
    let registry = ExpressionRegistry::new();
    let literal = registry.compile("I have 3 apples").expect("compiles");
    let generic = registry.compile("I have {int} apples").expect("compiles");
    assert!(literal.specificity() > generic.specificity());
    assert_eq!(
        generic.specificity(),
        SpecificityScore::calculate("I have {int} apples")
    );
}

#[test]
fn literal_patterns_match_only_their_own_text() {
    let registry = ExpressionRegistry::new();
    for pattern in [r"save to C:\temp", "render {{x}}"] {
        assert!(!registry.contains_placeholder(pattern));
        assert_eq!(
            registry.match_text(pattern, pattern).expect("identical text matches"),
            Vec::<Value>::new()
        );
    }
    assert!(matches!(
        registry.match_text("render {{x}}", "render {x}"),
        Err(ExpressionError::Mismatch { .. })
    ));
}
