//! Tests for the JSON dump of parsed feature trees.

use cukeplan::{Config, Feature, parse_str};
use serde_json::Value;

fn dump(text: &str) -> Value {
    let feature = parse_str(text, &Config::default()).unwrap_or_else(|err| panic!("parse: {err}"));
    let json = feature.to_json().unwrap_or_else(|err| panic!("dump: {err}"));
    serde_json::from_str(&json).unwrap_or_else(|err| panic!("dump is not JSON: {err}"))
}

#[test]
fn dump_exposes_the_tree_shape() {
    let dump = dump(include_str!("features/basket.feature"));
    assert_eq!(dump.get("name").and_then(Value::as_str), Some("Shopping basket"));
    assert_eq!(dump.get("language").and_then(Value::as_str), Some("en"));
    let scenarios = dump
        .get("scenarios")
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("scenarios array present"));
    assert_eq!(scenarios.len(), 2);
    let outline = scenarios
        .iter()
        .find(|scenario| scenario.get("outline").is_some_and(|data| !data.is_null()))
        .unwrap_or_else(|| panic!("outline present"));
    assert_eq!(
        outline
            .pointer("/outline/examples")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(2),
    );
    assert_eq!(
        dump.pointer("/rules/0/background/steps/0/keyword")
            .and_then(Value::as_str),
        Some("Given"),
    );
}

#[test]
fn dump_round_trips_through_serde() {
    let text = include_str!("features/receipt.feature");
    let feature = parse_str(text, &Config::default()).unwrap_or_else(|err| panic!("parse: {err}"));
    let json = feature.to_json().unwrap_or_else(|err| panic!("dump: {err}"));
    let restored: Feature =
        serde_json::from_str(&json).unwrap_or_else(|err| panic!("restore: {err}"));
    assert_eq!(restored, feature);
}
