//! Behavioural tests for tag filtering and step resolution over loaded files.
#![expect(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    reason = "tests inspect plans directly"
)]

use camino::Utf8PathBuf;
use cukeplan::{
    BindingOrigin, Config, Feature, PredefinedSteps, Rule, Scenario, Step, StepContainer,
    StepDefinition, StepKeyword, StepResolver, StepScope, TagFilter, TagPolicy, TagSet, Value,
    load_feature, match_tags, parse_str, runnable_scenarios, scenario_steps,
};
use rstest::{fixture, rstest};

#[fixture]
fn basket() -> Feature {
    let path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/basket.feature");
    load_feature(&path, &Config::default()).unwrap()
}

fn tags(names: &[&str]) -> TagSet {
    names.iter().copied().collect()
}

#[rstest]
#[case::single_tag(vec![TagFilter::tag("a")], true)]
#[case::group_with_absent_tag(vec![TagFilter::all(["a", "c"])], false)]
#[case::group_fully_present(vec![TagFilter::all(["a", "b"])], true)]
#[case::any_item_suffices(vec![TagFilter::all(["a", "c"]), TagFilter::tag("b")], true)]
#[case::no_filters(vec![], false)]
fn filters_combine_and_within_or_across(#[case] filters: Vec<TagFilter>, #[case] expected: bool) {
    assert_eq!(match_tags(&tags(&["a", "b"]), &filters), expected);
    assert_eq!(match_tags(&tags(&["b", "a"]), &filters), expected);
}

#[rstest]
fn policy_selects_runnable_scenarios(basket: Feature) {
    let policy = TagPolicy::new(vec![], vec![TagFilter::tag("slow")]);
    let names: Vec<_> = runnable_scenarios(&basket, &policy)
        .map(|(_, scenario)| scenario.name())
        .collect();
    assert_eq!(names, ["adding a single item", "member checkout"]);

    let members_only = TagPolicy::new(vec![TagFilter::tag("members")], vec![]);
    let names: Vec<_> = runnable_scenarios(&basket, &members_only)
        .map(|(rule, scenario)| (rule.map(Rule::name), scenario.name()))
        .collect();
    assert_eq!(names, [(Some("members get a discount"), "member checkout")]);
}

#[rstest]
fn backgrounds_run_before_scenario_steps(basket: Feature) {
    let rule = basket.rule("members get a discount").unwrap();
    let scenario = rule.scenario("member checkout").unwrap();
    let details: Vec<_> = scenario_steps(&basket, Some(rule), scenario)
        .into_iter()
        .map(Step::details)
        .collect();
    assert_eq!(
        details,
        [
            "an empty basket",
            "I am signed in as a member",
            "I check out",
            "I pay 90 percent"
        ]
    );
}

#[rstest]
fn resolves_a_rule_scenario_against_every_pool(basket: Feature) {
    let config = Config::default();
    let rule = basket.rule("members get a discount").unwrap();
    let scenario = rule.scenario("member checkout").unwrap();
    let pools = PredefinedSteps::new()
        .with(StepScope::Global, StepKeyword::Given, "an empty basket", "empty")
        .with(StepScope::Global, StepKeyword::Given, "I am signed in as a {word}", "sign in")
        .with(StepScope::Feature, StepKeyword::When, "I check out", "checkout")
        .with(StepScope::Global, StepKeyword::Then, "I pay {int} percent", "full price")
        .with(StepScope::Rule, StepKeyword::Then, "I pay {int} percent", "member price");

    let plan = StepResolver::new(config.expressions())
        .resolve(scenario_steps(&basket, Some(rule), scenario), &[], &pools)
        .unwrap();
    let bindings = plan.require_complete().unwrap();
    let chosen: Vec<_> = bindings
        .iter()
        .map(|binding| *binding.definition.implementation())
        .collect();
    assert_eq!(chosen, ["empty", "sign in", "checkout", "member price"]);
    assert_eq!(bindings[1].values, vec![Value::from("member")]);
    assert_eq!(bindings[3].values, vec![Value::Int(90)]);
    assert_eq!(bindings[3].origin, BindingOrigin::Predefined(StepScope::Rule));
}

#[test]
fn rule_scope_wins_for_identical_steps() {
    let feature = parse_str(
        "Feature: f\nRule: r\nScenario: s\nGiven x\n",
        &Config::default(),
    )
    .unwrap();
    let scenario = feature.rule("r").unwrap().scenario("s").unwrap();
    let pools = PredefinedSteps::new()
        .with(StepScope::Global, StepKeyword::Given, "x", "global")
        .with(StepScope::Feature, StepKeyword::Given, "x", "feature")
        .with(StepScope::Rule, StepKeyword::Given, "x", "rule");
    let config = Config::default();
    let plan = StepResolver::new(config.expressions())
        .resolve(scenario.steps(), &[], &pools)
        .unwrap();
    assert_eq!(*plan.bindings()[0].definition.implementation(), "rule");
}

#[test]
fn inline_steps_keep_source_order() {
    let feature = parse_str(
        "Feature: f\nScenario: s\nGiven a\nWhen b\nThen c\n",
        &Config::default(),
    )
    .unwrap();
    let scenario: &Scenario = feature.scenario("s").unwrap();
    let inline = [
        StepDefinition::new(StepKeyword::Then, "c", 'c'),
        StepDefinition::new(StepKeyword::Given, "a", 'a'),
    ];
    let pools = PredefinedSteps::new().with(StepScope::Global, StepKeyword::When, "b", 'b');
    let config = Config::default();
    let plan = StepResolver::new(config.expressions())
        .resolve(scenario.steps(), &inline, &pools)
        .unwrap();
    let order: Vec<_> = plan
        .bindings()
        .iter()
        .map(|binding| (*binding.definition.implementation(), binding.origin))
        .collect();
    assert_eq!(
        order,
        [
            ('a', BindingOrigin::Inline),
            ('b', BindingOrigin::Predefined(StepScope::Global)),
            ('c', BindingOrigin::Inline)
        ]
    );
}
