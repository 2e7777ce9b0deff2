//! Features and rules with name-based lookups.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::tags::{TagPolicy, TagSet};

use super::{Background, Scenario};

fn find_scenario<'a>(
    scenarios: &'a [Scenario],
    name: &str,
) -> Result<&'a Scenario, LookupError> {
    let found = scenarios
        .iter()
        .find(|scenario| scenario.name() == name)
        .ok_or_else(|| LookupError::ScenarioNotFound { name: name.into() })?;
    if found.is_outline() {
        return Err(LookupError::ScenarioIsOutline { name: name.into() });
    }
    Ok(found)
}

fn find_outline<'a>(
    scenarios: &'a [Scenario],
    name: &str,
) -> Result<&'a Scenario, LookupError> {
    let found = scenarios
        .iter()
        .find(|scenario| scenario.name() == name)
        .ok_or_else(|| LookupError::OutlineNotFound { name: name.into() })?;
    if !found.is_outline() {
        return Err(LookupError::OutlineIsScenario { name: name.into() });
    }
    Ok(found)
}

fn find_any_mut<'a>(
    scenarios: &'a mut [Scenario],
    name: &str,
) -> Result<&'a mut Scenario, LookupError> {
    scenarios
        .iter_mut()
        .find(|scenario| scenario.name() == name)
        .ok_or_else(|| LookupError::ScenarioNotFound { name: name.into() })
}

fn first_uncalled<'a>(
    scenarios: &'a [Scenario],
    inherited: &TagSet,
    policy: &TagPolicy,
) -> Option<&'a Scenario> {
    scenarios.iter().find(|scenario| {
        !scenario.is_called() && policy.should_run(&scenario.tags().merged(inherited))
    })
}

/// A named grouping of scenarios inside a Feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub(crate) name: String,
    pub(crate) keyword: String,
    pub(crate) description: Vec<String>,
    pub(crate) tags: TagSet,
    pub(crate) background: Option<Background>,
    pub(crate) scenarios: Vec<Scenario>,
    pub(crate) line: usize,
    pub(crate) called: bool,
}

impl Rule {
    /// Create an empty rule.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyword: "Rule".to_owned(),
            ..Self::default()
        }
    }

    /// Add a scenario.
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Rule name.
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

    /// Tags written on the rule itself.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Scenarios and outlines in source order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// 1-based source line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The rule's background.
    ///
    /// # Errors
    /// Returns [`LookupError::BackgroundNotFound`] when the rule has none.
    pub fn background(&self) -> Result<&Background, LookupError> {
        self.background
            .as_ref()
            .ok_or_else(|| LookupError::BackgroundNotFound {
                scope: "Rule",
                name: self.name.clone(),
            })
    }

    /// First concrete scenario named `name`.
    ///
    /// # Errors
    /// Returns [`LookupError::ScenarioNotFound`] or, when the first match is
    /// an outline, [`LookupError::ScenarioIsOutline`].
    pub fn scenario(&self, name: &str) -> Result<&Scenario, LookupError> {
        find_scenario(&self.scenarios, name)
    }

    /// First outline named `name`.
    ///
    /// # Errors
    /// Returns [`LookupError::OutlineNotFound`] or, when the first match is a
    /// concrete scenario, [`LookupError::OutlineIsScenario`].
    pub fn outline(&self, name: &str) -> Result<&Scenario, LookupError> {
        find_outline(&self.scenarios, name)
    }

    /// Mutable access to the first scenario or outline named `name`.
    ///
    /// # Errors
    /// Returns [`LookupError::ScenarioNotFound`] when none exists.
    pub fn scenario_mut(&mut self, name: &str) -> Result<&mut Scenario, LookupError> {
        find_any_mut(&mut self.scenarios, name)
    }

    /// First scenario not yet executed whose effective tags pass `policy`.
    ///
    /// `inherited` holds the tags of the enclosing Feature.
    #[must_use]
    pub fn first_uncalled_scenario(
        &self,
        inherited: &TagSet,
        policy: &TagPolicy,
    ) -> Option<&Scenario> {
        first_uncalled(&self.scenarios, &self.tags.merged(inherited), policy)
    }

    /// Scenarios not yet executed.
    pub fn uncalled_scenarios(&self) -> impl Iterator<Item = &Scenario> + '_ {
        self.scenarios.iter().filter(|scenario| !scenario.is_called())
    }

    /// Whether the runner marked the rule as executed.
    #[must_use]
    pub fn is_called(&self) -> bool {
        self.called
    }

    /// Mark the rule as executed. Marking twice is harmless.
    pub fn mark_called(&mut self) {
        self.called = true;
    }
}

/// The top-level document unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub(crate) name: String,
    pub(crate) keyword: String,
    pub(crate) language: String,
    pub(crate) description: Vec<String>,
    pub(crate) tags: TagSet,
    pub(crate) background: Option<Background>,
    pub(crate) scenarios: Vec<Scenario>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) line: usize,
}

impl Feature {
    /// Create an empty English feature.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyword: "Feature".to_owned(),
            language: "en".to_owned(),
            ..Self::default()
        }
    }

    /// Add a scenario.
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Add a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Feature name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Localised keyword as written.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Language of the keyword table used to parse the feature.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Free-text description lines.
    #[must_use]
    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// Feature tags.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Scenarios declared outside any rule, in source order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Rules in source order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// 1-based source line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The feature's background.
    ///
    /// # Errors
    /// Returns [`LookupError::BackgroundNotFound`] when the feature has none.
    pub fn background(&self) -> Result<&Background, LookupError> {
        self.background
            .as_ref()
            .ok_or_else(|| LookupError::BackgroundNotFound {
                scope: "Feature",
                name: self.name.clone(),
            })
    }

    /// First concrete scenario named `name` outside any rule.
    ///
    /// # Errors
    /// Returns [`LookupError::ScenarioNotFound`] or, when the first match is
    /// an outline, [`LookupError::ScenarioIsOutline`].
    pub fn scenario(&self, name: &str) -> Result<&Scenario, LookupError> {
        find_scenario(&self.scenarios, name)
    }

    /// First outline named `name` outside any rule.
    ///
    /// # Errors
    /// Returns [`LookupError::OutlineNotFound`] or, when the first match is a
    /// concrete scenario, [`LookupError::OutlineIsScenario`].
    pub fn outline(&self, name: &str) -> Result<&Scenario, LookupError> {
        find_outline(&self.scenarios, name)
    }

    /// Mutable access to the first scenario or outline named `name` outside
    /// any rule.
    ///
    /// # Errors
    /// Returns [`LookupError::ScenarioNotFound`] when none exists.
    pub fn scenario_mut(&mut self, name: &str) -> Result<&mut Scenario, LookupError> {
        find_any_mut(&mut self.scenarios, name)
    }

    /// First rule named `name`.
    ///
    /// # Errors
    /// Returns [`LookupError::RuleNotFound`] when none exists.
    pub fn rule(&self, name: &str) -> Result<&Rule, LookupError> {
        self.rules
            .iter()
            .find(|rule| rule.name() == name)
            .ok_or_else(|| LookupError::RuleNotFound { name: name.into() })
    }

    /// Mutable access to the first rule named `name`.
    ///
    /// # Errors
    /// Returns [`LookupError::RuleNotFound`] when none exists.
    pub fn rule_mut(&mut self, name: &str) -> Result<&mut Rule, LookupError> {
        self.rules
            .iter_mut()
            .find(|rule| rule.name() == name)
            .ok_or_else(|| LookupError::RuleNotFound { name: name.into() })
    }

    /// First scenario outside any rule that has not been executed and whose
    /// tags, merged with the feature tags, pass `policy`.
    #[must_use]
    pub fn first_uncalled_scenario(&self, policy: &TagPolicy) -> Option<&Scenario> {
        first_uncalled(&self.scenarios, &self.tags, policy)
    }

    /// First rule that has not been executed and whose tags, merged with the
    /// feature tags, pass `policy`.
    #[must_use]
    pub fn first_uncalled_rule(&self, policy: &TagPolicy) -> Option<&Rule> {
        self.rules.iter().find(|rule| {
            !rule.is_called() && policy.should_run(&rule.tags().merged(&self.tags))
        })
    }

    /// Scenarios outside any rule that have not been executed.
    pub fn uncalled_scenarios(&self) -> impl Iterator<Item = &Scenario> + '_ {
        self.scenarios.iter().filter(|scenario| !scenario.is_called())
    }

    /// Rules that have not been executed.
    pub fn uncalled_rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(|rule| !rule.is_called())
    }

    /// Every scenario in the feature, including those inside rules, paired
    /// with its enclosing rule.
    pub fn all_scenarios(&self) -> impl Iterator<Item = (Option<&Rule>, &Scenario)> + '_ {
        self.scenarios
            .iter()
            .map(|scenario| (None, scenario))
            .chain(self.rules.iter().flat_map(|rule| {
                rule.scenarios
                    .iter()
                    .map(move |scenario| (Some(rule), scenario))
            }))
    }

    /// Serialise the feature tree as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns the serialiser error, which cannot occur for trees produced by
    /// the parser.
    #[cfg(feature = "diagnostics")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise lookup helpers")]
mod tests {
    use super::*;
    use crate::tags::TagFilter;
    use rstest::{fixture, rstest};

    #[fixture]
    fn feature() -> Feature {
        Feature::new("lookups")
            .with_scenario(Scenario::new("plain").with_tags(["fast"]))
            .with_scenario(Scenario::outline("templated", Vec::new()))
            .with_scenario(Scenario::new("slow one").with_tags(["slow"]))
            .with_rule(Rule::new("first rule").with_scenario(Scenario::new("inner")))
    }

    #[rstest]
    fn finds_scenarios_and_outlines(feature: Feature) {
        assert_eq!(feature.scenario("plain").unwrap().name(), "plain");
        assert_eq!(feature.outline("templated").unwrap().name(), "templated");
        assert_eq!(
            feature.scenario("templated"),
            Err(LookupError::ScenarioIsOutline {
                name: "templated".into()
            })
        );
        assert_eq!(
            feature.outline("plain"),
            Err(LookupError::OutlineIsScenario {
                name: "plain".into()
            })
        );
        assert_eq!(
            feature.scenario("missing"),
            Err(LookupError::ScenarioNotFound {
                name: "missing".into()
            })
        );
    }

    #[rstest]
    fn finds_rules_and_reports_missing_background(feature: Feature) {
        let rule = feature.rule("first rule").unwrap();
        assert_eq!(rule.scenario("inner").unwrap().name(), "inner");
        assert!(matches!(
            feature.rule("nope"),
            Err(LookupError::RuleNotFound { .. })
        ));
        assert!(matches!(
            feature.background(),
            Err(LookupError::BackgroundNotFound { scope: "Feature", .. })
        ));
    }

    #[rstest]
    fn first_uncalled_respects_policy_and_called_flag(mut feature: Feature) {
        let skip_slow = TagPolicy::new(Vec::new(), vec![TagFilter::tag("slow")]);
        assert_eq!(
            feature.first_uncalled_scenario(&skip_slow).map(Scenario::name),
            Some("plain")
        );

        feature.scenario_mut("plain").unwrap().mark_called();
        feature.scenario_mut("templated").unwrap().mark_called();
        assert_eq!(feature.first_uncalled_scenario(&skip_slow), None);
        assert_eq!(
            feature
                .first_uncalled_scenario(&TagPolicy::default())
                .map(Scenario::name),
            Some("slow one")
        );
        assert_eq!(feature.uncalled_scenarios().count(), 1);
    }

    #[rstest]
    fn policies_see_inherited_feature_tags(mut feature: Feature) {
        feature.tags.insert("web");
        let only_web = TagPolicy::new(vec![TagFilter::tag("web")], Vec::new());
        assert_eq!(
            feature.first_uncalled_rule(&only_web).map(Rule::name),
            Some("first rule")
        );
        feature.rule_mut("first rule").unwrap().mark_called();
        assert!(feature.first_uncalled_rule(&only_web).is_none());
        assert_eq!(feature.uncalled_rules().count(), 0);
    }

    #[rstest]
    fn all_scenarios_walks_rules(feature: Feature) {
        let names: Vec<_> = feature
            .all_scenarios()
            .map(|(rule, scenario)| (rule.map(Rule::name), scenario.name()))
            .collect();
        assert_eq!(
            names,
            [
                (None, "plain"),
                (None, "templated"),
                (None, "slow one"),
                (Some("first rule"), "inner"),
            ]
        );
    }
}
