//! Binding concrete steps to implementations.
//!
//! Inline definitions written alongside a scenario are bound first, exact
//! text before expressions. Every step still uncovered is then bound from the
//! predefined pools, where a rule-scoped definition overrides a
//! feature-scoped one, which overrides a global one. The resulting plan
//! always lists bindings in source order.

use std::sync::Arc;

use cukeplan_patterns::{CompiledPattern, ExpressionRegistry, SpecificityScore, Value};
use hashbrown::HashSet;

use crate::error::ResolveError;
use crate::keywords::StepKeyword;
use crate::model::{Feature, Rule, Scenario, Step, StepContainer};
use crate::tags::TagPolicy;

/// Where a predefined step was declared. Later variants take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepScope {
    /// Available to every feature.
    Global,
    /// Available to every scenario of one feature.
    Feature,
    /// Available to every scenario of one rule.
    Rule,
}

/// A step pattern paired with the caller's implementation handle.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition<T> {
    keyword: StepKeyword,
    pattern: String,
    implementation: T,
}

impl<T> StepDefinition<T> {
    /// Pair `keyword` and `pattern` with `implementation`.
    pub fn new(keyword: StepKeyword, pattern: impl Into<String>, implementation: T) -> Self {
        Self {
            keyword,
            pattern: pattern.into(),
            implementation,
        }
    }

    /// Keyword the definition answers to.
    #[must_use]
    pub fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// Literal text or placeholder expression.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Implementation handle.
    #[must_use]
    pub fn implementation(&self) -> &T {
        &self.implementation
    }

    fn answers(&self, step: &Step, resolved: StepKeyword) -> bool {
        self.keyword == step.keyword() || self.keyword == resolved
    }
}

/// Step definitions declared at global, feature and rule scope.
#[derive(Debug, Clone)]
pub struct PredefinedSteps<T> {
    global: Vec<StepDefinition<T>>,
    feature: Vec<StepDefinition<T>>,
    rule: Vec<StepDefinition<T>>,
}

impl<T> Default for PredefinedSteps<T> {
    fn default() -> Self {
        Self {
            global: Vec::new(),
            feature: Vec::new(),
            rule: Vec::new(),
        }
    }
}

impl<T> PredefinedSteps<T> {
    /// Create empty pools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a step at `scope`.
    pub fn add(&mut self, scope: StepScope, definition: StepDefinition<T>) {
        self.pool_mut(scope).push(definition);
    }

    /// Declare a step at `scope`, builder style.
    #[must_use]
    pub fn with(
        mut self,
        scope: StepScope,
        keyword: StepKeyword,
        pattern: impl Into<String>,
        implementation: T,
    ) -> Self {
        self.add(scope, StepDefinition::new(keyword, pattern, implementation));
        self
    }

    /// Definitions declared at `scope`, in declaration order.
    #[must_use]
    pub fn scope(&self, scope: StepScope) -> &[StepDefinition<T>] {
        match scope {
            StepScope::Global => &self.global,
            StepScope::Feature => &self.feature,
            StepScope::Rule => &self.rule,
        }
    }

    /// Drop every definition declared at `scope`, e.g. the rule pool when
    /// moving on to the next rule.
    pub fn clear_scope(&mut self, scope: StepScope) {
        self.pool_mut(scope).clear();
    }

    fn pool_mut(&mut self, scope: StepScope) -> &mut Vec<StepDefinition<T>> {
        match scope {
            StepScope::Global => &mut self.global,
            StepScope::Feature => &mut self.feature,
            StepScope::Rule => &mut self.rule,
        }
    }

    /// Every definition once per `(keyword, pattern)`, keeping the most
    /// specific scope. Ordered by scope, most specific first, then by
    /// declaration.
    #[must_use]
    pub fn effective(&self) -> Vec<(StepScope, &StepDefinition<T>)> {
        let mut seen: HashSet<(StepKeyword, &str)> = HashSet::new();
        let mut pool = Vec::new();
        for scope in [StepScope::Rule, StepScope::Feature, StepScope::Global] {
            for definition in self.scope(scope) {
                if seen.insert((definition.keyword, definition.pattern.as_str())) {
                    pool.push((scope, definition));
                } else {
                    log::debug!(
                        "{scope:?} step `{} {}` is overridden",
                        definition.keyword,
                        definition.pattern
                    );
                }
            }
        }
        pool
    }
}

/// How a step came to be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOrigin {
    /// An inline definition of the scenario.
    Inline,
    /// A predefined step from the given scope.
    Predefined(StepScope),
}

/// One step paired with the implementation that runs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<'a, T> {
    /// Position of the step in the resolved sequence.
    pub index: usize,
    /// The concrete step.
    pub step: &'a Step,
    /// The definition bound to it.
    pub definition: &'a StepDefinition<T>,
    /// Where the definition came from.
    pub origin: BindingOrigin,
    /// Values captured from the step text.
    pub values: Vec<Value>,
}

/// Bindings in source order plus the steps nothing covers.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan<'a, T> {
    bindings: Vec<Binding<'a, T>>,
    unresolved: Vec<&'a Step>,
}

impl<'a, T> ExecutionPlan<'a, T> {
    /// Bound steps in source order.
    #[must_use]
    pub fn bindings(&self) -> &[Binding<'a, T>] {
        &self.bindings
    }

    /// Steps without an implementation, in source order.
    #[must_use]
    pub fn unresolved(&self) -> &[&'a Step] {
        &self.unresolved
    }

    /// Whether every step is bound.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Return the bindings, failing when any step is unbound.
    ///
    /// # Errors
    /// Returns [`ResolveError::Unresolved`] listing the titles of the
    /// unbound steps.
    pub fn require_complete(self) -> Result<Vec<Binding<'a, T>>, ResolveError> {
        if self.unresolved.is_empty() {
            return Ok(self.bindings);
        }
        Err(ResolveError::Unresolved {
            steps: self.unresolved.iter().map(|step| step.title()).collect(),
        })
    }
}

struct Slot<'a> {
    step: &'a Step,
    resolved: StepKeyword,
}

/// Binds steps against inline and predefined definitions.
#[derive(Debug, Clone, Copy)]
pub struct StepResolver<'r> {
    registry: &'r ExpressionRegistry,
}

impl<'r> StepResolver<'r> {
    /// Resolve using the placeholders known to `registry`.
    #[must_use]
    pub fn new(registry: &'r ExpressionRegistry) -> Self {
        Self { registry }
    }

    /// Bind every step in `steps`.
    ///
    /// `And`/`But` steps answer to definitions written for their own keyword
    /// or for the keyword of the preceding primary step.
    ///
    /// # Errors
    /// - [`ResolveError::UnknownInlineStep`] when an inline definition matches
    ///   no unbound step.
    /// - [`ResolveError::Expression`] when a definition pattern does not
    ///   compile.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::{
    ///     parse_str, Config, PredefinedSteps, StepContainer, StepKeyword, StepResolver, StepScope,
    /// };
    ///
    /// let config = Config::default();
    /// let feature = parse_str("Feature: f\nScenario: s\nGiven x\nThen I have 3 items", &config)?;
    /// let pools = PredefinedSteps::new()
    ///     .with(StepScope::Global, StepKeyword::Given, "x", "global")
    ///     .with(StepScope::Feature, StepKeyword::Given, "x", "feature")
    ///     .with(StepScope::Global, StepKeyword::Then, "I have {int} items", "count");
    /// let plan = StepResolver::new(config.expressions())
    ///     .resolve(feature.scenario("s")?.steps(), &[], &pools)?;
    /// let chosen: Vec<_> = plan
    ///     .bindings()
    ///     .iter()
    ///     .map(|binding| *binding.definition.implementation())
    ///     .collect();
    /// assert_eq!(chosen, ["feature", "count"]);
    /// # Ok::<(), cukeplan::Error>(())
    /// ```
    pub fn resolve<'a, T, I>(
        &self,
        steps: I,
        inline: &'a [StepDefinition<T>],
        predefined: &'a PredefinedSteps<T>,
    ) -> Result<ExecutionPlan<'a, T>, ResolveError>
    where
        I: IntoIterator<Item = &'a Step>,
    {
        let mut previous = None;
        let slots: Vec<Slot<'a>> = steps
            .into_iter()
            .map(|step| Slot {
                step,
                resolved: step.keyword().resolve(&mut previous),
            })
            .collect();
        let mut bound: Vec<Option<Binding<'a, T>>> = slots.iter().map(|_| None).collect();

        self.bind_inline(&slots, &mut bound, inline)?;
        self.bind_predefined(&slots, &mut bound, predefined)?;

        let mut bindings = Vec::new();
        let mut unresolved = Vec::new();
        for (slot, binding) in slots.iter().zip(bound) {
            match binding {
                Some(binding) => bindings.push(binding),
                None => unresolved.push(slot.step),
            }
        }
        if !unresolved.is_empty() {
            log::debug!("{} steps have no implementation", unresolved.len());
        }
        Ok(ExecutionPlan {
            bindings,
            unresolved,
        })
    }

    fn bind_inline<'a, T>(
        &self,
        slots: &[Slot<'a>],
        bound: &mut [Option<Binding<'a, T>>],
        inline: &'a [StepDefinition<T>],
    ) -> Result<(), ResolveError> {
        let mut pending = Vec::new();
        for definition in inline {
            let literal = slots.iter().enumerate().position(|(index, slot)| {
                is_free(bound, index)
                    && definition.answers(slot.step, slot.resolved)
                    && slot.step.details() == definition.pattern
            });
            match literal {
                Some(index) => {
                    place(bound, slots, index, definition, BindingOrigin::Inline, Vec::new());
                }
                None => pending.push(definition),
            }
        }
        for definition in pending {
            let compiled = self.registry.compile(&definition.pattern)?;
            let found = slots.iter().enumerate().find_map(|(index, slot)| {
                if !is_free(bound, index) || !definition.answers(slot.step, slot.resolved) {
                    return None;
                }
                Self::coverage(&compiled, slot.step)
                    .map(|values| (index, values))
            });
            let Some((index, values)) = found else {
                return Err(ResolveError::UnknownInlineStep {
                    keyword: definition.keyword,
                    pattern: definition.pattern.clone(),
                });
            };
            place(bound, slots, index, definition, BindingOrigin::Inline, values);
        }
        Ok(())
    }

    fn bind_predefined<'a, T>(
        &self,
        slots: &[Slot<'a>],
        bound: &mut [Option<Binding<'a, T>>],
        predefined: &'a PredefinedSteps<T>,
    ) -> Result<(), ResolveError> {
        let pool: Vec<(StepScope, &'a StepDefinition<T>, Arc<CompiledPattern>)> = predefined
            .effective()
            .into_iter()
            .map(|(scope, definition)| {
                self.registry
                    .compile(&definition.pattern)
                    .map(|compiled| (scope, definition, compiled))
            })
            .collect::<Result<_, _>>()?;

        for (index, slot) in slots.iter().enumerate() {
            if !is_free(bound, index) {
                continue;
            }
            let mut best: Option<(StepScope, SpecificityScore, &'a StepDefinition<T>, Vec<Value>)> =
                None;
            for (scope, definition, compiled) in &pool {
                if !definition.answers(slot.step, slot.resolved) {
                    continue;
                }
                let Some(values) = Self::coverage(compiled, slot.step) else {
                    continue;
                };
                let rank = (*scope, compiled.specificity());
                if best
                    .as_ref()
                    .is_none_or(|(scope, score, _, _)| rank > (*scope, *score))
                {
                    best = Some((rank.0, rank.1, *definition, values));
                }
            }
            if let Some((scope, _, definition, values)) = best {
                place(
                    bound,
                    slots,
                    index,
                    definition,
                    BindingOrigin::Predefined(scope),
                    values,
                );
            }
        }
        Ok(())
    }

    /// Values captured when `compiled` covers `step`. Placeholder-free
    /// patterns cover only identical text.
    fn coverage(compiled: &CompiledPattern, step: &Step) -> Option<Vec<Value>> {
        compiled.captures(step.details()).ok()
    }
}

fn is_free<T>(bound: &[Option<Binding<'_, T>>], index: usize) -> bool {
    bound.get(index).is_some_and(Option::is_none)
}

fn place<'a, T>(
    bound: &mut [Option<Binding<'a, T>>],
    slots: &[Slot<'a>],
    index: usize,
    definition: &'a StepDefinition<T>,
    origin: BindingOrigin,
    values: Vec<Value>,
) {
    let (Some(target), Some(slot)) = (bound.get_mut(index), slots.get(index)) else {
        return;
    };
    *target = Some(Binding {
        index,
        step: slot.step,
        definition,
        origin,
        values,
    });
}

/// Steps run for `scenario`: the feature background, then the rule
/// background, then the scenario's own steps.
pub fn scenario_steps<'f>(
    feature: &'f Feature,
    rule: Option<&'f Rule>,
    scenario: &'f Scenario,
) -> Vec<&'f Step> {
    let feature_background = feature.background.iter();
    let rule_background = rule.and_then(|rule| rule.background.as_ref());
    feature_background
        .chain(rule_background)
        .flat_map(StepContainer::steps)
        .chain(scenario.steps())
        .collect()
}

/// Scenarios whose inherited tags satisfy `policy`, with their enclosing
/// rule. A scenario inherits the tags of its Feature and Rule.
pub fn runnable_scenarios<'f>(
    feature: &'f Feature,
    policy: &'f TagPolicy,
) -> impl Iterator<Item = (Option<&'f Rule>, &'f Scenario)> + 'f {
    feature.all_scenarios().filter(move |(rule, scenario)| {
        let inherited = rule.map_or_else(
            || feature.tags().clone(),
            |rule| rule.tags().merged(feature.tags()),
        );
        policy.should_run(&scenario.tags().merged(&inherited))
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise resolution outcomes")]
mod tests {
    use super::*;
    use crate::{parse_str, Config};
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> ExpressionRegistry {
        ExpressionRegistry::new()
    }

    fn steps(lines: &[(StepKeyword, &str)]) -> Vec<Step> {
        lines
            .iter()
            .map(|(keyword, details)| Step::new(*keyword, *details))
            .collect()
    }

    fn chosen(plan: &ExecutionPlan<'_, &'static str>) -> Vec<&'static str> {
        plan.bindings()
            .iter()
            .map(|binding| *binding.definition.implementation())
            .collect()
    }

    #[rstest]
    fn rule_scope_overrides_feature_and_global(registry: ExpressionRegistry) {
        let steps = steps(&[(StepKeyword::Given, "x")]);
        let pools = PredefinedSteps::new()
            .with(StepScope::Global, StepKeyword::Given, "x", "global")
            .with(StepScope::Rule, StepKeyword::Given, "x", "rule")
            .with(StepScope::Feature, StepKeyword::Given, "x", "feature");
        let plan = StepResolver::new(&registry).resolve(&steps, &[], &pools).unwrap();
        assert_eq!(chosen(&plan), ["rule"]);
        assert_eq!(
            plan.bindings()[0].origin,
            BindingOrigin::Predefined(StepScope::Rule)
        );
    }

    #[rstest]
    fn effective_pool_drops_overridden_entries() {
        let pools = PredefinedSteps::new()
            .with(StepScope::Global, StepKeyword::Given, "x", 1)
            .with(StepScope::Global, StepKeyword::Given, "y", 2)
            .with(StepScope::Feature, StepKeyword::Given, "x", 3);
        let effective: Vec<_> = pools
            .effective()
            .into_iter()
            .map(|(scope, definition)| (scope, *definition.implementation()))
            .collect();
        assert_eq!(
            effective,
            [(StepScope::Feature, 3), (StepScope::Global, 2)]
        );
    }

    #[rstest]
    fn inline_definitions_win_and_keep_source_order(registry: ExpressionRegistry) {
        let steps = steps(&[
            (StepKeyword::Given, "I have 3 items"),
            (StepKeyword::When, "I buy 2 more"),
            (StepKeyword::Then, "I have 5 items"),
        ]);
        let inline = [
            StepDefinition::new(StepKeyword::Then, "I have 5 items", "exact"),
            StepDefinition::new(StepKeyword::When, "I buy {int} more", "buy"),
        ];
        let pools = PredefinedSteps::new()
            .with(StepScope::Global, StepKeyword::Given, "I have {int} items", "have")
            .with(StepScope::Global, StepKeyword::Then, "I have {int} items", "unused");
        let plan = StepResolver::new(&registry).resolve(&steps, &inline, &pools).unwrap();
        assert!(plan.is_complete());
        assert_eq!(chosen(&plan), ["have", "buy", "exact"]);
        let indices: Vec<_> = plan.bindings().iter().map(|binding| binding.index).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert_eq!(plan.bindings()[0].values, vec![Value::Int(3)]);
        assert_eq!(plan.bindings()[1].values, vec![Value::Int(2)]);
    }

    #[rstest]
    fn unknown_inline_definition_is_an_error(registry: ExpressionRegistry) {
        let steps = steps(&[(StepKeyword::Given, "a")]);
        let inline = [StepDefinition::new(StepKeyword::Given, "b", ())];
        let err = StepResolver::new(&registry)
            .resolve(&steps, &inline, &PredefinedSteps::new())
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownInlineStep { ref pattern, .. } if pattern == "b"));
    }

    #[rstest]
    fn more_specific_pattern_wins_within_a_scope(registry: ExpressionRegistry) {
        let steps = steps(&[(StepKeyword::Then, "the output is foo")]);
        let pools = PredefinedSteps::new()
            .with(StepScope::Global, StepKeyword::Then, "the output is {word}", "generic")
            .with(StepScope::Global, StepKeyword::Then, "the output is foo", "literal");
        let plan = StepResolver::new(&registry).resolve(&steps, &[], &pools).unwrap();
        assert_eq!(chosen(&plan), ["literal"]);
    }

    #[rstest]
    fn conjunctions_follow_the_previous_keyword(registry: ExpressionRegistry) {
        let steps = steps(&[(StepKeyword::Given, "a"), (StepKeyword::And, "b")]);
        let pools = PredefinedSteps::new()
            .with(StepScope::Global, StepKeyword::Given, "a", "a")
            .with(StepScope::Global, StepKeyword::Given, "b", "b");
        let plan = StepResolver::new(&registry).resolve(&steps, &[], &pools).unwrap();
        assert_eq!(chosen(&plan), ["a", "b"]);
    }

    #[rstest]
    fn reports_unresolved_steps(registry: ExpressionRegistry) {
        let steps = steps(&[(StepKeyword::Given, "a"), (StepKeyword::Then, "b")]);
        let pools = PredefinedSteps::new().with(StepScope::Global, StepKeyword::Given, "a", ());
        let plan = StepResolver::new(&registry).resolve(&steps, &[], &pools).unwrap();
        assert_eq!(plan.unresolved().len(), 1);
        let err = plan.require_complete().unwrap_err();
        assert_eq!(err.to_string(), "no implementation found for: Then b");
    }

    #[test]
    fn scenario_steps_put_backgrounds_first() {
        let feature = parse_str(
            "Feature: f\nBackground:\nGiven feature setup\nRule: r\nBackground:\nGiven rule setup\nScenario: s\nWhen it runs",
            &Config::default(),
        )
        .unwrap();
        let rule = feature.rule("r").unwrap();
        let scenario = rule.scenario("s").unwrap();
        let details: Vec<_> = scenario_steps(&feature, Some(rule), scenario)
            .into_iter()
            .map(Step::details)
            .collect();
        assert_eq!(details, ["feature setup", "rule setup", "it runs"]);
    }

    #[test]
    fn runnable_scenarios_respect_inherited_tags() {
        let feature = parse_str(
            "Feature: f\nScenario: plain\nGiven a\n@web\nRule: r\nScenario: tagged\nGiven b\n@wip\nScenario: skipped\nGiven c",
            &Config::default(),
        )
        .unwrap();
        let policy = TagPolicy::new(
            TagPolicy::parse_list("@web").unwrap(),
            TagPolicy::parse_list("@wip").unwrap(),
        );
        let names: Vec<_> = runnable_scenarios(&feature, &policy)
            .map(|(_, scenario)| scenario.name())
            .collect();
        assert_eq!(names, ["tagged"]);
    }
}
