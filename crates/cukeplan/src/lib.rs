//! Line-oriented Gherkin parsing for `cukeplan`.
//!
//! Text goes in one line at a time and comes out as a typed [`Feature`] tree.
//! Scenario Outlines expand into one step set per example row, tag policies
//! decide which scenarios run, and the [`StepResolver`] binds every concrete
//! step to an implementation drawn from inline or predefined definitions.
//! Step patterns use the placeholder expressions of [`cukeplan_patterns`].
//!
//! Everything here is synchronous and side-effect free apart from
//! [`load_feature`], which reads a file.
//!
//! # Examples
//! ```
//! use cukeplan::{expand, parse_str, Config, ValueMapping};
//!
//! let config = Config::default();
//! let feature = parse_str(
//!     "Feature: Basket\n\
//!      Scenario Outline: adding items\n\
//!        Given I have <count> items\n\
//!      Examples:\n\
//!        | count |\n\
//!        | 3     |\n",
//!     &config,
//! )?;
//! let outline = feature.outline("adding items")?;
//! let expansions = expand(outline, &ValueMapping::new())?;
//! let step = &expansions[0].steps[0];
//! let values = step.match_pattern(config.expressions(), "I have {int} items")?;
//! assert_eq!(values, vec![cukeplan::Value::Int(3)]);
//! # Ok::<(), cukeplan::Error>(())
//! ```

mod config;
mod error;
mod keywords;
mod load;
mod model;
mod outline;
mod parser;
mod resolver;
mod tags;

pub use config::Config;
pub use error::{ConfigError, Error, LoadError, LookupError, OutlineError, ParseError, ResolveError};
pub use keywords::{
    KeywordTable, StepKeyword, StepKeywordParseError, StepMatch, StructuralKeyword,
    StructuralMatch,
};
pub use load::{load_feature, load_feature_from, load_feature_path};
pub use model::{
    Background, DataTable, DisallowedStep, DocString, ExampleRow, Feature, OutlineData, Rule,
    Scenario, ScenarioKind, Step, StepContainer,
};
pub use outline::{Expansion, ValueMapping, Variables, expand};
pub use parser::{
    ContainerRef, DocStringAccumulator, ExamplesAccumulator, GherkinParser, LineKind,
    ParserContext, parse_lines, parse_str,
};
pub use resolver::{
    Binding, BindingOrigin, ExecutionPlan, PredefinedSteps, StepDefinition, StepResolver,
    StepScope, runnable_scenarios, scenario_steps,
};
pub use tags::{TagFilter, TagPolicy, TagSet, match_tags};

pub use cukeplan_patterns::{ExpressionError, ExpressionRegistry, NoMatch, Value};
