//! Streaming line parser.
//!
//! [`GherkinParser`] classifies one line at a time against a
//! [`KeywordTable`] and grows a feature arena, tracking where it is through a
//! [`ParserContext`] of indices. Lines are classified in this order, first
//! match wins: open doc-string content, comment, structural keyword, table
//! row, tag line, doc-string delimiter, step, blank line, description text.
//!
//! An open Examples block is stored on its outline when any line other than a
//! table row or comment arrives, and when the parser finishes. Blank lines
//! between an `Examples:` keyword and its first value row keep the block open.

mod context;
mod row;

use crate::config::Config;
use crate::error::{Error, ParseError};
use crate::keywords::{KeywordTable, StepMatch, StructuralKeyword, StructuralMatch};
use crate::model::{
    Background, DataTable, DocString, Feature, OutlineData, Rule, Scenario, Step, StepContainer,
};
use crate::tags::TagSet;

pub use context::{ContainerRef, DocStringAccumulator, ExamplesAccumulator, LineKind, ParserContext};

const DOC_STRING_DELIMITERS: [&str; 2] = ["\"\"\"", "```"];

/// Incremental parser producing [`Feature`] trees.
///
/// Parsers are independent values; feeding the same lines to two fresh
/// parsers yields equal trees.
///
/// # Examples
/// ```
/// use cukeplan::{Config, GherkinParser, StepContainer, StepKeyword};
///
/// let config = Config::default();
/// let mut parser = GherkinParser::new(&config);
/// for line in ["Feature: f", "Scenario: s", "Given I have 3 items"] {
///     parser.add_line(line)?;
/// }
/// let features = parser.finish()?;
/// let scenario = features[0].scenario("s")?;
/// assert_eq!(scenario.steps()[0].keyword(), StepKeyword::Given);
/// assert_eq!(scenario.steps()[0].details(), "I have 3 items");
/// # Ok::<(), cukeplan::Error>(())
/// ```
#[derive(Debug)]
pub struct GherkinParser<'c> {
    config: &'c Config,
    keywords: &'static KeywordTable,
    context: ParserContext,
    features: Vec<Feature>,
}

impl<'c> GherkinParser<'c> {
    /// Create a parser using the language and settings of `config`.
    #[must_use]
    pub fn new(config: &'c Config) -> Self {
        let keywords = config.keywords();
        Self {
            config,
            keywords,
            context: ParserContext::new(keywords.language()),
            features: Vec::new(),
        }
    }

    /// Cursor state after the last line.
    #[must_use]
    pub fn context(&self) -> &ParserContext {
        &self.context
    }

    /// Features built so far.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Classify and apply one line.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when the line violates the document
    /// structure. The parser should be discarded after an error.
    pub fn add_line(&mut self, text: &str) -> Result<(), ParseError> {
        self.context.line += 1;
        self.classify(text)?;
        log::trace!(
            "line {}: {:?}{}",
            self.context.line,
            self.context.previous,
            if self.context.in_doc_string() { " (doc-string)" } else { "" }
        );
        Ok(())
    }

    fn classify(&mut self, text: &str) -> Result<(), ParseError> {
        if self.context.doc_string.is_some() {
            self.doc_string_line(text);
            return Ok(());
        }

        let trimmed = text.trim();
        if let Some(comment) = trimmed.strip_prefix('#') {
            self.comment(comment);
            return Ok(());
        }
        if let Some(found) = self.keywords.match_structural(trimmed) {
            self.flush_examples();
            self.structural(found, trimmed)?;
            self.context.previous = LineKind::Structural;
            return Ok(());
        }
        if trimmed.starts_with('|') {
            return self.table_row(trimmed);
        }
        if trimmed.is_empty()
            && self
                .context
                .examples
                .as_ref()
                .is_some_and(ExamplesAccumulator::awaits_rows)
        {
            self.context.previous = LineKind::Blank;
            return Ok(());
        }

        self.flush_examples();
        if trimmed.starts_with('@') {
            self.context.pending_tags.extend(
                trimmed
                    .split_whitespace()
                    .filter(|token| token.starts_with('@')),
            );
            self.context.previous = LineKind::Tags;
        } else if let Some(delimiter) = DOC_STRING_DELIMITERS
            .into_iter()
            .find(|delimiter| trimmed.starts_with(delimiter))
        {
            self.open_doc_string(text, trimmed, delimiter)?;
        } else if let Some(found) = self.keywords.match_step(trimmed) {
            self.step(found, trimmed)?;
            self.context.previous = LineKind::Step;
        } else if trimmed.is_empty() {
            self.context.previous = LineKind::Blank;
        } else {
            self.description(trimmed);
            self.context.previous = LineKind::Description;
        }
        Ok(())
    }

    /// Flush pending state and return the features.
    ///
    /// # Errors
    /// Returns [`ParseError::UnterminatedDocString`] when a doc-string is
    /// still open, and [`ParseError::MissingExamplesKeyword`] in strict mode
    /// when an outline has rows without an `Examples:` keyword.
    pub fn finish(mut self) -> Result<Vec<Feature>, ParseError> {
        if let Some(doc) = &self.context.doc_string {
            return Err(ParseError::UnterminatedDocString { line: doc.line });
        }
        self.flush_examples();
        if !self.context.pending_tags.is_empty() {
            log::debug!(
                "discarding tags {:?} with no following entity",
                self.context.pending_tags
            );
        }
        if self.config.strict_examples() {
            let flagged = self
                .features
                .iter()
                .flat_map(Feature::all_scenarios)
                .map(|(_, scenario)| scenario)
                .find(|scenario| {
                    scenario
                        .outline_data()
                        .is_some_and(|data| data.missing_examples_keyword())
                });
            if let Some(scenario) = flagged {
                return Err(ParseError::MissingExamplesKeyword {
                    line: scenario.line(),
                    scenario: scenario.name().to_owned(),
                });
            }
        }
        Ok(self.features)
    }

    fn comment(&mut self, comment: &str) {
        if self.context.feature.is_some() {
            return;
        }
        let language = comment
            .trim()
            .strip_prefix("language")
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(str::trim);
        if let Some(code) = language {
            self.keywords = KeywordTable::for_language(code);
            self.context.language = self.keywords.language();
            log::debug!("document language set to {}", self.context.language);
        }
    }

    fn structural(&mut self, found: StructuralMatch<'_>, text: &str) -> Result<(), ParseError> {
        let line = self.context.line;
        if found.kind == StructuralKeyword::Feature {
            return self.start_feature(found);
        }
        if self.context.feature.is_none() {
            return Err(ParseError::BeforeFeature {
                line,
                text: text.to_owned(),
            });
        }
        let tags = self.context.pending_tags.take();
        match found.kind {
            StructuralKeyword::Feature => Ok(()),
            StructuralKeyword::Rule => {
                let rule = Rule {
                    name: found.name.to_owned(),
                    keyword: found.keyword.to_owned(),
                    tags,
                    line,
                    ..Rule::default()
                };
                let feature = self.feature_mut()?;
                feature.rules.push(rule);
                let index = feature.rules.len() - 1;
                self.context.rule = Some(index);
                self.context.container = None;
                Ok(())
            }
            StructuralKeyword::Background => {
                let background = Background {
                    name: found.name.to_owned(),
                    keyword: found.keyword.to_owned(),
                    tags,
                    line,
                    ..Background::default()
                };
                self.start_background(background)
            }
            StructuralKeyword::Scenario | StructuralKeyword::ScenarioOutline => {
                let scenario = Scenario {
                    name: found.name.to_owned(),
                    keyword: found.keyword.to_owned(),
                    tags,
                    line,
                    outline: (found.kind == StructuralKeyword::ScenarioOutline)
                        .then(OutlineData::default),
                    ..Scenario::default()
                };
                let scenarios = self.scope_scenarios_mut()?;
                scenarios.push(scenario);
                let index = scenarios.len() - 1;
                self.context.container = Some(ContainerRef::Scenario(index));
                Ok(())
            }
            StructuralKeyword::Examples => {
                let Some(ContainerRef::Scenario(index)) = self.context.container else {
                    return Err(ParseError::ExamplesWithoutScenario { line });
                };
                let scenario = self.scenario_mut(index)?;
                if !scenario.is_outline() {
                    log::debug!("scenario {:?} promoted to an outline", scenario.name);
                }
                scenario.ensure_outline();
                self.context.examples = Some(ExamplesAccumulator::new(index, true, tags, line));
                Ok(())
            }
        }
    }

    fn start_feature(&mut self, found: StructuralMatch<'_>) -> Result<(), ParseError> {
        let line = self.context.line;
        if self.context.feature.is_some() {
            return Err(ParseError::DuplicateFeature { line });
        }
        if found.name.is_empty() {
            return Err(ParseError::EmptyFeatureName { line });
        }
        log::debug!("parsing feature {:?}", found.name);
        self.features.push(Feature {
            name: found.name.to_owned(),
            keyword: found.keyword.to_owned(),
            language: self.context.language.to_owned(),
            tags: self.context.pending_tags.take(),
            line,
            ..Feature::default()
        });
        self.context.feature = Some(self.features.len() - 1);
        self.context.rule = None;
        self.context.container = None;
        Ok(())
    }

    fn start_background(&mut self, background: Background) -> Result<(), ParseError> {
        let line = self.context.line;
        let rule = self.context.rule;
        let feature = self.feature_mut()?;
        let (slot, scope, container) = match rule.and_then(|index| feature.rules.get_mut(index)) {
            Some(rule) => (&mut rule.background, "Rule", ContainerRef::RuleBackground),
            None => (
                &mut feature.background,
                "Feature",
                ContainerRef::FeatureBackground,
            ),
        };
        if slot.is_some() {
            return Err(ParseError::DuplicateBackground { line, scope });
        }
        *slot = Some(background);
        self.context.container = Some(container);
        Ok(())
    }

    fn table_row(&mut self, trimmed: &str) -> Result<(), ParseError> {
        let line = self.context.line;
        let cells = row::split_cells(trimmed);

        if self.context.examples.is_none()
            && matches!(
                self.context.previous,
                LineKind::Step | LineKind::DataTableRow
            )
        {
            let step = self
                .container_mut()
                .and_then(|container| container.steps_mut().last_mut())
                .ok_or(ParseError::TableRowOutsideExamples { line })?;
            step.data_table
                .get_or_insert_with(DataTable::default)
                .push_row(cells);
            self.context.previous = LineKind::DataTableRow;
            return Ok(());
        }

        if self.context.examples.is_none() {
            let Some(ContainerRef::Scenario(index)) = self.context.container else {
                return Err(ParseError::TableRowOutsideExamples { line });
            };
            let scenario = self.scenario_mut(index)?;
            let Some(data) = scenario.outline.as_mut() else {
                return Err(ParseError::TableRowOutsideExamples { line });
            };
            data.missing_examples_keyword = true;
            log::warn!(
                "line {line}: scenario outline {:?} has table rows without an Examples keyword",
                scenario.name
            );
            self.context.examples = Some(ExamplesAccumulator::new(
                index,
                false,
                TagSet::new(),
                line,
            ));
        }

        if let Some(examples) = self.context.examples.as_mut() {
            examples.push(cells, line);
        }
        self.context.previous = LineKind::ExampleRow;
        Ok(())
    }

    fn open_doc_string(
        &mut self,
        text: &str,
        trimmed: &str,
        delimiter: &'static str,
    ) -> Result<(), ParseError> {
        let line = self.context.line;
        let has_step = self
            .container_mut()
            .is_some_and(|container| !container.steps().is_empty());
        if !has_step {
            return Err(ParseError::DocStringWithoutStep { line });
        }
        let media_type = trimmed
            .strip_prefix(delimiter)
            .map(str::trim)
            .filter(|media| !media.is_empty())
            .map(str::to_owned);
        self.context.doc_string = Some(DocStringAccumulator {
            delimiter,
            indent: text.len() - text.trim_start().len(),
            lines: Vec::new(),
            media_type,
            line,
        });
        Ok(())
    }

    fn doc_string_line(&mut self, text: &str) {
        let Some(doc) = self.context.doc_string.as_mut() else {
            return;
        };
        if text.trim() != doc.delimiter {
            let leading = text.len() - text.trim_start().len();
            let content = text
                .get(leading.min(doc.indent)..)
                .unwrap_or_else(|| text.trim_start());
            let escaped: String = doc.delimiter.chars().flat_map(|ch| ['\\', ch]).collect();
            doc.lines.push(content.replace(&escaped, doc.delimiter));
            return;
        }
        let Some(doc) = self.context.doc_string.take() else {
            return;
        };
        let doc_string = DocString {
            content: doc.lines.join("\n"),
            media_type: doc.media_type,
        };
        if let Some(step) = self
            .container_mut()
            .and_then(|container| container.steps_mut().last_mut())
        {
            step.doc_string = Some(doc_string);
        }
        self.context.previous = LineKind::DocString;
    }

    fn step(&mut self, found: StepMatch<'_>, text: &str) -> Result<(), ParseError> {
        let line = self.context.line;
        if self.context.feature.is_none() {
            return Err(ParseError::BeforeFeature {
                line,
                text: text.to_owned(),
            });
        }
        let step = Step::parsed(found.kind, found.keyword, found.details, line);
        let container = self
            .container_mut()
            .ok_or_else(|| ParseError::StepWithoutScenario {
                line,
                text: text.to_owned(),
            })?;
        container
            .add_step(step)
            .map_err(|err| ParseError::DisallowedBackgroundStep {
                line,
                keyword: err.keyword,
            })
    }

    fn description(&mut self, text: &str) {
        let rule = self.context.rule;
        let container = self.context.container;
        let Some(feature) = self.context.feature.and_then(|index| self.features.get_mut(index))
        else {
            log::debug!("ignoring text before the Feature line: {text:?}");
            return;
        };
        let rule = rule.and_then(|index| feature.rules.get_mut(index));
        let target = match (container, rule) {
            (Some(ContainerRef::Scenario(index)), Some(rule)) => rule
                .scenarios
                .get_mut(index)
                .map(|scenario| &mut scenario.description),
            (Some(ContainerRef::Scenario(index)), None) => feature
                .scenarios
                .get_mut(index)
                .map(|scenario| &mut scenario.description),
            (Some(ContainerRef::RuleBackground), Some(rule)) => rule
                .background
                .as_mut()
                .map(|background| &mut background.description),
            (Some(ContainerRef::FeatureBackground), _) => feature
                .background
                .as_mut()
                .map(|background| &mut background.description),
            (_, Some(rule)) => Some(&mut rule.description),
            (_, None) => Some(&mut feature.description),
        };
        if let Some(description) = target {
            description.push(text.to_owned());
        }
    }

    fn flush_examples(&mut self) {
        let Some(examples) = self.context.examples.take() else {
            return;
        };
        let line = examples.line;
        let Ok(scenario) = self.scenario_mut(examples.target) else {
            log::warn!("line {line}: examples lost their outline");
            return;
        };
        if examples.headers.is_none() {
            log::debug!("line {line}: Examples block has no table");
        }
        scenario.ensure_outline().examples.extend(examples.rows);
    }

    fn feature_mut(&mut self) -> Result<&mut Feature, ParseError> {
        let line = self.context.line;
        self.context
            .feature
            .and_then(|index| self.features.get_mut(index))
            .ok_or(ParseError::BeforeFeature {
                line,
                text: String::new(),
            })
    }

    fn scope_scenarios_mut(&mut self) -> Result<&mut Vec<Scenario>, ParseError> {
        let rule = self.context.rule;
        let feature = self.feature_mut()?;
        Ok(match rule.and_then(|index| feature.rules.get_mut(index)) {
            Some(rule) => &mut rule.scenarios,
            None => &mut feature.scenarios,
        })
    }

    fn scenario_mut(&mut self, index: usize) -> Result<&mut Scenario, ParseError> {
        let line = self.context.line;
        self.scope_scenarios_mut()?
            .get_mut(index)
            .ok_or(ParseError::ExamplesWithoutScenario { line })
    }

    fn container_mut(&mut self) -> Option<&mut dyn StepContainer> {
        let container = self.context.container?;
        let rule = self.context.rule;
        let feature = self.feature_mut().ok()?;
        let rule = rule.and_then(|index| feature.rules.get_mut(index));
        match (container, rule) {
            (ContainerRef::FeatureBackground, _) => feature
                .background
                .as_mut()
                .map(|background| background as &mut dyn StepContainer),
            (ContainerRef::RuleBackground, rule) => rule?
                .background
                .as_mut()
                .map(|background| background as &mut dyn StepContainer),
            (ContainerRef::Scenario(index), Some(rule)) => rule
                .scenarios
                .get_mut(index)
                .map(|scenario| scenario as &mut dyn StepContainer),
            (ContainerRef::Scenario(index), None) => feature
                .scenarios
                .get_mut(index)
                .map(|scenario| scenario as &mut dyn StepContainer),
        }
    }
}

/// Parse every line of `lines` with a fresh parser.
///
/// # Errors
/// Returns the first [`ParseError`] raised by a line or by finishing.
pub fn parse_lines<I, S>(lines: I, config: &Config) -> Result<Vec<Feature>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = GherkinParser::new(config);
    for line in lines {
        parser.add_line(line.as_ref())?;
    }
    parser.finish()
}

/// Parse a complete document holding one Feature.
///
/// # Errors
/// Returns [`Error::Parse`] for structural problems, including
/// [`ParseError::MissingFeature`] when the text has no Feature line.
///
/// # Examples
/// ```
/// use cukeplan::{parse_str, Config};
///
/// let feature = parse_str("Feature: f\nScenario: s\nGiven I have 3 items\n", &Config::default())?;
/// assert_eq!(feature.name(), "f");
/// assert_eq!(feature.scenarios().len(), 1);
/// # Ok::<(), cukeplan::Error>(())
/// ```
pub fn parse_str(text: &str, config: &Config) -> Result<Feature, Error> {
    parse_lines(text.lines(), config)?
        .into_iter()
        .next()
        .ok_or_else(|| ParseError::MissingFeature.into())
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    reason = "tests inspect known document shapes"
)]
mod tests {
    use super::*;
    use crate::keywords::StepKeyword;
    use rstest::rstest;

    fn parse(text: &str) -> Result<Feature, Error> {
        parse_str(text, &Config::default())
    }

    fn parse_err(text: &str) -> ParseError {
        match parse(text) {
            Err(Error::Parse(err)) => err,
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn parses_minimal_feature() {
        let feature = parse("Feature: f\nScenario: s\nGiven I have 3 items").unwrap();
        assert_eq!(feature.name(), "f");
        let scenario = feature.scenario("s").unwrap();
        assert_eq!(scenario.steps().len(), 1);
        assert_eq!(scenario.steps()[0].keyword(), StepKeyword::Given);
        assert_eq!(scenario.steps()[0].details(), "I have 3 items");
        assert_eq!(scenario.steps()[0].line(), 3);
    }

    #[rstest]
    #[case("Feature: a\nFeature: b", 2)]
    #[case("Feature: a\nScenario: s\nGiven x\n\n# note\nFeature: b", 6)]
    fn rejects_second_feature(#[case] text: &str, #[case] line: usize) {
        assert_eq!(parse_err(text), ParseError::DuplicateFeature { line });
    }

    #[rstest]
    #[case("Scenario: s")]
    #[case("Given x")]
    #[case("@tag\nRule: r")]
    fn rejects_lines_before_feature(#[case] text: &str) {
        assert!(matches!(parse_err(text), ParseError::BeforeFeature { .. }));
    }

    #[test]
    fn rejects_empty_feature_name() {
        assert_eq!(
            parse_err("Feature:   "),
            ParseError::EmptyFeatureName { line: 1 }
        );
    }

    #[test]
    fn missing_feature_is_reported() {
        assert_eq!(parse_err("# only a comment\n\n"), ParseError::MissingFeature);
    }

    #[rstest]
    #[case("Feature: f\nBackground:\nGiven a\nBackground:", "Feature")]
    #[case("Feature: f\nRule: r\nBackground:\nBackground:", "Rule")]
    fn rejects_second_background(#[case] text: &str, #[case] scope: &str) {
        let err = parse_err(text);
        assert!(matches!(err, ParseError::DuplicateBackground { scope: found, .. } if found == scope));
    }

    #[test]
    fn each_rule_may_have_its_own_background() {
        let feature = parse(
            "Feature: f\nBackground:\nGiven a\nRule: one\nBackground:\nGiven b\nRule: two\nBackground:\nGiven c",
        )
        .unwrap();
        assert_eq!(feature.background().unwrap().steps()[0].details(), "a");
        assert_eq!(
            feature.rule("two").unwrap().background().unwrap().steps()[0].details(),
            "c"
        );
    }

    #[test]
    fn rejects_when_in_background() {
        assert_eq!(
            parse_err("Feature: f\nBackground:\nGiven a\nWhen b"),
            ParseError::DisallowedBackgroundStep {
                line: 4,
                keyword: StepKeyword::When,
            }
        );
    }

    #[test]
    fn rejects_step_without_scenario() {
        assert!(matches!(
            parse_err("Feature: f\nGiven a"),
            ParseError::StepWithoutScenario { line: 2, .. }
        ));
    }

    #[test]
    fn rejects_stray_table_rows() {
        assert_eq!(
            parse_err("Feature: f\nScenario: s\n\n| a |"),
            ParseError::TableRowOutsideExamples { line: 4 }
        );
    }

    #[test]
    fn rows_after_a_step_form_its_data_table() {
        let feature = parse("Feature: f\nScenario: s\nGiven users\n  | name |\n  | Ann |\nThen done").unwrap();
        let step = &feature.scenario("s").unwrap().steps()[0];
        assert_eq!(
            step.data_table().unwrap().records().collect::<Vec<_>>(),
            vec![vec![("name", "Ann")]]
        );
    }

    #[test]
    fn collects_outline_examples() {
        let feature = parse(
            "Feature: f\nScenario Outline: o\nGiven I use <x>\n\n@slow\nExamples: first\n| x |\n| a |\n| b |",
        )
        .unwrap();
        let outline = feature.outline("o").unwrap();
        let values: Vec<_> = outline.examples().iter().map(|row| row.get("x")).collect();
        assert_eq!(values, [Some("a"), Some("b")]);
        assert!(outline.examples()[0].tags().contains("slow"));
        assert_eq!(outline.examples()[1].line(), 9);
        assert!(!outline.outline_data().unwrap().missing_examples_keyword());
    }

    #[test]
    fn short_rows_leave_missing_cells() {
        let feature =
            parse("Feature: f\nScenario Outline: o\nGiven <a> <b>\nExamples:\n| a | b |\n| 1 |\n").unwrap();
        let row = &feature.outline("o").unwrap().examples()[0];
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), None);
    }

    #[test]
    fn examples_promote_plain_scenarios() {
        let feature = parse("Feature: f\nScenario: s\nGiven <x>\nExamples:\n| x |\n| 1 |").unwrap();
        assert!(feature.outline("s").unwrap().is_outline());
    }

    #[rstest]
    #[case::before_header("Feature: f\nScenario Outline: o\nGiven <x>\nExamples:\n\n| x |\n| a |\n| b |")]
    #[case::after_header("Feature: f\nScenario Outline: o\nGiven <x>\nExamples:\n| x |\n\n| a |\n| b |")]
    fn blank_lines_before_first_example_row_keep_block_open(#[case] text: &str) {
        let feature = parse(text).unwrap();
        let outline = feature.outline("o").unwrap();
        assert!(!outline.outline_data().unwrap().missing_examples_keyword());
        let values: Vec<_> = outline.examples().iter().map(|row| row.get("x")).collect();
        assert_eq!(values, [Some("a"), Some("b")]);
    }

    #[test]
    fn rows_without_examples_keyword_are_flagged() {
        let text = "Feature: f\nScenario Outline: o\nGiven <x>\n\n| x |\n| 1 |";
        let feature = parse(text).unwrap();
        let outline = feature.outline("o").unwrap();
        assert!(outline.outline_data().unwrap().missing_examples_keyword());
        assert_eq!(outline.examples().len(), 1);

        let strict = Config::default().with_strict_examples(true);
        let err = parse_str(text, &strict).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::MissingExamplesKeyword { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_examples_without_scenario() {
        assert_eq!(
            parse_err("Feature: f\nExamples:"),
            ParseError::ExamplesWithoutScenario { line: 2 }
        );
    }

    #[test]
    fn attaches_doc_strings() {
        let feature = parse(
            "Feature: f\nScenario: s\n  Given a document\n    \"\"\"markdown\n    # Title\n      indented\n    \"\"\"\n  Then it is read",
        )
        .unwrap();
        let steps = feature.scenario("s").unwrap().steps();
        let doc = steps[0].doc_string().unwrap();
        assert_eq!(doc.content, "# Title\n  indented");
        assert_eq!(doc.media_type.as_deref(), Some("markdown"));
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn doc_string_errors() {
        assert_eq!(
            parse_err("Feature: f\nScenario: s\n\"\"\""),
            ParseError::DocStringWithoutStep { line: 3 }
        );
        assert_eq!(
            parse_err("Feature: f\nScenario: s\nGiven a\n```\ntext"),
            ParseError::UnterminatedDocString { line: 4 }
        );
    }

    #[test]
    fn tags_attach_to_next_entity() {
        let feature = parse(
            "@web @fast not-a-tag\nFeature: f\n@slow\nScenario: s\nGiven a\nScenario: t\nGiven b",
        )
        .unwrap();
        assert_eq!(feature.tags().iter().collect::<Vec<_>>(), ["web", "fast"]);
        assert!(feature.scenario("s").unwrap().tags().contains("slow"));
        assert!(feature.scenario("t").unwrap().tags().is_empty());
    }

    #[test]
    fn scenarios_after_rule_belong_to_rule() {
        let feature = parse("Feature: f\nScenario: top\nGiven a\nRule: r\nScenario: inner\nGiven b").unwrap();
        assert_eq!(feature.scenarios().len(), 1);
        assert_eq!(feature.rule("r").unwrap().scenarios()[0].name(), "inner");
    }

    #[test]
    fn descriptions_go_to_innermost_entity() {
        let feature = parse(
            "Feature: f\n  As a user\nRule: r\n  rule text\nScenario: s\n  scenario text\nGiven a",
        )
        .unwrap();
        assert_eq!(feature.description(), ["As a user"]);
        let rule = feature.rule("r").unwrap();
        assert_eq!(rule.description(), ["rule text"]);
        assert_eq!(rule.scenarios()[0].description(), ["scenario text"]);
    }

    #[test]
    fn language_header_selects_keywords() {
        let feature = parse("# language: fr\nFonctionnalité: f\nScénario: s\nSoit a\nQuand b\nAlors c").unwrap();
        assert_eq!(feature.language(), "fr");
        let keywords: Vec<_> = feature
            .scenario("s")
            .unwrap()
            .steps()
            .iter()
            .map(Step::keyword)
            .collect();
        assert_eq!(
            keywords,
            [StepKeyword::Given, StepKeyword::When, StepKeyword::Then]
        );
    }

    #[test]
    fn context_snapshots_track_cursors() {
        let config = Config::default();
        let mut parser = GherkinParser::new(&config);
        for line in ["Feature: f", "Rule: r", "Scenario Outline: o", "Given <x>", "Examples:", "| x |"] {
            parser.add_line(line).unwrap();
        }
        let context = parser.context();
        assert_eq!(context.feature(), Some(0));
        assert_eq!(context.rule(), Some(0));
        assert_eq!(context.container(), Some(ContainerRef::Scenario(0)));
        assert_eq!(
            context.examples().and_then(ExamplesAccumulator::headers),
            Some(["x".to_owned()].as_slice())
        );
        assert_eq!(context.previous(), LineKind::ExampleRow);
        assert_eq!(context.line(), 6);
    }
}
