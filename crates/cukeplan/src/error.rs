//! Error taxonomy for parsing, expansion, lookup and step resolution.
//!
//! Each stage reports its own error type so callers can match on the failure
//! they care about; [`Error`] unifies them for convenience entry points such
//! as [`parse_str`](crate::parse_str).

use camino::Utf8PathBuf;
use cukeplan_patterns::ExpressionError;
use thiserror::Error;

use crate::keywords::StepKeyword;

/// Structural errors raised while classifying lines.
///
/// Every variant carries the 1-based line number at which the problem was
/// detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A second `Feature:` line was found.
    #[error("line {line}: only one Feature is allowed per document")]
    DuplicateFeature {
        /// Offending line.
        line: usize,
    },
    /// The `Feature:` line has no name.
    #[error("line {line}: Feature name must not be empty")]
    EmptyFeatureName {
        /// Offending line.
        line: usize,
    },
    /// A structural or step line appeared before any Feature.
    #[error("line {line}: `{text}` appears before the Feature line")]
    BeforeFeature {
        /// Offending line.
        line: usize,
        /// Trimmed line text.
        text: String,
    },
    /// A second Background was declared in the same Feature or Rule.
    #[error("line {line}: a Background is already defined in this {scope}")]
    DuplicateBackground {
        /// Offending line.
        line: usize,
        /// `Feature` or `Rule`.
        scope: &'static str,
    },
    /// A step appeared with no open Scenario or Background.
    #[error("line {line}: step `{text}` has no enclosing Scenario or Background")]
    StepWithoutScenario {
        /// Offending line.
        line: usize,
        /// Trimmed line text.
        text: String,
    },
    /// A Background contained a step other than Given or And.
    #[error("line {line}: `{keyword}` steps are not allowed in a Background")]
    DisallowedBackgroundStep {
        /// Offending line.
        line: usize,
        /// Rejected keyword.
        keyword: StepKeyword,
    },
    /// A table row appeared outside any outline, Examples block or step.
    #[error("line {line}: table row has no enclosing Scenario Outline, Examples block or step")]
    TableRowOutsideExamples {
        /// Offending line.
        line: usize,
    },
    /// `Examples:` appeared with no open Scenario.
    #[error("line {line}: Examples block has no enclosing Scenario")]
    ExamplesWithoutScenario {
        /// Offending line.
        line: usize,
    },
    /// A doc-string delimiter appeared before any step in the container.
    #[error("line {line}: doc-string has no preceding step")]
    DocStringWithoutStep {
        /// Offending line.
        line: usize,
    },
    /// Input ended while a doc-string was still open.
    #[error("line {line}: doc-string opened here is never closed")]
    UnterminatedDocString {
        /// Line of the opening delimiter.
        line: usize,
    },
    /// Input contained no Feature at all.
    #[error("document does not contain a Feature")]
    MissingFeature,
    /// Strict mode rejected table rows written without an Examples keyword.
    #[error(
        "line {line}: scenario outline `{scenario}` has example rows without an \
         Examples keyword"
    )]
    MissingExamplesKeyword {
        /// Line of the outline.
        line: usize,
        /// Outline name.
        scenario: String,
    },
}

/// Semantic errors that prevent a Scenario Outline from being expanded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OutlineError {
    /// The scenario is not an outline.
    #[error("scenario `{scenario}` is not a Scenario Outline")]
    NotAnOutline {
        /// Scenario name.
        scenario: String,
    },
    /// The outline has no example rows.
    #[error("scenario outline `{scenario}` has no examples")]
    NoExamples {
        /// Outline name.
        scenario: String,
    },
    /// Table rows appeared without a preceding Examples keyword.
    #[error("scenario outline `{scenario}` has example rows without an Examples keyword")]
    MissingExamplesKeyword {
        /// Outline name.
        scenario: String,
    },
    /// A step uses `<name>` for a column that no Examples block declares.
    #[error("scenario outline `{scenario}` uses undeclared variable `<{variable}>`")]
    UndeclaredVariable {
        /// Outline name.
        scenario: String,
        /// Variable name.
        variable: String,
    },
    /// An Examples column is never referenced by any step.
    #[error("scenario outline `{scenario}` never uses example column `{column}`")]
    UnusedColumn {
        /// Outline name.
        scenario: String,
        /// Column name.
        column: String,
    },
    /// An example row lacks a value for a declared column.
    #[error("scenario outline `{scenario}`: example row {row} has no value for `{column}`")]
    MissingValue {
        /// Outline name.
        scenario: String,
        /// 1-based row number across all Examples blocks.
        row: usize,
        /// Column name.
        column: String,
    },
}

/// Errors raised by name-based lookups on the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// No scenario has the requested name.
    #[error("scenario `{name}` does not exist")]
    ScenarioNotFound {
        /// Requested name.
        name: String,
    },
    /// No outline has the requested name.
    #[error("scenario outline `{name}` does not exist")]
    OutlineNotFound {
        /// Requested name.
        name: String,
    },
    /// No rule has the requested name.
    #[error("rule `{name}` does not exist")]
    RuleNotFound {
        /// Requested name.
        name: String,
    },
    /// The Feature or Rule has no Background.
    #[error("{scope} `{name}` has no Background")]
    BackgroundNotFound {
        /// `Feature` or `Rule`.
        scope: &'static str,
        /// Feature or Rule name.
        name: String,
    },
    /// A plain scenario was requested but the name belongs to an outline.
    #[error("`{name}` is a Scenario Outline, not a Scenario")]
    ScenarioIsOutline {
        /// Requested name.
        name: String,
    },
    /// An outline was requested but the name belongs to a plain scenario.
    #[error("`{name}` is a Scenario, not a Scenario Outline")]
    OutlineIsScenario {
        /// Requested name.
        name: String,
    },
}

/// Errors raised while binding steps to implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// An inline definition matched none of the scenario's steps.
    #[error("inline step `{keyword} {pattern}` does not match any step")]
    UnknownInlineStep {
        /// Definition keyword.
        keyword: StepKeyword,
        /// Definition pattern.
        pattern: String,
    },
    /// Some steps have no implementation.
    #[error("no implementation found for: {}", .steps.join(", "))]
    Unresolved {
        /// Titles of the uncovered steps, in source order.
        steps: Vec<String>,
    },
    /// A definition pattern failed to compile.
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration for {key}: {message}")]
pub struct ConfigError {
    /// Setting or environment variable name.
    pub key: String,
    /// Description of the problem.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading a feature file from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The path has no file name component.
    #[error("`{path}` does not name a file")]
    InvalidPath {
        /// Requested path.
        path: Utf8PathBuf,
    },
    /// The path is not valid UTF-8.
    #[error("`{path}` is not valid UTF-8")]
    NonUtf8Path {
        /// Lossy rendering of the path.
        path: String,
    },
    /// Reading the file failed.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Requested path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file contents are not a valid document.
    #[error("`{path}`: {source}")]
    Parse {
        /// Requested path.
        path: Utf8PathBuf,
        /// Underlying parse failure.
        source: ParseError,
    },
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Structural parse failure.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Outline expansion failure.
    #[error(transparent)]
    Outline(#[from] OutlineError),
    /// Expression registration or matching failure.
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    /// Lookup failure.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// Step resolution failure.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Feature-file loading failure.
    #[error(transparent)]
    Load(#[from] LoadError),
}
