//! Cursor state carried between lines.
//!
//! The context holds indices into the feature arena rather than references,
//! so a snapshot can be cloned, compared and serialised at any point of a
//! parse.

use serde::Serialize;

use crate::model::ExampleRow;
use crate::tags::TagSet;

/// The step container that receives step lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerRef {
    /// The Feature's Background.
    FeatureBackground,
    /// The active Rule's Background.
    RuleBackground,
    /// Scenario at this index within the active scope: the active Rule when
    /// one is open, otherwise the Feature.
    Scenario(usize),
}

/// Classification of the last significant line. Comments are transparent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LineKind {
    /// Nothing significant has been read yet.
    #[default]
    Start,
    /// A Feature, Rule, Background, Scenario or Examples line.
    Structural,
    /// A step line.
    Step,
    /// A row appended to a step's data table.
    DataTableRow,
    /// A row of an Examples table.
    ExampleRow,
    /// A line of `@` tags.
    Tags,
    /// A closed doc-string.
    DocString,
    /// Free description text.
    Description,
    /// A blank line.
    Blank,
}

/// Rows of an Examples block not yet stored on their outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamplesAccumulator {
    pub(super) headers: Option<Vec<String>>,
    pub(super) rows: Vec<ExampleRow>,
    pub(super) explicit: bool,
    pub(super) target: usize,
    pub(super) tags: TagSet,
    pub(super) line: usize,
}

impl ExamplesAccumulator {
    pub(super) fn new(target: usize, explicit: bool, tags: TagSet, line: usize) -> Self {
        Self {
            headers: None,
            rows: Vec::new(),
            explicit,
            target,
            tags,
            line,
        }
    }

    /// Take `cells` as the header row, or as a value row keyed by the
    /// headers. Missing cells become `None`; extra cells are dropped.
    pub(super) fn push(&mut self, cells: Vec<String>, line: usize) {
        let Some(headers) = &self.headers else {
            self.headers = Some(cells);
            return;
        };
        if cells.len() > headers.len() {
            log::warn!(
                "line {line}: example row has {} cells but only {} columns; extra cells ignored",
                cells.len(),
                headers.len()
            );
        }
        let mut cells = cells.into_iter();
        let values = headers
            .iter()
            .map(|header| (header.clone(), cells.next()))
            .collect();
        self.rows.push(ExampleRow {
            values,
            tags: self.tags.clone(),
            line,
        });
    }

    /// Whether a blank line should leave the block open: it was opened by an
    /// `Examples:` keyword and no value row has arrived yet.
    pub(super) fn awaits_rows(&self) -> bool {
        self.explicit && self.rows.is_empty()
    }

    /// Column names, once the header row has been read.
    #[must_use]
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Rows read so far.
    #[must_use]
    pub fn rows(&self) -> &[ExampleRow] {
        &self.rows
    }

    /// Whether the block was opened by an `Examples:` keyword.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }
}

/// Lines of a doc-string whose closing delimiter has not been read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocStringAccumulator {
    pub(super) delimiter: &'static str,
    pub(super) indent: usize,
    pub(super) lines: Vec<String>,
    pub(super) media_type: Option<String>,
    pub(super) line: usize,
}

/// Cursor snapshot of a [`GherkinParser`](super::GherkinParser).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParserContext {
    pub(super) language: &'static str,
    pub(super) feature: Option<usize>,
    pub(super) rule: Option<usize>,
    pub(super) container: Option<ContainerRef>,
    pub(super) pending_tags: TagSet,
    pub(super) examples: Option<ExamplesAccumulator>,
    pub(super) doc_string: Option<DocStringAccumulator>,
    pub(super) previous: LineKind,
    pub(super) line: usize,
}

impl ParserContext {
    pub(super) fn new(language: &'static str) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Language of the keyword table in use.
    #[must_use]
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// Index of the Feature being built.
    #[must_use]
    pub fn feature(&self) -> Option<usize> {
        self.feature
    }

    /// Index of the active Rule within its Feature.
    #[must_use]
    pub fn rule(&self) -> Option<usize> {
        self.rule
    }

    /// Container receiving step lines.
    #[must_use]
    pub fn container(&self) -> Option<ContainerRef> {
        self.container
    }

    /// Tags waiting for the next structural entity.
    #[must_use]
    pub fn pending_tags(&self) -> &TagSet {
        &self.pending_tags
    }

    /// Open Examples block, if any.
    #[must_use]
    pub fn examples(&self) -> Option<&ExamplesAccumulator> {
        self.examples.as_ref()
    }

    /// Whether a doc-string is open.
    #[must_use]
    pub fn in_doc_string(&self) -> bool {
        self.doc_string.is_some()
    }

    /// Classification of the last significant line.
    #[must_use]
    pub fn previous(&self) -> LineKind {
        self.previous
    }

    /// 1-based number of the last line read.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}
