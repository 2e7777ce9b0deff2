//! Steps and their attached arguments.

use cukeplan_patterns::{ExpressionError, ExpressionRegistry, NoMatch, Value};
use derive_more::{Deref, From, IntoIterator};
use serde::{Deserialize, Serialize};

use crate::keywords::StepKeyword;

/// Multi-line text argument attached to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocString {
    /// Content with the delimiter indentation removed.
    pub content: String,
    /// Media type written after the opening delimiter, if any.
    pub media_type: Option<String>,
}

/// Table argument attached to a step, one entry per row.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref, From, IntoIterator,
)]
pub struct DataTable(#[into_iterator(owned, ref)] Vec<Vec<String>>);

impl DataTable {
    /// First row, conventionally the header.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.0.first().map(Vec::as_slice)
    }

    /// Rows after the header, each zipped with the header cells.
    ///
    /// Rows shorter than the header yield fewer pairs.
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &str)>> + '_ {
        let header = self.header().unwrap_or_default();
        self.0.iter().skip(1).map(move |row| {
            header
                .iter()
                .zip(row)
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect()
        })
    }

    pub(crate) fn push_row(&mut self, row: Vec<String>) {
        self.0.push(row);
    }

    pub(crate) fn map_cells(&self, mut f: impl FnMut(&str) -> String) -> Self {
        Self(
            self.0
                .iter()
                .map(|row| row.iter().map(|cell| f(cell)).collect())
                .collect(),
        )
    }
}

/// One Given/When/Then/And/But line of behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub(crate) keyword: StepKeyword,
    pub(crate) keyword_text: String,
    pub(crate) details: String,
    pub(crate) doc_string: Option<DocString>,
    pub(crate) data_table: Option<DataTable>,
    pub(crate) line: usize,
    pub(crate) called: bool,
}

impl Step {
    /// Create a step whose localised keyword is the English spelling.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::{Step, StepKeyword};
    ///
    /// let step = Step::new(StepKeyword::Given, "I have 3 items");
    /// assert_eq!(step.title(), "Given I have 3 items");
    /// ```
    #[must_use]
    pub fn new(keyword: StepKeyword, details: impl Into<String>) -> Self {
        Self {
            keyword,
            keyword_text: keyword.as_str().to_owned(),
            details: details.into(),
            doc_string: None,
            data_table: None,
            line: 0,
            called: false,
        }
    }

    pub(crate) fn parsed(keyword: StepKeyword, text: &str, details: &str, line: usize) -> Self {
        Self {
            keyword_text: text.to_owned(),
            line,
            ..Self::new(keyword, details)
        }
    }

    /// Attach a doc-string.
    #[must_use]
    pub fn with_doc_string(mut self, doc_string: DocString) -> Self {
        self.doc_string = Some(doc_string);
        self
    }

    /// Attach a data table.
    #[must_use]
    pub fn with_data_table(mut self, table: impl Into<DataTable>) -> Self {
        self.data_table = Some(table.into());
        self
    }

    /// Canonical keyword.
    #[must_use]
    pub fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// Keyword as written in the document.
    #[must_use]
    pub fn keyword_text(&self) -> &str {
        &self.keyword_text
    }

    /// Step text after the keyword.
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Keyword and details as written, e.g. `Given I have 3 items`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} {}", self.keyword_text, self.details)
    }

    /// Attached doc-string.
    #[must_use]
    pub fn doc_string(&self) -> Option<&DocString> {
        self.doc_string.as_ref()
    }

    /// Attached data table.
    #[must_use]
    pub fn data_table(&self) -> Option<&DataTable> {
        self.data_table.as_ref()
    }

    /// 1-based source line, or `0` for steps built in code.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether the runner marked this step as executed.
    #[must_use]
    pub fn is_called(&self) -> bool {
        self.called
    }

    /// Mark the step as executed. Marking twice is harmless.
    pub fn mark_called(&mut self) {
        self.called = true;
    }

    /// Match the details against `pattern`.
    ///
    /// A placeholder-free pattern must equal the details exactly.
    ///
    /// # Errors
    /// Returns [`ExpressionError::Mismatch`] when the details do not match.
    pub fn match_pattern(
        &self,
        registry: &ExpressionRegistry,
        pattern: &str,
    ) -> Result<Vec<Value>, ExpressionError> {
        registry.match_text(pattern, &self.details)
    }

    /// Match the details against `pattern`, reporting a miss as a value.
    ///
    /// # Errors
    /// Returns [`NoMatch`] when the details do not match; compilation
    /// failures are reported as a miss carrying the compiler message.
    pub fn try_match(
        &self,
        registry: &ExpressionRegistry,
        pattern: &str,
    ) -> Result<Vec<Value>, NoMatch> {
        registry.compile(pattern).map_or_else(
            |err| Err(NoMatch::new(pattern, self.details.as_str(), Some(err.to_string()))),
            |compiled| compiled.captures(&self.details),
        )
    }

    /// Copy of this step with every text part rewritten by `f`.
    pub(crate) fn rewritten(&self, mut f: impl FnMut(&str) -> String) -> Self {
        Self {
            keyword: self.keyword,
            keyword_text: self.keyword_text.clone(),
            details: f(&self.details),
            doc_string: self.doc_string.as_ref().map(|doc| DocString {
                content: f(&doc.content),
                media_type: doc.media_type.clone(),
            }),
            data_table: self.data_table.as_ref().map(|table| table.map_cells(&mut f)),
            line: self.line,
            called: false,
        }
    }

    /// Every text fragment that may carry outline placeholders.
    pub(crate) fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.details.as_str())
            .chain(self.doc_string.iter().map(|doc| doc.content.as_str()))
            .chain(
                self.data_table
                    .iter()
                    .flat_map(|table| table.iter().flatten().map(String::as_str)),
            )
    }
}
