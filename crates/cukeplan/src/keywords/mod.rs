//! Localised keyword tables.
//!
//! A [`KeywordTable`] maps the keywords of one language onto canonical
//! structural and step types. Tables are static; selecting one is a pure
//! lookup that falls back to English for unsupported languages.

mod languages;
mod step;

use std::fmt;

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

pub use step::{StepKeyword, StepKeywordParseError};

/// Canonical type of a structural line such as `Feature:` or `Examples:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralKeyword {
    /// `Feature:`
    Feature,
    /// `Rule:`
    Rule,
    /// `Background:`
    Background,
    /// `Scenario:` or `Example:`
    Scenario,
    /// `Scenario Outline:` or `Scenario Template:`
    ScenarioOutline,
    /// `Examples:` or `Scenarios:`
    Examples,
}

impl StructuralKeyword {
    /// Every structural keyword, in table order.
    pub const ALL: [Self; 6] = [
        Self::Feature,
        Self::Rule,
        Self::Background,
        Self::Scenario,
        Self::ScenarioOutline,
        Self::Examples,
    ];
}

impl fmt::Display for StructuralKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Feature => "Feature",
            Self::Rule => "Rule",
            Self::Background => "Background",
            Self::Scenario => "Scenario",
            Self::ScenarioOutline => "Scenario Outline",
            Self::Examples => "Examples",
        })
    }
}

/// A structural line recognised by [`KeywordTable::match_structural`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralMatch<'a> {
    /// Canonical type.
    pub kind: StructuralKeyword,
    /// Localised keyword as written.
    pub keyword: &'static str,
    /// Trimmed text after the colon.
    pub name: &'a str,
}

/// A step line recognised by [`KeywordTable::match_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMatch<'a> {
    /// Canonical type.
    pub kind: StepKeyword,
    /// Localised keyword as written, without trailing whitespace.
    pub keyword: &'static str,
    /// Trimmed text after the keyword.
    pub details: &'a str,
}

/// Keywords of one language.
#[derive(Debug)]
pub struct KeywordTable {
    language: &'static str,
    feature: &'static [&'static str],
    rule: &'static [&'static str],
    background: &'static [&'static str],
    scenario: &'static [&'static str],
    scenario_outline: &'static [&'static str],
    examples: &'static [&'static str],
    given: &'static [&'static str],
    when: &'static [&'static str],
    then: &'static [&'static str],
    and: &'static [&'static str],
    but: &'static [&'static str],
}

impl KeywordTable {
    /// The English table, used as the fallback for unsupported languages.
    #[must_use]
    pub fn english() -> &'static Self {
        &languages::ENGLISH
    }

    /// Select the table for an ISO-ish language code such as `fr`, `fr-FR`
    /// or `pt_BR`.
    ///
    /// Unknown or malformed codes fall back to English.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::KeywordTable;
    ///
    /// assert_eq!(KeywordTable::for_language("fr_CA").language(), "fr");
    /// assert_eq!(KeywordTable::for_language("tlh").language(), "en");
    /// ```
    #[must_use]
    pub fn for_language(code: &str) -> &'static Self {
        let normalised = code.trim().replace('_', "-");
        match normalised.parse::<LanguageIdentifier>() {
            Ok(id) => Self::for_langid(&id),
            Err(err) => {
                log::debug!("unparseable language {code:?} ({err}); using English keywords");
                Self::english()
            }
        }
    }

    /// Select the table for a parsed language identifier, falling back to
    /// English.
    #[must_use]
    pub fn for_langid(id: &LanguageIdentifier) -> &'static Self {
        let language = id.language.as_str();
        languages::TABLES
            .iter()
            .copied()
            .find(|table| table.language == language)
            .unwrap_or_else(|| {
                log::debug!("no keyword table for {id}; using English keywords");
                Self::english()
            })
    }

    /// Whether a table exists for `code` without falling back.
    #[must_use]
    pub fn is_supported(code: &str) -> bool {
        let normalised = code.trim().replace('_', "-");
        normalised
            .parse::<LanguageIdentifier>()
            .is_ok_and(|id| {
                languages::TABLES
                    .iter()
                    .any(|table| table.language == id.language.as_str())
            })
    }

    /// Codes of the shipped languages.
    pub fn supported_languages() -> impl Iterator<Item = &'static str> {
        languages::TABLES.iter().map(|table| table.language)
    }

    /// Language code of this table.
    #[must_use]
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// Localised spellings of a structural keyword.
    #[must_use]
    pub fn structural(&self, kind: StructuralKeyword) -> &'static [&'static str] {
        match kind {
            StructuralKeyword::Feature => self.feature,
            StructuralKeyword::Rule => self.rule,
            StructuralKeyword::Background => self.background,
            StructuralKeyword::Scenario => self.scenario,
            StructuralKeyword::ScenarioOutline => self.scenario_outline,
            StructuralKeyword::Examples => self.examples,
        }
    }

    /// Localised spellings of a step keyword, including any trailing space.
    #[must_use]
    pub fn step(&self, kind: StepKeyword) -> &'static [&'static str] {
        match kind {
            StepKeyword::Given => self.given,
            StepKeyword::When => self.when,
            StepKeyword::Then => self.then,
            StepKeyword::And => self.and,
            StepKeyword::But => self.but,
        }
    }

    /// Recognise a structural line: a keyword at the start of the trimmed
    /// line followed by a colon.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::{KeywordTable, StructuralKeyword};
    ///
    /// let found = KeywordTable::english()
    ///     .match_structural("Scenario Outline: eating")
    ///     .expect("outline keyword");
    /// assert_eq!(found.kind, StructuralKeyword::ScenarioOutline);
    /// assert_eq!(found.name, "eating");
    /// ```
    #[must_use]
    pub fn match_structural<'a>(&self, line: &'a str) -> Option<StructuralMatch<'a>> {
        let line = line.trim();
        let mut best: Option<StructuralMatch<'a>> = None;
        for kind in StructuralKeyword::ALL {
            for &keyword in self.structural(kind) {
                let Some(name) = after_colon(line, keyword) else {
                    continue;
                };
                if best.is_none_or(|found| keyword.len() > found.keyword.len()) {
                    best = Some(StructuralMatch {
                        kind,
                        keyword,
                        name,
                    });
                }
            }
        }
        best
    }

    /// Recognise a step line.
    ///
    /// The keyword occurring leftmost in the line wins; an occurrence counts
    /// only at the start of the line or after whitespace. At equal positions
    /// the longer keyword wins, then table order. The bullet keyword `*` is
    /// recognised only at the start of the line.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::{KeywordTable, StepKeyword};
    ///
    /// let found = KeywordTable::english()
    ///     .match_step("Then the Given value is kept")
    ///     .expect("step keyword");
    /// assert_eq!(found.kind, StepKeyword::Then);
    /// assert_eq!(found.details, "the Given value is kept");
    /// ```
    #[must_use]
    pub fn match_step<'a>(&self, line: &'a str) -> Option<StepMatch<'a>> {
        let line = line.trim();
        let mut best: Option<(usize, StepKeyword, &'static str)> = None;
        for kind in StepKeyword::ALL {
            for &keyword in self.step(kind) {
                let Some(pos) = find_at_boundary(line, keyword) else {
                    continue;
                };
                let better = best.is_none_or(|(found_pos, _, found)| {
                    pos < found_pos || (pos == found_pos && keyword.len() > found.len())
                });
                if better {
                    best = Some((pos, kind, keyword));
                }
            }
        }
        let (pos, kind, keyword) = best?;
        let details = line.get(pos + keyword.len()..)?.trim();
        Some(StepMatch {
            kind,
            keyword: keyword.trim_end(),
            details,
        })
    }
}

fn after_colon<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?.trim_start();
    rest.strip_prefix(':')
        .or_else(|| rest.strip_prefix('：'))
        .map(str::trim)
}

fn find_at_boundary(line: &str, keyword: &str) -> Option<usize> {
    if keyword.starts_with('*') {
        return line.starts_with(keyword).then_some(0);
    }
    line.match_indices(keyword).map(|(pos, _)| pos).find(|&pos| {
        line.get(..pos)
            .is_some_and(|before| before.chars().next_back().is_none_or(char::is_whitespace))
    })
}
