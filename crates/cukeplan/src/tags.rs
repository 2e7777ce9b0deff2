//! Tag sets and include/exclude tag filtering.
//!
//! Tags are stored without their leading `@`, in first-seen order, without
//! duplicates. Filters combine with AND inside a group and OR across groups:
//! `[All(a, b), Tag(c)]` reads as `(@a AND @b) OR @c`.

use std::fmt;
use std::str::FromStr;

use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn normalise(tag: &str) -> &str {
    tag.trim().trim_start_matches('@')
}

/// Ordered, de-duplicated set of tag names.
///
/// # Examples
/// ```
/// use cukeplan::TagSet;
///
/// let tags: TagSet = ["@fast", "web", "@fast"].into_iter().collect();
/// assert_eq!(tags.len(), 2);
/// assert!(tags.contains("fast"));
/// assert!(tags.contains("@web"));
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Deref, IntoIterator,
)]
pub struct TagSet(#[into_iterator(owned, ref)] Vec<String>);

impl TagSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, stripping every leading `@`. Empty and repeated tags are
    /// ignored. Returns whether the tag was added.
    pub fn insert(&mut self, tag: &str) -> bool {
        let name = normalise(tag);
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.0.push(name.to_owned());
        true
    }

    /// Whether the set holds `tag`, with or without its leading `@`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        let name = normalise(tag);
        self.0.iter().any(|existing| existing == name)
    }

    /// Tags of `parent` followed by the tags of `self`, without duplicates.
    ///
    /// Used to compute the effective tags of an entity nested in a tagged
    /// Feature or Rule.
    #[must_use]
    pub fn merged(&self, parent: &Self) -> Self {
        let mut merged = parent.clone();
        merged.extend(self.0.iter().map(String::as_str));
        merged
    }

    /// Remove and return every tag, leaving the set empty.
    pub(crate) fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl<'a> Extend<&'a str> for TagSet {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// One alternative in a tag filter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagFilter {
    /// Matches when the tag is present.
    Tag(String),
    /// Matches when every listed tag is present.
    All(Vec<String>),
}

impl TagFilter {
    /// Filter matching a single tag.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::Tag(normalise(name).to_owned())
    }

    /// Filter matching only when every tag is present.
    #[must_use]
    pub fn all<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::All(
            names
                .into_iter()
                .map(|name| normalise(name).to_owned())
                .collect(),
        )
    }

    /// Whether `tags` satisfies this filter.
    #[must_use]
    pub fn matches(&self, tags: &TagSet) -> bool {
        match self {
            Self::Tag(name) => tags.contains(name),
            Self::All(names) => names.iter().all(|name| tags.contains(name)),
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(name) => write!(f, "@{name}"),
            Self::All(names) => {
                let joined: Vec<String> = names.iter().map(|name| format!("@{name}")).collect();
                f.write_str(&joined.join("+"))
            }
        }
    }
}

/// Parses `@a` as a single tag and `@a+@b` as an AND group. The `@` is
/// optional.
impl FromStr for TagFilter {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let names: Vec<&str> = text.split('+').map(normalise).collect();
        if names.iter().any(|name| name.is_empty() || name.contains(char::is_whitespace)) {
            return Err(ConfigError::new(
                "tag filter",
                format!("`{}` is not a valid tag expression", text.trim()),
            ));
        }
        match names.as_slice() {
            [single] => Ok(Self::tag(single)),
            _ => Ok(Self::all(names)),
        }
    }
}

/// Return `true` when any filter matches `tags`.
///
/// # Examples
/// ```
/// use cukeplan::{TagFilter, TagSet, match_tags};
///
/// let tags: TagSet = ["a", "b"].into_iter().collect();
/// assert!(match_tags(&tags, &[TagFilter::tag("a")]));
/// assert!(!match_tags(&tags, &[TagFilter::all(["a", "c"])]));
/// assert!(match_tags(&tags, &[TagFilter::all(["a", "b"])]));
/// ```
#[must_use]
pub fn match_tags(tags: &TagSet, filters: &[TagFilter]) -> bool {
    filters.iter().any(|filter| filter.matches(tags))
}

/// Include and exclude filters deciding whether an entity should run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPolicy {
    include: Vec<TagFilter>,
    exclude: Vec<TagFilter>,
}

impl TagPolicy {
    /// Build a policy from include and exclude filter lists.
    #[must_use]
    pub fn new(include: Vec<TagFilter>, exclude: Vec<TagFilter>) -> Self {
        Self { include, exclude }
    }

    /// Include filters.
    #[must_use]
    pub fn include(&self) -> &[TagFilter] {
        &self.include
    }

    /// Exclude filters.
    #[must_use]
    pub fn exclude(&self) -> &[TagFilter] {
        &self.exclude
    }

    /// An entity runs when the include list is empty or matches, and the
    /// exclude list does not match.
    #[must_use]
    pub fn should_run(&self, tags: &TagSet) -> bool {
        (self.include.is_empty() || match_tags(tags, &self.include))
            && !match_tags(tags, &self.exclude)
    }

    /// Parse a comma-separated filter list such as `@smoke, @web+@slow`.
    ///
    /// Blank input yields an empty list.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when an entry is not a valid tag expression.
    pub fn parse_list(text: &str) -> Result<Vec<TagFilter>, ConfigError> {
        text.split(',')
            .filter(|item| !item.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}
