//! Regex capture helpers shared by compiled patterns and callers that build
//! their own expressions.

use regex::Regex;

/// Extract the named capture groups when `text` matches `re`, returning
/// `None` otherwise.
///
/// Values are returned in the order of `names`, which callers keep aligned
/// with the left-to-right placeholder order of the pattern. Groups that did
/// not participate in the match yield empty strings to keep positional
/// alignment.
///
/// # Examples
/// ```
/// # use regex::Regex;
/// # use cukeplan_patterns::extract_named_captures;
/// let regex = Regex::new(r"^(?P<int0>\d+)-(?P<word0>\w+)$")
///     .expect("example ensures fallible call succeeds");
/// let names = ["int0".to_string(), "word0".to_string()];
/// let values = extract_named_captures(&regex, &names, "42-answer")
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(values, vec!["42".to_string(), "answer".to_string()]);
/// ```
///
/// ```
/// # use regex::Regex;
/// # use cukeplan_patterns::extract_named_captures;
/// let regex = Regex::new(r"^(?P<int0>\d+)$")
///     .expect("example ensures fallible call succeeds");
/// assert!(extract_named_captures(&regex, &["int0".to_string()], "nope").is_none());
/// ```
#[must_use]
pub fn extract_named_captures(re: &Regex, names: &[String], text: &str) -> Option<Vec<String>> {
    let caps = re.captures(text)?;
    let values = names
        .iter()
        .map(|name| {
            caps.name(name)
                .map_or_else(String::new, |m| m.as_str().to_string())
        })
        .collect();
    Some(values)
}
