//! Sense grouping over located tags.
//!
//! Tags separated only by whitespace or a connector (`v. & aux.`) describe
//! one sense and stay on one line. Any other text between two tags is meaning
//! text and closes the group.

use gloss_types::{SenseGroup, TagOccurrence};
use tracing::debug;

/// Tokens that join two tags into one sense.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Connectors {
    tokens: Vec<String>,
}

impl Connectors {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Whether `text` is exactly one connector.
    pub fn is_connector(&self, text: &str) -> bool {
        self.tokens.iter().any(|t| t == text)
    }

    /// Remainder of `text` after a leading connector, if it has one.
    ///
    /// A connector ending in a letter or digit only counts when it is not
    /// immediately followed by another one, so `android` keeps its `and`.
    pub fn strip_leading<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.tokens.iter().find_map(|token| {
            let rest = text.strip_prefix(token.as_str())?;
            let glued = token.chars().next_back().is_some_and(char::is_alphanumeric)
                && rest.chars().next().is_some_and(char::is_alphanumeric);
            (!glued).then_some(rest)
        })
    }

    pub fn starts_with_connector(&self, text: &str) -> bool {
        self.strip_leading(text).is_some()
    }
}

impl Default for Connectors {
    fn default() -> Self {
        Self::new(["&", "and", "和"])
    }
}

/// Cluster `occurrences` of `text` into sense groups and attach their text.
///
/// Returns no groups when there are no occurrences; the caller decides how
/// to present an untagged gloss. With `borrow_empty_text`, a group whose own
/// text is empty takes the text of the first other group that has some.
pub fn group_occurrences(
    text: &str,
    occurrences: &[TagOccurrence],
    connectors: &Connectors,
    borrow_empty_text: bool,
) -> Vec<SenseGroup> {
    if occurrences.is_empty() {
        return Vec::new();
    }

    let mut runs: Vec<Vec<usize>> = vec![vec![0]];
    for (idx, pair) in occurrences.windows(2).enumerate() {
        let gap = text[pair[0].end()..pair[1].start].trim();
        if gap.is_empty() || connectors.is_connector(gap) {
            if let Some(run) = runs.last_mut() {
                run.push(idx + 1);
            }
        } else {
            runs.push(vec![idx + 1]);
        }
    }

    let raw: Vec<&str> = runs
        .iter()
        .enumerate()
        .map(|(g, run)| {
            let last = &occurrences[run[run.len() - 1]];
            let end = runs
                .get(g + 1)
                .map_or(text.len(), |next| occurrences[next[0]].start);
            text[last.end()..end].trim()
        })
        .collect();

    runs.iter()
        .enumerate()
        .map(|(g, run)| {
            let own = connectors.strip_leading(raw[g]).unwrap_or(raw[g]).trim();
            let text = if own.is_empty() && borrow_empty_text {
                borrow_from_sibling(&raw, g, connectors)
            } else {
                own
            };
            SenseGroup {
                members: run.clone(),
                tags: run.iter().map(|&i| occurrences[i].tag).collect(),
                text: text.to_string(),
            }
        })
        .collect()
}

fn borrow_from_sibling<'a>(raw: &[&'a str], group: usize, connectors: &Connectors) -> &'a str {
    let borrowed = raw
        .iter()
        .enumerate()
        .find(|(other, t)| {
            *other != group && !t.is_empty() && !connectors.starts_with_connector(t)
        })
        .map(|(other, t)| {
            debug!(group, from = other, "sense text empty, borrowing from sibling");
            *t
        });
    borrowed.unwrap_or("")
}
