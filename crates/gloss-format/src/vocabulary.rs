use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use aho_corasick::{AhoCorasick, MatchKind};
use gloss_types::{PartOfSpeech, TagOccurrence};
use thiserror::Error;

static STANDARD: LazyLock<Arc<Vocabulary>> = LazyLock::new(|| {
    Arc::new(Vocabulary::new(PartOfSpeech::ALL).expect("standard vocabulary builds"))
});

/// Compiled set of recognised tags.
///
/// All labels are searched in one pass with a leftmost-longest automaton, so
/// `adv.` wins over the `v.` it ends with. A match only counts as a tag when
/// the character before it is not an ASCII word character.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    tags: Vec<PartOfSpeech>,
    automaton: AhoCorasick,
}

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("vocabulary must contain at least one tag")]
    Empty,
    #[error("unknown part-of-speech tag: {0:?}")]
    UnknownTag(String),
    #[error("failed to build tag matcher: {0}")]
    Build(#[from] aho_corasick::BuildError),
}

impl Vocabulary {
    pub fn new(tags: impl IntoIterator<Item = PartOfSpeech>) -> Result<Self, VocabularyError> {
        let mut seen = HashSet::new();
        let tags: Vec<PartOfSpeech> = tags.into_iter().filter(|t| seen.insert(*t)).collect();
        if tags.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(tags.iter().map(|tag| tag.label()))?;

        Ok(Self { tags, automaton })
    }

    /// Shared instance covering every [`PartOfSpeech`]. Built on first use.
    pub fn standard() -> Arc<Self> {
        Arc::clone(&STANDARD)
    }

    /// Build a vocabulary from a comma separated list such as `"n,v.,adj"`.
    pub fn parse_list(raw: &str) -> Result<Self, VocabularyError> {
        let mut tags = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let tag = PartOfSpeech::from_abbrev(item)
                .ok_or_else(|| VocabularyError::UnknownTag(item.to_string()))?;
            tags.push(tag);
        }
        Self::new(tags)
    }

    pub fn tags(&self) -> &[PartOfSpeech] {
        &self.tags
    }

    /// Every tag occurrence in `text`, left to right.
    ///
    /// Repeated tag values are kept as separate occurrences.
    pub fn scan(&self, text: &str) -> Vec<TagOccurrence> {
        self.automaton
            .find_iter(text)
            .filter(|m| word_boundary_before(text, m.start()))
            .map(|m| TagOccurrence {
                tag: self.tags[m.pattern().as_usize()],
                start: m.start(),
                len: m.end() - m.start(),
            })
            .collect()
    }

    /// Distinct tags across `texts`, in order of first appearance.
    ///
    /// Scanning several texts in sequence behaves like scanning them joined
    /// by whitespace.
    pub fn unique_tags<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Vec<PartOfSpeech> {
        let mut seen = HashSet::new();
        texts
            .into_iter()
            .flat_map(|text| self.scan(text))
            .map(|occ| occ.tag)
            .filter(|tag| seen.insert(*tag))
            .collect()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard().as_ref().clone()
    }
}

fn word_boundary_before(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_types::PartOfSpeech::*;

    fn tags_in(text: &str) -> Vec<PartOfSpeech> {
        Vocabulary::standard()
            .scan(text)
            .into_iter()
            .map(|occ| occ.tag)
            .collect()
    }

    #[test]
    fn finds_tags_with_offsets() {
        let occs = Vocabulary::standard().scan("v. do aux. should");
        assert_eq!(occs.len(), 2);
        assert_eq!(
            occs[0],
            TagOccurrence {
                tag: Verb,
                start: 0,
                len: 2
            }
        );
        assert_eq!(occs[1].tag, Auxiliary);
        assert_eq!(occs[1].start, 6);
        assert_eq!(occs[1].end(), 10);
    }

    #[test]
    fn prefers_longest_tag() {
        assert_eq!(tags_in("adv. quickly"), vec![Adverb]);
        assert_eq!(tags_in("vt. make vi. become"), vec![VerbTransitive, VerbIntransitive]);
        assert_eq!(tags_in("prefix. re-"), vec![Prefix]);
    }

    #[test]
    fn requires_boundary_and_period() {
        assert!(tags_in("human. pen").is_empty());
        assert!(tags_in("n v adj").is_empty());
        assert!(tags_in("x_n. 2n.").is_empty());
        assert_eq!(tags_in("名词n. 书"), vec![Noun]);
        assert_eq!(tags_in("(adj.) red"), vec![Adjective]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(tags_in("N. Y. Times").is_empty());
        assert!(tags_in("ADJ. red").is_empty());
    }

    #[test]
    fn ignores_unknown_lookalikes() {
        assert_eq!(tags_in("n. student pl. students"), vec![Noun]);
    }

    #[test]
    fn keeps_repeated_occurrences_in_scan() {
        assert_eq!(tags_in("n. book n. volume"), vec![Noun, Noun]);
    }

    #[test]
    fn unique_tags_follow_first_appearance() {
        let vocab = Vocabulary::standard();
        let tags = vocab.unique_tags(["v. & aux.", "aux. should v. do n. deed"]);
        assert_eq!(tags, vec![Verb, Auxiliary, Noun]);
    }

    #[test]
    fn subset_vocabulary_does_not_leak_suffix_matches() {
        let vocab = Vocabulary::new([Verb]).unwrap();
        assert!(vocab.scan("adv. fast").is_empty());
        assert_eq!(vocab.scan("v. go").len(), 1);
    }

    #[test]
    fn parses_comma_lists() {
        let vocab = Vocabulary::parse_list("n, v., adj").unwrap();
        assert_eq!(vocab.tags(), &[Noun, Verb, Adjective]);
        assert!(matches!(
            Vocabulary::parse_list("n,pl"),
            Err(VocabularyError::UnknownTag(tag)) if tag == "pl"
        ));
        assert!(matches!(Vocabulary::parse_list(" , "), Err(VocabularyError::Empty)));
    }
}
