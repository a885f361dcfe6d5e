//! Shared types for normalising dictionary entries.
//!
//! A dictionary entry arrives as two loosely formatted strings: a pos field
//! listing grammatical categories (`"v. & aux."`) and a gloss holding the
//! meaning text, which frequently repeats those tags inline. The types here
//! name the intermediate results of cleaning such an entry up: the closed
//! [`PartOfSpeech`] vocabulary, located [`TagOccurrence`]s, shielded
//! [`BracketSpan`]s and the [`SenseGroup`]s a gloss is split into.
//!
//! ```rust
//! use gloss_types::PartOfSpeech;
//!
//! let pos = PartOfSpeech::from_abbrev("vt.").unwrap();
//! assert_eq!(pos, PartOfSpeech::VerbTransitive);
//! assert_eq!(pos.to_string(), "vt.");
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grammatical category abbreviation as written in dictionary sources.
///
/// Every tag is rendered with a trailing period (`n.`, `prep.`); the bare
/// abbreviation is available through [`PartOfSpeech::abbrev`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    VerbTransitive,
    VerbIntransitive,
    Adjective,
    Adverb,
    Preposition,
    Conjunction,
    Article,
    Pronoun,
    Auxiliary,
    Abbreviation,
    Numeral,
    Interjection,
    Singular,
    Determiner,
    Modal,
    InfinitiveMarker,
    Prefix,
    Suffix,
    Phrase,
    Idiom,
}

impl PartOfSpeech {
    /// The full vocabulary, in the order sources conventionally list it.
    pub const ALL: [PartOfSpeech; 22] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::VerbTransitive,
        PartOfSpeech::VerbIntransitive,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Preposition,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Article,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Auxiliary,
        PartOfSpeech::Abbreviation,
        PartOfSpeech::Numeral,
        PartOfSpeech::Interjection,
        PartOfSpeech::Singular,
        PartOfSpeech::Determiner,
        PartOfSpeech::Modal,
        PartOfSpeech::InfinitiveMarker,
        PartOfSpeech::Prefix,
        PartOfSpeech::Suffix,
        PartOfSpeech::Phrase,
        PartOfSpeech::Idiom,
    ];

    /// Abbreviation without the trailing period.
    pub fn abbrev(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "n",
            PartOfSpeech::Verb => "v",
            PartOfSpeech::VerbTransitive => "vt",
            PartOfSpeech::VerbIntransitive => "vi",
            PartOfSpeech::Adjective => "adj",
            PartOfSpeech::Adverb => "adv",
            PartOfSpeech::Preposition => "prep",
            PartOfSpeech::Conjunction => "conj",
            PartOfSpeech::Article => "art",
            PartOfSpeech::Pronoun => "pron",
            PartOfSpeech::Auxiliary => "aux",
            PartOfSpeech::Abbreviation => "abbr",
            PartOfSpeech::Numeral => "num",
            PartOfSpeech::Interjection => "interj",
            PartOfSpeech::Singular => "sing",
            PartOfSpeech::Determiner => "det",
            PartOfSpeech::Modal => "modal",
            PartOfSpeech::InfinitiveMarker => "inf",
            PartOfSpeech::Prefix => "prefix",
            PartOfSpeech::Suffix => "suffix",
            PartOfSpeech::Phrase => "phrase",
            PartOfSpeech::Idiom => "idiom",
        }
    }

    /// Tag as it appears in text, period included.
    pub fn label(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "n.",
            PartOfSpeech::Verb => "v.",
            PartOfSpeech::VerbTransitive => "vt.",
            PartOfSpeech::VerbIntransitive => "vi.",
            PartOfSpeech::Adjective => "adj.",
            PartOfSpeech::Adverb => "adv.",
            PartOfSpeech::Preposition => "prep.",
            PartOfSpeech::Conjunction => "conj.",
            PartOfSpeech::Article => "art.",
            PartOfSpeech::Pronoun => "pron.",
            PartOfSpeech::Auxiliary => "aux.",
            PartOfSpeech::Abbreviation => "abbr.",
            PartOfSpeech::Numeral => "num.",
            PartOfSpeech::Interjection => "interj.",
            PartOfSpeech::Singular => "sing.",
            PartOfSpeech::Determiner => "det.",
            PartOfSpeech::Modal => "modal.",
            PartOfSpeech::InfinitiveMarker => "inf.",
            PartOfSpeech::Prefix => "prefix.",
            PartOfSpeech::Suffix => "suffix.",
            PartOfSpeech::Phrase => "phrase.",
            PartOfSpeech::Idiom => "idiom.",
        }
    }

    /// Parse an abbreviation, with or without its trailing period.
    ///
    /// Matching is case-sensitive: sources write tags in lower case, and
    /// capitalised look-alikes (`N.`, `V.`) are initials or numbering.
    pub fn from_abbrev(raw: &str) -> Option<Self> {
        let bare = raw.strip_suffix('.').unwrap_or(raw);
        PartOfSpeech::ALL
            .into_iter()
            .find(|pos| pos.abbrev() == bare)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One located tag inside a scanned text.
///
/// Offsets are byte offsets into the text that was scanned, which for gloss
/// segmentation is the bracket-shielded form.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TagOccurrence {
    pub tag: PartOfSpeech,
    pub start: usize,
    pub len: usize,
}

impl TagOccurrence {
    /// Byte offset just past the tag's period.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A `[...]` annotation lifted out of a gloss before tag scanning.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BracketSpan {
    pub placeholder_id: usize,
    /// Original text, brackets included.
    pub original: String,
}

/// Adjacent tags that share one block of meaning text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SenseGroup {
    /// Indices into the occurrence list the group was built from. Never empty.
    pub members: Vec<usize>,
    pub tags: Vec<PartOfSpeech>,
    pub text: String,
}

impl SenseGroup {
    /// Member tags joined the way they are displayed (`"v. & aux."`).
    pub fn display_tag(&self) -> String {
        join_tags(&self.tags)
    }
}

/// Join tags with the `" & "` separator used for display.
pub fn join_tags(tags: &[PartOfSpeech]) -> String {
    tags.iter()
        .map(|tag| tag.label())
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Raw entry as stored upstream. Nothing about its content is trusted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DictionaryEntry {
    #[cfg_attr(feature = "serde", serde(default))]
    pub pos: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub meaning: String,
}

impl DictionaryEntry {
    pub fn new(pos: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            pos: pos.into(),
            meaning: meaning.into(),
        }
    }
}

/// Display-ready result of formatting one entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormattedEntry {
    pub extracted_pos: String,
    pub formatted_meaning: String,
}

/// A polluted gloss field split into the pieces that were packed into it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlossParts {
    pub meaning: String,
    pub example_en: String,
    pub example_cn: String,
    pub mnemonic: String,
    pub collocation: String,
}
