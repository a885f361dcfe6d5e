//! Dictionary entry normalisation.
//!
//! Takes the pos field and gloss of a dictionary entry, both as loosely
//! formatted as the sources they were imported from, and returns a
//! deduplicated tag list plus a gloss split into one line per sense.
//!
//! # How it works
//! 1. Repair: prefix tags the pos field declares but the gloss forgot.
//! 2. Shield: swap `[...]` annotations for placeholders so `[pl. -s]` is
//!    never read as a tag.
//! 3. Extract: locate every vocabulary tag (`n.`, `vt.`, `adj.`, ...).
//! 4. Group: tags joined by nothing or a connector (`&`, `and`, `和`) share
//!    a sense.
//! 5. Format: one line per group, joined with the line-break marker, then
//!    the annotations are restored.
//!
//! Tags are matched case-sensitively.
//!
//! # Example
//! ```
//! use gloss_format::format_entry;
//!
//! let out = format_entry("v. & aux.", "v. do aux. should");
//! assert_eq!(out.extracted_pos, "v. & aux.");
//! assert_eq!(out.formatted_meaning, "v. do<br>aux. should");
//! ```
//!
//! For a runnable demo, see `cargo run -p gloss-format --example format -- <pos> <meaning>`.

pub mod clean;
pub mod formatter;
pub mod group;
pub mod legacy;
pub mod options;
pub mod repair;
pub mod shield;
pub mod vocabulary;

use std::sync::LazyLock;

pub use clean::split_gloss;
pub use formatter::{EntryFormatter, NOT_AVAILABLE};
pub use gloss_types::{
    BracketSpan, DictionaryEntry, FormattedEntry, GlossParts, PartOfSpeech, SenseGroup,
    TagOccurrence,
};
pub use group::{Connectors, group_occurrences};
pub use options::{FormatOptions, OptionsError, parse_bool};
pub use repair::repair_gloss;
pub use shield::{Shielded, shield_brackets};
pub use vocabulary::{Vocabulary, VocabularyError};

static DEFAULT_FORMATTER: LazyLock<EntryFormatter> = LazyLock::new(EntryFormatter::default);

/// [`EntryFormatter::format_entry`] with the standard vocabulary and default options.
pub fn format_entry(pos: &str, meaning: &str) -> FormattedEntry {
    DEFAULT_FORMATTER.format_entry(pos, meaning)
}

/// [`EntryFormatter::format_tag_list`] with default options.
pub fn format_tag_list(pos: &str) -> String {
    DEFAULT_FORMATTER.format_tag_list(pos)
}

/// [`EntryFormatter::format_meaning_by_tags`] with default options.
pub fn format_meaning_by_tags(meaning: &str, pos: &str) -> String {
    DEFAULT_FORMATTER.format_meaning_by_tags(meaning, pos)
}
