use std::sync::Arc;

use gloss_types::{DictionaryEntry, FormattedEntry, SenseGroup, join_tags};

use crate::group::{Connectors, group_occurrences};
use crate::legacy;
use crate::options::FormatOptions;
use crate::repair::repair_gloss;
use crate::shield::shield_brackets;
use crate::vocabulary::Vocabulary;

/// Placeholder returned when an entry has neither tags nor meaning.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats dictionary entries for display.
///
/// Holds only immutable configuration, so one instance can be shared across
/// threads and reused for every entry.
#[derive(Clone, Debug)]
pub struct EntryFormatter {
    vocabulary: Arc<Vocabulary>,
    options: FormatOptions,
    connectors: Connectors,
}

impl EntryFormatter {
    pub fn new(vocabulary: Arc<Vocabulary>, options: FormatOptions) -> Self {
        let connectors = Connectors::new(&options.connectors);
        Self {
            vocabulary,
            options,
            connectors,
        }
    }

    /// Produce the deduplicated tag list and the line-broken meaning.
    pub fn format_entry(&self, pos: &str, meaning: &str) -> FormattedEntry {
        let pos = pos.trim();
        let meaning = meaning.trim();

        if pos.is_empty() && meaning.is_empty() {
            return FormattedEntry {
                extracted_pos: NOT_AVAILABLE.to_string(),
                formatted_meaning: NOT_AVAILABLE.to_string(),
            };
        }

        let shielded_pos = shield_brackets(pos);
        if meaning.is_empty() {
            return FormattedEntry {
                extracted_pos: self.extracted_pos(pos, [shielded_pos.text()]),
                formatted_meaning: String::new(),
            };
        }

        let repaired = repair_gloss(&self.vocabulary, pos, meaning);
        let shielded = shield_brackets(&repaired);
        let extracted_pos = self.extracted_pos(pos, [shielded_pos.text(), shielded.text()]);

        let groups = self.groups_for(shielded.text());
        let body = if groups.is_empty() {
            self.untagged_line(pos, shielded.text())
        } else {
            groups
                .iter()
                .map(|group| self.group_line(group))
                .collect::<Vec<_>>()
                .join(&self.options.line_break)
        };

        FormattedEntry {
            extracted_pos,
            formatted_meaning: shielded.unshield(&body),
        }
    }

    pub fn format_dictionary_entry(&self, entry: &DictionaryEntry) -> FormattedEntry {
        self.format_entry(&entry.pos, &entry.meaning)
    }

    pub fn format_batch(&self, entries: &[DictionaryEntry]) -> Vec<FormattedEntry> {
        entries
            .iter()
            .map(|entry| self.format_dictionary_entry(entry))
            .collect()
    }

    /// Sense groups of the repaired, shielded gloss; placeholders stay in the text.
    pub fn sense_groups(&self, pos: &str, meaning: &str) -> Vec<SenseGroup> {
        let repaired = repair_gloss(&self.vocabulary, pos.trim(), meaning.trim());
        self.groups_for(shield_brackets(&repaired).text())
    }

    pub fn format_tag_list(&self, pos: &str) -> String {
        legacy::format_tag_list(pos, &self.options)
    }

    pub fn format_meaning_by_tags(&self, meaning: &str, pos: &str) -> String {
        legacy::format_meaning_by_tags(meaning, pos, &self.options)
    }

    fn groups_for(&self, shielded: &str) -> Vec<SenseGroup> {
        let occurrences = self.vocabulary.scan(shielded);
        group_occurrences(
            shielded,
            &occurrences,
            &self.connectors,
            self.options.borrow_empty_text,
        )
    }

    fn extracted_pos<'a>(&self, pos: &str, texts: impl IntoIterator<Item = &'a str>) -> String {
        let tags = self.vocabulary.unique_tags(texts);
        if tags.is_empty() {
            pos.to_string()
        } else {
            join_tags(&tags)
        }
    }

    fn group_line(&self, group: &SenseGroup) -> String {
        let tag = self.options.markup_tag(&group.display_tag());
        if group.text.is_empty() {
            tag
        } else {
            format!("{tag} {}", group.text)
        }
    }

    fn untagged_line(&self, pos: &str, text: &str) -> String {
        if pos.is_empty() {
            text.to_string()
        } else {
            format!("{} {text}", self.options.markup_tag(pos))
        }
    }
}

impl Default for EntryFormatter {
    fn default() -> Self {
        Self::new(Vocabulary::standard(), FormatOptions::default())
    }
}
