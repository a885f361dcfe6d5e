//! Coarse separator-based formatting kept for callers that only need a tag
//! column or a positional pairing of tags and meanings.

use std::sync::LazyLock;

use regex::Regex;

use crate::options::FormatOptions;

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;\s]+").expect("valid separator regex"));

fn split_items(raw: &str) -> Vec<&str> {
    SEPARATOR.split(raw).filter(|s| !s.is_empty()).collect()
}

/// Put each whitespace or `;` separated item of `pos` on its own line.
pub fn format_tag_list(pos: &str, options: &FormatOptions) -> String {
    split_items(pos).join(&options.line_break)
}

/// Pair pos items with meaning parts by position.
///
/// Returns `meaning` untouched when pos has at most one item or the meaning
/// has fewer parts than pos; extra meaning parts are emitted untagged.
pub fn format_meaning_by_tags(meaning: &str, pos: &str, options: &FormatOptions) -> String {
    if meaning.trim().is_empty() {
        return "-".to_string();
    }
    let tags = split_items(pos);
    if tags.len() <= 1 {
        return meaning.to_string();
    }
    let parts = split_items(meaning);
    if parts.len() < tags.len() {
        return meaning.to_string();
    }

    let mut lines = Vec::with_capacity(parts.len());
    for (idx, part) in parts.iter().enumerate() {
        match tags.get(idx) {
            Some(tag) => lines.push(format!("{} {part}", options.markup_tag(tag))),
            None => lines.push(part.to_string()),
        }
    }
    lines.join(&options.line_break)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_tag_lists_on_space_and_semicolon() {
        let opts = FormatOptions::default();
        assert_eq!(format_tag_list("n.; v.  adj.", &opts), "n.<br>v.<br>adj.");
        assert_eq!(format_tag_list(" ", &opts), "");
        assert_eq!(format_tag_list("n.", &opts), "n.");
    }

    #[test]
    fn pairs_tags_with_meaning_parts() {
        let opts = FormatOptions::default();
        assert_eq!(
            format_meaning_by_tags("书;预订;册", "n.; v.", &opts),
            "n. 书<br>v. 预订<br>册"
        );
    }

    #[test]
    fn falls_back_to_unpaired_meaning() {
        let opts = FormatOptions::default();
        assert_eq!(format_meaning_by_tags("书", "n. v.", &opts), "书");
        assert_eq!(format_meaning_by_tags("书 本", "n.", &opts), "书 本");
        assert_eq!(format_meaning_by_tags("书 本", "", &opts), "书 本");
        assert_eq!(format_meaning_by_tags("", "n. v.", &opts), "-");
    }
}
