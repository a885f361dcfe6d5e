use std::sync::LazyLock;

use gloss_types::BracketSpan;
use regex::{Captures, Regex};
use tracing::warn;

static BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]\n]*\]").expect("valid bracket regex"));

/// Gloss text with its `[...]` annotations swapped out for placeholders.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Shielded {
    text: String,
    spans: Vec<BracketSpan>,
    sentinel: char,
}

/// Replace each bracketed annotation with an opaque placeholder.
///
/// Placeholders are `<sentinel><id><sentinel>`, where the sentinel is the
/// first private-use character that does not occur in `input`, so no
/// placeholder can match text the caller supplied. Brackets are assumed not
/// to nest; an unmatched `[` stays in the text.
pub fn shield_brackets(input: &str) -> Shielded {
    let Some(sentinel) = free_sentinel(input) else {
        warn!("no free placeholder sentinel, leaving brackets unshielded");
        return Shielded {
            text: input.to_string(),
            spans: Vec::new(),
            sentinel: '\u{E000}',
        };
    };

    let mut spans = Vec::new();
    let text = BRACKET
        .replace_all(input, |caps: &Captures<'_>| {
            let id = spans.len();
            spans.push(BracketSpan {
                placeholder_id: id,
                original: caps[0].to_string(),
            });
            placeholder(sentinel, id)
        })
        .into_owned();
    Shielded {
        text,
        spans,
        sentinel,
    }
}

fn free_sentinel(input: &str) -> Option<char> {
    ('\u{E000}'..='\u{F8FF}')
        .chain('\u{F0000}'..='\u{FFFFD}')
        .find(|c| !input.contains(*c))
}

impl Shielded {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[BracketSpan] {
        &self.spans
    }

    /// Put the original annotations back into `formatted`.
    ///
    /// A placeholder that no longer appears is skipped; copies of a
    /// placeholder (a borrowed sense text) are all restored.
    pub fn unshield(&self, formatted: &str) -> String {
        let mut out = formatted.to_string();
        for span in &self.spans {
            let token = placeholder(self.sentinel, span.placeholder_id);
            if out.contains(&token) {
                out = out.replace(&token, &span.original);
            } else {
                warn!(
                    placeholder = span.placeholder_id,
                    original = %span.original,
                    "bracket placeholder lost during formatting"
                );
            }
        }
        out
    }
}

fn placeholder(sentinel: char, id: usize) -> String {
    format!("{sentinel}{id}{sentinel}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_each_bracket_in_order() {
        let shielded = shield_brackets("n. student [pl. students] [also n.]");
        assert_eq!(shielded.spans().len(), 2);
        assert_eq!(shielded.spans()[0].original, "[pl. students]");
        assert_eq!(shielded.spans()[1].placeholder_id, 1);
        assert!(!shielded.text().contains('['));
        assert!(!shielded.text().contains("pl."));
        assert!(shielded.text().starts_with("n. student "));
    }

    #[test]
    fn restores_verbatim() {
        let input = "v. run [past: ran] quickly [口语]";
        let shielded = shield_brackets(input);
        assert_eq!(shielded.unshield(shielded.text()), input);
    }

    #[test]
    fn leaves_text_without_brackets_alone() {
        let shielded = shield_brackets("adj. red; unmatched [ bracket");
        assert!(shielded.spans().is_empty());
        assert_eq!(shielded.text(), "adj. red; unmatched [ bracket");
    }

    #[test]
    fn missing_placeholder_is_skipped() {
        let shielded = shield_brackets("n. a [b] c [d]");
        let truncated = shielded.text().replace(&placeholder(shielded.sentinel, 0), "");
        assert_eq!(shielded.unshield(&truncated), "n. a  c [d]");
    }

    #[test]
    fn duplicated_placeholder_is_restored_everywhere() {
        let shielded = shield_brackets("[x]");
        let doubled = format!("{0}<br>{0}", shielded.text());
        assert_eq!(shielded.unshield(&doubled), "[x]<br>[x]");
    }

    #[test]
    fn sentinel_text_in_the_input_survives() {
        let input = "n. a \u{E000}0\u{E000} \u{E000}0\u{E001} b [x]";
        let shielded = shield_brackets(input);
        assert_eq!(shielded.spans().len(), 1);
        assert_ne!(shielded.sentinel, '\u{E000}');
        assert_ne!(shielded.sentinel, '\u{E001}');
        assert_eq!(shielded.unshield(shielded.text()), input);
    }

    #[test]
    fn placeholder_keeps_following_tag_on_a_boundary() {
        let shielded = shield_brackets("[note]n. book");
        let occs = crate::Vocabulary::standard().scan(shielded.text());
        assert_eq!(occs.len(), 1);
    }
}
