use std::borrow::Cow;

use gloss_types::PartOfSpeech;
use tracing::debug;

use crate::shield::shield_brackets;
use crate::vocabulary::Vocabulary;

/// Prefix tags that `pos` declares but `gloss` lacks.
///
/// A declared tag counts as present when its label appears anywhere in the
/// raw gloss, brackets and longer tags included. Repair only applies when the
/// gloss already carries at least one recognized tag outside brackets; a gloss
/// with no tags at all is left for the pos fallback. Missing tags are
/// prepended in declared order and the rest of the gloss is untouched.
pub fn repair_gloss<'a>(vocabulary: &Vocabulary, pos: &str, gloss: &'a str) -> Cow<'a, str> {
    let declared = vocabulary.unique_tags([shield_brackets(pos).text()]);
    if declared.is_empty() {
        return Cow::Borrowed(gloss);
    }

    if vocabulary.scan(shield_brackets(gloss).text()).is_empty() {
        return Cow::Borrowed(gloss);
    }

    let missing: Vec<PartOfSpeech> = declared
        .into_iter()
        .filter(|tag| !gloss.contains(tag.label()))
        .collect();
    if missing.is_empty() {
        return Cow::Borrowed(gloss);
    }

    let prefix = missing
        .iter()
        .map(|tag| tag.label())
        .collect::<Vec<_>>()
        .join(" ");
    debug!(missing = %prefix, "prefixing tags absent from gloss");
    Cow::Owned(format!("{prefix} {gloss}"))
}
