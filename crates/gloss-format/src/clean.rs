//! Separate the extra material that upstream imports pack into the gloss
//! field: an example after `//`, a `词根记忆：` mnemonic, and numbered
//! collocations.

use std::sync::LazyLock;

use gloss_types::GlossParts;
use regex::Regex;

const EXAMPLE_MARKER: &str = "//";
const MNEMONIC_MARKER: &str = "词根记忆：";

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[．.]").expect("valid numbered item regex"));

pub fn split_gloss(raw: &str) -> GlossParts {
    let (example_en, example_cn) = example(raw);
    GlossParts {
        meaning: meaning(raw),
        example_en,
        example_cn,
        mnemonic: mnemonic(raw),
        collocation: collocation(raw),
    }
}

fn meaning(raw: &str) -> String {
    let mut text = cut_at(raw, EXAMPLE_MARKER).trim();
    text = cut_at(text, MNEMONIC_MARKER).trim();
    if let Some(m) = NUMBERED_ITEM.find(text) {
        text = text[..m.start()].trim();
    }
    // A trailing `；` clause holds notes rather than senses.
    if let Some(idx) = text.rfind('；') {
        text = &text[..idx];
    }
    text.trim().to_string()
}

fn example(raw: &str) -> (String, String) {
    let Some(idx) = raw.find(EXAMPLE_MARKER) else {
        return (String::new(), String::new());
    };
    let rest = cut_at(&raw[idx + EXAMPLE_MARKER.len()..], MNEMONIC_MARKER).trim();
    let mut sentences = rest.split('。');
    match (sentences.next(), sentences.next()) {
        (Some(en), Some(cn)) => (en.trim().to_string(), cn.trim().to_string()),
        _ => (rest.to_string(), String::new()),
    }
}

fn mnemonic(raw: &str) -> String {
    let Some(idx) = raw.find(MNEMONIC_MARKER) else {
        return String::new();
    };
    let rest = &raw[idx + MNEMONIC_MARKER.len()..];
    let end = NUMBERED_ITEM.find(rest).map_or(rest.len(), |m| m.start());
    rest[..end].trim().to_string()
}

fn collocation(raw: &str) -> String {
    NUMBERED_ITEM
        .find(raw)
        .map(|m| raw[m.start()..].trim().to_string())
        .unwrap_or_default()
}

fn cut_at<'a>(text: &'a str, marker: &str) -> &'a str {
    text.find(marker).map_or(text, |idx| &text[..idx])
}
