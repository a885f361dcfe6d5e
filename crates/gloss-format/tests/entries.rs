use std::collections::HashSet;

use gloss_format::{EntryFormatter, FormatOptions, Vocabulary, format_entry};

#[test]
fn single_tag_passes_through() {
    let out = format_entry("n.", "n. content");
    assert_eq!(out.extracted_pos, "n.");
    assert_eq!(out.formatted_meaning, "n. content");
}

#[test]
fn meaning_text_between_tags_breaks_lines() {
    let out = format_entry("v. & aux.", "v. do aux. should");
    assert_eq!(out.extracted_pos, "v. & aux.");
    assert_eq!(out.formatted_meaning, "v. do<br>aux. should");
}

#[test]
fn connector_keeps_tags_on_one_line() {
    let out = format_entry("v. & aux.", "v. & aux. should");
    assert_eq!(out.formatted_meaning, "v. & aux. should");
    assert!(!out.formatted_meaning.contains("<br>"));
}

#[test]
fn empty_entry_is_not_available() {
    let out = format_entry("", "");
    assert_eq!(out.extracted_pos, "N/A");
    assert_eq!(out.formatted_meaning, "N/A");
}

#[test]
fn bracket_content_is_returned_verbatim() {
    let out = format_entry("n.", "n. student [pl. students]");
    assert_eq!(out.extracted_pos, "n.");
    assert_eq!(out.formatted_meaning, "n. student [pl. students]");
}

#[test]
fn tags_inside_brackets_do_not_split_senses() {
    let out = format_entry("v.", "v. 研究 [n. 研究; adj. 研究的] v. 学习");
    assert_eq!(out.extracted_pos, "v.");
    assert_eq!(
        out.formatted_meaning,
        "v. 研究 [n. 研究; adj. 研究的]<br>v. 学习"
    );
}

#[test]
fn extracted_pos_is_deduplicated_in_first_appearance_order() {
    let out = format_entry("adj. n. adj.", "n. 红色 adj. 红的 v. 变红 n. 红");
    assert_eq!(out.extracted_pos, "adj. & n. & v.");
    assert_eq!(
        out.formatted_meaning,
        "n. 红色<br>adj. 红的<br>v. 变红<br>n. 红"
    );
}

#[test]
fn missing_declared_tag_is_repaired() {
    let out = format_entry("n. & vt.", "vt. 研究；调查");
    assert_eq!(out.extracted_pos, "n. & vt.");
    assert_eq!(out.formatted_meaning, "n. & vt. 研究；调查");
}

#[test]
fn tag_spelled_inside_another_tag_is_not_repaired() {
    let out = format_entry("v. adv.", "adv. quickly");
    assert_eq!(out.extracted_pos, "v. & adv.");
    assert_eq!(out.formatted_meaning, "adv. quickly");
}

#[test]
fn tag_spelled_inside_brackets_is_not_repaired() {
    let out = format_entry("n. v.", "v. 研究 [n. 研究]");
    assert_eq!(out.extracted_pos, "n. & v.");
    assert_eq!(out.formatted_meaning, "v. 研究 [n. 研究]");
}

#[test]
fn private_use_text_in_the_gloss_is_kept_verbatim() {
    let out = format_entry("n.", "n. a \u{E000}0\u{E001} b [x]");
    assert_eq!(out.formatted_meaning, "n. a \u{E000}0\u{E001} b [x]");
}

#[test]
fn text_before_the_first_tag_is_dropped() {
    let out = format_entry("", "hello n. world");
    assert_eq!(out.extracted_pos, "n.");
    assert_eq!(out.formatted_meaning, "n. world");
}

#[test]
fn empty_sense_borrows_sibling_text_unless_disabled() {
    let meaning = "n. & vt. 研究 adj.";
    let out = format_entry("", meaning);
    assert_eq!(out.formatted_meaning, "n. & vt. 研究<br>adj. 研究");

    let strict = EntryFormatter::new(
        Vocabulary::standard(),
        FormatOptions::default().with_borrow_empty_text(false),
    );
    let out = strict.format_entry("", meaning);
    assert_eq!(out.formatted_meaning, "n. & vt. 研究<br>adj.");
}

#[test]
fn reformatting_output_is_not_a_fixed_point() {
    let first = format_entry("v. & aux.", "v. do aux. should");
    let second = format_entry(&first.extracted_pos, &first.formatted_meaning);
    assert_eq!(second.extracted_pos, "v. & aux.");
    assert_eq!(second.formatted_meaning, "v. do<br><br>aux. should");
    assert_ne!(second.formatted_meaning, first.formatted_meaning);
}

#[test]
fn single_group_output_is_stable_when_reformatted() {
    let first = format_entry("v. & aux.", "v. & aux. should");
    let second = format_entry(&first.extracted_pos, &first.formatted_meaning);
    assert_eq!(second, first);
}

#[test]
fn meaning_without_pos_still_formats() {
    let out = format_entry("", "adj. 高兴的 adv. 高兴地");
    assert_eq!(out.extracted_pos, "adj. & adv.");
    assert_eq!(out.formatted_meaning, "adj. 高兴的<br>adv. 高兴地");
}

#[test]
fn meaning_without_pos_or_tags_passes_through() {
    let out = format_entry("", "  just text  ");
    assert_eq!(out.extracted_pos, "");
    assert_eq!(out.formatted_meaning, "just text");
}

#[test]
fn batch_output_has_no_duplicate_tags() {
    let formatter = EntryFormatter::default();
    let entries = [
        gloss_format::DictionaryEntry::new("n. v.", "v. 跑 n. 跑步 v. 奔跑"),
        gloss_format::DictionaryEntry::new("adj.", "[adj. 旧] adj. 新的"),
    ];
    for out in formatter.format_batch(&entries) {
        let tags: Vec<&str> = out.extracted_pos.split(" & ").collect();
        let unique: HashSet<&str> = tags.iter().copied().collect();
        assert_eq!(tags.len(), unique.len(), "{}", out.extracted_pos);
    }
}
