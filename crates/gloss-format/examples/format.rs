use std::env;

use anyhow::{Context, Result, bail};
use gloss_format::{EntryFormatter, FormatOptions, Vocabulary, split_gloss};

const USAGE: &str =
    "usage: cargo run -p gloss-format --example format -- [--no-borrow] <pos> <meaning> | --demo";

fn main() -> Result<()> {
    let mut borrow = true;
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--no-borrow" => borrow = false,
            _ => positional.push(arg),
        }
    }

    let entries: Vec<(String, String)> = match positional.as_slice() {
        [flag] if flag == "--demo" => vec![
            ("n.".into(), "n. content".into()),
            ("v. & aux.".into(), "v. do aux. should".into()),
            ("v. & aux.".into(), "v. & aux. should".into()),
            ("n.".into(), "n. student [pl. students]".into()),
            ("n. & vt.".into(), "vt. 研究；调查".into()),
            ("".into(), "n. & vt. 研究 adj.".into()),
            ("adj.".into(), "adj. 满意的//I am content。我很满足。词根记忆：con+tent".into()),
        ],
        [pos, meaning] => vec![(pos.clone(), meaning.clone())],
        [] => bail!(USAGE),
        _ => bail!("too many arguments\n{USAGE}"),
    };

    let options = FormatOptions::default()
        .with_line_break("\n    ")
        .context("building options")?
        .with_borrow_empty_text(borrow);
    let formatter = EntryFormatter::new(Vocabulary::standard(), options);

    for (pos, meaning) in entries {
        let parts = split_gloss(&meaning);
        let out = formatter.format_entry(&pos, &parts.meaning);
        println!("\npos:     {pos:?}\nmeaning: {meaning:?}");
        println!("  tags:  {}", out.extracted_pos);
        println!("  senses:\n    {}", out.formatted_meaning);
        if !parts.example_en.is_empty() {
            println!("  example: {} / {}", parts.example_en, parts.example_cn);
        }
        if !parts.mnemonic.is_empty() {
            println!("  mnemonic: {}", parts.mnemonic);
        }
    }

    Ok(())
}
