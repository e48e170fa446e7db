use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use shredder_dict::{Dictionary, LoadMode};
use shredder_types::Resolver;

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p shredder-dict --example stats -- <dictionary.json> [word...]")?;

    let dict = Dictionary::load_with_mode(&path, LoadMode::Mmap)
        .with_context(|| format!("loading dictionary from {}", path.display()))?;

    println!("Dictionary   : {}", path.display());
    println!("Words        : {}", dict.word_count());
    println!("Written forms: {}", dict.form_count());

    let words: Vec<String> = env::args().skip(2).collect();
    let words = if words.is_empty() {
        vec!["食べる".to_string(), "すごい".to_string()]
    } else {
        words
    };
    for word in words {
        match dict.lookup(&word) {
            Some(hit) => println!(
                "{word}\t{}\t{}",
                hit.reading,
                hit.translation.as_deref().unwrap_or("-")
            ),
            None => println!("{word}\tnot found"),
        }
    }

    Ok(())
}
