//! Flashcard deck output.
//!
//! The card list is handed to a [`DeckBuilder`]; the bundled [`TsvDeck`]
//! produces a tab-separated file that Anki imports directly, with the deck
//! name and tag column declared in its header lines.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::export::Flashcard;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck name must not be empty")]
    EmptyDeckName,
    #[error("deck name {0:?} must be a plain file name")]
    InvalidDeckName(String),
    #[error("failed to encode sentences for {word}: {source}")]
    Encode {
        word: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write deck {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turns an ordered card list into deck file bytes.
pub trait DeckBuilder {
    fn deck_name(&self) -> &str;

    /// File extension of the produced deck, without the dot.
    fn extension(&self) -> &'static str;

    fn build_deck(&self, cards: &[Flashcard]) -> Result<Vec<u8>, DeckError>;
}

/// Anki plain-text import format.
#[derive(Clone, Debug)]
pub struct TsvDeck {
    deck_name: String,
}

impl TsvDeck {
    pub fn new(deck_name: impl Into<String>) -> Result<Self, DeckError> {
        let deck_name = deck_name.into();
        if deck_name.trim().is_empty() {
            return Err(DeckError::EmptyDeckName);
        }
        if deck_name.contains(['/', '\\']) || matches!(deck_name.as_str(), "." | "..") {
            return Err(DeckError::InvalidDeckName(deck_name));
        }
        Ok(Self { deck_name })
    }
}

impl DeckBuilder for TsvDeck {
    fn deck_name(&self) -> &str {
        &self.deck_name
    }

    fn extension(&self) -> &'static str {
        "tsv"
    }

    fn build_deck(&self, cards: &[Flashcard]) -> Result<Vec<u8>, DeckError> {
        let mut out = String::new();
        out.push_str("#separator:tab\n");
        out.push_str("#html:true\n");
        out.push_str(&format!("#deck:{}\n", single_line(&self.deck_name)));
        out.push_str("#columns:Word\tReading\tTranslation\tSentences\tTags\n");
        out.push_str("#tags column:5\n");

        for card in cards {
            let sentences = serde_json::to_string(&card.sentences).map_err(|source| {
                DeckError::Encode {
                    word: card.word.clone(),
                    source,
                }
            })?;
            out.push_str(&[
                field(&card.word),
                field(&card.reading),
                field(&card.translation),
                field(&sentences),
                card.tag.as_str().to_string(),
            ]
            .join("\t"));
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

/// Tabs and line breaks would split a record.
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

/// A note field: one line, with markup characters escaped for `#html:true`.
fn field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in single_line(value).chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write the deck into `dir` as `<deck name>.<extension>`.
///
/// An empty card list writes nothing and returns `Ok(None)`.
pub fn write_deck<B: DeckBuilder>(
    builder: &B,
    cards: &[Flashcard],
    dir: impl AsRef<Path>,
) -> Result<Option<PathBuf>, DeckError> {
    if cards.is_empty() {
        info!("no flashcards selected; skipping deck");
        return Ok(None);
    }

    let dir = dir.as_ref();
    let path = dir.join(format!("{}.{}", builder.deck_name(), builder.extension()));
    let bytes = builder.build_deck(cards)?;
    fs::create_dir_all(dir)
        .and_then(|()| fs::write(&path, bytes))
        .map_err(|source| DeckError::Io {
            path: path.clone(),
            source,
        })?;
    info!("wrote {} cards to {}", cards.len(), path.display());
    Ok(Some(path))
}
