//! Load JMdict-simplified dictionaries and answer base-form lookups.
//!
//! The loader reads the `jmdict-eng` JSON export (`{"words": [...]}`), keeps
//! the first English gloss of every word as its translation, and indexes every
//! kanji and kana writing. Kana writings read as themselves; kanji writings
//! take the first kana form whose `appliesToKanji` list names them (or `*`).
//! Callers choose between memory-mapped files or owned buffers at runtime via
//! [`LoadMode`].
//!
//! # Example
//! ```no_run
//! use shredder_dict::{Dictionary, LoadMode};
//! use shredder_types::Resolver;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = Dictionary::load_with_mode("dictionary.json", LoadMode::Mmap)?;
//! if let Some(hit) = dict.lookup("食べる") {
//!     println!("{} {:?}", hit.reading, hit.translation);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p shredder-dict --example stats -- <dictionary.json>`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use memmap2::Mmap;
use serde::Deserialize;
use shredder_types::{Resolution, Resolver};
use tracing::{info, warn};

/// Strategy for loading the dictionary file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the JSON file.
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// One reading/translation pair for a written form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DictRecord {
    pub reading: String,
    pub translation: Option<String>,
}

#[derive(Deserialize)]
struct RawDictionary {
    #[serde(default)]
    words: Vec<RawWord>,
}

#[derive(Deserialize)]
struct RawWord {
    #[serde(default)]
    kanji: Vec<RawKanji>,
    #[serde(default)]
    kana: Vec<RawKana>,
    #[serde(default)]
    sense: Vec<RawSense>,
}

#[derive(Deserialize)]
struct RawKanji {
    text: Option<String>,
}

#[derive(Deserialize)]
struct RawKana {
    text: Option<String>,
    #[serde(default, rename = "appliesToKanji")]
    applies_to_kanji: Vec<String>,
}

#[derive(Deserialize)]
struct RawSense {
    #[serde(default)]
    gloss: Vec<RawGloss>,
}

#[derive(Deserialize)]
struct RawGloss {
    lang: Option<String>,
    text: Option<String>,
}

/// In-memory index from written form to its dictionary records.
#[derive(Debug, Default)]
pub struct Dictionary {
    forms: HashMap<String, Vec<DictRecord>>,
    word_count: usize,
}

impl Dictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a dictionary, memory-mapping the source file.
    ///
    /// A missing file yields an empty dictionary with a warning: every token
    /// then lands in the untranslatable report instead of aborting the run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(path, LoadMode::Mmap)
    }

    /// Load a dictionary choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "dictionary not found at {}; using an empty dictionary",
                path.display()
            );
            return Ok(Self::empty());
        }
        let buffer = load_file(path, mode)?;
        let dict = Self::from_slice(buffer.as_slice())
            .with_context(|| format!("parse dictionary {}", path.display()))?;
        info!(
            "loaded {} dictionary words ({} written forms)",
            dict.word_count,
            dict.forms.len()
        );
        Ok(dict)
    }

    /// Parse a JMdict-simplified JSON document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: RawDictionary = serde_json::from_slice(bytes)?;
        let mut forms: HashMap<String, Vec<DictRecord>> = HashMap::new();
        let word_count = raw.words.len();

        for word in raw.words {
            let translation = first_english_gloss(&word.sense);

            for kana in &word.kana {
                let Some(text) = kana.text.as_deref() else {
                    continue;
                };
                forms.entry(text.to_string()).or_default().push(DictRecord {
                    reading: text.to_string(),
                    translation: translation.clone(),
                });
            }

            for kanji in &word.kanji {
                let Some(text) = kanji.text.as_deref() else {
                    continue;
                };
                let reading = word
                    .kana
                    .iter()
                    .filter(|k| {
                        k.applies_to_kanji
                            .iter()
                            .any(|applies| applies == text || applies == "*")
                    })
                    .find_map(|k| k.text.clone())
                    .unwrap_or_else(|| text.to_string());
                forms.entry(text.to_string()).or_default().push(DictRecord {
                    reading,
                    translation: translation.clone(),
                });
            }
        }

        Ok(Self { forms, word_count })
    }

    /// All records for a written form, in dictionary order.
    pub fn records(&self, word: &str) -> &[DictRecord] {
        self.forms.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Primary record for a written form; later records are ignored.
    pub fn get(&self, word: &str) -> Option<&DictRecord> {
        self.records(word).first()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.forms.contains_key(word)
    }

    /// Number of `words` entries in the source file.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Number of distinct written forms indexed.
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Resolver for Dictionary {
    fn lookup(&self, word: &str) -> Option<Resolution> {
        self.get(word).map(|record| Resolution {
            reading: record.reading.clone(),
            translation: record.translation.clone(),
        })
    }
}

/// First English gloss across all senses, cut at the first `;`.
fn first_english_gloss(senses: &[RawSense]) -> Option<String> {
    senses
        .iter()
        .flat_map(|sense| sense.gloss.iter())
        .filter(|gloss| gloss.lang.as_deref() == Some("eng"))
        .find_map(|gloss| gloss.text.as_deref().filter(|t| !t.is_empty()))
        .and_then(|text| text.split(';').next())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}
