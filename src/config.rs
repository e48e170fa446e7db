use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use thiserror::Error;

pub const DEFAULT_THRESHOLD: u32 = 5;
pub const DEFAULT_EXAMPLE_CAP: usize = 5;
pub const DEFAULT_DECK_NAME: &str = "generated_anki_deck";

/// Knobs of the aggregation core.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PipelineConfig {
    /// Minimum total occurrence count for flashcard export.
    pub threshold: u32,
    /// Example sentences kept per surface variant.
    pub example_sentence_cap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            example_sentence_cap: DEFAULT_EXAMPLE_CAP,
        }
    }
}

impl PipelineConfig {
    pub fn new(threshold: u32, example_sentence_cap: usize) -> Result<Self, ConfigError> {
        if threshold == 0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            example_sentence_cap,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("threshold must be >= 1, got {0}")]
    InvalidThreshold(u32),
    #[error("deck name must not be empty")]
    EmptyDeckName,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DictionaryMode {
    Mmap,
    Owned,
}

#[derive(Debug, Parser)]
#[command(name = "shredder")]
#[command(about = "Build a vocabulary corpus and flashcards from Japanese subtitles")]
pub struct Cli {
    /// Folder scanned for .ass, .srt and .txt inputs.
    #[arg(long, env = "SHREDDER_INPUT_DIR", default_value = "scripts")]
    pub input_dir: PathBuf,

    #[arg(long, env = "SHREDDER_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// JMdict-simplified JSON dictionary.
    #[arg(long, env = "SHREDDER_DICTIONARY", default_value = "dictionary.json")]
    pub dictionary: PathBuf,

    #[arg(long, value_enum, default_value_t = DictionaryMode::Mmap)]
    pub dictionary_mode: DictionaryMode,

    /// zstd-compressed vibrato system dictionary.
    #[arg(long, env = "SHREDDER_TOKENIZER_DICT")]
    pub tokenizer_dict: PathBuf,

    #[arg(long, env = "SHREDDER_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u32,

    #[arg(long, env = "SHREDDER_EXAMPLE_CAP", default_value_t = DEFAULT_EXAMPLE_CAP)]
    pub example_cap: usize,

    #[arg(long, default_value = DEFAULT_DECK_NAME)]
    pub deck_name: String,
}

impl Cli {
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        PipelineConfig::new(self.threshold, self.example_cap)
    }

    pub fn validate(&self) -> Result<PipelineConfig, ConfigError> {
        if self.deck_name.trim().is_empty() {
            return Err(ConfigError::EmptyDeckName);
        }
        self.pipeline_config()
    }
}
