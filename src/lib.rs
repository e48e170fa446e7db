//! Vocabulary shredder: folds tokenized subtitle lines into a frequency
//! corpus, flags homophone bases, and selects flashcards.
//!
//! # Example
//! ```no_run
//! use shredder::{PipelineConfig, TsvDeck, write_deck, write_reports};
//! use shredder::pipeline::Pipeline;
//! use shredder_dict::Dictionary;
//! use shredder_tokenize::VibratoAnalyzer;
//!
//! # fn main() -> anyhow::Result<()> {
//! let analyzer = VibratoAnalyzer::load("system.dic.zst")?;
//! let dictionary = Dictionary::load("dictionary.json")?;
//! let config = PipelineConfig::default();
//! let documents = shredder_subs::discover("scripts")?
//!     .iter()
//!     .map(shredder_subs::read_document)
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let run = Pipeline::new(analyzer, &dictionary, config).run(documents);
//! let out = run.materialize(&config);
//! write_reports(&out.report, "output")?;
//! write_deck(&TsvDeck::new("anime")?, &out.flashcards, "output")?;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod ambiguity;
pub mod config;
pub mod deck;
pub mod export;
pub mod pipeline;
pub mod report;

pub use aggregate::{Aggregator, IngestError, VariantEntry, Vocabulary, VocabularyEntry};
pub use ambiguity::{AmbiguityGroup, ambiguity_groups, classify, flagged_bases, reading_key};
pub use config::{ConfigError, PipelineConfig};
pub use deck::{DeckBuilder, DeckError, TsvDeck, write_deck};
pub use export::{Flashcard, FrequencyTag, flashcards, rank_order, select_for_export};
pub use pipeline::{Materialized, Pipeline, RunOutput, SourceLog, SourceToken, fold_occurrences};
pub use report::{Report, ReportError, write_reports};
pub use shredder_types::TokenOccurrence;
