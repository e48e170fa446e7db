//! Folding token occurrences into a vocabulary index.
//!
//! Entries are keyed by normalized base and keep their variants in the order
//! surfaces were first seen. Both maps are insertion-ordered, so the first
//! `example_sentence_cap` sentences of a variant are always the earliest ones
//! and replaying the same stream reproduces the same index, key order included.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use shredder_types::TokenOccurrence;

use crate::config::PipelineConfig;

/// An occurrence that cannot be keyed. Nothing is mutated when it is returned.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum IngestError {
    #[error("occurrence in {source_label} has an empty normalized base (surface {surface:?})")]
    EmptyBase {
        surface: String,
        source_label: String,
    },
    #[error("occurrence in {source_label} has an empty surface (base {normalized_base:?})")]
    EmptySurface {
        normalized_base: String,
        source_label: String,
    },
}

/// One surface form under a base.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct VariantEntry {
    surface: String,
    occurrence_count: u64,
    example_sentences: Vec<String>,
}

impl VariantEntry {
    fn new(surface: &str) -> Self {
        Self {
            surface: surface.to_string(),
            occurrence_count: 0,
            example_sentences: Vec::new(),
        }
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn occurrence_count(&self) -> u64 {
        self.occurrence_count
    }

    /// Earliest sentences in ingestion order, never more than the cap.
    pub fn example_sentences(&self) -> &[String] {
        &self.example_sentences
    }
}

/// Everything known about one normalized base.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct VocabularyEntry {
    normalized_base: String,
    reading: Option<String>,
    translation: Option<String>,
    variants: IndexMap<String, VariantEntry>,
    total_count: u64,
}

impl VocabularyEntry {
    fn new(normalized_base: &str) -> Self {
        Self {
            normalized_base: normalized_base.to_string(),
            reading: None,
            translation: None,
            variants: IndexMap::new(),
            total_count: 0,
        }
    }

    pub fn normalized_base(&self) -> &str {
        &self.normalized_base
    }

    pub fn reading(&self) -> Option<&str> {
        self.reading.as_deref()
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn is_translated(&self) -> bool {
        self.translation.is_some()
    }

    /// Sum of all variant counts.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Variants in first-seen order.
    pub fn variants(&self) -> impl Iterator<Item = &VariantEntry> {
        self.variants.values()
    }

    pub fn variant(&self, surface: &str) -> Option<&VariantEntry> {
        self.variants.get(surface)
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    fn record(&mut self, occurrence: &TokenOccurrence, example_cap: usize) {
        if self.reading.is_none() {
            self.reading.clone_from(&occurrence.reading);
        }
        if self.translation.is_none() {
            self.translation.clone_from(&occurrence.translation);
        }

        let variant = self
            .variants
            .entry(occurrence.surface.clone())
            .or_insert_with(|| VariantEntry::new(&occurrence.surface));
        variant.occurrence_count += 1;
        if variant.example_sentences.len() < example_cap {
            variant.example_sentences.push(occurrence.sentence.clone());
        }
        self.total_count += 1;
    }
}

/// Ordered, single-entry-point fold over token occurrences.
#[derive(Clone, Debug)]
pub struct Aggregator {
    entries: IndexMap<String, VocabularyEntry>,
    example_cap: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(PipelineConfig::default().example_sentence_cap)
    }
}

impl Aggregator {
    pub fn new(example_cap: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            example_cap,
        }
    }

    pub fn with_config(config: &PipelineConfig) -> Self {
        Self::new(config.example_sentence_cap)
    }

    /// Fold one occurrence into the index.
    ///
    /// Reading and translation are first-writer-wins: a later occurrence only
    /// fills a value that is still missing, it never overwrites one.
    pub fn ingest(&mut self, occurrence: &TokenOccurrence) -> Result<(), IngestError> {
        if occurrence.normalized_base.is_empty() {
            return Err(IngestError::EmptyBase {
                surface: occurrence.surface.clone(),
                source_label: occurrence.source_label.clone(),
            });
        }
        if occurrence.surface.is_empty() {
            return Err(IngestError::EmptySurface {
                normalized_base: occurrence.normalized_base.clone(),
                source_label: occurrence.source_label.clone(),
            });
        }

        self.entries
            .entry(occurrence.normalized_base.clone())
            .or_insert_with(|| VocabularyEntry::new(&occurrence.normalized_base))
            .record(occurrence, self.example_cap);
        Ok(())
    }

    pub fn get(&self, normalized_base: &str) -> Option<&VocabularyEntry> {
        self.entries.get(normalized_base)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seal the fold. Classification, selection and reporting only accept the
    /// sealed [`Vocabulary`].
    pub fn finish(self) -> Vocabulary {
        Vocabulary {
            entries: self.entries,
            example_cap: self.example_cap,
        }
    }
}

/// Completed, read-only aggregation result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Vocabulary {
    entries: IndexMap<String, VocabularyEntry>,
    example_cap: usize,
}

impl Vocabulary {
    pub fn get(&self, normalized_base: &str) -> Option<&VocabularyEntry> {
        self.entries.get(normalized_base)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &VocabularyEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn example_cap(&self) -> usize {
        self.example_cap
    }
}
