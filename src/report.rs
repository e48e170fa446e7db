//! Rendering the sealed run into report views and files.
//!
//! [`Report::build`] only copies and orders what the aggregation, ambiguity
//! and export passes already decided. [`write_reports`] serializes the views:
//! tab-separated text for reading, JSON for downstream tooling.

use std::collections::{BTreeSet, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use shredder_morph::annotate_surface_meaning;
use thiserror::Error;
use tracing::info;

use crate::aggregate::{Vocabulary, VocabularyEntry};
use crate::ambiguity::AmbiguityGroup;
use crate::export::rank_order;
use crate::pipeline::{SourceLog, SourceToken};

pub const SOURCES_FILE: &str = "output.txt";
pub const FREQUENCY_FILE: &str = "frequency_output.txt";
pub const UNTRANSLATABLE_FILE: &str = "scrap.txt";
pub const AMBIGUOUS_TEXT_FILE: &str = "ambiguous_entries.txt";
pub const AMBIGUOUS_JSON_FILE: &str = "ambiguous_entries.json";
pub const VOCABULARY_JSON_FILE: &str = "output_data.json";
pub const EXPORT_JSON_FILE: &str = "export_data.json";

const RULE_WIDTH: usize = 80;
const SCRAP_RULE_WIDTH: usize = 60;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {file}: {source}")]
    Json {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TokenRow {
    pub surface: String,
    pub normalized_base: String,
    /// Analyzer lemma of the surface, when the token came from an analyzer.
    pub potential_base: Option<String>,
    pub reading: Option<String>,
    pub translation: Option<String>,
    pub sentence: String,
}

impl From<&SourceToken> for TokenRow {
    fn from(token: &SourceToken) -> Self {
        let o = &token.occurrence;
        Self {
            surface: o.surface.clone(),
            normalized_base: o.normalized_base.clone(),
            potential_base: token.potential_base.clone(),
            reading: o.reading.clone(),
            translation: o.translation.clone(),
            sentence: o.sentence.clone(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SourceListing {
    pub source_label: String,
    pub tokens: Vec<TokenRow>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub normalized_base: String,
    pub reading: Option<String>,
    pub translation: Option<String>,
    pub total_count: u64,
    /// Earliest retained example sentence of the entry.
    pub sample_sentence: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct VariantGroup {
    pub surface: String,
    pub surface_meaning: Option<String>,
    pub occurrence_count: u64,
    pub example_sentences: Vec<String>,
}

/// base → reading, translation → variants → example sentences.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct WordGroup {
    pub normalized_base: String,
    pub reading: Option<String>,
    pub translation: Option<String>,
    pub total_count: u64,
    pub variants: Vec<VariantGroup>,
}

impl WordGroup {
    fn from_entry(entry: &VocabularyEntry) -> Self {
        Self {
            normalized_base: entry.normalized_base().to_string(),
            reading: entry.reading().map(str::to_string),
            translation: entry.translation().map(str::to_string),
            total_count: entry.total_count(),
            variants: entry
                .variants()
                .map(|variant| VariantGroup {
                    surface: variant.surface().to_string(),
                    surface_meaning: entry.translation().map(|meaning| {
                        annotate_surface_meaning(
                            entry.normalized_base(),
                            variant.surface(),
                            meaning,
                        )
                    }),
                    occurrence_count: variant.occurrence_count(),
                    example_sentences: variant.example_sentences().to_vec(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AmbiguityView {
    /// Every flagged base, ascending.
    pub flagged: Vec<String>,
    pub groups: Vec<AmbiguityGroup>,
    /// Full entries of the flagged bases, ascending by base.
    pub entries: Vec<WordGroup>,
    /// Every accepted token of a flagged base, in arrival order.
    pub occurrences: Vec<TokenRow>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Report {
    pub sources: Vec<SourceListing>,
    pub frequency: Vec<FrequencyRow>,
    /// Untranslated bases, ascending.
    pub untranslatable: Vec<String>,
    /// Tokens of untranslated bases per source. Sources without any are left out.
    pub untranslatable_by_source: Vec<SourceListing>,
    pub export: Vec<WordGroup>,
    pub vocabulary: Vec<WordGroup>,
    pub ambiguous: AmbiguityView,
}

impl Report {
    pub fn build(
        vocabulary: &Vocabulary,
        sources: &SourceLog,
        flagged: &BTreeSet<String>,
        groups: &[AmbiguityGroup],
        selected: &[&VocabularyEntry],
    ) -> Self {
        let listings: Vec<SourceListing> = sources
            .iter()
            .map(|(label, tokens)| SourceListing {
                source_label: label.to_string(),
                tokens: tokens.iter().map(TokenRow::from).collect(),
            })
            .collect();

        let mut ranked: Vec<&VocabularyEntry> = vocabulary.iter().collect();
        ranked.sort_by(|a, b| rank_order(a, b));

        let frequency = ranked
            .iter()
            .map(|entry| FrequencyRow {
                normalized_base: entry.normalized_base().to_string(),
                reading: entry.reading().map(str::to_string),
                translation: entry.translation().map(str::to_string),
                total_count: entry.total_count(),
                sample_sentence: entry
                    .variants()
                    .find_map(|variant| variant.example_sentences().first())
                    .cloned(),
            })
            .collect();

        let untranslatable: BTreeSet<String> = vocabulary
            .iter()
            .filter(|entry| !entry.is_translated())
            .map(|entry| entry.normalized_base().to_string())
            .collect();

        let untranslatable_by_source = listings
            .iter()
            .map(|listing| SourceListing {
                source_label: listing.source_label.clone(),
                tokens: listing
                    .tokens
                    .iter()
                    .filter(|row| untranslatable.contains(&row.normalized_base))
                    .cloned()
                    .collect(),
            })
            .filter(|listing| !listing.tokens.is_empty())
            .collect();

        let ambiguous = AmbiguityView {
            flagged: flagged.iter().cloned().collect(),
            groups: groups.to_vec(),
            entries: flagged
                .iter()
                .filter_map(|base| vocabulary.get(base))
                .map(WordGroup::from_entry)
                .collect(),
            occurrences: sources
                .tokens()
                .filter(|token| flagged.contains(&token.occurrence.normalized_base))
                .map(TokenRow::from)
                .collect(),
        };

        Self {
            sources: listings,
            frequency,
            untranslatable: untranslatable.into_iter().collect(),
            untranslatable_by_source,
            export: selected.iter().map(|e| WordGroup::from_entry(e)).collect(),
            vocabulary: ranked.iter().map(|e| WordGroup::from_entry(e)).collect(),
            ambiguous,
        }
    }

    /// Per-source token listing. The count line tells how many tokens
    /// repeat a surface already listed earlier in the run.
    pub fn render_sources(&self) -> String {
        let mut out = String::from("Vocabulary by source file:\n\n");
        let mut seen: HashSet<&str> = HashSet::new();
        for listing in &self.sources {
            let kept = listing.tokens.len();
            let new_surfaces = listing
                .tokens
                .iter()
                .filter(|row| seen.insert(row.surface.as_str()))
                .count();
            let _ = writeln!(out, "=== {} ===", listing.source_label);
            let _ = writeln!(
                out,
                "Tokens kept: {kept}, Repeated surfaces: {}, New surfaces: {new_surfaces}",
                kept - new_surfaces
            );
            out.push_str("Token\tBase\tReading\tTranslation\tSentence\n");
            out.push_str(&"-".repeat(RULE_WIDTH));
            out.push('\n');
            for row in &listing.tokens {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    row.surface,
                    row.normalized_base,
                    or_dash(row.reading.as_deref()),
                    or_dash(row.translation.as_deref()),
                    row.sentence
                );
            }
            out.push('\n');
        }
        out
    }

    pub fn render_frequency(&self) -> String {
        let mut out = String::from("Vocabulary by frequency (descending):\n\n");
        for row in &self.frequency {
            let _ = write!(
                out,
                "{}\t{}\t{}\tFrequency: {}",
                row.normalized_base,
                or_dash(row.reading.as_deref()),
                or_dash(row.translation.as_deref()),
                row.total_count
            );
            if let Some(sample) = &row.sample_sentence {
                let _ = write!(out, "\tSample: {sample}");
            }
            out.push('\n');
        }
        out
    }

    pub fn render_untranslatable(&self) -> String {
        let mut out = String::from("Untranslatable tokens (grouped by source file):\n\n");
        for listing in &self.untranslatable_by_source {
            let _ = writeln!(out, "=== {} ===", listing.source_label);
            out.push_str("Token\tReading\tSentence\n");
            out.push_str(&"-".repeat(SCRAP_RULE_WIDTH));
            out.push('\n');
            for row in &listing.tokens {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}",
                    row.surface,
                    or_dash(row.reading.as_deref()),
                    row.sentence
                );
            }
            out.push('\n');
        }
        out
    }

    pub fn render_ambiguous(&self) -> String {
        let mut out = String::from("Ambiguous entries for manual review:\n\n");
        for group in &self.ambiguous.groups {
            let _ = writeln!(out, "Reading: {}", group.key);
            for base in &group.members {
                let Some(word) = self.ambiguous.entries.iter().find(|w| &w.normalized_base == base)
                else {
                    continue;
                };
                let _ = writeln!(
                    out,
                    "  Base: {}, Reading: {}, Translation: {}, Count: {}",
                    word.normalized_base,
                    or_dash(word.reading.as_deref()),
                    or_dash(word.translation.as_deref()),
                    word.total_count
                );
                for row in self
                    .ambiguous
                    .occurrences
                    .iter()
                    .filter(|row| &row.normalized_base == base)
                {
                    let _ = writeln!(
                        out,
                        "    Potential Base: {}, Sentence: {}",
                        or_dash(row.potential_base.as_deref()),
                        row.sentence
                    );
                }
            }
            out.push('\n');
        }
        out
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Write every report view into `dir`, creating it if needed.
pub fn write_reports(report: &Report, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ReportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let texts = [
        (SOURCES_FILE, report.render_sources()),
        (FREQUENCY_FILE, report.render_frequency()),
        (UNTRANSLATABLE_FILE, report.render_untranslatable()),
        (AMBIGUOUS_TEXT_FILE, report.render_ambiguous()),
        (VOCABULARY_JSON_FILE, to_json(VOCABULARY_JSON_FILE, &report.vocabulary)?),
        (EXPORT_JSON_FILE, to_json(EXPORT_JSON_FILE, &report.export)?),
        (AMBIGUOUS_JSON_FILE, to_json(AMBIGUOUS_JSON_FILE, &report.ambiguous)?),
    ];

    let mut written = Vec::with_capacity(texts.len());
    for (name, contents) in texts {
        let path = dir.join(name);
        fs::write(&path, contents).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    info!("wrote {} report files to {}", written.len(), dir.display());
    Ok(written)
}

fn to_json<T: Serialize + ?Sized>(file: &'static str, value: &T) -> Result<String, ReportError> {
    serde_json::to_string_pretty(value).map_err(|source| ReportError::Json { file, source })
}
