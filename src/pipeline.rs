//! Wiring between the collaborators and the aggregation core.
//!
//! Collaborators are injected once per run: an [`Analyzer`] splits sentences,
//! the [`Normalizer`] filters tokens and picks base forms, and a [`Resolver`]
//! supplies readings and translations. Occurrences reach the [`Aggregator`]
//! through one ordered loop, document by document and sentence by sentence.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use shredder_morph::Normalizer;
use shredder_types::{Analyzer, Resolver, SourceDocument, TokenOccurrence};
use tracing::{debug, info, warn};

use crate::aggregate::{Aggregator, Vocabulary};
use crate::ambiguity::{AmbiguityGroup, ambiguity_groups, flagged_bases};
use crate::config::PipelineConfig;
use crate::export::{Flashcard, flashcards, select_for_export};
use crate::report::Report;

/// An accepted occurrence plus the analyzer's lemma for its surface.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceToken {
    pub occurrence: TokenOccurrence,
    /// Dictionary form reported by the analyzer. Differs from the base for
    /// kana surfaces, whose normalization is deferred.
    pub potential_base: Option<String>,
}

impl From<TokenOccurrence> for SourceToken {
    fn from(occurrence: TokenOccurrence) -> Self {
        Self {
            occurrence,
            potential_base: None,
        }
    }
}

/// Accepted tokens grouped by source, both levels in arrival order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SourceLog {
    sources: IndexMap<String, Vec<SourceToken>>,
}

impl SourceLog {
    pub fn record(&mut self, token: SourceToken) {
        self.sources
            .entry(token.occurrence.source_label.clone())
            .or_default()
            .push(token);
    }

    /// Make a source visible even when it yields no tokens.
    pub fn touch(&mut self, source_label: &str) {
        self.sources.entry(source_label.to_string()).or_default();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SourceToken])> {
        self.sources
            .iter()
            .map(|(label, tokens)| (label.as_str(), tokens.as_slice()))
    }

    /// Every token of every source, in arrival order.
    pub fn tokens(&self) -> impl Iterator<Item = &SourceToken> {
        self.sources.values().flatten()
    }

    pub fn get(&self, source_label: &str) -> Option<&[SourceToken]> {
        self.sources.get(source_label).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Sealed state of a finished run.
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub vocabulary: Vocabulary,
    pub sources: SourceLog,
    /// Occurrences rejected as malformed.
    pub skipped: usize,
}

/// Everything derived from a run: the report views and the flashcards.
#[derive(Clone, Debug)]
pub struct Materialized {
    pub report: Report,
    pub flashcards: Vec<Flashcard>,
}

impl RunOutput {
    /// Classify, select and render the sealed vocabulary.
    pub fn materialize(&self, config: &PipelineConfig) -> Materialized {
        let groups: Vec<AmbiguityGroup> = ambiguity_groups(&self.vocabulary);
        let flagged: BTreeSet<String> = flagged_bases(&groups);
        let selected = select_for_export(&self.vocabulary, &flagged, config.threshold);
        info!(
            "{} entries, {} ambiguous, {} selected for export (threshold {})",
            self.vocabulary.len(),
            flagged.len(),
            selected.len(),
            config.threshold
        );
        let cards = flashcards(&selected, config.example_sentence_cap, config.threshold);
        let report = Report::build(&self.vocabulary, &self.sources, &flagged, &groups, &selected);
        Materialized {
            report,
            flashcards: cards,
        }
    }
}

/// Fold an ordered occurrence stream, skipping malformed records.
pub fn fold_occurrences<I>(occurrences: I, config: &PipelineConfig) -> RunOutput
where
    I: IntoIterator<Item = TokenOccurrence>,
{
    fold_into(
        SourceLog::default(),
        occurrences.into_iter().map(SourceToken::from),
        config,
    )
}

fn fold_into<I>(mut sources: SourceLog, tokens: I, config: &PipelineConfig) -> RunOutput
where
    I: IntoIterator<Item = SourceToken>,
{
    let mut aggregator = Aggregator::with_config(config);
    let mut skipped = 0usize;
    for token in tokens {
        match aggregator.ingest(&token.occurrence) {
            Ok(()) => sources.record(token),
            Err(err) => {
                warn!("skipping malformed occurrence: {err}");
                skipped += 1;
            }
        }
    }
    RunOutput {
        vocabulary: aggregator.finish(),
        sources,
        skipped,
    }
}

pub struct Pipeline<A, R> {
    analyzer: A,
    resolver: R,
    normalizer: Normalizer,
    config: PipelineConfig,
}

impl<A: Analyzer, R: Resolver> Pipeline<A, R> {
    pub fn new(analyzer: A, resolver: R, config: PipelineConfig) -> Self {
        Self {
            analyzer,
            resolver,
            normalizer: Normalizer::new(),
            config,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Tokens of one sentence, in analyzer order.
    pub fn sentence_tokens(&self, source_label: &str, sentence: &str) -> Vec<SourceToken> {
        let morphemes = self.analyzer.analyze(sentence);
        morphemes
            .iter()
            .filter_map(|m| self.normalizer.resolve(m))
            .map(|candidate| {
                let resolution = self.resolver.lookup(candidate.base);
                let (reading, translation) = match resolution {
                    Some(hit) => (Some(hit.reading), hit.translation),
                    None => (None, None),
                };
                SourceToken {
                    occurrence: TokenOccurrence {
                        surface: candidate.surface.to_string(),
                        normalized_base: candidate.base.to_string(),
                        reading,
                        translation,
                        source_label: source_label.to_string(),
                        sentence: sentence.to_string(),
                    },
                    potential_base: Some(candidate.potential_base.to_string()),
                }
            })
            .collect()
    }

    /// Token records for one sentence, in analyzer order.
    pub fn sentence_occurrences(&self, source_label: &str, sentence: &str) -> Vec<TokenOccurrence> {
        self.sentence_tokens(source_label, sentence)
            .into_iter()
            .map(|token| token.occurrence)
            .collect()
    }

    /// Tokens of a whole document, sentence by sentence.
    pub fn document_tokens(&self, document: &SourceDocument) -> Vec<SourceToken> {
        let tokens: Vec<SourceToken> = document
            .sentences
            .iter()
            .flat_map(|sentence| self.sentence_tokens(&document.label, sentence))
            .collect();
        info!(
            "{}: {} sentences, {} tokens kept",
            document.label,
            document.sentences.len(),
            tokens.len()
        );
        tokens
    }

    /// Analyze every document in order and fold the result.
    pub fn run<I>(&self, documents: I) -> RunOutput
    where
        I: IntoIterator<Item = SourceDocument>,
    {
        let mut sources = SourceLog::default();
        let mut tokens = Vec::new();
        for document in documents {
            debug!("analyzing {}", document.label);
            sources.touch(&document.label);
            tokens.extend(self.document_tokens(&document));
        }
        fold_into(sources, tokens, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shredder_types::{Morpheme, Resolution};
    use std::collections::HashMap;

    /// Splits on spaces; each piece is `surface/features`.
    struct SlashAnalyzer;

    impl Analyzer for SlashAnalyzer {
        fn analyze(&self, sentence: &str) -> Vec<Morpheme> {
            sentence
                .split(' ')
                .filter_map(|piece| piece.split_once('/'))
                .map(|(surface, features)| Morpheme::new(surface, features.replace(';', ",")))
                .collect()
        }
    }

    struct MapResolver(HashMap<&'static str, (&'static str, Option<&'static str>)>);

    impl Resolver for MapResolver {
        fn lookup(&self, word: &str) -> Option<Resolution> {
            self.0.get(word).map(|(reading, translation)| Resolution {
                reading: reading.to_string(),
                translation: translation.map(str::to_string),
            })
        }
    }

    fn pipeline() -> Pipeline<SlashAnalyzer, MapResolver> {
        let resolver = MapResolver(HashMap::from([
            ("飲む", ("のむ", Some("to drink"))),
            ("水", ("みず", Some("water"))),
        ]));
        Pipeline::new(SlashAnalyzer, resolver, PipelineConfig::default())
    }

    #[test]
    fn resolves_and_filters_tokens() {
        let p = pipeline();
        let occ = p.sentence_occurrences(
            "ep.ass",
            "水/名詞;一般;*;*;*;*;水 を/助詞;格助詞;*;*;*;*;を 飲んだ/動詞;自立;*;*;五段;連用形;飲む",
        );
        assert_eq!(occ.len(), 2);
        assert_eq!(occ[0].normalized_base, "水");
        assert_eq!(occ[0].reading.as_deref(), Some("みず"));
        assert_eq!(occ[1].surface, "飲んだ");
        assert_eq!(occ[1].normalized_base, "飲む");
        assert_eq!(occ[1].translation.as_deref(), Some("to drink"));
        assert!(occ.iter().all(|o| o.sentence.starts_with("水/")));
    }

    #[test]
    fn kana_tokens_keep_the_analyzer_lemma() {
        let p = pipeline();
        let out = p.run(vec![SourceDocument {
            label: "ep.ass".to_string(),
            sentences: vec!["いった/動詞;自立;*;*;五段;連用タ接続;いく 飲んだ/動詞;自立;*;*;五段;連用形;飲む".to_string()],
        }]);
        let tokens = out.sources.get("ep.ass").unwrap();
        assert_eq!(tokens[0].occurrence.normalized_base, "いった");
        assert_eq!(tokens[0].potential_base.as_deref(), Some("いく"));
        assert_eq!(tokens[1].occurrence.normalized_base, "飲む");
        assert_eq!(tokens[1].potential_base.as_deref(), Some("飲む"));
    }

    #[test]
    fn unknown_words_stay_untranslated() {
        let p = pipeline();
        let occ = p.sentence_occurrences("ep.ass", "謎/名詞;一般;*;*;*;*;謎");
        assert_eq!(occ.len(), 1);
        assert_eq!(occ[0].reading, None);
        assert_eq!(occ[0].translation, None);
    }

    #[test]
    fn fold_skips_malformed_and_logs_sources_in_order() {
        let make = |base: &str, surface: &str, label: &str| TokenOccurrence {
            surface: surface.to_string(),
            normalized_base: base.to_string(),
            reading: None,
            translation: None,
            source_label: label.to_string(),
            sentence: "s".to_string(),
        };
        let out = fold_occurrences(
            vec![
                make("猫", "猫", "b.txt"),
                make("", "猫", "b.txt"),
                make("犬", "犬", "a.txt"),
                make("猫", "猫", "b.txt"),
            ],
            &PipelineConfig::default(),
        );
        assert_eq!(out.skipped, 1);
        assert_eq!(out.vocabulary.get("猫").unwrap().total_count(), 2);
        let labels: Vec<&str> = out.sources.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["b.txt", "a.txt"]);
        assert_eq!(out.sources.get("b.txt").unwrap().len(), 2);
    }

    #[test]
    fn run_keeps_empty_documents_visible() {
        let p = pipeline();
        let out = p.run(vec![
            SourceDocument {
                label: "empty.txt".to_string(),
                sentences: vec![],
            },
            SourceDocument {
                label: "ep.ass".to_string(),
                sentences: vec!["水/名詞;一般;*;*;*;*;水".to_string()],
            },
        ]);
        assert_eq!(out.sources.get("empty.txt").map(<[_]>::len), Some(0));
        assert_eq!(out.vocabulary.len(), 1);
    }
}
