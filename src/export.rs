use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::aggregate::{Vocabulary, VocabularyEntry};

/// Frequency rank: descending total count, ties by ascending base.
pub fn rank_order(a: &VocabularyEntry, b: &VocabularyEntry) -> Ordering {
    b.total_count()
        .cmp(&a.total_count())
        .then_with(|| a.normalized_base().cmp(b.normalized_base()))
}

/// Entries eligible for flashcards: frequent enough, translated, unambiguous.
pub fn select_for_export<'v>(
    vocabulary: &'v Vocabulary,
    flagged_ambiguous: &BTreeSet<String>,
    threshold: u32,
) -> Vec<&'v VocabularyEntry> {
    let mut selected: Vec<&VocabularyEntry> = vocabulary
        .iter()
        .filter(|entry| entry.total_count() >= u64::from(threshold))
        .filter(|entry| entry.is_translated())
        .filter(|entry| !flagged_ambiguous.contains(entry.normalized_base()))
        .collect();
    selected.sort_by(|a, b| rank_order(a, b));
    selected
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyTag {
    VeryCommon,
    Common,
    Frequent,
}

impl FrequencyTag {
    /// Band a count relative to the export threshold.
    pub fn for_count(count: u64, threshold: u32) -> Self {
        let threshold = u64::from(threshold.max(1));
        if count >= threshold * 4 {
            FrequencyTag::VeryCommon
        } else if count >= threshold * 2 {
            FrequencyTag::Common
        } else {
            FrequencyTag::Frequent
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyTag::VeryCommon => "very_common",
            FrequencyTag::Common => "common",
            FrequencyTag::Frequent => "frequent",
        }
    }
}

/// A card handed to the deck builder.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Flashcard {
    pub word: String,
    pub reading: String,
    pub translation: String,
    pub sentences: Vec<String>,
    pub frequency: u64,
    pub tag: FrequencyTag,
}

impl Flashcard {
    /// Build a card, merging up to `sentence_cap` distinct sentences across
    /// variants in variant order. Returns `None` for untranslated entries.
    pub fn from_entry(entry: &VocabularyEntry, sentence_cap: usize, threshold: u32) -> Option<Self> {
        let translation = entry.translation()?;
        let mut sentences: Vec<String> = Vec::new();
        'variants: for variant in entry.variants() {
            for sentence in variant.example_sentences() {
                if sentences.len() >= sentence_cap {
                    break 'variants;
                }
                if !sentences.contains(sentence) {
                    sentences.push(sentence.clone());
                }
            }
        }

        Some(Self {
            word: entry.normalized_base().to_string(),
            reading: entry.reading().unwrap_or_default().to_string(),
            translation: translation.to_string(),
            sentences,
            frequency: entry.total_count(),
            tag: FrequencyTag::for_count(entry.total_count(), threshold),
        })
    }
}

/// Cards for every selected entry, in selection order.
pub fn flashcards(selected: &[&VocabularyEntry], sentence_cap: usize, threshold: u32) -> Vec<Flashcard> {
    selected
        .iter()
        .filter_map(|entry| Flashcard::from_entry(entry, sentence_cap, threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use shredder_types::TokenOccurrence;

    fn ingest_n(agg: &mut Aggregator, base: &str, n: usize, translated: bool) {
        for i in 0..n {
            agg.ingest(&TokenOccurrence {
                surface: base.to_string(),
                normalized_base: base.to_string(),
                reading: Some(base.to_string()),
                translation: translated.then(|| format!("gloss of {base}")),
                source_label: "ep.ass".to_string(),
                sentence: format!("{base} {i}"),
            })
            .unwrap();
        }
    }

    fn bases(selected: &[&VocabularyEntry]) -> Vec<String> {
        selected
            .iter()
            .map(|e| e.normalized_base().to_string())
            .collect()
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let mut agg = Aggregator::default();
        ingest_n(&mut agg, "猫", 4, true);
        ingest_n(&mut agg, "犬", 5, true);
        let vocab = agg.finish();
        let selected = select_for_export(&vocab, &BTreeSet::new(), 5);
        assert_eq!(bases(&selected), vec!["犬"]);
    }

    #[test]
    fn excludes_ambiguous_and_untranslated() {
        let mut agg = Aggregator::default();
        ingest_n(&mut agg, "かわ", 6, true);
        ingest_n(&mut agg, "謎", 6, false);
        ingest_n(&mut agg, "川", 6, true);
        let vocab = agg.finish();
        let flagged = BTreeSet::from(["かわ".to_string()]);
        let selected = select_for_export(&vocab, &flagged, 5);
        assert_eq!(bases(&selected), vec!["川"]);
    }

    #[test]
    fn orders_by_count_then_base() {
        let mut agg = Aggregator::default();
        ingest_n(&mut agg, "b", 5, true);
        ingest_n(&mut agg, "c", 7, true);
        ingest_n(&mut agg, "a", 5, true);
        let vocab = agg.finish();
        let selected = select_for_export(&vocab, &BTreeSet::new(), 5);
        assert_eq!(bases(&selected), vec!["c", "a", "b"]);
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let vocab = Aggregator::default().finish();
        assert!(select_for_export(&vocab, &BTreeSet::new(), 5).is_empty());
        assert!(flashcards(&[], 5, 5).is_empty());
    }

    #[test]
    fn cards_merge_distinct_sentences_across_variants() {
        let mut agg = Aggregator::default();
        for (surface, sentence) in [
            ("食べた", "昨日食べた"),
            ("食べた", "もう食べた"),
            ("食べます", "昨日食べた"),
            ("食べます", "明日食べます"),
        ] {
            agg.ingest(&TokenOccurrence {
                surface: surface.to_string(),
                normalized_base: "食べる".to_string(),
                reading: Some("たべる".to_string()),
                translation: Some("to eat".to_string()),
                source_label: "ep.ass".to_string(),
                sentence: sentence.to_string(),
            })
            .unwrap();
        }
        let vocab = agg.finish();
        let card = Flashcard::from_entry(vocab.get("食べる").unwrap(), 5, 5).unwrap();
        assert_eq!(card.sentences, vec!["昨日食べた", "もう食べた", "明日食べます"]);
        assert_eq!(card.frequency, 4);
        assert_eq!(card.tag, FrequencyTag::Frequent);

        let capped = Flashcard::from_entry(vocab.get("食べる").unwrap(), 2, 5).unwrap();
        assert_eq!(capped.sentences.len(), 2);
    }

    #[test]
    fn tags_scale_with_threshold() {
        assert_eq!(FrequencyTag::for_count(5, 5), FrequencyTag::Frequent);
        assert_eq!(FrequencyTag::for_count(10, 5), FrequencyTag::Common);
        assert_eq!(FrequencyTag::for_count(20, 5), FrequencyTag::VeryCommon);
    }
}
