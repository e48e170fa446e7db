//! Token filtering and base-form resolution for analyzer output.
//!
//! The analyzer hands back every morpheme in a sentence, including particles,
//! punctuation and romaji noise. [`Normalizer::resolve`] drops the tokens a
//! learner never studies and picks the base form the vocabulary is keyed by.
//!
//! # How it works
//! 1. Reject blank, single-hiragana, ASCII-only and all-punctuation surfaces.
//! 2. Reject excluded parts of speech (particles, auxiliaries, symbols,
//!    conjunctions and adnominals by default).
//! 3. Pure-kana surfaces keep the surface as their base. Normalization is
//!    deferred for them, so inflected kana forms stay distinct and the
//!    ambiguity pass can later spot homophones.
//! 4. Surfaces with kanji keep the surface too, unless they are verbs whose
//!    dictionary form carries kanji, or adjectives with a dictionary form.
//!
//! # Example
//! ```
//! use shredder_morph::Normalizer;
//! use shredder_types::Morpheme;
//!
//! let normalizer = Normalizer::new();
//! let m = Morpheme::new("食べた", "動詞,自立,*,*,一段,連用タ接続,食べる,タベ,タベ");
//! let cand = normalizer.resolve(&m).unwrap();
//! assert_eq!(cand.base, "食べる");
//!
//! // Kana surfaces keep their own base but remember the analyzer's lemma.
//! let m = Morpheme::new("いった", "動詞,自立,*,*,五段,連用タ接続,いく,イッ,イッ");
//! let cand = normalizer.resolve(&m).unwrap();
//! assert_eq!(cand.base, "いった");
//! assert_eq!(cand.potential_base, "いく");
//! ```

use std::collections::HashSet;

use shredder_types::{
    Morpheme, PartOfSpeech, contains_kanji, is_all_punctuation, is_ascii_only, is_hiragana_char,
};

/// Feature column holding the dictionary (lemma) form in IPADIC records.
pub const DICTIONARY_FORM_FIELD: usize = 6;

/// Parts of speech skipped unless the caller overrides the set.
pub const DEFAULT_EXCLUDED_POS: [PartOfSpeech; 5] = [
    PartOfSpeech::Particle,
    PartOfSpeech::AuxiliaryVerb,
    PartOfSpeech::Symbol,
    PartOfSpeech::Conjunction,
    PartOfSpeech::Adnominal,
];

/// A kept token with its resolved base form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BaseCandidate<'a> {
    pub surface: &'a str,
    pub base: &'a str,
    /// The analyzer's dictionary form, or the surface when it has none.
    pub potential_base: &'a str,
}

/// Filtering and base-selection rules.
#[derive(Clone, Debug)]
pub struct Normalizer {
    excluded: HashSet<PartOfSpeech>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::with_excluded(DEFAULT_EXCLUDED_POS)
    }

    pub fn with_excluded(excluded: impl IntoIterator<Item = PartOfSpeech>) -> Self {
        Self {
            excluded: excluded.into_iter().collect(),
        }
    }

    /// Whether a morpheme is noise for vocabulary purposes.
    pub fn is_unwanted(&self, morpheme: &Morpheme) -> bool {
        let surface = morpheme.surface.as_str();
        if surface.trim().is_empty() {
            return true;
        }
        let mut chars = surface.chars();
        if let (Some(only), None) = (chars.next(), chars.next())
            && is_hiragana_char(only)
        {
            return true;
        }
        if is_ascii_only(surface) || is_all_punctuation(surface) {
            return true;
        }
        self.excluded.contains(&morpheme.pos())
    }

    /// Resolve the base form of a morpheme, or `None` when it is filtered out.
    pub fn resolve<'a>(&self, morpheme: &'a Morpheme) -> Option<BaseCandidate<'a>> {
        if self.is_unwanted(morpheme) {
            return None;
        }

        let surface = morpheme.surface.as_str();
        let pos = morpheme.pos();
        let dictionary_form = morpheme.feature(DICTIONARY_FORM_FIELD);
        let potential_base = dictionary_form.unwrap_or(surface);

        let promoted = if contains_kanji(surface) {
            match (pos, dictionary_form) {
                (PartOfSpeech::Verb, Some(form)) if contains_kanji(form) => Some(form),
                (PartOfSpeech::Adjective, Some(form)) => Some(form),
                _ => None,
            }
        } else {
            None
        };

        Some(BaseCandidate {
            surface,
            base: promoted.unwrap_or(surface),
            potential_base,
        })
    }
}

/// Gloss a surface variant relative to its base meaning.
pub fn annotate_surface_meaning(base: &str, surface: &str, base_meaning: &str) -> String {
    if surface == base {
        format!("{base_meaning} (general meaning)")
    } else if surface.ends_with("ました") {
        format!("{base_meaning} (past tense)")
    } else if surface.ends_with("ます") {
        format!("{base_meaning} (polite form)")
    } else {
        base_meaning.to_string()
    }
}
