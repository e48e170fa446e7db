//! Shared types for the vocabulary shredder workspace.
//!
//! Every crate speaks in terms of the records defined here: an [`Analyzer`]
//! turns a sentence into raw [`Morpheme`]s, a [`Resolver`] maps a base form to
//! a [`Resolution`], and the aggregation core folds [`TokenOccurrence`]s.
//! The script helpers classify characters the way the ambiguity rules need
//! them (kana vs kanji vs everything else).
//!
//! ```rust
//! use shredder_types::{PartOfSpeech, contains_kanji, is_kana};
//!
//! assert!(is_kana("たべる"));
//! assert!(contains_kanji("食べる"));
//! assert_eq!(PartOfSpeech::from_ipadic("動詞"), PartOfSpeech::Verb);
//! ```

use std::fmt;

/// Top-level part-of-speech category as emitted by IPADIC-style analyzers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Particle,
    AuxiliaryVerb,
    Symbol,
    Conjunction,
    Adnominal,
    Interjection,
    Prefix,
    Filler,
    Other,
}

impl PartOfSpeech {
    /// Parse the first feature column of an analyzer record.
    pub fn from_ipadic(tag: &str) -> Self {
        match tag {
            "名詞" => PartOfSpeech::Noun,
            "動詞" => PartOfSpeech::Verb,
            "形容詞" => PartOfSpeech::Adjective,
            "副詞" => PartOfSpeech::Adverb,
            "助詞" => PartOfSpeech::Particle,
            "助動詞" => PartOfSpeech::AuxiliaryVerb,
            "記号" | "補助記号" => PartOfSpeech::Symbol,
            "接続詞" => PartOfSpeech::Conjunction,
            "連体詞" => PartOfSpeech::Adnominal,
            "感動詞" => PartOfSpeech::Interjection,
            "接頭詞" | "接頭辞" => PartOfSpeech::Prefix,
            "フィラー" => PartOfSpeech::Filler,
            _ => PartOfSpeech::Other,
        }
    }

    /// Emit the IPADIC tag for this category.
    pub fn as_ipadic(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "名詞",
            PartOfSpeech::Verb => "動詞",
            PartOfSpeech::Adjective => "形容詞",
            PartOfSpeech::Adverb => "副詞",
            PartOfSpeech::Particle => "助詞",
            PartOfSpeech::AuxiliaryVerb => "助動詞",
            PartOfSpeech::Symbol => "記号",
            PartOfSpeech::Conjunction => "接続詞",
            PartOfSpeech::Adnominal => "連体詞",
            PartOfSpeech::Interjection => "感動詞",
            PartOfSpeech::Prefix => "接頭詞",
            PartOfSpeech::Filler => "フィラー",
            PartOfSpeech::Other => "その他",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Particle => "particle",
            PartOfSpeech::AuxiliaryVerb => "auxiliary verb",
            PartOfSpeech::Symbol => "symbol",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Adnominal => "adnominal",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Prefix => "prefix",
            PartOfSpeech::Filler => "filler",
            PartOfSpeech::Other => "other",
        })
    }
}

/// One tokenized morpheme instance after base resolution and dictionary lookup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenOccurrence {
    pub surface: String,
    pub normalized_base: String,
    pub reading: Option<String>,
    pub translation: Option<String>,
    pub source_label: String,
    pub sentence: String,
}

/// The sentences of one input file, labelled by file name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceDocument {
    pub label: String,
    pub sentences: Vec<String>,
}

/// Raw analyzer output: the surface plus its comma-separated feature string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Morpheme {
    pub surface: String,
    pub features: String,
}

impl Morpheme {
    pub fn new(surface: impl Into<String>, features: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            features: features.into(),
        }
    }

    /// Feature column `idx`, treating the analyzer's `*` placeholder as absent.
    pub fn feature(&self, idx: usize) -> Option<&str> {
        self.features
            .split(',')
            .nth(idx)
            .map(str::trim)
            .filter(|f| !f.is_empty() && *f != "*")
    }

    pub fn pos(&self) -> PartOfSpeech {
        self.feature(0)
            .map(PartOfSpeech::from_ipadic)
            .unwrap_or(PartOfSpeech::Other)
    }
}

/// Morphological analyzer capability.
pub trait Analyzer {
    fn analyze(&self, sentence: &str) -> Vec<Morpheme>;
}

impl<T: Analyzer + ?Sized> Analyzer for &T {
    fn analyze(&self, sentence: &str) -> Vec<Morpheme> {
        (**self).analyze(sentence)
    }
}

/// Dictionary answer for a base form. A known word may lack an English gloss.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    pub reading: String,
    pub translation: Option<String>,
}

/// Dictionary lookup capability.
pub trait Resolver {
    fn lookup(&self, word: &str) -> Option<Resolution>;
}

impl<T: Resolver + ?Sized> Resolver for &T {
    fn lookup(&self, word: &str) -> Option<Resolution> {
        (**self).lookup(word)
    }
}

pub fn is_hiragana_char(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309F}')
}

/// Katakana including the prolonged sound mark, phonetic extensions and
/// half-width forms. The middle dot `・` is punctuation, not kana.
pub fn is_katakana_char(c: char) -> bool {
    matches!(
        c,
        '\u{30A1}'..='\u{30FA}'
            | '\u{30FC}'..='\u{30FF}'
            | '\u{31F0}'..='\u{31FF}'
            | '\u{FF66}'..='\u{FF9F}'
    )
}

pub fn is_kana_char(c: char) -> bool {
    is_hiragana_char(c) || is_katakana_char(c)
}

/// CJK ideographs plus the `々` repetition mark.
pub fn is_kanji_char(c: char) -> bool {
    matches!(
        c,
        '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}' | '々'
    )
}

/// True for a non-empty string made only of hiragana/katakana.
pub fn is_kana(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_kana_char)
}

pub fn contains_kanji(text: &str) -> bool {
    text.chars().any(is_kanji_char)
}

pub fn is_ascii_only(text: &str) -> bool {
    text.is_ascii()
}

/// ASCII, general, CJK and full-width punctuation blocks.
pub fn is_punctuation_char(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{3001}'..='\u{3003}'
                | '\u{3008}'..='\u{3011}'
                | '\u{3014}'..='\u{301F}'
                | '\u{30FB}'
                | '\u{FF01}'..='\u{FF0F}'
                | '\u{FF1A}'..='\u{FF20}'
                | '\u{FF3B}'..='\u{FF40}'
                | '\u{FF5B}'..='\u{FF65}'
        )
}

pub fn is_all_punctuation(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_punctuation_char)
}
