//! Homophone detection for pure-kana bases.
//!
//! Pure-kana surfaces are never normalized upstream, so two distinct bases
//! written in kana can sound identical (`かわ` / `カワ`, or two bases that
//! resolve to the same reading). A learner cannot tell such cards apart by
//! reading alone, so every member of such a group is flagged.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use wana_kana::ConvertJapanese;

use shredder_types::is_kana;

use crate::aggregate::Vocabulary;

/// Bases sharing one reading-equivalence key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AmbiguityGroup {
    pub key: String,
    pub members: BTreeSet<String>,
}

/// Reading-equivalence key: hiragana, with `づ`/`ぢ` merged into `ず`/`じ`.
///
/// Half-width katakana is widened first. Everything then passes through
/// katakana so a prolonged sound mark expands to the same vowel in both
/// scripts (`すごーい` and `スゴーイ` both give `すごおい`).
pub fn reading_key(text: &str) -> String {
    let wide: String = text.nfkc().collect();
    wide.to_katakana()
        .to_hiragana()
        .replace('づ', "ず")
        .replace('ぢ', "じ")
}

/// Groups of two or more distinct pure-kana bases that read the same,
/// sorted by key.
pub fn ambiguity_groups(vocabulary: &Vocabulary) -> Vec<AmbiguityGroup> {
    let mut by_key: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in vocabulary.iter() {
        let base = entry.normalized_base();
        if !is_kana(base) {
            continue;
        }
        let key = reading_key(entry.reading().unwrap_or(base));
        by_key.entry(key).or_default().insert(base.to_string());
    }

    by_key
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(key, members)| AmbiguityGroup { key, members })
        .collect()
}

/// Every base that belongs to an ambiguity group.
pub fn classify(vocabulary: &Vocabulary) -> BTreeSet<String> {
    flagged_bases(&ambiguity_groups(vocabulary))
}

/// Union of the members of already computed groups.
pub fn flagged_bases(groups: &[AmbiguityGroup]) -> BTreeSet<String> {
    groups
        .iter()
        .flat_map(|group| group.members.iter().cloned())
        .collect()
}
