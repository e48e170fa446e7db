use std::env;
use std::path::PathBuf;

use shredder_tokenize::VibratoAnalyzer;
use shredder_types::{Analyzer, PartOfSpeech};

fn dict_path() -> Option<PathBuf> {
    env::var("SHREDDER_TOKENIZER_DICT").ok().map(PathBuf::from)
}

#[test]
fn splits_sentence_into_morphemes() {
    let Some(path) = dict_path() else {
        eprintln!("skipping: SHREDDER_TOKENIZER_DICT not set");
        return;
    };
    let analyzer = VibratoAnalyzer::load(&path).expect("load tokenizer dictionary");
    let morphemes = analyzer.analyze("猫が魚を食べた");

    let surfaces: Vec<&str> = morphemes.iter().map(|m| m.surface.as_str()).collect();
    assert_eq!(surfaces.concat(), "猫が魚を食べた");
    assert!(morphemes.iter().any(|m| m.pos() == PartOfSpeech::Particle));
    assert!(morphemes.iter().any(|m| m.pos() == PartOfSpeech::Verb));
}

#[test]
fn empty_sentence_has_no_tokens() {
    let Some(path) = dict_path() else {
        eprintln!("skipping: SHREDDER_TOKENIZER_DICT not set");
        return;
    };
    let analyzer = VibratoAnalyzer::load(&path).expect("load tokenizer dictionary");
    assert!(analyzer.analyze("").is_empty());
}

#[test]
fn missing_dictionary_is_an_error() {
    let err = VibratoAnalyzer::load("/nonexistent/system.dic.zst").err().expect("load fails");
    assert!(format!("{err:#}").contains("system.dic.zst"));
}
