use std::collections::HashMap;
use std::fs;

use shredder::{Pipeline, PipelineConfig, TsvDeck, write_deck, write_reports};
use shredder::{FrequencyTag, report};
use shredder_dict::Dictionary;
use shredder_types::{Analyzer, Morpheme};

const DICTIONARY: &str = r#"{
  "words": [
    {
      "kanji": [{"text": "食べる"}],
      "kana": [{"text": "たべる", "appliesToKanji": ["*"]}],
      "sense": [{"gloss": [{"lang": "eng", "text": "to eat; to live on"}]}]
    },
    {
      "kanji": [],
      "kana": [{"text": "すごい", "appliesToKanji": ["*"]}],
      "sense": [{"gloss": [{"lang": "eng", "text": "amazing"}]}]
    },
    {
      "kanji": [{"text": "珍語"}],
      "kana": [],
      "sense": [{"gloss": []}]
    }
  ]
}"#;

/// Space-separated tokens looked up in a fixed IPADIC feature table.
struct LexiconAnalyzer(HashMap<&'static str, &'static str>);

impl LexiconAnalyzer {
    fn new() -> Self {
        Self(HashMap::from([
            ("食べた", "動詞,自立,*,*,一段,連用タ接続,食べる,タベ,タベ"),
            ("食べます", "動詞,自立,*,*,一段,連用形,食べる,タベ,タベ"),
            ("すごい", "形容詞,自立,*,*,形容詞・アウオ段,基本形,すごい,スゴイ,スゴイ"),
            ("スゴイ", "形容詞,自立,*,*,形容詞・アウオ段,基本形,スゴイ,スゴイ,スゴイ"),
            ("珍語", "名詞,一般,*,*,*,*,珍語,チンゴ,チンゴ"),
            ("を", "助詞,格助詞,一般,*,*,*,を,ヲ,ヲ"),
        ]))
    }
}

impl Analyzer for LexiconAnalyzer {
    fn analyze(&self, sentence: &str) -> Vec<Morpheme> {
        sentence
            .split_whitespace()
            .map(|surface| Morpheme::new(surface, *self.0.get(surface).unwrap_or(&"名詞,一般")))
            .collect()
    }
}

fn write_inputs(dir: &std::path::Path) {
    fs::write(
        dir.join("ep01.srt"),
        "1\r\n00:00:01,000 --> 00:00:02,000\r\nすごい を 食べた\r\n\r\n\
         2\r\n00:00:03,000 --> 00:00:04,000\r\n<i>食べます</i> 珍語\r\n",
    )
    .unwrap();
    fs::write(dir.join("ep02.txt"), "スゴイ 食べた\n食べた\n").unwrap();
    fs::write(dir.join("notes.md"), "食べた\n").unwrap();
}

#[test]
fn end_to_end_run_writes_reports_and_deck() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_inputs(input.path());

    let dictionary = Dictionary::from_slice(DICTIONARY.as_bytes()).unwrap();
    let config = PipelineConfig::new(2, 5).unwrap();
    let documents = shredder_subs::discover(input.path())
        .unwrap()
        .iter()
        .map(shredder_subs::read_document)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let labels: Vec<&str> = documents.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["ep01.srt", "ep02.txt"]);

    let run = Pipeline::new(LexiconAnalyzer::new(), &dictionary, config).run(documents);
    assert_eq!(run.skipped, 0);

    let eat = run.vocabulary.get("食べる").unwrap();
    assert_eq!(eat.total_count(), 4);
    assert_eq!(eat.reading(), Some("たべる"));
    assert_eq!(eat.translation(), Some("to eat"));
    assert_eq!(eat.variant("食べた").unwrap().occurrence_count(), 3);
    assert!(run.vocabulary.get("を").is_none());

    let out = run.materialize(&config);
    assert_eq!(out.report.ambiguous.flagged, vec!["すごい", "スゴイ"]);
    assert_eq!(out.report.untranslatable, vec!["スゴイ", "珍語"]);
    assert_eq!(out.flashcards.len(), 1);
    assert_eq!(out.flashcards[0].word, "食べる");
    assert_eq!(out.flashcards[0].tag, FrequencyTag::Common);
    assert_eq!(
        out.flashcards[0].sentences,
        vec!["すごい を 食べた", "スゴイ 食べた", "食べた", "食べます 珍語"]
    );

    let written = write_reports(&out.report, output.path()).unwrap();
    assert_eq!(written.len(), 7);
    let deck = TsvDeck::new("anime").unwrap();
    let deck_path = write_deck(&deck, &out.flashcards, output.path())
        .unwrap()
        .unwrap();

    let sources = fs::read_to_string(output.path().join(report::SOURCES_FILE)).unwrap();
    let ep01 = sources.find("=== ep01.srt ===").unwrap();
    let ep02 = sources.find("=== ep02.txt ===").unwrap();
    assert!(ep01 < ep02);

    let frequency = fs::read_to_string(output.path().join(report::FREQUENCY_FILE)).unwrap();
    let first = frequency.lines().nth(2).unwrap();
    assert_eq!(first, "食べる\tたべる\tto eat\tFrequency: 4\tSample: すごい を 食べた");

    let ambiguous = fs::read_to_string(output.path().join(report::AMBIGUOUS_TEXT_FILE)).unwrap();
    assert!(ambiguous.contains("Reading: すごい\n"));
    assert!(ambiguous.contains("    Potential Base: スゴイ, Sentence: スゴイ 食べた\n"));

    let scrap = fs::read_to_string(output.path().join(report::UNTRANSLATABLE_FILE)).unwrap();
    let scrap_ep01 = scrap.find("=== ep01.srt ===").unwrap();
    let scrap_ep02 = scrap.find("=== ep02.txt ===").unwrap();
    assert!(scrap_ep01 < scrap_ep02);
    assert!(scrap.contains("珍語\t珍語\t食べます 珍語\n"));

    let deck_text = fs::read_to_string(deck_path).unwrap();
    assert!(deck_text.contains("#deck:anime"));
    assert!(deck_text.lines().last().unwrap().ends_with("\tcommon"));
}

#[test]
fn nothing_above_threshold_writes_no_deck() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("only.txt"), "珍語\n").unwrap();

    let dictionary = Dictionary::from_slice(DICTIONARY.as_bytes()).unwrap();
    let config = PipelineConfig::default();
    let documents = vec![shredder_subs::read_document(input.path().join("only.txt")).unwrap()];
    let out = Pipeline::new(LexiconAnalyzer::new(), &dictionary, config)
        .run(documents)
        .materialize(&config);

    assert!(out.flashcards.is_empty());
    write_reports(&out.report, output.path()).unwrap();
    let deck = TsvDeck::new("anime").unwrap();
    assert_eq!(write_deck(&deck, &out.flashcards, output.path()).unwrap(), None);
    assert!(!output.path().join("anime.tsv").exists());
    let scrap = fs::read_to_string(output.path().join(report::UNTRANSLATABLE_FILE)).unwrap();
    assert!(scrap.contains("珍語"));
}
