use std::path::PathBuf;

use shredder_subs::{SubtitleError, discover, read_document};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

#[test]
fn discovers_supported_files_in_name_order() {
    let files = discover(fixture_dir()).expect("discover fixtures");
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["episode01.ass", "episode02.srt", "notes.txt"]);
}

#[test]
fn reads_ass_dialogue() {
    let doc = read_document(fixture_dir().join("episode01.ass")).expect("read ass");
    assert_eq!(doc.label, "episode01.ass");
    assert_eq!(doc.sentences, vec!["ご飯を食べた", "もう食べた？ うん、食べた"]);
}

#[test]
fn reads_srt_with_crlf() {
    let doc = read_document(fixture_dir().join("episode02.srt")).expect("read srt");
    assert_eq!(doc.sentences, vec!["水を飲む", "すごい"]);
}

#[test]
fn reads_plain_text_lines() {
    let doc = read_document(fixture_dir().join("notes.txt")).expect("read txt");
    assert_eq!(doc.sentences, vec!["本を読む", "新しい本だ"]);
}

#[test]
fn rejects_missing_dir_and_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(discover(&missing), Err(SubtitleError::MissingDir(_))));
    assert!(matches!(
        read_document(fixture_dir().join("readme.md")),
        Err(SubtitleError::UnsupportedFormat(_))
    ));
}
