//! Input discovery and sentence extraction.
//!
//! Supported inputs are Advanced SubStation (`.ass`), SubRip (`.srt`) and
//! plain text (`.txt`). Each file becomes one [`SourceDocument`] labelled by
//! its file name, holding one entry per spoken line.

use std::fs;
use std::path::{Path, PathBuf};

use shredder_types::SourceDocument;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceFormat {
    Ass,
    Srt,
    Text,
}

impl SourceFormat {
    /// Detect the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ass" => Some(SourceFormat::Ass),
            "srt" => Some(SourceFormat::Srt),
            "txt" => Some(SourceFormat::Text),
            _ => None,
        }
    }

    pub fn parse(self, text: &str) -> Vec<String> {
        match self {
            SourceFormat::Ass => parse_ass(text),
            SourceFormat::Srt => parse_srt(text),
            SourceFormat::Text => parse_plain(text),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubtitleError {
    #[error("input directory not found: {0}")]
    MissingDir(PathBuf),
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Supported input files directly inside `dir`, sorted by file name.
pub fn discover(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, SubtitleError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(SubtitleError::MissingDir(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| SubtitleError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SubtitleError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && SourceFormat::from_path(&path).is_some() {
            files.push(path);
        } else {
            debug!("skipping {}", path.display());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    info!("discovered {} input files in {}", files.len(), dir.display());
    Ok(files)
}

/// Read and parse a single input file.
pub fn read_document(path: impl AsRef<Path>) -> Result<SourceDocument, SubtitleError> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| SubtitleError::UnsupportedFormat(path.to_path_buf()))?;
    let text = fs::read_to_string(path).map_err(|source| SubtitleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sentences = format.parse(&text);
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    debug!("{label}: {} sentences", sentences.len());
    Ok(SourceDocument { label, sentences })
}

/// Dialogue text of `Default`-style events.
pub fn parse_ass(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut in_events = false;
    for raw in strip_bom(text).lines() {
        let line = raw.trim_end_matches('\r');
        if line.starts_with('[') {
            in_events = line.trim() == "[Events]";
            continue;
        }
        if !in_events {
            continue;
        }
        let Some(rest) = line.strip_prefix("Dialogue:") else {
            continue;
        };
        let fields: Vec<&str> = rest.splitn(10, ',').collect();
        if fields.len() < 10 {
            continue;
        }
        if !fields[3].trim().eq_ignore_ascii_case("default") {
            continue;
        }
        let cleaned = clean_ass_text(fields[9]);
        if !cleaned.is_empty() {
            lines.push(cleaned);
        }
    }
    lines
}

/// Subtitle text lines, skipping cue numbers and timing lines.
pub fn parse_srt(text: &str) -> Vec<String> {
    strip_bom(text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.chars().all(|c| c.is_ascii_digit()))
        .filter(|line| !line.contains("-->"))
        .map(|line| strip_delimited(&strip_delimited(line, '<', '>'), '{', '}'))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn parse_plain(text: &str) -> Vec<String> {
    strip_bom(text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove `{...}` override blocks and turn line-break escapes into spaces.
fn clean_ass_text(text: &str) -> String {
    strip_delimited(text, '{', '}')
        .replace("\\N", " ")
        .replace("\\n", " ")
        .replace("\\h", " ")
        .trim()
        .to_string()
}

/// Drop every `open ... close` span (shortest match, no nesting).
fn strip_delimited(text: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        let Some(len) = rest[start..].find(close) else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + len + close.len_utf8()..];
    }
    out.push_str(rest);
    out
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
