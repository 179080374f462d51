//! Local export discovery and delimiter-sniffed CSV parsing.

use std::path::{Path, PathBuf};

use lunchwidget_core::RawRow;

use crate::error::SourceError;

/// File-name fragments that mark the intended export.
const INPUT_KEYWORDS: [&str; 2] = ["lunch", "export"];

/// File-name fragment that disqualifies a file from the fallback pick.
const EXCLUDE_KEYWORD: &str = "mock";

/// Finds the export to read in `dir`.
///
/// Candidates are the `*.csv` files in `dir`, in file-name order. See
/// [`select_input_file`] for the selection rule.
///
/// # Errors
///
/// - [`SourceError::Io`] if the directory cannot be listed.
/// - [`SourceError::NoInputFound`] if no file qualifies.
pub fn find_input_file(dir: &Path) -> Result<PathBuf, SourceError> {
    let entries = std::fs::read_dir(dir).map_err(|source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    candidates.sort();

    tracing::debug!(dir = %dir.display(), candidates = candidates.len(), "scanned for input files");

    select_input_file(&candidates)
        .cloned()
        .ok_or_else(|| SourceError::NoInputFound {
            dir: dir.to_path_buf(),
        })
}

/// Picks the first candidate whose file name contains an input keyword
/// (case-insensitive). Only when none does, falls back to the first
/// candidate whose name lacks the exclusion keyword.
#[must_use]
pub fn select_input_file(candidates: &[PathBuf]) -> Option<&PathBuf> {
    let lowered_name = |path: &PathBuf| {
        path.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    };

    if let Some(hit) = candidates.iter().find(|path| {
        let name = lowered_name(path);
        INPUT_KEYWORDS.iter().any(|kw| name.contains(kw))
    }) {
        tracing::info!(path = %hit.display(), "found input file");
        return Some(hit);
    }

    let fallback = candidates
        .iter()
        .find(|path| !lowered_name(path).contains(EXCLUDE_KEYWORD));
    if let Some(path) = fallback {
        tracing::info!(path = %path.display(), "no keyword match; using candidate input file");
    }
    fallback
}

/// Returns `b';'` when the header line contains a semicolon, else `b','`.
#[must_use]
pub fn sniff_delimiter(header_line: &str) -> u8 {
    if header_line.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Reads every row of the CSV at `path`.
///
/// Never fails: an unreadable file yields no rows, and a malformed record
/// ends the parse with the rows read so far. Both are logged.
#[must_use]
pub fn read_rows(path: &Path) -> Vec<RawRow> {
    match std::fs::read(path) {
        Ok(bytes) => parse_rows(&bytes),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read input file");
            Vec::new()
        }
    }
}

/// Parses CSV bytes, sniffing the delimiter from the first line.
///
/// Rows shorter than the header simply lack the trailing columns; cells
/// beyond the header are dropped.
#[must_use]
pub fn parse_rows(bytes: &[u8]) -> Vec<RawRow> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let header_end = bytes.iter().position(|&b| b == b'\n').unwrap_or(bytes.len());
    let delimiter = sniff_delimiter(&String::from_utf8_lossy(&bytes[..header_end]));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable CSV header");
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(headers.iter().zip(record.iter()).collect::<RawRow>()),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    rows_read = rows.len(),
                    "malformed CSV record; stopping parse"
                );
                break;
            }
        }
    }
    rows
}

/// Discovers and reads the local export in `dir`.
///
/// # Errors
///
/// - [`SourceError::NoInputFound`] / [`SourceError::Io`] from discovery.
/// - [`SourceError::NoRows`] if the chosen file yields no rows.
pub fn load_local_rows(dir: &Path) -> Result<Vec<RawRow>, SourceError> {
    let path = find_input_file(dir)?;
    let rows = read_rows(&path);
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded restaurants");
    if rows.is_empty() {
        return Err(SourceError::NoRows {
            origin: path.display().to_string(),
        });
    }
    Ok(rows)
}
