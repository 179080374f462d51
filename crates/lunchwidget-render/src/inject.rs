//! Data injection into a host document.
//!
//! The host page declares its data as a single top-level assignment such
//! as `let appData = [];`. Injection swaps the right-hand side for the
//! serialized records and leaves every other byte alone, so re-running it
//! on its own output changes nothing.

use std::path::Path;
use std::sync::LazyLock;

use lunchwidget_core::Record;
use regex::Regex;
use serde::de::IgnoredAny;

use crate::error::RenderError;
use crate::output::{read_text, write_atomic};

/// Bracketed literal up to the nearest `];`, for literals that are not JSON.
static BRACKET_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A\[.*?\](\s*);").expect("valid regex"));

/// Serializes records as compact JSON, keeping non-ASCII text verbatim.
///
/// # Errors
///
/// Returns [`RenderError::Serialize`] if serialization fails.
pub fn serialize_records(records: &[Record]) -> Result<String, RenderError> {
    Ok(serde_json::to_string(records)?)
}

/// Replaces the literal in `let|const|var <variable> = <literal>;` with
/// `json`.
///
/// The literal's extent comes from parsing it as JSON, which must be
/// followed by `;`. Only when the literal is not JSON does it fall back to
/// the shortest `[ ... ]` followed by `;`.
///
/// # Errors
///
/// Returns [`RenderError::AssignmentNotFound`] if no such assignment exists.
pub fn inject_data(document: &str, variable: &str, json: &str) -> Result<String, RenderError> {
    let not_found = || RenderError::AssignmentNotFound {
        variable: variable.to_owned(),
    };

    let head = Regex::new(&format!(
        r"\b(?:let|const|var)\s+{}\s*=\s*",
        regex::escape(variable)
    ))
    .map_err(|_| not_found())?;

    let rhs_start = head.find(document).ok_or_else(not_found)?.end();
    let rhs = &document[rhs_start..];
    let literal_len = match json_literal_len(rhs) {
        // JSON with no `;` after it never falls through to the bracket scan.
        Some(len) => is_terminated(&rhs[len..]).then_some(len),
        None => bracket_literal_len(rhs),
    }
    .ok_or_else(not_found)?;

    let mut out = String::with_capacity(document.len() + json.len());
    out.push_str(&document[..rhs_start]);
    out.push_str(json);
    out.push_str(&rhs[literal_len..]);
    Ok(out)
}

/// Byte length of the JSON value at the start of `text`, if there is one.
fn json_literal_len(text: &str) -> Option<usize> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<IgnoredAny>();
    stream.next()?.ok()?;
    Some(stream.byte_offset())
}

fn is_terminated(after_literal: &str) -> bool {
    after_literal.trim_start().starts_with(';')
}

fn bracket_literal_len(text: &str) -> Option<usize> {
    let caps = BRACKET_LITERAL.captures(text)?;
    caps.get(1).map(|trailing| trailing.start())
}

/// Injects `records` into the host document at `path` in place.
///
/// # Errors
///
/// - [`RenderError::Io`] if the document cannot be read or rewritten.
/// - [`RenderError::AssignmentNotFound`] from [`inject_data`].
/// - [`RenderError::Serialize`] from [`serialize_records`].
///
/// The file is left unmodified on error.
pub fn inject_into_file(path: &Path, variable: &str, records: &[Record]) -> Result<(), RenderError> {
    let document = read_text(path)?;
    let json = serialize_records(records)?;
    tracing::info!(records = records.len(), path = %path.display(), "injecting records");

    let updated = inject_data(&document, variable, &json)?;
    write_atomic(path, &updated)?;
    tracing::info!(path = %path.display(), "injection complete");
    Ok(())
}

#[cfg(test)]
#[path = "inject_test.rs"]
mod tests;
