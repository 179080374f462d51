//! Row-template rendering.
//!
//! A template has one loop region between [`LOOP_START`] and [`LOOP_END`].
//! The region is repeated once per record with `{{ item.<field> }}`
//! placeholders filled in; the rest of the document may use
//! `{{ generation_date }}` and `{{ items_count }}`. There is no expression
//! evaluation and values are inserted verbatim.

use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use lunchwidget_core::{Record, DEFAULT_CUISINE, ROUTE_FAILED_DISPLAY};
use regex::{Captures, Regex};

use crate::error::RenderError;
use crate::output::{read_text, write_atomic};

pub const LOOP_START: &str = "{% for item in items %}";
pub const LOOP_END: &str = "{% endfor %}";

/// Shown for `maps_link` when a record has none.
const MISSING_LINK: &str = "#";

static ITEM_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*item\.([^\s{}]+)\s*\}\}").expect("valid regex"));
static GENERATION_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*generation_date\s*\}\}").expect("valid regex"));
static ITEMS_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*items_count\s*\}\}").expect("valid regex"));

/// A parsed template: the text around the loop and the loop body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    head: String,
    body: String,
    tail: String,
}

impl Template {
    /// Splits `text` at the first loop start and the first loop end after it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingLoopMarkers`] if either marker is
    /// missing or an end marker precedes the start marker.
    pub fn parse(text: &str) -> Result<Self, RenderError> {
        let start = text.find(LOOP_START).ok_or(RenderError::MissingLoopMarkers)?;
        let first_end = text.find(LOOP_END).ok_or(RenderError::MissingLoopMarkers)?;
        if first_end < start {
            return Err(RenderError::MissingLoopMarkers);
        }
        let body_start = start + LOOP_START.len();
        let body_len = text[body_start..]
            .find(LOOP_END)
            .ok_or(RenderError::MissingLoopMarkers)?;
        let body_end = body_start + body_len;

        Ok(Self {
            head: text[..start].to_string(),
            body: text[body_start..body_end].to_string(),
            tail: text[body_end + LOOP_END.len()..].to_string(),
        })
    }

    /// Renders the document for `records`, in order, stamped with
    /// `generated_on`.
    #[must_use]
    pub fn render(&self, records: &[Record], generated_on: NaiveDate) -> String {
        let date = generated_on.format("%Y-%m-%d").to_string();
        let count = records.len().to_string();
        let document_level = |part: &str| {
            let part = GENERATION_DATE.replace_all(part, date.as_str());
            ITEMS_COUNT.replace_all(&part, count.as_str()).into_owned()
        };

        let body = document_level(&self.body);
        let mut out = document_level(&self.head);
        for record in records {
            let row = ITEM_PLACEHOLDER.replace_all(&body, |caps: &Captures<'_>| {
                field_value(record, &caps[1]).into_owned()
            });
            out.push_str(&row);
        }
        out.push_str(&document_level(&self.tail));
        out
    }
}

/// Value substituted for `{{ item.<field> }}`.
///
/// Record fields answer to their snake_case and camelCase names plus a few
/// legacy aliases. Anything else is looked up in the record's source
/// columns, and unknown names render empty.
#[must_use]
pub fn field_value<'r>(record: &'r Record, field: &str) -> Cow<'r, str> {
    let or_fallback = |value: &'r str, fallback: &'static str| -> Cow<'r, str> {
        Cow::Borrowed(if value.is_empty() { fallback } else { value })
    };
    let number = |value: Option<f64>| -> Cow<'r, str> {
        Cow::Owned(value.map(|v| v.to_string()).unwrap_or_default())
    };

    match field {
        "name" => Cow::Borrowed(record.name.as_str()),
        "street_address" | "streetAddress" => Cow::Borrowed(record.street_address.as_str()),
        "postal_code" | "postalCode" => Cow::Borrowed(record.postal_code.as_str()),
        "city" => Cow::Borrowed(record.city.as_str()),
        "website" => Cow::Borrowed(record.website.as_str()),
        "cuisine" => Cow::Borrowed(record.cuisine.as_deref().unwrap_or(DEFAULT_CUISINE)),
        "latitude" => number(record.latitude),
        "longitude" => number(record.longitude),
        "walking_minutes" | "walkingMinutes" | "walking_time_raw" => {
            Cow::Owned(record.walking_minutes.to_string())
        }
        "walking_time" | "walkingTimeDisplay" => {
            or_fallback(record.walking_time_display.as_str(), ROUTE_FAILED_DISPLAY)
        }
        "maps_link" | "mapsLink" | "maps_url" => or_fallback(record.maps_link.as_str(), MISSING_LINK),
        other => Cow::Borrowed(record.columns.get(other).unwrap_or_default()),
    }
}

/// Renders the template at `template_path` for `records`, dated today, and
/// writes it atomically to `output_path`.
///
/// # Errors
///
/// - [`RenderError::Io`] if the template cannot be read or the output
///   cannot be written.
/// - [`RenderError::MissingLoopMarkers`] from [`Template::parse`].
///
/// Nothing is written on error.
pub fn render_widget(
    template_path: &Path,
    output_path: &Path,
    records: &[Record],
) -> Result<(), RenderError> {
    let template = Template::parse(&read_text(template_path)?)?;
    tracing::info!(records = records.len(), template = %template_path.display(), "rendering widget");

    let html = template.render(records, chrono::Local::now().date_naive());
    write_atomic(output_path, &html)?;
    tracing::info!(path = %output_path.display(), "widget generated");
    Ok(())
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
