use lunchwidget_core::DEFAULT_CUISINE;

use crate::geocode::GeocodeHit;

/// OSM values that say a place serves food but not what kind.
const UNINFORMATIVE_VALUES: [&str; 5] = ["yes", "restaurant", "fast_food", "cafe", "bar"];

/// Cuisine label for a geocoding hit.
///
/// Prefers the `cuisine` tag, then an informative `osm_value`. The raw
/// value is reduced to its first `;`-separated entry, underscores become
/// spaces, and words are title-cased. Falls back to
/// [`DEFAULT_CUISINE`] when there is no hit or nothing usable.
#[must_use]
pub fn classify(hit: Option<&GeocodeHit>) -> String {
    let raw = hit.and_then(|hit| {
        hit.cuisine
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| {
                hit.osm_value
                    .as_deref()
                    .filter(|v| !UNINFORMATIVE_VALUES.contains(&v.trim()))
            })
    });

    raw.map(normalize)
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| DEFAULT_CUISINE.to_string())
}

fn normalize(raw: &str) -> String {
    let first = raw.split(';').next().unwrap_or_default();
    title_case(first.replace('_', " ").trim())
}

/// Upper-cases the first letter of each word and lower-cases the rest.
/// A word starts after any non-alphabetic character.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
