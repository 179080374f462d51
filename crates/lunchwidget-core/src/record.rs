//! Restaurant record model shared by every pipeline stage.
//!
//! A [`RawRow`] is what the source produced, untyped and possibly ragged.
//! A [`Record`] is the canonical shape after base fields have been copied
//! out of a row and the enrichment fields have been filled in.

use serde::Serialize;

/// Walking time used whenever coordinates or a route are unavailable.
/// Large enough that "sort by proximity" puts unresolved records last.
pub const WALKING_MINUTES_UNKNOWN: u32 = 999;

/// Cuisine label used when no usable classification exists.
pub const DEFAULT_CUISINE: &str = "International";

/// Display marker when the address could not be geocoded.
pub const GEOCODE_FAILED_DISPLAY: &str = "?";

/// Display marker when a route lookup failed or was not attempted.
pub const ROUTE_FAILED_DISPLAY: &str = "N/A";

/// Ordered column name → value mapping exactly as found in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column. A repeated name keeps the first value on lookup.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.push((column.into(), value.into()));
    }

    /// Looks a column up by exact name first, then ASCII case-insensitively.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .or_else(|| {
                self.cells
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(column))
            })
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.push(k, v);
        }
        row
    }
}

/// Which source columns feed the base fields of a [`Record`].
///
/// Each field lists candidate column names; the first present one wins.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub name: Vec<String>,
    pub street_address: Vec<String>,
    pub postal_code: Vec<String>,
    pub city: Vec<String>,
    pub website: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| (*s).to_string()).collect();
        Self {
            name: owned(&["Restaurant", "Name"]),
            street_address: owned(&["Adresse", "Address", "Strasse"]),
            postal_code: owned(&["PLZ", "Zip", "PostalCode"]),
            city: owned(&["Ort", "City"]),
            website: owned(&["Website", "URL"]),
        }
    }
}

impl ColumnMapping {
    fn pick(row: &RawRow, candidates: &[String]) -> String {
        candidates
            .iter()
            .find_map(|c| row.get(c))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

/// Canonical restaurant record.
///
/// Serialized field names are camelCase. `columns` stays out of the
/// serialized form; it only backs template lookups of source columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub name: String,
    pub street_address: String,
    pub postal_code: String,
    pub city: String,
    pub website: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub walking_minutes: u32,
    pub walking_time_display: String,
    pub maps_link: String,
    #[serde(skip)]
    pub columns: RawRow,
}

impl Record {
    /// Copies base fields out of `row`; enrichment fields start at their
    /// documented defaults.
    #[must_use]
    pub fn from_row(row: RawRow, mapping: &ColumnMapping) -> Self {
        Self {
            name: ColumnMapping::pick(&row, &mapping.name),
            street_address: ColumnMapping::pick(&row, &mapping.street_address),
            postal_code: ColumnMapping::pick(&row, &mapping.postal_code),
            city: ColumnMapping::pick(&row, &mapping.city),
            website: normalize_website(&ColumnMapping::pick(&row, &mapping.website)),
            cuisine: None,
            latitude: None,
            longitude: None,
            walking_minutes: WALKING_MINUTES_UNKNOWN,
            walking_time_display: ROUTE_FAILED_DISPLAY.to_string(),
            maps_link: String::new(),
            columns: row,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Sort key for nearest-first listings. Unresolved records carry the
    /// sentinel, so they sort after every resolved one and tie with each
    /// other regardless of which unresolved marker they display.
    #[must_use]
    pub fn proximity_key(&self) -> (u32, &str) {
        (self.walking_minutes, self.name.as_str())
    }

    #[must_use]
    pub fn is_walking_time_known(&self) -> bool {
        self.walking_minutes != WALKING_MINUTES_UNKNOWN
    }
}

/// Drops client-side script handlers that masquerade as links.
#[must_use]
pub fn normalize_website(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.to_ascii_lowercase().contains("javascript:") {
        String::new()
    } else {
        trimmed.to_string()
    }
}
