//! Structural extraction of the directory listing.
//!
//! The listing is parsed once into a DOM; a [`ColumnLocator`] then reads
//! five parallel field sequences out of it. Which elements hold which
//! field is page-specific, so the lookup sits behind the trait and can be
//! swapped when the host page changes its markup. [`reconcile`] turns the
//! sequences into rows.

use std::sync::LazyLock;

use lunchwidget_core::{normalize_website, RawRow};
use scraper::{ElementRef, Html, Selector};

/// Column names given to scraped fields; they match the local export header.
pub const COLUMN_NAME: &str = "Restaurant";
pub const COLUMN_ADDRESS: &str = "Adresse";
pub const COLUMN_POSTAL_CODE: &str = "PLZ";
pub const COLUMN_CITY: &str = "Ort";
pub const COLUMN_WEBSITE: &str = "Website";

static ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id]").expect("valid selector"));
static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table[id]").expect("valid selector"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// Parallel field sequences read from one listing page. Lengths may differ
/// when the markup is damaged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldColumns {
    pub names: Vec<String>,
    pub addresses: Vec<String>,
    pub postal_codes: Vec<String>,
    pub cities: Vec<String>,
    pub websites: Vec<String>,
}

impl FieldColumns {
    #[must_use]
    pub fn lengths(&self) -> [usize; 5] {
        [
            self.names.len(),
            self.addresses.len(),
            self.postal_codes.len(),
            self.cities.len(),
            self.websites.len(),
        ]
    }
}

/// Strategy for finding the five field columns in a parsed listing.
pub trait ColumnLocator {
    fn locate(&self, document: &Html) -> FieldColumns;
}

/// Finds fields by the suffix of their server-generated element id,
/// e.g. `ctl00_ContentPlaceHolder1_GridView1_ctl02_Label3`.
#[derive(Debug, Clone)]
pub struct IdSuffixLocator {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    /// Suffix of the anchor whose inner text is the website.
    pub website: String,
}

impl Default for IdSuffixLocator {
    fn default() -> Self {
        Self {
            name: "_Label3".to_string(),
            address: "_Label5".to_string(),
            postal_code: "_Label7".to_string(),
            city: "_Label8".to_string(),
            website: "_LinkButton1".to_string(),
        }
    }
}

impl ColumnLocator for IdSuffixLocator {
    fn locate(&self, document: &Html) -> FieldColumns {
        let mut columns = FieldColumns::default();
        for element in document.select(&ID_SELECTOR) {
            let Some(id) = element.value().id() else {
                continue;
            };
            let slot = if id.ends_with(self.name.as_str()) {
                &mut columns.names
            } else if id.ends_with(self.address.as_str()) {
                &mut columns.addresses
            } else if id.ends_with(self.postal_code.as_str()) {
                &mut columns.postal_codes
            } else if id.ends_with(self.city.as_str()) {
                &mut columns.cities
            } else if id.ends_with(self.website.as_str()) && element.value().name() == "a" {
                &mut columns.websites
            } else {
                continue;
            };
            slot.push(element_text(element));
        }
        columns
    }
}

/// Reads fields from explicit `<tr>`/`<td>` boundaries of the listing
/// table, by cell position.
#[derive(Debug, Clone)]
pub struct GridCellLocator {
    /// Substring of the table's id attribute.
    pub table_id_marker: String,
    pub name_cell: usize,
    pub address_cell: usize,
    pub postal_code_cell: usize,
    pub city_cell: usize,
    pub website_cell: usize,
}

impl Default for GridCellLocator {
    fn default() -> Self {
        Self {
            table_id_marker: "GridView1".to_string(),
            name_cell: 0,
            address_cell: 1,
            postal_code_cell: 2,
            city_cell: 3,
            website_cell: 4,
        }
    }
}

impl GridCellLocator {
    fn max_cell(&self) -> usize {
        [
            self.name_cell,
            self.address_cell,
            self.postal_code_cell,
            self.city_cell,
            self.website_cell,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

impl ColumnLocator for GridCellLocator {
    fn locate(&self, document: &Html) -> FieldColumns {
        let mut columns = FieldColumns::default();
        let Some(table) = document.select(&TABLE_SELECTOR).find(|t| {
            t.value()
                .id()
                .is_some_and(|id| id.contains(self.table_id_marker.as_str()))
        }) else {
            tracing::debug!(marker = %self.table_id_marker, "listing table not found");
            return columns;
        };

        for row in table.select(&ROW_SELECTOR) {
            let cells: Vec<ElementRef<'_>> = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| cell.value().name() == "td")
                .collect();
            // Header, pager and spacer rows don't span the field cells.
            if cells.len() <= self.max_cell() {
                continue;
            }
            let text_at = |index: usize| element_text(cells[index]);
            columns.names.push(text_at(self.name_cell));
            columns.addresses.push(text_at(self.address_cell));
            columns.postal_codes.push(text_at(self.postal_code_cell));
            columns.cities.push(text_at(self.city_cell));
            let website_cell = cells[self.website_cell];
            let link = website_cell
                .select(&ANCHOR_SELECTOR)
                .next()
                .unwrap_or(website_cell);
            columns.websites.push(element_text(link));
        }
        columns
    }
}

/// Decoded text content with runs of whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Zips parallel field columns into rows.
///
/// Produces exactly `min` of the five column lengths; trailing entries
/// of longer columns are dropped. Script pseudo-URLs in the website
/// column become empty.
#[must_use]
pub fn reconcile(columns: FieldColumns) -> Vec<RawRow> {
    let lengths = columns.lengths();
    let min_len = lengths.iter().copied().min().unwrap_or(0);
    if lengths.iter().any(|&len| len != min_len) {
        tracing::warn!(
            names = lengths[0],
            addresses = lengths[1],
            postal_codes = lengths[2],
            cities = lengths[3],
            websites = lengths[4],
            kept = min_len,
            "field columns are ragged; truncating to the shortest"
        );
    }

    let FieldColumns {
        names,
        addresses,
        postal_codes,
        cities,
        websites,
    } = columns;

    names
        .into_iter()
        .zip(addresses)
        .zip(postal_codes)
        .zip(cities)
        .zip(websites)
        .take(min_len)
        .map(|((((name, address), postal_code), city), website)| {
            [
                (COLUMN_NAME, name),
                (COLUMN_ADDRESS, address),
                (COLUMN_POSTAL_CODE, postal_code),
                (COLUMN_CITY, city),
                (COLUMN_WEBSITE, normalize_website(&website)),
            ]
            .into_iter()
            .collect()
        })
        .collect()
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod tests;
