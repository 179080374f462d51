//! Remote directory acquisition: page-size postback plus listing extraction.

use lunchwidget_core::RawRow;
use scraper::Html;

use crate::error::SourceError;
use crate::form::{FormSession, FormTransport};
use crate::grid::{reconcile, ColumnLocator};

/// Where the directory lives and how to ask it for a single full page.
#[derive(Debug, Clone)]
pub struct DirectoryRequest {
    pub url: String,
    /// Form name of the page-size dropdown; it doubles as the event target.
    pub page_size_control: String,
    pub page_size: u32,
}

/// Fetches the directory listing in one response and extracts its rows.
///
/// Opens a form session on the directory URL, posts back with the
/// page-size control as event target and `page_size` as its value, then
/// extracts rows from the response with `locator`.
///
/// # Errors
///
/// - Transport errors from either exchange.
/// - [`SourceError::NoFormFields`] if the initial page has no form.
/// - [`SourceError::NoRows`] if nothing could be extracted.
pub async fn scrape_directory<T, L>(
    transport: &T,
    request: &DirectoryRequest,
    locator: &L,
) -> Result<Vec<RawRow>, SourceError>
where
    T: FormTransport,
    L: ColumnLocator + ?Sized,
{
    tracing::info!(url = %request.url, "fetching directory");
    let session = FormSession::open(transport, &request.url).await?;

    let page_size = request.page_size.to_string();
    let html = session
        .submit_postback(
            &request.page_size_control,
            "",
            &[(request.page_size_control.as_str(), page_size.as_str())],
        )
        .await?;

    let rows = extract_rows(&html, locator);
    tracing::info!(url = %request.url, rows = rows.len(), "extracted directory listing");
    if rows.is_empty() {
        return Err(SourceError::NoRows {
            origin: request.url.clone(),
        });
    }
    Ok(rows)
}

/// Parses `html` once and reconciles the columns `locator` finds into rows.
#[must_use]
pub fn extract_rows<L: ColumnLocator + ?Sized>(html: &str, locator: &L) -> Vec<RawRow> {
    let document = Html::parse_document(html);
    reconcile(locator.locate(&document))
}
