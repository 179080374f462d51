//! Restaurant row acquisition from a local export or the remote directory.

pub mod error;
pub mod form;
pub mod grid;
pub mod local;
pub mod remote;

use std::path::PathBuf;

use lunchwidget_core::RawRow;

pub use error::SourceError;
pub use form::{FormFields, FormSession, FormTransport, HttpTransport};
pub use grid::{reconcile, ColumnLocator, FieldColumns, GridCellLocator, IdSuffixLocator};
pub use local::{find_input_file, load_local_rows, read_rows, sniff_delimiter};
pub use remote::{extract_rows, scrape_directory, DirectoryRequest};

/// Which external source to acquire rows from.
#[derive(Debug, Clone)]
pub enum SourceSpec {
    LocalDir(PathBuf),
    Directory(DirectoryRequest),
}

impl SourceSpec {
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, SourceSpec::Directory(_))
    }

    /// Acquires raw rows from the configured source.
    ///
    /// Remote acquisition uses [`HttpTransport`] with the given timeout and
    /// user agent, and the default [`IdSuffixLocator`].
    ///
    /// # Errors
    ///
    /// Any [`SourceError`]; all of them mean there is nothing to enrich.
    pub async fn acquire(
        &self,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Vec<RawRow>, SourceError> {
        match self {
            SourceSpec::LocalDir(dir) => load_local_rows(dir),
            SourceSpec::Directory(request) => {
                let transport = HttpTransport::new(timeout_secs, user_agent)?;
                scrape_directory(&transport, request, &IdSuffixLocator::default()).await
            }
        }
    }
}
