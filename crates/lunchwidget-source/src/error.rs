use std::path::PathBuf;

use thiserror::Error;

/// Acquisition failures. Any of these halts the pipeline before enrichment.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no input file found in {}", dir.display())]
    NoInputFound { dir: PathBuf },

    #[error("no restaurant rows extracted from {origin}")]
    NoRows { origin: String },

    #[error("page at {url} has no named form fields to post back")]
    NoFormFields { url: String },
}
