use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template lacks `{% for item in items %}` / `{% endfor %}`, or
    /// has them in the wrong order.
    #[error("template loop markers not found")]
    MissingLoopMarkers,

    #[error("no `{variable} = ...;` assignment found in host document")]
    AssignmentNotFound { variable: String },

    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}
