use thiserror::Error;

/// Errors from a single geocoding or routing lookup.
///
/// The engine never propagates these; each one is logged and turned into
/// the field's fallback value.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body did not have the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no geocoding result for {query:?}")]
    NoResults { query: String },

    /// The router answered, but without a usable route.
    #[error("route unavailable (code {code})")]
    RouteUnavailable { code: String },

    /// The route is so long it would collide with the unknown-time sentinel.
    #[error("route of {minutes} min is beyond walking range")]
    RouteTooLong { minutes: u32 },
}
