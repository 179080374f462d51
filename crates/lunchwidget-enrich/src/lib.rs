//! Location, walking-time, cuisine and navigation enrichment of records.

pub mod client;
pub mod cuisine;
pub mod engine;
pub mod error;
pub mod escape;
pub mod geocode;
pub mod maps;
pub mod routing;

pub use client::LookupClient;
pub use cuisine::classify;
pub use engine::{EnrichOptions, Enricher};
pub use error::EnrichError;
pub use escape::escape;
pub use geocode::{geocode_query, GeocodeHit};
pub use maps::maps_link;
