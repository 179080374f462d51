//! Per-record enrichment: geocode, classify, route, link.
//!
//! Records are processed strictly in input order, one lookup at a time.
//! Each lookup is tried once; a failure only resets the fields that
//! lookup would have filled.

use std::time::Duration;

use lunchwidget_core::{
    ColumnMapping, GeoPoint, RawRow, Record, GEOCODE_FAILED_DISPLAY, ROUTE_FAILED_DISPLAY,
    WALKING_MINUTES_UNKNOWN,
};

use crate::client::LookupClient;
use crate::cuisine::classify;
use crate::error::EnrichError;
use crate::geocode::{geocode_query, GeocodeHit};
use crate::maps::maps_link;

/// How a batch is enriched.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Starting point of every walking route.
    pub origin: GeoPoint,
    /// Fill `cuisine` from geocoding tags. When off, `cuisine` stays `None`.
    pub classify_cuisine: bool,
    /// Pause between consecutive records, in milliseconds.
    pub delay_ms: u64,
    /// Emit a progress event every this many records; `0` disables.
    pub progress_every: usize,
    pub mapping: ColumnMapping,
}

impl EnrichOptions {
    #[must_use]
    pub fn new(origin: GeoPoint) -> Self {
        Self {
            origin,
            classify_cuisine: false,
            delay_ms: 0,
            progress_every: 10,
            mapping: ColumnMapping::default(),
        }
    }
}

pub struct Enricher {
    client: LookupClient,
    options: EnrichOptions,
}

impl Enricher {
    #[must_use]
    pub fn new(client: LookupClient, options: EnrichOptions) -> Self {
        Self { client, options }
    }

    #[must_use]
    pub fn options(&self) -> &EnrichOptions {
        &self.options
    }

    /// Enriches every row, returning records in the same order.
    pub async fn enrich_all(&self, rows: Vec<RawRow>) -> Vec<Record> {
        let total = rows.len();
        let mut records = Vec::with_capacity(total);

        for (index, row) in rows.into_iter().enumerate() {
            if index > 0 && self.options.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.options.delay_ms)).await;
            }
            records.push(self.enrich_record(row).await);

            let processed = index + 1;
            if self.options.progress_every > 0 && processed % self.options.progress_every == 0 {
                tracing::info!(processed, total, "enrichment progress");
            }
        }

        let geocoded = records.iter().filter(|r| r.coordinates().is_some()).count();
        let routed = records.iter().filter(|r| r.is_walking_time_known()).count();
        tracing::info!(total, geocoded, routed, "enrichment complete");
        records
    }

    /// Builds one record from `row` and fills its enrichment fields.
    pub async fn enrich_record(&self, row: RawRow) -> Record {
        let mut record = Record::from_row(row, &self.options.mapping);
        let hit = self.geocode(&record).await;

        match &hit {
            Some(hit) => {
                record.latitude = Some(hit.lat);
                record.longitude = Some(hit.lon);
                let destination = GeoPoint {
                    lat: hit.lat,
                    lon: hit.lon,
                };
                match self
                    .client
                    .walking_minutes(self.options.origin, destination)
                    .await
                {
                    Ok(minutes) => {
                        record.walking_minutes = minutes;
                        record.walking_time_display = format!("{minutes} min");
                    }
                    Err(e) => {
                        log_lookup_failure("route", &record.name, &e);
                        record.walking_minutes = WALKING_MINUTES_UNKNOWN;
                        record.walking_time_display = ROUTE_FAILED_DISPLAY.to_string();
                    }
                }
            }
            None => {
                record.walking_minutes = WALKING_MINUTES_UNKNOWN;
                record.walking_time_display = GEOCODE_FAILED_DISPLAY.to_string();
            }
        }

        if self.options.classify_cuisine {
            record.cuisine = Some(classify(hit.as_ref()));
        }
        record.maps_link = maps_link(&record.street_address, &record.city);
        record
    }

    async fn geocode(&self, record: &Record) -> Option<GeocodeHit> {
        let query = geocode_query(record);
        if query.is_empty() {
            tracing::debug!(name = %record.name, "no address to geocode");
            return None;
        }
        match self.client.geocode(&query).await {
            Ok(hit) => Some(hit),
            Err(e) => {
                log_lookup_failure("geocode", &record.name, &e);
                None
            }
        }
    }
}

fn log_lookup_failure(lookup: &str, name: &str, error: &EnrichError) {
    match error {
        EnrichError::NoResults { .. }
        | EnrichError::RouteUnavailable { .. }
        | EnrichError::RouteTooLong { .. } => {
            tracing::debug!(lookup, name, error = %error, "lookup found nothing");
        }
        _ => tracing::warn!(lookup, name, error = %error, "lookup failed"),
    }
}
