//! HTTP client for the geocoding and routing services.

use std::time::Duration;

use lunchwidget_core::GeoPoint;
use reqwest::Client;

use crate::error::EnrichError;
use crate::escape::escape;
use crate::geocode::{parse_feature_collection, GeocodeHit};
use crate::routing::parse_route_minutes;

/// One `reqwest` client shared by every lookup, with a per-request timeout.
pub struct LookupClient {
    client: Client,
    geocoder_url: String,
    router_url: String,
}

impl LookupClient {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        geocoder_url: &str,
        router_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            geocoder_url: geocoder_url.trim_end_matches('/').to_owned(),
            router_url: router_url.trim_end_matches('/').to_owned(),
        })
    }

    fn geocode_url(&self, query: &str) -> String {
        format!("{}/api/?q={}&limit=1", self.geocoder_url, escape(query))
    }

    fn route_url(&self, origin: GeoPoint, destination: GeoPoint) -> String {
        format!(
            "{}/route/v1/foot/{},{};{},{}?overview=false",
            self.router_url, origin.lon, origin.lat, destination.lon, destination.lat
        )
    }

    /// Looks `query` up and returns the first match.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::Http`] on network failure or timeout.
    /// - [`EnrichError::UnexpectedStatus`] on a non-2xx status.
    /// - [`EnrichError::Deserialize`] / [`EnrichError::NoResults`] from
    ///   [`parse_feature_collection`].
    pub async fn geocode(&self, query: &str) -> Result<GeocodeHit, EnrichError> {
        let body = self.request_text(&self.geocode_url(query)).await?;
        parse_feature_collection(&body, query)
    }

    /// Walking time in whole minutes from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::Http`] on network failure or timeout.
    /// - [`EnrichError::UnexpectedStatus`] on a non-2xx status.
    /// - [`EnrichError::Deserialize`], [`EnrichError::RouteUnavailable`] or
    ///   [`EnrichError::RouteTooLong`] from [`parse_route_minutes`].
    pub async fn walking_minutes(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<u32, EnrichError> {
        let body = self
            .request_text(&self.route_url(origin, destination))
            .await?;
        parse_route_minutes(&body)
    }

    async fn request_text(&self, url: &str) -> Result<String, EnrichError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }
}
