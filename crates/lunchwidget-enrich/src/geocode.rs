//! Photon geocoding payloads.
//!
//! Photon answers with a GeoJSON `FeatureCollection`. Only the first
//! feature matters: its point geometry (`[lon, lat]`) and the two tag
//! properties that hint at the kind of place.

use lunchwidget_core::Record;
use serde::Deserialize;

use crate::error::EnrichError;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    cuisine: Option<String>,
    osm_value: Option<String>,
}

/// First geocoding match for an address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub lat: f64,
    pub lon: f64,
    /// The place's `cuisine` tag, if tagged.
    pub cuisine: Option<String>,
    /// The value of the place's primary OSM tag, e.g. `restaurant`.
    pub osm_value: Option<String>,
}

/// Free-text query for a record: `"{street}, {postal} {city}"` with empty
/// parts left out.
#[must_use]
pub fn geocode_query(record: &Record) -> String {
    let locality = [record.postal_code.as_str(), record.city.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    [record.street_address.as_str(), locality.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses a Photon response body into its first hit.
///
/// # Errors
///
/// - [`EnrichError::Deserialize`] if the body is not a feature collection.
/// - [`EnrichError::NoResults`] if there are no features, or the first one
///   has fewer than two coordinates.
pub fn parse_feature_collection(body: &str, query: &str) -> Result<GeocodeHit, EnrichError> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|source| EnrichError::Deserialize {
            context: format!("geocode(q={query})"),
            source,
        })?;

    let no_results = || EnrichError::NoResults {
        query: query.to_owned(),
    };
    let feature = collection.features.into_iter().next().ok_or_else(no_results)?;
    let [lon, lat, ..] = feature.geometry.coordinates[..] else {
        return Err(no_results());
    };

    Ok(GeocodeHit {
        lat,
        lon,
        cuisine: feature.properties.cuisine,
        osm_value: feature.properties.osm_value,
    })
}

#[cfg(test)]
mod tests {
    use lunchwidget_core::{ColumnMapping, RawRow};

    use super::*;

    fn record(street: &str, postal: &str, city: &str) -> Record {
        let row: RawRow = [("Adresse", street), ("PLZ", postal), ("Ort", city)]
            .into_iter()
            .collect();
        Record::from_row(row, &ColumnMapping::default())
    }

    #[test]
    fn query_joins_present_parts() {
        assert_eq!(
            geocode_query(&record("Sihlstrasse 28", "8001", "Zürich")),
            "Sihlstrasse 28, 8001 Zürich"
        );
        assert_eq!(geocode_query(&record("Sihlstrasse 28", "", "Zürich")), "Sihlstrasse 28, Zürich");
        assert_eq!(geocode_query(&record("", "8001", "Zürich")), "8001 Zürich");
        assert_eq!(geocode_query(&record("", "", "")), "");
    }

    #[test]
    fn takes_first_feature_and_swaps_coordinate_order() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[8.5331,47.3732]},
             "properties":{"osm_value":"restaurant","cuisine":"vegetarian","name":"Hiltl"}},
            {"type":"Feature","geometry":{"type":"Point","coordinates":[0.0,0.0]},"properties":{}}
        ]}"#;
        let hit = parse_feature_collection(body, "q").unwrap();
        assert!((hit.lat - 47.3732).abs() < 1e-9);
        assert!((hit.lon - 8.5331).abs() < 1e-9);
        assert_eq!(hit.cuisine.as_deref(), Some("vegetarian"));
        assert_eq!(hit.osm_value.as_deref(), Some("restaurant"));
    }

    #[test]
    fn empty_features_is_no_results() {
        let err = parse_feature_collection(r#"{"features":[]}"#, "nowhere").unwrap_err();
        assert!(matches!(err, EnrichError::NoResults { ref query } if query == "nowhere"));
    }

    #[test]
    fn short_coordinates_is_no_results() {
        let body = r#"{"features":[{"geometry":{"coordinates":[8.5]},"properties":{}}]}"#;
        let err = parse_feature_collection(body, "q").unwrap_err();
        assert!(matches!(err, EnrichError::NoResults { .. }), "got: {err:?}");
    }

    #[test]
    fn malformed_payload_is_deserialize_error() {
        let err = parse_feature_collection("<html>rate limited</html>", "q").unwrap_err();
        assert!(matches!(err, EnrichError::Deserialize { .. }), "got: {err:?}");
    }
}
