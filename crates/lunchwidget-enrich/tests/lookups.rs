//! Integration tests for `Enricher` against mock geocoding and routing
//! services.
//!
//! One `wiremock` server plays both Photon (`/api/`) and OSRM
//! (`/route/v1/foot/...`). Every scenario checks that a failed lookup
//! leaves only its own fields at their fallback values.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lunchwidget_core::{GeoPoint, RawRow, DEFAULT_CUISINE, WALKING_MINUTES_UNKNOWN};
use lunchwidget_enrich::{EnrichOptions, Enricher, LookupClient};

const PARADEPLATZ: GeoPoint = GeoPoint {
    lat: 47.3696,
    lon: 8.538,
};

fn row(name: &str, street: &str, city: &str) -> RawRow {
    [
        ("Restaurant", name),
        ("Adresse", street),
        ("PLZ", "8001"),
        ("Ort", city),
    ]
    .into_iter()
    .collect()
}

fn enricher(server: &MockServer, timeout_secs: u64, classify_cuisine: bool) -> Enricher {
    let client = LookupClient::new(&server.uri(), &server.uri(), timeout_secs, "lunchwidget-test/0.1")
        .expect("failed to build test LookupClient");
    let mut options = EnrichOptions::new(PARADEPLATZ);
    options.classify_cuisine = classify_cuisine;
    Enricher::new(client, options)
}

fn feature(lon: f64, lat: f64, properties: serde_json::Value) -> serde_json::Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [lon, lat]},
            "properties": properties
        }]
    })
}

async fn mount_geocode(server: &MockServer, query: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("q", query))
        .and(query_param("limit", "1"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn resolved_record_gets_coordinates_cuisine_and_walking_time() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "Sihlstrasse 28, 8001 Zürich",
        ResponseTemplate::new(200).set_body_json(feature(
            8.5331,
            47.3732,
            json!({"osm_value": "restaurant", "cuisine": "vegetarian;vegan"}),
        )),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/route/v1/foot/8.538,47.3696;8.5331,47.3732"))
        .and(query_param("overview", "false"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "Ok", "routes": [{"duration": 412.7}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let records = enricher(&server, 5, true)
        .enrich_all(vec![row("Hiltl", "Sihlstrasse 28", "Zürich")])
        .await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.latitude, Some(47.3732));
    assert_eq!(record.longitude, Some(8.5331));
    assert_eq!(record.cuisine.as_deref(), Some("Vegetarian"));
    assert_eq!(record.walking_minutes, 6);
    assert_eq!(record.walking_time_display, "6 min");
    assert_eq!(
        record.maps_link,
        "https://www.google.com/maps/dir/?api=1&destination=Sihlstrasse%2028%2C%20Z%C3%BCrich"
    );
}

#[tokio::test]
async fn empty_features_fall_back_without_routing() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "Nirgendwo 1, 8001 Zürich",
        ResponseTemplate::new(200).set_body_json(json!({"type": "FeatureCollection", "features": []})),
    )
    .await;
    Mock::given(path_regex("^/route/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let records = enricher(&server, 5, true)
        .enrich_all(vec![row("Phantom", "Nirgendwo 1", "Zürich")])
        .await;

    let record = &records[0];
    assert_eq!(record.latitude, None);
    assert_eq!(record.longitude, None);
    assert_eq!(record.cuisine.as_deref(), Some(DEFAULT_CUISINE));
    assert_eq!(record.walking_minutes, WALKING_MINUTES_UNKNOWN);
    assert_eq!(record.walking_time_display, "?");
    assert!(record.maps_link.starts_with("https://www.google.com/maps/dir/?api=1&destination="));
}

#[tokio::test]
async fn failed_geocode_does_not_stop_the_batch() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Kaputt 1, 8001 Zürich", ResponseTemplate::new(503)).await;
    mount_geocode(
        &server,
        "Limmatquai 1, 8001 Zürich",
        ResponseTemplate::new(200).set_body_json(feature(8.54, 47.37, json!({}))),
    )
    .await;
    Mock::given(path_regex("^/route/v1/foot/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "Ok", "routes": [{"duration": 120.0}]})),
        )
        .mount(&server)
        .await;

    let records = enricher(&server, 5, true)
        .enrich_all(vec![
            row("Broken", "Kaputt 1", "Zürich"),
            row("Working", "Limmatquai 1", "Zürich"),
        ])
        .await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Broken");
    assert_eq!(records[0].walking_time_display, "?");
    assert_eq!(records[1].name, "Working");
    assert_eq!(records[1].walking_minutes, 2);
    assert_eq!(records[1].cuisine.as_deref(), Some(DEFAULT_CUISINE));
    assert!(records[0].proximity_key() > records[1].proximity_key());
}

#[tokio::test]
async fn unroutable_destination_keeps_coordinates() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "Seestrasse 1, 8001 Zürich",
        ResponseTemplate::new(200).set_body_json(feature(8.54, 47.36, json!({}))),
    )
    .await;
    Mock::given(path_regex("^/route/v1/foot/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "NoRoute", "message": "Impossible route between points"})),
        )
        .mount(&server)
        .await;

    let records = enricher(&server, 5, false)
        .enrich_all(vec![row("Boat", "Seestrasse 1", "Zürich")])
        .await;

    let record = &records[0];
    assert_eq!(record.latitude, Some(47.36));
    assert_eq!(record.walking_minutes, WALKING_MINUTES_UNKNOWN);
    assert_eq!(record.walking_time_display, "N/A");
    assert_eq!(record.cuisine, None, "classification is off");
}

#[tokio::test]
async fn implausibly_long_route_counts_as_unroutable() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "Bahnhofplatz 1, 8001 Zürich",
        ResponseTemplate::new(200).set_body_json(feature(-73.99, 40.75, json!({}))),
    )
    .await;
    Mock::given(path_regex("^/route/v1/foot/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "Ok", "routes": [{"duration": 59990.0}]})),
        )
        .mount(&server)
        .await;

    let records = enricher(&server, 5, false)
        .enrich_all(vec![row("Misplaced", "Bahnhofplatz 1", "Zürich")])
        .await;

    let record = &records[0];
    assert_eq!(record.latitude, Some(40.75));
    assert_eq!(record.walking_minutes, WALKING_MINUTES_UNKNOWN);
    assert_eq!(record.walking_time_display, "N/A");
    assert!(!record.is_walking_time_known());
}

#[tokio::test]
async fn slow_geocoder_times_out_to_fallback() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        "Langsam 1, 8001 Zürich",
        ResponseTemplate::new(200)
            .set_body_json(feature(8.54, 47.37, json!({})))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let records = enricher(&server, 1, true)
        .enrich_all(vec![row("Snail", "Langsam 1", "Zürich")])
        .await;

    assert_eq!(records[0].latitude, None);
    assert_eq!(records[0].walking_minutes, WALKING_MINUTES_UNKNOWN);
    assert_eq!(records[0].cuisine.as_deref(), Some(DEFAULT_CUISINE));
}
