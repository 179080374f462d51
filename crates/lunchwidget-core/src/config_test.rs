use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_succeeds_with_empty_environment() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.input_dir, PathBuf::from("."));
    assert_eq!(
        cfg.directory_url,
        "https://directory.lunch-check.ch/LunchCheck/LC_Directory.aspx"
    );
    assert_eq!(cfg.page_size, 500);
    assert_eq!(cfg.page_size_control, "ctl00$ContentPlaceHolder1$ddlPageSize");
    assert_eq!(cfg.template_path, PathBuf::from("./widget_template.html"));
    assert_eq!(cfg.output_path, PathBuf::from("./lunch_widget.html"));
    assert_eq!(cfg.host_document_path, PathBuf::from("./lunch_app.html"));
    assert_eq!(cfg.data_variable, "appData");
    assert_eq!(cfg.geocoder_url, "https://photon.komoot.io");
    assert_eq!(cfg.router_url, "http://router.project-osrm.org");
    assert_eq!(
        cfg.origin,
        GeoPoint {
            lat: 47.3696,
            lon: 8.5380
        }
    );
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.scrape_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "Mozilla/5.0 (compatible; LunchWidget/1.0)");
    assert_eq!(cfg.enrich_delay_ms, 500);
    assert_eq!(cfg.record_limit, 50);
}

#[test]
fn overrides_are_applied() {
    let mut map = HashMap::new();
    map.insert("LUNCHWIDGET_INPUT_DIR", "/srv/exports");
    map.insert("LUNCHWIDGET_PAGE_SIZE", "250");
    map.insert("LUNCHWIDGET_ORIGIN", " 46.948 , 7.4474 ");
    map.insert("LUNCHWIDGET_RECORD_LIMIT", "0");
    map.insert("LUNCHWIDGET_DATA_VARIABLE", "$restaurants");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.input_dir, PathBuf::from("/srv/exports"));
    assert_eq!(cfg.page_size, 250);
    assert!((cfg.origin.lat - 46.948).abs() < 1e-9);
    assert!((cfg.origin.lon - 7.4474).abs() < 1e-9);
    assert_eq!(cfg.record_limit, 0);
    assert_eq!(cfg.data_variable, "$restaurants");
}

#[test]
fn invalid_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LUNCHWIDGET_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LUNCHWIDGET_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(LUNCHWIDGET_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn invalid_page_size_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LUNCHWIDGET_PAGE_SIZE", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LUNCHWIDGET_PAGE_SIZE"),
        "expected InvalidEnvVar(LUNCHWIDGET_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn origin_without_comma_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LUNCHWIDGET_ORIGIN", "47.3696");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LUNCHWIDGET_ORIGIN"),
        "expected InvalidEnvVar(LUNCHWIDGET_ORIGIN), got: {result:?}"
    );
}

#[test]
fn origin_out_of_range_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LUNCHWIDGET_ORIGIN", "8.5380,147.3696");
    assert!(build_app_config(lookup_from_map(&map)).is_ok());

    map.insert("LUNCHWIDGET_ORIGIN", "147.3696,8.5380");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LUNCHWIDGET_ORIGIN"),
        "expected InvalidEnvVar(LUNCHWIDGET_ORIGIN), got: {result:?}"
    );
}

#[test]
fn data_variable_must_be_an_identifier() {
    let mut map = HashMap::new();
    map.insert("LUNCHWIDGET_DATA_VARIABLE", "app data");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LUNCHWIDGET_DATA_VARIABLE"),
        "expected InvalidEnvVar(LUNCHWIDGET_DATA_VARIABLE), got: {result:?}"
    );
}

#[test]
fn geo_point_displays_lat_lon() {
    let p = GeoPoint {
        lat: 47.3696,
        lon: 8.538,
    };
    assert_eq!(p.to_string(), "47.3696,8.538");
}
