use std::path::PathBuf;

use crate::app_config::{AppConfig, GeoPoint};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a
/// plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("LUNCHWIDGET_LOG_LEVEL", "info");
    let input_dir = PathBuf::from(or_default("LUNCHWIDGET_INPUT_DIR", "."));
    let directory_url = or_default(
        "LUNCHWIDGET_DIRECTORY_URL",
        "https://directory.lunch-check.ch/LunchCheck/LC_Directory.aspx",
    );
    let page_size = parse_u32("LUNCHWIDGET_PAGE_SIZE", "500")?;
    let page_size_control = or_default(
        "LUNCHWIDGET_PAGE_SIZE_CONTROL",
        "ctl00$ContentPlaceHolder1$ddlPageSize",
    );
    let template_path = PathBuf::from(or_default(
        "LUNCHWIDGET_TEMPLATE_PATH",
        "./widget_template.html",
    ));
    let output_path = PathBuf::from(or_default(
        "LUNCHWIDGET_OUTPUT_PATH",
        "./lunch_widget.html",
    ));
    let host_document_path = PathBuf::from(or_default(
        "LUNCHWIDGET_HOST_DOCUMENT_PATH",
        "./lunch_app.html",
    ));
    let data_variable = or_default("LUNCHWIDGET_DATA_VARIABLE", "appData");
    if !is_js_identifier(&data_variable) {
        return Err(invalid(
            "LUNCHWIDGET_DATA_VARIABLE",
            format!("\"{data_variable}\" is not a script identifier"),
        ));
    }
    let geocoder_url = or_default("LUNCHWIDGET_GEOCODER_URL", "https://photon.komoot.io");
    let router_url = or_default("LUNCHWIDGET_ROUTER_URL", "http://router.project-osrm.org");
    let origin = parse_origin(&or_default("LUNCHWIDGET_ORIGIN", "47.3696,8.5380"))
        .map_err(|reason| invalid("LUNCHWIDGET_ORIGIN", reason))?;
    let request_timeout_secs = parse_u64("LUNCHWIDGET_REQUEST_TIMEOUT_SECS", "10")?;
    let scrape_timeout_secs = parse_u64("LUNCHWIDGET_SCRAPE_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "LUNCHWIDGET_USER_AGENT",
        "Mozilla/5.0 (compatible; LunchWidget/1.0)",
    );
    let enrich_delay_ms = parse_u64("LUNCHWIDGET_ENRICH_DELAY_MS", "500")?;
    let record_limit = parse_usize("LUNCHWIDGET_RECORD_LIMIT", "50")?;

    Ok(AppConfig {
        log_level,
        input_dir,
        directory_url,
        page_size,
        page_size_control,
        template_path,
        output_path,
        host_document_path,
        data_variable,
        geocoder_url,
        router_url,
        origin,
        request_timeout_secs,
        scrape_timeout_secs,
        user_agent,
        enrich_delay_ms,
        record_limit,
    })
}

/// Parse a `"lat,lon"` pair, rejecting values outside WGS84 bounds.
fn parse_origin(raw: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got \"{raw}\""))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let lon = lon.trim().parse::<f64>().map_err(|e| e.to_string())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("coordinate {lat},{lon} is out of range"));
    }
    Ok(GeoPoint { lat, lon })
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
