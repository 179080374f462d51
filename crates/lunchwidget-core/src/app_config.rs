use std::path::PathBuf;

/// A WGS84 coordinate in standard latitude/longitude order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub input_dir: PathBuf,
    pub directory_url: String,
    pub page_size: u32,
    pub page_size_control: String,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub host_document_path: PathBuf,
    pub data_variable: String,
    pub geocoder_url: String,
    pub router_url: String,
    /// Fixed starting point for every walking-time lookup.
    pub origin: GeoPoint,
    pub request_timeout_secs: u64,
    pub scrape_timeout_secs: u64,
    pub user_agent: String,
    pub enrich_delay_ms: u64,
    /// Maximum rows processed by the widget command; `0` means unlimited.
    pub record_limit: usize,
}
