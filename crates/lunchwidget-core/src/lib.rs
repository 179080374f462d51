pub mod app_config;
pub mod config;
pub mod record;

pub use app_config::{AppConfig, GeoPoint};
pub use config::{load_app_config, load_app_config_from_env};
pub use record::{
    normalize_website, ColumnMapping, RawRow, Record, DEFAULT_CUISINE, GEOCODE_FAILED_DISPLAY,
    ROUTE_FAILED_DISPLAY, WALKING_MINUTES_UNKNOWN,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
