//! OSRM route payloads.

use lunchwidget_core::WALKING_MINUTES_UNKNOWN;
use serde::Deserialize;

use crate::error::EnrichError;

const CODE_OK: &str = "Ok";

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Seconds.
    duration: f64,
}

/// Whole minutes in `seconds`, rounded down.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn whole_minutes(seconds: f64) -> u32 {
    // `as` saturates, so negative or non-finite durations land on 0 or u32::MAX.
    (seconds / 60.0).floor() as u32
}

/// Parses an OSRM route response into the first route's walking minutes.
///
/// # Errors
///
/// - [`EnrichError::Deserialize`] if the body has no `code` or is not JSON.
/// - [`EnrichError::RouteUnavailable`] if `code` is not `Ok` or there are
///   no routes.
/// - [`EnrichError::RouteTooLong`] if the walk takes
///   [`WALKING_MINUTES_UNKNOWN`] minutes or more, so every resolved time
///   sorts before the sentinel.
pub fn parse_route_minutes(body: &str) -> Result<u32, EnrichError> {
    let response: RouteResponse =
        serde_json::from_str(body).map_err(|source| EnrichError::Deserialize {
            context: "route".to_string(),
            source,
        })?;

    if response.code != CODE_OK {
        return Err(EnrichError::RouteUnavailable {
            code: response.code,
        });
    }
    let route = response
        .routes
        .first()
        .ok_or_else(|| EnrichError::RouteUnavailable {
            code: response.code.clone(),
        })?;
    let minutes = whole_minutes(route.duration);
    if minutes >= WALKING_MINUTES_UNKNOWN {
        return Err(EnrichError::RouteTooLong { minutes });
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_duration_to_minutes() {
        assert_eq!(whole_minutes(0.0), 0);
        assert_eq!(whole_minutes(59.9), 0);
        assert_eq!(whole_minutes(60.0), 1);
        assert_eq!(whole_minutes(719.4), 11);
    }

    #[test]
    fn ok_response_yields_first_route() {
        let body = r#"{"code":"Ok","routes":[{"duration":412.7,"distance":520.1},{"duration":9000}],"waypoints":[]}"#;
        assert_eq!(parse_route_minutes(body).unwrap(), 6);
    }

    #[test]
    fn walks_reaching_the_sentinel_are_rejected() {
        let body = |seconds: f64| format!(r#"{{"code":"Ok","routes":[{{"duration":{seconds}}}]}}"#);
        assert_eq!(parse_route_minutes(&body(59_939.0)).unwrap(), 998);
        for seconds in [59_940.0, 59_990.0, 90_000.0] {
            let err = parse_route_minutes(&body(seconds)).unwrap_err();
            assert!(matches!(err, EnrichError::RouteTooLong { .. }), "{seconds}: {err:?}");
        }
    }

    #[test]
    fn non_ok_code_is_unavailable() {
        let err = parse_route_minutes(r#"{"code":"NoRoute","message":"Impossible route"}"#)
            .unwrap_err();
        assert!(matches!(err, EnrichError::RouteUnavailable { ref code } if code == "NoRoute"));
    }

    #[test]
    fn ok_without_routes_is_unavailable() {
        let err = parse_route_minutes(r#"{"code":"Ok","routes":[]}"#).unwrap_err();
        assert!(matches!(err, EnrichError::RouteUnavailable { .. }), "got: {err:?}");
    }
}
