use crate::escape::escape;

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1&destination=";

/// Directions link to `"{street}, {city}"`. Computable for any input,
/// including empty address fields.
#[must_use]
pub fn maps_link(street_address: &str, city: &str) -> String {
    format!(
        "{DIRECTIONS_BASE}{}",
        escape(&format!("{street_address}, {city}"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_street_and_city() {
        assert_eq!(
            maps_link("Bahnhofstrasse 28a", "Zürich"),
            "https://www.google.com/maps/dir/?api=1&destination=Bahnhofstrasse%2028a%2C%20Z%C3%BCrich"
        );
    }

    #[test]
    fn empty_address_still_yields_a_link() {
        let link = maps_link("", "");
        assert_eq!(link, format!("{DIRECTIONS_BASE}%2C%20"));
    }
}
