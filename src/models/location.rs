// src/models/location.rs
// DOCUMENTATION: GPS fixes and reverse-geocoded place records
// PURPOSE: Inputs to the two detection strategies

use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A momentary GPS fix reported by the device
/// DOCUMENTATION: Never persisted; the UI posts a fresh one on every location refresh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy in meters, null when the platform does not report it
    #[serde(default)]
    pub accuracy: Option<f64>,
}

impl UserLocation {
    /// Fix as a point (x = longitude, y = latitude)
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// One reverse-geocoding result
/// DOCUMENTATION: Every textual field is optional; providers fill different subsets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub name: Option<String>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub district: Option<String>,
    pub subregion: Option<String>,
    pub city: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl PlaceRecord {
    /// Lowercase text searched by the place-name matcher
    /// DOCUMENTATION: name, street, street number, district and subregion joined by single
    /// spaces in that order, skipping empty fields. City is deliberately not included
    pub fn search_text(&self) -> String {
        [
            &self.name,
            &self.street,
            &self.street_number,
            &self.district,
            &self.subregion,
        ]
        .into_iter()
        .filter_map(non_empty)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }

    /// Human-readable label: "name, street, city"
    /// DOCUMENTATION: Returns None when none of the three fields carry text
    pub fn describe(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.name, &self.street, &self.city]
            .into_iter()
            .filter_map(non_empty)
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PlaceRecord {
        PlaceRecord {
            name: Some("Lidl".to_string()),
            street: Some("High Street".to_string()),
            street_number: Some("123".to_string()),
            district: None,
            subregion: Some("Greater London".to_string()),
            city: Some("London".to_string()),
        }
    }

    #[test]
    fn test_search_text_order_and_case() {
        assert_eq!(record().search_text(), "lidl high street 123 greater london");
    }

    #[test]
    fn test_search_text_skips_empty_fields() {
        let place = PlaceRecord {
            name: Some(String::new()),
            street: Some("Station Road".to_string()),
            ..Default::default()
        };
        assert_eq!(place.search_text(), "station road");
        assert_eq!(PlaceRecord::default().search_text(), "");
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            record().describe(),
            Some("Lidl, High Street, London".to_string())
        );
        assert_eq!(PlaceRecord::default().describe(), None);
    }

    #[test]
    fn test_user_location_accuracy_optional() {
        let fix: UserLocation =
            serde_json::from_str(r#"{"latitude":51.5,"longitude":-0.1}"#).unwrap();
        assert_eq!(fix.accuracy, None);
        assert_eq!(fix.point().x(), -0.1);
    }
}
