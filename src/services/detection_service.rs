// src/services/detection_service.rs
// DOCUMENTATION: Nearby-card detection for the HTTP layer
// PURPOSE: Compose the coordinate and place-name matchers into one decision

use crate::models::{KnownStoreDictionary, RewardCard, UserLocation};
use crate::services::{CoordinateMatcher, MatchRule, PlaceNameMatcher, ReverseGeocoder};
use serde::{Deserialize, Serialize};

/// Body of the detection endpoints
/// DOCUMENTATION: Coordinates are optional; without them there is no fix (location
/// unavailable or permission denied) and detection does not run
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DetectionRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy: Option<f64>,
}

impl DetectionRequest {
    /// The GPS fix, if both coordinates are present
    pub fn fix(&self) -> Option<UserLocation> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(UserLocation {
                latitude,
                longitude,
                accuracy: self.accuracy,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    Matched,
    NoMatch,
    NoFix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    Coordinates,
    PlaceName,
}

/// Detection outcome returned to the UI
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResponse {
    pub status: DetectionStatus,
    pub strategy: Option<DetectionStrategy>,
    pub card: Option<RewardCard>,
    /// Distance to the matched store location (coordinate strategy only)
    pub distance_m: Option<f64>,
    /// Rule that matched (place-name strategy only)
    pub rule: Option<MatchRule>,
}

impl DetectionResponse {
    fn no_fix() -> Self {
        Self::no_match_with(DetectionStatus::NoFix)
    }

    fn no_match() -> Self {
        Self::no_match_with(DetectionStatus::NoMatch)
    }

    fn no_match_with(status: DetectionStatus) -> Self {
        Self {
            status,
            strategy: None,
            card: None,
            distance_m: None,
            rule: None,
        }
    }
}

/// Detection service
/// DOCUMENTATION: Stateless; borrows the geocoder and dictionary from app data
pub struct DetectionService<'a> {
    coordinate_matcher: CoordinateMatcher,
    place_matcher: PlaceNameMatcher<'a, dyn ReverseGeocoder + 'a>,
}

impl<'a> DetectionService<'a> {
    pub fn new(
        geocoder: &'a (dyn ReverseGeocoder + 'a),
        dictionary: &'a KnownStoreDictionary,
        default_radius_m: f64,
    ) -> Self {
        Self {
            coordinate_matcher: CoordinateMatcher::new(default_radius_m),
            place_matcher: PlaceNameMatcher::new(geocoder, dictionary),
        }
    }

    /// Coordinate matcher only
    pub fn detect_by_coordinates(
        &self,
        request: &DetectionRequest,
        cards: &[RewardCard],
    ) -> DetectionResponse {
        let Some(fix) = request.fix() else {
            return DetectionResponse::no_fix();
        };

        match self.coordinate_matcher.find_nearby_match(&fix, cards) {
            Some(found) => DetectionResponse {
                status: DetectionStatus::Matched,
                strategy: Some(DetectionStrategy::Coordinates),
                card: Some(found.card.clone()),
                distance_m: Some(found.distance_m),
                rule: None,
            },
            None => DetectionResponse::no_match(),
        }
    }

    /// Place-name matcher only
    pub async fn detect_by_place_name(
        &self,
        request: &DetectionRequest,
        cards: &[RewardCard],
    ) -> DetectionResponse {
        let Some(fix) = request.fix() else {
            return DetectionResponse::no_fix();
        };

        match self
            .place_matcher
            .detect_match(fix.latitude, fix.longitude, cards)
            .await
        {
            Some(found) => DetectionResponse {
                status: DetectionStatus::Matched,
                strategy: Some(DetectionStrategy::PlaceName),
                card: Some(found.card.clone()),
                distance_m: None,
                rule: Some(found.rule),
            },
            None => DetectionResponse::no_match(),
        }
    }

    /// Coordinates first, then place name
    /// DOCUMENTATION: The geocoder is only called when no saved location is in range
    pub async fn detect(&self, request: &DetectionRequest, cards: &[RewardCard]) -> DetectionResponse {
        let by_coordinates = self.detect_by_coordinates(request, cards);
        if by_coordinates.status != DetectionStatus::NoMatch {
            return by_coordinates;
        }

        self.detect_by_place_name(request, cards).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CardsError;
    use crate::models::{PlaceRecord, StoreLocation};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGeocoder {
        name: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReverseGeocoder for CountingGeocoder {
        async fn reverse_geocode(&self, _: f64, _: f64) -> Result<Vec<PlaceRecord>, CardsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![PlaceRecord {
                name: Some(self.name.to_string()),
                ..Default::default()
            }])
        }
    }

    fn card(name: &str, location: Option<(f64, f64)>) -> RewardCard {
        RewardCard {
            id: name.to_lowercase(),
            store_name: name.to_string(),
            image_uri: String::new(),
            created_at: 0,
            updated_at: 0,
            store_locations: location.map(|(latitude, longitude)| {
                vec![StoreLocation {
                    latitude,
                    longitude,
                    address: None,
                    radius: None,
                }]
            }),
        }
    }

    fn request(latitude: f64, longitude: f64) -> DetectionRequest {
        DetectionRequest {
            latitude: Some(latitude),
            longitude: Some(longitude),
            accuracy: None,
        }
    }

    #[tokio::test]
    async fn test_no_fix_skips_detection() {
        let geocoder = CountingGeocoder {
            name: "Tesco",
            calls: AtomicUsize::new(0),
        };
        let dictionary = KnownStoreDictionary::builtin();
        let service = DetectionService::new(&geocoder, &dictionary, 150.0);

        let partial = DetectionRequest {
            latitude: Some(51.5),
            ..Default::default()
        };
        let response = service.detect(&partial, &[card("Tesco", None)]).await;
        assert_eq!(response.status, DetectionStatus::NoFix);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_coordinates_take_precedence() {
        let geocoder = CountingGeocoder {
            name: "Tesco",
            calls: AtomicUsize::new(0),
        };
        let dictionary = KnownStoreDictionary::builtin();
        let service = DetectionService::new(&geocoder, &dictionary, 150.0);
        let cards = vec![card("Tesco", None), card("Aldi", Some((51.5, -0.1)))];

        let response = service.detect(&request(51.5, -0.1), &cards).await;
        assert_eq!(response.status, DetectionStatus::Matched);
        assert_eq!(response.strategy, Some(DetectionStrategy::Coordinates));
        assert_eq!(response.card.unwrap().store_name, "Aldi");
        assert_eq!(response.distance_m, Some(0.0));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_back_to_place_name() {
        let geocoder = CountingGeocoder {
            name: "Tesco Metro",
            calls: AtomicUsize::new(0),
        };
        let dictionary = KnownStoreDictionary::builtin();
        let service = DetectionService::new(&geocoder, &dictionary, 150.0);
        let cards = vec![card("Aldi", Some((52.0, 1.0))), card("Tesco", None)];

        let response = service.detect(&request(51.5, -0.1), &cards).await;
        assert_eq!(response.strategy, Some(DetectionStrategy::PlaceName));
        assert_eq!(response.rule, Some(MatchRule::Exact));
        assert_eq!(response.card.unwrap().store_name, "Tesco");
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nothing_matches() {
        let geocoder = CountingGeocoder {
            name: "Random Street",
            calls: AtomicUsize::new(0),
        };
        let dictionary = KnownStoreDictionary::builtin();
        let service = DetectionService::new(&geocoder, &dictionary, 150.0);

        let response = service
            .detect(&request(51.5, -0.1), &[card("Asda", None)])
            .await;
        assert_eq!(response.status, DetectionStatus::NoMatch);
        assert!(response.card.is_none());
    }

    struct FailingGeocoder;

    #[async_trait]
    impl ReverseGeocoder for FailingGeocoder {
        async fn reverse_geocode(&self, _: f64, _: f64) -> Result<Vec<PlaceRecord>, CardsError> {
            Err(CardsError::RateLimitExceeded)
        }
    }

    #[tokio::test]
    async fn test_geocoder_failure_is_no_match() {
        let dictionary = KnownStoreDictionary::builtin();
        let service = DetectionService::new(&FailingGeocoder, &dictionary, 150.0);

        let response = service
            .detect_by_place_name(&request(51.5, -0.1), &[card("Tesco", None)])
            .await;
        assert_eq!(response.status, DetectionStatus::NoMatch);
        assert!(response.strategy.is_none());
    }
}
