// src/services/coordinate_matcher.rs
// DOCUMENTATION: Coordinate-based card detection
// PURPOSE: Pick the card whose saved store location is closest and within its radius

use crate::models::{RewardCard, UserLocation, DEFAULT_DETECTION_RADIUS_M};
use crate::services::distance_between;
use serde::Serialize;

/// Card picked by proximity, with the distance to the winning store location
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CoordinateMatch<'a> {
    pub card: &'a RewardCard,
    pub distance_m: f64,
}

/// Coordinate matcher
/// DOCUMENTATION: Pure; never suspends. The default radius applies to locations saved
/// without one
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMatcher {
    default_radius_m: f64,
}

impl Default for CoordinateMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_DETECTION_RADIUS_M)
    }
}

impl CoordinateMatcher {
    pub fn new(default_radius_m: f64) -> Self {
        Self { default_radius_m }
    }

    /// Nearest in-radius card and its distance
    /// DOCUMENTATION: A (card, location) pair qualifies when distance <= radius (inclusive).
    /// The globally closest qualifying pair wins. On exactly equal distances any of the
    /// tied cards may be returned
    pub fn find_nearby_match<'a>(
        &self,
        user_location: &UserLocation,
        cards: &'a [RewardCard],
    ) -> Option<CoordinateMatch<'a>> {
        let user = user_location.point();
        let mut closest: Option<CoordinateMatch<'a>> = None;

        for card in cards {
            for store_location in card.locations() {
                let distance_m = distance_between(user, store_location.point());
                let radius = store_location.effective_radius(self.default_radius_m);

                if distance_m > radius {
                    continue;
                }

                if closest.map_or(true, |best| distance_m < best.distance_m) {
                    closest = Some(CoordinateMatch { card, distance_m });
                }
            }
        }

        if let Some(found) = &closest {
            log::debug!(
                "Coordinate match: {} at {:.1}m",
                found.card.store_name,
                found.distance_m
            );
        }

        closest
    }

    /// Nearest in-radius card, or None
    #[allow(dead_code)] // card-only entry point; the HTTP layer wants the distance too
    pub fn find_nearby_card<'a>(
        &self,
        user_location: &UserLocation,
        cards: &'a [RewardCard],
    ) -> Option<&'a RewardCard> {
        self.find_nearby_match(user_location, cards)
            .map(|found| found.card)
    }
}
