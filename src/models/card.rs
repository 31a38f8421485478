// src/models/card.rs
// DOCUMENTATION: Core data structures for reward cards
// PURPOSE: Persisted card shape plus request DTOs for the card endpoints

use geo_types::Point;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::CardsError;

/// Radius used for store locations saved without one, in meters
pub const DEFAULT_DETECTION_RADIUS_M: f64 = 150.0;

/// A user-owned loyalty card
/// DOCUMENTATION: This struct is the persisted record; the card file is a JSON array of these.
/// Field names are camelCase on disk and on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardCard {
    /// Opaque identifier assigned at creation (UUID v4), never changes
    pub id: String,

    /// Display name, also the input to place-name matching
    pub store_name: String,

    /// Reference to the locally stored card photo
    pub image_uri: String,

    /// Milliseconds since epoch
    pub created_at: i64,

    /// Milliseconds since epoch, never earlier than created_at
    pub updated_at: i64,

    /// Saved store coordinates; absent and empty mean the same thing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_locations: Option<Vec<StoreLocation>>,
}

impl RewardCard {
    /// Store locations usable for coordinate matching
    pub fn locations(&self) -> &[StoreLocation] {
        self.store_locations.as_deref().unwrap_or(&[])
    }
}

/// A geographic point associated with a card's store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoreLocation {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Informational label only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Detection radius in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl StoreLocation {
    /// Radius in effect for this location, falling back to `default_radius`
    /// DOCUMENTATION: A stored radius of zero (or below) counts as unset
    pub fn effective_radius(&self, default_radius: f64) -> f64 {
        self.radius.filter(|r| *r > 0.0).unwrap_or(default_radius)
    }

    /// Location as a point (x = longitude, y = latitude)
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Validate a list of store locations
/// DOCUMENTATION: Coordinates must be in range and an explicit radius must be positive
pub fn validate_store_locations(locations: &[StoreLocation]) -> Result<(), CardsError> {
    for (idx, location) in locations.iter().enumerate() {
        location.validate()?;

        if let Some(radius) = location.radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(CardsError::ValidationError(format!(
                    "storeLocations[{}].radius must be positive, got {}",
                    idx, radius
                )));
            }
        }
    }
    Ok(())
}

/// Request DTO for creating a card
/// DOCUMENTATION: Body of POST /cards; id and timestamps are assigned by the store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    #[validate(length(min = 1, max = 255))]
    pub store_name: String,

    #[validate(length(min = 1))]
    pub image_uri: String,

    #[serde(default)]
    pub store_locations: Option<Vec<StoreLocation>>,
}

impl CreateCardRequest {
    /// Run derive validation plus the store location checks
    pub fn check(&self) -> Result<(), CardsError> {
        self.validate()?;
        validate_store_locations(self.store_locations.as_deref().unwrap_or(&[]))
    }
}

/// Request DTO for updating a card
/// DOCUMENTATION: Body of PUT /cards/{id}
/// All fields are optional - only provided fields are updated
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[validate(length(min = 1, max = 255))]
    pub store_name: Option<String>,

    #[validate(length(min = 1))]
    pub image_uri: Option<String>,

    /// Replaces the whole list; send `[]` to clear it
    pub store_locations: Option<Vec<StoreLocation>>,
}

impl UpdateCardRequest {
    /// Run derive validation plus the store location checks
    pub fn check(&self) -> Result<(), CardsError> {
        self.validate()?;
        validate_store_locations(self.store_locations.as_deref().unwrap_or(&[]))
    }
}

impl RewardCard {
    /// Merge an update into this card and stamp updated_at
    /// DOCUMENTATION: updated_at is clamped to created_at so a clock step backwards
    /// cannot break the ordering invariant
    pub fn apply_update(&mut self, req: UpdateCardRequest, now_ms: i64) {
        if let Some(store_name) = req.store_name {
            self.store_name = store_name;
        }
        if let Some(image_uri) = req.image_uri {
            self.image_uri = image_uri;
        }
        if let Some(store_locations) = req.store_locations {
            self.store_locations = Some(store_locations);
        }
        self.updated_at = now_ms.max(self.created_at);
    }
}
