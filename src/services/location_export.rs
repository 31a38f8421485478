// src/services/location_export.rs
// DOCUMENTATION: GeoJSON export of saved store locations
// PURPOSE: Let map views draw every store location with its detection radius

use crate::models::RewardCard;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// Build a FeatureCollection with one Point feature per store location
/// DOCUMENTATION: Properties carry cardId, storeName, address and the effective radius
pub fn store_locations_geojson(cards: &[RewardCard], default_radius_m: f64) -> FeatureCollection {
    let features = cards
        .iter()
        .flat_map(|card| {
            card.locations().iter().map(move |location| {
                let mut properties = JsonObject::new();
                properties.insert("cardId".to_string(), json!(card.id));
                properties.insert("storeName".to_string(), json!(card.store_name));
                properties.insert("address".to_string(), json!(location.address));
                properties.insert(
                    "radius".to_string(),
                    json!(location.effective_radius(default_radius_m)),
                );

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::from(&location.point()))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
