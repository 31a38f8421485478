// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod coordinate_matcher;
pub mod detection_service;
pub mod distance;
pub mod geocoding_client;
pub mod location_export;
pub mod place_matcher;

pub use cache::*;
pub use coordinate_matcher::*;
pub use detection_service::*;
pub use distance::*;
pub use geocoding_client::*;
pub use location_export::*;
pub use place_matcher::*;
