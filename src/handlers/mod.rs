// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod cards;
pub mod detection;
pub mod health;
pub mod stores;

pub use cards::config as cards_config;
pub use detection::config as detection_config;
pub use health::config as health_config;
pub use stores::config as stores_config;
