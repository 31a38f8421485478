// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod card;
pub mod known_stores;
pub mod location;

pub use card::*;
pub use known_stores::*;
pub use location::*;
