// src/db/mod.rs
// DOCUMENTATION: Storage module organization
// PURPOSE: Re-export storage components

pub mod card_repository;

pub use card_repository::*;
