// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Re-export configuration components

pub mod env;
pub mod storage;

pub use env::Config;
pub use storage::init_card_store;
