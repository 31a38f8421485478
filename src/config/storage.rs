// src/config/storage.rs
// DOCUMENTATION: Card store initialization
// PURPOSE: Prepare the data directory and open the JSON-backed card repository

use crate::config::Config;
use crate::db::CardRepository;
use crate::errors::CardsError;

/// Initialize the card repository
/// DOCUMENTATION: Creates the data directory if needed and loads the card file once
/// so a corrupt file is reported at startup instead of on the first request
/// Called once during application startup in main.rs
pub async fn init_card_store(config: &Config) -> Result<CardRepository, CardsError> {
    log::info!("Initializing card store in {}", config.data_dir.display());

    tokio::fs::create_dir_all(&config.data_dir).await?;

    let repository = CardRepository::new(config.cards_file());

    // Verify the file (if any) parses
    let cards = repository.list().await?;

    log::info!("Card store initialized with {} cards", cards.len());
    Ok(repository)
}
