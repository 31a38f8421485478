// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, card store, geocoder, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use config::Config;
use dotenv::dotenv;
use models::KnownStoreDictionary;
use services::{start_cleanup_task, GeocodeCache, GoogleGeocodingClient, ReverseGeocoder};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.clone()
        } else {
            "info,actix_web=info".to_string()
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting reward-cards service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Open the card store
    let repository = config::init_card_store(&config)
        .await
        .context("failed to open card store")?;
    let repository = web::Data::new(repository);

    // 5. Reverse geocoder with its response cache
    let cache = Arc::new(GeocodeCache::new(config.geocode_cache_ttl_secs));
    log::info!(
        "Initialized geocode cache (TTL: {}s)",
        config.geocode_cache_ttl_secs
    );

    start_cleanup_task(cache.clone(), 300);
    log::info!("Started cache cleanup task (interval: 5 minutes)");

    let geocoder: Arc<dyn ReverseGeocoder> = Arc::new(GoogleGeocodingClient::new_with_cache(
        config.google_geocoding_api_key.clone(),
        config.geocode_requests_per_second,
        cache.clone(),
    ));
    let geocoder = web::Data::from(geocoder);
    let cache = web::Data::from(cache);
    let dictionary = web::Data::new(KnownStoreDictionary::builtin());
    log::debug!(
        "Known stores: {}",
        dictionary.store_names().collect::<Vec<_>>().join(", ")
    );

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            // Application state (card store, config, dictionary, geocoder, cache)
            .app_data(repository.clone())
            .app_data(cache.clone())
            .app_data(config.clone())
            .app_data(dictionary.clone())
            .app_data(geocoder.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::cards_config)
            .configure(handlers::detection_config)
            .configure(handlers::stores_config)
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
