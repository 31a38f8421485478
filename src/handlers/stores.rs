// src/handlers/stores.rs
// DOCUMENTATION: HTTP handlers for the known-store dictionary
// PURPOSE: Quick-select list for the add-card flow and address → chain lookup

use crate::errors::CardsError;
use crate::models::KnownStoreDictionary;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct DetectStoreQuery {
    pub address: String,
}

/// GET /stores/known
pub async fn known_stores(dictionary: web::Data<KnownStoreDictionary>) -> impl Responder {
    HttpResponse::Ok().json(dictionary.entries())
}

/// GET /stores/detect?address=...
/// Guess the chain name from a free-text address
pub async fn detect_store(
    dictionary: web::Data<KnownStoreDictionary>,
    query: web::Query<DetectStoreQuery>,
) -> Result<impl Responder, CardsError> {
    if query.address.trim().is_empty() {
        return Err(CardsError::InvalidInput("address must not be empty".to_string()));
    }

    let store = dictionary.detect_store_from_address(&query.address);
    Ok(HttpResponse::Ok().json(json!({ "storeName": store })))
}

/// Configuration for store routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stores")
            .route("/known", web::get().to(known_stores))
            .route("/detect", web::get().to(detect_store)),
    );
}
