// src/handlers/cards.rs
// DOCUMENTATION: HTTP handlers for card operations
// PURPOSE: Parse requests, call the card store, return responses

use crate::config::Config;
use crate::db::CardRepository;
use crate::errors::CardsError;
use crate::models::{CreateCardRequest, UpdateCardRequest};
use crate::services::store_locations_geojson;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /cards
/// List cards in insertion order
pub async fn list_cards(repo: web::Data<CardRepository>) -> Result<impl Responder, CardsError> {
    let cards = repo.list().await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// POST /cards
/// Create a new card
pub async fn create_card(
    repo: web::Data<CardRepository>,
    req: web::Json<CreateCardRequest>,
) -> Result<impl Responder, CardsError> {
    req.check()?;

    let card = repo.create(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(card))
}

/// GET /cards/{id}
pub async fn get_card(
    repo: web::Data<CardRepository>,
    path: web::Path<String>,
) -> Result<impl Responder, CardsError> {
    let id = path.into_inner();
    let card = repo.get(&id).await?.ok_or_else(|| CardsError::NotFound(id.clone()))?;
    Ok(HttpResponse::Ok().json(card))
}

/// PUT /cards/{id}
/// Update the provided fields of a card
pub async fn update_card(
    repo: web::Data<CardRepository>,
    path: web::Path<String>,
    req: web::Json<UpdateCardRequest>,
) -> Result<impl Responder, CardsError> {
    req.check()?;

    let id = path.into_inner();
    let card = repo
        .update(&id, req.into_inner())
        .await?
        .ok_or_else(|| CardsError::NotFound(id.clone()))?;
    Ok(HttpResponse::Ok().json(card))
}

/// DELETE /cards/{id}
/// Deleting an unknown id is not an error; the body says whether anything was removed
pub async fn delete_card(
    repo: web::Data<CardRepository>,
    path: web::Path<String>,
) -> Result<impl Responder, CardsError> {
    let deleted = repo.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

/// GET /cards/locations.geojson
/// Every saved store location as a GeoJSON FeatureCollection
pub async fn store_locations(
    repo: web::Data<CardRepository>,
    config: web::Data<Config>,
) -> Result<impl Responder, CardsError> {
    let cards = repo.list().await?;
    let collection = store_locations_geojson(&cards, config.default_detection_radius_m);
    Ok(HttpResponse::Ok()
        .content_type("application/geo+json")
        .json(collection))
}

/// Configuration for card routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cards")
            .route("", web::get().to(list_cards))
            .route("", web::post().to(create_card))
            .route("/locations.geojson", web::get().to(store_locations))
            .route("/{id}", web::get().to(get_card))
            .route("/{id}", web::put().to(update_card))
            .route("/{id}", web::delete().to(delete_card)),
    );
}
