// src/handlers/detection.rs
// DOCUMENTATION: HTTP handlers for nearby-card detection
// PURPOSE: Run the matchers over the stored cards for a posted GPS fix

use crate::config::Config;
use crate::db::CardRepository;
use crate::errors::CardsError;
use crate::models::KnownStoreDictionary;
use crate::services::{DetectionRequest, DetectionService, ReverseGeocoder};
use actix_web::{web, HttpResponse, Responder};

/// Per-request view over the extracted app data
struct DetectionDeps<'a> {
    repo: &'a CardRepository,
    service: DetectionService<'a>,
}

impl<'a> DetectionDeps<'a> {
    fn new(
        repo: &'a web::Data<CardRepository>,
        config: &'a web::Data<Config>,
        dictionary: &'a web::Data<KnownStoreDictionary>,
        geocoder: &'a web::Data<dyn ReverseGeocoder>,
    ) -> Self {
        Self {
            repo: repo.get_ref(),
            service: DetectionService::new(
                geocoder.get_ref(),
                dictionary.get_ref(),
                config.default_detection_radius_m,
            ),
        }
    }
}

/// POST /detect
/// Saved coordinates first, then reverse-geocoded place name
pub async fn detect(
    repo: web::Data<CardRepository>,
    config: web::Data<Config>,
    dictionary: web::Data<KnownStoreDictionary>,
    geocoder: web::Data<dyn ReverseGeocoder>,
    req: web::Json<DetectionRequest>,
) -> Result<impl Responder, CardsError> {
    let deps = DetectionDeps::new(&repo, &config, &dictionary, &geocoder);
    let cards = deps.repo.list().await?;

    let response = deps.service.detect(&req, &cards).await;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /detect/coordinates
/// Saved store coordinates only; never calls the geocoder
pub async fn detect_by_coordinates(
    repo: web::Data<CardRepository>,
    config: web::Data<Config>,
    dictionary: web::Data<KnownStoreDictionary>,
    geocoder: web::Data<dyn ReverseGeocoder>,
    req: web::Json<DetectionRequest>,
) -> Result<impl Responder, CardsError> {
    let deps = DetectionDeps::new(&repo, &config, &dictionary, &geocoder);
    let cards = deps.repo.list().await?;

    let response = deps.service.detect_by_coordinates(&req, &cards);
    Ok(HttpResponse::Ok().json(response))
}

/// POST /detect/place
/// Reverse-geocoded place name only
pub async fn detect_by_place_name(
    repo: web::Data<CardRepository>,
    config: web::Data<Config>,
    dictionary: web::Data<KnownStoreDictionary>,
    geocoder: web::Data<dyn ReverseGeocoder>,
    req: web::Json<DetectionRequest>,
) -> Result<impl Responder, CardsError> {
    let deps = DetectionDeps::new(&repo, &config, &dictionary, &geocoder);
    let cards = deps.repo.list().await?;

    let response = deps.service.detect_by_place_name(&req, &cards).await;
    Ok(HttpResponse::Ok().json(response))
}

/// Configuration for detection routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/detect")
            .route("", web::post().to(detect))
            .route("/coordinates", web::post().to(detect_by_coordinates))
            .route("/place", web::post().to(detect_by_place_name)),
    );
}
