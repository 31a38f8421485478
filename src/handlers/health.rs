// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Report service status and whether the card file is readable

use crate::db::CardRepository;
use crate::services::GeocodeCache;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

pub async fn health_check(
    repo: web::Data<CardRepository>,
    cache: web::Data<GeocodeCache>,
) -> impl Responder {
    match repo.list().await {
        Ok(cards) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "service": "reward-cards",
            "version": env!("CARGO_PKG_VERSION"),
            "cards": cards.len(),
            "geocodeCache": cache.stats().await
        })),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "service": "reward-cards",
                "version": env!("CARGO_PKG_VERSION")
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_health_reports_card_count() {
        let dir = std::env::temp_dir().join(format!("reward-cards-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let repo = CardRepository::new(dir.join("all_rewards_cards.json"));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(repo))
                .app_data(web::Data::new(GeocodeCache::new(60)))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cards"], 0);
        assert_eq!(body["geocodeCache"]["total_entries"], 0);

        std::fs::write(dir.join("all_rewards_cards.json"), "not json").unwrap();
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        std::fs::remove_dir_all(dir).ok();
    }
}
