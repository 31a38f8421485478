// src/services/geocoding_client.rs
// DOCUMENTATION: Reverse-geocoding collaborator and its Google Geocoding API client
// PURPOSE: Turn coordinates into place records for the place-name matcher

use crate::errors::CardsError;
use crate::models::PlaceRecord;
use crate::services::GeocodeCache;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Anything that can reverse-geocode a coordinate
/// DOCUMENTATION: Results are ordered best-first; an empty list is a valid answer
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<PlaceRecord>, CardsError>;
}

/// Google Geocoding API client
/// DOCUMENTATION: Handles authentication, throttling and caching of reverse lookups
pub struct GoogleGeocodingClient {
    /// HTTP client for making requests
    client: Client,
    /// Google API key
    api_key: String,
    /// Base URL for the Geocoding API
    base_url: String,
    /// Outgoing request throttle
    limiter: DefaultDirectRateLimiter,
    /// Shared result cache
    cache: Option<Arc<GeocodeCache>>,
}

/// Response from the Geocoding API
#[derive(Debug, Deserialize, Serialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub status: String,
    pub error_message: Option<String>,
}

/// Individual geocoding result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<GoogleAddressComponent>,
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Address component from Google
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleAddressComponent {
    /// Long name (e.g., "High Street", "Camden")
    pub long_name: String,
    /// Short name (e.g., "High St")
    pub short_name: String,
    /// Types of this component (e.g., ["route"])
    pub types: Vec<String>,
}

impl GoogleGeocodingClient {
    /// Create new client
    /// DOCUMENTATION: `requests_per_second` of zero is treated as one
    pub fn new(api_key: String, requests_per_second: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);

        Self {
            client: Client::new(),
            api_key,
            base_url: "https://maps.googleapis.com/maps/api/geocode".to_string(),
            limiter: RateLimiter::direct(Quota::per_second(rate)),
            cache: None,
        }
    }

    /// Create new client backed by a shared cache
    pub fn new_with_cache(api_key: String, requests_per_second: u32, cache: Arc<GeocodeCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new(api_key, requests_per_second)
        }
    }

    /// Perform the reverse lookup against the API, no cache involved
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Vec<PlaceRecord>, CardsError> {
        if self.api_key.is_empty() {
            return Err(CardsError::ExternalApiError(
                "Google Geocoding API key not configured".to_string(),
            ));
        }

        self.limiter.until_ready().await;

        let url = format!("{}/json", self.base_url);
        let latlng = format!("{},{}", latitude, longitude);
        let params = [("latlng", latlng.as_str()), ("key", self.api_key.as_str())];

        log::debug!("Reverse geocode: lat={}, lng={}", latitude, longitude);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Geocoding API request failed: {}", e);
                CardsError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Geocoding API error {}: {}", status, body);
            return Err(CardsError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: GeocodeResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse geocoding response: {}", e);
            CardsError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        Self::into_place_records(api_response)
    }

    /// Check the API status and map results to place records
    fn into_place_records(api_response: GeocodeResponse) -> Result<Vec<PlaceRecord>, CardsError> {
        match api_response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                log::info!(
                    "Reverse geocode returned {} results",
                    api_response.results.len()
                );
                Ok(api_response
                    .results
                    .iter()
                    .map(Self::to_place_record)
                    .collect())
            }
            "OVER_QUERY_LIMIT" => {
                log::error!("Geocoding API quota exceeded");
                Err(CardsError::RateLimitExceeded)
            }
            other => {
                let msg = api_response
                    .error_message
                    .unwrap_or_else(|| format!("Unknown status: {}", other));
                log::error!("Geocoding API status {}: {}", other, msg);
                Err(CardsError::ExternalApiError(msg))
            }
        }
    }

    /// Convert a geocoding result to a place record
    /// DOCUMENTATION: Picks the first component of each kind:
    /// - name: point_of_interest / establishment / premise
    /// - street: route, street number: street_number
    /// - district: sublocality / neighborhood
    /// - subregion: administrative_area_level_2
    /// - city: locality / postal_town
    pub fn to_place_record(result: &GeocodeResult) -> PlaceRecord {
        let find = |wanted: &[&str]| -> Option<String> {
            result
                .address_components
                .iter()
                .find(|c| c.types.iter().any(|t| wanted.contains(&t.as_str())))
                .map(|c| c.long_name.clone())
        };

        PlaceRecord {
            name: find(&["point_of_interest", "establishment", "premise"]),
            street: find(&["route"]),
            street_number: find(&["street_number"]),
            district: find(&["sublocality", "sublocality_level_1", "neighborhood"]),
            subregion: find(&["administrative_area_level_2"]),
            city: find(&["locality", "postal_town"]),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for GoogleGeocodingClient {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<PlaceRecord>, CardsError> {
        let Some(cache) = &self.cache else {
            return self.fetch(latitude, longitude).await;
        };

        let key = GeocodeCache::generate_key(latitude, longitude);
        if let Some(places) = cache.get(&key).await {
            return Ok(places);
        }

        let places = self.fetch(latitude, longitude).await?;
        cache.set(key, places.clone()).await;
        Ok(places)
    }
}
