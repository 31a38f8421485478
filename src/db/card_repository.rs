// src/db/card_repository.rs
// DOCUMENTATION: Card persistence - one JSON array under one well-known storage key
// PURPOSE: Abstract card storage from business logic

use crate::errors::CardsError;
use crate::models::{CreateCardRequest, RewardCard, UpdateCardRequest};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

/// CardRepository: All storage operations for cards
/// DOCUMENTATION: Every operation reads the whole file; mutations rewrite it through a
/// temporary sibling and a rename. The mutex serializes read-modify-write cycles
pub struct CardRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

impl CardRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every card in insertion order
    /// DOCUMENTATION: A missing file is an empty store. A file that does not parse is an
    /// error, so a later write cannot silently replace unreadable data
    async fn load(&self) -> Result<Vec<RewardCard>, CardsError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                log::error!("Failed to read card file {}: {}", self.path.display(), e);
                return Err(e.into());
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            log::error!("Card file {} is not valid JSON: {}", self.path.display(), e);
            CardsError::StorageError(format!("Corrupt card file: {}", e))
        })
    }

    /// Persist the full card list
    async fn store(&self, cards: &[RewardCard]) -> Result<(), CardsError> {
        let json = serde_json::to_vec(cards)
            .map_err(|e| CardsError::StorageError(format!("Serialize error: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        let result = async {
            tokio::fs::write(&tmp, &json).await?;
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;

        result.map_err(|e| {
            log::error!("Failed to write card file {}: {}", self.path.display(), e);
            CardsError::from(e)
        })
    }

    /// List all cards
    /// DOCUMENTATION: Order is insertion order, which the place-name matcher relies on
    pub async fn list(&self) -> Result<Vec<RewardCard>, CardsError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Get a single card by id
    pub async fn get(&self, id: &str) -> Result<Option<RewardCard>, CardsError> {
        let _guard = self.lock.lock().await;
        let cards = self.load().await?;
        Ok(cards.into_iter().find(|card| card.id == id))
    }

    /// Create a card and append it to the store
    /// DOCUMENTATION: Assigns a fresh UUID and stamps created_at == updated_at
    pub async fn create(&self, req: CreateCardRequest) -> Result<RewardCard, CardsError> {
        let _guard = self.lock.lock().await;
        let mut cards = self.load().await?;

        let now = now_ms();
        let card = RewardCard {
            id: Uuid::new_v4().to_string(),
            store_name: req.store_name,
            image_uri: req.image_uri,
            created_at: now,
            updated_at: now,
            store_locations: req.store_locations,
        };

        cards.push(card.clone());
        self.store(&cards).await?;

        log::info!("Created card {} ({})", card.id, card.store_name);
        Ok(card)
    }

    /// Update a card
    /// DOCUMENTATION: Returns Ok(None) without writing when the id is unknown
    pub async fn update(
        &self,
        id: &str,
        req: UpdateCardRequest,
    ) -> Result<Option<RewardCard>, CardsError> {
        let _guard = self.lock.lock().await;
        let mut cards = self.load().await?;

        let Some(card) = cards.iter_mut().find(|card| card.id == id) else {
            log::debug!("Update for unknown card {}", id);
            return Ok(None);
        };

        card.apply_update(req, now_ms());
        let updated = card.clone();

        self.store(&cards).await?;

        log::info!("Updated card {}", id);
        Ok(Some(updated))
    }

    /// Delete a card
    /// DOCUMENTATION: Ok(true) when removed, Ok(false) without writing when the id is unknown
    pub async fn delete(&self, id: &str) -> Result<bool, CardsError> {
        let _guard = self.lock.lock().await;
        let mut cards = self.load().await?;

        let before = cards.len();
        cards.retain(|card| card.id != id);
        if cards.len() == before {
            log::debug!("Delete for unknown card {}", id);
            return Ok(false);
        }

        self.store(&cards).await?;

        log::info!("Deleted card {}", id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoreLocation;

    fn temp_repository() -> (CardRepository, PathBuf) {
        let dir = std::env::temp_dir().join(format!("reward-cards-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        (CardRepository::new(dir.join("all_rewards_cards.json")), dir)
    }

    fn create_request(name: &str) -> CreateCardRequest {
        CreateCardRequest {
            store_name: name.to_string(),
            image_uri: format!("file:///cards/{}.jpg", name.to_lowercase()),
            store_locations: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let (repo, dir) = temp_repository();
        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.get("nope").await.unwrap().is_none());
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_create_persist_reload_round_trip() {
        let (repo, dir) = temp_repository();

        let mut req = create_request("Tesco");
        req.store_locations = Some(vec![StoreLocation {
            latitude: 51.501_476,
            longitude: -0.140_634,
            address: Some("Buckingham Palace Road".to_string()),
            radius: Some(200.0),
        }]);
        let created = repo.create(req).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let reopened = CardRepository::new(repo.path().to_path_buf());
        let loaded = reopened.get(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let (repo, dir) = temp_repository();
        for name in ["Lidl", "Tesco", "Asda"] {
            repo.create(create_request(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.store_name)
            .collect();
        assert_eq!(names, vec!["Lidl", "Tesco", "Asda"]);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (repo, dir) = temp_repository();
        let a = repo.create(create_request("Boots")).await.unwrap();
        let b = repo.create(create_request("Boots")).await.unwrap();
        assert_ne!(a.id, b.id);
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let (repo, dir) = temp_repository();
        let created = repo.create(create_request("Costa")).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                UpdateCardRequest {
                    store_name: Some("Costa Coffee".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.store_name, "Costa Coffee");
        assert_eq!(updated.image_uri, created.image_uri);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= updated.created_at);

        let stored = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_are_no_ops() {
        let (repo, dir) = temp_repository();
        repo.create(create_request("Greggs")).await.unwrap();

        let updated = repo
            .update("missing", UpdateCardRequest::default())
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(!repo.delete("missing").await.unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 1);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_delete_removes_card() {
        let (repo, dir) = temp_repository();
        let keep = repo.create(create_request("Aldi")).await.unwrap();
        let gone = repo.create(create_request("KFC")).await.unwrap();

        assert!(repo.delete(&gone.id).await.unwrap());
        let remaining = repo.list().await.unwrap();
        assert_eq!(remaining, vec![keep]);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let (repo, dir) = temp_repository();
        std::fs::write(repo.path(), b"{not json").unwrap();

        let err = repo.list().await.unwrap_err();
        assert!(matches!(err, CardsError::StorageError(_)));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let dir = std::env::temp_dir().join(format!("reward-cards-{}", Uuid::new_v4()));
        // Parent directory never created, so the write must fail
        let repo = CardRepository::new(dir.join("nested").join("cards.json"));

        let err = repo.create(create_request("Subway")).await.unwrap_err();
        assert!(matches!(err, CardsError::StorageError(_)));
    }
}
