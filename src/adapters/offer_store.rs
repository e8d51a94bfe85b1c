use crate::domain::model::{NewOffer, Offer};
use crate::domain::ports::{OfferStore, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

fn next_id(offers: &[Offer]) -> i64 {
    offers.iter().map(|o| o.id).max().unwrap_or(0) + 1
}

fn build_offer(id: i64, offer: NewOffer, price_total_zl: i64) -> Offer {
    Offer {
        id,
        locality: offer.locality,
        rooms: offer.rooms,
        area_m2: offer.area_m2,
        price_total_zl,
        created_at: Utc::now(),
    }
}

/// Offers kept as a JSON array in a single file.
pub struct FileOfferStore<S: Storage> {
    storage: S,
    file: String,
    // serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl<S: Storage> FileOfferStore<S> {
    pub fn new(storage: S, file: impl Into<String>) -> Self {
        Self {
            storage,
            file: file.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load_all(&self) -> Result<Vec<Offer>> {
        match self.storage.read_file(&self.file).await? {
            Some(data) if !data.is_empty() => Ok(serde_json::from_slice(&data)?),
            _ => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<S: Storage> OfferStore for FileOfferStore<S> {
    async fn create(&self, offer: NewOffer, price_total_zl: i64) -> Result<Offer> {
        let _guard = self.write_lock.lock().await;

        let mut offers = self.load_all().await?;
        let stored = build_offer(next_id(&offers), offer, price_total_zl);
        offers.push(stored.clone());

        let data = serde_json::to_vec_pretty(&offers)?;
        self.storage.write_file(&self.file, &data).await?;

        tracing::debug!(
            "Stored offer {} in {}",
            stored.id,
            self.storage.describe(&self.file)
        );
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Offer>> {
        self.load_all().await
    }
}

#[derive(Default)]
pub struct InMemoryOfferStore {
    offers: Mutex<Vec<Offer>>,
}

impl InMemoryOfferStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfferStore for InMemoryOfferStore {
    async fn create(&self, offer: NewOffer, price_total_zl: i64) -> Result<Offer> {
        let mut offers = self.offers.lock().await;
        let stored = build_offer(next_id(&offers), offer, price_total_zl);
        offers.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Offer>> {
        Ok(self.offers.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn new_offer(locality: &str) -> NewOffer {
        NewOffer {
            locality: locality.to_string(),
            rooms: 2,
            area_m2: 50.0,
        }
    }

    #[tokio::test]
    async fn test_file_store_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let store = FileOfferStore::new(LocalStorage::new(dir.path()), "offers.json");

        let first = store.create(new_offer("Krzyki"), 500000).await.unwrap();
        let second = store.create(new_offer("Fabryczna"), 510000).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.price_total_zl, 510000);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileOfferStore::new(LocalStorage::new(dir.path()), "offers.json");
            store.create(new_offer("Krzyki"), 500000).await.unwrap();
        }

        let store = FileOfferStore::new(LocalStorage::new(dir.path()), "offers.json");
        let offers = store.list().await.unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].locality, "Krzyki");

        let next = store.create(new_offer("Psie Pole"), 400000).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_list_reflects_every_write() {
        let dir = TempDir::new().unwrap();
        let store = FileOfferStore::new(LocalStorage::new(dir.path()), "offers.json");

        assert!(store.list().await.unwrap().is_empty());
        store.create(new_offer("A"), 1).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
        store.create(new_offer("B"), 2).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_unique_ids() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileOfferStore::new(
            LocalStorage::new(dir.path()),
            "offers.json",
        ));

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create(new_offer(&format!("L{}", i)), i).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut ids: Vec<i64> = store.list().await.unwrap().iter().map(|o| o.id).collect();
        ids.sort();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryOfferStore::new();
        let offer = store.create(new_offer("X"), 123).await.unwrap();

        assert_eq!(offer.id, 1);
        assert_eq!(store.list().await.unwrap(), vec![offer]);
    }
}
