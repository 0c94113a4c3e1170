//! JSON snapshots of the memory store.
//!
//! The CLI keeps its store between invocations as a single JSON file. Loading
//! goes through [`MemoryStore::from_snapshot`], so a hand-edited file that
//! breaks a store invariant is rejected rather than silently accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{MemoryStore, StoreError};
use crate::models::{Merchant, Product};

/// Every document in a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Registered merchants.
    pub merchants: Vec<Merchant>,
    /// All products, active or not.
    pub products: Vec<Product>,
}

impl MemoryStore {
    /// Load a store from a snapshot file, or start empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the file cannot be read and
    /// [`StoreError::DataCorruption`] if it does not parse or violates a
    /// store invariant.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if !tokio::fs::try_exists(path)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
        {
            debug!(path = %path.display(), "No snapshot, starting empty");
            return Ok(Self::new());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .map_err(|e| StoreError::DataCorruption(format!("invalid snapshot: {e}")))?;

        Self::from_snapshot(snapshot)
    }

    /// Write every document to a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        let snapshot = self.snapshot().await;
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::DataCorruption(e.to_string()))?;

        tokio::fs::write(path, json)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!(
            path = %path.display(),
            merchants = snapshot.merchants.len(),
            products = snapshot.products.len(),
            "Saved store snapshot"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use itiza_core::{Email, WalletPublicKey};

    use super::*;
    use crate::models::NewMerchant;
    use crate::store::ReactiveStore;

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::open(&dir.path().join("missing.json"))
            .await
            .unwrap();
        assert!(store.snapshot().await.merchants.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let wallet = WalletPublicKey::from([5u8; 32]).to_address().unwrap();

        let store = MemoryStore::new();
        let merchant = store
            .insert_merchant(NewMerchant {
                wallet_address: wallet.clone(),
                business_name: "Gold Pendants".to_owned(),
                business_address: "2 Jewel Row".to_owned(),
                email: Email::parse("gold@example.com").unwrap(),
            })
            .await
            .unwrap();
        store.save(&path).await.unwrap();

        let reopened = MemoryStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.merchant_by_wallet(&wallet).await.unwrap(),
            Some(merchant)
        );
    }

    #[tokio::test]
    async fn test_open_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        assert!(matches!(
            MemoryStore::open(&path).await,
            Err(StoreError::DataCorruption(_))
        ));
    }
}
