//! In-process implementation of [`ReactiveStore`].
//!
//! All documents sit behind a single async mutex, so every write is a
//! serialised check-then-insert. The wallet index is rebuilt from the
//! merchant documents whenever a snapshot is loaded.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use itiza_core::{MerchantId, ProductId, WalletAddress};

use super::{ReactiveStore, Snapshot, StoreError};
use crate::models::{Merchant, NewMerchant, NewProduct, Product, ProductPatch};

#[derive(Debug, Default)]
struct Documents {
    merchants: BTreeMap<MerchantId, Merchant>,
    by_wallet: HashMap<WalletAddress, MerchantId>,
    products: BTreeMap<ProductId, Product>,
}

impl Documents {
    fn merchant_for_wallet(&self, wallet: &WalletAddress) -> Option<&Merchant> {
        self.by_wallet
            .get(wallet)
            .and_then(|id| self.merchants.get(id))
    }
}

/// Reactive store kept in memory, optionally persisted as a [`Snapshot`].
#[derive(Debug)]
pub struct MemoryStore {
    docs: Mutex<Documents>,
    version: watch::Sender<u64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            docs: Mutex::new(Documents::default()),
            version,
        }
    }

    /// Build a store from a snapshot, checking the store invariants.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataCorruption`] if two merchants share a wallet,
    /// IDs repeat, or a product references a merchant that does not exist.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut docs = Documents::default();

        for merchant in snapshot.merchants {
            if docs
                .by_wallet
                .insert(merchant.wallet_address.clone(), merchant.id)
                .is_some()
            {
                return Err(StoreError::DataCorruption(format!(
                    "wallet {} registered twice",
                    merchant.wallet_address
                )));
            }
            if docs.merchants.insert(merchant.id, merchant).is_some() {
                return Err(StoreError::DataCorruption("duplicate merchant id".to_owned()));
            }
        }

        for product in snapshot.products {
            if !docs.merchants.contains_key(&product.merchant_id) {
                return Err(StoreError::DataCorruption(format!(
                    "product {} references unknown merchant {}",
                    product.id, product.merchant_id
                )));
            }
            if docs.products.insert(product.id, product).is_some() {
                return Err(StoreError::DataCorruption("duplicate product id".to_owned()));
            }
        }

        info!(
            merchants = docs.merchants.len(),
            products = docs.products.len(),
            "Loaded store snapshot"
        );

        let (version, _) = watch::channel(0);
        Ok(Self {
            docs: Mutex::new(docs),
            version,
        })
    }

    /// Copy every document out into a snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        let docs = self.docs.lock().await;
        let mut products: Vec<Product> = docs.products.values().cloned().collect();
        products.sort_by_key(|p| (p.created_at, p.id));
        let mut merchants: Vec<Merchant> = docs.merchants.values().cloned().collect();
        merchants.sort_by_key(|m| (m.created_at, m.id));
        Snapshot {
            merchants,
            products,
        }
    }

    /// Number of committed writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[async_trait]
impl ReactiveStore for MemoryStore {
    async fn merchant_by_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<Merchant>, StoreError> {
        let docs = self.docs.lock().await;
        Ok(docs.merchant_for_wallet(wallet).cloned())
    }

    async fn merchant(&self, id: MerchantId) -> Result<Option<Merchant>, StoreError> {
        let docs = self.docs.lock().await;
        Ok(docs.merchants.get(&id).cloned())
    }

    #[instrument(skip(self, merchant), fields(wallet = %merchant.wallet_address.short()))]
    async fn insert_merchant(&self, merchant: NewMerchant) -> Result<Merchant, StoreError> {
        let mut docs = self.docs.lock().await;

        if docs.by_wallet.contains_key(&merchant.wallet_address) {
            warn!("Rejected duplicate merchant registration");
            return Err(StoreError::Conflict(
                "wallet address already registered".to_owned(),
            ));
        }

        let merchant = merchant.into_merchant(MerchantId::generate(), Utc::now());
        docs.by_wallet
            .insert(merchant.wallet_address.clone(), merchant.id);
        docs.merchants.insert(merchant.id, merchant.clone());
        drop(docs);

        self.bump();
        debug!(merchant_id = %merchant.id, "Inserted merchant");
        Ok(merchant)
    }

    async fn products_by_merchant(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Vec<Product>, StoreError> {
        let docs = self.docs.lock().await;
        let mut products: Vec<Product> = docs
            .products
            .values()
            .filter(|p| p.merchant_id == merchant_id)
            .cloned()
            .collect();
        products.sort_by_key(|p| (p.created_at, p.id));
        Ok(products)
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let docs = self.docs.lock().await;
        Ok(docs.products.get(&id).cloned())
    }

    #[instrument(skip(self, product), fields(wallet = %wallet.short()))]
    async fn insert_product(
        &self,
        wallet: &WalletAddress,
        product: NewProduct,
    ) -> Result<Product, StoreError> {
        let mut docs = self.docs.lock().await;

        let merchant_id = docs
            .merchant_for_wallet(wallet)
            .map(|m| m.id)
            .ok_or_else(|| StoreError::NotFound("merchant not found".to_owned()))?;

        let product = product.into_product(ProductId::generate(), merchant_id, Utc::now());
        docs.products.insert(product.id, product.clone());
        drop(docs);

        self.bump();
        debug!(product_id = %product.id, merchant_id = %merchant_id, "Inserted product");
        Ok(product)
    }

    #[instrument(skip(self, patch), fields(wallet = %wallet.short(), product_id = %id))]
    async fn patch_product(
        &self,
        wallet: &WalletAddress,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, StoreError> {
        let mut docs = self.docs.lock().await;

        let merchant_id = docs
            .merchant_for_wallet(wallet)
            .map(|m| m.id)
            .ok_or_else(|| StoreError::NotFound("merchant not found".to_owned()))?;

        let product = docs
            .products
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("product not found".to_owned()))?;

        if product.merchant_id != merchant_id {
            warn!(owner = %product.merchant_id, caller = %merchant_id, "Rejected cross-merchant write");
            return Err(StoreError::Forbidden(
                "product belongs to another merchant".to_owned(),
            ));
        }

        patch.apply(product, Utc::now());
        let product = product.clone();
        drop(docs);

        self.bump();
        debug!(is_active = product.is_active, "Patched product");
        Ok(product)
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}
