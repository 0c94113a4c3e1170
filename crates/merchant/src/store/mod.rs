//! Reactive document store for merchants and products.
//!
//! # Collections
//!
//! - `merchants` - One document per registered wallet (unique `wallet_address`)
//! - `products` - Catalog items, each owned by one merchant
//!
//! # Reads and writes
//!
//! Writes are single-document and atomic. Reads come in two flavours: one-shot
//! lookups on [`ReactiveStore`], and live [`Subscription`]s built on top of
//! [`ReactiveStore::changes`], which re-run their query after every write.
//!
//! Mutations that act on behalf of a wallet (`insert_product`,
//! `patch_product`) resolve the owning merchant inside the store, so client
//! input never decides which merchant a product belongs to.

pub mod memory;
pub mod snapshot;
pub mod subscription;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use itiza_core::{MerchantId, ProductId, WalletAddress};

use crate::models::{Merchant, NewMerchant, NewProduct, Product, ProductPatch};

pub use memory::MemoryStore;
pub use snapshot::Snapshot;
pub use subscription::{QueryState, Subscription};

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store rejected or could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested document was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Constraint violation (e.g., wallet already registered).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The calling wallet does not own the document.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

/// Persistence seam for the merchant dashboard.
///
/// Implementations must serialise `insert_merchant` so that two concurrent
/// registrations for one wallet cannot both succeed, and must bump
/// [`ReactiveStore::changes`] after every successful write.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ReactiveStore: Send + Sync {
    /// Look up the merchant registered to `wallet`.
    async fn merchant_by_wallet(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<Merchant>, StoreError>;

    /// Look up a merchant by ID.
    async fn merchant(&self, id: MerchantId) -> Result<Option<Merchant>, StoreError>;

    /// Insert a merchant.
    ///
    /// Returns [`StoreError::Conflict`] if the wallet is already registered.
    async fn insert_merchant(&self, merchant: NewMerchant) -> Result<Merchant, StoreError>;

    /// All products of a merchant, active or not, oldest first.
    async fn products_by_merchant(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Vec<Product>, StoreError>;

    /// Look up a product by ID.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Insert a product owned by the merchant registered to `wallet`.
    ///
    /// Returns [`StoreError::NotFound`] if `wallet` has no merchant.
    async fn insert_product(
        &self,
        wallet: &WalletAddress,
        product: NewProduct,
    ) -> Result<Product, StoreError>;

    /// Apply `patch` to a product owned by the merchant registered to `wallet`.
    ///
    /// Returns [`StoreError::NotFound`] if the product or merchant is missing
    /// and [`StoreError::Forbidden`] if another merchant owns the product.
    async fn patch_product(
        &self,
        wallet: &WalletAddress,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, StoreError>;

    /// Change token, bumped after every committed write.
    fn changes(&self) -> watch::Receiver<u64>;
}
