//! Integration tests for the Itiza merchant dashboard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p itiza-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `registration` - One merchant per wallet, under concurrency
//! - `catalog` - Product validation, ownership and soft delete
//! - `dashboard` - Dashboard state machine driven by a wallet
//! - `store_failures` - Store errors surfacing through the services
//!
//! This library holds the fixtures the test files share.

use std::sync::Arc;

use itiza_core::{WalletAddress, WalletPublicKey};
use itiza_merchant::forms::{MetadataForm, ProductForm, RegistrationForm};
use itiza_merchant::services::{
    DashboardSession, Identity, MerchantRegistry, NotificationLog, NotificationSink,
    ProductCatalog, WalletAdapter,
};
use itiza_merchant::store::{MemoryStore, ReactiveStore};

/// A 32-byte public key filled with `seed`.
#[must_use]
pub fn public_key(seed: u8) -> WalletPublicKey {
    WalletPublicKey::from([seed; 32])
}

/// The wallet address of [`public_key`].
///
/// # Panics
///
/// Never, the key always has the right length.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn wallet(seed: u8) -> WalletAddress {
    public_key(seed).to_address().unwrap()
}

/// A connected identity for [`wallet`].
#[must_use]
pub fn identity(seed: u8) -> Identity {
    Identity::Connected(wallet(seed))
}

/// A registration form that validates.
#[must_use]
pub fn registration_form(name: &str) -> RegistrationForm {
    RegistrationForm {
        business_name: name.to_owned(),
        business_address: "27 Orchard Street".to_owned(),
        email: "owner@shop.example".to_owned(),
    }
}

/// A product form that validates.
#[must_use]
pub fn product_form(name: &str) -> ProductForm {
    ProductForm {
        name: name.to_owned(),
        description: "A thoughtful gift".to_owned(),
        price: "19.99".to_owned(),
        category: "gifts".to_owned(),
        stock_quantity: "5".to_owned(),
        image_url: "https://img.example/gift.png".to_owned(),
        tags: "electronics, gadgets ,new".to_owned(),
        metadata: MetadataForm::default(),
    }
}

/// A fresh store with the services built on it.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub registry: MerchantRegistry,
    pub catalog: ProductCatalog,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let dyn_store: Arc<dyn ReactiveStore> = Arc::clone(&store) as Arc<dyn ReactiveStore>;
        Self {
            registry: MerchantRegistry::new(Arc::clone(&dyn_store)),
            catalog: ProductCatalog::new(dyn_store),
            store,
        }
    }

    /// The store as the services see it.
    #[must_use]
    pub fn reactive_store(&self) -> Arc<dyn ReactiveStore> {
        Arc::clone(&self.store) as Arc<dyn ReactiveStore>
    }

    /// A dashboard session on this store with its own wallet and log.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn dashboard(&self) -> DashboardHarness {
        DashboardHarness::new(self.reactive_store())
    }
}

/// A dashboard session with the wallet and notifications it is wired to.
pub struct DashboardHarness {
    pub wallet: WalletAdapter,
    pub notifications: Arc<NotificationLog>,
    pub session: DashboardSession,
}

impl DashboardHarness {
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(store: Arc<dyn ReactiveStore>) -> Self {
        let wallet = WalletAdapter::new();
        let notifications = Arc::new(NotificationLog::new());
        let session = DashboardSession::new(
            wallet.resolver(),
            store,
            Arc::clone(&notifications) as Arc<dyn NotificationSink>,
        );
        Self {
            wallet,
            notifications,
            session,
        }
    }
}
