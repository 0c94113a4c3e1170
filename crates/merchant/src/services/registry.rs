//! Merchant registry: identity to merchant lookups and registration.

use std::sync::Arc;

use tracing::{info, instrument};

use itiza_core::{MerchantId, WalletAddress};

use crate::error::MerchantError;
use crate::forms::RegistrationForm;
use crate::models::Merchant;
use crate::services::identity::Identity;
use crate::store::{ReactiveStore, Subscription};

/// Maps wallets to merchant accounts. One wallet, one merchant.
#[derive(Clone)]
pub struct MerchantRegistry {
    store: Arc<dyn ReactiveStore>,
}

impl std::fmt::Debug for MerchantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantRegistry").finish_non_exhaustive()
    }
}

impl MerchantRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn ReactiveStore>) -> Self {
        Self { store }
    }

    /// Live lookup of the merchant registered to `wallet`.
    ///
    /// Starts out `Loading`; `Ready(None)` means the wallet has not
    /// registered yet.
    #[must_use]
    pub fn lookup_by_identity(&self, wallet: &WalletAddress) -> Subscription<Option<Merchant>> {
        let store = Arc::clone(&self.store);
        let wallet = wallet.clone();
        Subscription::spawn("merchant_by_wallet", self.store.changes(), move || {
            let store = Arc::clone(&store);
            let wallet = wallet.clone();
            async move { store.merchant_by_wallet(&wallet).await }
        })
    }

    /// One-shot merchant read.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::NotFound`] if no such merchant exists.
    pub async fn get(&self, id: MerchantId) -> Result<Merchant, MerchantError> {
        self.store
            .merchant(id)
            .await?
            .ok_or_else(|| MerchantError::NotFound(format!("merchant {id}")))
    }

    /// Register the connected wallet as a merchant.
    ///
    /// # Errors
    ///
    /// - [`MerchantError::IdentityMissing`] if no wallet is connected
    /// - [`MerchantError::InvalidField`] if the form does not validate
    /// - [`MerchantError::DuplicateIdentity`] if the wallet already has a merchant
    /// - [`MerchantError::StoreUnavailable`] if the store fails
    #[instrument(skip(self, identity, form))]
    pub async fn register(
        &self,
        identity: &Identity,
        form: &RegistrationForm,
    ) -> Result<Merchant, MerchantError> {
        let wallet = identity.address().ok_or(MerchantError::IdentityMissing)?;
        let new_merchant = form.validate(wallet)?;

        let merchant = self.store.insert_merchant(new_merchant).await?;

        info!(
            merchant_id = %merchant.id,
            wallet = %wallet.short(),
            business_name = %merchant.business_name,
            "Merchant registered"
        );
        Ok(merchant)
    }
}
