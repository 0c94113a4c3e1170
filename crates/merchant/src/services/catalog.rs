//! Product catalog scoped to merchants.
//!
//! Products are never removed. Deleting one sets `is_active = false` and the
//! document stays retrievable by ID and, with [`ActivityFilter::All`], in
//! listings.

use std::sync::Arc;

use tracing::{info, instrument};

use itiza_core::{ActivityFilter, MerchantId, ProductId};

use crate::error::MerchantError;
use crate::forms::ProductForm;
use crate::models::{Product, ProductPatch};
use crate::services::confirmation::{Confirm, DELETE_PRODUCT_PROMPT};
use crate::services::identity::Identity;
use crate::store::{ReactiveStore, StoreError, Subscription};

/// Create, update and list products on behalf of a wallet.
#[derive(Clone)]
pub struct ProductCatalog {
    store: Arc<dyn ReactiveStore>,
}

impl std::fmt::Debug for ProductCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCatalog").finish_non_exhaustive()
    }
}

impl ProductCatalog {
    #[must_use]
    pub fn new(store: Arc<dyn ReactiveStore>) -> Self {
        Self { store }
    }

    /// Live listing of a merchant's products, oldest first.
    #[must_use]
    pub fn list_by_merchant(
        &self,
        merchant_id: MerchantId,
        filter: ActivityFilter,
    ) -> Subscription<Vec<Product>> {
        let store = Arc::clone(&self.store);
        Subscription::spawn("products_by_merchant", self.store.changes(), move || {
            let store = Arc::clone(&store);
            async move {
                let mut products = store.products_by_merchant(merchant_id).await?;
                products.retain(|p| filter.admits(p.is_active));
                Ok::<_, StoreError>(products)
            }
        })
    }

    /// One-shot product read. Soft-deleted products are returned too.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::NotFound`] if no such product exists.
    pub async fn get(&self, id: ProductId) -> Result<Product, MerchantError> {
        self.store
            .product(id)
            .await?
            .ok_or_else(|| MerchantError::NotFound(format!("product {id}")))
    }

    /// Create a product owned by the identity's merchant.
    ///
    /// # Errors
    ///
    /// - [`MerchantError::IdentityMissing`] if no wallet is connected
    /// - [`MerchantError::InvalidField`] if the form does not validate
    /// - [`MerchantError::NotRegistered`] if the wallet has no merchant
    /// - [`MerchantError::StoreUnavailable`] if the store fails
    #[instrument(skip(self, identity, form), fields(name = %form.name))]
    pub async fn create(
        &self,
        identity: &Identity,
        form: &ProductForm,
    ) -> Result<Product, MerchantError> {
        let wallet = identity.address().ok_or(MerchantError::IdentityMissing)?;
        let new_product = form.validate()?;

        let product = self
            .store
            .insert_product(wallet, new_product)
            .await
            .map_err(not_registered)?;

        info!(
            product_id = %product.id,
            merchant_id = %product.merchant_id,
            "Product created"
        );
        Ok(product)
    }

    /// Apply a partial update to a product the identity's merchant owns.
    ///
    /// # Errors
    ///
    /// - [`MerchantError::IdentityMissing`] if no wallet is connected
    /// - [`MerchantError::InvalidField`] if the patch is empty or blanks a
    ///   required field
    /// - [`MerchantError::NotOwner`] if another merchant owns the product
    /// - [`MerchantError::NotFound`] if the product does not exist
    #[instrument(skip(self, identity, patch), fields(product_id = %id))]
    pub async fn update(
        &self,
        identity: &Identity,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, MerchantError> {
        let wallet = identity.address().ok_or(MerchantError::IdentityMissing)?;
        check_patch(&patch)?;

        let product = self
            .store
            .patch_product(wallet, id, patch)
            .await
            .map_err(not_registered)?;

        info!(
            product_id = %product.id,
            is_active = product.is_active,
            "Product updated"
        );
        Ok(product)
    }

    /// Soft-delete a product after the user confirms.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::Cancelled`] without touching the store if
    /// the user declines, otherwise as [`ProductCatalog::update`].
    pub async fn deactivate(
        &self,
        identity: &Identity,
        id: ProductId,
        confirm: &dyn Confirm,
    ) -> Result<Product, MerchantError> {
        if identity.address().is_none() {
            return Err(MerchantError::IdentityMissing);
        }
        if !confirm.confirm(DELETE_PRODUCT_PROMPT) {
            info!(product_id = %id, "Product deletion cancelled");
            return Err(MerchantError::Cancelled);
        }
        self.update(identity, id, ProductPatch::deactivate()).await
    }
}

/// A missing merchant behind the calling wallet means it never registered.
fn not_registered(err: StoreError) -> MerchantError {
    match err {
        StoreError::NotFound(ref what) if what.starts_with("merchant") => {
            MerchantError::NotRegistered
        }
        other => other.into(),
    }
}

fn check_patch(patch: &ProductPatch) -> Result<(), MerchantError> {
    if patch.is_empty() {
        return Err(MerchantError::invalid_field("patch", "nothing to update"));
    }
    let text_fields = [
        ("name", &patch.name),
        ("description", &patch.description),
        ("category", &patch.category),
        ("image_url", &patch.image_url),
    ];
    for (field, value) in text_fields {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(MerchantError::invalid_field(field, format!("{field} is required")));
        }
    }
    if let Some(Some(metadata)) = &patch.metadata
        && metadata.weight.is_some_and(|w| w.is_sign_negative() && !w.is_zero())
    {
        return Err(MerchantError::invalid_field("weight", "weight cannot be negative"));
    }
    Ok(())
}
