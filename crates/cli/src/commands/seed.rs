//! Seed the store with merchants and products from YAML.
//!
//! ```yaml
//! merchants:
//!   - wallet: 4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T
//!     business_name: Bloom & Co
//!     business_address: 12 Garden Lane
//!     email: hello@bloom.example
//!     products:
//!       - name: Scented Candle
//!         description: Lavender and cedar
//!         price: "19.99"
//!         category: home
//!         stock_quantity: "5"
//!         image_url: https://img.example/candle.png
//!         tags: candle, gift
//!         metadata:
//!           weight: "0.4"
//! ```
//!
//! The whole file is validated before anything is written. Wallets that are
//! already registered are skipped along with their products, so seeding the
//! same file twice is harmless.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, warn};

use itiza_core::WalletAddress;
use itiza_merchant::error::MerchantError;
use itiza_merchant::forms::{ProductForm, RegistrationForm};
use itiza_merchant::services::{Identity, MerchantRegistry, ProductCatalog};

use super::{CommandError, Context};

/// Top-level seed document.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub merchants: Vec<SeedMerchant>,
}

/// One merchant and its products.
#[derive(Debug, Deserialize)]
pub struct SeedMerchant {
    pub wallet: String,
    #[serde(flatten)]
    pub registration: RegistrationForm,
    #[serde(default)]
    pub products: Vec<ProductForm>,
}

/// What a seed run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub merchants_created: usize,
    pub merchants_skipped: usize,
    pub products_created: usize,
}

/// Check every entry, returning one message per problem.
#[must_use]
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    for (i, merchant) in seed.merchants.iter().enumerate() {
        let wallet = match WalletAddress::parse(&merchant.wallet) {
            Ok(wallet) => wallet,
            Err(e) => {
                errors.push(format!("merchants[{i}].wallet: {e}"));
                continue;
            }
        };
        if let Err(e) = merchant.registration.validate(&wallet) {
            errors.push(format!("merchants[{i}]: {e}"));
        }
        for (j, product) in merchant.products.iter().enumerate() {
            if let Err(e) = product.validate() {
                errors.push(format!("merchants[{i}].products[{j}]: {e}"));
            }
        }
    }
    errors
}

/// Register the merchants and create their products.
///
/// # Errors
///
/// Returns an error if a store write fails. Entries are expected to be
/// validated already.
pub async fn apply(
    registry: &MerchantRegistry,
    catalog: &ProductCatalog,
    seed: &SeedFile,
) -> Result<SeedSummary, CommandError> {
    let mut summary = SeedSummary::default();

    for merchant in &seed.merchants {
        let identity = Identity::Connected(WalletAddress::parse(&merchant.wallet)?);

        match registry.register(&identity, &merchant.registration).await {
            Ok(created) => {
                info!(merchant_id = %created.id, "Seeded merchant");
                summary.merchants_created += 1;
            }
            Err(MerchantError::DuplicateIdentity) => {
                warn!(wallet = %merchant.wallet, "Wallet already registered, skipping");
                summary.merchants_skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        for product in &merchant.products {
            catalog.create(&identity, product).await?;
            summary.products_created += 1;
        }
    }

    Ok(summary)
}

/// Seed from a YAML file and save the snapshot.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or the store cannot be written.
pub async fn from_file(ctx: &Context, path: &Path) -> Result<(), CommandError> {
    info!(path = %path.display(), "Loading seed file");

    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CommandError::Invalid(format!(
            "{} validation errors found",
            errors.len()
        )));
    }

    let since = ctx.store.version();
    let registry = MerchantRegistry::new(ctx.reactive_store());
    let catalog = ProductCatalog::new(ctx.reactive_store());
    let summary = apply(&registry, &catalog, &seed).await?;
    ctx.save_if_changed(since).await?;

    info!("Seeding complete!");
    info!("  Merchants created: {}", summary.merchants_created);
    info!("  Merchants skipped (already registered): {}", summary.merchants_skipped);
    info!("  Products created: {}", summary.products_created);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use itiza_core::WalletPublicKey;
    use itiza_merchant::store::{MemoryStore, ReactiveStore};

    use super::*;

    fn seed_yaml(wallet: &WalletAddress, price: &str) -> String {
        format!(
            r#"
merchants:
  - wallet: {wallet}
    business_name: Bloom & Co
    business_address: 12 Garden Lane
    email: hello@bloom.example
    products:
      - name: Scented Candle
        description: Lavender and cedar
        price: "{price}"
        category: home
        stock_quantity: "5"
        image_url: https://img.example/candle.png
        tags: candle, gift
        metadata:
          weight: "0.4"
"#
        )
    }

    fn wallet() -> WalletAddress {
        WalletPublicKey::from([11u8; 32]).to_address().unwrap()
    }

    #[test]
    fn test_validate_reports_bad_entries() {
        let seed: SeedFile = serde_yaml::from_str(&seed_yaml(&wallet(), "abc")).unwrap();
        let errors = validate(&seed);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("merchants[0].products[0]"));

        let seed: SeedFile = serde_yaml::from_str(&seed_yaml(&wallet(), "19.99")).unwrap();
        assert!(validate(&seed).is_empty());
    }

    #[tokio::test]
    async fn test_apply_is_idempotent() {
        let store: Arc<dyn ReactiveStore> = Arc::new(MemoryStore::new());
        let registry = MerchantRegistry::new(Arc::clone(&store));
        let catalog = ProductCatalog::new(Arc::clone(&store));
        let seed: SeedFile = serde_yaml::from_str(&seed_yaml(&wallet(), "19.99")).unwrap();

        let first = apply(&registry, &catalog, &seed).await.unwrap();
        assert_eq!(first.merchants_created, 1);
        assert_eq!(first.products_created, 1);

        let second = apply(&registry, &catalog, &seed).await.unwrap();
        assert_eq!(second.merchants_skipped, 1);
        assert_eq!(second.products_created, 0);

        let merchant = store.merchant_by_wallet(&wallet()).await.unwrap().unwrap();
        let products = store.products_by_merchant(merchant.id).await.unwrap();
        assert_eq!(products.len(), 1);
        assert!(products[0].metadata.is_some());
    }
}
