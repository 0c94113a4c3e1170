//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use itiza_core::{MerchantId, Price, ProductId, StockQuantity, Tags};

/// Optional physical details of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetadata {
    /// Shipping weight.
    pub weight: Option<Decimal>,
    /// Free-form dimensions, e.g. "20 x 10 x 5 cm".
    pub dimensions: Option<String>,
    /// Primary material.
    pub material: Option<String>,
}

impl ProductMetadata {
    /// Whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.weight.is_none() && self.dimensions.is_none() && self.material.is_none()
    }
}

/// A catalog item owned by exactly one merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned product ID.
    pub id: ProductId,
    /// Owning merchant. Never changes after creation.
    pub merchant_id: MerchantId,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Storefront category.
    pub category: String,
    /// Product image.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Units available.
    pub stock_quantity: StockQuantity,
    /// Search/browse tags.
    pub tags: Tags,
    /// Optional physical details.
    pub metadata: Option<ProductMetadata>,
    /// `false` once the merchant deleted the product.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Validated product data, ready to insert.
///
/// There is deliberately no merchant field: the owner is resolved by the
/// store from the calling wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Storefront category.
    pub category: String,
    /// Product image.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Units available.
    pub stock_quantity: StockQuantity,
    /// Tags.
    pub tags: Tags,
    /// Optional physical details.
    pub metadata: Option<ProductMetadata>,
}

impl NewProduct {
    /// Materialise the document the store will hold. New products are active.
    #[must_use]
    pub fn into_product(
        self,
        id: ProductId,
        merchant_id: MerchantId,
        now: DateTime<Utc>,
    ) -> Product {
        Product {
            id,
            merchant_id,
            name: self.name,
            description: self.description,
            category: self.category,
            image_url: self.image_url,
            price: self.price,
            stock_quantity: self.stock_quantity,
            tags: self.tags,
            metadata: self.metadata.filter(|m| !m.is_empty()),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update to a product. `None` leaves a field unchanged.
///
/// Soft delete is the patch `{ is_active: Some(false) }`, see
/// [`ProductPatch::deactivate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New image.
    pub image_url: Option<String>,
    /// New price.
    pub price: Option<Price>,
    /// New stock level.
    pub stock_quantity: Option<StockQuantity>,
    /// Replacement tag set.
    pub tags: Option<Tags>,
    /// Replacement metadata (`Some(None)` clears it).
    pub metadata: Option<Option<ProductMetadata>>,
    /// New activity flag.
    pub is_active: Option<bool>,
}

impl ProductPatch {
    /// The soft-delete patch.
    #[must_use]
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch in place and stamp `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if the clock does.
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock_quantity) = self.stock_quantity {
            product.stock_quantity = stock_quantity;
        }
        if let Some(tags) = self.tags {
            product.tags = tags;
        }
        if let Some(metadata) = self.metadata {
            product.metadata = metadata.filter(|m| !m.is_empty());
        }
        if let Some(is_active) = self.is_active {
            product.is_active = is_active;
        }
        product.updated_at = now.max(product.updated_at);
    }
}
