//! Raw form input and its validation.
//!
//! Forms hold exactly what the user typed. `validate` turns them into the
//! typed documents the store accepts, or reports the first field that is
//! wrong. Nothing reaches the store unvalidated.

use rust_decimal::Decimal;
use serde::Deserialize;

use itiza_core::{Email, Price, StockQuantity, Tags, WalletAddress};

use crate::error::MerchantError;
use crate::models::{NewMerchant, NewProduct, ProductMetadata, ProductPatch};

/// Trim `value` and reject it when blank.
fn required(field: &'static str, value: &str) -> Result<String, MerchantError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MerchantError::invalid_field(field, format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Trim `value`, mapping blank input to `None`.
fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Merchant registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationForm {
    pub business_name: String,
    pub business_address: String,
    pub email: String,
}

impl RegistrationForm {
    /// Validate the form for the connected `wallet`.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::InvalidField`] for a blank field or a
    /// malformed email.
    pub fn validate(&self, wallet: &WalletAddress) -> Result<NewMerchant, MerchantError> {
        let business_name = required("business_name", &self.business_name)?;
        let business_address = required("business_address", &self.business_address)?;
        let email =
            Email::parse(&self.email).map_err(|e| MerchantError::invalid_field("email", e))?;

        Ok(NewMerchant {
            wallet_address: wallet.clone(),
            business_name,
            business_address,
            email,
        })
    }
}

/// Optional physical details as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetadataForm {
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
}

impl MetadataForm {
    /// Validate into metadata, `None` when every field is blank.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::InvalidField`] if the weight is not a
    /// non-negative number.
    pub fn validate(&self) -> Result<Option<ProductMetadata>, MerchantError> {
        let weight = optional(self.weight.as_deref())
            .map(|raw| {
                let weight = raw
                    .parse::<Decimal>()
                    .map_err(|_| MerchantError::invalid_field("weight", "weight must be a number"))?;
                if weight.is_sign_negative() && !weight.is_zero() {
                    return Err(MerchantError::invalid_field(
                        "weight",
                        "weight cannot be negative",
                    ));
                }
                Ok(weight.normalize())
            })
            .transpose()?;

        let metadata = ProductMetadata {
            weight,
            dimensions: optional(self.dimensions.as_deref()),
            material: optional(self.material.as_deref()),
        };
        Ok((!metadata.is_empty()).then_some(metadata))
    }
}

/// New product form. Price and stock arrive as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock_quantity: String,
    pub image_url: String,
    /// Comma-separated.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub metadata: MetadataForm,
}

impl ProductForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::InvalidField`] naming the first bad field.
    pub fn validate(&self) -> Result<NewProduct, MerchantError> {
        let name = required("name", &self.name)?;
        let description = required("description", &self.description)?;
        let price =
            Price::parse(&self.price).map_err(|e| MerchantError::invalid_field("price", e))?;
        let category = required("category", &self.category)?;
        let stock_quantity = StockQuantity::parse(&self.stock_quantity)
            .map_err(|e| MerchantError::invalid_field("stock_quantity", e))?;
        let image_url = required("image_url", &self.image_url)?;

        Ok(NewProduct {
            name,
            description,
            category,
            image_url,
            price,
            stock_quantity,
            tags: Tags::parse(&self.tags),
            metadata: self.metadata.validate()?,
        })
    }
}

/// Partial product edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductPatchForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub metadata: Option<MetadataForm>,
    pub is_active: Option<bool>,
}

impl ProductPatchForm {
    /// Validate into a patch.
    ///
    /// # Errors
    ///
    /// Returns [`MerchantError::InvalidField`] if a supplied field is invalid
    /// or nothing would change.
    pub fn validate(&self) -> Result<ProductPatch, MerchantError> {
        let patch = ProductPatch {
            name: self.name.as_deref().map(|v| required("name", v)).transpose()?,
            description: self
                .description
                .as_deref()
                .map(|v| required("description", v))
                .transpose()?,
            category: self
                .category
                .as_deref()
                .map(|v| required("category", v))
                .transpose()?,
            image_url: self
                .image_url
                .as_deref()
                .map(|v| required("image_url", v))
                .transpose()?,
            price: self
                .price
                .as_deref()
                .map(|v| Price::parse(v).map_err(|e| MerchantError::invalid_field("price", e)))
                .transpose()?,
            stock_quantity: self
                .stock_quantity
                .as_deref()
                .map(|v| {
                    StockQuantity::parse(v)
                        .map_err(|e| MerchantError::invalid_field("stock_quantity", e))
                })
                .transpose()?,
            tags: self.tags.as_deref().map(Tags::parse),
            metadata: self.metadata.as_ref().map(MetadataForm::validate).transpose()?,
            is_active: self.is_active,
        };

        if patch.is_empty() {
            return Err(MerchantError::invalid_field("patch", "nothing to update"));
        }
        Ok(patch)
    }
}
