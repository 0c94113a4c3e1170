//! Domain models for the merchant dashboard.
//!
//! These are validated documents as held by the store. Raw form input lives
//! in [`crate::forms`] and is converted into the `New*` types here before a
//! mutation is issued.

pub mod merchant;
pub mod product;

pub use merchant::{Merchant, NewMerchant};
pub use product::{NewProduct, Product, ProductMetadata, ProductPatch};
