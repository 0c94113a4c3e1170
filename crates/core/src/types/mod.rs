//! Core types for Itiza.
//!
//! This module provides type-safe wrappers for the merchant domain.

pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod tags;
pub mod wallet;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError, QuantityError, StockQuantity};
pub use status::*;
pub use tags::Tags;
pub use wallet::{WalletAddress, WalletAddressError, WalletPublicKey};
