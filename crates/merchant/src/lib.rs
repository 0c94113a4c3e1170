//! Itiza Merchant library.
//!
//! Merchant onboarding and catalog coordination: a wallet connects, is
//! resolved to a merchant account (or registers one), and then manages the
//! products that feed the gift storefront.
//!
//! # Layers
//!
//! - [`store`] - Reactive document store, live subscriptions, snapshots
//! - [`models`] - Merchant and product documents
//! - [`forms`] - Raw form input and validation
//! - [`services`] - Identity, registry, catalog and the dashboard state machine
//! - [`config`] - Environment configuration
//! - [`error`] - Error taxonomy shared by the services

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod services;
pub mod store;

pub use config::{ConfigError, LogFormat, MerchantConfig};
pub use error::MerchantError;
