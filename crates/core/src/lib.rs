//! Itiza Core - Shared value types.
//!
//! This crate provides the validated value types used by every Itiza
//! component:
//! - `merchant` - Merchant onboarding and catalog coordination library
//! - `cli` - Command-line driver for the merchant dashboard
//!
//! # Architecture
//!
//! The core crate contains only types and parsing - no I/O, no store access,
//! no async runtime. Every type here is constructed through a `parse` or
//! `new` function, so a value that exists is a value that passed validation.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, wallet addresses, emails, prices, stock, tags

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
