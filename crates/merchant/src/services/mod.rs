//! Merchant dashboard services.
//!
//! # Services
//!
//! - `identity` - Wallet connection reduced to a calling identity
//! - `registry` - One merchant per wallet, registration and lookups
//! - `catalog` - Product create/update/soft-delete and live listings
//! - `confirmation` - Prompts before destructive actions
//! - `notifications` - One transient message per user action
//! - `dashboard` - State machine tying the above together

pub mod catalog;
pub mod confirmation;
pub mod dashboard;
pub mod identity;
pub mod notifications;
pub mod registry;

pub use catalog::ProductCatalog;
pub use confirmation::{AssumeNo, AssumeYes, Confirm, DELETE_PRODUCT_PROMPT};
pub use dashboard::{
    DashboardController, DashboardSession, DashboardState, MerchantScope, ScopedCatalog,
};
pub use identity::{Identity, IdentityResolver, WalletAdapter, WalletConnection};
pub use notifications::{
    Action, Notification, NotificationLog, NotificationSink, NotificationVariant,
};
pub use registry::MerchantRegistry;

#[cfg(any(test, feature = "mocks"))]
pub use confirmation::MockConfirm;
