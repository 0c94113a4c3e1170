//! Merchant domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use itiza_core::{Email, MerchantId, WalletAddress};

/// A registered seller, keyed by wallet address.
///
/// Every field is set at registration and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Store-assigned merchant ID.
    pub id: MerchantId,
    /// Wallet that owns this merchant account (unique across merchants).
    pub wallet_address: WalletAddress,
    /// Trading name shown on the storefront.
    pub business_name: String,
    /// Postal address of the business.
    pub business_address: String,
    /// Contact email.
    pub email: Email,
    /// When the merchant registered.
    pub created_at: DateTime<Utc>,
}

/// Validated registration data, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMerchant {
    /// Wallet registering the account.
    pub wallet_address: WalletAddress,
    /// Trading name.
    pub business_name: String,
    /// Postal address.
    pub business_address: String,
    /// Contact email.
    pub email: Email,
}

impl NewMerchant {
    /// Materialise the document the store will hold.
    #[must_use]
    pub fn into_merchant(self, id: MerchantId, created_at: DateTime<Utc>) -> Merchant {
        Merchant {
            id,
            wallet_address: self.wallet_address,
            business_name: self.business_name,
            business_address: self.business_address,
            email: self.email,
            created_at,
        }
    }
}
