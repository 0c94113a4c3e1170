//! Transient user notifications.
//!
//! Every user-initiated action reports its outcome exactly once. The
//! [`Action`] table holds the wording; sinks decide how it is shown.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use crate::error::MerchantError;

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    /// A success notification.
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_owned(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    /// A failure notification.
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_owned(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// User actions that report an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadDashboard,
    RegisterMerchant,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
}

impl Action {
    /// The notification for a successful action.
    #[must_use]
    pub fn success(self) -> Notification {
        Notification::success(match self {
            Self::LoadDashboard => "Merchant account loaded",
            Self::RegisterMerchant => "Your merchant account has been created.",
            Self::CreateProduct => "Product created successfully",
            Self::UpdateProduct => "Product updated successfully",
            Self::DeleteProduct => "Product deleted successfully",
        })
    }

    /// The notification for a failed action, `None` if the user cancelled.
    #[must_use]
    pub fn failure(self, err: &MerchantError) -> Option<Notification> {
        let description = match (self, err) {
            (_, MerchantError::Cancelled) => return None,
            (_, MerchantError::IdentityMissing) => "Please connect your wallet first".to_owned(),
            (_, MerchantError::InvalidField { reason, .. }) => reason.clone(),
            (_, MerchantError::DuplicateIdentity) => {
                "This wallet already has a merchant account.".to_owned()
            }
            (Self::LoadDashboard, _) => "Failed to load merchant account".to_owned(),
            (Self::RegisterMerchant, _) => "Failed to create merchant account.".to_owned(),
            (Self::CreateProduct, _) => "Failed to create product".to_owned(),
            (Self::UpdateProduct, _) => "Failed to update product".to_owned(),
            (Self::DeleteProduct, _) => "Failed to delete product".to_owned(),
        };
        Some(Notification::error(description))
    }

    /// The notification for `result`.
    #[must_use]
    pub fn outcome<T>(self, result: &Result<T, MerchantError>) -> Option<Notification> {
        match result {
            Ok(_) => Some(self.success()),
            Err(err) => self.failure(err),
        }
    }
}

/// Destination for notifications.
pub trait NotificationSink: Send + Sync {
    /// Show a notification.
    fn notify(&self, notification: Notification);
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all notifications.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_wording() {
        let n = Action::RegisterMerchant.success();
        assert_eq!(n.title, "Success");
        assert_eq!(n.description, "Your merchant account has been created.");
        assert_eq!(n.variant, NotificationVariant::Default);
    }

    #[test]
    fn test_failure_wording() {
        let n = Action::CreateProduct
            .failure(&MerchantError::StoreUnavailable("down".into()))
            .unwrap_or_else(|| Notification::success("missing"));
        assert_eq!(n.description, "Failed to create product");
        assert_eq!(n.variant, NotificationVariant::Destructive);

        let n = Action::CreateProduct.failure(&MerchantError::IdentityMissing);
        assert_eq!(
            n.map(|n| n.description).as_deref(),
            Some("Please connect your wallet first")
        );
    }

    #[test]
    fn test_lookup_failure_wording() {
        let n = Action::LoadDashboard.failure(&MerchantError::StoreUnavailable("down".into()));
        assert_eq!(
            n.map(|n| n.description).as_deref(),
            Some("Failed to load merchant account")
        );
    }

    #[test]
    fn test_cancel_is_silent() {
        assert_eq!(Action::DeleteProduct.failure(&MerchantError::Cancelled), None);
    }

    #[test]
    fn test_log_collects_and_drains() {
        let log = NotificationLog::new();
        log.notify(Notification::success("one"));
        log.notify(Notification::error("two"));
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.drain().len(), 2);
        assert!(log.entries().is_empty());
    }
}
