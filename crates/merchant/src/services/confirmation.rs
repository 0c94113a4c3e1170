//! Confirmation prompts for destructive actions.

/// Prompt shown before a product is soft-deleted.
pub const DELETE_PRODUCT_PROMPT: &str = "Are you sure you want to delete this product?";

/// Asks the user to confirm an action.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait Confirm: Send + Sync {
    /// Show `prompt` and return whether the user agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers yes to every prompt. Used for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Answers no to every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
