//! Status enums shared by the catalog and its consumers.

use serde::{Deserialize, Serialize};

/// Which products a catalog listing includes.
///
/// Soft-deleted products stay in the store with `is_active = false`. The
/// management table historically listed them alongside live ones, which is
/// what [`ActivityFilter::All`] reproduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityFilter {
    /// Active and soft-deleted products.
    #[default]
    All,
    /// Only products with `is_active = true`.
    ActiveOnly,
}

impl ActivityFilter {
    /// Whether a product with the given activity flag passes the filter.
    #[must_use]
    pub const fn admits(self, is_active: bool) -> bool {
        match self {
            Self::All => true,
            Self::ActiveOnly => is_active,
        }
    }
}

impl std::fmt::Display for ActivityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::ActiveOnly => write!(f, "active"),
        }
    }
}

impl std::str::FromStr for ActivityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" | "active_only" => Ok(Self::ActiveOnly),
            _ => Err(format!("invalid activity filter: {s}")),
        }
    }
}
