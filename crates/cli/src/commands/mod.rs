//! CLI command implementations.
//!
//! Every command opens the store snapshot, acts through the same services a
//! dashboard would use, and writes the snapshot back if anything changed.

pub mod merchant;
pub mod product;
pub mod seed;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use itiza_core::{WalletAddress, WalletAddressError};
use itiza_merchant::MerchantConfig;
use itiza_merchant::error::MerchantError;
use itiza_merchant::services::{
    Confirm, DashboardSession, Notification, NotificationSink, NotificationVariant, WalletAdapter,
};
use itiza_merchant::store::{MemoryStore, ReactiveStore, StoreError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The wallet argument is not a valid address.
    #[error("Invalid wallet address: {0}")]
    Wallet(#[from] WalletAddressError),

    /// A merchant operation failed.
    #[error(transparent)]
    Merchant(#[from] MerchantError),

    /// The store snapshot could not be loaded or saved.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The seed file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The seed file is not valid YAML.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Command-line input did not make sense.
    #[error("{0}")]
    Invalid(String),
}

/// Store and configuration shared by all commands.
pub struct Context {
    pub config: MerchantConfig,
    pub store: Arc<MemoryStore>,
}

impl Context {
    /// Open the store snapshot named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be loaded.
    pub async fn open(config: MerchantConfig) -> Result<Self, CommandError> {
        let store = MemoryStore::open(&config.snapshot_path).await?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub fn reactive_store(&self) -> Arc<dyn ReactiveStore> {
        Arc::clone(&self.store) as Arc<dyn ReactiveStore>
    }

    /// Write the snapshot back if any write happened since `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub async fn save_if_changed(&self, since: u64) -> Result<(), CommandError> {
        if self.store.version() == since {
            debug!("Store unchanged, not saving");
            return Ok(());
        }
        self.store.save(&self.config.snapshot_path).await?;
        Ok(())
    }

    /// Connect `wallet` and resolve its dashboard state.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the lookup fails.
    pub async fn connect(&self, wallet: &str) -> Result<Dashboard, CommandError> {
        let address = WalletAddress::parse(wallet)?;
        let adapter = WalletAdapter::new();
        adapter.connect(address.public_key()?);

        let mut session = DashboardSession::new(
            adapter.resolver(),
            self.reactive_store(),
            Arc::new(ConsoleSink),
        );
        session.settle().await?;

        Ok(Dashboard {
            _adapter: adapter,
            session,
        })
    }
}

/// A dashboard session with its wallet kept connected.
pub struct Dashboard {
    _adapter: WalletAdapter,
    pub session: DashboardSession,
}

/// Shows notifications on stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        let marker = match notification.variant {
            NotificationVariant::Default => "✓",
            NotificationVariant::Destructive => "✗",
        };
        let _ = writeln!(
            io::stderr().lock(),
            "{marker} {}: {}",
            notification.title,
            notification.description
        );
    }
}

/// Asks on stderr and reads the answer from stdin.
#[derive(Debug, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stderr = io::stderr().lock();
        if write!(stderr, "{prompt} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
