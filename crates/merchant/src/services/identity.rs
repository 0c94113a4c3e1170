//! Wallet identity resolution.
//!
//! The wallet widget is outside this crate. It reports its state through a
//! [`WalletAdapter`]; everything inside the crate reads that state through an
//! [`IdentityResolver`], which reduces it to [`Identity`].

use tokio::sync::watch;
use tracing::{debug, warn};

use itiza_core::{WalletAddress, WalletPublicKey};

/// Raw state reported by the wallet widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletConnection {
    pub connected: bool,
    pub public_key: Option<WalletPublicKey>,
}

/// The calling identity, as far as the dashboard is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Identity {
    #[default]
    Disconnected,
    Connected(WalletAddress),
}

impl Identity {
    /// The wallet address, if connected.
    #[must_use]
    pub const fn address(&self) -> Option<&WalletAddress> {
        match self {
            Self::Connected(address) => Some(address),
            Self::Disconnected => None,
        }
    }

    /// Whether a wallet is connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

impl From<&WalletConnection> for Identity {
    fn from(conn: &WalletConnection) -> Self {
        let Some(key) = conn.public_key.as_ref().filter(|_| conn.connected) else {
            return Self::Disconnected;
        };
        match key.to_address() {
            Ok(address) => Self::Connected(address),
            Err(err) => {
                warn!(error = %err, "Wallet reported an unusable public key");
                Self::Disconnected
            }
        }
    }
}

/// Publishing side of the wallet connection.
#[derive(Debug)]
pub struct WalletAdapter {
    tx: watch::Sender<WalletConnection>,
}

impl Default for WalletAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletAdapter {
    /// A disconnected wallet.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(WalletConnection::default());
        Self { tx }
    }

    /// Publish a raw connection state.
    pub fn publish(&self, connection: WalletConnection) {
        self.tx.send_if_modified(|current| {
            if *current == connection {
                false
            } else {
                *current = connection;
                true
            }
        });
    }

    /// Report a connected wallet.
    pub fn connect(&self, public_key: WalletPublicKey) {
        debug!("Wallet connected");
        self.publish(WalletConnection {
            connected: true,
            public_key: Some(public_key),
        });
    }

    /// Report the wallet as disconnected.
    pub fn disconnect(&self) {
        debug!("Wallet disconnected");
        self.publish(WalletConnection::default());
    }

    /// A resolver following this adapter.
    #[must_use]
    pub fn resolver(&self) -> IdentityResolver {
        IdentityResolver {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of the wallet, reduced to an [`Identity`].
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    rx: watch::Receiver<WalletConnection>,
}

impl IdentityResolver {
    /// The identity as of now. Has no side effects.
    #[must_use]
    pub fn current(&self) -> Identity {
        Identity::from(&*self.rx.borrow())
    }

    /// Whether a usable wallet is connected.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.current().is_connected()
    }

    /// The connected wallet address.
    #[must_use]
    pub fn address(&self) -> Option<WalletAddress> {
        match self.current() {
            Identity::Connected(address) => Some(address),
            Identity::Disconnected => None,
        }
    }

    /// Whether the wallet changed since the last `changed` or `mark_seen`.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Mark the current wallet state as seen and return it.
    pub fn mark_seen(&mut self) -> Identity {
        Identity::from(&*self.rx.borrow_and_update())
    }

    /// Wait for the wallet to publish a new state.
    ///
    /// Returns `None` once the adapter is gone.
    pub async fn changed(&mut self) -> Option<Identity> {
        self.rx.changed().await.ok()?;
        Some(self.mark_seen())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disconnected() {
        let adapter = WalletAdapter::new();
        let resolver = adapter.resolver();
        assert_eq!(resolver.current(), Identity::Disconnected);
        assert!(!resolver.connected());
        assert!(resolver.address().is_none());
    }

    #[test]
    fn test_connected_requires_key() {
        let adapter = WalletAdapter::new();
        let resolver = adapter.resolver();

        adapter.publish(WalletConnection {
            connected: true,
            public_key: None,
        });
        assert_eq!(resolver.current(), Identity::Disconnected);

        adapter.connect(WalletPublicKey::from([1u8; 32]));
        let expected = WalletPublicKey::from([1u8; 32]).to_address().unwrap();
        assert_eq!(resolver.address(), Some(expected));
    }

    #[test]
    fn test_malformed_key_is_disconnected() {
        let adapter = WalletAdapter::new();
        adapter.connect(WalletPublicKey::from(vec![1u8, 2, 3]));
        assert_eq!(adapter.resolver().current(), Identity::Disconnected);
    }

    #[tokio::test]
    async fn test_changed_follows_adapter() {
        let adapter = WalletAdapter::new();
        let mut resolver = adapter.resolver();

        adapter.connect(WalletPublicKey::from([2u8; 32]));
        assert!(resolver.changed().await.unwrap().is_connected());

        adapter.disconnect();
        assert_eq!(resolver.changed().await, Some(Identity::Disconnected));

        drop(adapter);
        assert_eq!(resolver.changed().await, None);
    }

    #[test]
    fn test_republishing_same_state_is_silent() {
        let adapter = WalletAdapter::new();
        let mut resolver = adapter.resolver();
        adapter.connect(WalletPublicKey::from([3u8; 32]));
        resolver.mark_seen();

        adapter.connect(WalletPublicKey::from([3u8; 32]));
        assert!(!resolver.has_changed());
    }
}
