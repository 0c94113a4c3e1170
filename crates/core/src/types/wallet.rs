//! Wallet identity types.
//!
//! The wallet adapter hands out a raw public key; merchants are keyed by its
//! base58 rendering.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`WalletAddress`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletAddressError {
    /// The input is empty.
    #[error("wallet address cannot be empty")]
    Empty,
    /// The input is not valid base58.
    #[error("wallet address is not valid base58")]
    InvalidBase58,
    /// The decoded key has the wrong length.
    #[error("wallet address must decode to {expected} bytes (got {actual})")]
    WrongLength {
        /// Required key length.
        expected: usize,
        /// Decoded key length.
        actual: usize,
    },
}

/// Raw public key bytes as produced by the wallet adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletPublicKey(Vec<u8>);

impl WalletPublicKey {
    /// Create a public key from raw bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the key as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render the key as a base58 wallet address.
    ///
    /// # Errors
    ///
    /// Returns [`WalletAddressError::WrongLength`] if the key is not
    /// [`WalletAddress::KEY_LENGTH`] bytes long.
    pub fn to_address(&self) -> Result<WalletAddress, WalletAddressError> {
        if self.0.len() != WalletAddress::KEY_LENGTH {
            return Err(WalletAddressError::WrongLength {
                expected: WalletAddress::KEY_LENGTH,
                actual: self.0.len(),
            });
        }
        Ok(WalletAddress(bs58::encode(&self.0).into_string()))
    }
}

impl AsRef<[u8]> for WalletPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for WalletPublicKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<[u8; WalletAddress::KEY_LENGTH]> for WalletPublicKey {
    fn from(bytes: [u8; WalletAddress::KEY_LENGTH]) -> Self {
        Self(bytes.to_vec())
    }
}

/// A merchant's identity: the base58 address of their wallet.
///
/// ```
/// use itiza_core::{WalletAddress, WalletPublicKey};
///
/// let key = WalletPublicKey::from([7u8; 32]);
/// let address = key.to_address().unwrap();
/// assert_eq!(WalletAddress::parse(address.as_str()).unwrap(), address);
/// assert!(WalletAddress::parse("").is_err());
/// assert!(WalletAddress::parse("0OIl").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Length in bytes of a wallet public key.
    pub const KEY_LENGTH: usize = 32;

    /// Parse a wallet address from base58 text.
    ///
    /// # Errors
    ///
    /// Returns a [`WalletAddressError`] if the input is empty, not base58, or
    /// does not decode to a 32-byte key.
    pub fn parse(s: &str) -> Result<Self, WalletAddressError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(WalletAddressError::Empty);
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| WalletAddressError::InvalidBase58)?;
        if bytes.len() != Self::KEY_LENGTH {
            return Err(WalletAddressError::WrongLength {
                expected: Self::KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the address back into the wallet's public key.
    ///
    /// # Errors
    ///
    /// Returns [`WalletAddressError::InvalidBase58`] if the address text is
    /// not base58.
    pub fn public_key(&self) -> Result<WalletPublicKey, WalletAddressError> {
        bs58::decode(&self.0)
            .into_vec()
            .map(WalletPublicKey)
            .map_err(|_| WalletAddressError::InvalidBase58)
    }

    /// Shortened form for logs and headings, e.g. `7Np4…x2Qa`.
    #[must_use]
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return self.0.clone();
        }
        let head: String = chars.iter().take(4).collect();
        let tail: String = chars.iter().skip(chars.len() - 4).collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for WalletAddress {
    type Err = WalletAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = WalletAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
