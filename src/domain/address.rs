//! Chain-agnostic account / contract address.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 32-byte address identifying an account, a token contract, an NFT
/// collection, a bonding curve, a router or a pair.
///
/// All 32-byte sequences are valid addresses, so construction is
/// infallible.  The all-zero address is reserved as "unset".
///
/// # Examples
///
/// ```
/// use nft_amm::domain::Address;
///
/// let alice = Address::from_low_u64(1);
/// assert_eq!(alice.as_bytes()[31], 1);
/// assert!(!alice.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates an address whose last eight bytes hold `value` (big endian).
    ///
    /// Handy for fixtures: `from_low_u64(1)`, `from_low_u64(2)`, …
    #[must_use]
    pub const fn from_low_u64(value: u64) -> Self {
        let be = value.to_be_bytes();
        let mut bytes = [0u8; 32];
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Derives the address of a contract deployed by `deployer` with the
    /// given `nonce`: `sha256(deployer ‖ nonce_be)`.
    ///
    /// Distinct `(deployer, nonce)` pairs yield distinct addresses for all
    /// practical purposes.
    #[must_use]
    pub fn derive(deployer: &Self, nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(deployer.0);
        hasher.update(nonce.to_be_bytes());
        Self(hasher.finalize().into())
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns `true` for the all-zero address.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < 32 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_u64_layout() {
        let addr = Address::from_low_u64(0x0102);
        let bytes = addr.as_bytes();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert!(bytes[..24].iter().all(|b| *b == 0));
    }

    #[test]
    fn zero_detection() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_low_u64(1).is_zero());
    }

    #[test]
    fn derive_depends_on_nonce_and_deployer() {
        let factory = Address::from_low_u64(7);
        let a = Address::derive(&factory, 0);
        let b = Address::derive(&factory, 1);
        let c = Address::derive(&Address::from_low_u64(8), 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, Address::derive(&factory, 0));
    }

    #[test]
    fn display_is_prefixed_hex() {
        let shown = Address::from_low_u64(255).to_string();
        assert!(shown.starts_with("0x"));
        assert_eq!(shown.len(), 66);
        assert!(shown.ends_with("ff"));
    }
}
