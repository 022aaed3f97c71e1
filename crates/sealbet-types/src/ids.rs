//! Identifiers used throughout SealBet.
//!
//! Participants are identified by their ed25519 public key. Records are
//! keyed by an [`Address`] computed from stable seeds (see [`crate::address`]),
//! never by a sequence number or a registry entry.

use std::fmt;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// An authenticated caller: creator, oracle, or bettor.
///
/// The raw ed25519 public key (32 bytes). The engine trusts that whoever
/// hands it an `Identity` has already verified the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Identity(pub [u8; 32]);

impl Identity {
    /// Identity of the holder of an ed25519 verifying key.
    #[must_use]
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{}", hex::encode(&self.0[..8]))
    }
}

/// Random identities for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Identity {
    pub fn random() -> Self {
        Self(rand::random::<[u8; 32]>())
    }
}

// ---------------------------------------------------------------------------
// MarketId
// ---------------------------------------------------------------------------

/// Creator-chosen market number. Unique only together with the creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MarketId(pub u64);

impl MarketId {
    #[must_use]
    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "market#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Derived 32-byte key of a market, vault, or commitment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ed25519_dalek::SigningKey;

    use super::*;

    #[test]
    fn identity_from_verifying_key() {
        let signing = SigningKey::from_bytes(&[7u8; 32]);
        let verifying = signing.verifying_key();
        let id = Identity::from_verifying_key(&verifying);
        assert_eq!(id.as_bytes(), verifying.as_bytes());
    }

    #[test]
    fn random_identities_differ() {
        assert_ne!(Identity::random(), Identity::random());
    }

    #[test]
    fn identity_display_is_prefixed_hex() {
        let id = Identity([0xab; 32]);
        assert_eq!(format!("{id}"), "id:abababababababab");
        assert_eq!(id.short(), "abababab");
    }

    #[test]
    fn market_id_le_bytes() {
        assert_eq!(MarketId(1).to_le_bytes(), [1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn address_display_is_full_hex() {
        let addr = Address([0x01; 32]);
        assert_eq!(format!("{addr}").len(), 64);
        assert_eq!(addr.to_hex(), format!("{addr}"));
    }

    #[test]
    fn serde_roundtrips() {
        let id = Identity::random();
        let json = serde_json::to_string(&id).unwrap();
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);

        let mid = MarketId(42);
        let json = serde_json::to_string(&mid).unwrap();
        let back: MarketId = serde_json::from_str(&json).unwrap();
        assert_eq!(mid, back);
    }
}
