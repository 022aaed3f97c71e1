//! Deterministic record addressing.
//!
//! Every market, vault and commitment lives at an [`Address`] computed from
//! a namespace tag and its parent identifiers:
//!
//! ```text
//! market     = H(domain || len(tag) || "market"     || creator || market_id_le)
//! vault      = H(domain || len(tag) || "vault"      || market)
//! commitment = H(domain || len(tag) || "commitment" || market  || user)
//! ```
//!
//! Related records are found by recomputing their address, so there is no
//! central index of "commitments for a market" and the existence check for
//! a (market, user) pair is a single map lookup.

use sha2::{Digest, Sha256};

use crate::{
    Address, Identity, MarketId,
    constants::{ADDRESS_DOMAIN, COMMITMENT_SEED, MARKET_SEED, VAULT_SEED},
};

/// Namespace a derived address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressTag {
    Market,
    Vault,
    Commitment,
}

impl AddressTag {
    #[must_use]
    pub fn seed(self) -> &'static [u8] {
        match self {
            Self::Market => MARKET_SEED,
            Self::Vault => VAULT_SEED,
            Self::Commitment => COMMITMENT_SEED,
        }
    }
}

impl std::fmt::Display for AddressTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Vault => write!(f, "VAULT"),
            Self::Commitment => write!(f, "COMMITMENT"),
        }
    }
}

/// Hash a tag and its fixed-width parts into an address.
///
/// The tag is length-prefixed so no (tag, parts) pair can collide with a
/// different tag whose seed is a prefix of another's.
#[must_use]
pub fn derive(tag: AddressTag, parts: &[&[u8]]) -> Address {
    let seed = tag.seed();
    let mut hasher = Sha256::new();
    // Seeds are short constants; the length always fits a byte.
    #[allow(clippy::cast_possible_truncation)]
    let seed_len = seed.len() as u8;
    hasher.update(ADDRESS_DOMAIN);
    hasher.update([seed_len]);
    hasher.update(seed);
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    Address(out)
}

/// Address of the market `market_id` opened by `creator`.
#[must_use]
pub fn market_address(creator: &Identity, market_id: MarketId) -> Address {
    derive(
        AddressTag::Market,
        &[creator.as_bytes(), &market_id.to_le_bytes()],
    )
}

/// Address of the vault escrowing a market's stakes.
#[must_use]
pub fn vault_address(market: &Address) -> Address {
    derive(AddressTag::Vault, &[market.as_bytes()])
}

/// Address of `user`'s commitment on `market`.
#[must_use]
pub fn commitment_address(market: &Address, user: &Identity) -> Address {
    derive(
        AddressTag::Commitment,
        &[market.as_bytes(), user.as_bytes()],
    )
}
