//! # Commitment: the sealed stake
//!
//! A bettor escrows an amount together with a 32-byte digest that binds the
//! amount, the chosen outcome and a secret salt. The outcome stays hidden
//! until the reveal window, when the bettor presents `(outcome, salt)` and
//! the ledger recomputes the digest from the **stored** amount.
//!
//! ## Preimage layout (wire contract)
//!
//! ```text
//!   0        8   9                          41
//!   ┌────────┬───┬───────────────────────────┐
//!   │ amount │ o │           salt            │
//!   │ u64 LE │ u8│         32 bytes          │
//!   └────────┴───┴───────────────────────────┘
//!   digest = SHA-256(preimage)
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//!   ┌───────────┐  reveal   ┌──────────┐  claim (winner)  ┌─────────┐
//!   │ COMMITTED ├──────────▶│ REVEALED ├─────────────────▶│ CLAIMED │
//!   └───────────┘           └──────────┘                  └─────────┘
//! ```
//!
//! Unrevealed and losing commitments stay where they are: their stake is
//! forfeit to the vault.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, Identity, Outcome, constants::COMMITMENT_PREIMAGE_LEN};

// ---------------------------------------------------------------------------
// Salt / CommitmentHash
// ---------------------------------------------------------------------------

/// The bettor's secret blinding value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Salt(pub [u8; 32]);

impl Salt {
    /// Fresh random salt for a client preparing a commitment.
    #[must_use]
    pub fn generate() -> Self {
        Self(rand::random::<[u8; 32]>())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// SHA-256 digest stored at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitmentHash(pub [u8; 32]);

impl CommitmentHash {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CommitmentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// The exact 41 bytes hashed for a commitment.
#[must_use]
pub fn commitment_preimage(
    amount: u64,
    outcome: Outcome,
    salt: &Salt,
) -> [u8; COMMITMENT_PREIMAGE_LEN] {
    let mut preimage = [0u8; COMMITMENT_PREIMAGE_LEN];
    preimage[..8].copy_from_slice(&amount.to_le_bytes());
    preimage[8] = outcome.as_byte();
    preimage[9..].copy_from_slice(salt.as_bytes());
    preimage
}

/// Compute the commitment digest. Pure and deterministic.
#[must_use]
pub fn compute_commitment_hash(amount: u64, outcome: Outcome, salt: &Salt) -> CommitmentHash {
    let digest = Sha256::digest(commitment_preimage(amount, outcome, salt));
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    CommitmentHash(hash)
}

/// Recompute the digest and compare it with `expected`.
///
/// The comparison folds over every byte instead of stopping at the first
/// difference.
#[must_use]
pub fn verify_commitment_hash(
    expected: &CommitmentHash,
    amount: u64,
    outcome: Outcome,
    salt: &Salt,
) -> bool {
    let actual = compute_commitment_hash(amount, outcome, salt);
    actual
        .0
        .iter()
        .zip(expected.0.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

// ---------------------------------------------------------------------------
// Commitment record
// ---------------------------------------------------------------------------

/// One bettor's sealed stake on one market. At most one per (market, user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Derived address of this record.
    pub address: Address,
    /// The owning market.
    pub market: Address,
    /// The bettor.
    pub user: Identity,
    /// Escrowed stake. Always > 0, fixed at commit time.
    pub amount: u64,
    /// Digest over (amount, outcome, salt). Immutable.
    pub commitment_hash: CommitmentHash,
    /// Set once, only after a matching reveal.
    pub revealed_outcome: Option<Outcome>,
    /// The salt presented at reveal.
    pub revealed_salt: Option<Salt>,
    pub is_revealed: bool,
    pub is_claimed: bool,
    /// Units paid out by the claim. Zero until claimed.
    pub paid_out: u64,
    pub committed_at: DateTime<Utc>,
    pub revealed_at: Option<DateTime<Utc>>,
}

impl Commitment {
    /// A fresh, unrevealed commitment.
    #[must_use]
    pub fn new(
        address: Address,
        market: Address,
        user: Identity,
        amount: u64,
        commitment_hash: CommitmentHash,
        committed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            address,
            market,
            user,
            amount,
            commitment_hash,
            revealed_outcome: None,
            revealed_salt: None,
            is_revealed: false,
            is_claimed: false,
            paid_out: 0,
            committed_at,
            revealed_at: None,
        }
    }

    /// Whether `(outcome, salt)` opens this commitment, using the stored amount.
    #[must_use]
    pub fn opens_with(&self, outcome: Outcome, salt: &Salt) -> bool {
        verify_commitment_hash(&self.commitment_hash, self.amount, outcome, salt)
    }

    /// Record a verified reveal.
    pub fn record_reveal(&mut self, outcome: Outcome, salt: Salt, now: DateTime<Utc>) {
        self.revealed_outcome = Some(outcome);
        self.revealed_salt = Some(salt);
        self.is_revealed = true;
        self.revealed_at = Some(now);
    }

    /// Record a successful claim of `payout` units.
    pub fn record_claim(&mut self, payout: u64) {
        self.is_claimed = true;
        self.paid_out = payout;
    }

    /// Whether this commitment backed `outcome`.
    #[must_use]
    pub fn won(&self, outcome: Outcome) -> bool {
        self.revealed_outcome == Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salt(byte: u8) -> Salt {
        Salt([byte; 32])
    }

    fn stake_of_ten(hash: CommitmentHash, now: DateTime<Utc>) -> Commitment {
        Commitment::new(
            Address([0; 32]),
            Address([1; 32]),
            Identity([2; 32]),
            10,
            hash,
            now,
        )
    }

    #[test]
    fn preimage_layout() {
        let preimage = commitment_preimage(0x0102, Outcome::Yes, &salt(0xee));
        assert_eq!(&preimage[..8], &[0x02, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(preimage[8], 1);
        assert!(preimage[9..].iter().all(|b| *b == 0xee));
    }

    #[test]
    fn hash_matches_plain_sha256_of_preimage() {
        let mut data = Vec::new();
        data.extend_from_slice(&1_000_000_000u64.to_le_bytes());
        data.push(0);
        data.extend_from_slice(&[3u8; 32]);
        let expected = Sha256::digest(&data);
        let hash = compute_commitment_hash(1_000_000_000, Outcome::No, &salt(3));
        assert_eq!(&hash.0[..], &expected[..]);
    }

    #[test]
    fn verify_accepts_own_hash() {
        let s = Salt::generate();
        let h = compute_commitment_hash(500, Outcome::Yes, &s);
        assert!(verify_commitment_hash(&h, 500, Outcome::Yes, &s));
    }

    #[test]
    fn verify_rejects_single_bit_flips() {
        let s = salt(0x5a);
        let h = compute_commitment_hash(1_000, Outcome::Yes, &s);

        for bit in 0..64 {
            let amount = 1_000u64 ^ (1 << bit);
            assert!(!verify_commitment_hash(&h, amount, Outcome::Yes, &s), "amount bit {bit}");
        }
        assert!(!verify_commitment_hash(&h, 1_000, Outcome::No, &s));
        for byte in 0..32 {
            for bit in 0..8 {
                let mut flipped = s;
                flipped.0[byte] ^= 1 << bit;
                assert!(
                    !verify_commitment_hash(&h, 1_000, Outcome::Yes, &flipped),
                    "salt byte {byte} bit {bit}"
                );
            }
        }
    }

    #[test]
    fn generated_salts_differ() {
        assert_ne!(Salt::generate(), Salt::generate());
    }

    #[test]
    fn record_reveal_sets_fields_once() {
        let s = salt(1);
        let h = compute_commitment_hash(10, Outcome::No, &s);
        let now = Utc::now();
        let mut c = stake_of_ten(h, now);
        assert!(c.opens_with(Outcome::No, &s));
        assert!(!c.opens_with(Outcome::Yes, &s));

        c.record_reveal(Outcome::No, s, now);
        assert!(c.is_revealed);
        assert!(c.won(Outcome::No));
        assert!(!c.won(Outcome::Yes));
        assert_eq!(c.revealed_salt, Some(s));
        assert_eq!(c.revealed_at, Some(now));
    }

    #[test]
    fn record_claim_marks_paid() {
        let h = compute_commitment_hash(10, Outcome::Yes, &salt(1));
        let mut c = stake_of_ten(h, Utc::now());
        c.record_claim(25);
        assert!(c.is_claimed);
        assert_eq!(c.paid_out, 25);
    }

    #[test]
    fn unrevealed_never_wins() {
        let h = compute_commitment_hash(10, Outcome::Yes, &salt(1));
        let c = stake_of_ten(h, Utc::now());
        assert!(!c.won(Outcome::Yes));
        assert!(!c.won(Outcome::No));
    }
}
