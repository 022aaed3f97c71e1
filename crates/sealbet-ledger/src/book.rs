//! Per-market book: one market, its vault, and its commitments.
//!
//! Each market is an independent shard. Commitments are keyed by their
//! derived address, so "does this user already have a commitment here" is
//! a single lookup, and there is no separate index to keep in sync.

use std::collections::HashMap;

use sealbet_types::{
    Address, Commitment, Identity, Market, Outcome, Result, SealbetError, Vault, address,
};

/// All records belonging to one market.
#[derive(Debug)]
pub struct MarketBook {
    market: Market,
    vault: Vault,
    commitments: HashMap<Address, Commitment>,
}

impl MarketBook {
    /// Open a book for a freshly created market with an empty vault.
    #[must_use]
    pub fn new(market: Market) -> Self {
        let vault = Vault::new(address::vault_address(&market.address), market.address);
        Self {
            market,
            vault,
            commitments: HashMap::new(),
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.market.address
    }

    #[must_use]
    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn market_mut(&mut self) -> &mut Market {
        &mut self.market
    }

    #[must_use]
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut Vault {
        &mut self.vault
    }

    /// Address `user`'s commitment on this market has (or would have).
    #[must_use]
    pub fn commitment_address(&self, user: &Identity) -> Address {
        address::commitment_address(&self.market.address, user)
    }

    #[must_use]
    pub fn commitment(&self, user: &Identity) -> Option<&Commitment> {
        self.commitments.get(&self.commitment_address(user))
    }

    pub fn commitment_mut(&mut self, user: &Identity) -> Option<&mut Commitment> {
        let key = self.commitment_address(user);
        self.commitments.get_mut(&key)
    }

    /// # Errors
    /// `CommitmentAlreadyExists` if `user` has already committed here.
    pub fn ensure_no_commitment(&self, user: &Identity) -> Result<()> {
        let key = self.commitment_address(user);
        if self.commitments.contains_key(&key) {
            return Err(SealbetError::CommitmentAlreadyExists(key));
        }
        Ok(())
    }

    /// Store a new commitment. Never overwrites.
    ///
    /// # Errors
    /// `CommitmentAlreadyExists` if one is already stored at its address.
    pub fn insert_commitment(&mut self, commitment: Commitment) -> Result<()> {
        if self.commitments.contains_key(&commitment.address) {
            return Err(SealbetError::CommitmentAlreadyExists(commitment.address));
        }
        self.commitments.insert(commitment.address, commitment);
        Ok(())
    }

    /// Check every accounting invariant of this market.
    ///
    /// ```text
    /// total_pool == Σ commitment.amount
    /// yes_pool   == Σ amount of commitments revealed YES   (same for NO)
    /// yes_count  == # commitments revealed YES             (same for NO)
    /// vault.balance == total_pool - vault.disbursed
    /// vault.disbursed == Σ commitment.paid_out
    /// ```
    ///
    /// # Errors
    /// `SupplyInvariantViolation` naming the first broken invariant.
    pub fn verify_invariants(&self) -> Result<()> {
        let mut total: u128 = 0;
        let mut revealed = [0u128; 2];
        let mut counts = [0u64; 2];
        let mut paid: u128 = 0;
        for c in self.commitments.values() {
            total += u128::from(c.amount);
            paid += u128::from(c.paid_out);
            if let Some(outcome) = c.revealed_outcome {
                let side = usize::from(outcome == Outcome::Yes);
                revealed[side] += u128::from(c.amount);
                counts[side] += 1;
            }
        }

        let m = &self.market;
        let checks = [
            (total == u128::from(m.total_pool), "total_pool != sum of stakes"),
            (revealed[1] == u128::from(m.yes_pool), "yes_pool != sum of YES reveals"),
            (revealed[0] == u128::from(m.no_pool), "no_pool != sum of NO reveals"),
            (counts[1] == u64::from(m.yes_count), "yes_count != number of YES reveals"),
            (counts[0] == u64::from(m.no_count), "no_count != number of NO reveals"),
            (
                u128::from(self.vault.balance) + u128::from(self.vault.disbursed)
                    == u128::from(m.total_pool),
                "vault balance != total_pool - disbursed",
            ),
            (paid == u128::from(self.vault.disbursed), "disbursed != sum of payouts"),
        ];
        if let Some((_, reason)) = checks.iter().find(|(ok, _)| !ok) {
            return Err(SealbetError::SupplyInvariantViolation {
                reason: format!("market {}: {reason}", m.address.short()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sealbet_types::{MarketId, Salt, compute_commitment_hash};

    use super::*;

    fn make_book() -> MarketBook {
        let creator = Identity::random();
        let now = Utc::now();
        let market = Market {
            address: address::market_address(&creator, MarketId(1)),
            creator,
            oracle: creator,
            market_id: MarketId(1),
            question: "Q?".into(),
            deadline: now + Duration::hours(1),
            reveal_deadline: now + Duration::hours(25),
            total_pool: 0,
            yes_pool: 0,
            no_pool: 0,
            yes_count: 0,
            no_count: 0,
            outcome: None,
            resolved_at: None,
            created_at: now,
        };
        MarketBook::new(market)
    }

    fn make_commitment(book: &MarketBook, user: Identity, amount: u64) -> Commitment {
        let hash = compute_commitment_hash(amount, Outcome::Yes, &Salt([1; 32]));
        Commitment::new(
            book.commitment_address(&user),
            book.address(),
            user,
            amount,
            hash,
            Utc::now(),
        )
    }

    #[test]
    fn new_book_has_derived_vault() {
        let book = make_book();
        assert_eq!(book.vault().market, book.address());
        assert_eq!(book.vault().address, address::vault_address(&book.address()));
        assert!(book.commitment(&Identity([3; 32])).is_none());
        book.verify_invariants().unwrap();
    }

    #[test]
    fn insert_and_lookup_by_user() {
        let mut book = make_book();
        let user = Identity::random();
        let c = make_commitment(&book, user, 5);
        book.insert_commitment(c).unwrap();

        assert_eq!(book.commitment(&user).unwrap().amount, 5);
        assert!(book.commitment(&Identity::random()).is_none());
    }

    #[test]
    fn duplicate_commitment_rejected() {
        let mut book = make_book();
        let user = Identity::random();
        book.insert_commitment(make_commitment(&book, user, 5)).unwrap();

        let err = book.ensure_no_commitment(&user).unwrap_err();
        assert!(matches!(err, SealbetError::CommitmentAlreadyExists(_)));

        let err = book
            .insert_commitment(make_commitment(&book, user, 9))
            .unwrap_err();
        assert!(matches!(err, SealbetError::CommitmentAlreadyExists(_)));
        // Original record untouched
        assert_eq!(book.commitment(&user).unwrap().amount, 5);
    }

    #[test]
    fn invariants_detect_unbacked_pool() {
        let mut book = make_book();
        book.market_mut().total_pool = 10;
        let err = book.verify_invariants().unwrap_err();
        assert!(matches!(err, SealbetError::SupplyInvariantViolation { .. }));
    }

    #[test]
    fn invariants_hold_for_consistent_records() {
        let mut book = make_book();
        let user = Identity::random();
        let mut c = make_commitment(&book, user, 7);
        c.record_reveal(Outcome::Yes, Salt([1; 32]), Utc::now());
        book.insert_commitment(c).unwrap();
        let m = book.market_mut();
        m.total_pool = 7;
        m.yes_pool = 7;
        m.yes_count = 1;
        book.vault_mut().balance = 7;
        book.verify_invariants().unwrap();
    }
}
