//! Supply conservation invariant checker.
//!
//! Commits and claims only move funds between participants and vaults, so:
//! ```text
//! Σ(participant balances) + Σ(vault balances) == Σ(deposits) - Σ(withdrawals)
//! ```
//!
//! If this ever breaks, some operation created or destroyed funds.

use sealbet_types::{Result, SealbetError};

/// Tracks external inflows and outflows of funds.
pub struct SupplyConservation {
    deposits: u128,
    withdrawals: u128,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            deposits: 0,
            withdrawals: 0,
        }
    }

    pub fn record_deposit(&mut self, amount: u64) {
        self.deposits += u128::from(amount);
    }

    pub fn record_withdrawal(&mut self, amount: u64) {
        self.withdrawals += u128::from(amount);
    }

    /// Deposits minus withdrawals.
    #[must_use]
    pub fn expected_supply(&self) -> u128 {
        self.deposits.saturating_sub(self.withdrawals)
    }

    /// Compare the actual supply against the expected supply.
    ///
    /// # Errors
    /// Returns [`SealbetError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_supply: u128) -> Result<()> {
        let expected = self.expected_supply();
        if actual_supply != expected {
            return Err(SealbetError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != expected {expected} \
                     (deposits={}, withdrawals={})",
                    self.deposits, self.withdrawals
                ),
            });
        }
        Ok(())
    }
}

impl Default for SupplyConservation {
    fn default() -> Self {
        Self::new()
    }
}
