//! Participant balance management.
//!
//! Tracks each identity's available funds outside any market. Commits debit
//! from here into a vault; claims credit back. All mutations are atomic:
//! either the full operation succeeds or the balance is unchanged.

use std::collections::HashMap;

use sealbet_types::{Identity, Result, SealbetError};

/// Per-identity available balances in the smallest currency unit.
pub struct BalanceManager {
    balances: HashMap<Identity, u64>,
}

impl BalanceManager {
    /// Create a new empty balance manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Deposit funds.
    ///
    /// # Errors
    /// Returns `Overflow` if the balance would exceed `u64::MAX`.
    pub fn deposit(&mut self, user: Identity, amount: u64) -> Result<()> {
        self.credit(user, amount)
    }

    /// Check that `user` can cover `amount` without changing anything.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if available < amount.
    pub fn ensure_available(&self, user: Identity, amount: u64) -> Result<()> {
        let available = self.balance(user);
        if available < amount {
            return Err(SealbetError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Remove funds from a user's balance (stake escrow or withdrawal).
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if available < amount.
    pub fn debit(&mut self, user: Identity, amount: u64) -> Result<()> {
        self.ensure_available(user, amount)?;
        if let Some(entry) = self.balances.get_mut(&user) {
            *entry -= amount;
        }
        Ok(())
    }

    /// Add funds to a user's balance (deposit or payout).
    ///
    /// # Errors
    /// Returns `Overflow` if the balance would exceed `u64::MAX`.
    pub fn credit(&mut self, user: Identity, amount: u64) -> Result<()> {
        let entry = self.balances.entry(user).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(SealbetError::Overflow)?;
        Ok(())
    }

    /// Available balance for `user` (zero if never seen).
    #[must_use]
    pub fn balance(&self, user: Identity) -> u64 {
        self.balances.get(&user).copied().unwrap_or(0)
    }

    /// Sum of every participant's balance.
    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|b| u128::from(*b)).sum()
    }
}

impl Default for BalanceManager {
    fn default() -> Self {
        Self::new()
    }
}
