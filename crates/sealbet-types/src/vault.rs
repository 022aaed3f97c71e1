//! Vault: per-market escrow of every staked unit.
//!
//! The vault only grows through commits and only shrinks through claims:
//! ```text
//! balance == total_pool - disbursed
//! ```

use serde::{Deserialize, Serialize};

use crate::Address;

/// Custody account owned by exactly one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    /// Derived from the market address.
    pub address: Address,
    /// The owning market.
    pub market: Address,
    /// Units currently held.
    pub balance: u64,
    /// Sum of all claim payouts made so far.
    pub disbursed: u64,
}

impl Vault {
    /// An empty vault for `market`.
    #[must_use]
    pub fn new(address: Address, market: Address) -> Self {
        Self {
            address,
            market,
            balance: 0,
            disbursed: 0,
        }
    }

    /// Total ever deposited into this vault.
    #[must_use]
    pub fn total_received(&self) -> u64 {
        self.balance.saturating_add(self.disbursed)
    }
}
