//! # sealbet-ledger
//!
//! **Ledger store**: market books, participant balances, vault custody,
//! and the supply-conservation safety net.
//!
//! ## Architecture
//!
//! 1. **LedgerStore**: arena of market books keyed by derived address
//! 2. **MarketBook**: one market, its vault, and its commitments
//! 3. **BalanceManager**: available funds per participant
//! 4. **escrow**: stake → vault at commit, vault → winner at claim
//! 5. **SupplyConservation**: wallets + vaults == deposits − withdrawals
//!
//! The ledger enforces per-record invariants and uniqueness. It does not
//! know about deadlines or outcomes; that is the engine's job.

pub mod balance_manager;
pub mod book;
pub mod escrow;
pub mod store;
pub mod supply_conservation;

pub use balance_manager::BalanceManager;
pub use book::MarketBook;
pub use escrow::{disburse_payout, escrow_stake};
pub use store::{BookHandle, LedgerStore, lock_book};
pub use supply_conservation::SupplyConservation;
