//! # sealbet-engine
//!
//! **Market engine**: the sealed-bid lifecycle on top of the ledger store.
//!
//! ## Architecture
//!
//! The engine owns the [`LedgerStore`](sealbet_ledger::LedgerStore) and the
//! participant balances, and exposes five operations:
//! 1. `create_market`: open a market and its empty vault
//! 2. `commit_bet`: escrow a stake behind a sealed hash
//! 3. `reveal_bet`: open the hash after the deadline
//! 4. `resolve_market`: record the outcome, exactly once
//! 5. `claim_winnings`: pay a revealed winner out of the vault
//!
//! ## Lifecycle
//!
//! - **Open**: before the deadline, commits only
//! - **Revealing**: after the deadline, reveals until the reveal deadline
//! - **Resolved**: outcome fixed, claims only
//!
//! Status is projected from the clock on every call. Each operation checks
//! everything before it writes anything.

pub mod engine;
pub mod lifecycle;
pub mod payout;

pub use engine::MarketEngine;
pub use lifecycle::{effective_status, reveal_window_open};
pub use payout::payout;
