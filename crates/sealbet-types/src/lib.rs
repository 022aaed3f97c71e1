//! # sealbet-types
//!
//! Shared types, errors, and configuration for the **SealBet** sealed-bid
//! prediction-market ledger.
//!
//! This crate is the leaf dependency of the workspace. Every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Identity`], [`MarketId`], [`Address`]
//! - **Addressing**: [`address::market_address`], [`address::vault_address`],
//!   [`address::commitment_address`]
//! - **Commitment codec**: [`compute_commitment_hash`], [`verify_commitment_hash`],
//!   [`Salt`], [`CommitmentHash`]
//! - **Records**: [`Market`], [`Commitment`], [`Vault`], [`Outcome`], [`MarketStatus`]
//! - **Operation inputs**: [`CreateMarketParams`], [`CommitBetParams`],
//!   [`RevealBetParams`], [`ResolveMarketParams`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`SealbetError`] with `SB_ERR_` prefix codes
//! - **Constants**: limits, defaults and address seeds

pub mod address;
pub mod commitment;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod market;
pub mod params;
pub mod vault;

pub use address::AddressTag;
pub use commitment::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use market::*;
pub use params::*;
pub use vault::*;

// Constants are accessed via `sealbet_types::constants::FOO` and address
// helpers via `sealbet_types::address::*` (not re-exported).
