//! Inputs to the public engine operations.

use chrono::{DateTime, Duration, Utc};

use crate::{CommitmentHash, Identity, MarketId, Salt};

/// Parameters for opening a market.
#[derive(Debug, Clone)]
pub struct CreateMarketParams {
    pub market_id: MarketId,
    pub question: String,
    pub deadline: DateTime<Utc>,
    /// Length of the reveal window. `None` (or a non-positive length)
    /// falls back to the configured default.
    pub reveal_period: Option<Duration>,
    pub oracle: Identity,
}

/// Parameters for a sealed commit.
#[derive(Debug, Clone, Copy)]
pub struct CommitBetParams {
    pub amount: u64,
    pub commitment_hash: CommitmentHash,
}

/// Parameters for opening a commitment. The amount is not an input: the
/// stored stake is always the one hashed.
#[derive(Debug, Clone, Copy)]
pub struct RevealBetParams {
    /// Raw outcome byte; anything but 0 or 1 is rejected.
    pub outcome: u8,
    pub salt: Salt,
}

/// Parameters for resolving a market.
#[derive(Debug, Clone, Copy)]
pub struct ResolveMarketParams {
    /// Raw outcome byte; anything but 0 or 1 is rejected.
    pub outcome: u8,
}
