//! Market records.
//!
//! A market is one yes/no question with a commit deadline and a reveal
//! window. Its lifecycle status is **not** stored: it is projected from
//! the stored fields plus the caller's clock (see `sealbet-engine`'s
//! lifecycle module), so it cannot drift out of sync with elapsed time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Address, Identity, MarketId, SealbetError,
    constants::{OUTCOME_NO, OUTCOME_YES},
};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// One side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    No,
    Yes,
}

impl Outcome {
    /// The byte used in the commitment preimage.
    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::No => OUTCOME_NO,
            Self::Yes => OUTCOME_YES,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::No => Self::Yes,
            Self::Yes => Self::No,
        }
    }
}

impl TryFrom<u8> for Outcome {
    type Error = SealbetError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            OUTCOME_NO => Ok(Self::No),
            OUTCOME_YES => Ok(Self::Yes),
            other => Err(SealbetError::InvalidOutcome(other)),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::No => write!(f, "NO"),
            Self::Yes => write!(f, "YES"),
        }
    }
}

// ---------------------------------------------------------------------------
// MarketStatus
// ---------------------------------------------------------------------------

/// Effective lifecycle status of a market at some instant.
///
/// Transitions are monotonic: `Open → Revealing → Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketStatus {
    /// Before the deadline. Commits accepted.
    Open,
    /// Deadline passed, not yet resolved.
    Revealing,
    /// Outcome recorded. Terminal.
    Resolved,
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Revealing => write!(f, "REVEALING"),
            Self::Resolved => write!(f, "RESOLVED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

/// One question being wagered on.
///
/// Pools are in the smallest currency unit. `total_pool` counts every
/// escrowed stake; `yes_pool` / `no_pool` count only revealed ones, so
/// `yes_pool + no_pool <= total_pool` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Derived from (creator, market_id).
    pub address: Address,
    pub creator: Identity,
    /// Allowed to resolve alongside the creator. May equal the creator.
    pub oracle: Identity,
    pub market_id: MarketId,
    pub question: String,
    /// Commits rejected at or after this instant; reveals start here.
    pub deadline: DateTime<Utc>,
    /// Reveals rejected at or after this instant.
    pub reveal_deadline: DateTime<Utc>,
    pub total_pool: u64,
    pub yes_pool: u64,
    pub no_pool: u64,
    pub yes_count: u32,
    pub no_count: u32,
    /// Set exactly once by resolution.
    pub outcome: Option<Outcome>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Market {
    #[must_use]
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    #[must_use]
    pub fn reveal_deadline_passed(&self, now: DateTime<Utc>) -> bool {
        now >= self.reveal_deadline
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// Capability check: only the oracle or the creator may resolve.
    #[must_use]
    pub fn may_resolve(&self, caller: &Identity) -> bool {
        *caller == self.oracle || *caller == self.creator
    }

    /// Revealed pool for one side.
    #[must_use]
    pub fn pool_for(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Yes => self.yes_pool,
            Outcome::No => self.no_pool,
        }
    }

    /// `(winning pool, losing pool)` for a given winning side.
    #[must_use]
    pub fn pools_for_winner(&self, winner: Outcome) -> (u64, u64) {
        (self.pool_for(winner), self.pool_for(winner.opposite()))
    }

    /// Revealed commitment count for one side.
    #[must_use]
    pub fn count_for(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Yes => self.yes_count,
            Outcome::No => self.no_count,
        }
    }

    /// Stake escrowed but not (yet) revealed.
    #[must_use]
    pub fn unrevealed_pool(&self) -> u64 {
        self.total_pool
            .saturating_sub(self.yes_pool.saturating_add(self.no_pool))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn make_market() -> Market {
        let now = Utc::now();
        Market {
            address: Address([0; 32]),
            creator: Identity([1; 32]),
            oracle: Identity([2; 32]),
            market_id: MarketId(1),
            question: "Will it rain?".into(),
            deadline: now + Duration::hours(1),
            reveal_deadline: now + Duration::hours(25),
            total_pool: 10,
            yes_pool: 3,
            no_pool: 5,
            yes_count: 1,
            no_count: 2,
            outcome: None,
            resolved_at: None,
            created_at: now,
        }
    }

    #[test]
    fn outcome_from_byte() {
        assert_eq!(Outcome::try_from(0).unwrap(), Outcome::No);
        assert_eq!(Outcome::try_from(1).unwrap(), Outcome::Yes);
        let err = Outcome::try_from(2).unwrap_err();
        assert!(matches!(err, SealbetError::InvalidOutcome(2)));
    }

    #[test]
    fn outcome_byte_roundtrip() {
        for o in [Outcome::No, Outcome::Yes] {
            assert_eq!(Outcome::try_from(o.as_byte()).unwrap(), o);
            assert_eq!(o.opposite().opposite(), o);
        }
    }

    #[test]
    fn deadline_boundaries_inclusive() {
        let m = make_market();
        assert!(!m.deadline_passed(m.deadline - Duration::seconds(1)));
        assert!(m.deadline_passed(m.deadline));
        assert!(m.reveal_deadline_passed(m.reveal_deadline));
    }

    #[test]
    fn resolver_capability() {
        let m = make_market();
        assert!(m.may_resolve(&m.creator));
        assert!(m.may_resolve(&m.oracle));
        assert!(!m.may_resolve(&Identity([9; 32])));
    }

    #[test]
    fn pools_for_winner() {
        let m = make_market();
        assert_eq!(m.pools_for_winner(Outcome::Yes), (3, 5));
        assert_eq!(m.pools_for_winner(Outcome::No), (5, 3));
        assert_eq!(m.count_for(Outcome::No), 2);
        assert_eq!(m.unrevealed_pool(), 2);
    }

    #[test]
    fn status_display() {
        assert_eq!(format!("{}", MarketStatus::Revealing), "REVEALING");
        assert_eq!(format!("{}", Outcome::Yes), "YES");
    }

    #[test]
    fn serde_roundtrip() {
        let m = make_market();
        let json = serde_json::to_string(&m).unwrap();
        let back: Market = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
