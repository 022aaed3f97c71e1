//! Market lifecycle: status projection and per-operation admissibility.
//!
//! ```text
//!   ┌──────┐  now >= deadline   ┌───────────┐  resolve (once)  ┌──────────┐
//!   │ OPEN ├───────────────────▶│ REVEALING ├─────────────────▶│ RESOLVED │
//!   └──────┘                    └───────────┘                  └──────────┘
//!   commit                      reveal while now < reveal_deadline
//!                               resolve any time                claim
//! ```
//!
//! Status is never stored. It is a pure function of the market record and
//! the caller-supplied clock, so there is nothing a scheduler has to flip
//! and nothing that can go stale. After the reveal deadline an unresolved
//! market still projects to `Revealing`: reveals are rejected, resolution
//! is still allowed.

use chrono::{DateTime, Duration, Utc};
use sealbet_types::{Market, MarketStatus, Outcome, Result, SealbetError};

/// Effective status of `market` at `now`.
#[must_use]
pub fn effective_status(market: &Market, now: DateTime<Utc>) -> MarketStatus {
    if market.is_resolved() {
        MarketStatus::Resolved
    } else if market.deadline_passed(now) {
        MarketStatus::Revealing
    } else {
        MarketStatus::Open
    }
}

/// Whether a reveal submitted at `now` would be inside the window.
#[must_use]
pub fn reveal_window_open(market: &Market, now: DateTime<Utc>) -> bool {
    !market.is_resolved() && market.deadline_passed(now) && !market.reveal_deadline_passed(now)
}

/// Resolve an optional reveal period into a concrete reveal deadline.
///
/// Absent or non-positive periods fall back to `default_period`.
///
/// # Errors
/// `Overflow` if the deadline is too far in the future to represent.
pub fn reveal_deadline_for(
    deadline: DateTime<Utc>,
    reveal_period: Option<Duration>,
    default_period: Duration,
) -> Result<DateTime<Utc>> {
    let period = match reveal_period {
        Some(p) if p > Duration::zero() => p,
        _ => default_period,
    };
    deadline
        .checked_add_signed(period)
        .ok_or(SealbetError::Overflow)
}

/// Commits are only admissible while `Open` (strictly before the deadline).
///
/// # Errors
/// `MarketClosed` at or after the deadline, or once resolved.
pub fn ensure_can_commit(market: &Market, now: DateTime<Utc>) -> Result<()> {
    match effective_status(market, now) {
        MarketStatus::Open => Ok(()),
        MarketStatus::Revealing | MarketStatus::Resolved => Err(SealbetError::MarketClosed),
    }
}

/// # Errors
/// `MarketAlreadyResolved` if an outcome is already set.
pub fn ensure_not_resolved(market: &Market) -> Result<()> {
    if market.is_resolved() {
        return Err(SealbetError::MarketAlreadyResolved);
    }
    Ok(())
}

/// Reveals are admissible for `deadline <= now < reveal_deadline`.
///
/// # Errors
/// `DeadlineNotReached` before the deadline, `RevealWindowClosed` at or
/// after the reveal deadline.
pub fn ensure_reveal_window(market: &Market, now: DateTime<Utc>) -> Result<()> {
    if !market.deadline_passed(now) {
        return Err(SealbetError::DeadlineNotReached);
    }
    if market.reveal_deadline_passed(now) {
        return Err(SealbetError::RevealWindowClosed);
    }
    Ok(())
}

/// Resolution is admissible once, at or after the deadline.
///
/// # Errors
/// `MarketAlreadyResolved` or `DeadlineNotReached`.
pub fn ensure_can_resolve(market: &Market, now: DateTime<Utc>) -> Result<()> {
    ensure_not_resolved(market)?;
    if !market.deadline_passed(now) {
        return Err(SealbetError::DeadlineNotReached);
    }
    Ok(())
}

/// Claims are admissible only after resolution. Returns the winning side.
///
/// # Errors
/// `MarketNotResolved`.
pub fn ensure_resolved(market: &Market) -> Result<Outcome> {
    market.outcome.ok_or(SealbetError::MarketNotResolved)
}
