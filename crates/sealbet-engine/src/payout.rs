//! Pari-mutuel payout arithmetic.
//!
//! A winner gets their stake back plus a share of the losing pool
//! proportional to their share of the winning pool:
//!
//! ```text
//! payout(s, W, L) = s                      if W == 0 or L == 0
//!                 = s + floor(s * L / W)   otherwise
//! ```
//!
//! The product is taken in `u128` so it cannot overflow before the
//! division. Truncation leaves dust in the vault; the sum of all winner
//! payouts never exceeds `W + L`.

use sealbet_types::{Result, SealbetError};

/// Disbursement for a winning stake `stake`.
///
/// # Errors
/// `Overflow` if the result does not fit in `u64` (only possible when
/// `stake` exceeds `win_pool`, which never happens for a real winner).
pub fn payout(stake: u64, win_pool: u64, lose_pool: u64) -> Result<u64> {
    if win_pool == 0 || lose_pool == 0 {
        return Ok(stake);
    }
    let share = u128::from(stake) * u128::from(lose_pool) / u128::from(win_pool);
    let total = u128::from(stake) + share;
    u64::try_from(total).map_err(|_| SealbetError::Overflow)
}
