//! System-wide constants for the SealBet ledger.

/// Maximum question length in bytes.
pub const MAX_QUESTION_LENGTH: usize = 256;

/// Reveal window length applied when a market is created without one (24h).
pub const DEFAULT_REVEAL_PERIOD_SECS: i64 = 24 * 60 * 60;

/// Outcome byte for a NO vote / NO resolution.
pub const OUTCOME_NO: u8 = 0;

/// Outcome byte for a YES vote / YES resolution.
pub const OUTCOME_YES: u8 = 1;

/// Namespace tag for market addresses.
pub const MARKET_SEED: &[u8] = b"market";

/// Namespace tag for vault addresses.
pub const VAULT_SEED: &[u8] = b"vault";

/// Namespace tag for commitment addresses.
pub const COMMITMENT_SEED: &[u8] = b"commitment";

/// Domain separator mixed into every derived address.
pub const ADDRESS_DOMAIN: &[u8] = b"sealbet:address:v1:";

/// Length of the commitment preimage: amount (8) + outcome (1) + salt (32).
pub const COMMITMENT_PREIMAGE_LEN: usize = 8 + 1 + 32;
