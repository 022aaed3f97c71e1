//! Engine configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{Result, SealbetError, constants};

/// Tunables for a `MarketEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum question length in bytes.
    pub max_question_len: usize,
    /// Reveal window applied when a market is created without one.
    pub default_reveal_period_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_question_len: constants::MAX_QUESTION_LENGTH,
            default_reveal_period_secs: constants::DEFAULT_REVEAL_PERIOD_SECS,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// `InvalidConfig` for a zero question limit, or a default reveal period
    /// that is non-positive or too long to represent as a `Duration`.
    pub fn validate(&self) -> Result<()> {
        if self.max_question_len == 0 {
            return Err(SealbetError::InvalidConfig(
                "max_question_len must be > 0".into(),
            ));
        }
        if self.default_reveal_period_secs <= 0 {
            return Err(SealbetError::InvalidConfig(
                "default_reveal_period_secs must be > 0".into(),
            ));
        }
        if Duration::try_seconds(self.default_reveal_period_secs).is_none() {
            return Err(SealbetError::InvalidConfig(format!(
                "default_reveal_period_secs {} out of range",
                self.default_reveal_period_secs
            )));
        }
        Ok(())
    }

    /// Reveal window for markets created without one. Falls back to the
    /// built-in default if the configured value is out of range, which
    /// `validate` rejects.
    #[must_use]
    pub fn default_reveal_period(&self) -> Duration {
        Duration::try_seconds(self.default_reveal_period_secs)
            .filter(|period| *period > Duration::zero())
            .unwrap_or_else(|| Duration::seconds(constants::DEFAULT_REVEAL_PERIOD_SECS))
    }
}
