//! Protocol configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::params::MAX_AMOUNT;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Bind statements to an epoch through `u = gEpoch^x`.
    pub epoch_nonce: bool,
    /// Largest amount or remaining balance a builder accepts.
    pub max_amount: u64,
    /// Require anonymity sets assembled from decoys to have a power-of-two size.
    pub power_of_two_sets: bool,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self { epoch_nonce: true, max_amount: MAX_AMOUNT, power_of_two_sets: true }
    }
}

impl ProtocolConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_amount == 0 || self.max_amount > MAX_AMOUNT {
            return Err(ConfigError::Invalid("max_amount must be in 1..=2^32-1"));
        }
        Ok(())
    }
}
