use serde::{Deserialize, Serialize};

use crate::error::TimelockError;
use crate::{MAXIMUM_DELAY, MINIMUM_DELAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelockConfig {
    /// Seconds between queueing and the earliest execution
    pub delay: u64,
}

impl Default for TimelockConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl TimelockConfig {
    pub fn mainnet() -> Self {
        Self {
            delay: MINIMUM_DELAY,
        }
    }

    /// The delay cannot go below the minimum on any network.
    pub fn devnet() -> Self {
        Self::mainnet()
    }

    pub fn validate(&self) -> Result<(), TimelockError> {
        if self.delay < MINIMUM_DELAY {
            return Err(TimelockError::DelayBelowMinimum { op: "constructor" });
        }
        if self.delay > MAXIMUM_DELAY {
            return Err(TimelockError::DelayAboveMaximum { op: "constructor" });
        }
        Ok(())
    }
}
