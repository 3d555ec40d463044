use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Seconds in an hour.
pub const HOUR: u64 = 60 * 60;

/// Seconds in a day. Vesting schedules and timelock delays count in these units.
pub const DAY: u64 = 24 * HOUR;

/// Externally supplied view of the chain: current block height and time.
///
/// Every time-dependent rule (voting windows, timelock delays, vesting cliffs)
/// is a pure comparison against this value; nothing is ever scheduled.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct BlockEnv {
    pub number: u64,
    /// Unix seconds
    pub timestamp: u64,
}

impl BlockEnv {
    pub const fn new(number: u64, timestamp: u64) -> Self {
        Self { number, timestamp }
    }

    /// Mine `count` blocks, each `block_time` seconds apart.
    pub fn advance_blocks(&mut self, count: u64, block_time: u64) {
        self.number = self.number.saturating_add(count);
        self.timestamp = self
            .timestamp
            .saturating_add(count.saturating_mul(block_time));
    }

    /// Move the clock forward without producing blocks.
    pub fn advance_time(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    /// Whole days elapsed since `since`; zero if `since` lies in the future.
    pub fn days_since(&self, since: u64) -> u64 {
        self.timestamp.saturating_sub(since) / DAY
    }
}
