//! Governor parameters.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

const BPS_DENOMINATOR: u128 = 10_000;

/// Quorum and threshold are fractions of the token supply sampled once, at
/// initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// For-votes needed for a proposal to pass, in basis points of supply
    pub quorum_bps: u64,
    /// Votes a proposer must exceed, in basis points of supply
    pub proposal_threshold_bps: u64,
    /// Blocks between proposing and the opening of the vote
    pub voting_delay: u64,
    /// Blocks the vote stays open
    pub voting_period: u64,
    /// Maximum number of calls in one proposal
    pub max_operations: usize,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl GovernorConfig {
    /// 10% quorum, 1% threshold, a ~3 day vote at 15s blocks.
    pub fn mainnet() -> Self {
        Self {
            quorum_bps: 1_000,
            proposal_threshold_bps: 100,
            voting_delay: 1,
            voting_period: 17_280,
            max_operations: 10,
        }
    }

    /// Same thresholds, short voting window.
    pub fn devnet() -> Self {
        Self {
            voting_period: 20,
            ..Self::mainnet()
        }
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.quorum_bps == 0 || u128::from(self.quorum_bps) > BPS_DENOMINATOR {
            return Err(GovernanceError::InvalidConfig(format!(
                "quorum_bps must be in 1..=10000, got {}",
                self.quorum_bps
            )));
        }
        if u128::from(self.proposal_threshold_bps) > BPS_DENOMINATOR {
            return Err(GovernanceError::InvalidConfig(format!(
                "proposal_threshold_bps must be at most 10000, got {}",
                self.proposal_threshold_bps
            )));
        }
        if self.voting_period == 0 {
            return Err(GovernanceError::InvalidConfig(
                "voting_period must be at least one block".to_string(),
            ));
        }
        if self.max_operations == 0 {
            return Err(GovernanceError::InvalidConfig(
                "max_operations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn quorum_votes(&self, total_supply: u128) -> Result<u128, GovernanceError> {
        fraction(total_supply, self.quorum_bps)
    }

    pub fn proposal_threshold(&self, total_supply: u128) -> Result<u128, GovernanceError> {
        fraction(total_supply, self.proposal_threshold_bps)
    }
}

fn fraction(total: u128, bps: u64) -> Result<u128, GovernanceError> {
    total
        .checked_mul(u128::from(bps))
        .map(|scaled| scaled / BPS_DENOMINATOR)
        .ok_or(GovernanceError::Overflow)
}
