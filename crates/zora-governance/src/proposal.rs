//! Proposal records and state derivation.

use std::collections::HashMap;
use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use zora_types::{Address, BlockEnv, Call};

/// Lifecycle state of a proposal. Never stored, always derived.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProposalState {
    /// Created, voting has not started yet
    Pending,
    /// Voting is open
    Active,
    Canceled,
    /// Vote closed without majority or quorum
    Defeated,
    /// Vote passed, not queued yet
    Succeeded,
    /// Waiting in the timelock
    Queued,
    /// Queued but the grace period ran out
    Expired,
    Executed,
}

impl ProposalState {
    /// Pending and active proposals block their proposer from proposing again.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Queued => "queued",
            Self::Expired => "expired",
            Self::Executed => "executed",
        };
        f.write_str(s)
    }
}

/// A voter's ballot on one proposal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Receipt {
    pub has_voted: bool,
    pub support: bool,
    pub votes: u128,
}

/// Call lists submitted with a proposal, entry `i` of each describing call `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ProposalActions {
    pub targets: Vec<Address>,
    pub values: Vec<u128>,
    pub signatures: Vec<String>,
    pub calldatas: Vec<Vec<u8>>,
}

impl ProposalActions {
    pub fn from_calls(calls: impl IntoIterator<Item = Call>) -> Self {
        let mut actions = Self::default();
        for call in calls {
            actions.targets.push(call.target);
            actions.values.push(call.value);
            actions.signatures.push(call.signature);
            actions.calldatas.push(call.data);
        }
        actions
    }

    /// True when all four lists have the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.targets.len();
        self.values.len() == n && self.signatures.len() == n && self.calldatas.len() == n
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A batch of calls put to a vote.
///
/// The action lists are parallel: entry `i` of each describes call `i`.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Proposal {
    pub id: u64,
    pub proposer: Address,
    /// Timestamp from which the queued calls may run, zero until queued
    pub eta: u64,
    pub targets: Vec<Address>,
    pub values: Vec<u128>,
    pub signatures: Vec<String>,
    pub calldatas: Vec<Vec<u8>>,
    /// Voting opens after this block
    pub start_block: u64,
    /// Voting closes after this block
    pub end_block: u64,
    pub for_votes: u128,
    pub against_votes: u128,
    pub canceled: bool,
    pub executed: bool,
    pub description: String,
    pub receipts: HashMap<Address, Receipt>,
}

impl Proposal {
    /// The proposal's calls, in execution order.
    pub fn actions(&self) -> Vec<Call> {
        self.targets
            .iter()
            .zip(&self.values)
            .zip(&self.signatures)
            .zip(&self.calldatas)
            .map(|(((target, value), signature), data)| {
                Call::new(*target, *value, signature.clone(), data.clone())
            })
            .collect()
    }

    pub fn receipt(&self, voter: &Address) -> Receipt {
        self.receipts.get(voter).copied().unwrap_or_default()
    }

    /// Derive the state at `env`.
    ///
    /// Flags win over the clock: a canceled or executed proposal stays so.
    /// Voting is closed at `start_block` itself and open through `end_block`.
    pub fn state(&self, env: BlockEnv, quorum_votes: u128, grace_period: u64) -> ProposalState {
        if self.canceled {
            ProposalState::Canceled
        } else if env.number <= self.start_block {
            ProposalState::Pending
        } else if env.number <= self.end_block {
            ProposalState::Active
        } else if self.for_votes <= self.against_votes || self.for_votes < quorum_votes {
            ProposalState::Defeated
        } else if self.eta == 0 {
            ProposalState::Succeeded
        } else if self.executed {
            ProposalState::Executed
        } else if env.timestamp >= self.eta.saturating_add(grace_period) {
            ProposalState::Expired
        } else {
            ProposalState::Queued
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const QUORUM: u128 = 1_000;
    const GRACE: u64 = 1_209_600;

    fn proposal() -> Proposal {
        Proposal {
            id: 1,
            proposer: Address::from_label("dev"),
            eta: 0,
            targets: vec![Address::from_label("token"), Address::from_label("treasury")],
            values: vec![0, 5],
            signatures: vec!["mint(address,uint256)".to_string(), String::new()],
            calldatas: vec![vec![1, 2, 3], Vec::new()],
            start_block: 10,
            end_block: 30,
            for_votes: 0,
            against_votes: 0,
            canceled: false,
            executed: false,
            description: "mint".to_string(),
            receipts: HashMap::new(),
        }
    }

    fn at(number: u64) -> BlockEnv {
        BlockEnv::new(number, 1_000)
    }

    #[test]
    fn test_voting_window_boundaries() {
        let p = proposal();
        assert_eq!(p.state(at(9), QUORUM, GRACE), ProposalState::Pending);
        assert_eq!(p.state(at(10), QUORUM, GRACE), ProposalState::Pending);
        assert_eq!(p.state(at(11), QUORUM, GRACE), ProposalState::Active);
        assert_eq!(p.state(at(30), QUORUM, GRACE), ProposalState::Active);
        assert_eq!(p.state(at(31), QUORUM, GRACE), ProposalState::Defeated);
    }

    #[test]
    fn test_quorum_is_inclusive() {
        let mut p = proposal();
        p.for_votes = QUORUM - 1;
        assert_eq!(p.state(at(31), QUORUM, GRACE), ProposalState::Defeated);
        p.for_votes = QUORUM;
        assert_eq!(p.state(at(31), QUORUM, GRACE), ProposalState::Succeeded);
    }

    #[test]
    fn test_tie_is_defeated() {
        let mut p = proposal();
        p.for_votes = QUORUM * 2;
        p.against_votes = QUORUM * 2;
        assert_eq!(p.state(at(31), QUORUM, GRACE), ProposalState::Defeated);
    }

    #[test]
    fn test_queue_expiry_and_execution() {
        let mut p = proposal();
        p.for_votes = QUORUM;
        p.eta = 5_000;

        let before = BlockEnv::new(40, 4_000);
        assert_eq!(p.state(before, QUORUM, GRACE), ProposalState::Queued);
        let last = BlockEnv::new(40, 5_000 + GRACE - 1);
        assert_eq!(p.state(last, QUORUM, GRACE), ProposalState::Queued);
        let expired = BlockEnv::new(40, 5_000 + GRACE);
        assert_eq!(p.state(expired, QUORUM, GRACE), ProposalState::Expired);

        p.executed = true;
        assert_eq!(p.state(expired, QUORUM, GRACE), ProposalState::Executed);
    }

    #[test]
    fn test_canceled_wins() {
        let mut p = proposal();
        p.for_votes = QUORUM;
        p.canceled = true;
        assert_eq!(p.state(at(5), QUORUM, GRACE), ProposalState::Canceled);
        assert_eq!(p.state(at(31), QUORUM, GRACE), ProposalState::Canceled);
    }

    #[test]
    fn test_actions_zip_in_order() {
        let p = proposal();
        let actions = p.actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].signature, "mint(address,uint256)");
        assert_eq!(actions[0].data, vec![1, 2, 3]);
        assert!(actions[1].is_transfer());
        assert_eq!(actions[1].value, 5);
    }

    #[test]
    fn test_actions_from_calls_and_arity() {
        let calls = proposal().actions();
        let mut actions = ProposalActions::from_calls(calls.clone());
        assert_eq!(actions.len(), 2);
        assert!(actions.is_consistent());
        assert_eq!(actions.signatures[0], calls[0].signature);

        actions.values.pop();
        assert!(!actions.is_consistent());
        assert!(ProposalActions::default().is_empty());
    }

    #[test]
    fn test_missing_receipt_is_empty() {
        let p = proposal();
        assert_eq!(p.receipt(&Address::from_label("nobody")), Receipt::default());
    }

    #[test]
    fn test_state_names_are_lowercase() {
        #[derive(Serialize)]
        struct Report {
            state: ProposalState,
        }
        let encoded = toml::to_string(&Report {
            state: ProposalState::Succeeded,
        })
        .unwrap();
        assert_eq!(encoded.trim(), "state = \"succeeded\"");
        assert_eq!(ProposalState::Expired.to_string(), "expired");
    }

    proptest! {
        #[test]
        fn prop_before_end_block_only_pending_or_active(
            number in 0u64..=30,
            for_votes in 0u128..10_000,
            against_votes in 0u128..10_000,
        ) {
            let mut p = proposal();
            p.for_votes = for_votes;
            p.against_votes = against_votes;
            let state = p.state(at(number), QUORUM, GRACE);
            prop_assert!(state.is_live());
        }

        #[test]
        fn prop_closed_vote_outcome(
            for_votes in 0u128..10_000,
            against_votes in 0u128..10_000,
        ) {
            let mut p = proposal();
            p.for_votes = for_votes;
            p.against_votes = against_votes;
            let state = p.state(at(31), QUORUM, GRACE);
            let passed = for_votes > against_votes && for_votes >= QUORUM;
            prop_assert_eq!(state == ProposalState::Succeeded, passed);
            prop_assert_eq!(state == ProposalState::Defeated, !passed);
        }
    }
}
