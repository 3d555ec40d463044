//! Zora Governance - proposal lifecycle for the Zoracles token.
//!
//! Token holders delegate voting weight, propose batches of calls, vote over
//! a fixed block window and, when quorum and majority are reached, queue the
//! batch into the timelock for delayed execution.
//!
//! A proposal's state is never stored: [`Proposal::state`] derives it from
//! the recorded flags and tallies plus the current block height and time.

pub mod config;
pub mod error;
pub mod events;
pub mod governor;
pub mod interfaces;
pub mod proposal;

pub use config::GovernorConfig;
pub use error::GovernanceError;
pub use governor::Governor;
pub use interfaces::{TimelockClient, TokenClient};
pub use proposal::{Proposal, ProposalActions, ProposalState, Receipt};

/// Call signatures understood by [`Governor`].
pub mod signatures {
    pub const INITIALIZE: &str = "initialize(address,address,address)";
    pub const PROPOSE: &str = "propose(address[],uint256[],string[],bytes[],string)";
    pub const CAST_VOTE: &str = "castVote(uint256,bool)";
    pub const QUEUE: &str = "queue(uint256)";
    pub const EXECUTE: &str = "execute(uint256)";
    pub const CANCEL: &str = "cancel(uint256)";
    pub const ACCEPT_ADMIN: &str = "__acceptAdmin()";
    pub const ABDICATE: &str = "__abdicate()";
    pub const QUEUE_SET_TIMELOCK_PENDING_ADMIN: &str = "__queueSetTimelockPendingAdmin(address,uint256)";
    pub const EXECUTE_SET_TIMELOCK_PENDING_ADMIN: &str =
        "__executeSetTimelockPendingAdmin(address,uint256)";
    pub const STATE: &str = "state(uint256)";
    pub const QUORUM_VOTES: &str = "quorumVotes()";
    pub const PROPOSAL_THRESHOLD: &str = "proposalThreshold()";
    pub const PROPOSAL_MAX_OPERATIONS: &str = "proposalMaxOperations()";
    pub const VOTING_DELAY: &str = "votingDelay()";
    pub const VOTING_PERIOD: &str = "votingPeriod()";
    pub const PROPOSAL_COUNT: &str = "proposalCount()";
    pub const LATEST_PROPOSAL_IDS: &str = "latestProposalIds(address)";
    pub const GET_ACTIONS: &str = "getActions(uint256)";
    pub const GET_RECEIPT: &str = "getReceipt(uint256,address)";
    pub const GUARDIAN: &str = "guardian()";
    pub const TIMELOCK: &str = "timelock()";
    pub const TOKEN: &str = "token()";
}
