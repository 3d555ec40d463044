use thiserror::Error;
use zora_vm::ExecutionError;

use crate::proposal::ProposalState;

/// Governor failures, worded after the GovernorAlpha revert strings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("GovernorAlpha::initialize: already initialized")]
    AlreadyInitialized,

    #[error("GovernorAlpha: not initialized")]
    NotInitialized,

    #[error("GovernorAlpha::propose: proposer votes below proposal threshold")]
    InsufficientVotingPower,

    #[error("GovernorAlpha::propose: {0}")]
    InvalidProposal(&'static str),

    #[error("GovernorAlpha::propose: one live proposal per proposer, found an already {0} proposal")]
    ProposerHasLiveProposal(ProposalState),

    #[error("GovernorAlpha::state: invalid proposal id {0}")]
    ProposalNotFound(u64),

    #[error("GovernorAlpha::_castVote: voting is closed")]
    VotingClosed,

    #[error("GovernorAlpha::_castVote: voter already voted")]
    AlreadyVoted,

    #[error("GovernorAlpha::queue: proposal can only be queued if it is succeeded")]
    ProposalNotSucceeded,

    #[error("GovernorAlpha::_queueOrRevert: proposal action already queued at eta")]
    ActionAlreadyQueued,

    #[error("GovernorAlpha::execute: proposal can only be executed if it is queued")]
    ProposalNotQueued,

    #[error("GovernorAlpha::cancel: cannot cancel {0} proposal")]
    CannotCancel(ProposalState),

    #[error("GovernorAlpha::cancel: proposer above threshold")]
    ProposerAboveThreshold,

    #[error("GovernorAlpha::{0}: sender must be gov guardian")]
    NotGuardian(&'static str),

    #[error("GovernorAlpha: arithmetic overflow")]
    Overflow,

    #[error("Invalid governor config: {0}")]
    InvalidConfig(String),

    /// A call into the token or the timelock failed.
    #[error("{0}")]
    Call(#[from] ExecutionError),
}

impl From<GovernanceError> for ExecutionError {
    fn from(e: GovernanceError) -> Self {
        match e {
            GovernanceError::Call(inner) => inner,
            other => ExecutionError::revert(other),
        }
    }
}
