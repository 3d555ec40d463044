//! Governor events.

use borsh::{BorshDeserialize, BorshSerialize};
use zora_types::Address;
use zora_vm::Event;

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct ProposalCreated {
    pub id: u64,
    pub proposer: Address,
    pub targets: Vec<Address>,
    pub values: Vec<u128>,
    pub signatures: Vec<String>,
    pub calldatas: Vec<Vec<u8>>,
    pub start_block: u64,
    pub end_block: u64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct VoteCast {
    pub voter: Address,
    pub proposal_id: u64,
    pub support: bool,
    pub votes: u128,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct ProposalCanceled {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct ProposalQueued {
    pub id: u64,
    pub eta: u64,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct ProposalExecuted {
    pub id: u64,
}

impl Event for ProposalCreated {
    const NAME: &'static str = "ProposalCreated";
}

impl Event for VoteCast {
    const NAME: &'static str = "VoteCast";
}

impl Event for ProposalCanceled {
    const NAME: &'static str = "ProposalCanceled";
}

impl Event for ProposalQueued {
    const NAME: &'static str = "ProposalQueued";
}

impl Event for ProposalExecuted {
    const NAME: &'static str = "ProposalExecuted";
}
