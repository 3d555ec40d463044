//! Timelock events.

use borsh::{BorshDeserialize, BorshSerialize};
use zora_types::{Address, Call, Hash};
use zora_vm::Event;

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct NewAdmin {
    pub new_admin: Address,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct NewPendingAdmin {
    pub new_pending_admin: Address,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct NewDelay {
    pub new_delay: u64,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct QueueTransaction {
    pub tx_hash: Hash,
    pub call: Call,
    pub eta: u64,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct CancelTransaction {
    pub tx_hash: Hash,
    pub call: Call,
    pub eta: u64,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct ExecuteTransaction {
    pub tx_hash: Hash,
    pub call: Call,
    pub eta: u64,
}

impl Event for NewAdmin {
    const NAME: &'static str = "NewAdmin";
}

impl Event for NewPendingAdmin {
    const NAME: &'static str = "NewPendingAdmin";
}

impl Event for NewDelay {
    const NAME: &'static str = "NewDelay";
}

impl Event for QueueTransaction {
    const NAME: &'static str = "QueueTransaction";
}

impl Event for CancelTransaction {
    const NAME: &'static str = "CancelTransaction";
}

impl Event for ExecuteTransaction {
    const NAME: &'static str = "ExecuteTransaction";
}
