//! Token events.

use borsh::{BorshDeserialize, BorshSerialize};
use zora_types::Address;
use zora_vm::Event;

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub value: u128,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    pub value: u128,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct DelegateChanged {
    pub delegator: Address,
    pub from_delegate: Address,
    pub to_delegate: Address,
}

impl Event for Transfer {
    const NAME: &'static str = "Transfer";
}

impl Event for Approval {
    const NAME: &'static str = "Approval";
}

impl Event for OwnershipTransferred {
    const NAME: &'static str = "OwnershipTransferred";
}

impl Event for DelegateChanged {
    const NAME: &'static str = "DelegateChanged";
}
