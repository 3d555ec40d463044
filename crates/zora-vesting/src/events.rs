//! Vesting events.

use borsh::{BorshDeserialize, BorshSerialize};
use zora_types::Address;
use zora_vm::Event;

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Deposited {
    pub depositor: Address,
    pub beneficiary: Address,
    pub amount: u128,
    pub cliff_period: u64,
    pub vesting_period: u64,
}

#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct Withdrawn {
    pub beneficiary: Address,
    pub amount: u128,
}

impl Event for Deposited {
    const NAME: &'static str = "Deposited";
}

impl Event for Withdrawn {
    const NAME: &'static str = "Withdrawn";
}
