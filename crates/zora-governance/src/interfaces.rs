//! Typed handles for the contracts the governor calls into.
//!
//! The token is reached through its call signatures only, so any contract
//! answering `totalSupply()` and `getPriorVotes(address,uint256)` can back
//! the governor.

use zora_timelock::signatures as timelock;
use zora_types::{Address, Call, Hash};
use zora_vm::{abi, ExecutionError, Host};

const TOTAL_SUPPLY: &str = "totalSupply()";
const GET_PRIOR_VOTES: &str = "getPriorVotes(address,uint256)";

/// Voting token the governor reads weights from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClient(pub Address);

impl TokenClient {
    pub fn total_supply(&self, host: &mut dyn Host, from: Address) -> Result<u128, ExecutionError> {
        abi::invoke(host, from, &abi::call(self.0, TOTAL_SUPPLY, &())?)
    }

    /// Votes delegated to `account` as of the end of block `block`.
    pub fn prior_votes(
        &self,
        host: &mut dyn Host,
        from: Address,
        account: Address,
        block: u64,
    ) -> Result<u128, ExecutionError> {
        abi::invoke(host, from, &abi::call(self.0, GET_PRIOR_VOTES, &(account, block))?)
    }
}

/// Timelock administered by the governor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelockClient(pub Address);

impl TimelockClient {
    pub fn delay(&self, host: &mut dyn Host, from: Address) -> Result<u64, ExecutionError> {
        abi::invoke(host, from, &abi::call(self.0, timelock::DELAY, &())?)
    }

    pub fn is_queued(
        &self,
        host: &mut dyn Host,
        from: Address,
        tx_hash: Hash,
    ) -> Result<bool, ExecutionError> {
        abi::invoke(host, from, &abi::call(self.0, timelock::QUEUED_TRANSACTIONS, &tx_hash)?)
    }

    pub fn queue_transaction(
        &self,
        host: &mut dyn Host,
        from: Address,
        call: &Call,
        eta: u64,
    ) -> Result<Hash, ExecutionError> {
        abi::invoke(host, from, &self.transaction_call(timelock::QUEUE_TRANSACTION, call, eta, 0)?)
    }

    pub fn cancel_transaction(
        &self,
        host: &mut dyn Host,
        from: Address,
        call: &Call,
        eta: u64,
    ) -> Result<(), ExecutionError> {
        abi::invoke(host, from, &self.transaction_call(timelock::CANCEL_TRANSACTION, call, eta, 0)?)
    }

    /// Execute a queued call, sending along the value it carries.
    pub fn execute_transaction(
        &self,
        host: &mut dyn Host,
        from: Address,
        call: &Call,
        eta: u64,
    ) -> Result<Vec<u8>, ExecutionError> {
        let request = self.transaction_call(timelock::EXECUTE_TRANSACTION, call, eta, call.value)?;
        abi::invoke(host, from, &request)
    }

    pub fn accept_admin(&self, host: &mut dyn Host, from: Address) -> Result<(), ExecutionError> {
        abi::invoke(host, from, &abi::call(self.0, timelock::ACCEPT_ADMIN, &())?)
    }

    /// Call that makes the timelock name `pending_admin`, as queued by the guardian.
    pub fn set_pending_admin_call(&self, pending_admin: Address) -> Result<Call, ExecutionError> {
        abi::call(self.0, timelock::SET_PENDING_ADMIN, &pending_admin)
    }

    fn transaction_call(
        &self,
        signature: &str,
        call: &Call,
        eta: u64,
        value: u128,
    ) -> Result<Call, ExecutionError> {
        let args = (
            call.target,
            call.value,
            call.signature.clone(),
            call.data.clone(),
            eta,
        );
        Ok(Call::new(self.0, value, signature, abi::encode(&args)?))
    }
}
