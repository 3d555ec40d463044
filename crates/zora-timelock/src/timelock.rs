//! Timelock contract.

use std::collections::HashSet;

use borsh::{BorshDeserialize, BorshSerialize};
use tracing::{debug, info};
use zora_types::{Address, Call, Hash};
use zora_vm::{abi, emit, CallContext, Contract, ExecutionError, Host};

use crate::config::TimelockConfig;
use crate::error::TimelockError;
use crate::events::{
    CancelTransaction, ExecuteTransaction, NewAdmin, NewDelay, NewPendingAdmin, QueueTransaction,
};
use crate::{signatures, GRACE_PERIOD, MAXIMUM_DELAY, MINIMUM_DELAY};

/// Identity of a queued call: blake3 over the borsh encoding of
/// `(target, value, signature, data, eta)`.
pub fn transaction_hash(call: &Call, eta: u64) -> Hash {
    let signature_len = (call.signature.len() as u32).to_le_bytes();
    let data_len = (call.data.len() as u32).to_le_bytes();
    Hash::compute_multi(&[
        call.target.as_bytes(),
        &call.value.to_le_bytes(),
        &signature_len,
        call.signature.as_bytes(),
        &data_len,
        &call.data,
        &eta.to_le_bytes(),
    ])
}

type TxArgs = (Address, u128, String, Vec<u8>, u64);

fn split_args((target, value, signature, data, eta): TxArgs) -> (Call, u64) {
    (Call::new(target, value, signature, data), eta)
}

/// Timelock contract state.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct Timelock {
    pub admin: Address,
    pub pending_admin: Address,
    /// Seconds, always within `[MINIMUM_DELAY, MAXIMUM_DELAY]`
    pub delay: u64,
    /// Cleared until the admin has named its first pending admin.
    pub admin_initialized: bool,
    pub queued_transactions: HashSet<Hash>,
}

impl Timelock {
    pub fn new(admin: Address, delay: u64) -> Result<Self, TimelockError> {
        TimelockConfig { delay }.validate()?;
        Ok(Self {
            admin,
            pending_admin: Address::ZERO,
            delay,
            admin_initialized: false,
            queued_transactions: HashSet::new(),
        })
    }

    pub fn from_config(admin: Address, config: &TimelockConfig) -> Result<Self, TimelockError> {
        Self::new(admin, config.delay)
    }

    pub fn is_queued(&self, tx_hash: &Hash) -> bool {
        self.queued_transactions.contains(tx_hash)
    }

    /// Only reachable through a queued call the timelock makes to itself.
    pub fn set_delay(&mut self, ctx: &CallContext, delay: u64) -> Result<NewDelay, TimelockError> {
        if ctx.caller != ctx.this {
            return Err(TimelockError::Unauthorized {
                op: "setDelay",
                required: "Timelock",
            });
        }
        if delay < MINIMUM_DELAY {
            return Err(TimelockError::DelayBelowMinimum { op: "setDelay" });
        }
        if delay > MAXIMUM_DELAY {
            return Err(TimelockError::DelayAboveMaximum { op: "setDelay" });
        }

        self.delay = delay;
        info!(delay, "timelock delay changed");
        Ok(NewDelay { new_delay: delay })
    }

    pub fn accept_admin(&mut self, ctx: &CallContext) -> Result<NewAdmin, TimelockError> {
        if ctx.caller != self.pending_admin {
            return Err(TimelockError::Unauthorized {
                op: "acceptAdmin",
                required: "pendingAdmin",
            });
        }

        self.admin = ctx.caller;
        self.pending_admin = Address::ZERO;
        info!(admin = %self.admin, "timelock admin accepted");
        Ok(NewAdmin {
            new_admin: self.admin,
        })
    }

    /// The initial admin may name the first pending admin directly; every
    /// later change has to go through the queue.
    pub fn set_pending_admin(
        &mut self,
        ctx: &CallContext,
        pending_admin: Address,
    ) -> Result<NewPendingAdmin, TimelockError> {
        if self.admin_initialized {
            if ctx.caller != ctx.this {
                return Err(TimelockError::Unauthorized {
                    op: "setPendingAdmin",
                    required: "Timelock",
                });
            }
        } else {
            if ctx.caller != self.admin {
                return Err(TimelockError::Unauthorized {
                    op: "setPendingAdmin",
                    required: "admin",
                });
            }
            self.admin_initialized = true;
        }

        self.pending_admin = pending_admin;
        info!(%pending_admin, "timelock pending admin set");
        Ok(NewPendingAdmin {
            new_pending_admin: pending_admin,
        })
    }

    pub fn queue_transaction(
        &mut self,
        ctx: &CallContext,
        call: Call,
        eta: u64,
    ) -> Result<QueueTransaction, TimelockError> {
        self.only_admin(ctx, "queueTransaction")?;
        let earliest = ctx
            .env
            .timestamp
            .checked_add(self.delay)
            .ok_or(TimelockError::Overflow)?;
        if eta < earliest {
            return Err(TimelockError::DelayNotSatisfied);
        }

        let tx_hash = transaction_hash(&call, eta);
        self.queued_transactions.insert(tx_hash);

        info!(%tx_hash, target = %call.target, signature = %call.signature, eta, "transaction queued");
        Ok(QueueTransaction { tx_hash, call, eta })
    }

    pub fn cancel_transaction(
        &mut self,
        ctx: &CallContext,
        call: Call,
        eta: u64,
    ) -> Result<CancelTransaction, TimelockError> {
        self.only_admin(ctx, "cancelTransaction")?;

        let tx_hash = transaction_hash(&call, eta);
        self.queued_transactions.remove(&tx_hash);

        info!(%tx_hash, "transaction canceled");
        Ok(CancelTransaction { tx_hash, call, eta })
    }

    /// Run a queued call. The hash leaves the queue before the call is
    /// dispatched, so a call can never run twice.
    pub fn execute_transaction(
        &mut self,
        ctx: &CallContext,
        call: Call,
        eta: u64,
        host: &mut dyn Host,
    ) -> Result<(Vec<u8>, ExecuteTransaction), TimelockError> {
        self.only_admin(ctx, "executeTransaction")?;

        let tx_hash = transaction_hash(&call, eta);
        if !self.is_queued(&tx_hash) {
            return Err(TimelockError::NotQueued);
        }
        let now = ctx.env.timestamp;
        if now < eta {
            return Err(TimelockError::TimelockNotSurpassed);
        }
        if now > eta.saturating_add(GRACE_PERIOD) {
            return Err(TimelockError::StaleTransaction);
        }

        self.queued_transactions.remove(&tx_hash);

        let output = if call.target == ctx.this {
            // Already on the call stack, so self-calls run in place.
            let inner = CallContext::new(ctx.this, ctx.this, ctx.env).with_origin(ctx.origin);
            self.dispatch(&inner, &call.signature, &call.data, host)?
        } else {
            host.call(ctx.this, &call)?
        };

        info!(%tx_hash, target = %call.target, signature = %call.signature, "transaction executed");
        Ok((output, ExecuteTransaction { tx_hash, call, eta }))
    }

    fn only_admin(&self, ctx: &CallContext, op: &'static str) -> Result<(), TimelockError> {
        if ctx.caller != self.admin {
            return Err(TimelockError::Unauthorized {
                op,
                required: "admin",
            });
        }
        Ok(())
    }
}

impl Contract for Timelock {
    fn name(&self) -> &'static str {
        "Timelock"
    }

    fn dispatch(
        &mut self,
        ctx: &CallContext,
        signature: &str,
        data: &[u8],
        host: &mut dyn Host,
    ) -> Result<Vec<u8>, ExecutionError> {
        match signature {
            // Plain value transfers fund queued calls that carry value
            "" => {
                debug!(from = %ctx.caller, value = ctx.value, "timelock received value");
                Ok(Vec::new())
            }
            signatures::ADMIN => abi::encode(&self.admin),
            signatures::PENDING_ADMIN => abi::encode(&self.pending_admin),
            signatures::DELAY => abi::encode(&self.delay),
            signatures::GRACE_PERIOD => abi::encode(&GRACE_PERIOD),
            signatures::MINIMUM_DELAY => abi::encode(&MINIMUM_DELAY),
            signatures::MAXIMUM_DELAY => abi::encode(&MAXIMUM_DELAY),
            signatures::QUEUED_TRANSACTIONS => {
                let tx_hash: Hash = abi::decode(signature, data)?;
                abi::encode(&self.is_queued(&tx_hash))
            }
            signatures::SET_DELAY => {
                let delay: u64 = abi::decode(signature, data)?;
                let event = self.set_delay(ctx, delay)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::ACCEPT_ADMIN => {
                abi::decode::<()>(signature, data)?;
                let event = self.accept_admin(ctx)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::SET_PENDING_ADMIN => {
                let pending_admin: Address = abi::decode(signature, data)?;
                let event = self.set_pending_admin(ctx, pending_admin)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::QUEUE_TRANSACTION => {
                let (call, eta) = split_args(abi::decode(signature, data)?);
                let event = self.queue_transaction(ctx, call, eta)?;
                let tx_hash = event.tx_hash;
                emit(host, ctx.this, &event)?;
                abi::encode(&tx_hash)
            }
            signatures::CANCEL_TRANSACTION => {
                let (call, eta) = split_args(abi::decode(signature, data)?);
                let event = self.cancel_transaction(ctx, call, eta)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::EXECUTE_TRANSACTION => {
                let (call, eta) = split_args(abi::decode(signature, data)?);
                let (output, event) = self.execute_transaction(ctx, call, eta, host)?;
                emit(host, ctx.this, &event)?;
                abi::encode(&output)
            }
            _ => Err(ExecutionError::UnknownFunction {
                contract: self.name().to_string(),
                signature: signature.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use zora_types::{BlockEnv, DAY};
    use zora_vm::Log;

    const START: u64 = 1_600_000_000;

    fn admin() -> Address {
        Address::from_bytes([1u8; 20])
    }

    fn stranger() -> Address {
        Address::from_bytes([2u8; 20])
    }

    fn this() -> Address {
        Address::from_bytes([7u8; 20])
    }

    fn target() -> Address {
        Address::from_bytes([8u8; 20])
    }

    fn ctx(caller: Address, timestamp: u64) -> CallContext {
        CallContext::new(caller, this(), BlockEnv::new(1, timestamp))
    }

    fn mint_call() -> Call {
        Call::encode(target(), "mint(address,uint256)", &(admin(), 100u128)).unwrap()
    }

    /// Host whose outbound calls succeed or fail on demand.
    struct StubHost {
        fail: bool,
        calls: Cell<usize>,
        logs: Vec<Log>,
    }

    impl StubHost {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: Cell::new(0),
                logs: Vec::new(),
            }
        }
    }

    impl Host for StubHost {
        fn env(&self) -> BlockEnv {
            BlockEnv::default()
        }

        fn call(&mut self, _from: Address, _call: &Call) -> Result<Vec<u8>, ExecutionError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(ExecutionError::revert("Ownable: caller is not the owner"))
            } else {
                Ok(vec![42])
            }
        }

        fn emit(&mut self, log: Log) {
            self.logs.push(log);
        }
    }

    #[test]
    fn test_hash_matches_borsh_encoding() {
        let call = mint_call();
        let encoded = borsh::to_vec(&(call.clone(), 99u64)).unwrap();
        assert_eq!(transaction_hash(&call, 99), Hash::compute(&encoded));
        assert_ne!(transaction_hash(&call, 99), transaction_hash(&call, 100));
    }

    #[test]
    fn test_constructor_bounds() {
        assert_eq!(
            Timelock::new(admin(), DAY).unwrap_err(),
            TimelockError::DelayBelowMinimum { op: "constructor" }
        );
        assert_eq!(
            Timelock::new(admin(), 31 * DAY).unwrap_err(),
            TimelockError::DelayAboveMaximum { op: "constructor" }
        );
        let timelock = Timelock::new(admin(), 3 * DAY).unwrap();
        assert_eq!(timelock.delay, 259_200);
    }

    #[test]
    fn test_queue_requires_admin_and_delay() {
        let mut timelock = Timelock::new(admin(), 2 * DAY).unwrap();

        let err = timelock
            .queue_transaction(&ctx(stranger(), START), mint_call(), START + 3 * DAY)
            .unwrap_err();
        assert_eq!(err.to_string(), "Timelock::queueTransaction: Call must come from admin.");

        assert_eq!(
            timelock
                .queue_transaction(&ctx(admin(), START), mint_call(), START + 2 * DAY - 1)
                .unwrap_err(),
            TimelockError::DelayNotSatisfied
        );

        let event = timelock
            .queue_transaction(&ctx(admin(), START), mint_call(), START + 2 * DAY)
            .unwrap();
        assert!(timelock.is_queued(&event.tx_hash));
    }

    #[test]
    fn test_execute_window() {
        let mut timelock = Timelock::new(admin(), 2 * DAY).unwrap();
        let eta = START + 4 * DAY;
        timelock
            .queue_transaction(&ctx(admin(), START), mint_call(), eta)
            .unwrap();
        let mut host = StubHost::new(false);

        assert_eq!(
            timelock
                .execute_transaction(&ctx(admin(), eta - 1), mint_call(), eta, &mut host)
                .unwrap_err(),
            TimelockError::TimelockNotSurpassed
        );
        assert_eq!(
            timelock
                .execute_transaction(&ctx(admin(), eta + GRACE_PERIOD + 1), mint_call(), eta, &mut host)
                .unwrap_err(),
            TimelockError::StaleTransaction
        );
        assert_eq!(host.calls.get(), 0);

        let (output, event) = timelock
            .execute_transaction(&ctx(admin(), eta + GRACE_PERIOD), mint_call(), eta, &mut host)
            .unwrap();
        assert_eq!(output, vec![42]);
        assert!(!timelock.is_queued(&event.tx_hash));

        // Single execution
        assert_eq!(
            timelock
                .execute_transaction(&ctx(admin(), eta + 1), mint_call(), eta, &mut host)
                .unwrap_err(),
            TimelockError::NotQueued
        );
        assert_eq!(host.calls.get(), 1);
    }

    #[test]
    fn test_hash_removed_before_dispatch() {
        let mut timelock = Timelock::new(admin(), 2 * DAY).unwrap();
        let eta = START + 2 * DAY;
        let queued = timelock
            .queue_transaction(&ctx(admin(), START), mint_call(), eta)
            .unwrap();
        let mut host = StubHost::new(true);

        let err = timelock
            .execute_transaction(&ctx(admin(), eta), mint_call(), eta, &mut host)
            .unwrap_err();

        assert_eq!(
            err,
            TimelockError::Call(ExecutionError::revert("Ownable: caller is not the owner"))
        );
        // The queue entry was consumed before the outbound call was made; only
        // the enclosing transaction's rollback can restore it.
        assert_eq!(host.calls.get(), 1);
        assert!(!timelock.is_queued(&queued.tx_hash));
    }

    #[test]
    fn test_cancel_removes_hash() {
        let mut timelock = Timelock::new(admin(), 2 * DAY).unwrap();
        let eta = START + 2 * DAY;
        let queued = timelock
            .queue_transaction(&ctx(admin(), START), mint_call(), eta)
            .unwrap();

        assert!(timelock
            .cancel_transaction(&ctx(stranger(), START), mint_call(), eta)
            .is_err());
        timelock
            .cancel_transaction(&ctx(admin(), START), mint_call(), eta)
            .unwrap();
        assert!(!timelock.is_queued(&queued.tx_hash));
    }

    #[test]
    fn test_two_step_admin_transfer() {
        let mut timelock = Timelock::new(admin(), 2 * DAY).unwrap();

        assert!(timelock.set_pending_admin(&ctx(stranger(), START), stranger()).is_err());
        timelock.set_pending_admin(&ctx(admin(), START), stranger()).unwrap();
        assert!(timelock.admin_initialized);

        // Only the pending admin may accept
        assert!(timelock.accept_admin(&ctx(admin(), START)).is_err());
        let event = timelock.accept_admin(&ctx(stranger(), START)).unwrap();
        assert_eq!(event.new_admin, stranger());
        assert_eq!(timelock.admin, stranger());
        assert!(timelock.pending_admin.is_zero());

        // After bootstrap, even the admin has to go through the queue
        let err = timelock
            .set_pending_admin(&ctx(stranger(), START), admin())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Timelock::setPendingAdmin: Call must come from Timelock."
        );
    }

    #[test]
    fn test_set_delay_only_from_self() {
        let mut timelock = Timelock::new(admin(), 2 * DAY).unwrap();
        assert!(timelock.set_delay(&ctx(admin(), START), 3 * DAY).is_err());

        let self_ctx = CallContext::new(this(), this(), BlockEnv::new(1, START));
        assert_eq!(
            timelock.set_delay(&self_ctx, DAY).unwrap_err(),
            TimelockError::DelayBelowMinimum { op: "setDelay" }
        );
        timelock.set_delay(&self_ctx, 3 * DAY).unwrap();
        assert_eq!(timelock.delay, 3 * DAY);
    }

    #[test]
    fn test_queued_self_call_changes_delay() {
        let mut timelock = Timelock::new(admin(), 2 * DAY).unwrap();
        let eta = START + 2 * DAY;
        let call = Call::encode(this(), signatures::SET_DELAY, &(5 * DAY)).unwrap();
        timelock
            .queue_transaction(&ctx(admin(), START), call.clone(), eta)
            .unwrap();

        let mut host = StubHost::new(false);
        timelock
            .execute_transaction(&ctx(admin(), eta), call, eta, &mut host)
            .unwrap();

        assert_eq!(timelock.delay, 5 * DAY);
        assert_eq!(host.calls.get(), 0);
        assert_eq!(host.logs.len(), 1);
        assert_eq!(host.logs[0].name, "NewDelay");
    }
}
