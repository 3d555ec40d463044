//! In-process runtime that owns contracts and executes transactions.
//!
//! Contracts are plain Rust values registered under an address. Calls are
//! dispatched by textual signature with borsh-encoded arguments. A top-level
//! transaction either completes or is rolled back in full.

use std::any::Any;
use std::collections::HashMap;

use borsh::{BorshDeserialize, BorshSerialize};
use tracing::{debug, info, warn};
use zora_types::{Address, BlockEnv, Call};

use crate::error::ExecutionError;
use crate::reentrancy::ReentrancyGuard;
use crate::DEFAULT_BLOCK_TIME;

/// Execution context for a contract call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallContext {
    /// Immediate caller (account or contract)
    pub caller: Address,
    /// Address of the contract being called
    pub this: Address,
    /// Account that started the transaction
    pub origin: Address,
    /// Native value sent with the call
    pub value: u128,
    pub env: BlockEnv,
}

impl CallContext {
    pub fn new(caller: Address, this: Address, env: BlockEnv) -> Self {
        Self {
            caller,
            this,
            origin: caller,
            value: 0,
            env,
        }
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }

    pub fn with_origin(mut self, origin: Address) -> Self {
        self.origin = origin;
        self
    }
}

/// What a running contract can see of the chain.
pub trait Host {
    fn env(&self) -> BlockEnv;

    /// Call another contract (or send value to an account) as `from`.
    fn call(&mut self, from: Address, call: &Call) -> Result<Vec<u8>, ExecutionError>;

    fn emit(&mut self, log: Log);
}

/// A typed contract event.
pub trait Event: BorshSerialize + BorshDeserialize {
    const NAME: &'static str;
}

/// An emitted event, kept only if the enclosing transaction succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub name: String,
    pub data: Vec<u8>,
}

impl Log {
    pub fn new<E: Event>(address: Address, event: &E) -> Result<Self, ExecutionError> {
        Ok(Self {
            address,
            name: E::NAME.to_string(),
            data: borsh::to_vec(event).map_err(|e| ExecutionError::Encoding(e.to_string()))?,
        })
    }

    pub fn decode<E: Event>(&self) -> Option<E> {
        if self.name != E::NAME {
            return None;
        }
        borsh::from_slice(&self.data).ok()
    }
}

/// Emit a typed event from `address`.
pub fn emit<E: Event>(host: &mut dyn Host, address: Address, event: &E) -> Result<(), ExecutionError> {
    host.emit(Log::new(address, event)?);
    Ok(())
}

/// Outcome of a successful transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Receipt {
    pub output: Vec<u8>,
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn decode_output<T: BorshDeserialize>(&self) -> Result<T, ExecutionError> {
        borsh::from_slice(&self.output).map_err(|e| ExecutionError::Encoding(e.to_string()))
    }

    /// All events of type `E`, in emission order.
    pub fn events<E: Event>(&self) -> Vec<E> {
        self.logs.iter().filter_map(Log::decode).collect()
    }
}

pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub trait ContractClone {
    fn clone_box(&self) -> Box<dyn Contract>;
}

impl<T: Contract + Clone> ContractClone for T {
    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}

/// A deployed contract. `dispatch` routes a call by its signature.
pub trait Contract: AsAny + ContractClone + 'static {
    fn name(&self) -> &'static str;

    fn dispatch(
        &mut self,
        ctx: &CallContext,
        signature: &str,
        data: &[u8],
        host: &mut dyn Host,
    ) -> Result<Vec<u8>, ExecutionError>;
}

struct Snapshot {
    contracts: HashMap<Address, Box<dyn Contract>>,
    balances: HashMap<Address, u128>,
}

/// Owns every contract and native balance, supplies block height and time.
pub struct Runtime {
    env: BlockEnv,
    block_time: u64,
    contracts: HashMap<Address, Box<dyn Contract>>,
    balances: HashMap<Address, u128>,
    nonces: HashMap<Address, u64>,
    guard: ReentrancyGuard,
    logs: Vec<Log>,
}

impl Runtime {
    pub fn new(env: BlockEnv) -> Self {
        Self {
            env,
            block_time: DEFAULT_BLOCK_TIME,
            contracts: HashMap::new(),
            balances: HashMap::new(),
            nonces: HashMap::new(),
            guard: ReentrancyGuard::new(),
            logs: Vec::new(),
        }
    }

    pub fn with_block_time(mut self, seconds: u64) -> Self {
        self.block_time = seconds;
        self
    }

    pub fn env(&self) -> BlockEnv {
        self.env
    }

    pub fn set_env(&mut self, env: BlockEnv) {
        self.env = env;
    }

    pub fn advance_blocks(&mut self, count: u64) {
        self.env.advance_blocks(count, self.block_time);
    }

    pub fn advance_time(&mut self, seconds: u64) {
        self.env.advance_time(seconds);
    }

    /// Register `contract` at a fresh address derived from the deployer.
    pub fn deploy<C: Contract>(&mut self, deployer: Address, contract: C) -> Address {
        let nonce = self.nonces.entry(deployer).or_insert(0);
        let address = Address::derive(&deployer, *nonce);
        *nonce += 1;

        info!(contract = contract.name(), %address, %deployer, "contract deployed");
        self.contracts.insert(address, Box::new(contract));
        address
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    /// Credit native units to `address` outside of any transaction.
    pub fn fund(&mut self, address: Address, amount: u128) -> Result<(), ExecutionError> {
        let balance = self.balances.entry(address).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(ExecutionError::BalanceOverflow)?;
        Ok(())
    }

    pub fn balance(&self, address: &Address) -> u128 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// Run a top-level transaction by signature.
    pub fn transact(&mut self, from: Address, call: Call) -> Result<Receipt, ExecutionError> {
        let snapshot = self.snapshot();
        let result = self.call(from, &call);
        let (output, logs) = self.settle(snapshot, result)?;
        Ok(Receipt { output, logs })
    }

    /// Run a top-level transaction against a contract of known type, calling
    /// into it directly so its own error type reaches the caller.
    pub fn transact_with<C, R, E>(
        &mut self,
        from: Address,
        to: Address,
        f: impl FnOnce(&mut C, &CallContext, &mut dyn Host) -> Result<R, E>,
    ) -> Result<(R, Vec<Log>), E>
    where
        C: Contract,
        E: From<ExecutionError> + std::fmt::Display,
    {
        self.transact_with_value(from, to, 0, f)
    }

    pub fn transact_with_value<C, R, E>(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
        f: impl FnOnce(&mut C, &CallContext, &mut dyn Host) -> Result<R, E>,
    ) -> Result<(R, Vec<Log>), E>
    where
        C: Contract,
        E: From<ExecutionError> + std::fmt::Display,
    {
        let snapshot = self.snapshot();
        let result = self.enter_typed(from, to, value, f);
        self.settle(snapshot, result)
    }

    /// Execute `call` and discard every effect, returning only its output.
    pub fn static_call(&mut self, from: Address, call: &Call) -> Result<Vec<u8>, ExecutionError> {
        let snapshot = self.snapshot();
        let result = self.call(from, call);
        self.restore(snapshot);
        result
    }

    /// Decoded form of [`Runtime::static_call`].
    pub fn query<R: BorshDeserialize>(&mut self, from: Address, call: &Call) -> Result<R, ExecutionError> {
        let output = self.static_call(from, call)?;
        borsh::from_slice(&output).map_err(|e| ExecutionError::Encoding(e.to_string()))
    }

    /// Read a contract's state directly.
    pub fn view<C: Contract, R>(
        &self,
        address: Address,
        f: impl FnOnce(&C) -> R,
    ) -> Result<R, ExecutionError> {
        let boxed = self
            .contracts
            .get(&address)
            .ok_or(ExecutionError::ContractNotFound(address))?;
        let contract: &dyn Contract = &**boxed;
        contract
            .as_any()
            .downcast_ref::<C>()
            .map(f)
            .ok_or(ExecutionError::ContractTypeMismatch(address))
    }

    fn enter_typed<C, R, E>(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
        f: impl FnOnce(&mut C, &CallContext, &mut dyn Host) -> Result<R, E>,
    ) -> Result<R, E>
    where
        C: Contract,
        E: From<ExecutionError>,
    {
        self.guard.enter(to, from, value)?;
        let outcome = self.run_typed(from, to, value, f);
        let exited = self.guard.exit();
        let output = outcome?;
        exited?;
        Ok(output)
    }

    fn run_typed<C, R, E>(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
        f: impl FnOnce(&mut C, &CallContext, &mut dyn Host) -> Result<R, E>,
    ) -> Result<R, E>
    where
        C: Contract,
        E: From<ExecutionError>,
    {
        self.transfer_value(from, to, value)?;
        let mut boxed = self
            .contracts
            .remove(&to)
            .ok_or(ExecutionError::ContractNotFound(to))?;
        let ctx = self.context(from, to, value);

        let contract: &mut dyn Contract = &mut *boxed;
        let result = match contract.as_any_mut().downcast_mut::<C>() {
            Some(typed) => f(typed, &ctx, self),
            None => Err(ExecutionError::ContractTypeMismatch(to).into()),
        };

        self.contracts.insert(to, boxed);
        result
    }

    fn dispatch(&mut self, from: Address, call: &Call) -> Result<Vec<u8>, ExecutionError> {
        self.transfer_value(from, call.target, call.value)?;

        let Some(mut contract) = self.contracts.remove(&call.target) else {
            if call.is_transfer() {
                return Ok(Vec::new());
            }
            return Err(ExecutionError::ContractNotFound(call.target));
        };

        let ctx = self.context(from, call.target, call.value);
        debug!(
            contract = contract.name(),
            signature = %call.signature,
            caller = %from,
            value = call.value,
            "dispatch"
        );
        let result = contract.dispatch(&ctx, &call.signature, &call.data, self);

        self.contracts.insert(call.target, contract);
        result
    }

    fn context(&self, from: Address, to: Address, value: u128) -> CallContext {
        CallContext::new(from, to, self.env)
            .with_value(value)
            .with_origin(self.guard.origin().unwrap_or(from))
    }

    fn transfer_value(&mut self, from: Address, to: Address, value: u128) -> Result<(), ExecutionError> {
        if value == 0 {
            return Ok(());
        }

        let available = self.balance(&from);
        if available < value {
            return Err(ExecutionError::InsufficientBalance {
                address: from,
                available,
                required: value,
            });
        }
        let credited = self
            .balance(&to)
            .checked_add(value)
            .ok_or(ExecutionError::BalanceOverflow)?;

        self.balances.insert(from, available - value);
        self.balances.insert(to, credited);
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            contracts: self
                .contracts
                .iter()
                .map(|(address, contract)| (*address, (**contract).clone_box()))
                .collect(),
            balances: self.balances.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.contracts = snapshot.contracts;
        self.balances = snapshot.balances;
        self.logs.clear();
        self.guard.reset();
    }

    fn settle<T, E: std::fmt::Display>(
        &mut self,
        snapshot: Snapshot,
        result: Result<T, E>,
    ) -> Result<(T, Vec<Log>), E> {
        match result {
            Ok(value) => Ok((value, std::mem::take(&mut self.logs))),
            Err(e) => {
                warn!(error = %e, "transaction reverted, state rolled back");
                self.restore(snapshot);
                Err(e)
            }
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(BlockEnv::new(1, 1_600_000_000))
    }
}

impl Host for Runtime {
    fn env(&self) -> BlockEnv {
        self.env
    }

    fn call(&mut self, from: Address, call: &Call) -> Result<Vec<u8>, ExecutionError> {
        self.guard.enter(call.target, from, call.value)?;
        let outcome = self.dispatch(from, call);
        let exited = self.guard.exit();
        let output = outcome?;
        exited?;
        Ok(output)
    }

    fn emit(&mut self, log: Log) {
        self.logs.push(log);
    }
}
