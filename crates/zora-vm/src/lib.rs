//! Zora VM - in-process runtime the Zoracles contracts execute on.
//!
//! This crate provides:
//! - `Contract` and `Host`, the seam between contracts and the chain
//! - `Runtime`, which owns contracts and balances and dispatches calls by signature
//! - Reentrancy protection and call-depth limits
//! - Transaction atomicity: a failed transaction leaves no state behind
//! - Borsh helpers for call parameters and return values

pub mod abi;
pub mod error;
pub mod reentrancy;
pub mod runtime;

pub use error::ExecutionError;
pub use reentrancy::{CallFrame, ReentrancyGuard};
pub use runtime::{
    emit, CallContext, Contract, ContractClone, AsAny, Event, Host, Log, Receipt, Runtime,
};

/// Maximum nested call depth
pub const MAX_CALL_DEPTH: usize = 64;

/// Seconds added per mined block unless configured otherwise
pub const DEFAULT_BLOCK_TIME: u64 = 13;
