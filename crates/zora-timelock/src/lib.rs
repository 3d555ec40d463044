//! Timelock: a queue of calls that may only run after a fixed delay.
//!
//! The admin (the governor, once bootstrapped) queues a call with an `eta`.
//! The call can be executed once `eta` has passed and until the grace period
//! runs out. Every queued call is identified by [`transaction_hash`].

pub mod config;
pub mod error;
pub mod events;
pub mod timelock;

pub use config::TimelockConfig;
pub use error::TimelockError;
pub use timelock::{transaction_hash, Timelock};

use zora_types::DAY;

/// Window after `eta` during which a queued call can still run.
pub const GRACE_PERIOD: u64 = 14 * DAY;

pub const MINIMUM_DELAY: u64 = 2 * DAY;

pub const MAXIMUM_DELAY: u64 = 30 * DAY;

/// Call signatures understood by [`Timelock`].
pub mod signatures {
    pub const ADMIN: &str = "admin()";
    pub const PENDING_ADMIN: &str = "pendingAdmin()";
    pub const DELAY: &str = "delay()";
    pub const GRACE_PERIOD: &str = "GRACE_PERIOD()";
    pub const MINIMUM_DELAY: &str = "MINIMUM_DELAY()";
    pub const MAXIMUM_DELAY: &str = "MAXIMUM_DELAY()";
    pub const QUEUED_TRANSACTIONS: &str = "queuedTransactions(bytes32)";
    pub const SET_DELAY: &str = "setDelay(uint256)";
    pub const ACCEPT_ADMIN: &str = "acceptAdmin()";
    pub const SET_PENDING_ADMIN: &str = "setPendingAdmin(address)";
    pub const QUEUE_TRANSACTION: &str = "queueTransaction(address,uint256,string,bytes,uint256)";
    pub const CANCEL_TRANSACTION: &str = "cancelTransaction(address,uint256,string,bytes,uint256)";
    pub const EXECUTE_TRANSACTION: &str = "executeTransaction(address,uint256,string,bytes,uint256)";
}
