use thiserror::Error;
use zora_vm::ExecutionError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelockError {
    #[error("Timelock::{op}: Call must come from {required}.")]
    Unauthorized {
        op: &'static str,
        required: &'static str,
    },

    #[error("Timelock::{op}: Delay must exceed minimum delay.")]
    DelayBelowMinimum { op: &'static str },

    #[error("Timelock::{op}: Delay must not exceed maximum delay.")]
    DelayAboveMaximum { op: &'static str },

    #[error("Timelock::queueTransaction: Estimated execution block must satisfy delay.")]
    DelayNotSatisfied,

    #[error("Timelock::executeTransaction: Transaction hasn't been queued.")]
    NotQueued,

    #[error("Timelock::executeTransaction: Transaction hasn't surpassed time lock.")]
    TimelockNotSurpassed,

    #[error("Timelock::executeTransaction: Transaction is stale.")]
    StaleTransaction,

    #[error("Timelock: timestamp overflow")]
    Overflow,

    /// The queued call itself failed.
    #[error("{0}")]
    Call(#[from] ExecutionError),
}

impl From<TimelockError> for ExecutionError {
    fn from(e: TimelockError) -> Self {
        match e {
            TimelockError::Call(inner) => inner,
            other => ExecutionError::revert(other),
        }
    }
}
