use thiserror::Error;
use zora_types::Address;

/// Errors raised while dispatching a call. Contract errors cross contract
/// boundaries as `Reverted`, carrying the contract's own message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Execution reverted: {reason}")]
    Reverted { reason: String },

    #[error("Reentrancy violation: {0}")]
    ReentrancyViolation(String),

    #[error("Call depth exceeded: {depth}")]
    CallDepthExceeded { depth: usize },

    #[error("Contract not found: {0}")]
    ContractNotFound(Address),

    #[error("Contract at {0} is not of the requested type")]
    ContractTypeMismatch(Address),

    #[error("{contract}: unknown function {signature}")]
    UnknownFunction { contract: String, signature: String },

    #[error("Invalid calldata for {signature}: {reason}")]
    InvalidCalldata { signature: String, reason: String },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Insufficient balance: {address} has {available}, needs {required}")]
    InsufficientBalance {
        address: Address,
        available: u128,
        required: u128,
    },

    #[error("Balance overflow")]
    BalanceOverflow,
}

impl ExecutionError {
    /// Build a revert from any displayable contract error.
    pub fn revert(reason: impl ToString) -> Self {
        ExecutionError::Reverted {
            reason: reason.to_string(),
        }
    }

    /// The innermost revert message, or the error text for runtime failures.
    pub fn reason(&self) -> String {
        match self {
            ExecutionError::Reverted { reason } => reason.clone(),
            other => other.to_string(),
        }
    }
}
