use thiserror::Error;
use zora_vm::ExecutionError;

/// Revert reason of the token's `transferFrom` when the allowance is short.
const ALLOWANCE_REVERT: &str = "ERC20: transfer amount exceeds allowance";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VestingError {
    #[error("Vesting: You don't have any vested token")]
    NoVestedTokens,

    #[error("Vesting: Cliff period is not over yet")]
    CliffNotElapsed,

    #[error("Vesting: Beneficiary already have vested token. Use another address")]
    DuplicateBeneficiary,

    #[error("Vesting: Amount must be greater than zero")]
    ZeroAmount,

    #[error("Vesting: Vesting period must be at least one day")]
    InvalidVestingPeriod,

    #[error("ERC20: transfer amount exceeds allowance")]
    AllowanceExceeded,

    #[error("Vesting: arithmetic overflow")]
    Overflow,

    /// The token call failed for any other reason.
    #[error("{0}")]
    Call(#[from] ExecutionError),
}

impl From<VestingError> for ExecutionError {
    fn from(e: VestingError) -> Self {
        match e {
            VestingError::Call(inner) => inner,
            other => ExecutionError::revert(other),
        }
    }
}

impl VestingError {
    /// Classify a failed `transferFrom` pull.
    pub(crate) fn from_pull(e: ExecutionError) -> Self {
        match &e {
            ExecutionError::Reverted { reason } if reason == ALLOWANCE_REVERT => {
                VestingError::AllowanceExceeded
            }
            _ => VestingError::Call(e),
        }
    }
}
