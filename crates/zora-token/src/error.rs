use thiserror::Error;
use zora_vm::ExecutionError;

/// Token failures. Messages follow the ERC20/Ownable revert strings callers
/// already match on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    #[error("ERC20: transfer amount exceeds balance")]
    InsufficientBalance,

    #[error("ERC20: transfer amount exceeds allowance")]
    InsufficientAllowance,

    #[error("ERC20: transfer from the zero address")]
    TransferFromZero,

    #[error("ERC20: transfer to the zero address")]
    TransferToZero,

    #[error("ERC20: approve to the zero address")]
    ApproveToZero,

    #[error("ERC20: mint to the zero address")]
    MintToZero,

    #[error("Ownable: caller is not the owner")]
    NotOwner,

    #[error("Ownable: new owner is the zero address")]
    NewOwnerIsZero,

    #[error("Zoracles::getPriorVotes: not yet determined")]
    VotesNotYetDetermined,

    #[error("Zoracles: arithmetic overflow")]
    Overflow,

    #[error("Invalid token config: {0}")]
    InvalidConfig(String),
}

impl From<TokenError> for ExecutionError {
    fn from(e: TokenError) -> Self {
        ExecutionError::revert(e)
    }
}
