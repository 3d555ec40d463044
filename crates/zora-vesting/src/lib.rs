//! Zora Vesting - per-beneficiary linear release of deposited tokens.
//!
//! A depositor locks tokens for a beneficiary. Nothing can be withdrawn
//! before the cliff; afterwards `amount / period` tokens unlock for every
//! whole day since the deposit, and the full amount once the period is over.

pub mod error;
pub mod events;
pub mod schedule;
pub mod vesting;

pub use error::VestingError;
pub use schedule::VestingInfo;
pub use vesting::Vesting;

/// Call signatures understood by [`Vesting`].
pub mod signatures {
    pub const TOKEN: &str = "token()";
    pub const DEPOSIT: &str = "deposit(address,uint256,uint256,uint256)";
    pub const WITHDRAW: &str = "withdraw()";
    pub const GET_AVAILABLE_TOKENS: &str = "getAvailableTokens(address)";
    pub const ADDRESS_INFO: &str = "addressInfo(address)";
    pub const TOTAL_TOKENS_VESTED: &str = "totalTokensVested()";
    pub const TOKENS_ALREADY_WITHDRAWN: &str = "tokensAlreadyWithdrawn(address)";
}
