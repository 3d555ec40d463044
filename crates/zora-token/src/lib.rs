//! Zoracles voting token.
//!
//! The governance and vesting contracts only ever talk to the token through
//! its call surface (see [`signatures`]); this crate is the reference
//! implementation they are deployed against.
//!
//! - ERC20 balances and allowances
//! - `Ownable` minting, so the timelock can mint once it owns the token
//! - Delegated voting power with per-block checkpoints (`getPriorVotes`)

pub mod checkpoints;
pub mod config;
pub mod error;
pub mod events;
pub mod token;

pub use checkpoints::{Checkpoint, Checkpoints};
pub use config::TokenConfig;
pub use error::TokenError;
pub use token::VotingToken;

/// Call signatures understood by [`VotingToken`].
pub mod signatures {
    pub const NAME: &str = "name()";
    pub const SYMBOL: &str = "symbol()";
    pub const DECIMALS: &str = "decimals()";
    pub const TOTAL_SUPPLY: &str = "totalSupply()";
    pub const BALANCE_OF: &str = "balanceOf(address)";
    pub const ALLOWANCE: &str = "allowance(address,address)";
    pub const TRANSFER: &str = "transfer(address,uint256)";
    pub const APPROVE: &str = "approve(address,uint256)";
    pub const TRANSFER_FROM: &str = "transferFrom(address,address,uint256)";
    pub const OWNER: &str = "owner()";
    pub const TRANSFER_OWNERSHIP: &str = "transferOwnership(address)";
    pub const MINT: &str = "mint(address,uint256)";
    pub const DELEGATE: &str = "delegate(address)";
    pub const DELEGATES: &str = "delegates(address)";
    pub const GET_CURRENT_VOTES: &str = "getCurrentVotes(address)";
    pub const GET_PRIOR_VOTES: &str = "getPriorVotes(address,uint256)";
    pub const NUM_CHECKPOINTS: &str = "numCheckpoints(address)";
}
