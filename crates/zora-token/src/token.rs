//! Zoracles ERC20 token with Compound-style vote delegation.

use std::collections::HashMap;

use borsh::{BorshDeserialize, BorshSerialize};
use tracing::{debug, info};
use zora_types::Address;
use zora_vm::{abi, emit, CallContext, Contract, ExecutionError, Host};

use crate::checkpoints::Checkpoints;
use crate::config::TokenConfig;
use crate::error::TokenError;
use crate::events::{Approval, DelegateChanged, OwnershipTransferred, Transfer};
use crate::signatures;

/// Token contract state.
///
/// Voting power belongs to delegates, not holders: a balance only counts
/// once its holder has called `delegate` (possibly to themselves).
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct VotingToken {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: u128,
    pub balances: HashMap<Address, u128>,
    /// (owner, spender) -> amount
    pub allowances: HashMap<(Address, Address), u128>,
    pub owner: Address,
    pub delegates: HashMap<Address, Address>,
    pub checkpoints: HashMap<Address, Checkpoints>,
}

impl VotingToken {
    /// Deploy with `config.initial_supply` minted to `deployer`, who becomes owner.
    pub fn new(config: &TokenConfig, deployer: Address) -> Result<Self, TokenError> {
        config.validate()?;

        let supply = u128::from(config.initial_supply);
        let mut balances = HashMap::new();
        balances.insert(deployer, supply);

        Ok(Self {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            total_supply: supply,
            balances,
            allowances: HashMap::new(),
            owner: deployer,
            delegates: HashMap::new(),
            checkpoints: HashMap::new(),
        })
    }

    pub fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    /// Current delegate of `account`, zero if it never delegated.
    pub fn delegates(&self, account: Address) -> Address {
        self.delegates.get(&account).copied().unwrap_or(Address::ZERO)
    }

    pub fn current_votes(&self, account: Address) -> u128 {
        self.checkpoints
            .get(&account)
            .map(Checkpoints::latest)
            .unwrap_or(0)
    }

    pub fn num_checkpoints(&self, account: Address) -> u32 {
        self.checkpoints
            .get(&account)
            .map(|c| c.len() as u32)
            .unwrap_or(0)
    }

    /// Votes `account` held at the end of `block_number`. Only finalized
    /// blocks can be queried.
    pub fn prior_votes(
        &self,
        account: Address,
        block_number: u64,
        current_block: u64,
    ) -> Result<u128, TokenError> {
        if block_number >= current_block {
            return Err(TokenError::VotesNotYetDetermined);
        }
        Ok(self
            .checkpoints
            .get(&account)
            .map(|c| c.at(block_number))
            .unwrap_or(0))
    }

    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        to: Address,
        amount: u128,
    ) -> Result<Transfer, TokenError> {
        self.move_tokens(ctx.caller, to, amount, ctx.env.number)
    }

    pub fn approve(
        &mut self,
        ctx: &CallContext,
        spender: Address,
        amount: u128,
    ) -> Result<Approval, TokenError> {
        if spender.is_zero() {
            return Err(TokenError::ApproveToZero);
        }
        self.allowances.insert((ctx.caller, spender), amount);
        Ok(Approval {
            owner: ctx.caller,
            spender,
            value: amount,
        })
    }

    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<Transfer, TokenError> {
        if self.balance_of(from) < amount {
            return Err(TokenError::InsufficientBalance);
        }
        let remaining = self
            .allowance(from, ctx.caller)
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance)?;

        let event = self.move_tokens(from, to, amount, ctx.env.number)?;
        self.allowances.insert((from, ctx.caller), remaining);
        Ok(event)
    }

    /// Owner-only issuance; credits the recipient's delegate.
    pub fn mint(
        &mut self,
        ctx: &CallContext,
        to: Address,
        amount: u128,
    ) -> Result<Transfer, TokenError> {
        self.only_owner(ctx.caller)?;
        if to.is_zero() {
            return Err(TokenError::MintToZero);
        }

        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.move_delegates(Address::ZERO, self.delegates(to), amount, ctx.env.number)?;

        self.total_supply = supply;
        self.balances.insert(to, balance);

        info!(%to, amount, total_supply = supply, "tokens minted");
        Ok(Transfer {
            from: Address::ZERO,
            to,
            value: amount,
        })
    }

    pub fn transfer_ownership(
        &mut self,
        ctx: &CallContext,
        new_owner: Address,
    ) -> Result<OwnershipTransferred, TokenError> {
        self.only_owner(ctx.caller)?;
        if new_owner.is_zero() {
            return Err(TokenError::NewOwnerIsZero);
        }

        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        info!(%previous_owner, %new_owner, "token ownership transferred");
        Ok(OwnershipTransferred {
            previous_owner,
            new_owner,
        })
    }

    /// Move the caller's entire voting weight to `delegatee`.
    pub fn delegate(
        &mut self,
        ctx: &CallContext,
        delegatee: Address,
    ) -> Result<DelegateChanged, TokenError> {
        let delegator = ctx.caller;
        let from_delegate = self.delegates(delegator);
        self.move_delegates(
            from_delegate,
            delegatee,
            self.balance_of(delegator),
            ctx.env.number,
        )?;
        self.delegates.insert(delegator, delegatee);

        debug!(%delegator, %from_delegate, to_delegate = %delegatee, "delegate changed");
        Ok(DelegateChanged {
            delegator,
            from_delegate,
            to_delegate: delegatee,
        })
    }

    fn only_owner(&self, caller: Address) -> Result<(), TokenError> {
        if caller != self.owner {
            return Err(TokenError::NotOwner);
        }
        Ok(())
    }

    fn move_tokens(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
        block: u64,
    ) -> Result<Transfer, TokenError> {
        if from.is_zero() {
            return Err(TokenError::TransferFromZero);
        }
        if to.is_zero() {
            return Err(TokenError::TransferToZero);
        }

        let from_balance = self
            .balance_of(from)
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance)?;
        self.balances.insert(from, from_balance);
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(to, to_balance);

        self.move_delegates(self.delegates(from), self.delegates(to), amount, block)?;

        Ok(Transfer {
            from,
            to,
            value: amount,
        })
    }

    fn move_delegates(
        &mut self,
        src: Address,
        dst: Address,
        amount: u128,
        block: u64,
    ) -> Result<(), TokenError> {
        if src == dst || amount == 0 {
            return Ok(());
        }

        if !src.is_zero() {
            let old = self.current_votes(src);
            let new = old.checked_sub(amount).ok_or(TokenError::Overflow)?;
            self.checkpoints.entry(src).or_default().write(block, new);
            debug!(delegate = %src, old, new, "delegate votes changed");
        }
        if !dst.is_zero() {
            let old = self.current_votes(dst);
            let new = old.checked_add(amount).ok_or(TokenError::Overflow)?;
            self.checkpoints.entry(dst).or_default().write(block, new);
            debug!(delegate = %dst, old, new, "delegate votes changed");
        }
        Ok(())
    }
}

impl Contract for VotingToken {
    fn name(&self) -> &'static str {
        "VotingToken"
    }

    fn dispatch(
        &mut self,
        ctx: &CallContext,
        signature: &str,
        data: &[u8],
        host: &mut dyn Host,
    ) -> Result<Vec<u8>, ExecutionError> {
        match signature {
            signatures::NAME => abi::encode(&self.name),
            signatures::SYMBOL => abi::encode(&self.symbol),
            signatures::DECIMALS => abi::encode(&self.decimals),
            signatures::TOTAL_SUPPLY => abi::encode(&self.total_supply),
            signatures::OWNER => abi::encode(&self.owner),
            signatures::BALANCE_OF => {
                let account: Address = abi::decode(signature, data)?;
                abi::encode(&self.balance_of(account))
            }
            signatures::ALLOWANCE => {
                let (owner, spender): (Address, Address) = abi::decode(signature, data)?;
                abi::encode(&self.allowance(owner, spender))
            }
            signatures::DELEGATES => {
                let account: Address = abi::decode(signature, data)?;
                abi::encode(&self.delegates(account))
            }
            signatures::GET_CURRENT_VOTES => {
                let account: Address = abi::decode(signature, data)?;
                abi::encode(&self.current_votes(account))
            }
            signatures::GET_PRIOR_VOTES => {
                let (account, block): (Address, u64) = abi::decode(signature, data)?;
                abi::encode(&self.prior_votes(account, block, ctx.env.number)?)
            }
            signatures::NUM_CHECKPOINTS => {
                let account: Address = abi::decode(signature, data)?;
                abi::encode(&self.num_checkpoints(account))
            }
            signatures::TRANSFER => {
                let (to, amount): (Address, u128) = abi::decode(signature, data)?;
                let event = self.transfer(ctx, to, amount)?;
                emit(host, ctx.this, &event)?;
                abi::encode(&true)
            }
            signatures::APPROVE => {
                let (spender, amount): (Address, u128) = abi::decode(signature, data)?;
                let event = self.approve(ctx, spender, amount)?;
                emit(host, ctx.this, &event)?;
                abi::encode(&true)
            }
            signatures::TRANSFER_FROM => {
                let (from, to, amount): (Address, Address, u128) = abi::decode(signature, data)?;
                let event = self.transfer_from(ctx, from, to, amount)?;
                emit(host, ctx.this, &event)?;
                abi::encode(&true)
            }
            signatures::MINT => {
                let (to, amount): (Address, u128) = abi::decode(signature, data)?;
                let event = self.mint(ctx, to, amount)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::TRANSFER_OWNERSHIP => {
                let new_owner: Address = abi::decode(signature, data)?;
                let event = self.transfer_ownership(ctx, new_owner)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::DELEGATE => {
                let delegatee: Address = abi::decode(signature, data)?;
                let event = self.delegate(ctx, delegatee)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            _ => Err(ExecutionError::UnknownFunction {
                contract: self.name().to_string(),
                signature: signature.to_string(),
            }),
        }
    }
}
