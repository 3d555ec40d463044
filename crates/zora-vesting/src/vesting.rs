//! Vesting contract.

use std::collections::HashMap;

use borsh::{BorshDeserialize, BorshSerialize};
use tracing::info;
use zora_types::Address;
use zora_vm::{abi, emit, CallContext, Contract, ExecutionError, Host};

use crate::error::VestingError;
use crate::events::{Deposited, Withdrawn};
use crate::schedule::VestingInfo;
use crate::signatures;

const TRANSFER: &str = "transfer(address,uint256)";
const TRANSFER_FROM: &str = "transferFrom(address,address,uint256)";

/// Vesting contract state. Holds the deposited tokens until release.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct Vesting {
    pub token: Address,
    pub infos: HashMap<Address, VestingInfo>,
    /// Sum of every deposit ever made
    pub total_tokens_vested: u128,
}

impl Vesting {
    pub fn new(token: Address) -> Self {
        Self {
            token,
            infos: HashMap::new(),
            total_tokens_vested: 0,
        }
    }

    /// The beneficiary's schedule, all zeros when there is none.
    pub fn address_info(&self, beneficiary: &Address) -> VestingInfo {
        self.infos.get(beneficiary).cloned().unwrap_or_default()
    }

    pub fn available_tokens(&self, beneficiary: &Address, now: u64) -> u128 {
        self.infos
            .get(beneficiary)
            .map(|info| info.available(now))
            .unwrap_or(0)
    }

    pub fn tokens_already_withdrawn(&self, beneficiary: &Address) -> u128 {
        self.infos
            .get(beneficiary)
            .map(|info| info.tokens_already_withdrawn)
            .unwrap_or(0)
    }

    /// Pull `amount` from the caller's allowance and lock it for `beneficiary`.
    pub fn deposit(
        &mut self,
        ctx: &CallContext,
        host: &mut dyn Host,
        beneficiary: Address,
        amount: u128,
        cliff_days: u64,
        vesting_days: u64,
    ) -> Result<Deposited, VestingError> {
        if self.address_info(&beneficiary).exists() {
            return Err(VestingError::DuplicateBeneficiary);
        }
        let info = VestingInfo::new(amount, cliff_days, vesting_days, ctx.env.timestamp)?;
        let total = self
            .total_tokens_vested
            .checked_add(amount)
            .ok_or(VestingError::Overflow)?;

        let pull = abi::call(self.token, TRANSFER_FROM, &(ctx.caller, ctx.this, amount))?;
        abi::invoke::<bool>(host, ctx.this, &pull).map_err(VestingError::from_pull)?;

        info!(
            depositor = %ctx.caller,
            %beneficiary,
            amount,
            cliff_days,
            vesting_days,
            per_day = info.withdrawal_per_day,
            "tokens deposited for vesting"
        );
        self.infos.insert(beneficiary, info);
        self.total_tokens_vested = total;

        Ok(Deposited {
            depositor: ctx.caller,
            beneficiary,
            amount,
            cliff_period: cliff_days,
            vesting_period: vesting_days,
        })
    }

    /// Send the caller everything released so far and not yet withdrawn.
    pub fn withdraw(&mut self, ctx: &CallContext, host: &mut dyn Host) -> Result<Withdrawn, VestingError> {
        let beneficiary = ctx.caller;
        let now = ctx.env.timestamp;
        let token = self.token;

        let info = self
            .infos
            .get_mut(&beneficiary)
            .filter(|info| info.exists())
            .ok_or(VestingError::NoVestedTokens)?;
        if !info.cliff_passed(now) {
            return Err(VestingError::CliffNotElapsed);
        }

        let amount = info.available(now);
        info.tokens_already_withdrawn = info
            .tokens_already_withdrawn
            .checked_add(amount)
            .ok_or(VestingError::Overflow)?;
        let withdrawn = info.tokens_already_withdrawn;

        let payout = abi::call(token, TRANSFER, &(beneficiary, amount))?;
        abi::invoke::<bool>(host, ctx.this, &payout)?;

        info!(%beneficiary, amount, withdrawn, "vested tokens withdrawn");
        Ok(Withdrawn {
            beneficiary,
            amount,
        })
    }
}

impl Contract for Vesting {
    fn name(&self) -> &'static str {
        "Vesting"
    }

    fn dispatch(
        &mut self,
        ctx: &CallContext,
        signature: &str,
        data: &[u8],
        host: &mut dyn Host,
    ) -> Result<Vec<u8>, ExecutionError> {
        match signature {
            signatures::TOKEN => abi::encode(&self.token),
            signatures::DEPOSIT => {
                let (beneficiary, amount, cliff_days, vesting_days): (Address, u128, u64, u64) =
                    abi::decode(signature, data)?;
                let event = self.deposit(ctx, host, beneficiary, amount, cliff_days, vesting_days)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::WITHDRAW => {
                abi::decode::<()>(signature, data)?;
                let event = self.withdraw(ctx, host)?;
                let amount = event.amount;
                emit(host, ctx.this, &event)?;
                abi::encode(&amount)
            }
            signatures::GET_AVAILABLE_TOKENS => {
                let beneficiary: Address = abi::decode(signature, data)?;
                abi::encode(&self.available_tokens(&beneficiary, ctx.env.timestamp))
            }
            signatures::ADDRESS_INFO => {
                let beneficiary: Address = abi::decode(signature, data)?;
                abi::encode(&self.address_info(&beneficiary))
            }
            signatures::TOTAL_TOKENS_VESTED => abi::encode(&self.total_tokens_vested),
            signatures::TOKENS_ALREADY_WITHDRAWN => {
                let beneficiary: Address = abi::decode(signature, data)?;
                abi::encode(&self.tokens_already_withdrawn(&beneficiary))
            }
            _ => Err(ExecutionError::UnknownFunction {
                contract: self.name().to_string(),
                signature: signature.to_string(),
            }),
        }
    }
}
