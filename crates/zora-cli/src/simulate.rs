//! In-memory rehearsal of a governance mint.
//!
//! Deploys the token, timelock and governor, hands the timelock to the
//! governor and drives one mint proposal to execution.

use tabled::Tabled;
use tracing::info;
use zora_governance::{signatures as gov, Governor, ProposalActions, ProposalState};
use zora_timelock::{signatures as timelock, Timelock};
use zora_token::{signatures as token, VotingToken};
use zora_types::Address;
use zora_vm::{abi, Runtime};

use crate::config::DeploymentConfig;

/// Amount the simulated proposal mints to the deployer.
pub const MINT_AMOUNT: u128 = 100;

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct Transition {
    pub step: String,
    pub block: u64,
    pub timestamp: u64,
    pub state: ProposalState,
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub proposal_id: u64,
    pub quorum_votes: u128,
    pub proposal_threshold: u128,
    pub supply_before: u128,
    pub supply_after: u128,
    pub transitions: Vec<Transition>,
}

struct Simulation {
    rt: Runtime,
    token: Address,
    gov: Address,
    deployer: Address,
    transitions: Vec<Transition>,
}

impl Simulation {
    fn send<A: borsh::BorshSerialize>(
        &mut self,
        from: Address,
        target: Address,
        signature: &str,
        args: &A,
    ) -> anyhow::Result<zora_vm::Receipt> {
        let call = abi::call(target, signature, args)?;
        Ok(self.rt.transact(from, call)?)
    }

    fn query<A: borsh::BorshSerialize, R: borsh::BorshDeserialize>(
        &mut self,
        target: Address,
        signature: &str,
        args: &A,
    ) -> anyhow::Result<R> {
        let call = abi::call(target, signature, args)?;
        Ok(self.rt.query(self.deployer, &call)?)
    }

    fn record(&mut self, step: &str, id: u64) -> anyhow::Result<()> {
        let state: ProposalState = self.query(self.gov, gov::STATE, &id)?;
        let env = self.rt.env();
        info!(step, proposal_id = id, %state, block = env.number, timestamp = env.timestamp, "proposal transition");
        self.transitions.push(Transition {
            step: step.to_string(),
            block: env.number,
            timestamp: env.timestamp,
            state,
        });
        Ok(())
    }
}

pub fn run(config: &DeploymentConfig) -> anyhow::Result<SimulationReport> {
    config.validate()?;

    let deployer = Address::from_label("deployer");
    let proposer = Address::from_label("proposer");

    let mut rt = Runtime::default();
    let token_addr = rt.deploy(deployer, VotingToken::new(&config.token, deployer)?);
    let timelock_addr = rt.deploy(deployer, Timelock::from_config(deployer, &config.timelock)?);
    let gov_addr = rt.deploy(deployer, Governor::new(config.governor.clone())?);
    info!(token = %token_addr, timelock = %timelock_addr, governor = %gov_addr, "contracts deployed");

    let mut sim = Simulation {
        rt,
        token: token_addr,
        gov: gov_addr,
        deployer,
        transitions: Vec::new(),
    };

    sim.send(deployer, gov_addr, gov::INITIALIZE, &(timelock_addr, token_addr, deployer))?;
    sim.send(deployer, timelock_addr, timelock::SET_PENDING_ADMIN, &gov_addr)?;
    sim.send(deployer, gov_addr, gov::ACCEPT_ADMIN, &())?;
    sim.send(deployer, token_addr, token::TRANSFER_OWNERSHIP, &timelock_addr)?;

    let quorum_votes: u128 = sim.query(gov_addr, gov::QUORUM_VOTES, &())?;
    let proposal_threshold: u128 = sim.query(gov_addr, gov::PROPOSAL_THRESHOLD, &())?;

    // One holder carries both the threshold and the quorum alone
    let stake = quorum_votes.max(proposal_threshold.saturating_add(1));
    sim.send(deployer, token_addr, token::TRANSFER, &(proposer, stake))?;
    sim.send(proposer, token_addr, token::DELEGATE, &proposer)?;
    sim.rt.advance_blocks(1);

    let supply_before: u128 = sim.query(token_addr, token::TOTAL_SUPPLY, &())?;
    let mint = abi::call(sim.token, token::MINT, &(deployer, MINT_AMOUNT))?;
    let actions = ProposalActions::from_calls([mint]);
    let id: u64 = sim
        .send(proposer, gov_addr, gov::PROPOSE, &(actions, "Mint Token".to_string()))?
        .decode_output()?;
    sim.record("propose", id)?;

    sim.rt.advance_blocks(config.governor.voting_delay + 1);
    sim.record("voting opens", id)?;
    sim.send(proposer, gov_addr, gov::CAST_VOTE, &(id, true))?;

    sim.rt.advance_blocks(config.governor.voting_period);
    sim.record("voting closes", id)?;

    sim.send(deployer, gov_addr, gov::QUEUE, &id)?;
    sim.record("queue", id)?;

    sim.rt.advance_time(config.timelock.delay);
    sim.send(deployer, gov_addr, gov::EXECUTE, &id)?;
    sim.record("execute", id)?;

    let supply_after: u128 = sim.query(token_addr, token::TOTAL_SUPPLY, &())?;
    anyhow::ensure!(
        supply_after == supply_before + MINT_AMOUNT,
        "mint did not take effect: supply {} -> {}",
        supply_before,
        supply_after
    );

    Ok(SimulationReport {
        proposal_id: id,
        quorum_votes,
        proposal_threshold,
        supply_before,
        supply_after,
        transitions: sim.transitions,
    })
}
