//! Governor contract.

use std::collections::{BTreeMap, HashMap};

use borsh::{BorshDeserialize, BorshSerialize};
use tracing::{debug, info, warn};
use zora_timelock::{transaction_hash, GRACE_PERIOD};
use zora_types::{Address, BlockEnv, Call};
use zora_vm::{abi, emit, CallContext, Contract, ExecutionError, Host};

use crate::config::GovernorConfig;
use crate::error::GovernanceError;
use crate::events::{ProposalCanceled, ProposalCreated, ProposalExecuted, ProposalQueued, VoteCast};
use crate::interfaces::{TimelockClient, TokenClient};
use crate::proposal::{Proposal, ProposalActions, ProposalState, Receipt};
use crate::signatures;

/// Governor contract state.
///
/// Deployed empty; [`Governor::initialize`] wires it to a token and a
/// timelock and freezes quorum and threshold from the supply at that moment.
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct Governor {
    pub config: GovernorConfig,
    pub timelock: Address,
    pub token: Address,
    /// May cancel any proposal and manage the timelock admin handover
    pub guardian: Address,
    pub initialized: bool,
    pub quorum_votes: u128,
    pub proposal_threshold: u128,
    pub proposal_count: u64,
    pub proposals: BTreeMap<u64, Proposal>,
    pub latest_proposal_ids: HashMap<Address, u64>,
}

impl Governor {
    pub fn new(config: GovernorConfig) -> Result<Self, GovernanceError> {
        config.validate()?;
        Ok(Self {
            config,
            timelock: Address::ZERO,
            token: Address::ZERO,
            guardian: Address::ZERO,
            initialized: false,
            quorum_votes: 0,
            proposal_threshold: 0,
            proposal_count: 0,
            proposals: BTreeMap::new(),
            latest_proposal_ids: HashMap::new(),
        })
    }

    /// One-time wiring. Reads the token supply to fix quorum and threshold.
    pub fn initialize(
        &mut self,
        ctx: &CallContext,
        host: &mut dyn Host,
        timelock: Address,
        token: Address,
        guardian: Address,
    ) -> Result<(), GovernanceError> {
        if self.initialized {
            return Err(GovernanceError::AlreadyInitialized);
        }

        let total_supply = TokenClient(token).total_supply(host, ctx.this)?;
        self.quorum_votes = self.config.quorum_votes(total_supply)?;
        self.proposal_threshold = self.config.proposal_threshold(total_supply)?;
        self.timelock = timelock;
        self.token = token;
        self.guardian = guardian;
        self.initialized = true;

        info!(
            %timelock,
            %token,
            %guardian,
            quorum_votes = self.quorum_votes,
            proposal_threshold = self.proposal_threshold,
            "governor initialized"
        );
        Ok(())
    }

    pub fn proposal(&self, proposal_id: u64) -> Option<&Proposal> {
        self.proposals.get(&proposal_id)
    }

    pub fn latest_proposal_id(&self, proposer: &Address) -> u64 {
        self.latest_proposal_ids.get(proposer).copied().unwrap_or(0)
    }

    pub fn state(&self, proposal_id: u64, env: BlockEnv) -> Result<ProposalState, GovernanceError> {
        let proposal = self.get(proposal_id)?;
        Ok(proposal.state(env, self.quorum_votes, GRACE_PERIOD))
    }

    pub fn get_actions(&self, proposal_id: u64) -> Result<Vec<Call>, GovernanceError> {
        Ok(self.get(proposal_id)?.actions())
    }

    pub fn get_receipt(&self, proposal_id: u64, voter: &Address) -> Result<Receipt, GovernanceError> {
        Ok(self.get(proposal_id)?.receipt(voter))
    }

    /// Open a new proposal. Voting starts `voting_delay` blocks from now.
    pub fn propose(
        &mut self,
        ctx: &CallContext,
        host: &mut dyn Host,
        actions: ProposalActions,
        description: String,
    ) -> Result<ProposalCreated, GovernanceError> {
        self.ensure_initialized()?;
        let proposer = ctx.caller;

        let votes = self.token().prior_votes(
            host,
            ctx.this,
            proposer,
            ctx.env.number.saturating_sub(1),
        )?;
        if votes <= self.proposal_threshold {
            return Err(GovernanceError::InsufficientVotingPower);
        }
        if !actions.is_consistent() {
            return Err(GovernanceError::InvalidProposal(
                "proposal function information arity mismatch",
            ));
        }
        if actions.is_empty() {
            return Err(GovernanceError::InvalidProposal("must provide actions"));
        }
        if actions.len() > self.config.max_operations {
            return Err(GovernanceError::InvalidProposal("too many actions"));
        }

        if let Some(latest) = self.latest_proposal_ids.get(&proposer) {
            let state = self.state(*latest, ctx.env)?;
            if state.is_live() {
                return Err(GovernanceError::ProposerHasLiveProposal(state));
            }
        }

        let start_block = ctx
            .env
            .number
            .checked_add(self.config.voting_delay)
            .ok_or(GovernanceError::Overflow)?;
        let end_block = start_block
            .checked_add(self.config.voting_period)
            .ok_or(GovernanceError::Overflow)?;
        let id = self
            .proposal_count
            .checked_add(1)
            .ok_or(GovernanceError::Overflow)?;

        let ProposalActions {
            targets,
            values,
            signatures,
            calldatas,
        } = actions;

        self.proposal_count = id;
        self.latest_proposal_ids.insert(proposer, id);
        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer,
                eta: 0,
                targets: targets.clone(),
                values: values.clone(),
                signatures: signatures.clone(),
                calldatas: calldatas.clone(),
                start_block,
                end_block,
                for_votes: 0,
                against_votes: 0,
                canceled: false,
                executed: false,
                description: description.clone(),
                receipts: HashMap::new(),
            },
        );

        info!(id, %proposer, start_block, end_block, actions = targets.len(), "proposal created");
        Ok(ProposalCreated {
            id,
            proposer,
            targets,
            values,
            signatures,
            calldatas,
            start_block,
            end_block,
            description,
        })
    }

    /// Vote with the weight the caller had at the proposal's start block.
    pub fn cast_vote(
        &mut self,
        ctx: &CallContext,
        host: &mut dyn Host,
        proposal_id: u64,
        support: bool,
    ) -> Result<VoteCast, GovernanceError> {
        self.ensure_initialized()?;
        let voter = ctx.caller;

        if self.state(proposal_id, ctx.env)? != ProposalState::Active {
            return Err(GovernanceError::VotingClosed);
        }
        let start_block = self.get(proposal_id)?.start_block;
        if self.get(proposal_id)?.receipt(&voter).has_voted {
            return Err(GovernanceError::AlreadyVoted);
        }

        let votes = self.token().prior_votes(host, ctx.this, voter, start_block)?;

        let proposal = self.get_mut(proposal_id)?;
        if support {
            proposal.for_votes = proposal
                .for_votes
                .checked_add(votes)
                .ok_or(GovernanceError::Overflow)?;
        } else {
            proposal.against_votes = proposal
                .against_votes
                .checked_add(votes)
                .ok_or(GovernanceError::Overflow)?;
        }
        proposal.receipts.insert(
            voter,
            Receipt {
                has_voted: true,
                support,
                votes,
            },
        );

        debug!(proposal_id, %voter, support, votes, "vote cast");
        Ok(VoteCast {
            voter,
            proposal_id,
            support,
            votes,
        })
    }

    /// Hand a succeeded proposal's calls to the timelock.
    pub fn queue(
        &mut self,
        ctx: &CallContext,
        host: &mut dyn Host,
        proposal_id: u64,
    ) -> Result<ProposalQueued, GovernanceError> {
        self.ensure_initialized()?;
        if self.state(proposal_id, ctx.env)? != ProposalState::Succeeded {
            return Err(GovernanceError::ProposalNotSucceeded);
        }

        let timelock = self.timelock();
        let delay = timelock.delay(host, ctx.this)?;
        let eta = ctx
            .env
            .timestamp
            .checked_add(delay)
            .ok_or(GovernanceError::Overflow)?;

        for action in self.get(proposal_id)?.actions() {
            if timelock.is_queued(host, ctx.this, transaction_hash(&action, eta))? {
                return Err(GovernanceError::ActionAlreadyQueued);
            }
            timelock.queue_transaction(host, ctx.this, &action, eta)?;
        }

        self.get_mut(proposal_id)?.eta = eta;
        info!(proposal_id, eta, "proposal queued");
        Ok(ProposalQueued { id: proposal_id, eta })
    }

    /// Run every call of a queued proposal through the timelock, all or
    /// nothing. Value attached to this call funds actions that carry value.
    pub fn execute(
        &mut self,
        ctx: &CallContext,
        host: &mut dyn Host,
        proposal_id: u64,
    ) -> Result<ProposalExecuted, GovernanceError> {
        self.ensure_initialized()?;
        if self.state(proposal_id, ctx.env)? != ProposalState::Queued {
            return Err(GovernanceError::ProposalNotQueued);
        }

        let timelock = self.timelock();
        let proposal = self.get_mut(proposal_id)?;
        proposal.executed = true;
        let eta = proposal.eta;
        let actions = proposal.actions();

        for action in &actions {
            if let Err(e) = timelock.execute_transaction(host, ctx.this, action, eta) {
                warn!(proposal_id, target = %action.target, signature = %action.signature, error = %e, "proposal action failed");
                self.get_mut(proposal_id)?.executed = false;
                return Err(e.into());
            }
        }

        info!(proposal_id, "proposal executed");
        Ok(ProposalExecuted { id: proposal_id })
    }

    /// Cancel a proposal that has not been executed.
    ///
    /// Anyone may cancel once the proposer has fallen below the threshold;
    /// the guardian may cancel at any time.
    pub fn cancel(
        &mut self,
        ctx: &CallContext,
        host: &mut dyn Host,
        proposal_id: u64,
    ) -> Result<ProposalCanceled, GovernanceError> {
        self.ensure_initialized()?;
        let state = self.state(proposal_id, ctx.env)?;
        if !matches!(
            state,
            ProposalState::Pending
                | ProposalState::Active
                | ProposalState::Succeeded
                | ProposalState::Queued
        ) {
            return Err(GovernanceError::CannotCancel(state));
        }

        let proposer = self.get(proposal_id)?.proposer;
        if ctx.caller != self.guardian {
            let votes = self.token().prior_votes(
                host,
                ctx.this,
                proposer,
                ctx.env.number.saturating_sub(1),
            )?;
            if votes >= self.proposal_threshold {
                return Err(GovernanceError::ProposerAboveThreshold);
            }
        }

        let timelock = self.timelock();
        let proposal = self.get_mut(proposal_id)?;
        proposal.canceled = true;
        let eta = proposal.eta;
        let actions = proposal.actions();

        if eta != 0 {
            for action in &actions {
                timelock.cancel_transaction(host, ctx.this, action, eta)?;
            }
        }

        info!(proposal_id, canceled_by = %ctx.caller, "proposal canceled");
        Ok(ProposalCanceled { id: proposal_id })
    }

    /// Accept the timelock admin role offered to this governor.
    pub fn accept_admin(&mut self, ctx: &CallContext, host: &mut dyn Host) -> Result<(), GovernanceError> {
        self.ensure_initialized()?;
        self.only_guardian(ctx, "__acceptAdmin")?;
        self.timelock().accept_admin(host, ctx.this)?;
        info!(timelock = %self.timelock, "governor accepted timelock admin");
        Ok(())
    }

    /// Give up the guardian role for good.
    pub fn abdicate(&mut self, ctx: &CallContext) -> Result<(), GovernanceError> {
        self.ensure_initialized()?;
        self.only_guardian(ctx, "__abdicate")?;
        info!(guardian = %self.guardian, "guardian abdicated");
        self.guardian = Address::ZERO;
        Ok(())
    }

    pub fn queue_set_timelock_pending_admin(
        &mut self,
        ctx: &CallContext,
        host: &mut dyn Host,
        new_pending_admin: Address,
        eta: u64,
    ) -> Result<(), GovernanceError> {
        self.ensure_initialized()?;
        self.only_guardian(ctx, "__queueSetTimelockPendingAdmin")?;
        let timelock = self.timelock();
        let call = timelock.set_pending_admin_call(new_pending_admin)?;
        timelock.queue_transaction(host, ctx.this, &call, eta)?;
        Ok(())
    }

    pub fn execute_set_timelock_pending_admin(
        &mut self,
        ctx: &CallContext,
        host: &mut dyn Host,
        new_pending_admin: Address,
        eta: u64,
    ) -> Result<(), GovernanceError> {
        self.ensure_initialized()?;
        self.only_guardian(ctx, "__executeSetTimelockPendingAdmin")?;
        let timelock = self.timelock();
        let call = timelock.set_pending_admin_call(new_pending_admin)?;
        timelock.execute_transaction(host, ctx.this, &call, eta)?;
        Ok(())
    }

    fn get(&self, proposal_id: u64) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))
    }

    fn get_mut(&mut self, proposal_id: u64) -> Result<&mut Proposal, GovernanceError> {
        self.proposals
            .get_mut(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))
    }

    fn token(&self) -> TokenClient {
        TokenClient(self.token)
    }

    fn timelock(&self) -> TimelockClient {
        TimelockClient(self.timelock)
    }

    fn ensure_initialized(&self) -> Result<(), GovernanceError> {
        if !self.initialized {
            return Err(GovernanceError::NotInitialized);
        }
        Ok(())
    }

    fn only_guardian(&self, ctx: &CallContext, op: &'static str) -> Result<(), GovernanceError> {
        if ctx.caller != self.guardian {
            return Err(GovernanceError::NotGuardian(op));
        }
        Ok(())
    }
}

impl Contract for Governor {
    fn name(&self) -> &'static str {
        "GovernorAlpha"
    }

    fn dispatch(
        &mut self,
        ctx: &CallContext,
        signature: &str,
        data: &[u8],
        host: &mut dyn Host,
    ) -> Result<Vec<u8>, ExecutionError> {
        match signature {
            signatures::INITIALIZE => {
                let (timelock, token, guardian): (Address, Address, Address) =
                    abi::decode(signature, data)?;
                self.initialize(ctx, host, timelock, token, guardian)?;
                Ok(Vec::new())
            }
            signatures::PROPOSE => {
                let (actions, description): (ProposalActions, String) = abi::decode(signature, data)?;
                let event = self.propose(ctx, host, actions, description)?;
                let id = event.id;
                emit(host, ctx.this, &event)?;
                abi::encode(&id)
            }
            signatures::CAST_VOTE => {
                let (proposal_id, support): (u64, bool) = abi::decode(signature, data)?;
                let event = self.cast_vote(ctx, host, proposal_id, support)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::QUEUE => {
                let proposal_id: u64 = abi::decode(signature, data)?;
                let event = self.queue(ctx, host, proposal_id)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::EXECUTE => {
                let proposal_id: u64 = abi::decode(signature, data)?;
                let event = self.execute(ctx, host, proposal_id)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::CANCEL => {
                let proposal_id: u64 = abi::decode(signature, data)?;
                let event = self.cancel(ctx, host, proposal_id)?;
                emit(host, ctx.this, &event)?;
                Ok(Vec::new())
            }
            signatures::ACCEPT_ADMIN => {
                abi::decode::<()>(signature, data)?;
                self.accept_admin(ctx, host)?;
                Ok(Vec::new())
            }
            signatures::ABDICATE => {
                abi::decode::<()>(signature, data)?;
                self.abdicate(ctx)?;
                Ok(Vec::new())
            }
            signatures::QUEUE_SET_TIMELOCK_PENDING_ADMIN => {
                let (pending_admin, eta): (Address, u64) = abi::decode(signature, data)?;
                self.queue_set_timelock_pending_admin(ctx, host, pending_admin, eta)?;
                Ok(Vec::new())
            }
            signatures::EXECUTE_SET_TIMELOCK_PENDING_ADMIN => {
                let (pending_admin, eta): (Address, u64) = abi::decode(signature, data)?;
                self.execute_set_timelock_pending_admin(ctx, host, pending_admin, eta)?;
                Ok(Vec::new())
            }
            signatures::STATE => {
                let proposal_id: u64 = abi::decode(signature, data)?;
                abi::encode(&self.state(proposal_id, ctx.env)?)
            }
            signatures::QUORUM_VOTES => abi::encode(&self.quorum_votes),
            signatures::PROPOSAL_THRESHOLD => abi::encode(&self.proposal_threshold),
            signatures::PROPOSAL_MAX_OPERATIONS => abi::encode(&(self.config.max_operations as u64)),
            signatures::VOTING_DELAY => abi::encode(&self.config.voting_delay),
            signatures::VOTING_PERIOD => abi::encode(&self.config.voting_period),
            signatures::PROPOSAL_COUNT => abi::encode(&self.proposal_count),
            signatures::LATEST_PROPOSAL_IDS => {
                let proposer: Address = abi::decode(signature, data)?;
                abi::encode(&self.latest_proposal_id(&proposer))
            }
            signatures::GET_ACTIONS => {
                let proposal_id: u64 = abi::decode(signature, data)?;
                abi::encode(&ProposalActions::from_calls(self.get_actions(proposal_id)?))
            }
            signatures::GET_RECEIPT => {
                let (proposal_id, voter): (u64, Address) = abi::decode(signature, data)?;
                abi::encode(&self.get_receipt(proposal_id, &voter)?)
            }
            signatures::GUARDIAN => abi::encode(&self.guardian),
            signatures::TIMELOCK => abi::encode(&self.timelock),
            signatures::TOKEN => abi::encode(&self.token),
            _ => Err(ExecutionError::UnknownFunction {
                contract: self.name().to_string(),
                signature: signature.to_string(),
            }),
        }
    }
}
