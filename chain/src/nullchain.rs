//! Nullable chain — a deterministic in-memory stand-in for a forked chain.
//!
//! Holds just enough DAO state to execute omnibus vote scripts call by
//! call: token balances, the permission set, node-operator records, repo
//! version history, deposit-module state, and vote records. Time and block
//! height only advance when a test tells them to, nothing touches the
//! network or the filesystem, and every transaction yields the same typed
//! events a forked chain would.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::{SolCall, SolValue};

use omnibus_script::{decode_call_script, EvmCall};
use omnibus_types::{AppVersion, Permission, Role, VoteId};

use crate::client::{ChainClient, ChainEvent, Receipt, TxRequest};
use crate::contracts::abi;
use crate::deployment::Deployment;
use crate::error::ChainError;

/// Voting window of the simulated Voting app, in seconds (72 h).
pub const VOTE_TIME: u64 = 72 * 60 * 60;

/// Required yea share of cast ballots, in percent.
const SUPPORT_REQUIRED_PCT: u128 = 50;
/// Required yea share of the snapshot supply, in percent.
const MIN_ACCEPT_QUORUM_PCT: u128 = 5;

const GENESIS_TIME: u64 = 1_650_000_000;

#[derive(Clone, Debug)]
struct VoteRecord {
    script: Vec<u8>,
    metadata: String,
    start_time: u64,
    snapshot_supply: u128,
    yea: u128,
    nay: u128,
    executed: bool,
    voters: HashSet<Address>,
}

impl VoteRecord {
    fn closed(&self, now: u64) -> bool {
        now >= self.start_time + VOTE_TIME
    }

    fn accepted(&self) -> bool {
        let cast = self.yea + self.nay;
        cast > 0
            && self.yea * 100 > cast * SUPPORT_REQUIRED_PCT
            && self.yea * 100 >= self.snapshot_supply * MIN_ACCEPT_QUORUM_PCT
    }
}

#[derive(Clone, Debug)]
struct NodeOperator {
    name: String,
    reward_address: Address,
    staking_limit: u64,
    active: bool,
}

#[derive(Clone, Debug)]
struct RepoVersion {
    version: AppVersion,
    contract: Address,
    content_uri: Vec<u8>,
}

#[derive(Clone, Debug)]
struct DepositModule {
    owner: Address,
    last_deposit_block: u64,
}

#[derive(Debug, Default)]
struct State {
    now: u64,
    block: u64,
    nonce: u64,
    tx_count: u64,
    /// (token, holder) → balance in smallest units.
    balances: HashMap<(Address, Address), u128>,
    supplies: HashMap<Address, u128>,
    permissions: HashSet<(Address, Address, B256)>,
    operators: HashMap<u64, NodeOperator>,
    repos: HashMap<Address, Vec<RepoVersion>>,
    deposit_modules: HashMap<Address, DepositModule>,
    votes: Vec<VoteRecord>,
}

/// The in-memory chain double.
pub struct NullChain {
    deployment: Deployment,
    state: RefCell<State>,
}

impl NullChain {
    pub fn new(deployment: Deployment) -> Self {
        let state = State {
            now: GENESIS_TIME,
            block: 1,
            ..State::default()
        };
        Self {
            deployment,
            state: RefCell::new(state),
        }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    // ── Genesis setup ──────────────────────────────────────────────────

    pub fn set_token_balance(&self, token: Address, holder: Address, raw: u128) {
        self.state
            .borrow_mut()
            .balances
            .insert((token, holder), raw);
    }

    pub fn set_total_supply(&self, token: Address, raw: u128) {
        self.state.borrow_mut().supplies.insert(token, raw);
    }

    pub fn grant_genesis_permission(&self, permission: &Permission) {
        self.state.borrow_mut().permissions.insert((
            permission.entity,
            permission.app,
            permission.role.hash(),
        ));
    }

    pub fn add_node_operator(&self, id: u64, name: &str, reward_address: Address, limit: u64) {
        self.state.borrow_mut().operators.insert(
            id,
            NodeOperator {
                name: name.to_string(),
                reward_address,
                staking_limit: limit,
                active: true,
            },
        );
    }

    pub fn seed_app_version(
        &self,
        repo: Address,
        version: AppVersion,
        contract: Address,
        content_uri: &[u8],
    ) {
        self.state
            .borrow_mut()
            .repos
            .entry(repo)
            .or_default()
            .push(RepoVersion {
                version,
                contract,
                content_uri: content_uri.to_vec(),
            });
    }

    pub fn register_deposit_module(&self, module: Address, owner: Address, last_deposit_block: u64) {
        self.state.borrow_mut().deposit_modules.insert(
            module,
            DepositModule {
                owner,
                last_deposit_block,
            },
        );
    }

    // ── Test observation ───────────────────────────────────────────────

    pub fn vote_count(&self) -> usize {
        self.state.borrow().votes.len()
    }

    pub fn tx_count(&self) -> u64 {
        self.state.borrow().tx_count
    }

    pub fn token_balance(&self, token: Address, holder: Address) -> u128 {
        self.state
            .borrow()
            .balances
            .get(&(token, holder))
            .copied()
            .unwrap_or(0)
    }

    // ── Execution ──────────────────────────────────────────────────────

    fn selector(calldata: &[u8]) -> Result<[u8; 4], ChainError> {
        calldata
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| ChainError::AbiDecode("calldata shorter than a selector".into()))
    }

    fn new_vote(
        &self,
        st: &mut State,
        sender: Address,
        origin: Address,
        call: abi::Voting::newVoteCall,
        events: &mut Vec<ChainEvent>,
    ) -> Result<(), ChainError> {
        if sender != self.deployment.token_manager {
            return Err(ChainError::Revert(
                "voting: sender cannot create votes".into(),
            ));
        }
        let vote_id = st.votes.len() as u64;
        let snapshot_supply = st
            .supplies
            .get(&self.deployment.gov_token)
            .copied()
            .unwrap_or(0);
        st.votes.push(VoteRecord {
            script: call.executionScript.to_vec(),
            metadata: call.metadata.clone(),
            start_time: st.now,
            snapshot_supply,
            yea: 0,
            nay: 0,
            executed: false,
            voters: HashSet::new(),
        });
        events.push(ChainEvent::StartVote {
            vote_id: VoteId::new(vote_id),
            creator: origin,
            metadata: call.metadata,
        });
        Ok(())
    }

    fn cast_vote(
        &self,
        st: &mut State,
        voter: Address,
        call: abi::Voting::voteCall,
        events: &mut Vec<ChainEvent>,
    ) -> Result<(), ChainError> {
        let vote_id = u64::try_from(call.voteId)
            .map_err(|_| ChainError::Revert("voting: no such vote".into()))?;
        let stake = st
            .balances
            .get(&(self.deployment.gov_token, voter))
            .copied()
            .unwrap_or(0);
        let now = st.now;
        let vote = st
            .votes
            .get_mut(vote_id as usize)
            .ok_or_else(|| ChainError::Revert("voting: no such vote".into()))?;
        if vote.executed || vote.closed(now) {
            return Err(ChainError::Revert("voting: vote closed".into()));
        }
        if stake == 0 {
            return Err(ChainError::Revert("voting: no voting power".into()));
        }
        if !vote.voters.insert(voter) {
            return Err(ChainError::Revert("voting: already voted".into()));
        }
        if call.supports {
            vote.yea += stake;
        } else {
            vote.nay += stake;
        }
        events.push(ChainEvent::CastVote {
            vote_id: VoteId::new(vote_id),
            voter,
            supports: call.supports,
            stake,
        });
        Ok(())
    }

    fn execute_vote(
        &self,
        st: &mut State,
        origin: Address,
        call: abi::Voting::executeVoteCall,
        events: &mut Vec<ChainEvent>,
    ) -> Result<(), ChainError> {
        let vote_id = u64::try_from(call.voteId)
            .map_err(|_| ChainError::Revert("voting: no such vote".into()))?;
        let (script, metadata) = {
            let now = st.now;
            let vote = st
                .votes
                .get(vote_id as usize)
                .ok_or_else(|| ChainError::Revert("voting: no such vote".into()))?;
            if vote.executed {
                return Err(ChainError::Revert("voting: already executed".into()));
            }
            if !vote.closed(now) {
                return Err(ChainError::Revert("voting: vote still open".into()));
            }
            if !vote.accepted() {
                return Err(ChainError::Revert("voting: vote not accepted".into()));
            }
            (vote.script.clone(), vote.metadata.clone())
        };
        tracing::debug!(vote_id, %metadata, "executing vote script");

        for item in decode_call_script(&script)? {
            events.push(ChainEvent::ScriptCall {
                sender: origin,
                app: self.deployment.voting,
                target: item.target,
            });
            self.execute_script_call(st, self.deployment.voting, origin, &item, events)?;
        }
        st.votes[vote_id as usize].executed = true;
        events.push(ChainEvent::ExecuteVote {
            vote_id: VoteId::new(vote_id),
        });
        Ok(())
    }

    /// Execute one script item with `sender` as the acting app.
    fn execute_script_call(
        &self,
        st: &mut State,
        sender: Address,
        origin: Address,
        item: &EvmCall,
        events: &mut Vec<ChainEvent>,
    ) -> Result<(), ChainError> {
        let d = &self.deployment;
        let sel = Self::selector(&item.calldata)?;
        let decode_err = |e: alloy_sol_types::Error| ChainError::AbiDecode(e.to_string());

        if item.target == d.voting {
            if sel == abi::Voting::newVoteCall::SELECTOR {
                let call =
                    abi::Voting::newVoteCall::abi_decode(&item.calldata, true).map_err(decode_err)?;
                return self.new_vote(st, sender, origin, call, events);
            }
            return Err(ChainError::Revert("voting: unsupported script call".into()));
        }

        if item.target == d.finance {
            if sel != abi::Finance::newImmediatePaymentCall::SELECTOR {
                return Err(ChainError::Revert("finance: unsupported script call".into()));
            }
            let call = abi::Finance::newImmediatePaymentCall::abi_decode(&item.calldata, true)
                .map_err(decode_err)?;
            let amount = u128::try_from(call.amount)
                .map_err(|_| ChainError::Revert("finance: amount out of range".into()))?;
            if amount == 0 {
                return Err(ChainError::Revert("finance: zero payment".into()));
            }
            let treasury_key = (call.token, d.treasury);
            let held = st.balances.get(&treasury_key).copied().unwrap_or(0);
            if held < amount {
                return Err(ChainError::Revert(
                    "finance: insufficient treasury balance".into(),
                ));
            }
            st.balances.insert(treasury_key, held - amount);
            *st.balances.entry((call.token, call.receiver)).or_insert(0) += amount;
            events.push(ChainEvent::Transfer {
                token: call.token,
                from: d.treasury,
                to: call.receiver,
                value: amount,
            });
            events.push(ChainEvent::NewTransaction {
                entity: call.receiver,
                amount,
                reference: call.reference,
            });
            return Ok(());
        }

        if item.target == d.acl {
            if sel == abi::ACL::grantPermissionCall::SELECTOR {
                let call = abi::ACL::grantPermissionCall::abi_decode(&item.calldata, true)
                    .map_err(decode_err)?;
                let key = (call.entity, call.app, call.role);
                if !st.permissions.insert(key) {
                    return Err(ChainError::Revert("acl: permission already granted".into()));
                }
                events.push(ChainEvent::SetPermission {
                    entity: call.entity,
                    app: call.app,
                    role: Role::from_hash(call.role),
                    allowed: true,
                });
                return Ok(());
            }
            if sel == abi::ACL::revokePermissionCall::SELECTOR {
                let call = abi::ACL::revokePermissionCall::abi_decode(&item.calldata, true)
                    .map_err(decode_err)?;
                let key = (call.entity, call.app, call.role);
                if !st.permissions.remove(&key) {
                    return Err(ChainError::Revert("acl: permission not granted".into()));
                }
                events.push(ChainEvent::SetPermission {
                    entity: call.entity,
                    app: call.app,
                    role: Role::from_hash(call.role),
                    allowed: false,
                });
                return Ok(());
            }
            return Err(ChainError::Revert("acl: unsupported script call".into()));
        }

        if item.target == d.node_operators_registry {
            if sel != abi::NodeOperatorsRegistry::setNodeOperatorStakingLimitCall::SELECTOR {
                return Err(ChainError::Revert(
                    "registry: unsupported script call".into(),
                ));
            }
            let call = abi::NodeOperatorsRegistry::setNodeOperatorStakingLimitCall::abi_decode(
                &item.calldata,
                true,
            )
            .map_err(decode_err)?;
            let id = u64::try_from(call.id)
                .map_err(|_| ChainError::Revert("registry: unknown node operator".into()))?;
            let operator = st
                .operators
                .get_mut(&id)
                .ok_or_else(|| ChainError::Revert("registry: unknown node operator".into()))?;
            operator.staking_limit = call.stakingLimit;
            events.push(ChainEvent::StakingLimitSet {
                operator_id: id,
                limit: call.stakingLimit,
            });
            return Ok(());
        }

        if let Some(versions) = st.repos.get_mut(&item.target) {
            if sel != abi::Repo::newVersionCall::SELECTOR {
                return Err(ChainError::Revert("repo: unsupported script call".into()));
            }
            let call =
                abi::Repo::newVersionCall::abi_decode(&item.calldata, true).map_err(decode_err)?;
            let next = AppVersion::from_array(call.newSemanticVersion);
            if let Some(latest) = versions.last() {
                if !latest.version.is_valid_bump(&next) {
                    return Err(ChainError::Revert("repo: invalid version bump".into()));
                }
            }
            versions.push(RepoVersion {
                version: next,
                contract: call.contractAddress,
                content_uri: call.contentURI.to_vec(),
            });
            events.push(ChainEvent::NewVersion {
                repo: item.target,
                version: next,
            });
            return Ok(());
        }

        if let Some(module) = st.deposit_modules.get_mut(&item.target) {
            if sel != abi::DepositSecurityModule::setLastDepositBlockCall::SELECTOR {
                return Err(ChainError::Revert(
                    "deposit module: unsupported script call".into(),
                ));
            }
            if sender != module.owner {
                return Err(ChainError::Revert(
                    "deposit module: sender is not the owner".into(),
                ));
            }
            let call = abi::DepositSecurityModule::setLastDepositBlockCall::abi_decode(
                &item.calldata,
                true,
            )
            .map_err(decode_err)?;
            module.last_deposit_block = u64::try_from(call.lastDepositBlock)
                .map_err(|_| ChainError::Revert("deposit module: block out of range".into()))?;
            return Ok(());
        }

        Err(ChainError::UnknownTarget(item.target))
    }
}

impl ChainClient for NullChain {
    fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let st = self.state.borrow();
        let d = &self.deployment;
        let sel = Self::selector(data)?;

        if to == d.voting {
            if sel == abi::Voting::voteTimeCall::SELECTOR {
                return Ok(VOTE_TIME.abi_encode());
            }
            if sel == abi::Voting::votesLengthCall::SELECTOR {
                return Ok(U256::from(st.votes.len()).abi_encode());
            }
            if sel == abi::Voting::canExecuteCall::SELECTOR {
                let call = abi::Voting::canExecuteCall::abi_decode(data, true)
                    .map_err(|e| ChainError::AbiDecode(e.to_string()))?;
                let executable = u64::try_from(call.voteId)
                    .ok()
                    .and_then(|id| st.votes.get(id as usize))
                    .map(|v| !v.executed && v.closed(st.now) && v.accepted())
                    .unwrap_or(false);
                return Ok(executable.abi_encode());
            }
        }
        if to == d.acl && sel == abi::ACL::hasPermissionCall::SELECTOR {
            let call = abi::ACL::hasPermissionCall::abi_decode(data, true)
                .map_err(|e| ChainError::AbiDecode(e.to_string()))?;
            let held = st
                .permissions
                .contains(&(call.entity, call.app, call.role));
            return Ok(held.abi_encode());
        }
        if let Some(versions) = st.repos.get(&to) {
            if sel == abi::Repo::getLatestCall::SELECTOR {
                let latest = versions
                    .last()
                    .ok_or_else(|| ChainError::Revert("repo: no versions".into()))?;
                return Ok((
                    latest.version.as_array(),
                    latest.contract,
                    alloy_primitives::Bytes::from(latest.content_uri.clone()),
                )
                    .abi_encode_params());
            }
        }
        if to == d.node_operators_registry
            && sel == abi::NodeOperatorsRegistry::getNodeOperatorCall::SELECTOR
        {
            let call = abi::NodeOperatorsRegistry::getNodeOperatorCall::abi_decode(data, true)
                .map_err(|e| ChainError::AbiDecode(e.to_string()))?;
            let id = u64::try_from(call.id)
                .map_err(|_| ChainError::Revert("registry: unknown node operator".into()))?;
            let op = st
                .operators
                .get(&id)
                .ok_or_else(|| ChainError::Revert("registry: unknown node operator".into()))?;
            return Ok((
                op.active,
                op.name.clone(),
                op.reward_address,
                op.staking_limit,
                0u64,
                0u64,
                0u64,
            )
                .abi_encode_params());
        }
        if let Some(module) = st.deposit_modules.get(&to) {
            if sel == abi::DepositSecurityModule::getOwnerCall::SELECTOR {
                return Ok(module.owner.abi_encode());
            }
            if sel == abi::DepositSecurityModule::getLastDepositBlockCall::SELECTOR {
                return Ok(U256::from(module.last_deposit_block).abi_encode());
            }
        }
        if to == d.gov_token {
            if sel == abi::MiniMeToken::balanceOfCall::SELECTOR {
                let call = abi::MiniMeToken::balanceOfCall::abi_decode(data, true)
                    .map_err(|e| ChainError::AbiDecode(e.to_string()))?;
                let balance = st
                    .balances
                    .get(&(d.gov_token, call.owner))
                    .copied()
                    .unwrap_or(0);
                return Ok(U256::from(balance).abi_encode());
            }
            if sel == abi::MiniMeToken::totalSupplyCall::SELECTOR {
                let supply = st.supplies.get(&d.gov_token).copied().unwrap_or(0);
                return Ok(U256::from(supply).abi_encode());
            }
        }
        Err(ChainError::UnknownTarget(to))
    }

    fn send_transaction(&self, tx: &TxRequest) -> Result<Receipt, ChainError> {
        let mut st = self.state.borrow_mut();
        let mut events = Vec::new();
        let d = &self.deployment;
        let sel = Self::selector(&tx.data)?;
        let decode_err = |e: alloy_sol_types::Error| ChainError::AbiDecode(e.to_string());

        if tx.to == d.token_manager && sel == abi::TokenManager::forwardCall::SELECTOR {
            let call =
                abi::TokenManager::forwardCall::abi_decode(&tx.data, true).map_err(decode_err)?;
            for item in decode_call_script(&call.evmScript)? {
                events.push(ChainEvent::ScriptCall {
                    sender: tx.from,
                    app: d.token_manager,
                    target: item.target,
                });
                self.execute_script_call(&mut st, d.token_manager, tx.from, &item, &mut events)?;
            }
        } else if tx.to == d.voting && sel == abi::Voting::voteCall::SELECTOR {
            let call = abi::Voting::voteCall::abi_decode(&tx.data, true).map_err(decode_err)?;
            self.cast_vote(&mut st, tx.from, call, &mut events)?;
        } else if tx.to == d.voting && sel == abi::Voting::executeVoteCall::SELECTOR {
            let call =
                abi::Voting::executeVoteCall::abi_decode(&tx.data, true).map_err(decode_err)?;
            self.execute_vote(&mut st, tx.from, call, &mut events)?;
        } else {
            let item = EvmCall::new(tx.to, tx.data.clone());
            self.execute_script_call(&mut st, tx.from, tx.from, &item, &mut events)?;
        }

        st.block += 1;
        st.tx_count += 1;
        let tx_hash = keccak256(st.nonce.to_be_bytes());
        st.nonce += 1;
        Ok(Receipt {
            tx_hash,
            block_number: st.block,
            events,
        })
    }

    fn block_number(&self) -> Result<u64, ChainError> {
        Ok(self.state.borrow().block)
    }

    fn timestamp(&self) -> Result<u64, ChainError> {
        Ok(self.state.borrow().now)
    }

    fn advance_time(&self, secs: u64) -> Result<(), ChainError> {
        self.state.borrow_mut().now += secs;
        Ok(())
    }

    fn mine(&self) -> Result<(), ChainError> {
        self.state.borrow_mut().block += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;
    use omnibus_script::encode_call_script;
    use omnibus_types::NetworkId;

    fn chain() -> NullChain {
        NullChain::new(Deployment::for_network(NetworkId::Dev))
    }

    fn holder() -> Address {
        Address::repeat_byte(0xaa)
    }

    /// Wrap an omnibus script into the forward(newVote(..)) payload.
    fn new_vote_tx(chain: &NullChain, script: Vec<u8>) -> TxRequest {
        let d = chain.deployment();
        let new_vote = abi::Voting::newVoteCall {
            executionScript: Bytes::from(script),
            metadata: "test vote".into(),
            castVote: false,
            executesIfDecided: false,
        }
        .abi_encode();
        let wrapper =
            encode_call_script(&[EvmCall::new(d.voting, new_vote)]).unwrap();
        TxRequest {
            from: holder(),
            to: d.token_manager,
            data: abi::TokenManager::forwardCall {
                evmScript: Bytes::from(wrapper),
            }
            .abi_encode(),
            gas_price: None,
        }
    }

    fn seed_voting_power(chain: &NullChain) {
        let gov = chain.deployment().gov_token;
        chain.set_total_supply(gov, 1_000_000);
        chain.set_token_balance(gov, holder(), 600_000);
    }

    fn grant_script(chain: &NullChain) -> Vec<u8> {
        let d = chain.deployment();
        let grant = abi::ACL::grantPermissionCall {
            entity: Address::repeat_byte(0x77),
            app: d.staking_app,
            role: Role::from_name("DEPOSIT_ROLE").hash(),
        }
        .abi_encode();
        encode_call_script(&[EvmCall::new(d.acl, grant)]).unwrap()
    }

    #[test]
    fn test_forward_new_vote_creates_record() {
        let chain = chain();
        seed_voting_power(&chain);
        let tx = new_vote_tx(&chain, grant_script(&chain));

        let receipt = chain.send_transaction(&tx).unwrap();

        assert_eq!(chain.vote_count(), 1);
        assert_eq!(receipt.vote_id(), Some(VoteId::new(0)));
    }

    #[test]
    fn test_vote_and_execute_runs_script() {
        let chain = chain();
        seed_voting_power(&chain);
        let d = chain.deployment().clone();
        chain
            .send_transaction(&new_vote_tx(&chain, grant_script(&chain)))
            .unwrap();

        let vote = abi::Voting::voteCall {
            voteId: U256::ZERO,
            supports: true,
            executesIfDecided: false,
        }
        .abi_encode();
        chain
            .send_transaction(&TxRequest {
                from: holder(),
                to: d.voting,
                data: vote,
                gas_price: None,
            })
            .unwrap();

        chain.advance_time(VOTE_TIME + 1).unwrap();
        let execute = abi::Voting::executeVoteCall { voteId: U256::ZERO }.abi_encode();
        let receipt = chain
            .send_transaction(&TxRequest {
                from: holder(),
                to: d.voting,
                data: execute,
                gas_price: None,
            })
            .unwrap();

        let markers = receipt
            .events
            .iter()
            .filter(|ev| matches!(ev, ChainEvent::ScriptCall { .. }))
            .count();
        assert_eq!(markers, 1);

        let permission = Permission::new(
            Address::repeat_byte(0x77),
            d.staking_app,
            Role::from_name("DEPOSIT_ROLE"),
        );
        let acl = crate::contracts::Acl::at(&chain, d.acl);
        assert!(acl.has_permission(&permission).unwrap());
    }

    #[test]
    fn test_execute_before_window_closes_reverts() {
        let chain = chain();
        seed_voting_power(&chain);
        let d = chain.deployment().clone();
        chain
            .send_transaction(&new_vote_tx(&chain, grant_script(&chain)))
            .unwrap();

        let execute = abi::Voting::executeVoteCall { voteId: U256::ZERO }.abi_encode();
        let err = chain
            .send_transaction(&TxRequest {
                from: holder(),
                to: d.voting,
                data: execute,
                gas_price: None,
            })
            .unwrap_err();
        assert!(matches!(err, ChainError::Revert(_)));
    }

    #[test]
    fn test_vote_without_balance_reverts() {
        let chain = chain();
        seed_voting_power(&chain);
        let d = chain.deployment().clone();
        chain
            .send_transaction(&new_vote_tx(&chain, grant_script(&chain)))
            .unwrap();

        let vote = abi::Voting::voteCall {
            voteId: U256::ZERO,
            supports: true,
            executesIfDecided: false,
        }
        .abi_encode();
        let err = chain
            .send_transaction(&TxRequest {
                from: Address::repeat_byte(0xbb),
                to: d.voting,
                data: vote,
                gas_price: None,
            })
            .unwrap_err();
        assert!(matches!(err, ChainError::Revert(_)));
    }

    #[test]
    fn test_new_vote_requires_forwarding_path() {
        let chain = chain();
        seed_voting_power(&chain);
        let d = chain.deployment().clone();
        let new_vote = abi::Voting::newVoteCall {
            executionScript: Bytes::from(grant_script(&chain)),
            metadata: "direct".into(),
            castVote: false,
            executesIfDecided: false,
        }
        .abi_encode();

        let err = chain
            .send_transaction(&TxRequest {
                from: holder(),
                to: d.voting,
                data: new_vote,
                gas_price: None,
            })
            .unwrap_err();
        assert!(matches!(err, ChainError::Revert(_)));
        assert_eq!(chain.vote_count(), 0);
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let chain = chain();
        let err = chain
            .send_transaction(&TxRequest {
                from: holder(),
                to: Address::repeat_byte(0xde),
                data: vec![1, 2, 3, 4],
                gas_price: None,
            })
            .unwrap_err();
        assert!(matches!(err, ChainError::UnknownTarget(_)));
    }
}
