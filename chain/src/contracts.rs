//! ABI surface of the external DAO contracts.
//!
//! The `abi` module holds the `sol!` bindings for the handful of entry
//! points and events the vote tooling touches; the wrapper types below pair
//! a contract address with a [`ChainClient`] and expose typed calls, so the
//! rest of the workspace never assembles calldata by hand.

use alloy_primitives::{Address, Bytes, LogData, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use omnibus_types::{AppVersion, Permission, Role, TxParams, VoteId};

use crate::client::{ChainClient, ChainEvent, Receipt, TxRequest};
use crate::error::ChainError;

#[allow(missing_docs)]
pub mod abi {
    use alloy_sol_types::sol;

    sol! {
        contract Voting {
            event StartVote(uint256 indexed voteId, address indexed creator, string metadata);
            event CastVote(uint256 indexed voteId, address indexed voter, bool supports, uint256 stake);
            event ExecuteVote(uint256 indexed voteId);
            event LogScriptCall(address indexed sender, address indexed src, address indexed dst);

            function newVote(bytes executionScript, string metadata, bool castVote, bool executesIfDecided) external returns (uint256 voteId);
            function vote(uint256 voteId, bool supports, bool executesIfDecided) external;
            function executeVote(uint256 voteId) external;
            function canExecute(uint256 voteId) external view returns (bool executable);
            function voteTime() external view returns (uint64 seconds_);
            function votesLength() external view returns (uint256 count);
        }

        contract TokenManager {
            function forward(bytes evmScript) external;
        }

        contract Finance {
            event NewTransaction(uint256 indexed transactionId, bool incoming, address indexed entity, uint256 amount, string reference);

            function newImmediatePayment(address token, address receiver, uint256 amount, string reference) external;
        }

        contract ACL {
            event SetPermission(address indexed entity, address indexed app, bytes32 indexed role, bool allowed);

            function grantPermission(address entity, address app, bytes32 role) external;
            function revokePermission(address entity, address app, bytes32 role) external;
            function hasPermission(address entity, address app, bytes32 role) external view returns (bool allowed);
        }

        contract Repo {
            event NewVersion(uint256 versionId, uint16[3] semanticVersion);

            function newVersion(uint16[3] newSemanticVersion, address contractAddress, bytes contentURI) external;
            function getLatest() external view returns (uint16[3] semanticVersion, address contractAddress, bytes contentURI);
        }

        contract NodeOperatorsRegistry {
            event NodeOperatorStakingLimitSet(uint256 indexed id, uint64 stakingLimit);

            function setNodeOperatorStakingLimit(uint256 id, uint64 stakingLimit) external;
            function getNodeOperator(uint256 id, bool fullInfo) external view returns (bool active, string name, address rewardAddress, uint64 stakingLimit, uint64 stoppedValidators, uint64 totalSigningKeys, uint64 usedSigningKeys);
        }

        contract DepositSecurityModule {
            function getOwner() external view returns (address owner);
            function getLastDepositBlock() external view returns (uint256 blockNumber);
            function setLastDepositBlock(uint256 lastDepositBlock) external;
        }

        contract MiniMeToken {
            event Transfer(address indexed from, address indexed to, uint256 value);

            function balanceOf(address owner) external view returns (uint256 balance);
            function totalSupply() external view returns (uint256 supply);
        }
    }
}

fn decode_err(e: impl std::fmt::Display) -> ChainError {
    ChainError::AbiDecode(e.to_string())
}

fn into_u64(v: U256, what: &str) -> Result<u64, ChainError> {
    u64::try_from(v).map_err(|_| ChainError::AbiDecode(format!("{what} out of u64 range")))
}

fn into_u128(v: U256, what: &str) -> Result<u128, ChainError> {
    u128::try_from(v).map_err(|_| ChainError::AbiDecode(format!("{what} out of u128 range")))
}

/// The DAO Voting app.
pub struct Voting<'a> {
    pub address: Address,
    client: &'a dyn ChainClient,
}

impl<'a> Voting<'a> {
    pub fn at(client: &'a dyn ChainClient, address: Address) -> Self {
        Self { address, client }
    }

    /// Length of the voting window in seconds.
    pub fn vote_time(&self) -> Result<u64, ChainError> {
        let ret = self
            .client
            .call(self.address, &abi::Voting::voteTimeCall {}.abi_encode())?;
        u64::abi_decode(&ret, true).map_err(decode_err)
    }

    pub fn votes_length(&self) -> Result<u64, ChainError> {
        let ret = self
            .client
            .call(self.address, &abi::Voting::votesLengthCall {}.abi_encode())?;
        into_u64(U256::abi_decode(&ret, true).map_err(decode_err)?, "vote count")
    }

    pub fn can_execute(&self, vote_id: VoteId) -> Result<bool, ChainError> {
        let data = abi::Voting::canExecuteCall {
            voteId: U256::from(vote_id.value()),
        }
        .abi_encode();
        let ret = self.client.call(self.address, &data)?;
        bool::abi_decode(&ret, true).map_err(decode_err)
    }

    /// Cast a ballot.
    pub fn vote(
        &self,
        tx: &TxParams,
        vote_id: VoteId,
        supports: bool,
        executes_if_decided: bool,
    ) -> Result<Receipt, ChainError> {
        let data = abi::Voting::voteCall {
            voteId: U256::from(vote_id.value()),
            supports,
            executesIfDecided: executes_if_decided,
        }
        .abi_encode();
        self.client.send_transaction(&TxRequest {
            from: tx.from,
            to: self.address,
            data,
            gas_price: tx.gas_price,
        })
    }

    /// Execute a passed vote's script.
    pub fn execute_vote(&self, tx: &TxParams, vote_id: VoteId) -> Result<Receipt, ChainError> {
        let data = abi::Voting::executeVoteCall {
            voteId: U256::from(vote_id.value()),
        }
        .abi_encode();
        self.client.send_transaction(&TxRequest {
            from: tx.from,
            to: self.address,
            data,
            gas_price: tx.gas_price,
        })
    }
}

/// The governance-token manager, used as the forwarding entry point for
/// vote creation.
pub struct TokenManager<'a> {
    pub address: Address,
    client: &'a dyn ChainClient,
}

impl<'a> TokenManager<'a> {
    pub fn at(client: &'a dyn ChainClient, address: Address) -> Self {
        Self { address, client }
    }

    /// Run a call script with the token manager as the acting app.
    pub fn forward(&self, tx: &TxParams, evm_script: Vec<u8>) -> Result<Receipt, ChainError> {
        let data = abi::TokenManager::forwardCall {
            evmScript: Bytes::from(evm_script),
        }
        .abi_encode();
        self.client.send_transaction(&TxRequest {
            from: tx.from,
            to: self.address,
            data,
            gas_price: tx.gas_price,
        })
    }
}

/// The DAO access-control list.
pub struct Acl<'a> {
    pub address: Address,
    client: &'a dyn ChainClient,
}

impl<'a> Acl<'a> {
    pub fn at(client: &'a dyn ChainClient, address: Address) -> Self {
        Self { address, client }
    }

    pub fn has_permission(&self, permission: &Permission) -> Result<bool, ChainError> {
        let data = abi::ACL::hasPermissionCall {
            entity: permission.entity,
            app: permission.app,
            role: permission.role.hash(),
        }
        .abi_encode();
        let ret = self.client.call(self.address, &data)?;
        bool::abi_decode(&ret, true).map_err(decode_err)
    }
}

/// An app repo holding published versions.
pub struct Repo<'a> {
    pub address: Address,
    client: &'a dyn ChainClient,
}

impl<'a> Repo<'a> {
    pub fn at(client: &'a dyn ChainClient, address: Address) -> Self {
        Self { address, client }
    }

    /// Latest published `(version, app contract, content URI)`.
    pub fn get_latest(&self) -> Result<(AppVersion, Address, Vec<u8>), ChainError> {
        let ret = self
            .client
            .call(self.address, &abi::Repo::getLatestCall {}.abi_encode())?;
        let (semver, contract, uri) =
            <([u16; 3], Address, Bytes)>::abi_decode_params(&ret, true).map_err(decode_err)?;
        Ok((AppVersion::from_array(semver), contract, uri.to_vec()))
    }
}

/// The node-operator registry.
pub struct NodeOperatorsRegistry<'a> {
    pub address: Address,
    client: &'a dyn ChainClient,
}

impl<'a> NodeOperatorsRegistry<'a> {
    pub fn at(client: &'a dyn ChainClient, address: Address) -> Self {
        Self { address, client }
    }

    /// Current staking limit of one operator.
    pub fn staking_limit(&self, operator_id: u64) -> Result<u64, ChainError> {
        let data = abi::NodeOperatorsRegistry::getNodeOperatorCall {
            id: U256::from(operator_id),
            fullInfo: false,
        }
        .abi_encode();
        let ret = self.client.call(self.address, &data)?;
        let (_active, _name, _reward, limit, _stopped, _total, _used) =
            <(bool, String, Address, u64, u64, u64, u64)>::abi_decode_params(&ret, true)
                .map_err(decode_err)?;
        Ok(limit)
    }
}

/// A deposit security module instance.
pub struct DepositSecurityModule<'a> {
    pub address: Address,
    client: &'a dyn ChainClient,
}

impl<'a> DepositSecurityModule<'a> {
    pub fn at(client: &'a dyn ChainClient, address: Address) -> Self {
        Self { address, client }
    }

    pub fn owner(&self) -> Result<Address, ChainError> {
        let ret = self.client.call(
            self.address,
            &abi::DepositSecurityModule::getOwnerCall {}.abi_encode(),
        )?;
        Address::abi_decode(&ret, true).map_err(decode_err)
    }

    pub fn last_deposit_block(&self) -> Result<u64, ChainError> {
        let ret = self.client.call(
            self.address,
            &abi::DepositSecurityModule::getLastDepositBlockCall {}.abi_encode(),
        )?;
        into_u64(
            U256::abi_decode(&ret, true).map_err(decode_err)?,
            "last deposit block",
        )
    }
}

/// The governance token.
pub struct GovToken<'a> {
    pub address: Address,
    client: &'a dyn ChainClient,
}

impl<'a> GovToken<'a> {
    pub fn at(client: &'a dyn ChainClient, address: Address) -> Self {
        Self { address, client }
    }

    pub fn balance_of(&self, owner: Address) -> Result<u128, ChainError> {
        let data = abi::MiniMeToken::balanceOfCall { owner }.abi_encode();
        let ret = self.client.call(self.address, &data)?;
        into_u128(U256::abi_decode(&ret, true).map_err(decode_err)?, "balance")
    }

    pub fn total_supply(&self) -> Result<u128, ChainError> {
        let ret = self
            .client
            .call(self.address, &abi::MiniMeToken::totalSupplyCall {}.abi_encode())?;
        into_u128(U256::abi_decode(&ret, true).map_err(decode_err)?, "supply")
    }
}

/// Decode one raw log into a [`ChainEvent`], if it is an event the tooling
/// knows. Unknown events return `None` and are dropped at the boundary.
pub fn decode_log(address: Address, topics: &[B256], data: &[u8]) -> Option<ChainEvent> {
    let topic0 = *topics.first()?;
    let log = LogData::new_unchecked(topics.to_vec(), Bytes::copy_from_slice(data));

    if topic0 == abi::Voting::StartVote::SIGNATURE_HASH {
        let ev = abi::Voting::StartVote::decode_log_data(&log, true).ok()?;
        return Some(ChainEvent::StartVote {
            vote_id: VoteId::new(u64::try_from(ev.voteId).ok()?),
            creator: ev.creator,
            metadata: ev.metadata,
        });
    }
    if topic0 == abi::Voting::CastVote::SIGNATURE_HASH {
        let ev = abi::Voting::CastVote::decode_log_data(&log, true).ok()?;
        return Some(ChainEvent::CastVote {
            vote_id: VoteId::new(u64::try_from(ev.voteId).ok()?),
            voter: ev.voter,
            supports: ev.supports,
            stake: u128::try_from(ev.stake).ok()?,
        });
    }
    if topic0 == abi::Voting::ExecuteVote::SIGNATURE_HASH {
        let ev = abi::Voting::ExecuteVote::decode_log_data(&log, true).ok()?;
        return Some(ChainEvent::ExecuteVote {
            vote_id: VoteId::new(u64::try_from(ev.voteId).ok()?),
        });
    }
    if topic0 == abi::Voting::LogScriptCall::SIGNATURE_HASH {
        let ev = abi::Voting::LogScriptCall::decode_log_data(&log, true).ok()?;
        return Some(ChainEvent::ScriptCall {
            sender: ev.sender,
            app: ev.src,
            target: ev.dst,
        });
    }
    if topic0 == abi::ACL::SetPermission::SIGNATURE_HASH {
        let ev = abi::ACL::SetPermission::decode_log_data(&log, true).ok()?;
        return Some(ChainEvent::SetPermission {
            entity: ev.entity,
            app: ev.app,
            role: Role::from_hash(ev.role),
            allowed: ev.allowed,
        });
    }
    if topic0 == abi::Finance::NewTransaction::SIGNATURE_HASH {
        let ev = abi::Finance::NewTransaction::decode_log_data(&log, true).ok()?;
        return Some(ChainEvent::NewTransaction {
            entity: ev.entity,
            amount: u128::try_from(ev.amount).ok()?,
            reference: ev.reference,
        });
    }
    if topic0 == abi::MiniMeToken::Transfer::SIGNATURE_HASH {
        let ev = abi::MiniMeToken::Transfer::decode_log_data(&log, true).ok()?;
        return Some(ChainEvent::Transfer {
            token: address,
            from: ev.from,
            to: ev.to,
            value: u128::try_from(ev.value).ok()?,
        });
    }
    if topic0 == abi::Repo::NewVersion::SIGNATURE_HASH {
        let ev = abi::Repo::NewVersion::decode_log_data(&log, true).ok()?;
        return Some(ChainEvent::NewVersion {
            repo: address,
            version: AppVersion::from_array(ev.semanticVersion),
        });
    }
    if topic0 == abi::NodeOperatorsRegistry::NodeOperatorStakingLimitSet::SIGNATURE_HASH {
        let ev =
            abi::NodeOperatorsRegistry::NodeOperatorStakingLimitSet::decode_log_data(&log, true)
                .ok()?;
        return Some(ChainEvent::StakingLimitSet {
            operator_id: u64::try_from(ev.id).ok()?,
            limit: ev.stakingLimit,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;

    #[test]
    fn test_selectors_match_signatures() {
        assert_eq!(
            abi::Voting::newVoteCall::SELECTOR,
            &keccak256("newVote(bytes,string,bool,bool)")[..4],
        );
        assert_eq!(
            abi::TokenManager::forwardCall::SELECTOR,
            &keccak256("forward(bytes)")[..4],
        );
        assert_eq!(
            abi::Finance::newImmediatePaymentCall::SELECTOR,
            &keccak256("newImmediatePayment(address,address,uint256,string)")[..4],
        );
        assert_eq!(
            abi::NodeOperatorsRegistry::setNodeOperatorStakingLimitCall::SELECTOR,
            &keccak256("setNodeOperatorStakingLimit(uint256,uint64)")[..4],
        );
        assert_eq!(
            abi::Repo::newVersionCall::SELECTOR,
            &keccak256("newVersion(uint16[3],address,bytes)")[..4],
        );
    }

    #[test]
    fn test_decode_log_round_trip_for_set_permission() {
        use alloy_sol_types::SolEvent;

        let entity = Address::repeat_byte(0x11);
        let app = Address::repeat_byte(0x22);
        let role = Role::from_name("DEPOSIT_ROLE");
        let ev = abi::ACL::SetPermission {
            entity,
            app,
            role: role.hash(),
            allowed: true,
        };
        let log = ev.encode_log_data();
        let topics: Vec<B256> = log.topics().to_vec();

        let decoded = decode_log(Address::repeat_byte(0x33), &topics, &log.data).unwrap();
        assert_eq!(
            decoded,
            ChainEvent::SetPermission {
                entity,
                app,
                role,
                allowed: true
            }
        );
    }

    #[test]
    fn test_decode_log_ignores_unknown_topics() {
        let topics = vec![B256::repeat_byte(0xab)];
        assert!(decode_log(Address::ZERO, &topics, &[]).is_none());
    }
}
