//! The chain-client seam.
//!
//! Everything that touches the chain goes through [`ChainClient`], passed
//! explicitly into builders and verifiers. Implementations: the JSON-RPC
//! client in [`crate::rpc`] for live and forked chains, and
//! [`crate::nullchain::NullChain`] for deterministic tests.

use alloy_primitives::{Address, B256};
use omnibus_types::{AppVersion, Role, VoteId};

use crate::ChainError;

/// Parameters of one transaction to submit.
#[derive(Clone, Debug)]
pub struct TxRequest {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
    /// Gas price in wei; `None` lets the node choose.
    pub gas_price: Option<u128>,
}

/// A decoded event observed in a transaction receipt.
///
/// Only the events the vote tooling inspects are modeled; anything else a
/// contract emits is dropped at the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainEvent {
    /// A vote record was created.
    StartVote {
        vote_id: VoteId,
        creator: Address,
        metadata: String,
    },
    /// A holder cast a ballot.
    CastVote {
        vote_id: VoteId,
        voter: Address,
        supports: bool,
        stake: u128,
    },
    /// A vote's script was executed.
    ExecuteVote { vote_id: VoteId },
    /// One script item was executed by a forwarding app. Exactly one of
    /// these per call in the script; the verifier counts them.
    ScriptCall {
        sender: Address,
        app: Address,
        target: Address,
    },
    /// A permission tuple was set or unset in the ACL.
    SetPermission {
        entity: Address,
        app: Address,
        role: Role,
        allowed: bool,
    },
    /// The finance app paid out of the treasury.
    NewTransaction {
        entity: Address,
        amount: u128,
        reference: String,
    },
    /// ERC-20 transfer.
    Transfer {
        token: Address,
        from: Address,
        to: Address,
        value: u128,
    },
    /// A new app version was published to a repo.
    NewVersion { repo: Address, version: AppVersion },
    /// A node operator's staking limit changed.
    StakingLimitSet { operator_id: u64, limit: u64 },
}

/// Receipt of a mined transaction with its decoded events, in log order.
#[derive(Clone, Debug)]
pub struct Receipt {
    pub tx_hash: B256,
    pub block_number: u64,
    pub events: Vec<ChainEvent>,
}

impl Receipt {
    /// The vote id announced by the first `StartVote` event, if any.
    pub fn vote_id(&self) -> Option<VoteId> {
        self.events.iter().find_map(|ev| match ev {
            ChainEvent::StartVote { vote_id, .. } => Some(*vote_id),
            _ => None,
        })
    }
}

/// Synchronous access to a chain.
///
/// `advance_time` and `mine` only work against dev and forked chains; a
/// production node rejects them, which is the point — the verifier can
/// never fast-forward a real vote.
pub trait ChainClient {
    /// Execute a read-only call and return the raw ABI-encoded result.
    fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, ChainError>;

    /// Submit a transaction and block until it is mined.
    fn send_transaction(&self, tx: &TxRequest) -> Result<Receipt, ChainError>;

    fn block_number(&self) -> Result<u64, ChainError>;

    /// Timestamp of the latest block, in seconds.
    fn timestamp(&self) -> Result<u64, ChainError>;

    /// Shift chain time forward by `secs`.
    fn advance_time(&self, secs: u64) -> Result<(), ChainError>;

    /// Mine one block.
    fn mine(&self) -> Result<(), ChainError>;
}
