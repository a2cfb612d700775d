//! Boundary to the external DAO contracts.
//!
//! The vote tooling never owns on-chain state; it assembles calls into the
//! DAO's Voting, Finance, TokenManager, ACL, Repo, NodeOperatorsRegistry,
//! and DepositSecurityModule apps and observes the events they emit. This
//! crate is that boundary: the [`ChainClient`] seam everything goes
//! through, the `sol!` ABI bindings with thin typed wrappers, the decoded
//! preview of script calls, the blocking JSON-RPC client for live and
//! forked chains, and [`NullChain`], the deterministic in-memory chain
//! double tests run against.

pub mod client;
pub mod contracts;
pub mod deployment;
pub mod describe;
mod error;
pub mod nullchain;
pub mod rpc;

pub use client::{ChainClient, ChainEvent, Receipt, TxRequest};
pub use deployment::Deployment;
pub use error::ChainError;
pub use nullchain::NullChain;
pub use rpc::JsonRpcClient;
