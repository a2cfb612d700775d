//! Transaction parameters and vote identifiers.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters for the single transaction a builder run submits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxParams {
    /// The sender account (the deployer / vote creator).
    pub from: Address,
    /// Gas price in wei; `None` lets the node choose.
    pub gas_price: Option<u128>,
}

impl TxParams {
    pub fn from_sender(from: Address) -> Self {
        Self {
            from,
            gas_price: None,
        }
    }

    pub fn with_gas_price(mut self, wei: u128) -> Self {
        self.gas_price = Some(wei);
        self
    }
}

/// Identifier of a vote record inside the Voting contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoteId(u64);

impl VoteId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
