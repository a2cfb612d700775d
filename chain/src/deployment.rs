//! The well-known contract addresses of a DAO deployment.
//!
//! Built-in tables exist for the networks votes are actually run against;
//! a TOML file can override the whole set for forks and staging setups.

use std::path::Path;

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

use omnibus_types::NetworkId;

use crate::ChainError;

/// Addresses of every DAO contract the vote tooling talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub network: NetworkId,
    /// The Voting app votes are created in and executed by.
    pub voting: Address,
    /// The governance-token manager (forwarding entry point).
    pub token_manager: Address,
    /// The finance app paying out of the treasury.
    pub finance: Address,
    /// The access-control list.
    pub acl: Address,
    /// The governance token.
    pub gov_token: Address,
    /// The treasury (agent) the finance app draws from.
    pub treasury: Address,
    /// The staking app permissions are scoped to.
    pub staking_app: Address,
    /// The repo publishing staking-app versions.
    pub app_repo: Address,
    /// The node-operator registry.
    pub node_operators_registry: Address,
    /// The deposit security module currently holding DEPOSIT_ROLE.
    pub deposit_security_module: Address,
}

impl Deployment {
    /// The built-in address table for `network`.
    pub fn for_network(network: NetworkId) -> Self {
        match network {
            NetworkId::Mainnet => Self {
                network,
                voting: address!("2e59a20f205bb85a89c53f1936454680651e618e"),
                token_manager: address!("f73a1260d222f447210581ddf212d915c09a3249"),
                finance: address!("b9e5cbb9ca5b0d659238807e84d0176930753d86"),
                acl: address!("9895f0f17cc1d1891b6f18ee0b483b6f221b37bb"),
                gov_token: address!("5a98fcbea516cf06857215779fd812ca3bef1b32"),
                treasury: address!("3e40d73eb977dc6a537af587d48316fee66e9c8c"),
                staking_app: address!("ae7ab96520de3a18e5e111b5eaab095312d7fe84"),
                app_repo: address!("f5dc67e54fc96f993cd06073f71ca732c1e654b1"),
                node_operators_registry: address!("55032650b14df07b85bf18a3a3ec8e0af2e028d5"),
                deposit_security_module: address!("710b3303fb508a84f10793c1106e32be873c24cd"),
            },
            NetworkId::Testnet => Self {
                network,
                voting: address!("bc0b67b4553f4cf52a913de9a6ed0057e2e758db"),
                token_manager: address!("dfe76d11b365f5e0023343a367f0b311701b3bc1"),
                finance: address!("75c7b1d23f1cad7fb4d60281d7069e46440bc179"),
                acl: address!("b3cf58412a00282934d3c3e73f49347567516e98"),
                gov_token: address!("56340274fb5a72af1a3c6609061c451de7961bd4"),
                treasury: address!("4333218072d5d7008546737786663c38b4d561a4"),
                staking_app: address!("1643e812ae58766192cf7d2cf9567df2c37e9b7f"),
                app_repo: address!("e9ede497d2417fd980d8b5338232666641b9b9ac"),
                node_operators_registry: address!("9d4af1ee19dad8857db3a45b0374c81c8a1c6320"),
                deposit_security_module: address!("ed23ad3ea5fb9d10e7371caef1b141ad1c23a80c"),
            },
            NetworkId::Dev => Self {
                network,
                voting: Address::repeat_byte(0x10),
                token_manager: Address::repeat_byte(0x11),
                finance: Address::repeat_byte(0x12),
                acl: Address::repeat_byte(0x13),
                gov_token: Address::repeat_byte(0x14),
                treasury: Address::repeat_byte(0x15),
                staking_app: Address::repeat_byte(0x16),
                app_repo: Address::repeat_byte(0x17),
                node_operators_registry: Address::repeat_byte(0x18),
                deposit_security_module: Address::repeat_byte(0x19),
            },
        }
    }

    /// Load a deployment from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ChainError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ChainError::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&raw).map_err(|e| ChainError::Config(format!("{}: {e}", path.display())))
    }
}
