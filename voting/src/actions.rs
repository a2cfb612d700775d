//! Typed vote actions.
//!
//! Every administrative effect a vote can carry is a struct with named
//! fields, so an address can never land in an amount slot and vice versa —
//! transposed arguments are a type error, not a runtime surprise. An
//! [`Action`] maps to exactly one script call against a known contract of
//! the [`Deployment`] and renders a one-line description for logs and the
//! vote metadata.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use omnibus_chain::contracts::abi;
use omnibus_chain::Deployment;
use omnibus_script::EvmCall;
use omnibus_types::{AppVersion, Permission, TokenAmount};

/// Pay tokens out of the treasury through the finance app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenTransfer {
    pub token: Address,
    pub recipient: Address,
    pub amount: TokenAmount,
    /// Free-text payment reference recorded by the finance app.
    pub reference: String,
}

/// Raise or lower a node operator's staking limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakingLimitChange {
    pub operator_id: u64,
    pub limit: u64,
}

/// Grant a permission tuple in the ACL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionGrant {
    pub permission: Permission,
}

/// Revoke a permission tuple in the ACL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionRevoke {
    pub permission: Permission,
}

/// Publish a new app version to an app repo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppVersionPush {
    pub repo: Address,
    pub version: AppVersion,
    /// The app contract the version points at.
    pub contract: Address,
    /// Content URI of the release artifacts, e.g. `ipfs:<cid>` as ASCII.
    pub content_uri: Vec<u8>,
}

/// Set the last deposit block of a deposit security module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastDepositBlockChange {
    pub module: Address,
    pub block: u64,
}

/// One intended on-chain effect of an omnibus vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    TokenTransfer(TokenTransfer),
    StakingLimitChange(StakingLimitChange),
    PermissionGrant(PermissionGrant),
    PermissionRevoke(PermissionRevoke),
    AppVersionPush(AppVersionPush),
    LastDepositBlockChange(LastDepositBlockChange),
}

impl Action {
    /// The script call this action encodes to.
    ///
    /// Targets come from the deployment's address table, except where the
    /// action itself names the contract (repos and deposit modules, of
    /// which several can exist).
    pub fn to_call(&self, deployment: &Deployment) -> EvmCall {
        match self {
            Action::TokenTransfer(t) => EvmCall::new(
                deployment.finance,
                abi::Finance::newImmediatePaymentCall {
                    token: t.token,
                    receiver: t.recipient,
                    amount: U256::from(t.amount.raw()),
                    reference: t.reference.clone(),
                }
                .abi_encode(),
            ),
            Action::StakingLimitChange(s) => EvmCall::new(
                deployment.node_operators_registry,
                abi::NodeOperatorsRegistry::setNodeOperatorStakingLimitCall {
                    id: U256::from(s.operator_id),
                    stakingLimit: s.limit,
                }
                .abi_encode(),
            ),
            Action::PermissionGrant(g) => EvmCall::new(
                deployment.acl,
                abi::ACL::grantPermissionCall {
                    entity: g.permission.entity,
                    app: g.permission.app,
                    role: g.permission.role.hash(),
                }
                .abi_encode(),
            ),
            Action::PermissionRevoke(r) => EvmCall::new(
                deployment.acl,
                abi::ACL::revokePermissionCall {
                    entity: r.permission.entity,
                    app: r.permission.app,
                    role: r.permission.role.hash(),
                }
                .abi_encode(),
            ),
            Action::AppVersionPush(p) => EvmCall::new(
                p.repo,
                abi::Repo::newVersionCall {
                    newSemanticVersion: p.version.as_array(),
                    contractAddress: p.contract,
                    contentURI: Bytes::from(p.content_uri.clone()),
                }
                .abi_encode(),
            ),
            Action::LastDepositBlockChange(c) => EvmCall::new(
                c.module,
                abi::DepositSecurityModule::setLastDepositBlockCall {
                    lastDepositBlock: U256::from(c.block),
                }
                .abi_encode(),
            ),
        }
    }

    /// One-line human-readable description of the intended effect.
    pub fn description(&self) -> String {
        match self {
            Action::TokenTransfer(t) => format!(
                "transfer {} tokens to {} ({})",
                t.amount, t.recipient, t.reference
            ),
            Action::StakingLimitChange(s) => format!(
                "set staking limit of node operator #{} to {}",
                s.operator_id, s.limit
            ),
            Action::PermissionGrant(g) => format!("grant {}", g.permission),
            Action::PermissionRevoke(r) => format!("revoke {}", r.permission),
            Action::AppVersionPush(p) => {
                format!("publish app version {} to repo {}", p.version, p.repo)
            }
            Action::LastDepositBlockChange(c) => {
                format!("set last deposit block of {} to {}", c.module, c.block)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnibus_chain::describe::{describe_call, KnownCall};
    use omnibus_types::{NetworkId, Role};

    fn deployment() -> Deployment {
        Deployment::for_network(NetworkId::Dev)
    }

    #[test]
    fn test_transfer_encodes_against_finance() {
        let d = deployment();
        let action = Action::TokenTransfer(TokenTransfer {
            token: d.gov_token,
            recipient: Address::repeat_byte(0x48),
            amount: TokenAmount::from_decimal_str("3433.2799").unwrap(),
            reference: "Nov comp".into(),
        });

        let call = action.to_call(&d);
        assert_eq!(call.target, d.finance);

        let decoded = describe_call(&call).unwrap();
        assert_eq!(
            decoded.kind,
            KnownCall::Payment {
                token: d.gov_token,
                receiver: Address::repeat_byte(0x48),
                amount: U256::from(3_433_279_900_000_000_000_000u128),
                reference: "Nov comp".into(),
            }
        );
    }

    #[test]
    fn test_staking_limit_encodes_against_registry() {
        let d = deployment();
        let action = Action::StakingLimitChange(StakingLimitChange {
            operator_id: 12,
            limit: 1950,
        });

        let call = action.to_call(&d);
        assert_eq!(call.target, d.node_operators_registry);
        assert_eq!(
            describe_call(&call).unwrap().kind,
            KnownCall::StakingLimit {
                operator_id: 12,
                limit: 1950,
            }
        );
    }

    #[test]
    fn test_permission_actions_encode_against_acl() {
        let d = deployment();
        let permission = Permission::new(
            Address::repeat_byte(0x2a),
            d.staking_app,
            Role::from_name("DEPOSIT_ROLE"),
        );

        let grant = Action::PermissionGrant(PermissionGrant { permission }).to_call(&d);
        let revoke = Action::PermissionRevoke(PermissionRevoke { permission }).to_call(&d);
        assert_eq!(grant.target, d.acl);
        assert_eq!(revoke.target, d.acl);
        assert_eq!(
            describe_call(&grant).unwrap().kind,
            KnownCall::PermissionGrant { permission }
        );
        assert_eq!(
            describe_call(&revoke).unwrap().kind,
            KnownCall::PermissionRevoke { permission }
        );
    }

    #[test]
    fn test_version_push_targets_its_own_repo() {
        let d = deployment();
        let action = Action::AppVersionPush(AppVersionPush {
            repo: d.app_repo,
            version: AppVersion::new(3, 0, 1),
            contract: Address::repeat_byte(0x2b),
            content_uri: b"ipfs:QmcweCCxtTGubHuJVwDcTwikUevuvmAJJ7S5uoRicBxvxM".to_vec(),
        });

        let call = action.to_call(&d);
        assert_eq!(call.target, d.app_repo);
        match describe_call(&call).unwrap().kind {
            KnownCall::VersionPush {
                version,
                content_uri,
                ..
            } => {
                assert_eq!(version, AppVersion::new(3, 0, 1));
                assert!(content_uri.starts_with(b"ipfs:"));
            }
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn test_descriptions_name_the_parameters() {
        let action = Action::StakingLimitChange(StakingLimitChange {
            operator_id: 12,
            limit: 1950,
        });
        assert_eq!(
            action.description(),
            "set staking limit of node operator #12 to 1950"
        );

        let transfer = Action::TokenTransfer(TokenTransfer {
            token: Address::ZERO,
            recipient: Address::repeat_byte(0x48),
            amount: TokenAmount::from_units(5),
            reference: "grant".into(),
        });
        assert!(transfer.description().contains("5 tokens"));
        assert!(transfer.description().contains("grant"));
    }
}
