//! Deposit-security-module rotation and staking-app version push.
//!
//! 1. Revoke DEPOSIT_ROLE of the current deposit security module on the
//!    staking app.
//! 2. Grant DEPOSIT_ROLE to the proposed module.
//! 3. Carry the last deposit block over to the proposed module.
//! 4. Publish the new staking-app version (3.0.0 → 3.0.1, new content URI)
//!    to the app repo.

use alloy_primitives::{address, Address};

use omnibus_chain::{ChainClient, Deployment};
use omnibus_types::{AppVersion, Permission, Role, TxParams};

use crate::actions::{
    Action, AppVersionPush, LastDepositBlockChange, PermissionGrant, PermissionRevoke,
};
use crate::builder::{Confirm, VoteBuilder, VoteOutcome};
use crate::error::VoteError;
use crate::votes::ipfs_content_uri;

/// Role the staking app checks on every deposit.
pub const DEPOSIT_ROLE: &str = "DEPOSIT_ROLE";

/// Content CID of the staking app release currently published (3.0.0).
pub const OLD_IPFS_CID: &str = "QmQkJMtvu4tyJvWrPXJfjLfyTWn959iayyNjp7YqNzX7pS";

/// Content CID of the release being published (3.0.1).
pub const NEW_IPFS_CID: &str = "QmcweCCxtTGubHuJVwDcTwikUevuvmAJJ7S5uoRicBxvxM";

/// Per-vote inputs: the module taking over and the app release metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotationParams {
    /// The deposit security module DEPOSIT_ROLE moves to.
    pub proposed_module: Address,
    /// Last deposit block carried over to the proposed module.
    pub last_deposit_block: u64,
    /// The staking-app implementation contract the new version points at.
    pub app_contract: Address,
    pub new_version: AppVersion,
    pub new_content_uri: Vec<u8>,
}

impl RotationParams {
    /// The parameters of the production rotation.
    pub fn mainnet() -> Self {
        Self {
            proposed_module: address!("c77f8768774e1c9244beed705c4354f2113cfc09"),
            last_deposit_block: 14_964_312,
            app_contract: address!("47ebab13b806773ec2a2d16873e2df770d130b50"),
            new_version: AppVersion::new(3, 0, 1),
            new_content_uri: ipfs_content_uri(NEW_IPFS_CID),
        }
    }
}

pub const DESCRIPTION: &str = "Omnibus vote: \
    1) Revoke DEPOSIT_ROLE from the current deposit security module; \
    2) Grant DEPOSIT_ROLE to the proposed deposit security module; \
    3) Set the proposed module's last deposit block; \
    4) Publish staking app version 3.0.1 to the app repo";

/// The vote's ordered action list.
pub fn actions(deployment: &Deployment, params: &RotationParams) -> Vec<Action> {
    let role = Role::from_name(DEPOSIT_ROLE);
    vec![
        Action::PermissionRevoke(PermissionRevoke {
            permission: Permission::new(
                deployment.deposit_security_module,
                deployment.staking_app,
                role,
            ),
        }),
        Action::PermissionGrant(PermissionGrant {
            permission: Permission::new(params.proposed_module, deployment.staking_app, role),
        }),
        Action::LastDepositBlockChange(LastDepositBlockChange {
            module: params.proposed_module,
            block: params.last_deposit_block,
        }),
        Action::AppVersionPush(AppVersionPush {
            repo: deployment.app_repo,
            version: params.new_version,
            contract: params.app_contract,
            content_uri: params.new_content_uri.clone(),
        }),
    ]
}

/// Build and submit the vote.
pub fn start_vote(
    chain: &dyn ChainClient,
    deployment: &Deployment,
    params: &RotationParams,
    tx: &TxParams,
    confirm: Option<&mut dyn Confirm>,
) -> Result<VoteOutcome, VoteError> {
    let mut builder = VoteBuilder::new(DESCRIPTION);
    for action in actions(deployment, params) {
        builder.push(action);
    }
    builder.submit(chain, deployment, tx, confirm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnibus_types::NetworkId;

    #[test]
    fn test_exactly_four_ordered_actions() {
        let deployment = Deployment::for_network(NetworkId::Mainnet);
        let params = RotationParams::mainnet();
        let actions = actions(&deployment, &params);
        assert_eq!(actions.len(), 4);

        let role = Role::from_name(DEPOSIT_ROLE);
        match &actions[0] {
            Action::PermissionRevoke(r) => {
                assert_eq!(r.permission.entity, deployment.deposit_security_module);
                assert_eq!(r.permission.app, deployment.staking_app);
                assert_eq!(r.permission.role, role);
            }
            other => panic!("expected the revoke first, got {other:?}"),
        }
        match &actions[1] {
            Action::PermissionGrant(g) => {
                assert_eq!(g.permission.entity, params.proposed_module);
                assert_eq!(g.permission.app, deployment.staking_app);
            }
            other => panic!("expected the grant second, got {other:?}"),
        }
        match &actions[2] {
            Action::LastDepositBlockChange(c) => {
                assert_eq!(c.module, params.proposed_module);
                assert_eq!(c.block, params.last_deposit_block);
            }
            other => panic!("expected the deposit-block change third, got {other:?}"),
        }
        match &actions[3] {
            Action::AppVersionPush(p) => {
                assert_eq!(p.repo, deployment.app_repo);
                assert_eq!(p.version, AppVersion::new(3, 0, 1));
                assert_eq!(p.content_uri, ipfs_content_uri(NEW_IPFS_CID));
            }
            other => panic!("expected the version push last, got {other:?}"),
        }
    }

    #[test]
    fn test_mainnet_rotation_moves_the_role_to_a_new_module() {
        let deployment = Deployment::for_network(NetworkId::Mainnet);
        let params = RotationParams::mainnet();
        assert_ne!(params.proposed_module, deployment.deposit_security_module);
        assert!(AppVersion::new(3, 0, 0).is_valid_bump(&params.new_version));
    }
}
