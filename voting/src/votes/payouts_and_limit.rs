//! November payouts and a node-operator staking-limit raise.
//!
//! 1. Transfer 3433.2799 tokens to the finance multisig
//!    (Isidoros Passadis Nov comp).
//! 2. Referral program payout of 140246.2696 tokens to the same multisig.
//! 3. Raise the staking limit of node operator #12 (Anyblock Analytics)
//!    to 1950.

use alloy_primitives::{address, Address};

use omnibus_chain::{ChainClient, Deployment};
use omnibus_types::{TokenAmount, TxParams};

use crate::actions::{Action, StakingLimitChange, TokenTransfer};
use crate::builder::{Confirm, VoteBuilder, VoteOutcome};
use crate::error::VoteError;

/// The finance multisig receiving both payouts.
pub const FINANCE_MULTISIG: Address = address!("48f300bd3c52c7da6aabde4b683deb27d38b9abb");

/// Compensation payout, in whole tokens.
pub const COMP_AMOUNT: &str = "3433.2799";
pub const COMP_REFERENCE: &str = "Isidoros Passadis Nov comp";

/// Referral-program payout, in whole tokens.
pub const REFERRAL_AMOUNT: &str = "140246.2696";
pub const REFERRAL_REFERENCE: &str = "Referral program payout Nov 25";

/// Anyblock Analytics.
pub const NODE_OPERATOR_ID: u64 = 12;
pub const NEW_STAKING_LIMIT: u64 = 1950;

pub const DESCRIPTION: &str = "Omnibus vote: \
    1) Transfer 3433.2799 tokens to the finance multisig for Isidoros Passadis Nov comp; \
    2) Referral program payout of 140246.2696 tokens to the finance multisig; \
    3) Raise the staking limit of node operator #12 (Anyblock Analytics) to 1950";

/// The vote's ordered action list.
pub fn actions(deployment: &Deployment) -> Result<Vec<Action>, VoteError> {
    Ok(vec![
        Action::TokenTransfer(TokenTransfer {
            token: deployment.gov_token,
            recipient: FINANCE_MULTISIG,
            amount: TokenAmount::from_decimal_str(COMP_AMOUNT)?,
            reference: COMP_REFERENCE.into(),
        }),
        Action::TokenTransfer(TokenTransfer {
            token: deployment.gov_token,
            recipient: FINANCE_MULTISIG,
            amount: TokenAmount::from_decimal_str(REFERRAL_AMOUNT)?,
            reference: REFERRAL_REFERENCE.into(),
        }),
        Action::StakingLimitChange(StakingLimitChange {
            operator_id: NODE_OPERATOR_ID,
            limit: NEW_STAKING_LIMIT,
        }),
    ])
}

/// Build and submit the vote.
pub fn start_vote(
    chain: &dyn ChainClient,
    deployment: &Deployment,
    tx: &TxParams,
    confirm: Option<&mut dyn Confirm>,
) -> Result<VoteOutcome, VoteError> {
    let mut builder = VoteBuilder::new(DESCRIPTION);
    for action in actions(deployment)? {
        builder.push(action);
    }
    builder.submit(chain, deployment, tx, confirm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnibus_types::NetworkId;

    #[test]
    fn test_exactly_three_ordered_actions() {
        let deployment = Deployment::for_network(NetworkId::Mainnet);
        let actions = actions(&deployment).unwrap();
        assert_eq!(actions.len(), 3);

        match &actions[0] {
            Action::TokenTransfer(t) => {
                assert_eq!(t.token, deployment.gov_token);
                assert_eq!(t.recipient, FINANCE_MULTISIG);
                assert_eq!(t.amount.raw(), 3_433_279_900_000_000_000_000);
                assert_eq!(t.reference, COMP_REFERENCE);
            }
            other => panic!("expected a transfer first, got {other:?}"),
        }
        match &actions[1] {
            Action::TokenTransfer(t) => {
                assert_eq!(t.amount.raw(), 140_246_269_600_000_000_000_000);
                assert_eq!(t.reference, REFERRAL_REFERENCE);
            }
            other => panic!("expected a transfer second, got {other:?}"),
        }
        match &actions[2] {
            Action::StakingLimitChange(s) => {
                assert_eq!(s.operator_id, 12);
                assert_eq!(s.limit, 1950);
            }
            other => panic!("expected a staking-limit change last, got {other:?}"),
        }
    }
}
