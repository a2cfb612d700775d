//! Human-readable decoding of script calls.
//!
//! Turns the raw calldata of a script item back into the typed parameters
//! it was built from, for the preview an operator confirms before a vote is
//! submitted. Decoding uses the same ABI bindings as encoding, so what is
//! printed is exactly what will run.

use std::fmt;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

use omnibus_script::EvmCall;
use omnibus_types::{AppVersion, Permission, Role, TokenAmount};

use crate::contracts::abi;
use crate::error::ChainError;

/// A script call decoded back into its typed parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KnownCall {
    Payment {
        token: Address,
        receiver: Address,
        amount: U256,
        reference: String,
    },
    StakingLimit {
        operator_id: u64,
        limit: u64,
    },
    PermissionGrant {
        permission: Permission,
    },
    PermissionRevoke {
        permission: Permission,
    },
    VersionPush {
        version: AppVersion,
        contract: Address,
        content_uri: Vec<u8>,
    },
    LastDepositBlock {
        block: u64,
    },
    NewVote {
        metadata: String,
    },
    /// A selector the tooling has no binding for; shown raw.
    Unknown {
        selector: [u8; 4],
        calldata_len: usize,
    },
}

/// A decoded script item: where it goes and what it does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCall {
    pub target: Address,
    pub kind: KnownCall,
}

/// Decode one script item. Known selectors with malformed parameters are an
/// error; unknown selectors decode to [`KnownCall::Unknown`].
pub fn describe_call(call: &EvmCall) -> Result<DecodedCall, ChainError> {
    let selector: [u8; 4] = call
        .calldata
        .get(..4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| ChainError::AbiDecode("calldata shorter than a selector".into()))?;
    let decode_err = |e: alloy_sol_types::Error| ChainError::AbiDecode(e.to_string());

    let kind = if selector == abi::Finance::newImmediatePaymentCall::SELECTOR {
        let c = abi::Finance::newImmediatePaymentCall::abi_decode(&call.calldata, true)
            .map_err(decode_err)?;
        KnownCall::Payment {
            token: c.token,
            receiver: c.receiver,
            amount: c.amount,
            reference: c.reference,
        }
    } else if selector == abi::NodeOperatorsRegistry::setNodeOperatorStakingLimitCall::SELECTOR {
        let c = abi::NodeOperatorsRegistry::setNodeOperatorStakingLimitCall::abi_decode(
            &call.calldata,
            true,
        )
        .map_err(decode_err)?;
        KnownCall::StakingLimit {
            operator_id: u64::try_from(c.id)
                .map_err(|_| ChainError::AbiDecode("operator id out of u64 range".into()))?,
            limit: c.stakingLimit,
        }
    } else if selector == abi::ACL::grantPermissionCall::SELECTOR {
        let c = abi::ACL::grantPermissionCall::abi_decode(&call.calldata, true)
            .map_err(decode_err)?;
        KnownCall::PermissionGrant {
            permission: Permission::new(c.entity, c.app, Role::from_hash(c.role)),
        }
    } else if selector == abi::ACL::revokePermissionCall::SELECTOR {
        let c = abi::ACL::revokePermissionCall::abi_decode(&call.calldata, true)
            .map_err(decode_err)?;
        KnownCall::PermissionRevoke {
            permission: Permission::new(c.entity, c.app, Role::from_hash(c.role)),
        }
    } else if selector == abi::Repo::newVersionCall::SELECTOR {
        let c = abi::Repo::newVersionCall::abi_decode(&call.calldata, true).map_err(decode_err)?;
        KnownCall::VersionPush {
            version: AppVersion::from_array(c.newSemanticVersion),
            contract: c.contractAddress,
            content_uri: c.contentURI.to_vec(),
        }
    } else if selector == abi::DepositSecurityModule::setLastDepositBlockCall::SELECTOR {
        let c = abi::DepositSecurityModule::setLastDepositBlockCall::abi_decode(
            &call.calldata,
            true,
        )
        .map_err(decode_err)?;
        KnownCall::LastDepositBlock {
            block: u64::try_from(c.lastDepositBlock)
                .map_err(|_| ChainError::AbiDecode("deposit block out of u64 range".into()))?,
        }
    } else if selector == abi::Voting::newVoteCall::SELECTOR {
        let c = abi::Voting::newVoteCall::abi_decode(&call.calldata, true).map_err(decode_err)?;
        KnownCall::NewVote {
            metadata: c.metadata,
        }
    } else {
        KnownCall::Unknown {
            selector,
            calldata_len: call.calldata.len(),
        }
    };

    Ok(DecodedCall {
        target: call.target,
        kind,
    })
}

fn fmt_amount(f: &mut fmt::Formatter<'_>, amount: U256) -> fmt::Result {
    match u128::try_from(amount) {
        Ok(raw) => write!(f, "{} tokens ({raw} raw)", TokenAmount::from_raw(raw)),
        Err(_) => write!(f, "{amount} raw"),
    }
}

impl fmt::Display for DecodedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "target: {}", self.target)?;
        match &self.kind {
            KnownCall::Payment {
                token,
                receiver,
                amount,
                reference,
            } => {
                writeln!(f, "newImmediatePayment")?;
                writeln!(f, "  token:     {token}")?;
                writeln!(f, "  receiver:  {receiver}")?;
                write!(f, "  amount:    ")?;
                fmt_amount(f, *amount)?;
                writeln!(f)?;
                write!(f, "  reference: {reference:?}")
            }
            KnownCall::StakingLimit { operator_id, limit } => {
                writeln!(f, "setNodeOperatorStakingLimit")?;
                writeln!(f, "  operator: #{operator_id}")?;
                write!(f, "  limit:    {limit}")
            }
            KnownCall::PermissionGrant { permission } => {
                writeln!(f, "grantPermission")?;
                write!(f, "  {permission}")
            }
            KnownCall::PermissionRevoke { permission } => {
                writeln!(f, "revokePermission")?;
                write!(f, "  {permission}")
            }
            KnownCall::VersionPush {
                version,
                contract,
                content_uri,
            } => {
                writeln!(f, "newVersion")?;
                writeln!(f, "  version:     {version}")?;
                writeln!(f, "  contract:    {contract}")?;
                write!(
                    f,
                    "  content uri: {}",
                    String::from_utf8_lossy(content_uri)
                )
            }
            KnownCall::LastDepositBlock { block } => {
                writeln!(f, "setLastDepositBlock")?;
                write!(f, "  block: {block}")
            }
            KnownCall::NewVote { metadata } => {
                writeln!(f, "newVote")?;
                write!(f, "  metadata: {metadata:?}")
            }
            KnownCall::Unknown {
                selector,
                calldata_len,
            } => {
                write!(
                    f,
                    "unknown function 0x{} ({calldata_len} bytes of calldata)",
                    hex::encode(selector)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;

    #[test]
    fn test_payment_decodes_to_its_parameters() {
        let token = Address::repeat_byte(0x14);
        let receiver = Address::repeat_byte(0x48);
        let amount = U256::from(3_433_279_900_000_000_000_000u128);
        let calldata = abi::Finance::newImmediatePaymentCall {
            token,
            receiver,
            amount,
            reference: "November comp".into(),
        }
        .abi_encode();

        let decoded = describe_call(&EvmCall::new(Address::repeat_byte(0x12), calldata)).unwrap();
        assert_eq!(
            decoded.kind,
            KnownCall::Payment {
                token,
                receiver,
                amount,
                reference: "November comp".into(),
            }
        );

        let rendered = decoded.to_string();
        assert!(rendered.contains("newImmediatePayment"));
        assert!(rendered.contains("3433.2799 tokens"));
        assert!(rendered.contains("November comp"));
    }

    #[test]
    fn test_unknown_selector_is_shown_raw() {
        let decoded =
            describe_call(&EvmCall::new(Address::ZERO, vec![0xde, 0xad, 0xbe, 0xef, 0x00]))
                .unwrap();
        assert_eq!(
            decoded.kind,
            KnownCall::Unknown {
                selector: [0xde, 0xad, 0xbe, 0xef],
                calldata_len: 5,
            }
        );
        assert!(decoded.to_string().contains("0xdeadbeef"));
    }

    #[test]
    fn test_short_calldata_is_an_error() {
        assert!(describe_call(&EvmCall::new(Address::ZERO, vec![1, 2])).is_err());
    }
}
