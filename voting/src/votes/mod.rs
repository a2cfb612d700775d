//! Prepared omnibus votes.
//!
//! Each module is one real-world governance vote: an ordered action list
//! with its literal addresses, amounts, and references, plus a `start_vote`
//! entry the CLI and the tests share. The action model does the heavy
//! lifting; these modules only state intent.

pub mod deposit_module_rotation;
pub mod payouts_and_limit;

/// Content URI bytes for an IPFS CID, as app repos store them:
/// `ipfs:<cid>` in ASCII.
pub fn ipfs_content_uri(cid: &str) -> Vec<u8> {
    format!("ipfs:{cid}").into_bytes()
}
