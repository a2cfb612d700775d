//! Domain primitives shared by the omnibus vote tooling.
//!
//! Everything that crosses a crate boundary lives here: token amounts
//! (fixed-point, never floating), permission tuples, network identifiers,
//! and the small transaction-parameter types the builder and verifier pass
//! around. EVM-level types (addresses, hashes, 256-bit integers) come from
//! `alloy_primitives` and are re-exported for convenience.

pub mod amount;
pub mod network;
pub mod permission;
pub mod tx;
pub mod version;

pub use amount::{AmountError, TokenAmount};
pub use network::NetworkId;
pub use permission::{Permission, Role};
pub use tx::{TxParams, VoteId};
pub use version::AppVersion;

pub use alloy_primitives::{Address, B256, U256};
