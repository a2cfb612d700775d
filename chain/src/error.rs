use alloy_primitives::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport or protocol failure talking to the node.
    #[error("rpc failure: {0}")]
    Rpc(String),

    /// The transaction or call reverted on chain.
    #[error("execution reverted: {0}")]
    Revert(String),

    #[error("abi decode failure: {0}")]
    AbiDecode(String),

    /// A call targeted an address no known contract lives at.
    #[error("no contract at {0}")]
    UnknownTarget(Address),

    #[error("bad deployment config: {0}")]
    Config(String),

    #[error("script: {0}")]
    Script(#[from] omnibus_script::ScriptError),
}
