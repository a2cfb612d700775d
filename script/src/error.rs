use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script too short: {len} bytes, spec id needs 4")]
    MissingSpecId { len: usize },

    #[error("unsupported script spec id 0x{}", hex::encode(.0))]
    UnsupportedSpecId([u8; 4]),

    #[error("truncated script: call #{index} needs {needed} more bytes")]
    Truncated { index: usize, needed: usize },

    #[error("calldata for call #{index} exceeds u32 length prefix")]
    CalldataTooLong { index: usize },

    #[error("call #{index} repeats call #{first} (same target and calldata)")]
    DuplicateCall { index: usize, first: usize },
}
