//! Packed call-script codec.
//!
//! A call script is the byte payload a vote carries: a 4-byte spec id
//! followed by the ordered calls, each serialized as
//!
//! ```text
//! target (20 bytes) ++ calldata length (u32, big-endian) ++ calldata
//! ```
//!
//! The DAO's script executor runs the calls in order, atomically. Only spec
//! id `0x00000001` exists. Decoding is the exact inverse of encoding, so a
//! round trip preserves call count, order, and every parameter byte —
//! the preview an operator confirms is derived from the same bytes that go
//! on chain.

mod error;

pub use error::ScriptError;

use alloy_primitives::Address;

/// Spec id of the only supported call-script format.
pub const CALLSCRIPT_SPEC_ID: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// One contract call inside a script: a target address and raw calldata.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EvmCall {
    pub target: Address,
    pub calldata: Vec<u8>,
}

impl EvmCall {
    pub fn new(target: Address, calldata: Vec<u8>) -> Self {
        Self { target, calldata }
    }
}

/// Pack an ordered list of calls into a spec-1 call script.
pub fn encode_call_script(calls: &[EvmCall]) -> Result<Vec<u8>, ScriptError> {
    let body: usize = calls.iter().map(|c| 20 + 4 + c.calldata.len()).sum();
    let mut out = Vec::with_capacity(4 + body);
    out.extend_from_slice(&CALLSCRIPT_SPEC_ID);
    for (index, call) in calls.iter().enumerate() {
        let len = u32::try_from(call.calldata.len())
            .map_err(|_| ScriptError::CalldataTooLong { index })?;
        out.extend_from_slice(call.target.as_slice());
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&call.calldata);
    }
    Ok(out)
}

/// Unpack a spec-1 call script into its ordered calls.
pub fn decode_call_script(script: &[u8]) -> Result<Vec<EvmCall>, ScriptError> {
    if script.len() < 4 {
        return Err(ScriptError::MissingSpecId { len: script.len() });
    }
    let (spec, mut rest) = script.split_at(4);
    if spec != CALLSCRIPT_SPEC_ID {
        let mut id = [0u8; 4];
        id.copy_from_slice(spec);
        return Err(ScriptError::UnsupportedSpecId(id));
    }

    let mut calls = Vec::new();
    let mut index = 0usize;
    while !rest.is_empty() {
        if rest.len() < 24 {
            return Err(ScriptError::Truncated {
                index,
                needed: 24 - rest.len(),
            });
        }
        let target = Address::from_slice(&rest[..20]);
        let len = u32::from_be_bytes([rest[20], rest[21], rest[22], rest[23]]) as usize;
        rest = &rest[24..];
        if rest.len() < len {
            return Err(ScriptError::Truncated {
                index,
                needed: len - rest.len(),
            });
        }
        let (calldata, tail) = rest.split_at(len);
        calls.push(EvmCall::new(target, calldata.to_vec()));
        rest = tail;
        index += 1;
    }
    Ok(calls)
}

/// Like [`decode_call_script`], but additionally rejects scripts containing
/// the same call (target and calldata) twice.
///
/// An omnibus vote never intentionally repeats an identical call; a repeat
/// almost always means an action was pasted twice, which for payouts would
/// double-spend. Used by the preview path before anything is submitted.
pub fn decode_call_script_strict(script: &[u8]) -> Result<Vec<EvmCall>, ScriptError> {
    let calls = decode_call_script(script)?;
    for (index, call) in calls.iter().enumerate() {
        if let Some(first) = calls[..index].iter().position(|c| c == call) {
            return Err(ScriptError::DuplicateCall { index, first });
        }
    }
    Ok(calls)
}
