use proptest::prelude::*;

use alloy_primitives::Address;
use omnibus_script::{decode_call_script, encode_call_script, EvmCall, CALLSCRIPT_SPEC_ID};

fn arb_call() -> impl Strategy<Value = EvmCall> {
    (
        prop::array::uniform20(0u8..),
        prop::collection::vec(any::<u8>(), 0..200),
    )
        .prop_map(|(target, calldata)| EvmCall::new(Address::from(target), calldata))
}

proptest! {
    /// decode(encode(calls)) yields the same ordered calls, byte for byte.
    #[test]
    fn round_trip_fidelity(calls in prop::collection::vec(arb_call(), 0..12)) {
        let script = encode_call_script(&calls).unwrap();
        let decoded = decode_call_script(&script).unwrap();
        prop_assert_eq!(decoded, calls);
    }

    /// Encoded size is exactly 4 + Σ (24 + calldata length).
    #[test]
    fn encoded_size_is_deterministic(calls in prop::collection::vec(arb_call(), 0..12)) {
        let script = encode_call_script(&calls).unwrap();
        let expected: usize = 4 + calls.iter().map(|c| 24 + c.calldata.len()).sum::<usize>();
        prop_assert_eq!(script.len(), expected);
    }

    /// Every encoded script starts with the spec id.
    #[test]
    fn spec_id_prefix(calls in prop::collection::vec(arb_call(), 0..4)) {
        let script = encode_call_script(&calls).unwrap();
        prop_assert_eq!(&script[..4], &CALLSCRIPT_SPEC_ID);
    }

    /// Truncating a non-empty script always fails to decode.
    #[test]
    fn truncation_is_detected(
        calls in prop::collection::vec(arb_call(), 1..6),
        cut in 1usize..24,
    ) {
        let script = encode_call_script(&calls).unwrap();
        let truncated = &script[..script.len() - cut.min(script.len() - 4)];
        if truncated.len() > 4 {
            prop_assert!(decode_call_script(truncated).is_err());
        }
    }
}
