//! Builds calldata from a human-readable function signature and string
//! arguments: 4-byte selector followed by ABI-encoded arguments.

use alloy_dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::Function;
use alloy_primitives::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("invalid function signature `{signature}`: {source}")]
    InvalidSignature {
        signature: String,
        source: alloy_json_abi::parser::Error,
    },

    #[error("`{signature}` takes {expected} argument(s), got {actual}")]
    ArityMismatch {
        signature: String,
        expected: usize,
        actual: usize,
    },

    #[error("argument {index} (`{value}`) does not coerce to `{ty}`: {source}")]
    ArgumentMismatch {
        index: usize,
        value: String,
        ty: String,
        source: alloy_dyn_abi::Error,
    },

    #[error("abi encoding failed: {0}")]
    Encode(#[from] alloy_dyn_abi::Error),
}

/// Encodes a call to `signature` with the given ordered arguments.
///
/// Purely local; argument count or type mismatches fail before anything
/// touches the chain.
pub fn encode_call(signature: &str, args: &[String]) -> Result<Bytes, EncodeError> {
    let function =
        Function::parse(signature).map_err(|source| EncodeError::InvalidSignature {
            signature: signature.to_string(),
            source,
        })?;

    if function.inputs.len() != args.len() {
        return Err(EncodeError::ArityMismatch {
            signature: signature.to_string(),
            expected: function.inputs.len(),
            actual: args.len(),
        });
    }

    let values = function
        .inputs
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (param, raw))| {
            let ty = param.resolve().map_err(EncodeError::Encode)?;
            ty.coerce_str(raw)
                .map_err(|source| EncodeError::ArgumentMismatch {
                    index,
                    value: raw.clone(),
                    ty: ty.sol_type_name().into_owned(),
                    source,
                })
        })
        .collect::<Result<Vec<DynSolValue>, EncodeError>>()?;

    let data = function.abi_encode_input(&values)?;
    Ok(data.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{hex, keccak256};

    #[test]
    fn nullary_call_is_exactly_the_selector() {
        let calldata = encode_call("pause()", &[]).unwrap();
        assert_eq!(calldata.as_ref(), &keccak256("pause()")[..4]);
        // The well-known pause() selector, with zero additional bytes.
        assert_eq!(calldata.as_ref(), &hex!("8456cb59")[..]);
    }

    #[test]
    fn value_arguments_are_left_padded() {
        let calldata = encode_call("setRate(uint256)", &["1500".to_string()]).unwrap();
        assert_eq!(calldata.len(), 4 + 32);
        assert_eq!(&calldata[..4], &keccak256("setRate(uint256)")[..4]);
        assert_eq!(&calldata[32..36], &1500u32.to_be_bytes());
    }

    #[test]
    fn mixed_types_encode_in_order() {
        let role = "0x65d7a28e3265b37a6474929f336521b332c1681b933f6cb9f3376673440d862a";
        let account = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
        let calldata = encode_call(
            "grantRole(bytes32,address)",
            &[role.to_string(), account.to_string()],
        )
        .unwrap();

        assert_eq!(calldata.len(), 4 + 64);
        assert_eq!(&calldata[4..36], &hex!("65d7a28e3265b37a6474929f336521b332c1681b933f6cb9f3376673440d862a"));
        // Address occupies the low 20 bytes of its word.
        assert_eq!(&calldata[36..48], &[0u8; 12]);
    }

    #[test]
    fn argument_count_mismatch_is_rejected() {
        assert!(matches!(
            encode_call("setRate(uint256)", &[]),
            Err(EncodeError::ArityMismatch { expected: 1, actual: 0, .. })
        ));
    }

    #[test]
    fn uncoercible_argument_is_rejected() {
        assert!(matches!(
            encode_call("setRate(uint256)", &["not-a-number".to_string()]),
            Err(EncodeError::ArgumentMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn garbage_signature_is_rejected() {
        assert!(matches!(
            encode_call("not a signature", &[]),
            Err(EncodeError::InvalidSignature { .. })
        ));
    }
}
