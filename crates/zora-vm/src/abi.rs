//! Call parameter and return value encoding.
//!
//! Parameters travel as one borsh-encoded tuple matching the function
//! signature; return values as a single borsh value.

use borsh::{BorshDeserialize, BorshSerialize};
use zora_types::{Address, Call};

use crate::error::ExecutionError;
use crate::runtime::Host;

pub fn decode<T: BorshDeserialize>(signature: &str, data: &[u8]) -> Result<T, ExecutionError> {
    borsh::from_slice(data).map_err(|e| ExecutionError::InvalidCalldata {
        signature: signature.to_string(),
        reason: e.to_string(),
    })
}

pub fn encode<T: BorshSerialize>(value: &T) -> Result<Vec<u8>, ExecutionError> {
    borsh::to_vec(value).map_err(|e| ExecutionError::Encoding(e.to_string()))
}

/// Build a zero-value call with encoded arguments.
pub fn call<A: BorshSerialize>(
    target: Address,
    signature: &str,
    args: &A,
) -> Result<Call, ExecutionError> {
    Ok(Call::new(target, 0, signature, encode(args)?))
}

/// Perform `call` through the host and decode its return value.
pub fn invoke<R: BorshDeserialize>(
    host: &mut dyn Host,
    from: Address,
    call: &Call,
) -> Result<R, ExecutionError> {
    let output = host.call(from, call)?;
    borsh::from_slice(&output).map_err(|e| ExecutionError::InvalidCalldata {
        signature: format!("{} (return value)", call.signature),
        reason: e.to_string(),
    })
}
