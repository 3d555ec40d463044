use crate::address::Address;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// A single call: `target.signature(data)` carrying `value` native units.
///
/// An empty `signature` means a plain value transfer to `target`.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Call {
    pub target: Address,
    pub value: u128,
    pub signature: String,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

impl Call {
    pub fn new(target: Address, value: u128, signature: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            target,
            value,
            signature: signature.into(),
            data,
        }
    }

    /// Call with borsh-encoded arguments.
    pub fn encode<A: BorshSerialize>(
        target: Address,
        signature: impl Into<String>,
        args: &A,
    ) -> std::io::Result<Self> {
        Ok(Self::new(target, 0, signature, borsh::to_vec(args)?))
    }

    /// Plain native value transfer.
    pub fn transfer(target: Address, value: u128) -> Self {
        Self::new(target, value, "", Vec::new())
    }

    pub fn is_transfer(&self) -> bool {
        self.signature.is_empty()
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(s.as_str())).map_err(serde::de::Error::custom)
    }
}
