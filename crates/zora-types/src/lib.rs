//! Zora Types - shared definitions for the Zoracles contract suite.
//!
//! This crate provides:
//! - Addresses (20-byte, Bech32m encoded with the `zora` prefix)
//! - Hashes (32-byte blake3 digests)
//! - Block environment (height and timestamp) and time units
//! - `Call`, the unit of work a proposal or timelock carries

pub mod address;
pub mod hash;
pub mod env;
pub mod call;
pub mod error;

mod serialization;

pub use address::Address;
pub use hash::Hash;
pub use env::{BlockEnv, DAY, HOUR};
pub use call::Call;
pub use error::TypesError;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Address, BlockEnv, Call, Hash, TypesError, DAY, HOUR};
}
