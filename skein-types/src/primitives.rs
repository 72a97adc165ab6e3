use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ZERO_ARGS_HASH;

/// 32-byte public key identifying the account that signs calls and sends.
pub type Identity = [u8; 32];

/// Amount of native tokens attached to a call (value or fee).
pub type Amount = u128;

/// Gas limit for a state-mutating call.
pub type Gas = u64;

/// Ordinal position of a pending send in the transaction stack.
pub type SlotIndex = u64;

/// Transaction identifier reported by the ledger once a send is broadcast.
pub type TxId = String;

/// Name of a bound contract. Contracts are named by the address they were bound with.
pub type ContractName = String;

/// Deterministic digest of an invocation's argument list, used as a cache key.
///
/// Always `0x`-prefixed. The reserved value `0x0` stands for a call with no
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgsHash(String);

impl ArgsHash {
    /// The reserved hash for zero-argument calls.
    pub fn zero() -> Self {
        Self(ZERO_ARGS_HASH.to_string())
    }

    /// Wrap a 32-byte digest as a `0x`-prefixed lowercase hex string.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(format!("0x{}", hex::encode(digest)))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_ARGS_HASH
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArgsHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArgsHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
