use serde::{Deserialize, Serialize};
use skein_types::primitives::TxId;

/// State of a cached read, keyed by `(contract, method, args hash)`.
///
/// A read request returns its key immediately; the value shows up later as
/// the entry moves from `Pending` to `Ready` (or `Failed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheEntry {
    Pending,
    Ready(Option<String>),
    Failed(String),
}

impl CacheEntry {
    /// Whether the entry may short-circuit a fresh dispatch.
    ///
    /// Failed entries never do, so a failed read is retried on the next call.
    pub fn is_servable(&self) -> bool {
        !matches!(self, CacheEntry::Failed(_))
    }

    /// The resolved value, if the read has completed.
    pub fn value(&self) -> Option<&str> {
        match self {
            CacheEntry::Ready(value) => value.as_deref(),
            _ => None,
        }
    }
}

/// One slot of the shared transaction stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStackEntry {
    /// Reserved under a temporary key until the broadcaster reports back.
    Placeholder(String),
    Broadcast(TxId),
    Failed(String),
}
