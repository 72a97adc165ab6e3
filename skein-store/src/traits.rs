use std::sync::Arc;

use skein_types::action::Action;
use skein_types::primitives::ArgsHash;

use crate::entry::CacheEntry;
use crate::error::StoreError;

/// The slice of external state the binding core reads, and the channel it writes through.
///
/// Implementations own the state; the core only ever observes it through the
/// query methods and changes it by dispatching [`Action`]s.
pub trait StatePort: Send + Sync {
    /// The cache entry for a read, if the store has seen one.
    fn cache_entry(
        &self,
        contract: &str,
        method: &str,
        args_hash: &ArgsHash,
    ) -> Result<Option<CacheEntry>, StoreError>;

    /// Whether the contract's cached reads reflect the ledger's current state.
    fn is_synced(&self, contract: &str) -> Result<bool, StoreError>;

    /// Current length of the shared transaction stack.
    fn tx_stack_len(&self) -> Result<usize, StoreError>;

    /// Hand an update message to the reconciler.
    fn dispatch(&self, action: Action) -> Result<(), StoreError>;
}

/// Blanket implementation so a store can be shared between bindings and the executor.
impl<S: StatePort + ?Sized> StatePort for Arc<S> {
    fn cache_entry(
        &self,
        contract: &str,
        method: &str,
        args_hash: &ArgsHash,
    ) -> Result<Option<CacheEntry>, StoreError> {
        (**self).cache_entry(contract, method, args_hash)
    }

    fn is_synced(&self, contract: &str) -> Result<bool, StoreError> {
        (**self).is_synced(contract)
    }

    fn tx_stack_len(&self) -> Result<usize, StoreError> {
        (**self).tx_stack_len()
    }

    fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        (**self).dispatch(action)
    }
}
