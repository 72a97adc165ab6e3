use std::sync::Arc;

use serde_json::Value;
use skein_crypto::args_hash::args_hash;
use skein_store::traits::StatePort;
use skein_types::action::Action;
use skein_types::primitives::{ArgsHash, ContractName};
use tracing::debug;

use crate::error::BindError;

/// Memoizes reads of one contract by `(method, args hash)`.
///
/// A read never waits for its value. The returned hash is the key under
/// which the value appears in the store once the dispatched request
/// completes.
pub struct ReadCache {
    contract: ContractName,
    store: Arc<dyn StatePort>,
}

impl ReadCache {
    pub fn new(contract: ContractName, store: Arc<dyn StatePort>) -> Self {
        Self { contract, store }
    }

    /// Return the cache key for `method(args)`, dispatching a fresh read unless
    /// the store already holds a servable entry and the contract is synced.
    pub fn cached_read(
        &self,
        method: &str,
        index: usize,
        args: &[Value],
    ) -> Result<ArgsHash, BindError> {
        let hash = args_hash(args);

        let cached = self
            .store
            .cache_entry(&self.contract, method, &hash)?
            .is_some_and(|entry| entry.is_servable());
        // The synced flag is a contract-wide epoch token, read without coordination.
        if cached && self.store.is_synced(&self.contract)? {
            debug!(contract = %self.contract, method, args_hash = %hash, "read cache hit");
            return Ok(hash);
        }

        self.store.dispatch(Action::CallContractFn {
            contract: self.contract.clone(),
            method: method.to_string(),
            index,
            args: args.to_vec(),
            args_hash: hash.clone(),
        })?;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skein_store::entry::CacheEntry;
    use skein_store::memory::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, ReadCache) {
        let store = Arc::new(MemoryStore::new());
        store
            .dispatch(Action::ContractInitialized {
                contract: "token".to_string(),
            })
            .unwrap();
        let cache = ReadCache::new("token".to_string(), store.clone());
        (store, cache)
    }

    fn call_count(store: &MemoryStore) -> usize {
        store
            .history()
            .unwrap()
            .iter()
            .filter(|a| a.kind() == "CALL_CONTRACT_FN")
            .count()
    }

    #[test]
    fn test_zero_args_hash() {
        let (_store, cache) = setup();
        assert_eq!(cache.cached_read("get_balance", 0, &[]).unwrap().as_str(), "0x0");
    }

    #[test]
    fn test_synced_hit_does_not_redispatch() {
        let (store, cache) = setup();
        let args = [json!("alice")];

        let first = cache.cached_read("get_balance", 0, &args).unwrap();
        assert_eq!(call_count(&store), 1);

        let second = cache.cached_read("get_balance", 0, &args).unwrap();
        let third = cache.cached_read("get_balance", 0, &args).unwrap();
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(call_count(&store), 1);
    }

    #[test]
    fn test_unsynced_always_dispatches() {
        let (store, cache) = setup();
        let args = [json!("alice")];
        cache.cached_read("get_balance", 0, &args).unwrap();
        store.set_synced("token", false).unwrap();

        for n in 2..=4 {
            cache.cached_read("get_balance", 0, &args).unwrap();
            assert_eq!(call_count(&store), n);
        }
    }

    #[test]
    fn test_unsynced_ready_entry_still_dispatches() {
        let (store, cache) = setup();
        let args = [json!("alice")];
        let hash = cache.cached_read("get_balance", 0, &args).unwrap();
        store
            .dispatch(Action::ContractFnResolved {
                contract: "token".to_string(),
                method: "get_balance".to_string(),
                args_hash: hash.clone(),
                value: Some("42".to_string()),
            })
            .unwrap();
        assert_eq!(
            store.cache_entry("token", "get_balance", &hash).unwrap(),
            Some(CacheEntry::Ready(Some("42".to_string())))
        );

        cache.cached_read("get_balance", 0, &args).unwrap();
        assert_eq!(call_count(&store), 1);

        store.set_synced("token", false).unwrap();
        for n in 2..=4 {
            cache.cached_read("get_balance", 0, &args).unwrap();
            assert_eq!(call_count(&store), n);
        }
    }

    #[test]
    fn test_different_args_are_different_keys() {
        let (store, cache) = setup();
        let a = cache.cached_read("get_balance", 0, &[json!("alice")]).unwrap();
        let b = cache.cached_read("get_balance", 0, &[json!("bob")]).unwrap();
        assert_ne!(a, b);
        assert_eq!(call_count(&store), 2);
    }

    #[test]
    fn test_failed_entry_is_redispatched() {
        let (store, cache) = setup();
        let hash = cache.cached_read("get_balance", 0, &[]).unwrap();
        store
            .dispatch(Action::ContractFnFailed {
                contract: "token".to_string(),
                method: "get_balance".to_string(),
                args_hash: hash,
                reason: "boom".to_string(),
            })
            .unwrap();

        cache.cached_read("get_balance", 0, &[]).unwrap();
        assert_eq!(call_count(&store), 2);
    }

    #[test]
    fn test_dispatch_carries_request() {
        let (store, cache) = setup();
        let hash = cache.cached_read("get_balance", 3, &[json!(7)]).unwrap();
        let history = store.history().unwrap();
        match history.last().unwrap() {
            Action::CallContractFn {
                contract,
                method,
                index,
                args,
                args_hash,
            } => {
                assert_eq!(contract, "token");
                assert_eq!(method, "get_balance");
                assert_eq!(*index, 3);
                assert_eq!(args, &vec![json!(7)]);
                assert_eq!(args_hash, &hash);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
