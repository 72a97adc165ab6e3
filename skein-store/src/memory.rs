use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use skein_types::action::Action;
use skein_types::primitives::{ArgsHash, ContractName};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::entry::{CacheEntry, TxStackEntry};
use crate::error::StoreError;
use crate::traits::StatePort;

/// Per-contract slice of the store.
#[derive(Debug, Clone, Default)]
pub struct ContractState {
    pub initialized: bool,
    pub synced: bool,
    /// method name -> args hash -> entry
    pub methods: HashMap<String, HashMap<ArgsHash, CacheEntry>>,
}

#[derive(Debug, Default)]
struct StoreState {
    contracts: HashMap<ContractName, ContractState>,
    tx_stack: Vec<TxStackEntry>,
    history: Vec<Action>,
}

/// In-memory state store that applies dispatched actions as they arrive.
///
/// Every dispatched action is recorded in order and forwarded to all
/// subscribers, so an executor can pick up read and send requests.
pub struct MemoryStore {
    state: RwLock<StoreState>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Action>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Receive every action dispatched from now on.
    pub fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<Action>, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subs = self.subscribers.lock().map_err(|e| StoreError::WriteError {
            reason: e.to_string(),
        })?;
        subs.push(tx);
        Ok(rx)
    }

    /// Flip a contract's synced flag, as a consensus listener would.
    pub fn set_synced(&self, contract: &str, synced: bool) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state
            .contracts
            .entry(contract.to_string())
            .or_default()
            .synced = synced;
        Ok(())
    }

    /// Snapshot of a contract's slice, if present.
    pub fn contract_state(&self, contract: &str) -> Result<Option<ContractState>, StoreError> {
        Ok(self.read()?.contracts.get(contract).cloned())
    }

    /// Snapshot of the transaction stack.
    pub fn tx_stack(&self) -> Result<Vec<TxStackEntry>, StoreError> {
        Ok(self.read()?.tx_stack.clone())
    }

    /// Every action dispatched so far, in dispatch order.
    pub fn history(&self) -> Result<Vec<Action>, StoreError> {
        Ok(self.read()?.history.clone())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state.read().map_err(|e| StoreError::ReadError {
            reason: e.to_string(),
        })
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.state.write().map_err(|e| StoreError::WriteError {
            reason: e.to_string(),
        })
    }

    fn apply(state: &mut StoreState, action: &Action) {
        match action {
            Action::CallContractFn {
                contract,
                method,
                args_hash,
                ..
            } => {
                let entry = state
                    .contracts
                    .entry(contract.clone())
                    .or_default()
                    .methods
                    .entry(method.clone())
                    .or_default()
                    .entry(args_hash.clone())
                    .or_insert(CacheEntry::Pending);
                if !entry.is_servable() {
                    *entry = CacheEntry::Pending;
                }
            }
            Action::ContractFnResolved {
                contract,
                method,
                args_hash,
                value,
            } => {
                let entry = CacheEntry::Ready(value.clone());
                Self::set_entry(state, contract, method, args_hash, entry);
            }
            Action::ContractFnFailed {
                contract,
                method,
                args_hash,
                reason,
            } => {
                let entry = CacheEntry::Failed(reason.clone());
                Self::set_entry(state, contract, method, args_hash, entry);
            }
            Action::PushToTxStack { temp_key } => {
                state.tx_stack.push(TxStackEntry::Placeholder(temp_key.clone()));
            }
            Action::TxBroadcasted {
                stack_id,
                temp_key,
                tx_id,
            } => {
                let settled = TxStackEntry::Broadcast(tx_id.clone());
                Self::settle_slot(state, *stack_id, temp_key, settled);
            }
            Action::TxFailed {
                stack_id,
                temp_key,
                reason,
            } => {
                let settled = TxStackEntry::Failed(reason.clone());
                Self::settle_slot(state, *stack_id, temp_key, settled);
            }
            Action::ContractInitializing { contract } => {
                state.contracts.entry(contract.clone()).or_default();
            }
            Action::ContractInitialized { contract } => {
                let slice = state.contracts.entry(contract.clone()).or_default();
                slice.initialized = true;
                slice.synced = true;
            }
            Action::DeleteContract { contract } => {
                state.contracts.remove(contract);
            }
            Action::SendContractTx { .. } | Action::ConsensusListening { .. } => {}
        }
    }

    fn set_entry(
        state: &mut StoreState,
        contract: &str,
        method: &str,
        args_hash: &ArgsHash,
        entry: CacheEntry,
    ) {
        // Results for a contract deleted in the meantime are dropped.
        let Some(slice) = state.contracts.get_mut(contract) else {
            debug!(contract, method, "dropping result for unknown contract");
            return;
        };
        slice
            .methods
            .entry(method.to_string())
            .or_default()
            .insert(args_hash.clone(), entry);
    }

    fn settle_slot(state: &mut StoreState, stack_id: u64, temp_key: &str, settled: TxStackEntry) {
        match state.tx_stack.get_mut(stack_id as usize) {
            Some(slot) if *slot == TxStackEntry::Placeholder(temp_key.to_string()) => {
                *slot = settled;
            }
            _ => warn!(stack_id, temp_key, "no placeholder for settled transaction"),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatePort for MemoryStore {
    fn cache_entry(
        &self,
        contract: &str,
        method: &str,
        args_hash: &ArgsHash,
    ) -> Result<Option<CacheEntry>, StoreError> {
        let state = self.read()?;
        Ok(state
            .contracts
            .get(contract)
            .and_then(|c| c.methods.get(method))
            .and_then(|m| m.get(args_hash))
            .cloned())
    }

    fn is_synced(&self, contract: &str) -> Result<bool, StoreError> {
        let state = self.read()?;
        Ok(state.contracts.get(contract).is_some_and(|c| c.synced))
    }

    fn tx_stack_len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.tx_stack.len())
    }

    fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        let mut state = self.write()?;
        Self::apply(&mut state, &action);
        state.history.push(action.clone());

        // Forward while the state lock is held so subscribers see dispatch order.
        let mut subs = self.subscribers.lock().map_err(|e| StoreError::WriteError {
            reason: e.to_string(),
        })?;
        subs.retain(|tx| tx.send(action.clone()).is_ok());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(contract: &str, method: &str, hash: &ArgsHash) -> Action {
        Action::CallContractFn {
            contract: contract.to_string(),
            method: method.to_string(),
            index: 0,
            args: vec![],
            args_hash: hash.clone(),
        }
    }

    #[test]
    fn test_call_marks_pending_then_resolves() {
        let store = MemoryStore::new();
        let hash = ArgsHash::zero();
        store
            .dispatch(Action::ContractInitializing {
                contract: "c".to_string(),
            })
            .unwrap();

        store.dispatch(call("c", "get_x", &hash)).unwrap();
        assert_eq!(
            store.cache_entry("c", "get_x", &hash).unwrap(),
            Some(CacheEntry::Pending)
        );

        store
            .dispatch(Action::ContractFnResolved {
                contract: "c".to_string(),
                method: "get_x".to_string(),
                args_hash: hash.clone(),
                value: Some("7".to_string()),
            })
            .unwrap();
        let entry = store.cache_entry("c", "get_x", &hash).unwrap().unwrap();
        assert_eq!(entry.value(), Some("7"));
    }

    #[test]
    fn test_failed_entry_returns_to_pending_on_new_call() {
        let store = MemoryStore::new();
        let hash = ArgsHash::zero();
        store.dispatch(call("c", "get_x", &hash)).unwrap();
        store
            .dispatch(Action::ContractFnFailed {
                contract: "c".to_string(),
                method: "get_x".to_string(),
                args_hash: hash.clone(),
                reason: "boom".to_string(),
            })
            .unwrap();
        assert!(matches!(
            store.cache_entry("c", "get_x", &hash).unwrap(),
            Some(CacheEntry::Failed(_))
        ));

        store.dispatch(call("c", "get_x", &hash)).unwrap();
        assert_eq!(
            store.cache_entry("c", "get_x", &hash).unwrap(),
            Some(CacheEntry::Pending)
        );
    }

    #[test]
    fn test_initialized_contract_is_synced() {
        let store = MemoryStore::new();
        assert!(!store.is_synced("c").unwrap());
        store
            .dispatch(Action::ContractInitialized {
                contract: "c".to_string(),
            })
            .unwrap();
        assert!(store.is_synced("c").unwrap());

        store.set_synced("c", false).unwrap();
        assert!(!store.is_synced("c").unwrap());
    }

    #[test]
    fn test_tx_stack_placeholder_settles() {
        let store = MemoryStore::new();
        store
            .dispatch(Action::PushToTxStack {
                temp_key: "TEMP_1_0".to_string(),
            })
            .unwrap();
        assert_eq!(store.tx_stack_len().unwrap(), 1);

        // Wrong temp key leaves the placeholder alone.
        store
            .dispatch(Action::TxBroadcasted {
                stack_id: 0,
                temp_key: "TEMP_other".to_string(),
                tx_id: "ab".to_string(),
            })
            .unwrap();
        assert_eq!(
            store.tx_stack().unwrap()[0],
            TxStackEntry::Placeholder("TEMP_1_0".to_string())
        );

        store
            .dispatch(Action::TxBroadcasted {
                stack_id: 0,
                temp_key: "TEMP_1_0".to_string(),
                tx_id: "cd".to_string(),
            })
            .unwrap();
        assert_eq!(
            store.tx_stack().unwrap()[0],
            TxStackEntry::Broadcast("cd".to_string())
        );
    }

    #[test]
    fn test_delete_contract_clears_slice() {
        let store = MemoryStore::new();
        store
            .dispatch(Action::ContractInitialized {
                contract: "c".to_string(),
            })
            .unwrap();
        store
            .dispatch(Action::DeleteContract {
                contract: "c".to_string(),
            })
            .unwrap();
        assert!(store.contract_state("c").unwrap().is_none());
        assert_eq!(store.history().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe().unwrap();
        store
            .dispatch(Action::PushToTxStack {
                temp_key: "a".to_string(),
            })
            .unwrap();
        store
            .dispatch(Action::PushToTxStack {
                temp_key: "b".to_string(),
            })
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().kind(), "PUSH_TO_TXSTACK");
        match rx.recv().await.unwrap() {
            Action::PushToTxStack { temp_key } => assert_eq!(temp_key, "b"),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let store = MemoryStore::new();
        let rx = store.subscribe().unwrap();
        drop(rx);
        store
            .dispatch(Action::PushToTxStack {
                temp_key: "a".to_string(),
            })
            .unwrap();
        assert!(store.subscribers.lock().unwrap().is_empty());
    }
}
