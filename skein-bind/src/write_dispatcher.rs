use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use skein_store::traits::StatePort;
use skein_types::action::Action;
use skein_types::constants::TEMP_KEY_PREFIX;
use skein_types::primitives::{ContractName, SlotIndex};
use tracing::{debug, warn};

use crate::error::BindError;

/// Queues state-mutating calls of one contract into ordered ledger slots.
pub struct WriteDispatcher {
    contract: ContractName,
    store: Arc<dyn StatePort>,
    next_slot: Mutex<SlotIndex>,
}

impl WriteDispatcher {
    pub fn new(contract: ContractName, store: Arc<dyn StatePort>) -> Self {
        Self {
            contract,
            store,
            next_slot: Mutex::new(0),
        }
    }

    /// Reserve the next slot for `method(args)` and queue the send.
    ///
    /// The slot is never below the current ledger length. The placeholder
    /// push and the send request both leave before another caller on this
    /// binding can take a slot.
    pub fn cached_send(
        &self,
        method: &str,
        index: usize,
        args: &[Value],
    ) -> Result<SlotIndex, BindError> {
        let mut next_slot = self.next_slot.lock().map_err(|e| BindError::Poisoned {
            reason: e.to_string(),
        })?;

        let ledger_len = self.store.tx_stack_len()? as SlotIndex;
        let slot = ledger_len.max(*next_slot);
        let temp_key = temp_key(slot);

        self.store.dispatch(Action::PushToTxStack {
            temp_key: temp_key.clone(),
        })?;
        // The placeholder is on the ledger now, so the slot is spent either way.
        *next_slot = slot + 1;

        let sent = self.store.dispatch(Action::SendContractTx {
            contract: self.contract.clone(),
            method: method.to_string(),
            index,
            args: args.to_vec(),
            stack_id: slot,
            temp_key: temp_key.clone(),
        });
        if let Err(e) = sent {
            warn!(contract = %self.contract, method, slot, error = %e, "send dispatch failed");
            let settled = self.store.dispatch(Action::TxFailed {
                stack_id: slot,
                temp_key,
                reason: e.to_string(),
            });
            if let Err(settle_err) = settled {
                warn!(slot, error = %settle_err, "could not settle orphaned slot");
            }
            return Err(e.into());
        }

        debug!(contract = %self.contract, method, slot, "queued send");
        Ok(slot)
    }

    /// The lowest slot the next send may take, ignoring the ledger.
    pub fn next_slot(&self) -> Result<SlotIndex, BindError> {
        self.next_slot
            .lock()
            .map(|slot| *slot)
            .map_err(|e| BindError::Poisoned {
                reason: e.to_string(),
            })
    }
}

fn temp_key(slot: SlotIndex) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{TEMP_KEY_PREFIX}{millis}_{slot}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RejectingStore;
    use proptest::prelude::*;
    use serde_json::json;
    use skein_store::entry::TxStackEntry;
    use skein_store::memory::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, WriteDispatcher) {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = WriteDispatcher::new("token".to_string(), store.clone());
        (store, dispatcher)
    }

    #[test]
    fn test_slots_increase_from_empty_ledger() {
        let (store, dispatcher) = setup();
        for expected in 0..5 {
            assert_eq!(
                dispatcher.cached_send("transfer", 1, &[json!(100)]).unwrap(),
                expected
            );
        }
        assert_eq!(store.tx_stack().unwrap().len(), 5);
        assert_eq!(dispatcher.next_slot().unwrap(), 5);
    }

    #[test]
    fn test_slot_starts_at_ledger_length() {
        let (store, dispatcher) = setup();
        for n in 0..3 {
            store
                .dispatch(Action::PushToTxStack {
                    temp_key: format!("other_{n}"),
                })
                .unwrap();
        }

        assert_eq!(dispatcher.cached_send("transfer", 1, &[json!(100)]).unwrap(), 3);

        let history = store.history().unwrap();
        let kinds: Vec<_> = history.iter().skip(3).map(Action::kind).collect();
        assert_eq!(kinds, vec!["PUSH_TO_TXSTACK", "SEND_CONTRACT_TX"]);
    }

    #[test]
    fn test_temp_key_shared_by_push_and_send() {
        let (store, dispatcher) = setup();
        dispatcher.cached_send("transfer", 2, &[json!(1)]).unwrap();

        let history = store.history().unwrap();
        let Action::PushToTxStack { temp_key: pushed } = &history[0] else {
            panic!("expected push first");
        };
        let Action::SendContractTx {
            temp_key,
            stack_id,
            index,
            ..
        } = &history[1]
        else {
            panic!("expected send second");
        };
        assert_eq!(pushed, temp_key);
        assert!(temp_key.starts_with("TEMP_"));
        assert!(temp_key.ends_with("_0"));
        assert_eq!(*stack_id, 0);
        assert_eq!(*index, 2);
    }

    #[test]
    fn test_ledger_growth_from_other_writers_is_skipped() {
        let (store, dispatcher) = setup();
        assert_eq!(dispatcher.cached_send("transfer", 1, &[]).unwrap(), 0);
        for n in 0..3 {
            store
                .dispatch(Action::PushToTxStack {
                    temp_key: format!("other_{n}"),
                })
                .unwrap();
        }
        assert_eq!(dispatcher.cached_send("transfer", 1, &[]).unwrap(), 4);
        assert_eq!(dispatcher.next_slot().unwrap(), 5);
    }

    #[test]
    fn test_rejected_send_settles_its_slot() {
        let memory = Arc::new(MemoryStore::new());
        let store = Arc::new(RejectingStore::new(memory.clone()));
        let dispatcher = WriteDispatcher::new("token".to_string(), store.clone());
        store.reject("SEND_CONTRACT_TX");

        assert!(matches!(
            dispatcher.cached_send("transfer", 1, &[json!(100)]),
            Err(BindError::Store(_))
        ));
        let stack = memory.tx_stack().unwrap();
        assert_eq!(stack.len(), 1);
        assert!(matches!(&stack[0], TxStackEntry::Failed(reason) if reason.contains("SEND_CONTRACT_TX")));
        assert_eq!(dispatcher.next_slot().unwrap(), 1);

        store.accept("SEND_CONTRACT_TX");
        assert_eq!(dispatcher.cached_send("transfer", 1, &[json!(100)]).unwrap(), 1);
    }

    #[test]
    fn test_rejected_push_spends_no_slot() {
        let memory = Arc::new(MemoryStore::new());
        let store = Arc::new(RejectingStore::new(memory.clone()));
        let dispatcher = WriteDispatcher::new("token".to_string(), store.clone());
        store.reject("PUSH_TO_TXSTACK");

        assert!(dispatcher.cached_send("transfer", 1, &[]).is_err());
        assert!(memory.tx_stack().unwrap().is_empty());
        assert!(memory.history().unwrap().is_empty());
        assert_eq!(dispatcher.next_slot().unwrap(), 0);
    }

    proptest! {
        #[test]
        fn prop_slots_follow_ledger_prefix(prefix in 0usize..20, sends in 1usize..20) {
            let (store, dispatcher) = setup();
            for n in 0..prefix {
                store
                    .dispatch(Action::PushToTxStack {
                        temp_key: format!("other_{n}"),
                    })
                    .unwrap();
            }

            let slots: Vec<SlotIndex> = (0..sends)
                .map(|_| dispatcher.cached_send("transfer", 1, &[]).unwrap())
                .collect();
            let expected: Vec<SlotIndex> = (prefix as u64..(prefix + sends) as u64).collect();
            prop_assert_eq!(slots, expected);
            prop_assert_eq!(store.tx_stack_len().unwrap(), prefix + sends);
        }
    }
}
