//! In-memory stand-ins for remote contracts.
//!
//! [`MockContract`] answers dry runs from canned log lines and records every
//! primitive it receives; [`MockConnector`] hands out mocks by address. Use
//! them with a [`skein_store::memory::MemoryStore`] to exercise bindings
//! without a ledger.
//!
//! ```ignore
//! use skein_bind::testing::*;
//!
//! let mock = MockContract::with_schema(token_schema_logs());
//! mock.set_logs("get_balance", vec!["42".into()]);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};
use skein_store::entry::CacheEntry;
use skein_store::error::StoreError;
use skein_store::memory::MemoryStore;
use skein_store::traits::StatePort;
use skein_types::action::Action;
use skein_types::constants::SCHEMA_METHOD;
use skein_types::primitives::{Amount, ArgsHash, Gas, Identity};

use crate::error::BindError;
use crate::remote::{ContractConnector, DryRunResult, Payload, RemoteContract, TxReceipt};

/// Test identity for the first actor.
pub const ALICE: Identity = [1u8; 32];
/// Test identity for the second actor.
pub const BOB: Identity = [2u8; 32];

/// A recorded dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunRecord {
    pub identity: Identity,
    pub method: String,
    pub value: Amount,
}

/// A recorded state-mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub identity: Identity,
    pub method: String,
    pub value: Amount,
    pub gas_limit: Gas,
    pub fee: Amount,
    pub payload: Payload,
}

#[derive(Default)]
struct MockState {
    logs: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    fail_init: bool,
    init_count: usize,
    dry_runs: Vec<DryRunRecord>,
    calls: Vec<CallRecord>,
}

/// A remote contract that lives entirely in memory.
#[derive(Default)]
pub struct MockContract {
    state: Mutex<MockState>,
}

impl MockContract {
    /// A contract with no schema and no canned logs.
    pub fn new() -> Self {
        Self::default()
    }

    /// A contract whose schema dry run answers with `logs`.
    pub fn with_schema(logs: Vec<String>) -> Self {
        let mock = Self::new();
        mock.set_logs(SCHEMA_METHOD, logs);
        mock
    }

    /// Canned log lines returned by dry runs of `method`.
    pub fn set_logs(&self, method: &str, logs: Vec<String>) {
        self.lock().logs.insert(method.to_string(), logs);
    }

    /// Make every dry run and call of `method` fail with a transport error.
    pub fn set_failing(&self, method: &str) {
        self.lock().failing.insert(method.to_string());
    }

    /// Make `init` fail.
    pub fn fail_init(&self) {
        self.lock().fail_init = true;
    }

    pub fn init_count(&self) -> usize {
        self.lock().init_count
    }

    pub fn dry_runs(&self) -> Vec<DryRunRecord> {
        self.lock().dry_runs.clone()
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failing(state: &MockState, method: &str) -> Result<(), BindError> {
        if state.failing.contains(method) {
            return Err(BindError::Transport {
                reason: format!("{method} rejected by mock"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteContract for MockContract {
    async fn init(&self) -> Result<(), BindError> {
        let mut state = self.lock();
        state.init_count += 1;
        if state.fail_init {
            return Err(BindError::Transport {
                reason: "init rejected by mock".to_string(),
            });
        }
        Ok(())
    }

    async fn test(
        &self,
        identity: &Identity,
        method: &str,
        value: Amount,
    ) -> Result<DryRunResult, BindError> {
        let mut state = self.lock();
        state.dry_runs.push(DryRunRecord {
            identity: *identity,
            method: method.to_string(),
            value,
        });
        Self::check_failing(&state, method)?;
        Ok(DryRunResult {
            logs: state.logs.get(method).cloned().unwrap_or_default(),
        })
    }

    async fn call(
        &self,
        identity: &Identity,
        method: &str,
        value: Amount,
        gas_limit: Gas,
        fee: Amount,
        payload: Payload,
    ) -> Result<TxReceipt, BindError> {
        let mut state = self.lock();
        state.calls.push(CallRecord {
            identity: *identity,
            method: method.to_string(),
            value,
            gas_limit,
            fee,
            payload,
        });
        Self::check_failing(&state, method)?;
        Ok(TxReceipt {
            tx_id: format!("tx-{}", state.calls.len()),
        })
    }
}

/// Hands out [`MockContract`]s by address, creating token-schema mocks on demand.
#[derive(Default)]
pub struct MockConnector {
    contracts: Mutex<HashMap<String, Arc<MockContract>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `mock` for `address`.
    pub fn insert(&self, address: &str, mock: Arc<MockContract>) {
        self.lock().insert(address.to_string(), mock);
    }

    /// The mock served for `address`, if one was handed out or inserted.
    pub fn get(&self, address: &str) -> Option<Arc<MockContract>> {
        self.lock().get(address).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<MockContract>>> {
        self.contracts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ContractConnector for MockConnector {
    fn connect(&self, address: &str) -> Arc<dyn RemoteContract> {
        self.lock()
            .entry(address.to_string())
            .or_insert_with(|| Arc::new(MockContract::with_schema(token_schema_logs())))
            .clone()
    }
}

/// A [`MemoryStore`] that refuses to dispatch chosen action kinds.
///
/// Rejected actions are neither applied nor recorded.
pub struct RejectingStore {
    inner: Arc<MemoryStore>,
    rejected: Mutex<HashSet<&'static str>>,
}

impl RejectingStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            rejected: Mutex::new(HashSet::new()),
        }
    }

    /// Fail every dispatch whose [`Action::kind`] is `kind`.
    pub fn reject(&self, kind: &'static str) {
        self.rejected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(kind);
    }

    /// Accept `kind` again.
    pub fn accept(&self, kind: &'static str) {
        self.rejected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(kind);
    }
}

impl StatePort for RejectingStore {
    fn cache_entry(
        &self,
        contract: &str,
        method: &str,
        args_hash: &ArgsHash,
    ) -> Result<Option<CacheEntry>, StoreError> {
        self.inner.cache_entry(contract, method, args_hash)
    }

    fn is_synced(&self, contract: &str) -> Result<bool, StoreError> {
        self.inner.is_synced(contract)
    }

    fn tx_stack_len(&self) -> Result<usize, StoreError> {
        self.inner.tx_stack_len()
    }

    fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        let kind = action.kind();
        let rejected = self
            .rejected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(kind);
        if rejected {
            return Err(StoreError::WriteError {
                reason: format!("{kind} rejected by test store"),
            });
        }
        self.inner.dispatch(action)
    }
}

/// Encode two schema sections as the log lines of a schema dry run.
pub fn schema_logs(constants: Value, methods: Value) -> Vec<String> {
    vec![constants.to_string(), methods.to_string()]
}

/// Schema of a small token contract: one read, two writes, one constant.
pub fn token_schema_logs() -> Vec<String> {
    schema_logs(
        json!({
            "required": ["decimals"],
            "properties": { "decimals": { "type": "integer" } }
        }),
        json!({
            "required": ["get_balance", "transfer", "approve"],
            "properties": {
                "get_balance": { "$ref": "#/definitions/Balance", "type": "object" },
                "transfer": { "$ref": "#/definitions/Transfer", "type": "object" },
                "approve": { "$ref": "#/definitions/Approve", "type": "object" }
            },
            "definitions": {
                "Balance": { "properties": { "owner": { "type": "string" } } },
                "Transfer": {
                    "properties": {
                        "amount": { "type": "integer" },
                        "recipient": { "type": "string" }
                    }
                },
                "Approve": {
                    "properties": {
                        "spender": { "type": "string" },
                        "amount": { "type": "integer" }
                    }
                }
            }
        }),
    )
}
