use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use skein_store::traits::StatePort;
use skein_types::abi::MethodDescriptor;
use skein_types::primitives::{ArgsHash, ContractName, Identity, SlotIndex};
use tracing::{info, warn};

use crate::config::BindingConfig;
use crate::error::BindError;
use crate::method_table::{Invoker, MethodEntry, MethodKind, MethodTable};
use crate::read_cache::ReadCache;
use crate::remote::{RemoteContract, TxReceipt};
use crate::schema::{parse_schema_logs, SchemaParser};
use crate::write_dispatcher::WriteDispatcher;

/// Lifecycle of a contract binding.
///
/// A bind that fails produces no binding, so there is no failed state here;
/// the error returned by [`ContractBinding::init`] carries the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Uninitialized,
    SchemaFetched,
    Bound,
    Active,
}

impl fmt::Display for BindingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BindingState::Uninitialized => "uninitialized",
            BindingState::SchemaFetched => "schema-fetched",
            BindingState::Bound => "bound",
            BindingState::Active => "active",
        };
        f.write_str(name)
    }
}

/// A remote contract bound through its self-described schema.
///
/// Owns the method table, the read cache, and the write dispatcher of one
/// contract. The binding is named by the address it was created with.
pub struct ContractBinding {
    address: ContractName,
    table: MethodTable,
    reads: ReadCache,
    writes: WriteDispatcher,
    state: RwLock<BindingState>,
}

impl ContractBinding {
    /// Open the contract session, fetch its schema, and build the method table.
    ///
    /// Returns a binding in [`BindingState::Bound`]. Any failure along the way
    /// is returned as is and leaves nothing behind.
    pub async fn init(
        remote: Arc<dyn RemoteContract>,
        identity: Identity,
        address: &str,
        store: Arc<dyn StatePort>,
        config: &BindingConfig,
    ) -> Result<Self, BindError> {
        let mut state = BindingState::Uninitialized;
        match Self::bind(remote, identity, address, store, config, &mut state).await {
            Ok(binding) => {
                info!(address, methods = binding.table.len(), "contract bound");
                Ok(binding)
            }
            Err(e) => {
                warn!(address, stage = %state, error = %e, "contract binding failed");
                Err(e)
            }
        }
    }

    async fn bind(
        remote: Arc<dyn RemoteContract>,
        identity: Identity,
        address: &str,
        store: Arc<dyn StatePort>,
        config: &BindingConfig,
        state: &mut BindingState,
    ) -> Result<Self, BindError> {
        remote.init().await?;
        let dry_run = remote.test(&identity, &config.schema.method, 0).await?;
        let schema = parse_schema_logs(&dry_run.logs)?;
        *state = BindingState::SchemaFetched;

        let parser = SchemaParser::new(config.schema.read_only_prefix.clone());
        let descriptors = parser.parse(&schema, config.schema.include_constants)?;
        let table = MethodTable::build(&descriptors, remote, identity, &config.send);
        *state = BindingState::Bound;

        Ok(Self {
            address: address.to_string(),
            table,
            reads: ReadCache::new(address.to_string(), Arc::clone(&store)),
            writes: WriteDispatcher::new(address.to_string(), store),
            state: RwLock::new(BindingState::Bound),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Contracts are named by their address.
    pub fn name(&self) -> &str {
        &self.address
    }

    pub fn state(&self) -> BindingState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark the binding as registered and serving.
    pub fn mark_active(&self) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = BindingState::Active;
    }

    /// Descriptors of every bound method, in schema order.
    pub fn descriptors(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.table.entries().map(|entry| &entry.descriptor)
    }

    /// A view of one bound method.
    pub fn method(&self, name: &str) -> Option<BoundMethod<'_>> {
        self.table.get(name).map(|entry| BoundMethod {
            binding: self,
            entry,
        })
    }

    /// Dry-run a read-only method and return its first log line.
    pub async fn call(&self, method: &str) -> Result<Option<String>, BindError> {
        self.bound(method)?.call().await
    }

    /// Submit a state-mutating method directly, bypassing the slot queue.
    pub async fn send(&self, method: &str, args: &[Value]) -> Result<TxReceipt, BindError> {
        self.bound(method)?.send(args).await
    }

    /// Cached read: returns the key the value will be stored under.
    pub fn cache_call(&self, method: &str, args: &[Value]) -> Result<ArgsHash, BindError> {
        self.bound(method)?.cache_call(args)
    }

    /// Queued send: returns the ledger slot reserved for the transaction.
    pub fn cache_send(&self, method: &str, args: &[Value]) -> Result<SlotIndex, BindError> {
        self.bound(method)?.cache_send(args)
    }

    fn bound(&self, method: &str) -> Result<BoundMethod<'_>, BindError> {
        self.method(method).ok_or_else(|| BindError::MethodNotFound {
            contract: self.address.clone(),
            method: method.to_string(),
        })
    }
}

impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("address", &self.address)
            .field("methods", &self.table.names().collect::<Vec<_>>())
            .field("state", &self.state())
            .finish()
    }
}

/// One method of a [`ContractBinding`], with its primary and cached invokers.
pub struct BoundMethod<'a> {
    binding: &'a ContractBinding,
    entry: &'a MethodEntry,
}

impl<'a> BoundMethod<'a> {
    pub fn name(&self) -> &'a str {
        &self.entry.descriptor.name
    }

    pub fn kind(&self) -> MethodKind {
        self.entry.kind()
    }

    pub fn descriptor(&self) -> &'a MethodDescriptor {
        &self.entry.descriptor
    }

    /// Position in the descriptor list the table was built from.
    pub fn index(&self) -> usize {
        self.entry.index
    }

    pub async fn call(&self) -> Result<Option<String>, BindError> {
        match &self.entry.invoker {
            Invoker::Read(reader) => reader.call().await,
            Invoker::Write(_) => Err(self.wrong_kind(MethodKind::Read)),
        }
    }

    pub async fn send(&self, args: &[Value]) -> Result<TxReceipt, BindError> {
        match &self.entry.invoker {
            Invoker::Write(writer) => writer.send(args).await,
            Invoker::Read(_) => Err(self.wrong_kind(MethodKind::Write)),
        }
    }

    pub fn cache_call(&self, args: &[Value]) -> Result<ArgsHash, BindError> {
        match self.kind() {
            MethodKind::Read => self
                .binding
                .reads
                .cached_read(self.name(), self.index(), args),
            MethodKind::Write => Err(self.wrong_kind(MethodKind::Read)),
        }
    }

    pub fn cache_send(&self, args: &[Value]) -> Result<SlotIndex, BindError> {
        match self.kind() {
            MethodKind::Write => self
                .binding
                .writes
                .cached_send(self.name(), self.index(), args),
            MethodKind::Read => Err(self.wrong_kind(MethodKind::Write)),
        }
    }

    fn wrong_kind(&self, expected: MethodKind) -> BindError {
        BindError::WrongMethodKind {
            method: self.name().to_string(),
            expected: expected.as_str(),
            actual: self.kind().as_str(),
        }
    }
}
