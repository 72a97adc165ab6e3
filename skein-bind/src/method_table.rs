use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use skein_types::abi::MethodDescriptor;
use skein_types::primitives::Identity;
use tracing::debug;

use crate::config::SendConfig;
use crate::error::BindError;
use crate::remote::{Payload, RemoteContract, TxReceipt};

/// Whether a method is answered by a dry run or submitted as a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Read,
    Write,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Read => "read",
            MethodKind::Write => "write",
        }
    }
}

/// Primary invoker of a read-only method: a zero-value dry run.
pub struct ReadInvoker {
    method: String,
    remote: Arc<dyn RemoteContract>,
    identity: Identity,
}

impl ReadInvoker {
    /// Run the method and resolve to its first log line.
    ///
    /// Only the first log is treated as the return value; later lines are
    /// discarded. A method that logs nothing resolves to `None`.
    pub async fn call(&self) -> Result<Option<String>, BindError> {
        let result = self.remote.test(&self.identity, &self.method, 0).await?;
        Ok(result.logs.into_iter().next())
    }
}

/// Primary invoker of a state-mutating method.
pub struct WriteInvoker {
    method: String,
    input_names: Vec<String>,
    remote: Arc<dyn RemoteContract>,
    identity: Identity,
    send: SendConfig,
}

impl WriteInvoker {
    /// Pack positional arguments into a JSON object keyed by input name.
    ///
    /// Keys follow input declaration order. Inputs without a matching
    /// argument are left out and surplus arguments are dropped.
    pub fn pack_args(&self, args: &[Value]) -> Result<String, BindError> {
        let mut packed = Map::with_capacity(self.input_names.len());
        for (name, arg) in self.input_names.iter().zip(args) {
            packed.insert(name.clone(), arg.clone());
        }
        Ok(serde_json::to_string(&Value::Object(packed))?)
    }

    /// Submit the method with packed arguments and the configured fee, gas limit, and value.
    pub async fn send(&self, args: &[Value]) -> Result<TxReceipt, BindError> {
        let payload = Payload::string(self.pack_args(args)?);
        self.remote
            .call(
                &self.identity,
                &self.method,
                self.send.value(),
                self.send.gas_limit,
                self.send.fee(),
                payload,
            )
            .await
    }
}

/// The primary invoker of a table entry.
pub enum Invoker {
    Read(ReadInvoker),
    Write(WriteInvoker),
}

impl Invoker {
    pub fn kind(&self) -> MethodKind {
        match self {
            Invoker::Read(_) => MethodKind::Read,
            Invoker::Write(_) => MethodKind::Write,
        }
    }
}

/// One bound method.
pub struct MethodEntry {
    pub descriptor: MethodDescriptor,
    /// Position of the descriptor in the list the table was built from.
    pub index: usize,
    pub invoker: Invoker,
}

impl MethodEntry {
    pub fn kind(&self) -> MethodKind {
        self.invoker.kind()
    }
}

/// Method name -> bound entry, built once from a descriptor list.
pub struct MethodTable {
    entries: HashMap<String, MethodEntry>,
    order: Vec<String>,
}

impl MethodTable {
    /// Build one entry per unique method name.
    ///
    /// The first descriptor for a name wins; later duplicates are skipped.
    pub fn build(
        descriptors: &[MethodDescriptor],
        remote: Arc<dyn RemoteContract>,
        identity: Identity,
        send: &SendConfig,
    ) -> Self {
        let mut entries = HashMap::with_capacity(descriptors.len());
        let mut order = Vec::with_capacity(descriptors.len());

        for (index, descriptor) in descriptors.iter().enumerate() {
            if entries.contains_key(&descriptor.name) {
                debug!(method = %descriptor.name, index, "skipping duplicate method");
                continue;
            }

            let invoker = if descriptor.constant {
                Invoker::Read(ReadInvoker {
                    method: descriptor.name.clone(),
                    remote: Arc::clone(&remote),
                    identity,
                })
            } else {
                Invoker::Write(WriteInvoker {
                    method: descriptor.name.clone(),
                    input_names: descriptor.input_names().map(str::to_string).collect(),
                    remote: Arc::clone(&remote),
                    identity,
                    send: send.clone(),
                })
            };

            order.push(descriptor.name.clone());
            entries.insert(
                descriptor.name.clone(),
                MethodEntry {
                    descriptor: descriptor.clone(),
                    index,
                    invoker,
                },
            );
        }

        Self { entries, order }
    }

    pub fn get(&self, name: &str) -> Option<&MethodEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &MethodEntry> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
