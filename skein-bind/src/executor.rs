use std::sync::Arc;

use serde_json::Value;
use skein_store::traits::StatePort;
use skein_types::action::Action;
use skein_types::primitives::{ArgsHash, SlotIndex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::BindError;
use crate::registry::ContractRegistry;

/// Carries dispatched read and send requests to the remote contracts.
///
/// Requests are handled one at a time in arrival order, so queued sends
/// reach the remote in slot order. Outcomes go back through the store as
/// result actions; a failed request never stops the loop.
pub struct DispatchExecutor {
    registry: Arc<ContractRegistry>,
    store: Arc<dyn StatePort>,
}

impl DispatchExecutor {
    pub fn new(registry: Arc<ContractRegistry>) -> Self {
        let store = registry.store();
        Self { registry, store }
    }

    /// Handle actions until the channel closes.
    pub async fn run(&self, mut rx: mpsc::UnboundedReceiver<Action>) -> Result<(), BindError> {
        while let Some(action) = rx.recv().await {
            self.handle(action).await?;
        }
        debug!("dispatch channel closed");
        Ok(())
    }

    /// Execute one request action. Every other action is ignored.
    ///
    /// Only store failures are returned; remote failures become
    /// `ContractFnFailed` or `TxFailed`.
    pub async fn handle(&self, action: Action) -> Result<(), BindError> {
        match action {
            Action::CallContractFn {
                contract,
                method,
                args_hash,
                ..
            } => self.execute_read(contract, method, args_hash).await,
            Action::SendContractTx {
                contract,
                method,
                args,
                stack_id,
                temp_key,
                ..
            } => {
                self.execute_send(&contract, &method, &args, stack_id, temp_key)
                    .await
            }
            _ => Ok(()),
        }
    }

    async fn execute_read(
        &self,
        contract: String,
        method: String,
        args_hash: ArgsHash,
    ) -> Result<(), BindError> {
        let outcome = match self.registry.contract(&contract) {
            Some(binding) => binding.call(&method).await,
            None => Err(BindError::NotFound {
                name: contract.clone(),
            }),
        };

        let result = match outcome {
            Ok(value) => Action::ContractFnResolved {
                contract,
                method,
                args_hash,
                value,
            },
            Err(e) => {
                warn!(%contract, %method, %args_hash, error = %e, "read failed");
                Action::ContractFnFailed {
                    contract,
                    method,
                    args_hash,
                    reason: e.to_string(),
                }
            }
        };
        Ok(self.store.dispatch(result)?)
    }

    async fn execute_send(
        &self,
        contract: &str,
        method: &str,
        args: &[Value],
        stack_id: SlotIndex,
        temp_key: String,
    ) -> Result<(), BindError> {
        let outcome = match self.registry.contract(contract) {
            Some(binding) => binding.send(method, args).await,
            None => Err(BindError::NotFound {
                name: contract.to_string(),
            }),
        };

        let result = match outcome {
            Ok(receipt) => Action::TxBroadcasted {
                stack_id,
                temp_key,
                tx_id: receipt.tx_id,
            },
            Err(e) => {
                warn!(contract, method, stack_id, error = %e, "send failed");
                Action::TxFailed {
                    stack_id,
                    temp_key,
                    reason: e.to_string(),
                }
            }
        };
        Ok(self.store.dispatch(result)?)
    }
}
