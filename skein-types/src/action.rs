use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::primitives::{ArgsHash, ContractName, SlotIndex, TxId};

/// An update message emitted towards the external state reconciler.
///
/// The binding core never mutates shared state directly; every change to
/// cache entries, the transaction stack, or contract lifecycle is one of
/// these messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Request a read of `method` with `args`; the result is stored under `args_hash`.
    CallContractFn {
        contract: ContractName,
        method: String,
        index: usize,
        args: Vec<Value>,
        args_hash: ArgsHash,
    },
    /// Request broadcast of a send occupying `stack_id` in the transaction stack.
    SendContractTx {
        contract: ContractName,
        method: String,
        index: usize,
        args: Vec<Value>,
        stack_id: SlotIndex,
        temp_key: String,
    },
    /// Append a placeholder to the transaction stack under a temporary key.
    #[serde(rename = "PUSH_TO_TXSTACK")]
    PushToTxStack { temp_key: String },
    /// A binding is about to be registered.
    ContractInitializing { contract: ContractName },
    /// A binding is registered and reachable by address.
    ContractInitialized { contract: ContractName },
    /// A binding was removed.
    DeleteContract { contract: ContractName },
    /// Start following consensus for a newly bound contract.
    ConsensusListening { contract: ContractName },
    /// A requested read completed.
    ContractFnResolved {
        contract: ContractName,
        method: String,
        args_hash: ArgsHash,
        value: Option<String>,
    },
    /// A requested read failed.
    ContractFnFailed {
        contract: ContractName,
        method: String,
        args_hash: ArgsHash,
        reason: String,
    },
    /// A send was broadcast; the placeholder at `stack_id` becomes `tx_id`.
    TxBroadcasted {
        stack_id: SlotIndex,
        temp_key: String,
        tx_id: TxId,
    },
    /// A send could not be broadcast.
    TxFailed {
        stack_id: SlotIndex,
        temp_key: String,
        reason: String,
    },
}

impl Action {
    /// The message kind, as seen by the reconciler.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::CallContractFn { .. } => "CALL_CONTRACT_FN",
            Action::SendContractTx { .. } => "SEND_CONTRACT_TX",
            Action::PushToTxStack { .. } => "PUSH_TO_TXSTACK",
            Action::ContractInitializing { .. } => "CONTRACT_INITIALIZING",
            Action::ContractInitialized { .. } => "CONTRACT_INITIALIZED",
            Action::DeleteContract { .. } => "DELETE_CONTRACT",
            Action::ConsensusListening { .. } => "CONSENSUS_LISTENING",
            Action::ContractFnResolved { .. } => "CONTRACT_FN_RESOLVED",
            Action::ContractFnFailed { .. } => "CONTRACT_FN_FAILED",
            Action::TxBroadcasted { .. } => "TX_BROADCASTED",
            Action::TxFailed { .. } => "TX_FAILED",
        }
    }

    /// The contract this action concerns, if any.
    pub fn contract(&self) -> Option<&str> {
        match self {
            Action::CallContractFn { contract, .. }
            | Action::SendContractTx { contract, .. }
            | Action::ContractInitializing { contract }
            | Action::ContractInitialized { contract }
            | Action::DeleteContract { contract }
            | Action::ConsensusListening { contract }
            | Action::ContractFnResolved { contract, .. }
            | Action::ContractFnFailed { contract, .. } => Some(contract),
            Action::PushToTxStack { .. } | Action::TxBroadcasted { .. } | Action::TxFailed { .. } => {
                None
            }
        }
    }
}
