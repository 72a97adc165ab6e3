use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skein_types::constants::PAYLOAD_KIND_STRING;
use skein_types::primitives::{Amount, Gas, Identity, TxId};

use crate::error::BindError;

/// Output of a dry run: the log lines the contract emitted, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunResult {
    pub logs: Vec<String>,
}

/// Result of submitting a state-mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_id: TxId,
}

/// Typed payload attached to a state-mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Payload {
    /// A string payload, as used for JSON-packed method arguments.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            kind: PAYLOAD_KIND_STRING.to_string(),
            value: value.into(),
        }
    }
}

/// Handle to a contract living on the remote ledger.
///
/// Transport, signing, and retries are the implementor's concern; the
/// binding core calls each primitive once and surfaces any error as is.
#[async_trait]
pub trait RemoteContract: Send + Sync {
    /// Establish the contract-level session.
    async fn init(&self) -> Result<(), BindError>;

    /// Run `method` without side effects and return its logs.
    async fn test(
        &self,
        identity: &Identity,
        method: &str,
        value: Amount,
    ) -> Result<DryRunResult, BindError>;

    /// Submit `method` as a state-mutating transaction.
    async fn call(
        &self,
        identity: &Identity,
        method: &str,
        value: Amount,
        gas_limit: Gas,
        fee: Amount,
        payload: Payload,
    ) -> Result<TxReceipt, BindError>;
}

/// Opens remote contract handles by address.
pub trait ContractConnector: Send + Sync {
    fn connect(&self, address: &str) -> Arc<dyn RemoteContract>;
}
