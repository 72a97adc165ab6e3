use skein_types::error::SchemaError;
use thiserror::Error;

/// Errors that can occur while binding to or dispatching against a contract.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Contract already exists: {address}")]
    DuplicateContract { address: String },

    #[error("Contract does not exist: {name}")]
    NotFound { name: String },

    #[error("Method not found: {method} on {contract}")]
    MethodNotFound { contract: String, method: String },

    #[error("Method {method} is {actual}, cannot be used as {expected}")]
    WrongMethodKind {
        method: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Transport error: {reason}")]
    Transport { reason: String },

    #[error("Store error: {0}")]
    Store(#[from] skein_store::error::StoreError),

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    #[error("Config error: {reason}")]
    Config { reason: String },

    #[error("Lock poisoned: {reason}")]
    Poisoned { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for BindError {
    fn from(e: serde_json::Error) -> Self {
        BindError::Serialization {
            reason: e.to_string(),
        }
    }
}
