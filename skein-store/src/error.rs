use thiserror::Error;

/// Errors that can occur while reading from or dispatching to a state store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Read error: {reason}")]
    ReadError { reason: String },

    #[error("Write error: {reason}")]
    WriteError { reason: String },
}
