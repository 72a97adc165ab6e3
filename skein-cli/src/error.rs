use thiserror::Error;

/// Errors surfaced by the `skein` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),

    #[error("bind error: {0}")]
    Bind(#[from] skein_bind::error::BindError),

    #[error("schema error: {0}")]
    Schema(#[from] skein_types::error::SchemaError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
