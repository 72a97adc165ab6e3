use thiserror::Error;

/// Errors raised while turning a contract schema into method descriptors.
///
/// All of them are fatal to a binding: no partial method table is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema dry run returned {found} log line(s), expected at least {expected}")]
    MissingLogs { found: usize, expected: usize },

    #[error("invalid json in {section} section: {reason}")]
    InvalidJson { section: String, reason: String },

    #[error("required key '{key}' has no property entry in {section}")]
    MissingProperty { section: String, key: String },

    #[error("property '{key}' is malformed: {reason}")]
    MalformedProperty { key: String, reason: String },

    #[error("property '{key}' has no $ref")]
    MissingRef { key: String },

    #[error("unsupported $ref '{reference}' on '{key}'")]
    UnsupportedRef { key: String, reference: String },

    #[error("definition '{definition}' referenced by '{key}' not found")]
    MissingDefinition { key: String, definition: String },

    #[error("constant '{key}' has no declared type")]
    MissingType { key: String },
}
