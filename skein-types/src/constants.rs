use crate::primitives::{Amount, Gas};

// ─── Args Hashing ────────────────────────────────────────────────────────────

/// Reserved args hash for calls with no arguments. Never produced by hashing.
pub const ZERO_ARGS_HASH: &str = "0x0";

// ─── Schema ──────────────────────────────────────────────────────────────────

/// Dry-run method every bindable contract answers with its schema.
pub const SCHEMA_METHOD: &str = "get_schema";

/// Method names with this prefix are read-only.
pub const READ_ONLY_PREFIX: &str = "get_";

/// Prefix of a `$ref` pointing into the schema's definitions.
pub const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";

/// Number of log lines a schema dry run must emit (constants, methods).
pub const SCHEMA_LOG_LINES: usize = 2;

// ─── Send Defaults ───────────────────────────────────────────────────────────

/// Default gas limit for state-mutating calls.
pub const DEFAULT_GAS_LIMIT: Gas = 100_000;

/// Default fee attached to a state-mutating call.
pub const DEFAULT_FEE: Amount = 0;

/// Default value transferred with a call.
pub const DEFAULT_VALUE: Amount = 0;

/// Payload kind used for JSON-packed send arguments.
pub const PAYLOAD_KIND_STRING: &str = "string";

// ─── Transaction Stack ───────────────────────────────────────────────────────

/// Prefix of the temporary key that stands in for a transaction id until broadcast.
pub const TEMP_KEY_PREFIX: &str = "TEMP_";
