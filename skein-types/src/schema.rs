//! Wire types for the self-described contract schema.
//!
//! A contract answers the schema dry run with two JSON log lines: the
//! `constants` section first and the `methods` section second. Both share
//! the same shape: a `required` list naming the exposed keys and a
//! `properties` map describing each key. The methods section also carries
//! `definitions`, referenced from properties via `$ref`.

use serde::{Deserialize, Serialize};
use serde_json::Map;

/// The full schema document: both sections plus optional top-level definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub constants: SchemaSection,
    #[serde(default)]
    pub methods: SchemaSection,
    /// Definitions placed next to the sections rather than inside `methods`.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub definitions: Map<String, serde_json::Value>,
}

/// One section of a schema (`constants` or `methods`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSection {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub definitions: Map<String, serde_json::Value>,
}

/// A property entry: either a `$ref` into definitions or a scalar type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRef {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
}

/// Which section of the schema a descriptor list is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Constants,
    Methods,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Constants => "constants",
            SectionKind::Methods => "methods",
        }
    }
}

impl Schema {
    pub fn section(&self, kind: SectionKind) -> &SchemaSection {
        match kind {
            SectionKind::Constants => &self.constants,
            SectionKind::Methods => &self.methods,
        }
    }
}
