use serde_json::Value;
use skein_types::abi::{MethodDescriptor, Param};
use skein_types::constants::{DEFINITIONS_REF_PREFIX, READ_ONLY_PREFIX, SCHEMA_LOG_LINES};
use skein_types::error::SchemaError;
use skein_types::schema::{PropertyRef, Schema, SchemaSection, SectionKind};

/// Decode the two log lines of a schema dry run into a [`Schema`].
///
/// Line 0 holds the constants section, line 1 the methods section. Any
/// further lines are ignored.
pub fn parse_schema_logs(logs: &[String]) -> Result<Schema, SchemaError> {
    if logs.len() < SCHEMA_LOG_LINES {
        return Err(SchemaError::MissingLogs {
            found: logs.len(),
            expected: SCHEMA_LOG_LINES,
        });
    }
    Ok(Schema {
        constants: decode_section(&logs[0], SectionKind::Constants)?,
        methods: decode_section(&logs[1], SectionKind::Methods)?,
        definitions: Default::default(),
    })
}

fn decode_section(line: &str, kind: SectionKind) -> Result<SchemaSection, SchemaError> {
    serde_json::from_str(line).map_err(|e| SchemaError::InvalidJson {
        section: kind.as_str().to_string(),
        reason: e.to_string(),
    })
}

/// Turns schema sections into method descriptors.
#[derive(Debug, Clone)]
pub struct SchemaParser {
    read_only_prefix: String,
}

impl SchemaParser {
    pub fn new(read_only_prefix: impl Into<String>) -> Self {
        Self {
            read_only_prefix: read_only_prefix.into(),
        }
    }

    /// Whether a method of this name is bound as a read.
    pub fn is_read_only(&self, name: &str) -> bool {
        name.starts_with(&self.read_only_prefix)
    }

    /// Descriptors for the methods section, followed by the constants
    /// section when `include_constants` is set.
    pub fn parse(
        &self,
        schema: &Schema,
        include_constants: bool,
    ) -> Result<Vec<MethodDescriptor>, SchemaError> {
        let mut descriptors = self.parse_requirements(schema, SectionKind::Methods)?;
        if include_constants {
            descriptors.extend(self.parse_requirements(schema, SectionKind::Constants)?);
        }
        Ok(descriptors)
    }

    /// One descriptor per key of the section's `required` list, in order.
    pub fn parse_requirements(
        &self,
        schema: &Schema,
        kind: SectionKind,
    ) -> Result<Vec<MethodDescriptor>, SchemaError> {
        let section = schema.section(kind);
        section
            .required
            .iter()
            .map(|key| {
                let property = property_ref(section, kind, key)?;
                let (inputs, outputs) = match kind {
                    SectionKind::Methods => (resolve_inputs(schema, key, &property)?, Vec::new()),
                    SectionKind::Constants => {
                        let ty = property
                            .ty
                            .ok_or_else(|| SchemaError::MissingType { key: key.clone() })?;
                        (Vec::new(), vec![Param::new("", ty)])
                    }
                };
                Ok(MethodDescriptor::function(
                    key.clone(),
                    self.is_read_only(key),
                    inputs,
                    outputs,
                ))
            })
            .collect()
    }
}

impl Default for SchemaParser {
    fn default() -> Self {
        Self::new(READ_ONLY_PREFIX)
    }
}

fn property_ref(
    section: &SchemaSection,
    kind: SectionKind,
    key: &str,
) -> Result<PropertyRef, SchemaError> {
    let raw = section
        .properties
        .get(key)
        .ok_or_else(|| SchemaError::MissingProperty {
            section: kind.as_str().to_string(),
            key: key.to_string(),
        })?;
    serde_json::from_value(raw.clone()).map_err(|e| SchemaError::MalformedProperty {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Follow the property's `$ref` and list the definition's fields as inputs.
fn resolve_inputs(
    schema: &Schema,
    key: &str,
    property: &PropertyRef,
) -> Result<Vec<Param>, SchemaError> {
    let reference = property
        .reference
        .as_deref()
        .ok_or_else(|| SchemaError::MissingRef {
            key: key.to_string(),
        })?;
    let name = reference
        .strip_prefix(DEFINITIONS_REF_PREFIX)
        .ok_or_else(|| SchemaError::UnsupportedRef {
            key: key.to_string(),
            reference: reference.to_string(),
        })?;

    // Definitions normally live inside the methods section; a document-level
    // map is accepted as a fallback.
    let definition = schema
        .methods
        .definitions
        .get(name)
        .or_else(|| schema.definitions.get(name))
        .ok_or_else(|| SchemaError::MissingDefinition {
            key: key.to_string(),
            definition: name.to_string(),
        })?;

    let fields = match definition.get("properties") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(fields)) => fields,
        Some(_) => {
            return Err(SchemaError::MalformedProperty {
                key: key.to_string(),
                reason: format!("definition '{name}' has non-object properties"),
            })
        }
    };

    fields
        .iter()
        .map(|(field, shape)| {
            let ty = shape.get("type").and_then(Value::as_str).ok_or_else(|| {
                SchemaError::MalformedProperty {
                    key: format!("{key}.{field}"),
                    reason: "missing type".to_string(),
                }
            })?;
            Ok(Param::new(field.clone(), ty))
        })
        .collect()
}
