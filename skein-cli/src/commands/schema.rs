use std::path::Path;

use serde_json::Value;
use skein_bind::config::BindingConfig;
use skein_bind::method_table::MethodKind;
use skein_bind::schema::{parse_schema_logs, SchemaParser};
use skein_types::abi::MethodDescriptor;
use skein_types::schema::Schema;

use crate::error::CliError;
use crate::format::{format_kind, format_params, style_bold, style_dim};
use crate::ui::{cell, cell_bold, cell_right, data_table, print_table};

pub fn run(
    file: &Path,
    include_constants: bool,
    json: bool,
    config: &BindingConfig,
) -> Result<(), CliError> {
    let contents = std::fs::read_to_string(file)?;
    let schema = load_schema(&contents)?;
    let descriptors = SchemaParser::new(config.schema.read_only_prefix.clone())
        .parse(&schema, include_constants || config.schema.include_constants)?;

    if json {
        let json_str = serde_json::to_string_pretty(&descriptors)
            .map_err(|e| CliError::InvalidArgs(e.to_string()))?;
        println!("{}", json_str);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style_bold().apply_to("Methods"),
        style_dim().apply_to(format!("({})", descriptors.len()))
    );

    let mut table = data_table(&["#", "Method", "Kind", "Inputs", "Outputs"]);
    for (index, descriptor) in descriptors.iter().enumerate() {
        table.add_row(vec![
            cell_right(index),
            cell_bold(&descriptor.name),
            cell(format_kind(kind_of(descriptor))),
            cell(format_params(&descriptor.inputs)),
            cell(format_params(&descriptor.outputs)),
        ]);
    }
    print_table(&table);
    println!();
    Ok(())
}

/// Accept either a full `{constants, methods}` document or the raw two-line
/// log dump of a schema dry run.
pub fn load_schema(contents: &str) -> Result<Schema, CliError> {
    if let Ok(Value::Object(document)) = serde_json::from_str::<Value>(contents) {
        if document.contains_key("constants") || document.contains_key("methods") {
            return serde_json::from_value(Value::Object(document))
                .map_err(|e| CliError::InvalidArgs(format!("malformed schema document: {e}")));
        }
    }

    let lines: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    Ok(parse_schema_logs(&lines)?)
}

fn kind_of(descriptor: &MethodDescriptor) -> MethodKind {
    if descriptor.constant {
        MethodKind::Read
    } else {
        MethodKind::Write
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_bind::testing::token_schema_logs;

    #[test]
    fn test_load_log_dump() {
        let dump = token_schema_logs().join("\n");
        let schema = load_schema(&dump).unwrap();
        assert_eq!(schema.methods.required.len(), 3);
        assert_eq!(schema.constants.required, vec!["decimals"]);
    }

    #[test]
    fn test_load_full_document() {
        let document = r##"{
            "methods": {
                "required": ["get_owner"],
                "properties": { "get_owner": { "$ref": "#/definitions/Empty" } }
            },
            "definitions": { "Empty": { "properties": {} } }
        }"##;
        let schema = load_schema(document).unwrap();
        let descriptors = SchemaParser::default().parse(&schema, false).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert!(descriptors[0].constant);
    }

    #[test]
    fn test_load_single_section_is_short() {
        let err = load_schema(r#"{"required":[],"properties":{}}"#).unwrap_err();
        assert!(matches!(err, CliError::Schema(_)));
    }

    #[test]
    fn test_run_on_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("schema.log");
        std::fs::write(&path, token_schema_logs().join("\n")).unwrap();

        run(&path, true, true, &BindingConfig::default()).unwrap();
        run(&path, false, false, &BindingConfig::default()).unwrap();
        assert!(run(&tmp.path().join("missing"), false, false, &BindingConfig::default()).is_err());
    }
}
