use serde::Serialize;
use serde_json::Value;
use skein_crypto::args_hash::{args_hash, canonicalize};
use skein_crypto::hash::blake3_hex;

use crate::error::CliError;
use crate::format::{style_bold, style_info};
use crate::ui::{cell, cell_dim, cell_right, info_table, print_table};

/// Cache key of an argument list, with the per-argument digests it was built from.
#[derive(Debug, Serialize)]
pub struct HashReport {
    pub args_hash: String,
    pub pieces: Vec<Piece>,
}

#[derive(Debug, Serialize)]
pub struct Piece {
    pub canonical: String,
    pub digest: String,
}

pub fn run(args: &str, json: bool) -> Result<(), CliError> {
    let report = report(&parse_args(args)?);

    if json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::InvalidArgs(e.to_string()))?;
        println!("{}", json_str);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style_bold().apply_to("Args hash"),
        style_info().apply_to(&report.args_hash)
    );
    if !report.pieces.is_empty() {
        let mut table = info_table();
        for (index, piece) in report.pieces.iter().enumerate() {
            table.add_row(vec![
                cell_right(index),
                cell(&piece.canonical),
                cell_dim(&piece.digest),
            ]);
        }
        print_table(&table);
    }
    println!();
    Ok(())
}

/// Parse a JSON array of positional arguments.
pub fn parse_args(args: &str) -> Result<Vec<Value>, CliError> {
    match serde_json::from_str::<Value>(args) {
        Ok(Value::Array(values)) => Ok(values),
        Ok(_) => Err(CliError::InvalidArgs("expected a JSON array".to_string())),
        Err(e) => Err(CliError::InvalidArgs(e.to_string())),
    }
}

pub fn report(args: &[Value]) -> HashReport {
    let pieces = args
        .iter()
        .map(|arg| {
            let canonical = canonicalize(arg);
            let digest = blake3_hex(canonical.as_bytes());
            Piece { canonical, digest }
        })
        .collect();
    HashReport {
        args_hash: args_hash(args).to_string(),
        pieces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(r#"[100, "bob"]"#).unwrap(), vec![json!(100), json!("bob")]);
        assert!(parse_args("[]").unwrap().is_empty());
        assert!(matches!(parse_args("{}"), Err(CliError::InvalidArgs(_))));
        assert!(matches!(parse_args("[1,"), Err(CliError::InvalidArgs(_))));
    }

    #[test]
    fn test_report_matches_args_hash() {
        let args = vec![json!({"b": 1, "a": 2}), json!("x")];
        let report = report(&args);
        assert_eq!(report.args_hash, args_hash(&args).to_string());
        assert_eq!(report.pieces[0].canonical, r#"{"a":2,"b":1}"#);
        assert_eq!(report.pieces[1].canonical, "x");
        assert!(report.pieces[1].digest.starts_with("0x"));
    }

    #[test]
    fn test_empty_report() {
        let report = report(&[]);
        assert_eq!(report.args_hash, "0x0");
        assert!(report.pieces.is_empty());
    }
}
