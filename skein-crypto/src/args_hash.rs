//! Cache keys for contract reads.
//!
//! Each argument is reduced to a canonical string and hashed on its own; the
//! hex digests are concatenated in argument order and hashed once more. An
//! empty argument list short-circuits to the reserved `0x0`.

use serde_json::{Map, Number, Value};
use skein_types::primitives::ArgsHash;

use crate::hash::{blake3_hash_multi, blake3_hex};

/// Reduce an argument to the string that gets hashed.
///
/// Objects and arrays become canonical JSON (object keys sorted at every
/// level, no whitespace), numbers their decimal form, strings themselves, and
/// booleans / null their JSON literal. Integer-valued floats render as
/// integers, so `1.0` and `1` share a key.
pub fn canonicalize(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        Value::Number(n) => integral(n).to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(_) | Value::Array(_) => sorted(arg).to_string(),
    }
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::with_capacity(map.len());
            for key in keys {
                out.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        Value::Number(n) => Value::Number(integral(n)),
        other => other.clone(),
    }
}

fn integral(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 => {
            if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Number::from(f as i64)
            } else if f >= 0.0 && f < u64::MAX as f64 {
                Number::from(f as u64)
            } else {
                n.clone()
            }
        }
        _ => n.clone(),
    }
}

/// Derive the cache key for an ordered argument list.
pub fn args_hash(args: &[Value]) -> ArgsHash {
    if args.is_empty() {
        return ArgsHash::zero();
    }

    let pieces: Vec<String> = args
        .iter()
        .map(|arg| blake3_hex(canonicalize(arg).as_bytes()))
        .collect();
    let parts: Vec<&[u8]> = pieces.iter().map(|p| p.as_bytes()).collect();

    ArgsHash::from_digest(&blake3_hash_multi(&parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::blake3_hash;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_empty_args_is_reserved_zero() {
        assert_eq!(args_hash(&[]).as_str(), "0x0");
    }

    #[test]
    fn test_single_arg_matches_manual_derivation() {
        let piece = blake3_hex(b"100");
        let expected = ArgsHash::from_digest(&blake3_hash(piece.as_bytes()));
        assert_eq!(args_hash(&[json!(100)]), expected);
    }

    #[test]
    fn test_order_is_significant() {
        let a = args_hash(&[json!("alice"), json!(5)]);
        let b = args_hash(&[json!(5), json!("alice")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_number_and_numeric_string_coincide() {
        // Numbers are hashed by their decimal form, so "7" and 7 share a key.
        assert_eq!(args_hash(&[json!(7)]), args_hash(&[json!("7")]));
    }

    #[test]
    fn test_object_key_order_is_canonical() {
        let a: Value = serde_json::from_str(r#"{"b":1,"a":{"y":2,"x":3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a":{"x":3,"y":2},"b":1}"#).unwrap();
        assert_eq!(canonicalize(&a), canonicalize(&b));
        assert_eq!(canonicalize(&a), r#"{"a":{"x":3,"y":2},"b":1}"#);
        assert_eq!(args_hash(&[a]), args_hash(&[b]));
    }

    #[test]
    fn test_canonical_scalars() {
        assert_eq!(canonicalize(&json!("raw text")), "raw text");
        assert_eq!(canonicalize(&json!(true)), "true");
        assert_eq!(canonicalize(&Value::Null), "null");
        assert_eq!(canonicalize(&json!(-12)), "-12");
        assert_eq!(canonicalize(&json!([1, "a"])), r#"[1,"a"]"#);
    }

    #[test]
    fn test_integer_valued_floats_render_as_integers() {
        assert_eq!(canonicalize(&json!(1.0)), "1");
        assert_eq!(canonicalize(&json!(-3.0)), "-3");
        assert_eq!(canonicalize(&json!(1.5)), "1.5");
        assert_eq!(canonicalize(&json!({ "amount": 2.0 })), r#"{"amount":2}"#);
        assert_eq!(args_hash(&[json!(1.0)]), args_hash(&[json!(1)]));
        assert_eq!(args_hash(&[json!([10.0, 2])]), args_hash(&[json!([10, 2])]));
    }

    fn arg_strategy() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z]{0,12}".prop_map(|s| json!(format!("s:{s}"))),
            any::<bool>().prop_map(|b| json!({ "flag": b })),
        ]
    }

    proptest! {
        #[test]
        fn prop_hash_is_deterministic(args in prop::collection::vec(arg_strategy(), 0..6)) {
            prop_assert_eq!(args_hash(&args), args_hash(&args));
        }

        #[test]
        fn prop_distinct_args_distinct_hashes(
            a in prop::collection::vec(arg_strategy(), 1..5),
            b in prop::collection::vec(arg_strategy(), 1..5),
        ) {
            let ca: Vec<String> = a.iter().map(canonicalize).collect();
            let cb: Vec<String> = b.iter().map(canonicalize).collect();
            prop_assume!(ca != cb);
            prop_assert_ne!(args_hash(&a), args_hash(&b));
        }

        #[test]
        fn prop_non_empty_never_zero(args in prop::collection::vec(arg_strategy(), 1..6)) {
            prop_assert!(!args_hash(&args).is_zero());
        }
    }
}
