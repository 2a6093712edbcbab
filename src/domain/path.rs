//! Key-path descent and numeric coercion over node JSON payloads.

use serde_json::Value;

use super::error::NodeError;

/// Descend `key_path` one object key at a time.
///
/// Any missing key, or any intermediate value that is not a JSON object,
/// fails with [`NodeError::PathNotFound`] naming the offending segment.
pub fn descend_key_path(mut data: Value, key_path: &[String]) -> Result<Value, NodeError> {
    for segment in key_path {
        data = match data {
            Value::Object(mut map) => map.remove(segment).ok_or_else(|| NodeError::PathNotFound {
                segment: segment.clone(),
            })?,
            _ => {
                return Err(NodeError::PathNotFound {
                    segment: segment.clone(),
                });
            }
        };
    }
    Ok(data)
}

/// Coerce a fetched value into a gauge reading.
///
/// Numbers pass through, numeric-looking strings are parsed (LND encodes
/// 64-bit integers as strings) and booleans read as 1 or 0. Anything else is
/// a [`NodeError::TypeMismatch`].
pub fn coerce_to_f64(value: &Value, path: &str) -> Result<f64, NodeError> {
    let mismatch = || NodeError::TypeMismatch {
        path: path.to_string(),
        found: truncate(value.to_string()),
    };

    match value {
        Value::Number(n) => n.as_f64().ok_or_else(mismatch),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(mismatch),
        _ => Err(mismatch()),
    }
}

fn truncate(mut s: String) -> String {
    const LIMIT: usize = 64;
    if let Some((idx, _)) = s.char_indices().nth(LIMIT) {
        s.truncate(idx);
        s.push_str("...");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_descend_nested_value() {
        let data = json!({"local_balance": {"sat": "1500", "msat": "1500000"}});
        let value = descend_key_path(data, &path(&["local_balance", "sat"])).unwrap();
        assert_eq!(value, json!("1500"));
    }

    #[test]
    fn test_descend_missing_leaf_names_segment() {
        let data = json!({"a": {}});
        let err = descend_key_path(data, &path(&["a", "b"])).unwrap_err();
        assert!(matches!(err, NodeError::PathNotFound { segment } if segment == "b"));
    }

    #[test]
    fn test_descend_missing_root_names_segment() {
        let data = json!({"balance": "10"});
        let err = descend_key_path(data, &path(&["num_peers"])).unwrap_err();
        assert!(matches!(err, NodeError::PathNotFound { segment } if segment == "num_peers"));
    }

    #[test]
    fn test_descend_through_scalar_fails() {
        let data = json!({"balance": "10"});
        let err = descend_key_path(data, &path(&["balance", "sat"])).unwrap_err();
        assert!(matches!(err, NodeError::PathNotFound { segment } if segment == "sat"));
    }

    #[test]
    fn test_descend_does_not_index_arrays() {
        let data = json!({"channels": [{"capacity": "1"}]});
        let err = descend_key_path(data, &path(&["channels", "0"])).unwrap_err();
        assert!(matches!(err, NodeError::PathNotFound { segment } if segment == "0"));
    }

    #[test]
    fn test_descend_non_object_body() {
        let err = descend_key_path(json!([1, 2]), &path(&["a"])).unwrap_err();
        assert!(matches!(err, NodeError::PathNotFound { segment } if segment == "a"));
    }

    #[test]
    fn test_coerce_numbers_and_numeric_strings() {
        assert_eq!(coerce_to_f64(&json!(7), "num_peers").unwrap(), 7.0);
        assert_eq!(coerce_to_f64(&json!(2.5), "x").unwrap(), 2.5);
        assert_eq!(coerce_to_f64(&json!("1500"), "sat").unwrap(), 1500.0);
        assert_eq!(coerce_to_f64(&json!(" 42 "), "sat").unwrap(), 42.0);
    }

    #[test]
    fn test_coerce_booleans_to_one_and_zero() {
        assert_eq!(coerce_to_f64(&json!(true), "synced_to_chain").unwrap(), 1.0);
        assert_eq!(coerce_to_f64(&json!(false), "synced_to_graph").unwrap(), 0.0);
    }

    #[test]
    fn test_coerce_rejects_non_numeric() {
        for value in [
            json!("alice"),
            json!(null),
            json!({}),
            json!([]),
            json!("NaN"),
            json!("inf"),
        ] {
            let err = coerce_to_f64(&value, "alias").unwrap_err();
            assert!(
                matches!(err, NodeError::TypeMismatch { path: ref p, .. } if p == "alias"),
                "value {value} should be a type mismatch"
            );
        }
    }

    #[test]
    fn test_type_mismatch_truncates_large_values() {
        let big = json!("z".repeat(1000));
        match coerce_to_f64(&big, "p").unwrap_err() {
            NodeError::TypeMismatch { found, .. } => assert!(found.len() < 100),
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }
}
