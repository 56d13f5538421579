//! Argument coercion - raw model-supplied values to declared parameter types.
//!
//! Models emit arguments as loosely typed JSON: integers arrive as `"2"`,
//! booleans as `"yes"`, arrays as JSON-encoded strings. Coercion converts
//! such values to the parameter's [`ParamType`], passing values that are
//! already correctly typed through unchanged.

use serde_json::{Number, Value};
use thiserror::Error;

use super::schema::ParamType;

const MAX_INPUT_PREVIEW: usize = 40;

/// A value that could not be converted to its declared type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected {expected}, got {}", describe(.input))]
pub struct CoercionError {
    pub expected: ParamType,
    pub input: Value,
}

/// Coerce a raw value to the given type.
pub fn coerce(value: &Value, expected: ParamType) -> Result<Value, CoercionError> {
    let coerced = match expected {
        ParamType::Integer => to_integer(value),
        ParamType::Number => to_number(value),
        ParamType::String => to_string(value),
        ParamType::Boolean => to_boolean(value),
        ParamType::Array => parse_embedded(value, Value::is_array),
        ParamType::Object => parse_embedded(value, Value::is_object),
    };

    coerced.ok_or_else(|| CoercionError {
        expected,
        input: value.clone(),
    })
}

fn to_integer(value: &Value) -> Option<Value> {
    match value {
        // integer tags are bounded to the i64 range
        Value::Number(n) if n.is_i64() => Some(value.clone()),
        Value::Number(n) if n.is_u64() => None,
        Value::Number(n) => n.as_f64().and_then(integral).map(Value::from),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
                .map(Value::from)
        }
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn to_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

fn to_string(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value.clone()),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

fn to_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::Number(n) => match n.as_f64().and_then(integral) {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Some(Value::Bool(true)),
            "false" | "f" | "no" | "n" | "off" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn parse_embedded(value: &Value, accept: fn(&Value) -> bool) -> Option<Value> {
    if accept(value) {
        return Some(value.clone());
    }
    match value {
        Value::String(s) => serde_json::from_str::<Value>(s.trim())
            .ok()
            .filter(|parsed| accept(parsed)),
        _ => None,
    }
}

/// Short human-readable description of a raw value for error messages.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) if s.chars().count() > MAX_INPUT_PREVIEW => {
            let preview: String = s.chars().take(MAX_INPUT_PREVIEW).collect();
            format!("string \"{preview}...\"")
        }
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_strings() {
        assert_eq!(coerce(&json!("2"), ParamType::Integer), Ok(json!(2)));
        assert_eq!(coerce(&json!(" -7 "), ParamType::Integer), Ok(json!(-7)));
        assert_eq!(coerce(&json!("4.0"), ParamType::Integer), Ok(json!(4)));
        assert_eq!(coerce(&json!(3.0), ParamType::Integer), Ok(json!(3)));
        assert_eq!(coerce(&json!("2.5"), ParamType::Number), Ok(json!(2.5)));
        assert_eq!(coerce(&json!(2), ParamType::Number), Ok(json!(2)));
    }

    #[test]
    fn test_rejects_uncoercible_numbers() {
        assert!(coerce(&json!("x"), ParamType::Integer).is_err());
        assert!(coerce(&json!("2.5"), ParamType::Integer).is_err());
        assert!(coerce(&json!(2.5), ParamType::Integer).is_err());
        assert!(coerce(&json!(true), ParamType::Integer).is_err());
        assert!(coerce(&json!("18446744073709551615"), ParamType::Integer).is_err());
        assert!(coerce(&json!("9223372036854775808"), ParamType::Integer).is_err());
        assert!(coerce(&json!(9223372036854775808u64), ParamType::Integer).is_err());
        assert_eq!(
            coerce(&json!("9223372036854775807"), ParamType::Integer),
            Ok(json!(i64::MAX))
        );
        assert!(coerce(&json!("NaN"), ParamType::Number).is_err());
        assert!(coerce(&json!("inf"), ParamType::Number).is_err());
        assert!(coerce(&json!([1]), ParamType::Number).is_err());
    }

    #[test]
    fn test_boolean_tokens() {
        for raw in ["true", "True", "yes", "on", "1", "t", "Y"] {
            assert_eq!(coerce(&json!(raw), ParamType::Boolean), Ok(json!(true)), "{raw}");
        }
        for raw in ["false", "FALSE", "no", "off", "0", "f", "n"] {
            assert_eq!(coerce(&json!(raw), ParamType::Boolean), Ok(json!(false)), "{raw}");
        }
        assert_eq!(coerce(&json!(1), ParamType::Boolean), Ok(json!(true)));
        assert_eq!(coerce(&json!(1.0), ParamType::Boolean), Ok(json!(true)));
        assert_eq!(coerce(&json!(0.0), ParamType::Boolean), Ok(json!(false)));
        assert!(coerce(&json!(0.5), ParamType::Boolean).is_err());
        assert!(coerce(&json!("maybe"), ParamType::Boolean).is_err());
        assert!(coerce(&json!(2), ParamType::Boolean).is_err());
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(coerce(&json!(42), ParamType::String), Ok(json!("42")));
        assert_eq!(coerce(&json!(false), ParamType::String), Ok(json!("false")));
        assert!(coerce(&json!({"a": 1}), ParamType::String).is_err());
    }

    #[test]
    fn test_embedded_json() {
        assert_eq!(coerce(&json!("[1, 2]"), ParamType::Array), Ok(json!([1, 2])));
        assert_eq!(coerce(&json!(r#"{"k": "v"}"#), ParamType::Object), Ok(json!({"k": "v"})));
        assert!(coerce(&json!("[1, 2]"), ParamType::Object).is_err());
        assert!(coerce(&json!("not json"), ParamType::Array).is_err());
    }

    #[test]
    fn test_null_is_rejected() {
        for ty in [
            ParamType::Integer,
            ParamType::Number,
            ParamType::String,
            ParamType::Boolean,
            ParamType::Array,
            ParamType::Object,
        ] {
            assert!(coerce(&Value::Null, ty).is_err(), "{ty}");
        }
    }

    #[test]
    fn test_coercion_is_idempotent() {
        let cases = [
            (json!(5), ParamType::Integer),
            (json!(1.5), ParamType::Number),
            (json!("text"), ParamType::String),
            (json!(true), ParamType::Boolean),
            (json!(["a"]), ParamType::Array),
            (json!({"k": 1}), ParamType::Object),
        ];
        for (value, ty) in cases {
            let once = coerce(&value, ty).unwrap();
            assert_eq!(once, value);
            assert_eq!(coerce(&once, ty).unwrap(), once);
        }

        let from_string = coerce(&json!("8"), ParamType::Integer).unwrap();
        assert_eq!(coerce(&from_string, ParamType::Integer).unwrap(), from_string);
    }

    #[test]
    fn test_error_message() {
        let err = coerce(&json!("x"), ParamType::Integer).unwrap_err();
        assert_eq!(err.to_string(), "expected integer, got string \"x\"");

        let long = "y".repeat(100);
        let err = coerce(&json!(long), ParamType::Boolean).unwrap_err();
        assert!(err.to_string().ends_with("...\""));
    }
}
