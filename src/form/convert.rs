use serde_json::{Number, Value};

use super::{error::FieldCoercionError, fields::FieldKind};

/// Coerce raw input into the JSON shape a field of `kind` stores.
pub(crate) fn coerce(
    kind: FieldKind,
    pointer: &str,
    value: &Value,
) -> Result<Value, FieldCoercionError> {
    match kind {
        FieldKind::Text | FieldKind::Multiline | FieldKind::Secret => match value {
            Value::Null => Ok(Value::Null),
            Value::String(_) => Ok(value.clone()),
            Value::Number(number) => Ok(Value::String(number.to_string())),
            _ => Err(FieldCoercionError::new(pointer, "expected text")),
        },
        FieldKind::Integer => match value {
            Value::Null => Ok(Value::Null),
            Value::Number(number) if number.is_i64() || number.is_u64() => Ok(value.clone()),
            Value::String(raw) => parse_integer(pointer, raw),
            _ => Err(FieldCoercionError::new(pointer, "expected an integer")),
        },
        FieldKind::Number => match value {
            Value::Null | Value::Number(_) => Ok(value.clone()),
            Value::String(raw) => parse_number(pointer, raw),
            _ => Err(FieldCoercionError::new(pointer, "expected a number")),
        },
        FieldKind::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(FieldCoercionError::new(
                    pointer,
                    format!("`{raw}` is not a boolean"),
                )),
            },
            _ => Err(FieldCoercionError::new(pointer, "expected a boolean")),
        },
        FieldKind::Json => Ok(value.clone()),
    }
}

fn parse_integer(pointer: &str, raw: &str) -> Result<Value, FieldCoercionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    trimmed
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| FieldCoercionError::new(pointer, format!("`{trimmed}` is not an integer")))
}

fn parse_number(pointer: &str, raw: &str) -> Result<Value, FieldCoercionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| FieldCoercionError::new(pointer, format!("`{trimmed}` is not a number")))
}
