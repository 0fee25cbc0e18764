//! Pre-dispatch argument checking.
//!
//! The schemas this crate declares are flat objects of string and
//! string-array parameters, so the checks cover exactly that subset:
//! top-level shape, required fields, property types, array item types, and
//! `minItems`. Violations are returned as messages and fed back to the model
//! as error tool results instead of crashing the run.

use serde_json::Value;

/// Check `args` against a tool's declared schema, reporting the first
/// violation found.
pub fn validate_arguments(args: &Value, schema: &Value) -> Result<(), String> {
    let Some(fields) = args.as_object() else {
        if schema.get("type").and_then(Value::as_str) == Some("object") {
            return Err(format!(
                "arguments must be an object, got {}",
                type_name(args)
            ));
        }
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !fields.contains_key(name) {
                return Err(format!("missing required field '{name}'"));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };
    for (name, value) in fields {
        if let Some(property) = properties.get(name) {
            check_property(name, value, property)?;
        }
    }
    Ok(())
}

fn check_property(name: &str, value: &Value, property: &Value) -> Result<(), String> {
    if let Some(expected) = property.get("type").and_then(Value::as_str) {
        if !has_type(value, expected) {
            return Err(format!(
                "field '{name}' must be a {expected}, got {}",
                type_name(value)
            ));
        }
    }

    let Some(items) = value.as_array() else {
        return Ok(());
    };
    if let Some(min) = property.get("minItems").and_then(Value::as_u64) {
        if (items.len() as u64) < min {
            return Err(format!("field '{name}' needs at least {min} item(s)"));
        }
    }
    if let Some(item_type) = property
        .get("items")
        .and_then(|i| i.get("type"))
        .and_then(Value::as_str)
    {
        for (index, item) in items.iter().enumerate() {
            if !has_type(item, item_type) {
                return Err(format!(
                    "field '{name}' item {index} must be a {item_type}, got {}",
                    type_name(item)
                ));
            }
        }
    }
    Ok(())
}

fn has_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "boolean" => value.is_boolean(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
