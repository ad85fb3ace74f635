use serde::Serialize;
use serde_json::{json, Value};

use crate::authoring::FieldErrors;
use crate::error::TaskdeskError;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskdeskError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

/// Error plus the form fields to highlight.
pub fn error_with_fields(err: &TaskdeskError, fields: &FieldErrors) -> Value {
    let mut v = error(err);
    if !fields.is_empty() {
        v["error"]["fields"] = to_value(fields);
    }
    v
}

pub fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

pub fn print(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: cannot render output: {e}"),
    }
}

/// Single-line form, for JSON-lines output.
pub fn print_line(value: &Value) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: cannot render output: {e}"),
    }
}
