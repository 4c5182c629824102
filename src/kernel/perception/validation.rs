//! Four-gate validation cascade (SPEC_FULL.md §C): Syntax -> Structure ->
//! Types -> Bounds, applied to structured sub-payloads of `RawInput` (e.g. a
//! JSON tool-call embedded in the input) before they reach planning. A gate
//! failure produces a `ProcessingError` diagnostic, not a hard Gate-In
//! failure.

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationGate {
    Syntax,
    Structure,
    Types,
    Bounds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateFailure {
    pub gate: ValidationGate,
    pub detail: String,
}

/// A minimal shape contract a structured sub-payload must satisfy: a set of
/// required field names and, for each, an expected JSON type tag
/// (`"string"`, `"number"`, `"bool"`, `"array"`, `"object"`).
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub required_fields: Vec<(String, &'static str)>,
    pub max_depth: usize,
}

fn type_tag(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::String(_) => "string",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
        serde_json::Value::Null => "null",
    }
}

fn depth(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        serde_json::Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}

/// Run the four-gate cascade over `raw`. Short-circuits at the first gate
/// that fails, returning a `GateFailure` the caller converts into a
/// `ProcessingError` diagnostic.
pub fn validate(raw: &str, schema: &Schema) -> Result<serde_json::Value, GateFailure> {
    // Gate 1: Syntax.
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| GateFailure {
        gate: ValidationGate::Syntax,
        detail: e.to_string(),
    })?;

    // Gate 2: Structure.
    let object = value.as_object().ok_or_else(|| GateFailure {
        gate: ValidationGate::Structure,
        detail: "expected a JSON object at the top level".to_string(),
    })?;
    for (field, _) in &schema.required_fields {
        if !object.contains_key(field) {
            return Err(GateFailure {
                gate: ValidationGate::Structure,
                detail: format!("missing required field '{field}'"),
            });
        }
    }

    // Gate 3: Types.
    for (field, expected) in &schema.required_fields {
        let actual = type_tag(&object[field]);
        if actual != *expected {
            return Err(GateFailure {
                gate: ValidationGate::Types,
                detail: format!("field '{field}' expected {expected}, got {actual}"),
            });
        }
    }

    // Gate 4: Bounds.
    if schema.max_depth > 0 && depth(&value) > schema.max_depth {
        return Err(GateFailure {
            gate: ValidationGate::Bounds,
            detail: format!("nesting depth exceeds max_depth={}", schema.max_depth),
        });
    }

    Ok(value)
}

impl From<GateFailure> for Error {
    fn from(failure: GateFailure) -> Self {
        Error::processing(
            "perception::validation",
            format!("{:?} gate failed: {}", failure.gate, failure.detail),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema {
            required_fields: vec![("tool".to_string(), "string"), ("args".to_string(), "object")],
            max_depth: 4,
        }
    }

    #[test]
    fn valid_payload_passes_all_gates() {
        let raw = r#"{"tool": "search", "args": {"query": "rust"}}"#;
        assert!(validate(raw, &schema()).is_ok());
    }

    #[test]
    fn malformed_json_fails_at_syntax_gate() {
        let raw = "{not json";
        let err = validate(raw, &schema()).unwrap_err();
        assert_eq!(err.gate, ValidationGate::Syntax);
    }

    #[test]
    fn missing_field_fails_at_structure_gate() {
        let raw = r#"{"tool": "search"}"#;
        let err = validate(raw, &schema()).unwrap_err();
        assert_eq!(err.gate, ValidationGate::Structure);
    }

    #[test]
    fn wrong_type_fails_at_types_gate() {
        let raw = r#"{"tool": 5, "args": {}}"#;
        let err = validate(raw, &schema()).unwrap_err();
        assert_eq!(err.gate, ValidationGate::Types);
    }

    #[test]
    fn excessive_nesting_fails_at_bounds_gate() {
        let schema = Schema {
            required_fields: vec![],
            max_depth: 1,
        };
        let raw = r#"{"a": {"b": {"c": 1}}}"#;
        let err = validate(raw, &schema).unwrap_err();
        assert_eq!(err.gate, ValidationGate::Bounds);
    }
}
