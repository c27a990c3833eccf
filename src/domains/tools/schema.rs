//! Declared argument schemas.
//!
//! Every tool declares its fields (name, type, bounds, required or not).
//! The registry checks incoming arguments against that declaration before
//! the handler runs, and reports the first violated constraint.

use chrono::NaiveDate;
use serde_json::Value;

use super::error::ToolError;

/// Type and bounds of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole number within `[min, max]`.
    Integer { min: i64, max: i64 },
    /// String with at least `min_len` characters besides surrounding whitespace.
    Text { min_len: usize },
    /// Calendar date as `YYYY-MM-DD`.
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Ordered list of field declarations. Undeclared fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgSchema {
    fields: Vec<FieldSpec>,
}

impl ArgSchema {
    /// A schema with no fields; accepts any object or no arguments at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: false,
        });
        self
    }

    /// Check `arguments` against the declared fields, in declaration order.
    ///
    /// `null` counts as an empty object, and a `null` field counts as absent.
    pub fn validate(&self, arguments: &Value) -> Result<(), ToolError> {
        let empty = serde_json::Map::new();
        let object = match arguments {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be an object, got {}",
                    json_type(other)
                )));
            }
        };

        for field in &self.fields {
            match object.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        return Err(ToolError::invalid_arguments(format!(
                            "missing required field '{}'",
                            field.name
                        )));
                    }
                }
                Some(value) => check_field(field, value)?,
            }
        }

        Ok(())
    }
}

fn check_field(field: &FieldSpec, value: &Value) -> Result<(), ToolError> {
    let name = field.name;
    match field.kind {
        FieldKind::Integer { min, max } => {
            let number = value.as_i64().ok_or_else(|| {
                ToolError::invalid_arguments(format!("'{}' must be an integer", name))
            })?;
            if number < min || number > max {
                return Err(ToolError::invalid_arguments(format!(
                    "'{}' must be between {} and {}, got {}",
                    name, min, max, number
                )));
            }
        }
        FieldKind::Text { min_len } => {
            let text = value.as_str().ok_or_else(|| {
                ToolError::invalid_arguments(format!("'{}' must be a string", name))
            })?;
            if text.trim().chars().count() < min_len {
                return Err(ToolError::invalid_arguments(format!(
                    "'{}' must have at least {} non-blank character(s)",
                    name, min_len
                )));
            }
        }
        FieldKind::Date => {
            let text = value.as_str().ok_or_else(|| {
                ToolError::invalid_arguments(format!("'{}' must be a string", name))
            })?;
            if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() {
                return Err(ToolError::invalid_arguments(format!(
                    "'{}' must be a date formatted as YYYY-MM-DD, got '{}'",
                    name, text
                )));
            }
        }
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn month_schema() -> ArgSchema {
        ArgSchema::empty()
            .optional("month", FieldKind::Integer { min: 1, max: 12 })
            .optional("year", FieldKind::Integer { min: 1970, max: 9999 })
    }

    fn message(result: Result<(), ToolError>) -> String {
        match result {
            Err(ToolError::InvalidArguments(msg)) => msg,
            other => panic!("expected InvalidArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        assert_ok!(month_schema().validate(&json!({})));
        assert_ok!(month_schema().validate(&Value::Null));
        assert_ok!(month_schema().validate(&json!({"month": null})));
    }

    #[test]
    fn test_integer_bounds() {
        assert_ok!(month_schema().validate(&json!({"month": 12, "year": 1970})));
        let msg = message(month_schema().validate(&json!({"month": 13})));
        assert!(msg.contains("'month'"));
        assert!(msg.contains("between 1 and 12"));
        assert_err!(month_schema().validate(&json!({"year": 1969})));
    }

    #[test]
    fn test_integer_type() {
        assert_err!(month_schema().validate(&json!({"month": "3"})));
        assert_err!(month_schema().validate(&json!({"month": 2.5})));
    }

    #[test]
    fn test_first_violation_reported() {
        let msg = message(month_schema().validate(&json!({"month": 0, "year": 1})));
        assert!(msg.contains("'month'"));
    }

    #[test]
    fn test_required_text() {
        let schema = ArgSchema::empty().required("teamName", FieldKind::Text { min_len: 1 });
        assert_ok!(schema.validate(&json!({"teamName": "Flamengo"})));
        assert!(message(schema.validate(&json!({}))).contains("missing required field 'teamName'"));
        assert_err!(schema.validate(&json!({"teamName": ""})));
        assert!(message(schema.validate(&json!({"teamName": "   "}))).contains("non-blank"));
        assert_err!(schema.validate(&json!({"teamName": "\t\n"})));
        assert_err!(schema.validate(&json!({"teamName": 10})));
    }

    #[test]
    fn test_date_field() {
        let schema = ArgSchema::empty().optional("date", FieldKind::Date);
        assert_ok!(schema.validate(&json!({"date": "2025-05-04"})));
        assert_err!(schema.validate(&json!({"date": "04/05/2025"})));
        assert_err!(schema.validate(&json!({"date": "2025-02-30"})));
    }

    #[test]
    fn test_non_object_arguments() {
        assert!(message(month_schema().validate(&json!([1, 2]))).contains("array"));
    }

    #[test]
    fn test_undeclared_fields_ignored() {
        assert_ok!(ArgSchema::empty().validate(&json!({"anything": true})));
    }
}
