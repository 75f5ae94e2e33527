use serde_json::Value;

use crate::{
    error::{ValueLoadError, ValueParseError},
    value::{
        ValueType,
        color::{colorize, decolorize},
    },
};

#[derive(Debug, Clone, Copy, Default)]
pub struct StringValue;

impl ValueType<String> for StringValue {
    // Scalars are accepted as their textual representation.
    fn load(&self, raw: &Value) -> Result<String, ValueLoadError> {
        match raw {
            Value::String(text) => Ok(text.clone()),
            Value::Bool(_) | Value::Number(_) => Ok(raw.to_string()),
            _ => Err(ValueLoadError::new(format!("Invalid string: {raw}"))),
        }
    }

    fn save(&self, value: &String) -> Value {
        Value::String(value.clone())
    }

    fn parse(&self, input: &str) -> Result<String, ValueParseError> {
        Ok(input.to_owned())
    }

    fn format(&self, value: &String) -> String {
        value.clone()
    }
}

/// A string whose `&`-based color codes are translated when loading and
/// parsing, and translated back when saving and formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColoredStringValue;

impl ValueType<String> for ColoredStringValue {
    fn load(&self, raw: &Value) -> Result<String, ValueLoadError> {
        StringValue.load(raw).map(|text| colorize(&text))
    }

    fn save(&self, value: &String) -> Value {
        Value::String(decolorize(value))
    }

    fn parse(&self, input: &str) -> Result<String, ValueParseError> {
        Ok(colorize(input))
    }

    fn format(&self, value: &String) -> String {
        decolorize(value)
    }
}
