use serde_json::Value;

use crate::{
    error::{ValueLoadError, ValueParseError},
    value::ValueType,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValue;

impl ValueType<bool> for BooleanValue {
    fn load(&self, raw: &Value) -> Result<bool, ValueLoadError> {
        match raw {
            Value::Bool(value) => Ok(*value),
            Value::String(text) if text.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(text) if text.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(ValueLoadError::new(format!("Invalid boolean: {raw}"))),
        }
    }

    fn save(&self, value: &bool) -> Value {
        Value::Bool(*value)
    }

    fn parse(&self, input: &str) -> Result<bool, ValueParseError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
            _ => Err(ValueParseError::new(format!("Invalid boolean: '{input}'"))),
        }
    }

    fn format(&self, value: &bool) -> String {
        value.to_string()
    }
}

fn raw_to_i64(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Non-finite numbers have no JSON representation and are stored as text
/// that `str::parse` reads back.
fn f64_to_raw(value: f64) -> Value {
    if value.is_nan() {
        Value::String("NaN".to_owned())
    } else if value.is_infinite() {
        let text = if value.is_sign_positive() { "inf" } else { "-inf" };
        Value::String(text.to_owned())
    } else {
        Value::from(value)
    }
}

fn raw_to_f64(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// `i32` settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerValue;

impl ValueType<i32> for IntegerValue {
    fn load(&self, raw: &Value) -> Result<i32, ValueLoadError> {
        raw_to_i64(raw)
            .and_then(|value| i32::try_from(value).ok())
            .ok_or_else(|| ValueLoadError::new(format!("Invalid integer: {raw}")))
    }

    fn save(&self, value: &i32) -> Value {
        Value::from(*value)
    }

    fn parse(&self, input: &str) -> Result<i32, ValueParseError> {
        input
            .trim()
            .parse()
            .map_err(|_| ValueParseError::new(format!("Invalid integer: '{input}'")))
    }

    fn format(&self, value: &i32) -> String {
        value.to_string()
    }
}

/// `i64` settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongValue;

impl ValueType<i64> for LongValue {
    fn load(&self, raw: &Value) -> Result<i64, ValueLoadError> {
        raw_to_i64(raw).ok_or_else(|| ValueLoadError::new(format!("Invalid long: {raw}")))
    }

    fn save(&self, value: &i64) -> Value {
        Value::from(*value)
    }

    fn parse(&self, input: &str) -> Result<i64, ValueParseError> {
        input
            .trim()
            .parse()
            .map_err(|_| ValueParseError::new(format!("Invalid long: '{input}'")))
    }

    fn format(&self, value: &i64) -> String {
        value.to_string()
    }
}

/// `f64` settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleValue;

impl ValueType<f64> for DoubleValue {
    fn load(&self, raw: &Value) -> Result<f64, ValueLoadError> {
        raw_to_f64(raw).ok_or_else(|| ValueLoadError::new(format!("Invalid double: {raw}")))
    }

    fn save(&self, value: &f64) -> Value {
        f64_to_raw(*value)
    }

    fn parse(&self, input: &str) -> Result<f64, ValueParseError> {
        input
            .trim()
            .parse()
            .map_err(|_| ValueParseError::new(format!("Invalid double: '{input}'")))
    }

    fn format(&self, value: &f64) -> String {
        value.to_string()
    }
}

/// `f32` settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatValue;

impl ValueType<f32> for FloatValue {
    fn load(&self, raw: &Value) -> Result<f32, ValueLoadError> {
        raw_to_f64(raw)
            .and_then(|value| {
                let narrowed = value as f32;
                // Finite doubles beyond the f32 range would become infinite.
                (narrowed.is_finite() || !value.is_finite()).then_some(narrowed)
            })
            .ok_or_else(|| ValueLoadError::new(format!("Invalid float: {raw}")))
    }

    fn save(&self, value: &f32) -> Value {
        f64_to_raw(f64::from(*value))
    }

    fn parse(&self, input: &str) -> Result<f32, ValueParseError> {
        input
            .trim()
            .parse()
            .map_err(|_| ValueParseError::new(format!("Invalid float: '{input}'")))
    }

    fn format(&self, value: &f32) -> String {
        value.to_string()
    }
}
