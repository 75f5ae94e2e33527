use serde_json::Value;

use crate::{
    error::{ValueLoadError, ValueParseError},
    value::ValueType,
};

/// A boolean that may also be left undefined, to defer to some other source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Trilean {
    True,
    False,
    #[default]
    Undefined,
}

impl Trilean {
    pub fn from_bool(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }

    /// `None` for [`Trilean::Undefined`].
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Undefined => None,
        }
    }

    /// Parses the textual forms accepted in documents and text input,
    /// ignoring case.
    pub fn from_text(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "yes" | "y" | "on" | "enabled" => Some(Self::True),
            "false" | "f" | "0" | "no" | "n" | "off" | "disabled" => Some(Self::False),
            "undefined" | "null" | "none" | "unset" | "default" => Some(Self::Undefined),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Undefined => "undefined",
        }
    }
}

impl From<bool> for Trilean {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<Option<bool>> for Trilean {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Undefined, Self::from_bool)
    }
}

/// [`Trilean`] settings. Defined values are stored as booleans, undefined
/// ones as the text `undefined`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrileanValue;

impl ValueType<Trilean> for TrileanValue {
    fn load(&self, raw: &Value) -> Result<Trilean, ValueLoadError> {
        let value = match raw {
            Value::Bool(value) => Some(Trilean::from_bool(*value)),
            Value::Number(number) => match number.as_i64() {
                Some(1) => Some(Trilean::True),
                Some(0) => Some(Trilean::False),
                _ => None,
            },
            Value::String(text) => Trilean::from_text(text),
            _ => None,
        };
        value.ok_or_else(|| ValueLoadError::new(format!("Invalid trilean: {raw}")))
    }

    fn save(&self, value: &Trilean) -> Value {
        match value.to_bool() {
            Some(value) => Value::Bool(value),
            None => Value::String(value.as_str().to_owned()),
        }
    }

    fn parse(&self, input: &str) -> Result<Trilean, ValueParseError> {
        Trilean::from_text(input)
            .ok_or_else(|| ValueParseError::new(format!("Invalid trilean: '{input}'")))
    }

    fn format(&self, value: &Trilean) -> String {
        value.as_str().to_owned()
    }
}
