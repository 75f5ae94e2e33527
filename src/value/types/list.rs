use std::sync::Arc;

use derive_builder::Builder;
use serde_json::Value;

use crate::{
    error::{ValueLoadError, ValueParseError},
    value::{
        ValueType,
        types::{ColoredStringValue, StringValue},
    },
};

pub const DEFAULT_DELIMITER: &str = ",";

const LIST_START: char = '[';
const LIST_END: char = ']';

/// How a [`ListValue`] treats delimiters and `null` elements.
///
/// ```
/// use settings_schema::value::types::ListOptionsBuilder;
///
/// let options = ListOptionsBuilder::default()
///     .delimiter(";")
///     .allow_nulls(true)
///     .build()
///     .expect("all fields have defaults");
/// assert_eq!(options.delimiter(), ";");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned", default)]
pub struct ListOptions {
    #[builder(setter(into))]
    delimiter: String,
    /// Whether `null` elements of a stored list are skipped instead of
    /// failing the whole list.
    allow_nulls: bool,
}

impl ListOptions {
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn allow_nulls(&self) -> bool {
        self.allow_nulls
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_owned(),
            allow_nulls: false,
        }
    }
}

/// A list of elements handled by an element value type.
pub struct ListValue<E> {
    element: Arc<dyn ValueType<E>>,
    options: ListOptions,
}

impl<E> ListValue<E> {
    pub fn new(element: Arc<dyn ValueType<E>>) -> Self {
        Self::with_options(element, ListOptions::default())
    }

    pub fn of(element: impl ValueType<E> + 'static) -> Self {
        Self::new(Arc::new(element))
    }

    pub fn with_options(element: Arc<dyn ValueType<E>>, options: ListOptions) -> Self {
        Self { element, options }
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }
}

impl<E> ValueType<Vec<E>> for ListValue<E> {
    fn load(&self, raw: &Value) -> Result<Vec<E>, ValueLoadError> {
        let Value::Array(elements) = raw else {
            return Err(ValueLoadError::new(format!("Invalid list: {raw}")));
        };

        let mut values = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            if element.is_null() {
                if self.options.allow_nulls {
                    continue;
                }
                return Err(ValueLoadError::new(format!(
                    "List contains null element at index {index}"
                )));
            }
            values.push(self.element.load(element)?);
        }
        Ok(values)
    }

    fn save(&self, value: &Vec<E>) -> Value {
        Value::Array(value.iter().map(|element| self.element.save(element)).collect())
    }

    fn parse(&self, input: &str) -> Result<Vec<E>, ValueParseError> {
        let mut trimmed = input.trim();
        if let Some(inner) = trimmed
            .strip_prefix(LIST_START)
            .and_then(|rest| rest.strip_suffix(LIST_END))
        {
            trimmed = inner.trim();
        }
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        trimmed
            .split(self.options.delimiter.as_str())
            .map(|token| self.element.parse(token.trim()))
            .collect()
    }

    fn format(&self, value: &Vec<E>) -> String {
        let elements = value
            .iter()
            .map(|element| self.element.format(element))
            .collect::<Vec<_>>()
            .join(&self.options.delimiter);
        format!("{LIST_START}{elements}{LIST_END}")
    }
}

macro_rules! string_list_value {
    ($(#[$meta:meta])* $name:ident, $element:ident) => {
        $(#[$meta])*
        pub struct $name(ListValue<String>);

        impl $name {
            pub fn with_options(options: ListOptions) -> Self {
                Self(ListValue::with_options(Arc::new($element), options))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(ListValue::of($element))
            }
        }

        impl ValueType<Vec<String>> for $name {
            fn load(&self, raw: &Value) -> Result<Vec<String>, ValueLoadError> {
                self.0.load(raw)
            }

            fn save(&self, value: &Vec<String>) -> Value {
                self.0.save(value)
            }

            fn parse(&self, input: &str) -> Result<Vec<String>, ValueParseError> {
                self.0.parse(input)
            }

            fn format(&self, value: &Vec<String>) -> String {
                self.0.format(value)
            }
        }
    };
}

string_list_value!(
    /// A list of plain strings.
    StringListValue,
    StringValue
);

string_list_value!(
    /// A list of strings whose color codes are translated element-wise.
    ColoredStringListValue,
    ColoredStringValue
);
