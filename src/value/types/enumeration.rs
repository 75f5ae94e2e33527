use std::{marker::PhantomData, sync::Arc};

use serde_json::Value;

use crate::{
    error::{ValueLoadError, ValueParseError},
    field::SettingEnum,
    value::{ValueType, short_type_name},
};

/// Maps raw text onto the spelling of enum variant names before matching.
pub type Normalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Trims, upper-cases, and turns `-`, ` ` and `.` into `_`, so that
/// `"zombified-piglin"` matches the variant name `ZOMBIFIED_PIGLIN`.
pub fn normalize_enum_name(input: &str) -> String {
    input
        .trim()
        .to_uppercase()
        .replace(|c: char| matches!(c, '-' | ' ' | '.'), "_")
}

/// Settings of a [`SettingEnum`] type, stored by variant name.
pub struct EnumValue<E> {
    normalizer: Normalizer,
    _marker: PhantomData<fn() -> E>,
}

impl<E: SettingEnum> EnumValue<E> {
    pub fn new() -> Self {
        Self::with_normalizer(normalize_enum_name)
    }

    pub fn with_normalizer(normalizer: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            normalizer: Arc::new(normalizer),
            _marker: PhantomData,
        }
    }

    fn find(&self, input: &str) -> Option<E> {
        let normalized = (self.normalizer)(input);
        E::VARIANTS
            .iter()
            .find(|variant| variant.name() == normalized)
            .cloned()
    }

    fn valid_values() -> String {
        E::VARIANTS
            .iter()
            .map(SettingEnum::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<E: SettingEnum> Default for EnumValue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SettingEnum> ValueType<E> for EnumValue<E> {
    fn load(&self, raw: &Value) -> Result<E, ValueLoadError> {
        let Value::String(text) = raw else {
            return Err(ValueLoadError::new(format!(
                "Invalid {}: {raw}",
                short_type_name::<E>()
            )));
        };
        self.find(text).ok_or_else(|| {
            ValueLoadError::new(format!("Unknown {}: {text}", short_type_name::<E>()))
                .with_extra_messages([format!("Valid values: {}", Self::valid_values())])
        })
    }

    fn save(&self, value: &E) -> Value {
        Value::String(value.name().to_owned())
    }

    fn parse(&self, input: &str) -> Result<E, ValueParseError> {
        self.find(input).ok_or_else(|| {
            ValueParseError::new(format!("Unknown {}: '{input}'", short_type_name::<E>()))
        })
    }

    fn format(&self, value: &E) -> String {
        value.name().to_owned()
    }
}
