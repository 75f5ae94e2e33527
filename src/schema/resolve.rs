use crate::{
    error::SchemaError,
    schema::builder::FieldDecl,
    value::{
        AnyValueType, DefaultValueTypes, ValueTypeRegistry,
        types::{ColoredStringListValue, ColoredStringValue, StringListValue, StringValue},
    },
};

/// The steps of value type resolution, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTypeSource {
    /// A value type named on the field itself.
    Explicit,
    Colored,
    Uncolored,
    /// The default value types and providers registered by the settings
    /// struct and its parents.
    CustomDefault,
    BuiltIn,
}

impl ValueTypeSource {
    pub const CHAIN: [Self; 5] = [
        Self::Explicit,
        Self::Colored,
        Self::Uncolored,
        Self::CustomDefault,
        Self::BuiltIn,
    ];

    fn resolve<S>(
        self,
        field: &FieldDecl<S>,
        key: &str,
        custom: &ValueTypeRegistry,
    ) -> Result<Option<AnyValueType>, SchemaError> {
        match self {
            Self::Explicit => Ok(field.explicit.clone()),
            Self::Colored if field.colored => string_value_type(
                field,
                key,
                "colored",
                || AnyValueType::new::<String, _>(ColoredStringValue),
                || AnyValueType::new::<Vec<String>, _>(ColoredStringListValue::default()),
            )
            .map(Some),
            Self::Uncolored if field.uncolored => string_value_type(
                field,
                key,
                "uncolored",
                || AnyValueType::new::<String, _>(StringValue),
                || AnyValueType::new::<Vec<String>, _>(StringListValue::default()),
            )
            .map(Some),
            Self::Colored | Self::Uncolored => Ok(None),
            Self::CustomDefault => custom.value_type(&field.field_type),
            Self::BuiltIn => DefaultValueTypes::get(&field.field_type),
        }
    }
}

fn string_value_type<S>(
    field: &FieldDecl<S>,
    key: &str,
    marker: &'static str,
    string: impl FnOnce() -> AnyValueType,
    string_list: impl FnOnce() -> AnyValueType,
) -> Result<AnyValueType, SchemaError> {
    if field.field_type.is::<String>() {
        Ok(string())
    } else if field.field_type.is::<Vec<String>>() {
        Ok(string_list())
    } else {
        Err(SchemaError::UnsupportedMarker {
            marker,
            key: key.to_owned(),
            type_name: field.field_type.name().to_owned(),
        })
    }
}

/// Resolves the value type of `field`: the first step of
/// [`ValueTypeSource::CHAIN`] that yields one wins.
pub(crate) fn resolve_value_type<S>(
    field: &FieldDecl<S>,
    key: &str,
    custom: &ValueTypeRegistry,
) -> Result<(AnyValueType, ValueTypeSource), SchemaError> {
    for source in ValueTypeSource::CHAIN {
        if let Some(value_type) = source.resolve(field, key, custom)? {
            return Ok((value_type, source));
        }
    }
    Err(SchemaError::UnsupportedType {
        key: key.to_owned(),
        type_name: field.field_type.name().to_owned(),
    })
}
