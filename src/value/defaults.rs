use std::sync::OnceLock;

use crate::{
    error::SchemaError,
    field::{FieldType, TypeShape},
    value::{
        AnyValueType,
        registry::{PatternProvider, TypePattern, ValueTypeRegistry},
        types::{
            BooleanValue, DoubleValue, FloatValue, IntegerValue, LongValue, StringValue, Trilean,
            TrileanValue,
        },
    },
};

static DEFAULT_VALUE_TYPES: OnceLock<ValueTypeRegistry> = OnceLock::new();

/// The built-in value types, consulted after every schema-specific source.
#[derive(Debug)]
pub struct DefaultValueTypes;

impl DefaultValueTypes {
    pub fn get(field_type: &FieldType) -> Result<Option<AnyValueType>, SchemaError> {
        DEFAULT_VALUE_TYPES
            .get_or_init(default_registry)
            .value_type(field_type)
    }
}

fn default_registry() -> ValueTypeRegistry {
    let mut registry = ValueTypeRegistry::new();
    registry.register_type::<String, _>(StringValue);
    registry.register_type::<bool, _>(BooleanValue);
    registry.register_type::<i32, _>(IntegerValue);
    registry.register_type::<f64, _>(DoubleValue);
    registry.register_type::<f32, _>(FloatValue);
    registry.register_type::<i64, _>(LongValue);
    registry.register_type::<Trilean, _>(TrileanValue);

    // Only used for types that none of the above match.
    registry.register_provider(PatternProvider::new(TypePattern::AnyEnum, enum_value_type));
    registry.register_provider(PatternProvider::new(TypePattern::AnyList, list_value_type));
    registry
}

fn enum_value_type(field_type: &FieldType) -> Result<AnyValueType, SchemaError> {
    match field_type.shape() {
        TypeShape::Enum(factory) => Ok(factory()),
        _ => Err(provider_error(field_type, "Not an enum type")),
    }
}

fn list_value_type(field_type: &FieldType) -> Result<AnyValueType, SchemaError> {
    let TypeShape::List { element, factory } = field_type.shape() else {
        return Err(provider_error(field_type, "Not a list type"));
    };
    let element_value_type = DefaultValueTypes::get(element)?.ok_or_else(|| {
        provider_error(
            field_type,
            &format!("Unsupported element type: {}", element.name()),
        )
    })?;
    factory(&element_value_type).ok_or_else(|| {
        provider_error(
            field_type,
            &format!(
                "Element value type {} does not produce {}",
                element_value_type.implementation_name(),
                element.name()
            ),
        )
    })
}

fn provider_error(field_type: &FieldType, message: &str) -> SchemaError {
    SchemaError::ValueTypeProvider {
        type_name: field_type.name().to_owned(),
        message: message.to_owned(),
    }
}
