use std::{
    any::TypeId,
    collections::{HashMap, hash_map::Entry},
    fmt,
};

use crate::{
    error::SchemaError,
    field::{FieldType, TypeShape},
    value::{AnyValueType, ValueType},
};

/// Synthesizes value types for field types that match some structure.
pub trait ValueTypeProvider: Send + Sync {
    /// Returns `Ok(None)` if this provider does not handle `field_type`.
    fn value_type(&self, field_type: &FieldType) -> Result<Option<AnyValueType>, SchemaError>;
}

/// A structural pattern over field types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypePattern {
    Exact(TypeId),
    AnyEnum,
    AnyList,
    ListOf(Box<TypePattern>),
}

impl TypePattern {
    pub fn exact<T: 'static>() -> Self {
        Self::Exact(TypeId::of::<T>())
    }

    pub fn list_of(element: TypePattern) -> Self {
        Self::ListOf(Box::new(element))
    }

    pub fn matches(&self, field_type: &FieldType) -> bool {
        match self {
            Self::Exact(id) => field_type.id() == *id,
            Self::AnyEnum => matches!(field_type.shape(), TypeShape::Enum(_)),
            Self::AnyList => matches!(field_type.shape(), TypeShape::List { .. }),
            Self::ListOf(element) => field_type
                .element()
                .is_some_and(|field_type| element.matches(field_type)),
        }
    }
}

/// Provides value types from `factory` for field types matching `pattern`.
pub struct PatternProvider<F> {
    pattern: TypePattern,
    factory: F,
}

impl<F> PatternProvider<F>
where
    F: Fn(&FieldType) -> Result<AnyValueType, SchemaError> + Send + Sync,
{
    pub fn new(pattern: TypePattern, factory: F) -> Self {
        Self { pattern, factory }
    }
}

impl<F> ValueTypeProvider for PatternProvider<F>
where
    F: Fn(&FieldType) -> Result<AnyValueType, SchemaError> + Send + Sync,
{
    fn value_type(&self, field_type: &FieldType) -> Result<Option<AnyValueType>, SchemaError> {
        if !self.pattern.matches(field_type) {
            return Ok(None);
        }
        (self.factory)(field_type).map(Some)
    }
}

/// Value types by exact field type, with providers consulted in
/// registration order when no exact registration exists.
#[derive(Default)]
pub struct ValueTypeRegistry {
    by_type: HashMap<TypeId, AnyValueType>,
    providers: Vec<Box<dyn ValueTypeProvider>>,
}

impl ValueTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value_type` for the type of values it produces. The first
    /// registration for a type wins; returns `false` if one already existed.
    pub fn register(&mut self, value_type: AnyValueType) -> bool {
        match self.by_type.entry(value_type.target_type()) {
            Entry::Vacant(entry) => {
                entry.insert(value_type);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn register_type<T: 'static, V: ValueType<T> + 'static>(&mut self, value_type: V) -> bool {
        self.register(AnyValueType::new::<T, V>(value_type))
    }

    pub fn has_value_type<T: 'static>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    pub fn register_provider(&mut self, provider: impl ValueTypeProvider + 'static) {
        self.register_boxed_provider(Box::new(provider));
    }

    pub fn register_boxed_provider(&mut self, provider: Box<dyn ValueTypeProvider>) {
        self.providers.push(provider);
    }

    /// Appends the registrations of `other` after the existing ones.
    pub fn extend(&mut self, other: ValueTypeRegistry) {
        for (type_id, value_type) in other.by_type {
            self.by_type.entry(type_id).or_insert(value_type);
        }
        self.providers.extend(other.providers);
    }

    pub fn value_type(&self, field_type: &FieldType) -> Result<Option<AnyValueType>, SchemaError> {
        if let Some(value_type) = self.by_type.get(&field_type.id()) {
            return Ok(Some(value_type.clone()));
        }
        for provider in &self.providers {
            if let Some(value_type) = provider.value_type(field_type)? {
                return Ok(Some(value_type));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for ValueTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTypeRegistry")
            .field("value_types", &self.by_type.values().collect::<Vec<_>>())
            .field("providers", &self.providers.len())
            .finish()
    }
}
