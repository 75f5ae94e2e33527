//! Declared setting field types.
//!
//! A [`FieldType`] describes the Rust type of a setting field in a way value
//! type resolution can inspect: its identity, plus its structure when it is
//! an enum or a list. Every type usable as a setting implements
//! [`SettingType`].
use std::{
    any::{TypeId, type_name},
    fmt,
};

use crate::value::{
    AnyValueType,
    types::{EnumValue, ListValue, Trilean},
};

/// Builds the value type of an enum.
pub type EnumFactory = fn() -> AnyValueType;

/// Wraps a resolved element value type into a list value type. Returns `None`
/// if the element value type produces a different type than the list holds.
pub type ListFactory = fn(&AnyValueType) -> Option<AnyValueType>;

#[derive(Clone)]
pub enum TypeShape {
    Scalar,
    Enum(EnumFactory),
    List {
        element: Box<FieldType>,
        factory: ListFactory,
    },
}

#[derive(Clone)]
pub struct FieldType {
    id: TypeId,
    name: &'static str,
    shape: TypeShape,
}

impl FieldType {
    pub fn scalar<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape: TypeShape::Scalar,
        }
    }

    pub fn enumeration<E: SettingEnum>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
            shape: TypeShape::Enum(enum_value_type::<E>),
        }
    }

    pub fn list<E: SettingType>() -> Self {
        Self {
            id: TypeId::of::<Vec<E>>(),
            name: type_name::<Vec<E>>(),
            shape: TypeShape::List {
                element: Box::new(E::field_type()),
                factory: list_value_type::<E>,
            },
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The element type, for list types.
    pub fn element(&self) -> Option<&FieldType> {
        match &self.shape {
            TypeShape::List { element, .. } => Some(&**element),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn enum_value_type<E: SettingEnum>() -> AnyValueType {
    AnyValueType::new::<E, _>(EnumValue::<E>::new())
}

fn list_value_type<E: 'static>(element: &AnyValueType) -> Option<AnyValueType> {
    let element = element.downcast::<E>()?;
    Some(AnyValueType::new::<Vec<E>, _>(ListValue::new(element)))
}

/// A type that setting fields may have.
///
/// Custom types implement this with the default body and register a value
/// type for themselves on the schemas that use them.
pub trait SettingType: Sized + Send + Sync + 'static {
    fn field_type() -> FieldType {
        FieldType::scalar::<Self>()
    }
}

impl SettingType for bool {}
impl SettingType for i32 {}
impl SettingType for i64 {}
impl SettingType for f32 {}
impl SettingType for f64 {}
impl SettingType for String {}
impl SettingType for Trilean {}

impl<E: SettingType> SettingType for Vec<E> {
    fn field_type() -> FieldType {
        FieldType::list::<E>()
    }
}

/// An enum whose variants are stored by name.
///
/// Usually derived with `#[derive(SettingEnum)]`, which names each variant in
/// SCREAMING_SNAKE_CASE and also implements [`SettingType`].
pub trait SettingEnum: Clone + Send + Sync + 'static {
    const VARIANTS: &'static [Self];

    fn name(&self) -> &'static str;
}
