//! Typed load/save/parse/format capabilities for setting values.
//!
//! A [`ValueType<T>`] converts between a setting's in-memory value and its
//! raw document representation, and between the value and human-entered text.
//! Value types are stateless and shared; the schema stores them type-erased as
//! [`AnyValueType`] until each setting is bound to its field.
use std::{
    any::{Any, TypeId, type_name},
    fmt,
    sync::Arc,
};

use serde_json::Value;

use crate::{
    document::Document,
    error::{ValueLoadError, ValueParseError},
};

pub mod color;
pub mod defaults;
pub mod registry;
pub mod types;

pub use defaults::DefaultValueTypes;
pub use registry::{PatternProvider, TypePattern, ValueTypeProvider, ValueTypeRegistry};

/// Text produced by [`ValueType::format_optional`] for an absent value.
pub const NULL_TEXT: &str = "null";

pub trait ValueType<T>: Send + Sync {
    /// Converts a present, non-null raw value.
    fn load(&self, raw: &Value) -> Result<T, ValueLoadError>;

    fn save(&self, value: &T) -> Value;

    /// Parses human-entered text, e.g. command input.
    fn parse(&self, input: &str) -> Result<T, ValueParseError>;

    /// Formats a value for display.
    fn format(&self, value: &T) -> String;

    /// Like [`load`](Self::load), but an absent or `null` raw value yields `None`.
    fn load_optional(&self, raw: Option<&Value>) -> Result<Option<T>, ValueLoadError> {
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => self.load(raw).map(Some),
        }
    }

    fn save_optional(&self, value: Option<&T>) -> Value {
        value.map_or(Value::Null, |value| self.save(value))
    }

    fn format_optional(&self, value: Option<&T>) -> String {
        value.map_or_else(|| NULL_TEXT.to_owned(), |value| self.format(value))
    }

    /// Loads the entry at `key` of `document`.
    fn load_entry(&self, document: &Document, key: &str) -> LoadOutcome<T> {
        match document.get(key) {
            None => LoadOutcome::Missing,
            Some(raw) => match self.load(raw) {
                Ok(value) => LoadOutcome::Loaded(value),
                Err(error) => LoadOutcome::Invalid(error),
            },
        }
    }

    /// Writes `value` at `key`; `None` removes the entry.
    fn save_entry(&self, document: &mut Document, key: &str, value: Option<&T>) {
        match value {
            Some(value) => document.set(key, self.save(value)),
            None => {
                document.remove(key);
            }
        }
    }
}

/// The result of loading one document entry.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded(T),
    Missing,
    Invalid(ValueLoadError),
}

impl<T> LoadOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadOutcome<U> {
        match self {
            Self::Loaded(value) => LoadOutcome::Loaded(f(value)),
            Self::Missing => LoadOutcome::Missing,
            Self::Invalid(error) => LoadOutcome::Invalid(error),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// A type-erased, shared [`ValueType`].
#[derive(Clone)]
pub struct AnyValueType {
    inner: Arc<dyn Any + Send + Sync>,
    implementation: TypeId,
    implementation_name: &'static str,
    target: TypeId,
    target_name: &'static str,
}

impl AnyValueType {
    pub fn new<T: 'static, V: ValueType<T> + 'static>(value_type: V) -> Self {
        let shared: Arc<dyn ValueType<T>> = Arc::new(value_type);
        Self {
            inner: Arc::new(shared),
            implementation: TypeId::of::<V>(),
            implementation_name: type_name::<V>(),
            target: TypeId::of::<T>(),
            target_name: type_name::<T>(),
        }
    }

    /// Recovers the typed value type, if it produces values of type `T`.
    pub fn downcast<T: 'static>(&self) -> Option<Arc<dyn ValueType<T>>> {
        self.inner.downcast_ref::<Arc<dyn ValueType<T>>>().cloned()
    }

    /// Whether the underlying implementation is `V`.
    pub fn is<V: 'static>(&self) -> bool {
        self.implementation == TypeId::of::<V>()
    }

    pub fn implementation_name(&self) -> &'static str {
        self.implementation_name
    }

    /// The type of the values this value type produces.
    pub fn target_type(&self) -> TypeId {
        self.target
    }

    pub fn target_type_name(&self) -> &'static str {
        self.target_name
    }
}

impl fmt::Debug for AnyValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyValueType")
            .field("implementation", &self.implementation_name)
            .field("target", &self.target_name)
            .finish()
    }
}

/// The last path segment of a type name, for messages.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
