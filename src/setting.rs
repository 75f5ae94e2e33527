use std::{any::Any, fmt, sync::Arc};

use crate::{
    document::Document,
    error::ValueParseError,
    schema::ValueTypeSource,
    value::{AnyValueType, LoadOutcome, ValueType},
};

/// One field of a settings struct, bound to its config key and value type.
pub struct Setting<S> {
    key: String,
    field_name: &'static str,
    value_type: AnyValueType,
    source: ValueTypeSource,
    slot: Box<dyn Slot<S>>,
}

impl<S> Setting<S> {
    pub(crate) fn new(
        key: String,
        field_name: &'static str,
        value_type: AnyValueType,
        source: ValueTypeSource,
        slot: Box<dyn Slot<S>>,
    ) -> Self {
        Self {
            key,
            field_name,
            value_type,
            source,
            slot,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    pub fn value_type(&self) -> &AnyValueType {
        &self.value_type
    }

    /// Which step of value type resolution selected the value type.
    pub fn value_type_source(&self) -> ValueTypeSource {
        self.source
    }

    /// The current value of this setting in `config`, if it is of type `T`.
    pub fn value<'a, T: 'static>(&self, config: &'a S) -> Option<&'a T> {
        self.slot.get(config).downcast_ref()
    }

    /// Formats the current value for display.
    pub fn format(&self, config: &S) -> String {
        self.slot.format(config)
    }

    /// Parses human-entered text and assigns the result. On failure the
    /// current value is kept.
    pub fn parse_value(&self, config: &mut S, input: &str) -> Result<(), ValueParseError> {
        self.slot.parse(config, input)
    }

    /// Writes the current value at this setting's key.
    pub fn save(&self, config: &S, document: &mut Document) {
        self.slot.save(config, document, &self.key);
    }

    /// Loads this setting's entry of `document` into `config`. Unless the
    /// entry loads, the current value is kept.
    pub fn load(&self, config: &mut S, document: &Document) -> LoadOutcome<()> {
        self.slot.load(config, document, &self.key)
    }

    /// Copies the entry of `defaults` into `document`, if it loads.
    pub(crate) fn copy_default(
        &self,
        defaults: &Document,
        document: &mut Document,
    ) -> LoadOutcome<()> {
        self.slot.copy(defaults, document, &self.key)
    }
}

impl<S> fmt::Debug for Setting<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("key", &self.key)
            .field("field_name", &self.field_name)
            .field("value_type", &self.value_type)
            .field("source", &self.source)
            .finish()
    }
}

/// Typed access to one field of `S`.
pub(crate) trait Slot<S>: Send + Sync {
    fn get<'a>(&self, config: &'a S) -> &'a (dyn Any + 'static);

    fn load(&self, config: &mut S, document: &Document, key: &str) -> LoadOutcome<()>;

    fn save(&self, config: &S, document: &mut Document, key: &str);

    fn copy(&self, from: &Document, to: &mut Document, key: &str) -> LoadOutcome<()>;

    fn format(&self, config: &S) -> String;

    fn parse(&self, config: &mut S, input: &str) -> Result<(), ValueParseError>;
}

pub(crate) struct FieldSlot<S, T> {
    value_type: Arc<dyn ValueType<T>>,
    get: fn(&S) -> &T,
    get_mut: fn(&mut S) -> &mut T,
}

impl<S, T> FieldSlot<S, T> {
    pub(crate) fn new(
        value_type: Arc<dyn ValueType<T>>,
        get: fn(&S) -> &T,
        get_mut: fn(&mut S) -> &mut T,
    ) -> Self {
        Self {
            value_type,
            get,
            get_mut,
        }
    }
}

impl<S: 'static, T: 'static> Slot<S> for FieldSlot<S, T> {
    fn get<'a>(&self, config: &'a S) -> &'a (dyn Any + 'static) {
        (self.get)(config)
    }

    fn load(&self, config: &mut S, document: &Document, key: &str) -> LoadOutcome<()> {
        self.value_type
            .load_entry(document, key)
            .map(|value| *(self.get_mut)(config) = value)
    }

    fn save(&self, config: &S, document: &mut Document, key: &str) {
        self.value_type
            .save_entry(document, key, Some((self.get)(config)));
    }

    fn copy(&self, from: &Document, to: &mut Document, key: &str) -> LoadOutcome<()> {
        self.value_type
            .load_entry(from, key)
            .map(|value| self.value_type.save_entry(to, key, Some(&value)))
    }

    fn format(&self, config: &S) -> String {
        self.value_type.format((self.get)(config))
    }

    fn parse(&self, config: &mut S, input: &str) -> Result<(), ValueParseError> {
        let value = self.value_type.parse(input)?;
        *(self.get_mut)(config) = value;
        Ok(())
    }
}

/// A slot of a composed parent struct, reached through the child.
pub(crate) struct ProjectedSlot<S, P> {
    get: fn(&S) -> &P,
    get_mut: fn(&mut S) -> &mut P,
    inner: Box<dyn Slot<P>>,
}

impl<S, P> ProjectedSlot<S, P> {
    pub(crate) fn new(
        get: fn(&S) -> &P,
        get_mut: fn(&mut S) -> &mut P,
        inner: Box<dyn Slot<P>>,
    ) -> Self {
        Self { get, get_mut, inner }
    }
}

impl<S: 'static, P: 'static> Slot<S> for ProjectedSlot<S, P> {
    fn get<'a>(&self, config: &'a S) -> &'a (dyn Any + 'static) {
        self.inner.get((self.get)(config))
    }

    fn load(&self, config: &mut S, document: &Document, key: &str) -> LoadOutcome<()> {
        self.inner.load((self.get_mut)(config), document, key)
    }

    fn save(&self, config: &S, document: &mut Document, key: &str) {
        self.inner.save((self.get)(config), document, key);
    }

    fn copy(&self, from: &Document, to: &mut Document, key: &str) -> LoadOutcome<()> {
        self.inner.copy(from, to, key)
    }

    fn format(&self, config: &S) -> String {
        self.inner.format((self.get)(config))
    }

    fn parse(&self, config: &mut S, input: &str) -> Result<(), ValueParseError> {
        self.inner.parse((self.get_mut)(config), input)
    }
}
