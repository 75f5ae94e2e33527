use std::marker::PhantomData;

use crate::{
    config::Config,
    field::{FieldType, SettingType},
    setting::{FieldSlot, ProjectedSlot, Slot},
    value::{AnyValueType, ValueType, ValueTypeProvider, ValueTypeRegistry},
};

/// What [`Config::is_setting`] and [`Config::config_key`] know about a
/// declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    name: &'static str,
    public: bool,
    key: Option<String>,
}

impl FieldInfo {
    pub fn new(name: &'static str, public: bool) -> Self {
        Self {
            name,
            public,
            key: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    /// The explicitly assigned config key, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

/// Binds a resolved value type to a field, or fails if it produces values of
/// another type.
pub(crate) type SlotFactory<S> =
    Box<dyn Fn(&AnyValueType) -> Option<Box<dyn Slot<S>>> + Send + Sync>;

pub(crate) struct FieldDecl<S> {
    pub(crate) info: FieldInfo,
    pub(crate) field_type: FieldType,
    pub(crate) explicit: Option<AnyValueType>,
    pub(crate) colored: bool,
    pub(crate) uncolored: bool,
    pub(crate) slot: SlotFactory<S>,
}

impl<P: 'static> FieldDecl<P> {
    fn project<S: 'static>(self, get: fn(&S) -> &P, get_mut: fn(&mut S) -> &mut P) -> FieldDecl<S> {
        let slot = self.slot;
        FieldDecl {
            info: self.info,
            field_type: self.field_type,
            explicit: self.explicit,
            colored: self.colored,
            uncolored: self.uncolored,
            slot: Box::new(move |value_type: &AnyValueType| {
                let inner = slot(value_type)?;
                Some(Box::new(ProjectedSlot::new(get, get_mut, inner)) as Box<dyn Slot<S>>)
            }),
        }
    }
}

/// Collects the declared fields and custom default value types of a
/// settings struct. Filled in by [`Config::declare`].
pub struct SchemaBuilder<S> {
    fields: Vec<FieldDecl<S>>,
    value_types: ValueTypeRegistry,
    inherited_fields: Vec<FieldDecl<S>>,
    inherited_value_types: ValueTypeRegistry,
}

impl<S: Config> SchemaBuilder<S> {
    pub(crate) fn new() -> Self {
        Self {
            fields: Vec::new(),
            value_types: ValueTypeRegistry::new(),
            inherited_fields: Vec::new(),
            inherited_value_types: ValueTypeRegistry::new(),
        }
    }

    /// Declares a field, accessed through `get` and `get_mut`.
    pub fn field<T: SettingType>(
        &mut self,
        info: FieldInfo,
        get: fn(&S) -> &T,
        get_mut: fn(&mut S) -> &mut T,
    ) -> FieldBuilder<'_, S, T> {
        let slot: SlotFactory<S> = Box::new(move |value_type: &AnyValueType| {
            let value_type = value_type.downcast::<T>()?;
            Some(Box::new(FieldSlot::new(value_type, get, get_mut)) as Box<dyn Slot<S>>)
        });
        self.fields.push(FieldDecl {
            info,
            field_type: T::field_type(),
            explicit: None,
            colored: false,
            uncolored: false,
            slot,
        });
        FieldBuilder {
            index: self.fields.len() - 1,
            builder: self,
            _marker: PhantomData,
        }
    }

    /// Registers a default value type for all fields of type `T` that have no
    /// explicit value type or marker. The first registration for `T` wins.
    pub fn default_value_type<T: 'static, V: ValueType<T> + 'static>(
        &mut self,
        value_type: V,
    ) -> &mut Self {
        self.value_types.register_type::<T, V>(value_type);
        self
    }

    /// Registers a provider, consulted after all default value types.
    pub fn value_type_provider(&mut self, provider: impl ValueTypeProvider + 'static) -> &mut Self {
        self.value_types.register_provider(provider);
        self
    }

    /// Composes the settings of the parent struct `P`, reached through
    /// `get` and `get_mut`. They follow the fields of this struct, and so do
    /// the default value types `P` registers.
    pub fn parent<P: Config>(
        &mut self,
        get: fn(&S) -> &P,
        get_mut: fn(&mut S) -> &mut P,
    ) -> &mut Self {
        let mut parent = SchemaBuilder::<P>::new();
        P::declare(&mut parent);
        let (fields, value_types) = parent.finish();

        self.inherited_fields
            .extend(fields.into_iter().map(|field| field.project(get, get_mut)));
        self.inherited_value_types.extend(value_types);
        self
    }

    pub(crate) fn finish(mut self) -> (Vec<FieldDecl<S>>, ValueTypeRegistry) {
        self.fields.append(&mut self.inherited_fields);
        self.value_types.extend(self.inherited_value_types);
        (self.fields, self.value_types)
    }
}

/// Adjusts how the value type of one declared field is resolved.
pub struct FieldBuilder<'a, S, T> {
    builder: &'a mut SchemaBuilder<S>,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<S, T: 'static> FieldBuilder<'_, S, T> {
    fn decl(&mut self) -> &mut FieldDecl<S> {
        &mut self.builder.fields[self.index]
    }

    /// Stores the field at `key` instead of its derived key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.decl().info.key = Some(key.into());
        self
    }

    /// Translates color codes of a `String` or `Vec<String>` field.
    pub fn colored(mut self) -> Self {
        self.decl().colored = true;
        self
    }

    /// Keeps a `String` or `Vec<String>` field as plain text, even if a
    /// custom default value type would colorize it.
    pub fn uncolored(mut self) -> Self {
        self.decl().uncolored = true;
        self
    }

    /// Uses `V` for this field regardless of any other registration.
    pub fn value_type<V: ValueType<T> + Default + 'static>(self) -> Self {
        self.with_value_type(V::default())
    }

    pub fn with_value_type<V: ValueType<T> + 'static>(mut self, value_type: V) -> Self {
        self.decl().explicit = Some(AnyValueType::new::<T, V>(value_type));
        self
    }
}
