//! Settings discovery and the load/save protocol.
//!
//! A [`Schema`] is built once per settings struct. Building walks the
//! declared fields (own fields first, then those of composed parents),
//! derives each field's config key and resolves its value type. Every
//! problem with the declared shape surfaces here as a [`SchemaError`], so a
//! misconfigured schema never gets as far as loading.
//!
//! Loading isolates per-setting problems: a missing or malformed entry is
//! reported and leaves the in-memory value of that setting untouched, and
//! the remaining settings load normally.
mod builder;
mod resolve;

use std::collections::HashMap;

use tracing::{debug, warn};

pub use builder::{FieldBuilder, FieldInfo, SchemaBuilder};
pub use resolve::ValueTypeSource;

use crate::{
    config::{Config, LoadReport},
    data::ConfigData,
    document::Document,
    error::SchemaError,
    setting::Setting,
    value::{LoadOutcome, short_type_name},
};

pub struct Schema<S> {
    settings: Vec<Setting<S>>,
}

impl<S: Config> Schema<S> {
    pub fn build() -> Result<Self, SchemaError> {
        let mut builder = SchemaBuilder::new();
        S::declare(&mut builder);
        let (fields, value_types) = builder.finish();

        let mut settings: Vec<Setting<S>> = Vec::with_capacity(fields.len());
        let mut seen: HashMap<String, &'static str> = HashMap::new();
        for field in fields {
            if !S::is_setting(&field.info) {
                continue;
            }

            let key = match field.info.key() {
                Some(key) => key.to_owned(),
                None => S::config_key(&field.info),
            };
            if let Some(first) = seen.get(&key) {
                return Err(SchemaError::DuplicateKey {
                    key,
                    first: (*first).to_owned(),
                    second: field.info.name().to_owned(),
                });
            }
            if let Some(error) = nested_key_conflict(&key, &seen) {
                return Err(error);
            }

            let (value_type, source) = resolve::resolve_value_type(&field, &key, &value_types)?;
            let slot = (field.slot)(&value_type).ok_or_else(|| SchemaError::ValueTypeMismatch {
                key: key.clone(),
                expected: field.field_type.name().to_owned(),
                actual: value_type.target_type_name().to_owned(),
            })?;

            seen.insert(key.clone(), field.info.name());
            settings.push(Setting::new(key, field.info.name(), value_type, source, slot));
        }

        debug!(
            event = "config.schema.built",
            config = short_type_name::<S>(),
            settings = settings.len(),
            "Built config schema"
        );
        Ok(Self { settings })
    }

    /// The settings, in discovery order.
    pub fn settings(&self) -> &[Setting<S>] {
        &self.settings
    }

    pub fn setting(&self, key: &str) -> Option<&Setting<S>> {
        self.settings.iter().find(|setting| setting.key() == key)
    }

    /// Writes every setting of `config` into `document`, overwriting existing
    /// entries.
    pub fn save(&self, config: &S, document: &mut Document) {
        for setting in &self.settings {
            setting.save(config, document);
        }
    }

    /// Loads every setting from `data` into `config`, then runs
    /// [`Config::validate_settings`].
    ///
    /// A setting missing from the primary document takes its value from the
    /// defaults document, if that provides one. A setting that is missing
    /// without a default, or whose entry fails to load, keeps its current
    /// value. Each of these cases is recorded on the returned report.
    pub fn load(&self, config: &mut S, data: &ConfigData) -> LoadReport {
        let mut report = LoadReport::new(S::LOG_PREFIX);
        for setting in &self.settings {
            let key = setting.key();
            if !data.contains(key) {
                if self.load_default(setting, config, data, &mut report) {
                    report.warn(format!("Using default value for missing config entry: {key}"));
                } else {
                    report.warn(format!("Missing config entry: {key}"));
                }
                continue;
            }

            if let LoadOutcome::Invalid(error) = setting.load(config, data.document()) {
                report.warn(format!("Could not load setting '{key}': {}", error.message()));
                for extra_message in error.extra_messages() {
                    report.warn(extra_message.clone());
                }
            }
        }

        config.validate_settings(&mut report);
        report
    }

    fn load_default(
        &self,
        setting: &Setting<S>,
        config: &mut S,
        data: &ConfigData,
        report: &mut LoadReport,
    ) -> bool {
        let Some(defaults) = data.defaults() else {
            return false;
        };
        match setting.load(config, defaults) {
            LoadOutcome::Loaded(()) => true,
            LoadOutcome::Missing => false,
            LoadOutcome::Invalid(error) => {
                report.warn(format!(
                    "Could not load default value for setting '{}': {}",
                    setting.key(),
                    error.message()
                ));
                false
            }
        }
    }

    /// Writes the default value of every setting missing from the primary
    /// document into it. Does nothing without a defaults document.
    ///
    /// Returns whether anything was inserted.
    pub fn insert_missing_default_values(&self, data: &mut ConfigData) -> bool {
        let prefix = S::LOG_PREFIX;
        let (document, Some(defaults)) = data.parts_mut() else {
            return false;
        };

        let mut changed = false;
        for setting in &self.settings {
            let key = setting.key();
            if document.contains(key) {
                continue;
            }

            warn!(
                event = "config.defaults.insert",
                key,
                "{prefix}Inserting default value for missing config entry: {key}"
            );
            match setting.copy_default(defaults, document) {
                LoadOutcome::Loaded(()) => changed = true,
                LoadOutcome::Missing => {
                    warn!(
                        event = "config.defaults.missing",
                        key,
                        "{prefix}Missing default value for setting: {key}"
                    );
                }
                LoadOutcome::Invalid(error) => {
                    warn!(
                        event = "config.defaults.invalid",
                        key,
                        "{prefix}Could not load default value for setting '{key}': {error}"
                    );
                    warn!(
                        event = "config.defaults.missing",
                        key,
                        "{prefix}Missing default value for setting: {key}"
                    );
                }
            }
        }
        changed
    }
}

impl<S> std::fmt::Debug for Schema<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Finds an earlier key that is a section holding `key`, or one that `key`
/// would hold.
fn nested_key_conflict(key: &str, seen: &HashMap<String, &'static str>) -> Option<SchemaError> {
    let parent = key
        .match_indices('.')
        .map(|(index, _)| &key[..index])
        .find(|prefix| seen.contains_key(*prefix));
    if let Some(parent) = parent {
        return Some(SchemaError::NestedKey {
            parent: parent.to_owned(),
            child: key.to_owned(),
        });
    }

    seen.keys()
        .filter(|other| {
            other
                .strip_prefix(key)
                .is_some_and(|rest| rest.starts_with('.'))
        })
        .min()
        .map(|child| SchemaError::NestedKey {
            parent: key.to_owned(),
            child: child.clone(),
        })
}
