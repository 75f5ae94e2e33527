use tracing::warn;

use crate::{
    key::to_config_key,
    schema::{FieldInfo, SchemaBuilder},
};

/// A settings struct: one field per setting.
///
/// Usually implemented with `#[derive(Config)]`, which generates
/// [`declare`](Config::declare) from the struct's fields and maps the
/// `#[config(...)]` attributes onto the hooks below.
///
/// ```
/// use settings_schema::{Config, Schema};
///
/// #[derive(Debug, Default, Config)]
/// #[config(keys = "snake_case")]
/// pub struct ShopSettings {
///     pub max_pages: i32,
///     #[config(colored)]
///     pub shop_name: String,
/// }
///
/// let schema = Schema::<ShopSettings>::build().expect("Failed to build schema");
/// let keys: Vec<_> = schema.settings().iter().map(|s| s.key()).collect();
/// assert_eq!(keys, ["max-pages", "shop-name"]);
/// ```
pub trait Config: Sized + Send + Sync + 'static {
    /// Prepended to every log message about this config.
    const LOG_PREFIX: &'static str = "Config: ";

    /// Declares the fields of this struct, in order, followed by the fields
    /// of composed parent structs.
    fn declare(builder: &mut SchemaBuilder<Self>);

    /// Whether a declared field is a setting. Defaults to public fields.
    fn is_setting(field: &FieldInfo) -> bool {
        field.is_public()
    }

    /// Derives the config key of a field that has no explicit key.
    fn config_key(field: &FieldInfo) -> String {
        to_config_key(field.name())
    }

    /// Runs once after all settings were loaded, to enforce invariants that
    /// span several settings. Corrections should be recorded on `report`.
    fn validate_settings(&mut self, report: &mut LoadReport) {
        let _ = report;
    }
}

/// The warnings produced while loading a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    prefix: &'static str,
    warnings: Vec<String>,
}

impl LoadReport {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            warnings: Vec::new(),
        }
    }

    /// Logs and records a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(event = "config.load.warning", "{}{}", self.prefix, message);
        self.warnings.push(message);
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// The recorded warnings, without the log prefix.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
