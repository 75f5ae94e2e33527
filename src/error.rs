use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML Serialization: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    #[error("TOML Deserialization: {0}")]
    TomlDeserialization(#[from] toml::de::Error),

    #[error("Schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Load: {0}")]
    Load(#[from] ConfigLoadError),

    #[error("Migration chain: {0}")]
    MigrationChain(#[from] MigrationChainError),
}

/// A stored document value could not be turned into a setting value.
///
/// This is recoverable: [`Schema::load`](crate::Schema::load) reports it and
/// keeps the previous in-memory value of the setting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValueLoadError {
    message: String,
    extra_messages: Vec<String>,
}

impl ValueLoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extra_messages: Vec::new(),
        }
    }

    /// Attaches additional diagnostic lines, reported after the main message.
    pub fn with_extra_messages<I, M>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.extra_messages
            .extend(messages.into_iter().map(Into::into));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn extra_messages(&self) -> &[String] {
        &self.extra_messages
    }
}

/// Human-entered text could not be parsed into a setting value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValueParseError {
    message: String,
}

impl ValueParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The declared shape of a settings struct cannot be turned into a schema.
///
/// Always returned eagerly by [`Schema::build`](crate::Schema::build), so a
/// misconfigured schema never gets as far as loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Setting '{key}' is of unsupported type: {type_name}")]
    UnsupportedType { key: String, type_name: String },

    #[error(
        "The {marker} marker is not supported for settings of type {type_name} (setting '{key}')"
    )]
    UnsupportedMarker {
        marker: &'static str,
        key: String,
        type_name: String,
    },

    #[error("Duplicate config key '{key}' (fields '{first}' and '{second}')")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },

    /// One key names a section that holds the other, so both cannot be stored.
    #[error("Config key '{child}' is nested under the key '{parent}' of another setting")]
    NestedKey { parent: String, child: String },

    #[error("Value type provider failed for type {type_name}: {message}")]
    ValueTypeProvider { type_name: String, message: String },

    #[error("Setting '{key}' of type {expected} resolved to a value type for {actual}")]
    ValueTypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },
}

/// A fatal problem with a persisted document; the caller should halt startup.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Could not parse config version: {value}")]
    InvalidVersion { value: String },

    #[error("Invalid config version: {version} (latest version: {latest})")]
    VersionOutOfRange { version: i64, latest: u32 },

    #[error("Config migration from version {from} failed: {source}")]
    Migration {
        from: u32,
        #[source]
        source: MigrationError,
    },
}

/// Returned by a migration function that hit an unexpected failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MigrationError {
    message: String,
}

impl MigrationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The registered migrations of a config type do not form the sequence `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationChainError {
    #[error("Duplicate migration registered for version {from}")]
    Duplicate { from: u32 },

    #[error("Missing migration for version {from}")]
    Gap { from: u32 },
}
