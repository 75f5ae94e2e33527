//! A config persisted as a TOML file.
//!
//! [`ConfigFile::load`] runs the complete load pipeline for one settings
//! struct:
//!
//! 1. Read the file. A missing or empty file is populated from the in-memory
//!    values of the settings struct and stamped with the latest version.
//! 2. Otherwise, migrate the document to the latest version.
//! 3. Insert the default values of missing settings, if a defaults document
//!    was provided.
//! 4. Load the settings.
//! 5. Write the document back, but only if one of the steps above changed it.
//!
//! Writes replace the file atomically under an advisory file lock.
//!
//! ```no_run
//! use settings_schema::{Config, ConfigFile, ConfigMigrations};
//!
//! #[derive(Debug, Config)]
//! #[config(keys = "snake_case")]
//! pub struct ShopSettings {
//!     pub max_pages: i32,
//! }
//!
//! # fn main() -> Result<(), settings_schema::error::Error> {
//! let file = ConfigFile::<ShopSettings>::new("config.toml", ConfigMigrations::default())?;
//! let mut settings = ShopSettings { max_pages: 5 };
//! let report = file.load(&mut settings)?;
//! for warning in report.warnings() {
//!     eprintln!("{warning}");
//! }
//! # Ok(())
//! # }
//! ```
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    atomic::AtomicFile,
    config::{Config, LoadReport},
    data::ConfigData,
    document::Document,
    error::Error,
    migration::{ConfigMigrations, VERSION_KEY},
    schema::Schema,
};

pub struct ConfigFile<S> {
    file: AtomicFile,
    schema: Schema<S>,
    migrations: ConfigMigrations,
    defaults: Option<Document>,
}

impl<S: Config> ConfigFile<S> {
    /// Builds the schema of `S` up front, so schema errors surface here.
    pub fn new(path: impl Into<PathBuf>, migrations: ConfigMigrations) -> Result<Self, Error> {
        Ok(Self {
            file: AtomicFile::new(path),
            schema: Schema::build()?,
            migrations,
            defaults: None,
        })
    }

    /// Uses `defaults` for settings the file lacks, and inserts them into
    /// the file.
    pub fn with_defaults(mut self, defaults: Document) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn schema(&self) -> &Schema<S> {
        &self.schema
    }

    pub fn migrations(&self) -> &ConfigMigrations {
        &self.migrations
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn load(&self, config: &mut S) -> Result<LoadReport, Error> {
        info!(
            event = "config.file.load_started",
            path = %self.path().display(),
            "{}Loading config.",
            S::LOG_PREFIX
        );

        let mut document = self.read()?;
        let mut changed = if document.is_empty() {
            document.set(VERSION_KEY, self.migrations.latest_version());
            self.schema.save(config, &mut document);
            true
        } else {
            self.migrations.apply_migrations(&mut document)?
        };

        let mut data = ConfigData::new(document);
        data.set_defaults(self.defaults.clone());
        changed |= self.schema.insert_missing_default_values(&mut data);

        let report = self.schema.load(config, &data);
        if changed {
            self.write(data.document())?;
        }

        info!(
            event = "config.file.load_completed",
            path = %self.path().display(),
            changed,
            warnings = report.warnings().len()
        );
        Ok(report)
    }

    /// Writes the current values of `config` into the file, keeping entries
    /// that are not settings.
    pub fn save(&self, config: &S) -> Result<(), Error> {
        let mut document = self.read()?;
        if !document.contains(VERSION_KEY) {
            document.set(VERSION_KEY, self.migrations.latest_version());
        }
        self.schema.save(config, &mut document);
        self.write(&document)
    }

    fn read(&self) -> Result<Document, Error> {
        let contents = self.file.read()?;
        Document::from_toml_str(&contents)
    }

    fn write(&self, document: &Document) -> Result<(), Error> {
        self.file.write(&document.to_toml_string()?)?;
        info!(
            event = "config.file.saved",
            path = %self.path().display()
        );
        Ok(())
    }
}

impl<S> std::fmt::Debug for ConfigFile<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigFile")
            .field("path", &self.file.path())
            .field("migrations", &self.migrations)
            .finish()
    }
}
