//! Versioned, in-place migrations of persisted documents.
//!
//! Migration `n` brings a document from version `n` to version `n + 1`, so
//! the migrations of a config form the sequence `0..latest`. The version a
//! document is at is stored under [`VERSION_KEY`]; only
//! [`ConfigMigrations::apply_migrations`] advances it.
use std::{any::TypeId, fmt};

use serde_json::Value;
use tracing::info;

use crate::{
    config::Config,
    document::Document,
    error::{ConfigLoadError, MigrationChainError, MigrationError},
};

mod helpers;

pub use helpers::{migrate_setting, migrate_value, remove_setting};

/// The reserved top-level key holding the version of a document.
pub const VERSION_KEY: &str = "config-version";

/// Advances a document by exactly one version. Problems with individual
/// entries should be logged and skipped; an error aborts the whole load.
pub type MigrateFn = fn(&mut Document) -> Result<(), MigrationError>;

/// A migration registered with [`submit_migration!`](crate::submit_migration).
pub trait Migration: 'static + Send + Sync {
    /// The version this migration migrates from.
    const FROM: u32;

    fn migrate(document: &mut Document) -> Result<(), MigrationError>;
}

pub struct RegisteredMigration {
    pub config: fn() -> TypeId,
    pub from: fn() -> u32,
    pub migrate: MigrateFn,
}

impl RegisteredMigration {
    pub const fn new<T: Config, M: Migration>() -> Self {
        Self {
            config: || TypeId::of::<T>(),
            from: || M::FROM,
            migrate: M::migrate,
        }
    }
}

inventory::collect!(RegisteredMigration);

/// Registers migration `$migration` for the config type `$config`.
#[macro_export]
macro_rules! submit_migration {
    ($config:ty, $migration:ty) => {
        $crate::inventory::submit! {
            $crate::RegisteredMigration::new::<$config, $migration>()
        }
    };
}

/// The ordered migrations of one config type.
#[derive(Clone, Default)]
pub struct ConfigMigrations {
    migrations: Vec<MigrateFn>,
}

impl ConfigMigrations {
    /// `migrations[n]` migrates from version `n`.
    pub fn new(migrations: Vec<MigrateFn>) -> Self {
        Self { migrations }
    }

    /// Assembles the migrations registered for `T`.
    pub fn registered<T: Config>() -> Result<Self, MigrationChainError> {
        let config = TypeId::of::<T>();
        let mut registered: Vec<(u32, MigrateFn)> = inventory::iter::<RegisteredMigration>
            .into_iter()
            .filter(|registration| (registration.config)() == config)
            .map(|registration| ((registration.from)(), registration.migrate))
            .collect();
        registered.sort_by_key(|(from, _)| *from);

        let mut migrations = Vec::with_capacity(registered.len());
        for (from, migrate) in registered {
            let expected = migrations.len() as u32;
            if from < expected {
                return Err(MigrationChainError::Duplicate { from });
            }
            if from > expected {
                return Err(MigrationChainError::Gap { from: expected });
            }
            migrations.push(migrate);
        }
        Ok(Self { migrations })
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.len() as u32
    }

    /// Brings `document` up to the latest version.
    ///
    /// An empty document is left alone, and a document without a version is
    /// taken to be at version 0. Returns whether any migration ran.
    pub fn apply_migrations(&self, document: &mut Document) -> Result<bool, ConfigLoadError> {
        if document.is_empty() {
            return Ok(false);
        }

        let latest = self.latest_version();
        let version = match document.get(VERSION_KEY) {
            Some(raw) => parse_version(raw)?,
            None => {
                info!(
                    event = "config.migration.version_missing",
                    "Missing config version. Assuming version '0'."
                );
                0
            }
        };
        let current = u32::try_from(version)
            .ok()
            .filter(|version| *version <= latest)
            .ok_or(ConfigLoadError::VersionOutOfRange { version, latest })?;

        let mut migrated = false;
        for (from, migrate) in self.migrations.iter().enumerate().skip(current as usize) {
            let from = from as u32;
            let to = from + 1;
            info!(
                event = "config.migration.started",
                from,
                to,
                "Migrating config from version {from} to version {to} ..."
            );
            migrate(document).map_err(|source| ConfigLoadError::Migration { from, source })?;
            document.set(VERSION_KEY, to);
            migrated = true;
        }

        if migrated {
            info!(
                event = "config.migration.completed",
                version = latest,
                "Config migrated to version {latest}."
            );
        }
        Ok(migrated)
    }
}

impl fmt::Debug for ConfigMigrations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigMigrations")
            .field("latest_version", &self.latest_version())
            .finish()
    }
}

fn parse_version(raw: &Value) -> Result<i64, ConfigLoadError> {
    let version = match raw {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    version.ok_or_else(|| ConfigLoadError::InvalidVersion {
        value: raw.to_string(),
    })
}
