//! Building blocks for migrations. Each logs what it did and returns whether
//! it changed the document.
use serde_json::Value;
use tracing::info;

use crate::document::Document;

/// Removes the entry at `key`, if present.
pub fn remove_setting(document: &mut Document, key: &str) -> bool {
    if !document.contains(key) {
        return false;
    }
    info!(
        event = "config.migration.setting_removed",
        key,
        "  Removing setting '{key}'."
    );
    document.remove(key);
    true
}

/// Replaces the value at `key` with `new_value`, but only if it currently
/// equals `expected`.
pub fn migrate_value(
    document: &mut Document,
    key: &str,
    expected: &Value,
    new_value: impl Into<Value>,
) -> bool {
    if document.get(key) != Some(expected) {
        return false;
    }
    let new_value = new_value.into();
    info!(
        event = "config.migration.value_migrated",
        key,
        "  Migrating setting '{key}' from value {expected} to new value {new_value}."
    );
    document.set(key, new_value);
    true
}

/// Moves the value at `old_key` to `new_key`, unless `old_key` is absent or
/// `new_key` is already present.
pub fn migrate_setting(document: &mut Document, old_key: &str, new_key: &str) -> bool {
    if !document.contains(old_key) || document.contains(new_key) {
        return false;
    }
    let Some(value) = document.remove(old_key) else {
        return false;
    };
    info!(
        event = "config.migration.setting_migrated",
        old_key,
        new_key,
        "  Migrating setting '{old_key}' to '{new_key}'."
    );
    document.set(new_key, value);
    true
}
