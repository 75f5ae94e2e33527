//! Integration tests for config migrations.

use serde_json::{Value, json};
use settings_schema::{
    Config, ConfigMigrations, Document, Migration, VERSION_KEY,
    error::{ConfigLoadError, MigrationChainError, MigrationError},
    migration::{migrate_setting, migrate_value, remove_setting},
    submit_migration,
};

/// Helper to build a document from a JSON object literal
fn document(value: Value) -> Document {
    Document::from_map(value.as_object().cloned().expect("Expected a JSON object"))
}

/// Appends `step` to the `steps` list, to observe which migrations ran.
fn record(document: &mut Document, step: i64) -> Result<(), MigrationError> {
    let mut steps = document
        .get("steps")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    steps.push(json!(step));
    document.set("steps", steps);
    Ok(())
}

fn from_zero(document: &mut Document) -> Result<(), MigrationError> {
    record(document, 0)
}

fn from_one(document: &mut Document) -> Result<(), MigrationError> {
    record(document, 1)
}

fn from_two(document: &mut Document) -> Result<(), MigrationError> {
    record(document, 2)
}

fn failing(_: &mut Document) -> Result<(), MigrationError> {
    Err(MigrationError::new("Unexpected layout"))
}

fn three_migrations() -> ConfigMigrations {
    ConfigMigrations::new(vec![from_zero, from_one, from_two])
}

#[test]
fn test_unversioned_document_runs_every_migration() {
    let migrations = three_migrations();
    let mut document = document(json!({ "name": "shop" }));

    let migrated = migrations
        .apply_migrations(&mut document)
        .expect("Failed to migrate");

    assert!(migrated);
    assert_eq!(migrations.latest_version(), 3);
    assert_eq!(document.get("steps"), Some(&json!([0, 1, 2])));
    assert_eq!(document.get(VERSION_KEY), Some(&json!(3)));
    assert_eq!(document.get("name"), Some(&json!("shop")));
}

#[test]
fn test_migrations_start_at_stored_version() {
    let migrations = three_migrations();
    let mut document = document(json!({ VERSION_KEY: 1 }));

    assert!(
        migrations
            .apply_migrations(&mut document)
            .expect("Failed to migrate")
    );
    assert_eq!(document.get("steps"), Some(&json!([1, 2])));
    assert_eq!(document.get(VERSION_KEY), Some(&json!(3)));
}

#[test]
fn test_numeric_string_version_is_accepted() {
    let migrations = three_migrations();
    let mut document = document(json!({ VERSION_KEY: "2" }));

    assert!(
        migrations
            .apply_migrations(&mut document)
            .expect("Failed to migrate")
    );
    assert_eq!(document.get("steps"), Some(&json!([2])));
}

#[test]
fn test_latest_document_is_left_alone() {
    let migrations = three_migrations();
    let mut document = document(json!({ VERSION_KEY: 3, "name": "shop" }));

    assert!(
        !migrations
            .apply_migrations(&mut document)
            .expect("Failed to migrate")
    );
    assert_eq!(document.get("steps"), None);
    assert_eq!(document.get(VERSION_KEY), Some(&json!(3)));
}

#[test]
fn test_empty_document_is_not_migrated() {
    let migrations = three_migrations();
    let mut document = Document::new();

    assert!(
        !migrations
            .apply_migrations(&mut document)
            .expect("Failed to migrate")
    );
    assert!(document.is_empty());
}

#[test]
fn test_version_out_of_range() {
    let migrations = three_migrations();

    for version in [-1, 4] {
        let mut document = document(json!({ VERSION_KEY: version }));
        let error = migrations
            .apply_migrations(&mut document)
            .expect_err("Version should be out of range");

        assert!(
            matches!(
                error,
                ConfigLoadError::VersionOutOfRange { version: v, latest: 3 } if v == version
            ),
            "Unexpected error: {error}"
        );
        assert_eq!(document.get("steps"), None);
    }
}

#[test]
fn test_unparsable_version() {
    let migrations = three_migrations();
    let mut document = document(json!({ VERSION_KEY: "two" }));

    let error = migrations
        .apply_migrations(&mut document)
        .expect_err("Version should not parse");

    assert!(matches!(error, ConfigLoadError::InvalidVersion { .. }));
}

#[test]
fn test_failed_migration_aborts() {
    let migrations = ConfigMigrations::new(vec![from_zero, failing, from_two]);
    let mut document = document(json!({ "name": "shop" }));

    let error = migrations
        .apply_migrations(&mut document)
        .expect_err("Migration should fail");

    match error {
        ConfigLoadError::Migration { from, source } => {
            assert_eq!(from, 1);
            assert_eq!(source.to_string(), "Unexpected layout");
        }
        other => panic!("Unexpected error: {other}"),
    }
    assert_eq!(document.get("steps"), Some(&json!([0])));
    assert_eq!(document.get(VERSION_KEY), Some(&json!(1)));
}

#[test]
fn test_migrate_setting() {
    let mut document = document(json!({ "shop": { "max-pages": 5 } }));

    assert!(migrate_setting(&mut document, "shop.max-pages", "max-pages"));
    assert_eq!(document.get("max-pages"), Some(&json!(5)));
    assert!(!document.contains("shop.max-pages"));

    // The old key is gone, so a second run changes nothing.
    assert!(!migrate_setting(&mut document, "shop.max-pages", "max-pages"));
    assert_eq!(document.get("max-pages"), Some(&json!(5)));
}

#[test]
fn test_migrate_setting_keeps_existing_target() {
    let mut document = document(json!({ "old": 1, "new": 2 }));

    assert!(!migrate_setting(&mut document, "old", "new"));
    assert_eq!(document.get("old"), Some(&json!(1)));
    assert_eq!(document.get("new"), Some(&json!(2)));
}

#[test]
fn test_migrate_value() {
    let mut document = document(json!({ "language": "en" }));

    assert!(!migrate_value(&mut document, "language", &json!("de"), "de-de"));
    assert!(migrate_value(&mut document, "language", &json!("en"), "en-default"));
    assert_eq!(document.get("language"), Some(&json!("en-default")));
    assert!(!migrate_value(&mut document, "missing", &json!("en"), "de"));
    assert!(!document.contains("missing"));
}

#[test]
fn test_remove_setting() {
    let mut document = document(json!({ "legacy": true, "kept": 1 }));

    assert!(remove_setting(&mut document, "legacy"));
    assert!(!remove_setting(&mut document, "legacy"));
    assert_eq!(document.keys().collect::<Vec<_>>(), ["kept"]);
}

#[derive(Debug, Default, Config)]
#[config(keys = "snake_case")]
pub struct Versioned {
    pub max_pages: i32,
}

struct RenameMaxPages;

impl Migration for RenameMaxPages {
    const FROM: u32 = 0;

    fn migrate(document: &mut Document) -> Result<(), MigrationError> {
        migrate_setting(document, "pages", "max-pages");
        Ok(())
    }
}

struct DoubleMaxPages;

impl Migration for DoubleMaxPages {
    const FROM: u32 = 1;

    fn migrate(document: &mut Document) -> Result<(), MigrationError> {
        let pages = document
            .get("max-pages")
            .and_then(Value::as_i64)
            .ok_or_else(|| MigrationError::new("Missing 'max-pages'"))?;
        document.set("max-pages", pages * 2);
        Ok(())
    }
}

// Registered in reverse order on purpose.
submit_migration!(Versioned, DoubleMaxPages);
submit_migration!(Versioned, RenameMaxPages);

#[test]
fn test_registered_migrations() {
    let migrations =
        ConfigMigrations::registered::<Versioned>().expect("Failed to collect migrations");
    assert_eq!(migrations.latest_version(), 2);

    let mut document = document(json!({ "pages": 4 }));
    assert!(
        migrations
            .apply_migrations(&mut document)
            .expect("Failed to migrate")
    );
    assert_eq!(document.get("max-pages"), Some(&json!(8)));
    assert_eq!(document.get(VERSION_KEY), Some(&json!(2)));
}

#[derive(Debug, Default, Config)]
pub struct Unmigrated {
    pub value: i32,
}

#[test]
fn test_no_registered_migrations() {
    let migrations =
        ConfigMigrations::registered::<Unmigrated>().expect("Failed to collect migrations");
    assert_eq!(migrations.latest_version(), 0);
}

#[derive(Debug, Default, Config)]
pub struct Gapped {
    pub value: i32,
}

struct GappedFromZero;

impl Migration for GappedFromZero {
    const FROM: u32 = 0;

    fn migrate(_: &mut Document) -> Result<(), MigrationError> {
        Ok(())
    }
}

struct GappedFromTwo;

impl Migration for GappedFromTwo {
    const FROM: u32 = 2;

    fn migrate(_: &mut Document) -> Result<(), MigrationError> {
        Ok(())
    }
}

submit_migration!(Gapped, GappedFromZero);
submit_migration!(Gapped, GappedFromTwo);

#[test]
fn test_gap_in_registered_migrations() {
    let error = ConfigMigrations::registered::<Gapped>().expect_err("Version 1 is missing");
    assert_eq!(error, MigrationChainError::Gap { from: 1 });
}

#[derive(Debug, Default, Config)]
pub struct Doubled {
    pub value: i32,
}

struct DoubledFirst;

impl Migration for DoubledFirst {
    const FROM: u32 = 0;

    fn migrate(_: &mut Document) -> Result<(), MigrationError> {
        Ok(())
    }
}

struct DoubledSecond;

impl Migration for DoubledSecond {
    const FROM: u32 = 0;

    fn migrate(_: &mut Document) -> Result<(), MigrationError> {
        Ok(())
    }
}

submit_migration!(Doubled, DoubledFirst);
submit_migration!(Doubled, DoubledSecond);

#[test]
fn test_duplicate_registered_migrations() {
    let error =
        ConfigMigrations::registered::<Doubled>().expect_err("Version 0 is registered twice");
    assert_eq!(error, MigrationChainError::Duplicate { from: 0 });
}
