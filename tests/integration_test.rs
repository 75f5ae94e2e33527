use serde_json::json;
use settings_schema::{
    Config, ConfigFile, ConfigMigrations, Document, Schema, VERSION_KEY,
    error::{ConfigLoadError, Error, MigrationError},
    migration::migrate_setting,
    value::types::Trilean,
};
use std::fs;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Config)]
#[config(keys = "snake_case", log_prefix = "Shop: ")]
pub struct ShopSettings {
    pub max_pages: i32,
    pub name: String,
    pub debug: bool,
    pub tags: Vec<String>,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            max_pages: 5,
            name: "Shop".to_owned(),
            debug: false,
            tags: vec!["food".to_owned()],
        }
    }
}

fn rename_pages(document: &mut Document) -> Result<(), MigrationError> {
    migrate_setting(document, "pages", "max-pages");
    Ok(())
}

fn rename_title(document: &mut Document) -> Result<(), MigrationError> {
    migrate_setting(document, "title", "name");
    Ok(())
}

fn migrations() -> ConfigMigrations {
    ConfigMigrations::new(vec![rename_pages, rename_title])
}

fn read_document(file: &ConfigFile<ShopSettings>) -> Document {
    let contents = fs::read_to_string(file.path()).expect("Failed to read config file");
    Document::from_toml_str(&contents).expect("Failed to parse config file")
}

fn defaults() -> Document {
    let schema = Schema::<ShopSettings>::build().expect("Failed to build schema");
    let mut defaults = Document::new();
    schema.save(&ShopSettings::default(), &mut defaults);
    defaults
}

#[test]
fn test_missing_file_is_created() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = ConfigFile::<ShopSettings>::new(dir.path().join("shop.toml"), migrations())?;

    let mut settings = ShopSettings::default();
    let report = file.load(&mut settings)?;

    assert!(report.is_clean());
    assert_eq!(report.prefix(), "Shop: ");
    assert_eq!(settings, ShopSettings::default());

    let document = read_document(&file);
    assert_eq!(document.get(VERSION_KEY), Some(&json!(2)));
    assert_eq!(document.get("max-pages"), Some(&json!(5)));
    assert_eq!(document.get("tags"), Some(&json!(["food"])));
    Ok(())
}

#[test]
fn test_old_file_is_migrated_and_rewritten() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("shop.toml");
    fs::write(
        &path,
        r#"
pages = 3
title = "Corner shop"
debug = true
tags = ["tools", "wood"]
"#,
    )?;

    let file = ConfigFile::<ShopSettings>::new(&path, migrations())?;
    let mut settings = ShopSettings::default();
    let report = file.load(&mut settings)?;

    assert!(report.is_clean(), "Unexpected warnings: {:?}", report.warnings());
    assert_eq!(
        settings,
        ShopSettings {
            max_pages: 3,
            name: "Corner shop".to_owned(),
            debug: true,
            tags: vec!["tools".to_owned(), "wood".to_owned()],
        }
    );

    let document = read_document(&file);
    assert_eq!(document.get(VERSION_KEY), Some(&json!(2)));
    assert_eq!(document.get("max-pages"), Some(&json!(3)));
    assert!(!document.contains("pages"));
    assert!(!document.contains("title"));
    Ok(())
}

#[test]
fn test_missing_settings_are_inserted_from_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("shop.toml");
    fs::write(&path, "config-version = 2\nmax-pages = 8\n")?;

    let file = ConfigFile::<ShopSettings>::new(&path, migrations())?.with_defaults(defaults());
    let mut settings = ShopSettings {
        name: "In memory".to_owned(),
        ..Default::default()
    };
    let report = file.load(&mut settings)?;

    assert!(report.is_clean(), "Unexpected warnings: {:?}", report.warnings());
    assert_eq!(settings.max_pages, 8);
    assert_eq!(settings.name, "Shop");

    let document = read_document(&file);
    assert_eq!(document.get("max-pages"), Some(&json!(8)));
    assert_eq!(document.get("name"), Some(&json!("Shop")));
    assert_eq!(document.get("debug"), Some(&json!(false)));
    Ok(())
}

#[test]
fn test_missing_settings_without_defaults_keep_values() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("shop.toml");
    let contents = "config-version = 2\nmax-pages = 8\n";
    fs::write(&path, contents)?;

    let file = ConfigFile::<ShopSettings>::new(&path, migrations())?;
    let mut settings = ShopSettings::default();
    let report = file.load(&mut settings)?;

    assert_eq!(
        report.warnings(),
        [
            "Missing config entry: name",
            "Missing config entry: debug",
            "Missing config entry: tags",
        ]
    );
    assert_eq!(settings.max_pages, 8);
    assert_eq!(settings.name, "Shop");

    // Nothing changed, so the file is left as it was.
    assert_eq!(fs::read_to_string(&path)?, contents);
    Ok(())
}

#[test]
fn test_malformed_entry_keeps_value() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("shop.toml");
    fs::write(
        &path,
        r#"
config-version = 2
max-pages = "many"
name = "Shop"
debug = true
tags = []
"#,
    )?;

    let file = ConfigFile::<ShopSettings>::new(&path, migrations())?;
    let mut settings = ShopSettings::default();
    let report = file.load(&mut settings)?;

    assert_eq!(report.warnings().len(), 1);
    assert!(report.warnings()[0].starts_with("Could not load setting 'max-pages'"));
    assert_eq!(settings.max_pages, 5);
    assert!(settings.debug);
    assert!(settings.tags.is_empty());
    Ok(())
}

#[test]
fn test_save_keeps_unrelated_entries() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("shop.toml");
    fs::write(&path, "config-version = 2\nnote = \"hand written\"\nmax-pages = 1\n")?;

    let file = ConfigFile::<ShopSettings>::new(&path, migrations())?;
    let settings = ShopSettings {
        max_pages: 9,
        ..Default::default()
    };
    file.save(&settings)?;

    let document = read_document(&file);
    assert_eq!(document.get("note"), Some(&json!("hand written")));
    assert_eq!(document.get("max-pages"), Some(&json!(9)));
    assert_eq!(document.get("name"), Some(&json!("Shop")));

    let mut loaded = ShopSettings {
        max_pages: 0,
        ..Default::default()
    };
    assert!(file.load(&mut loaded)?.is_clean());
    assert_eq!(loaded, settings);
    Ok(())
}

#[test]
fn test_future_version_fails_to_load() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("shop.toml");
    fs::write(&path, "config-version = 7\nmax-pages = 1\n").expect("Failed to write file");

    let file = ConfigFile::<ShopSettings>::new(&path, migrations()).expect("Failed to open file");
    let mut settings = ShopSettings::default();
    let error = file.load(&mut settings).expect_err("Version 7 is unknown");

    assert!(matches!(
        error,
        Error::Load(ConfigLoadError::VersionOutOfRange {
            version: 7,
            latest: 2
        })
    ));
    assert_eq!(settings, ShopSettings::default());
}

#[derive(Debug, Config)]
pub struct BrokenSettings {
    #[config(uncolored)]
    pub amount: f64,
}

#[test]
fn test_schema_errors_surface_on_open() {
    let dir = tempdir().expect("Failed to create temp directory");

    let error = ConfigFile::<BrokenSettings>::new(dir.path().join("broken.toml"), migrations())
        .expect_err("Numbers cannot be uncolored");

    assert!(matches!(error, Error::Schema(_)));
    assert!(!dir.path().join("broken.toml").exists());
}

#[derive(Debug, Default, Config)]
#[config(keys = "snake_case")]
pub struct PriceSettings {
    pub max_price: f64,
    pub min_rating: f32,
    pub allow_trades: Trilean,
}

#[test]
fn test_non_finite_and_undefined_values_survive_save() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("prices.toml");
    let file = ConfigFile::<PriceSettings>::new(&path, ConfigMigrations::default())?;

    let settings = PriceSettings {
        max_price: f64::INFINITY,
        min_rating: f32::NAN,
        allow_trades: Trilean::Undefined,
    };
    file.save(&settings)?;

    let contents = fs::read_to_string(&path)?;
    let document = Document::from_toml_str(&contents)?;
    assert_eq!(document.get("max-price"), Some(&json!("inf")));
    assert_eq!(document.get("min-rating"), Some(&json!("NaN")));
    assert_eq!(document.get("allow-trades"), Some(&json!("undefined")));

    let mut loaded = PriceSettings {
        allow_trades: Trilean::True,
        ..Default::default()
    };
    assert!(file.load(&mut loaded)?.is_clean());
    assert_eq!(loaded.max_price, f64::INFINITY);
    assert!(loaded.min_rating.is_nan());
    assert_eq!(loaded.allow_trades, Trilean::Undefined);
    Ok(())
}
