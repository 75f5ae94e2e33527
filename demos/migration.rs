use serde_json::json;
use settings_schema::{
    Config, ConfigFile, ConfigMigrations, Document, Migration,
    error::MigrationError,
    migration::{migrate_setting, migrate_value, remove_setting},
    submit_migration,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Config)]
#[config(keys = "snake_case")]
struct ShopSettings {
    pub max_pages: i32,
    pub language: String,
    pub enable_spawner_shops: bool,
}

/// Version 1 moved `max-pages` out of the `shop` section.
struct FlattenShopSection;

impl Migration for FlattenShopSection {
    const FROM: u32 = 0;

    fn migrate(document: &mut Document) -> Result<(), MigrationError> {
        migrate_setting(document, "shop.max-pages", "max-pages");
        remove_setting(document, "shop");
        Ok(())
    }
}

/// Version 2 renamed the default language and the spawner shop toggle.
struct RenameLanguage;

impl Migration for RenameLanguage {
    const FROM: u32 = 1;

    fn migrate(document: &mut Document) -> Result<(), MigrationError> {
        migrate_value(document, "language", &json!("en"), "en-default");
        migrate_setting(document, "spawner-shops", "enable-spawner-shops");
        Ok(())
    }
}

submit_migration!(ShopSettings, FlattenShopSection);
submit_migration!(ShopSettings, RenameLanguage);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("shop.toml");

    // A file written before versioning was introduced.
    std::fs::write(
        &path,
        r#"
language = "en"
spawner-shops = true

[shop]
max-pages = 4
"#,
    )?;

    let migrations = ConfigMigrations::registered::<ShopSettings>()?;
    println!("Latest config version: {}", migrations.latest_version());

    let file = ConfigFile::<ShopSettings>::new(&path, migrations)?;
    let mut settings = ShopSettings::default();
    let report = file.load(&mut settings)?;

    for warning in report.warnings() {
        println!("Warning: {warning}");
    }
    println!("Loaded: {settings:#?}");
    println!("\nMigrated file:\n{}", std::fs::read_to_string(&path)?);

    Ok(())
}
