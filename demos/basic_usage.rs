use settings_schema::{Config, ConfigFile, ConfigMigrations, SettingEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, SettingEnum)]
enum ShopType {
    Admin,
    Selling,
    Buying,
}

/// Settings shared by every shop plugin.
#[derive(Debug, Config)]
#[config(keys = "snake_case")]
struct CommonSettings {
    pub debug: bool,
    pub language: String,
}

#[derive(Debug, Config)]
#[config(keys = "snake_case", log_prefix = "Shop config: ")]
struct ShopSettings {
    pub max_shops_per_player: i32,
    pub default_shop_type: ShopType,
    #[config(colored)]
    pub shop_name: String,
    #[config(colored)]
    pub sign_lines: Vec<String>,
    pub tax_rate: f64,
    #[config(parent)]
    pub common: CommonSettings,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            max_shops_per_player: 3,
            default_shop_type: ShopType::Selling,
            shop_name: "&aShop".to_owned(),
            sign_lines: vec!["&9[Shop]".to_owned(), "&7Click me".to_owned()],
            tax_rate: 0.05,
            common: CommonSettings {
                debug: false,
                language: "en-default".to_owned(),
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("shop.toml");

    let file = ConfigFile::<ShopSettings>::new(&path, ConfigMigrations::default())?;
    println!("Config file: {}", file.path().display());
    for setting in file.schema().settings() {
        println!(
            "  {} ({:?}, {})",
            setting.key(),
            setting.value_type_source(),
            setting.value_type().implementation_name()
        );
    }

    // The file doesn't exist yet, so it is written from the current values.
    let mut settings = ShopSettings::default();
    file.load(&mut settings)?;
    println!("\nInitial file:\n{}", std::fs::read_to_string(&path)?);
    println!("Loaded: {settings:#?}");

    // Edit the file by hand, including an entry that fails to load.
    std::fs::write(
        &path,
        r#"
config-version = 0
max-shops-per-player = "lots"
default-shop-type = "buying"
shop-name = "&cRed shop"
sign-lines = ["&9[Shop]"]
tax-rate = 0.1
debug = true
language = "de"
"#,
    )?;

    let report = file.load(&mut settings)?;
    for warning in report.warnings() {
        println!("Warning: {}{warning}", report.prefix());
    }
    println!("Reloaded: {settings:#?}");

    // Change a value in memory and through its text form, then persist.
    let schema = file.schema();
    if let Some(setting) = schema.setting("max-shops-per-player") {
        setting.parse_value(&mut settings, "10")?;
        println!("max-shops-per-player = {}", setting.format(&settings));
    }
    file.save(&settings)?;
    println!("\nSaved file:\n{}", std::fs::read_to_string(&path)?);

    Ok(())
}
