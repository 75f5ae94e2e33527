//! Typed settings schemas with a recoverable load protocol and versioned
//! document migrations.
//!
//! A settings struct derives [`Config`]. Its [`Schema`] binds every setting
//! field to a config key and a [`ValueType`](value::ValueType), loads it from
//! a [`Document`] while isolating malformed entries, and writes it back.
//! [`ConfigMigrations`] brings older documents up to date before loading,
//! and [`ConfigFile`] runs the whole pipeline against a TOML file.

extern crate self as settings_schema;

pub mod atomic;
pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod field;
pub mod file;
pub mod key;
pub mod migration;
pub mod schema;
pub mod setting;
pub mod value;

pub use config::{Config, LoadReport};
pub use data::ConfigData;
pub use document::Document;
pub use error::Error;
pub use field::{FieldType, SettingEnum, SettingType};
pub use file::ConfigFile;
pub use migration::{ConfigMigrations, Migration, RegisteredMigration, VERSION_KEY};
pub use schema::{FieldInfo, Schema, SchemaBuilder, ValueTypeSource};
pub use setting::Setting;
pub use value::{AnyValueType, LoadOutcome, ValueType};

// re-export derive macros
pub use settings_schema_macros::{Config, SettingEnum};

#[doc(hidden)]
pub use inventory;
