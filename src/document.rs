//! The persisted document a schema loads from and saves to.
//!
//! A [`Document`] is an ordered map of keys to JSON-like values, where values
//! may themselves be nested sections. Every accessor takes a *path*: `.`
//! separates nested sections, so `"shop.max-pages"` addresses the `max-pages`
//! entry of the `shop` section.
//!
//! Insertion order is preserved (including across removals), which keeps the
//! order of settings stable when a document is written back to disk.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Separates nested section names inside a key path.
pub const PATH_SEPARATOR: char = '.';

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Top-level keys, in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// Returns the value at `path`. `null` values are treated as absent.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut section = &self.root;
        let mut rest = path;
        while let Some((name, tail)) = rest.split_once(PATH_SEPARATOR) {
            section = section.get(name)?.as_object()?;
            rest = tail;
        }
        section.get(rest).filter(|value| !value.is_null())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Stores `value` at `path`, creating (or replacing non-section values
    /// with) the sections along the way.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        set_in(&mut self.root, path, value.into());
    }

    /// Removes and returns the value at `path`. Remaining keys keep their order.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        remove_in(&mut self.root, path)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, Error> {
        let root: Map<String, Value> = toml::from_str(input)?;
        Ok(Self { root })
    }

    pub fn to_toml_string(&self) -> Result<String, Error> {
        Ok(toml::to_string_pretty(&self.root)?)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(root: Map<String, Value>) -> Self {
        Self::from_map(root)
    }
}

fn set_in(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once(PATH_SEPARATOR) {
        None => {
            map.insert(path.to_owned(), value);
        }
        Some((name, rest)) => match map.entry(name).or_insert_with(|| Value::Object(Map::new())) {
            Value::Object(section) => set_in(section, rest, value),
            other => {
                let mut section = Map::new();
                set_in(&mut section, rest, value);
                *other = Value::Object(section);
            }
        },
    }
}

fn remove_in(map: &mut Map<String, Value>, path: &str) -> Option<Value> {
    match path.split_once(PATH_SEPARATOR) {
        None => map.shift_remove(path),
        Some((name, rest)) => remove_in(map.get_mut(name)?.as_object_mut()?, rest),
    }
}
