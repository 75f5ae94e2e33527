use serde_json::Value;

use crate::document::Document;

/// A document to load settings from, plus an optional defaults document
/// consulted for entries the primary document lacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigData {
    document: Document,
    defaults: Option<Document>,
}

impl ConfigData {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            defaults: None,
        }
    }

    pub fn with_defaults(document: Document, defaults: Document) -> Self {
        Self {
            document,
            defaults: Some(defaults),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn defaults(&self) -> Option<&Document> {
        self.defaults.as_ref()
    }

    pub fn set_defaults(&mut self, defaults: Option<Document>) {
        self.defaults = defaults;
    }

    /// Whether the primary document has a value at `key`. Defaults are not
    /// consulted.
    pub fn contains(&self, key: &str) -> bool {
        self.document.contains(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// The value at `key`, falling back to the defaults document.
    pub fn get_or_default(&self, key: &str) -> Option<&Value> {
        self.document
            .get(key)
            .or_else(|| self.defaults.as_ref()?.get(key))
    }

    /// Borrows the primary document mutably alongside the defaults.
    pub fn parts_mut(&mut self) -> (&mut Document, Option<&Document>) {
        (&mut self.document, self.defaults.as_ref())
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

impl From<Document> for ConfigData {
    fn from(document: Document) -> Self {
        Self::new(document)
    }
}
