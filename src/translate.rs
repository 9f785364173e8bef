use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ir::Quality;

/// Localized system text (`STRINGS`) and quality labels (`QUALITY`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Translations {
    #[serde(default)]
    pub strings: HashMap<String, String>,
    #[serde(default)]
    pub quality: Vec<String>,
}

impl Translations {
    pub fn new(strings: HashMap<String, String>, quality: Vec<String>) -> Self {
        Self { strings, quality }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            strings: pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            quality: Vec::new(),
        }
    }

    pub fn with_quality(mut self, quality: Vec<String>) -> Self {
        self.quality = quality;
        self
    }

    /// Translated text for `key`, or the key itself when untranslated.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Label for a quality assessment, `None` for missing ancestors or when
    /// the host supplied no label for the code.
    pub fn quality_label(&self, quality: Quality) -> Option<&str> {
        match quality {
            Quality::Collapse => Some(self.get("Pedigree Collapse")),
            Quality::Missing => None,
            Quality::Rated(code) => self.quality.get(code as usize).map(String::as_str),
        }
    }
}
