use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub const APP_NAME: &str = "SCENERY.APP_NAME";
pub const DEFAULT: &str = "SCENERY.DEFAULT";
pub const ERROR_SELECTION: &str = "SCENERY.ERROR_SELECTION";
pub const ERROR_PARTIAL_SAVE: &str = "SCENERY.ERROR_PARTIAL_SAVE";
pub const ERROR_SCAN: &str = "SCENERY.ERROR_SCAN";
pub const LOADING: &str = "SCENERY.LOADING";
pub const SCAN_FOUND: &str = "SCENERY.SCAN_FOUND";

const ENGLISH: &[(&str, &str)] = &[
    (APP_NAME, "Scenery"),
    (DEFAULT, "Default"),
    (
        ERROR_SELECTION,
        "Select a variation with an image for both the GM and the players.",
    ),
    (
        ERROR_PARTIAL_SAVE,
        "The background of {scene} was changed, but its variations could not be saved.",
    ),
    (ERROR_SCAN, "Could not scan {path} for variations."),
    (LOADING, "Loading scene background"),
    (SCAN_FOUND, "Found {count} new variation(s)."),
];

/// Localized string table. Unknown keys come back unchanged.
#[derive(Debug, Clone)]
pub struct Localizer {
    strings: HashMap<String, String>,
}

impl Default for Localizer {
    fn default() -> Self {
        Self {
            strings: ENGLISH
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl Localizer {
    /// English strings overlaid with the flat `{"KEY": "text"}` table at `path`.
    pub fn from_json_file(path: Option<&Path>) -> Result<Self> {
        let mut localizer = Localizer::default();
        if let Some(path) = path {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read language file: {}", path.display()))?;
            let table: HashMap<String, String> = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse language file: {}", path.display()))?;
            localizer.strings.extend(table);
        }
        Ok(localizer)
    }

    pub fn localize(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Localizes `key` and substitutes `{name}` placeholders.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.localize(key), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}
