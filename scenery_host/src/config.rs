use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Module settings, stored as JSON next to the world data.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    /// Show a variation count next to scenes in the scene directory.
    pub show_variations_label: bool,
    /// JSON string table overriding the built-in English strings.
    pub lang: Option<PathBuf>,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self {
            show_variations_label: true,
            lang: None,
        }
    }
}

impl SceneryConfig {
    /// Reads `path` if it exists; a missing file yields the defaults.
    ///
    /// A relative `lang` path is resolved against the config file's directory.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(SceneryConfig::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenery config: {}", path.display()))?;
        let mut config: SceneryConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse scenery config: {}", path.display()))?;
        if let (Some(lang), Some(parent)) = (config.lang.as_ref(), path.parent()) {
            if lang.is_relative() {
                config.lang = Some(parent.join(lang));
            }
        }
        Ok(config)
    }
}
