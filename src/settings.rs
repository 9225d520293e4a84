//! User-facing overlay settings with JSON persistence.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlaySettings {
    pub show_labels: bool,
    pub show_colors: bool,
    pub show_legend: bool,
    /// Directory of relation style definition files, relative to the host's
    /// data root.
    pub relation_dir: String,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_labels: true,
            show_colors: true,
            show_legend: true,
            relation_dir: "relations".to_string(),
        }
    }
}

impl OverlaySettings {
    /// Load settings from a JSON file; a missing file yields the defaults.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Read settings file {path}"))?;
        serde_json::from_str(&text).with_context(|| format!("Parse settings file {path}"))
    }

    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Serialize settings")?;
        std::fs::write(path, text).with_context(|| format!("Write settings file {path}"))
    }
}
