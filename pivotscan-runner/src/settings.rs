//! Scan settings — the optional TOML file behind the CLI flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_benchmark() -> String {
    "0050.TW".into()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Persistent settings. Every field has a default so the file is optional;
/// CLI flags override whatever is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    #[serde(default = "default_benchmark")]
    pub benchmark: String,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Universe TOML path. None falls back to the built-in sample universe.
    #[serde(default)]
    pub universe: Option<PathBuf>,

    /// Portfolio TOML path. None means no health-check section.
    #[serde(default)]
    pub portfolio: Option<PathBuf>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            benchmark: default_benchmark(),
            cache_dir: default_cache_dir(),
            universe: None,
            portfolio: None,
        }
    }
}

impl ScanSettings {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read settings file: {e}"))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse settings TOML: {e}"))
    }
}
