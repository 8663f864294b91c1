/// Configuration for the Tasklane backend.
/// Reads board.json from ~/.config/tasklane/board.json (or platform equivalent),
/// or from the path in `TASKLANE_CONFIG`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tasklane_core::config::StoreConfig;

pub const CONFIG_PATH_ENV: &str = "TASKLANE_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    /// Where slot files live. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub store: StoreConfig,
    /// Keep the board in memory only.
    #[serde(default)]
    pub ephemeral: bool,
}

impl BackendConfig {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tasklane")
        })
    }
}

/// Default config path: $TASKLANE_CONFIG, else ~/.config/tasklane/board.json
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklane")
        .join("board.json")
}

/// Load config from path. Returns defaults if the file doesn't exist or doesn't parse.
pub fn load_config(path: &Path) -> BackendConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            BackendConfig::default()
        }),
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            BackendConfig::default()
        }
    }
}
