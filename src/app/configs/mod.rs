pub(crate) mod deserializers;
pub(crate) mod general;

use general::General;
use general::Selection;
use general::Windows;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use super::assets::Asset;

pub const APP_CONFIG_FILE: &str = "winplacer.toml";
pub const DEFAULT_CONFIG_ASSET: &str = "configs/winplacer.toml";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: General,
    pub selection: Selection,
    pub windows: Windows,
}

impl AppConfig {
    /// Reads `winplacer.toml` from `base_dir`, writing the default one first if it does not exist.
    pub fn load(base_dir: &Path) -> Result<AppConfig, String> {
        let cfg_file = base_dir.join(APP_CONFIG_FILE);

        if !cfg_file.exists() {
            std::fs::create_dir_all(base_dir).map_err(|e| e.to_string())?;
            let default_cfg = Asset::get_string(DEFAULT_CONFIG_ASSET).map_err(|e| e.to_string())?;
            std::fs::write(&cfg_file, default_cfg).map_err(|e| e.to_string())?;
            log::info!("Created default config file: {}", cfg_file.display());
        }

        let file_content = std::fs::read_to_string(&cfg_file).map_err(|e| e.to_string())?;
        toml::from_str::<AppConfig>(&file_content).map_err(|e| e.to_string())
    }

    pub fn configs_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.general.configs_dir)
    }

    pub fn settings_file(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.general.settings_file)
    }

    pub fn presets_file(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.general.presets_file)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.selection.poll_interval_ms as u64)
    }

    pub fn selection_timeout(&self) -> Option<Duration> {
        match self.selection.timeout_secs {
            0 => None,
            s => Some(Duration::from_secs(s as u64)),
        }
    }
}
