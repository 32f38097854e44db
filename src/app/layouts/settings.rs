use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persistent UI toggles, stored as a flat JSON object.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct UiSettings {
    pub compact: bool,
    pub use_images: bool,
}

impl UiSettings {
    /// Reads the settings file, falling back to defaults on any error.
    pub fn load(path: &Path) -> UiSettings {
        if !path.exists() {
            return UiSettings::default();
        }

        std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str::<UiSettings>(&s).map_err(|e| e.to_string()))
            .inspect_err(|e| log::error!("Can't read settings file {}: {}", path.display(), e))
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> bool {
        let content = match serde_json::to_string(self) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Can't serialize settings: {}", e);
                return false;
            }
        };

        std::fs::write(path, content)
            .inspect_err(|e| log::error!("Can't write settings file {}: {}", path.display(), e))
            .is_ok()
    }
}
