use super::deserializers;
use serde::Deserialize;
use serde::Serialize;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct General {
    #[serde(deserialize_with = "deserializers::to_relative_path")]
    pub configs_dir: String,
    #[serde(deserialize_with = "deserializers::to_relative_path")]
    pub settings_file: String,
    #[serde(deserialize_with = "deserializers::to_relative_path")]
    pub presets_file: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            configs_dir: "configs".to_string(),
            settings_file: "settings.json".to_string(),
            presets_file: "layout_presets.ini".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Selection {
    #[serde(deserialize_with = "deserializers::to_u32_minmax::<10,1000,_>")]
    pub poll_interval_ms: u32,
    pub timeout_secs: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            poll_interval_ms: 50,
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Windows {
    #[serde(deserialize_with = "deserializers::to_titles_list")]
    pub ignored_titles: Vec<String>,
}

impl Default for Windows {
    fn default() -> Self {
        let ignored_titles = [
            "Window Manager",
            "Program Manager",
            "Windows Input Experience",
            "Microsoft Text Input Application",
            "Settings",
            "Windows Shell Experience Host",
        ];
        Windows {
            ignored_titles: ignored_titles.iter().map(|t| t.to_string()).collect(),
        }
    }
}
