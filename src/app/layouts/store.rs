use std::fmt::Display;
use std::path::{Path, PathBuf};

use super::ini::{format_sections, parse_sections, write_atomically};
use super::layout_config::{
    LayoutConfig, RawSections, WindowSettings, ALWAYS_ON_TOP_KEY, POSITION_KEY, SIZE_KEY, TITLEBAR_KEY,
};
use super::repair::validate_and_repair;
use super::settings::UiSettings;
use crate::app::title::{normalize_for_match, sanitize_for_display};

const CONFIG_PREFIX: &str = "config_";
const CONFIG_EXT: &str = ".ini";

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    Io { op: &'static str, path: PathBuf, message: String },
    MissingDir(PathBuf),
    NotFound(PathBuf),
    InvalidName(String),
}

impl StoreError {
    pub fn io(op: &'static str, path: &Path, err: impl Display) -> StoreError {
        StoreError::Io {
            op,
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn get_log_level(&self) -> log::Level {
        match self {
            StoreError::NotFound(_) | StoreError::InvalidName(_) => log::Level::Warn,
            _ => log::Level::Error,
        }
    }

    pub fn get_info(&self) -> String {
        match self {
            StoreError::Io { op, path, message } => format!("{op} '{}' failed: {message}", path.display()),
            StoreError::MissingDir(path) => format!("directory '{}' does not exist", path.display()),
            StoreError::NotFound(path) => format!("'{}' not found", path.display()),
            StoreError::InvalidName(name) => format!("invalid config name '{name}'"),
        }
    }
}

/// One layout file found in the configs directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    /// File name, e.g. `config_Work.ini`
    pub file_key: String,
    /// Name shown to the user, e.g. `Work`
    pub name: String,
}

/// File-backed storage of named layouts and of the UI settings.
///
/// Public operations never fail: errors are logged and turned into empty/default results.
pub struct LayoutConfigStore {
    configs_dir: PathBuf,
    settings_file: PathBuf,
}

impl LayoutConfigStore {
    pub fn new(configs_dir: impl Into<PathBuf>, settings_file: impl Into<PathBuf>) -> LayoutConfigStore {
        LayoutConfigStore {
            configs_dir: configs_dir.into(),
            settings_file: settings_file.into(),
        }
    }

    pub fn configs_dir(&self) -> &Path {
        &self.configs_dir
    }

    pub fn ensure_configs_dir(&self) -> bool {
        if self.configs_dir.is_dir() {
            return true;
        }

        match std::fs::create_dir_all(&self.configs_dir) {
            Ok(_) => {
                log::info!("Created config directory: {}", self.configs_dir.display());
                true
            }
            Err(e) => log_error(&StoreError::io("create_dir", &self.configs_dir, e), false),
        }
    }

    pub fn file_key_for(name: &str) -> String {
        format!("{CONFIG_PREFIX}{name}{CONFIG_EXT}")
    }

    pub fn list_configs(&self) -> Vec<ConfigEntry> {
        let dir = match std::fs::read_dir(&self.configs_dir) {
            Ok(dir) => dir,
            Err(e) => return log_error(&StoreError::io("read_dir", &self.configs_dir, e), vec![]),
        };

        let mut entries: Vec<ConfigEntry> = dir
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter_map(|file_key| {
                let name = file_key.strip_prefix(CONFIG_PREFIX)?.strip_suffix(CONFIG_EXT)?.to_string();
                Some(ConfigEntry { file_key, name })
            })
            .collect();

        entries.sort_by(|a, b| a.file_key.cmp(&b.file_key));
        entries
    }

    pub fn load_config(&self, file_key: &str) -> Option<LayoutConfig> {
        self.read_config(file_key)
            .inspect_err(|e| log::log!(e.get_log_level(), "Can't load config: {}", e.get_info()))
            .ok()
    }

    pub fn load_config_by_name(&self, name: &str) -> Option<LayoutConfig> {
        self.load_config(&Self::file_key_for(name))
    }

    fn read_config(&self, file_key: &str) -> Result<LayoutConfig, StoreError> {
        if file_key.contains(['/', '\\']) || file_key == ".." {
            return Err(StoreError::InvalidName(file_key.to_string()));
        }

        let path = self.configs_dir.join(file_key);
        if !path.is_file() {
            return Err(StoreError::NotFound(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| StoreError::io("read", &path, e))?;
        let raw = parse_sections(&content, &path.display().to_string());
        Ok(validate_and_repair(&raw))
    }

    /// Saves the given live windows (`title -> settings`) as the layout `name`.
    ///
    /// Sections are sorted left to right by x position. Returns false if nothing could be written.
    pub fn save_config(&self, name: &str, windows: &[(String, WindowSettings)]) -> bool {
        match self.write_config(name, windows) {
            Ok(path) => {
                log::info!("Config saved to {}", path.display());
                true
            }
            Err(e) => log_error(&e, false),
        }
    }

    fn write_config(&self, name: &str, windows: &[(String, WindowSettings)]) -> Result<PathBuf, StoreError> {
        let config_name = sanitize_for_display(name);
        if config_name.is_empty() {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        log::info!("Saving config '{}' with {} windows", config_name, windows.len());

        let mut entries: Vec<(i32, String, &WindowSettings)> = windows
            .iter()
            .filter(|(title, _)| !title.trim().is_empty())
            .filter_map(|(title, settings)| {
                let section = match settings.name.as_deref().map(str::trim) {
                    Some(n) if !n.is_empty() => sanitize_for_display(n),
                    _ => sanitize_for_display(title),
                };
                if normalize_for_match(&section).is_empty() {
                    log::warn!("Skipping window '{}': empty name after sanitizing", title);
                    return None;
                }
                Some((position_x(settings.position.as_deref()), section, settings))
            })
            .collect();

        entries.sort_by_key(|(x, _, _)| *x);

        let mut raw = RawSections::new();
        for (_, section, settings) in entries {
            raw.set(&section, POSITION_KEY, settings.position.as_deref().unwrap_or("0,0"));
            raw.set(&section, SIZE_KEY, settings.size.as_deref().unwrap_or("100,100"));
            raw.set(&section, ALWAYS_ON_TOP_KEY, &settings.always_on_top.unwrap_or(false).to_string());
            raw.set(&section, TITLEBAR_KEY, &settings.titlebar.unwrap_or(true).to_string());
        }

        let repaired = validate_and_repair(&raw);

        if !self.configs_dir.is_dir() {
            return Err(StoreError::MissingDir(self.configs_dir.clone()));
        }

        let path = self.configs_dir.join(Self::file_key_for(&config_name));
        write_atomically(&path, &format_sections(&repaired.to_sections()))?;
        Ok(path)
    }

    /// Returns true only if the file existed and has been removed.
    pub fn delete_config(&self, name: &str) -> bool {
        let path = self.configs_dir.join(Self::file_key_for(name));
        if name.contains(['/', '\\']) || !path.is_file() {
            log::warn!("Config '{}' not found, nothing to delete", name);
            return false;
        }

        match std::fs::remove_file(&path) {
            Ok(_) => {
                log::info!("Config '{}' deleted", name);
                true
            }
            Err(e) => log_error(&StoreError::io("delete", &path, e), false),
        }
    }

    /// Best guess of the layout in use: the first config with an always-on-top rule matching an open
    /// window, otherwise the first config.
    ///
    /// `window_titles` is called at most once, and only if some config has an always-on-top rule.
    pub fn detect_default_config<F>(&self, window_titles: F) -> Option<String>
    where
        F: FnOnce() -> Vec<String>,
    {
        let configs = self.list_configs();
        let mut window_titles = Some(window_titles);
        let mut open_titles: Option<Vec<String>> = None;

        for entry in configs.iter() {
            let Some(config) = self.load_config(&entry.file_key) else {
                continue;
            };

            for rule in config.rules.iter().filter(|r| r.is_always_on_top()) {
                let key = rule.match_key();
                if key.is_empty() {
                    continue;
                }

                if open_titles.is_none() {
                    let titles = window_titles.take().map(|f| f()).unwrap_or_default();
                    open_titles = Some(titles.iter().map(|t| normalize_for_match(t)).collect());
                }

                if open_titles.iter().flatten().any(|t| t.contains(&key)) {
                    log::debug!("Default config '{}' detected from window '{}'", entry.name, rule.name);
                    return Some(entry.name.clone());
                }
            }
        }

        configs.first().map(|e| e.name.clone())
    }

    pub fn load_settings(&self) -> UiSettings {
        UiSettings::load(&self.settings_file)
    }

    pub fn save_settings(&self, settings: &UiSettings) -> bool {
        settings.save(&self.settings_file)
    }
}

fn position_x(position: Option<&str>) -> i32 {
    position
        .and_then(|p| p.split(',').next())
        .and_then(|x| x.trim().parse().ok())
        .unwrap_or(0)
}

fn log_error<T>(err: &StoreError, fallback: T) -> T {
    log::log!(err.get_log_level(), "{}", err.get_info());
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::layouts::layout_config::WindowRule;

    fn store(dir: &Path) -> LayoutConfigStore {
        LayoutConfigStore::new(dir.join("configs"), dir.join("settings.json"))
    }

    fn settings(position: &str, size: &str, aot: bool, titlebar: bool) -> WindowSettings {
        WindowSettings {
            position: Some(position.to_string()),
            size: Some(size.to_string()),
            always_on_top: Some(aot),
            titlebar: Some(titlebar),
            name: None,
        }
    }

    fn write(dir: &Path, file: &str, content: &str) {
        std::fs::create_dir_all(dir.join("configs")).unwrap();
        std::fs::write(dir.join("configs").join(file), content).unwrap();
    }

    #[test]
    fn test_list_configs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config_Work.ini", "[A]\nsize = 1,1\n");
        write(dir.path(), "config_Play.ini", "[B]\nsize = 1,1\n");
        write(dir.path(), "notes.txt", "");
        write(dir.path(), "config_Old.bak", "");

        let entries = store(dir.path()).list_configs();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Play", "Work"]);
        assert_eq!(entries[0].file_key, "config_Play.ini");
    }

    #[test]
    fn test_list_configs_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(dir.path()).list_configs().is_empty());
    }

    #[test]
    fn test_load_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert!(store.ensure_configs_dir());
        assert_eq!(store.load_config("config_Nope.ini"), None);
        assert_eq!(store.load_config("../settings.json"), None);
    }

    #[test]
    fn test_load_config_repairs() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "config_Bad.ini",
            "[Terminal]\nposition = (1, 2)\nsize = 0,10\nalways_on_top = yes\n\n[DEFAULT]\nsize = 1,1\n",
        );

        let config = store(dir.path()).load_config("config_Bad.ini").unwrap();
        assert_eq!(config.len(), 1);
        let rule = config.get("Terminal").unwrap();
        assert_eq!(rule.position, Some((0, 0)));
        assert_eq!(rule.size, Some((100, 100)));
        assert_eq!(rule.always_on_top, Some(false));
        assert_eq!(rule.titlebar, None);
    }

    #[test]
    fn test_save_config_sorts_and_sanitizes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_configs_dir();

        let mut named = settings("10,0", "300,300", false, true);
        named.name = Some("My Notes".to_string());
        let windows = vec![
            ("Inbox - Mail (3 unread)".to_string(), settings("1920,0", "800,600", true, false)),
            ("   ".to_string(), settings("0,0", "1,1", false, true)),
            ("notes.txt - Notepad".to_string(), named),
            ("PowerShell".to_string(), settings("-1280,0", "1280,1024", false, true)),
        ];

        assert!(store.save_config("work setup", &windows));

        let entries = store.list_configs();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_key, "config_Work Setup.ini");

        let config = store.load_config(&entries[0].file_key).unwrap();
        let names: Vec<&str> = config.names().collect();
        assert_eq!(names, vec!["Powershell", "My Notes", "Mail"]);
        let mail = config.get("Mail").unwrap();
        assert_eq!(mail.position, Some((1920, 0)));
        assert_eq!(mail.always_on_top, Some(true));
        assert_eq!(mail.titlebar, Some(false));
    }

    #[test]
    fn test_save_config_defaults_and_bad_x() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_configs_dir();

        let windows = vec![
            ("Second".to_string(), settings("50,0", "10,10", false, true)),
            ("First".to_string(), WindowSettings::default()),
            ("Broken".to_string(), settings("abc", "xyz", false, true)),
        ];
        assert!(store.save_config("Mixed", &windows));

        let config = store.load_config_by_name("Mixed").unwrap();
        let names: Vec<&str> = config.names().collect();
        assert_eq!(names, vec!["First", "Broken", "Second"]);
        assert_eq!(config.get("First").unwrap().size, Some((100, 100)));
        assert_eq!(config.get("Broken").unwrap().position, Some((0, 0)));
        assert_eq!(config.get("Broken").unwrap().size, Some((100, 100)));
    }

    #[test]
    fn test_save_config_failures() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let windows = vec![("App".to_string(), WindowSettings::default())];
        assert!(!store.save_config("NoDir", &windows));
        store.ensure_configs_dir();
        assert!(!store.save_config("  ", &windows));
        assert!(!store.save_config("(only parens)", &windows));
    }

    #[test]
    fn test_save_config_sanitizes_name_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_configs_dir();

        let mut left = settings("0,0", "800,600", false, true);
        left.name = Some("Left\n[Right]".to_string());
        let mut mail = settings("800,0", "800,600", false, true);
        mail.name = Some("Mail: draft?".to_string());
        let windows = vec![("Editor".to_string(), left), ("Inbox - Mail".to_string(), mail)];

        assert!(store.save_config("Overrides", &windows));

        let content = std::fs::read_to_string(dir.path().join("configs").join("config_Overrides.ini")).unwrap();
        assert!(!content.contains('?'));
        assert!(!content.contains(':'));

        let config = store.load_config("config_Overrides.ini").unwrap();
        let names: Vec<&str> = config.names().collect();
        assert_eq!(names, vec!["Leftright", "Mail Draft"]);
        assert_eq!(config.get("Leftright").unwrap().size, Some((800, 600)));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_configs_dir();

        let expected = LayoutConfig::new(vec![
            WindowRule::new("Left")
                .with_position(-1920, 0)
                .with_size(1920, 1080)
                .with_always_on_top(false)
                .with_titlebar(true),
            WindowRule::new("Right")
                .with_position(0, 0)
                .with_size(1920, 1040)
                .with_always_on_top(true)
                .with_titlebar(false),
        ]);

        let windows: Vec<(String, WindowSettings)> = expected
            .rules
            .iter()
            .rev()
            .map(|r| {
                let (x, y) = r.position.unwrap();
                let (w, h) = r.size.unwrap();
                let mut s = settings(&format!("{x},{y}"), &format!("{w},{h}"), r.is_always_on_top(), r.has_titlebar());
                s.name = Some(r.name.clone());
                (r.name.clone(), s)
            })
            .collect();

        assert!(store.save_config("Round", &windows));
        assert_eq!(store.load_config("config_Round.ini"), Some(expected));
    }

    #[test]
    fn test_delete_config() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config_Work.ini", "[A]\nsize = 1,1\n");
        let store = store(dir.path());

        assert!(!store.delete_config("nonexistent"));
        assert!(store.delete_config("Work"));
        assert!(store.list_configs().is_empty());
        assert!(!store.delete_config("Work"));
    }

    #[test]
    fn test_detect_default_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config_Work.ini", "[Terminal]\nalways_on_top = true\n");
        write(dir.path(), "config_Play.ini", "[Browser]\nalways_on_top = false\n");

        let detected = store(dir.path()).detect_default_config(|| vec!["Browser".to_string()]);
        assert_eq!(detected, Some("Play".to_string()));
    }

    #[test]
    fn test_detect_default_by_topmost_window() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config_Work.ini", "[Terminal]\nalways_on_top = true\n");
        write(dir.path(), "config_Play.ini", "[Browser]\nalways_on_top = false\n");

        let detected =
            store(dir.path()).detect_default_config(|| vec!["Windows\u{200b} Terminal - Admin".to_string()]);
        assert_eq!(detected, Some("Work".to_string()));
    }

    #[test]
    fn test_detect_default_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store(dir.path()).detect_default_config(Vec::new), None);
    }

    #[test]
    fn test_detect_default_lists_titles_lazily() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config_Play.ini", "[Browser]\nalways_on_top = false\n");

        let detected = store(dir.path()).detect_default_config(|| panic!("titles must not be queried"));
        assert_eq!(detected, Some("Play".to_string()));
    }
}
