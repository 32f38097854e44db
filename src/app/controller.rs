use crate::app::layouts::layout_config::{LayoutConfig, WinHandle, WindowSettings};
use crate::app::layouts::presets::AutoAlignPresets;
use crate::app::layouts::settings::UiSettings;
use crate::app::layouts::store::{ConfigEntry, LayoutConfigStore};
use crate::app::structs::area::Area;
use crate::app::window_state::manager::{MatchResult, WindowStateManager};
use crate::app::window_state::platform::WindowPlatform;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    pub failed: Vec<String>,
    pub missing: Vec<String>,
    pub status: String,
}

/// A rule of a layout, as it would be drawn on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewEntry {
    pub name: String,
    pub area: Option<Area>,
    pub always_on_top: bool,
    pub window_exists: bool,
}

/// Glue between the stored layouts and the live windows.
pub struct ApplicationController<P: WindowPlatform> {
    store: LayoutConfigStore,
    manager: WindowStateManager<P>,
    presets: AutoAlignPresets,
}

impl<P: WindowPlatform> ApplicationController<P> {
    pub fn new(
        store: LayoutConfigStore,
        manager: WindowStateManager<P>,
        presets: AutoAlignPresets,
    ) -> ApplicationController<P> {
        ApplicationController {
            store,
            manager,
            presets,
        }
    }

    pub fn store(&self) -> &LayoutConfigStore {
        &self.store
    }

    pub fn manager(&self) -> &WindowStateManager<P> {
        &self.manager
    }

    pub fn list(&self) -> Vec<ConfigEntry> {
        self.store.list_configs()
    }

    pub fn default_config(&self) -> Option<String> {
        self.store.detect_default_config(|| self.manager.get_all_window_titles())
    }

    pub fn load(&self, name: &str) -> Option<LayoutConfig> {
        self.store.load_config_by_name(name)
    }

    pub fn find_matches(&self, config: &LayoutConfig) -> MatchResult {
        self.manager.find_matching_windows(config)
    }

    pub fn preview(&self, name: &str) -> Option<Vec<PreviewEntry>> {
        let config = self.load(name)?;
        let missing = self.find_matches(&config).missing;

        let entries = config
            .rules
            .iter()
            .map(|rule| PreviewEntry {
                name: rule.name.clone(),
                area: rule.position.zip(rule.size).map(|((x, y), (w, h))| Area::new(x, y, w, h)),
                always_on_top: rule.is_always_on_top(),
                window_exists: !missing.contains(&rule.name),
            })
            .collect();
        Some(entries)
    }

    /// Releases the windows managed so far, then applies the layout `name` to the open windows.
    pub fn apply_config(&mut self, name: &str) -> Option<ApplyReport> {
        let config = self.load(name)?;
        let matches = self.find_matches(&config);

        let restored = self.manager.reset_all_windows();
        log::debug!("{} windows restored before applying '{}'", restored, name);

        let mut report = ApplyReport {
            missing: matches.missing,
            ..Default::default()
        };

        for m in matches.matches.iter() {
            let Some(rule) = config.get(&m.rule_name) else {
                continue;
            };

            match self.manager.apply_window_config(rule, m.handle) {
                true => report.applied.push(m.rule_name.clone()),
                false => report.failed.push(m.rule_name.clone()),
            }
        }

        report.status = self.manager.get_always_on_top_status();
        log::info!(
            "Config '{}' applied: {} applied, {} failed, {} missing",
            name,
            report.applied.len(),
            report.failed.len(),
            report.missing.len()
        );
        Some(report)
    }

    pub fn reset(&mut self) -> usize {
        self.manager.reset_all_windows()
    }

    /// Toggles every window made topmost by a layout. Returns the number of windows toggled.
    pub fn toggle_always_on_top(&mut self) -> usize {
        self.manager
            .topmost_windows()
            .into_iter()
            .filter(|h| {
                self.manager
                    .toggle_always_on_top(*h)
                    .inspect_err(|e| log::log!(e.get_log_level(), "Can't toggle window {}: {}", h, e.get_info()))
                    .is_ok()
            })
            .count()
    }

    pub fn always_on_top_status(&self) -> String {
        self.manager.get_always_on_top_status()
    }

    pub fn window_titles(&self) -> Vec<String> {
        self.manager.get_all_window_titles()
    }

    pub fn window_title(&self, handle: WinHandle) -> Option<String> {
        self.manager
            .platform()
            .list_top_level_windows()
            .ok()?
            .into_iter()
            .find(|w| w.handle == handle)
            .map(|w| w.title)
    }

    /// Saves the current state of the windows titled `titles` as the layout `name`.
    pub fn create_config(&self, name: &str, titles: &[String]) -> bool {
        let windows: Vec<(String, WindowSettings)> = titles
            .iter()
            .filter_map(|title| match self.manager.collect_window_settings(title) {
                Some(settings) => Some((title.clone(), settings)),
                None => {
                    log::warn!("Window '{}' not found, not saved in '{}'", title, name);
                    None
                }
            })
            .collect();

        if windows.is_empty() {
            log::error!("No window to save in config '{}'", name);
            return false;
        }

        self.store.ensure_configs_dir() && self.store.save_config(name, &windows)
    }

    pub fn delete_config(&self, name: &str) -> bool {
        self.store.delete_config(name)
    }

    pub fn settings(&self) -> UiSettings {
        self.store.load_settings()
    }

    pub fn update_settings(&self, compact: Option<bool>, use_images: Option<bool>) -> Option<UiSettings> {
        let mut settings = self.store.load_settings();
        settings.compact = compact.unwrap_or(settings.compact);
        settings.use_images = use_images.unwrap_or(settings.use_images);
        self.store.save_settings(&settings).then_some(settings)
    }

    pub fn preset_counts(&self) -> Vec<u8> {
        self.presets.counts().collect()
    }

    /// Areas of the preset for `count` windows, inside `work_area`.
    pub fn preset_areas(&self, count: u8, work_area: &Area) -> Option<Vec<Area>> {
        self.presets.get(count).map(|p| p.resolve(work_area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::window_state::fake_platform::{FakePlatform, FakeWindow};

    fn controller(dir: &tempfile::TempDir, platform: FakePlatform) -> ApplicationController<FakePlatform> {
        let store = LayoutConfigStore::new(dir.path().join("configs"), dir.path().join("settings.json"));
        assert!(store.ensure_configs_dir());
        let manager = WindowStateManager::new(platform, &["Program Manager".to_string()]);
        ApplicationController::new(store, manager, AutoAlignPresets::builtin())
    }

    fn settings(pos: (i32, i32), size: (u32, u32), aot: bool) -> WindowSettings {
        let mut settings = WindowSettings::from_geometry(pos, size);
        settings.always_on_top = Some(aot);
        settings
    }

    #[test]
    fn test_apply_config_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let platform = FakePlatform::new();
        let browser = platform.add(FakeWindow::new("Docs - Firefox", Area::new(100, 100, 300, 300)));
        let terminal = platform.add(FakeWindow::new("Terminal", Area::new(50, 50, 300, 300)));
        let mut app = controller(&dir, platform);

        let windows = vec![
            ("Firefox".to_string(), settings((0, 0), (960, 1080), false)),
            ("Terminal".to_string(), settings((960, 0), (960, 1080), true)),
            ("Spotify".to_string(), settings((0, 0), (400, 400), false)),
        ];
        assert!(app.store().save_config("Work", &windows));

        let report = app.apply_config("Work").unwrap();
        assert_eq!(report.applied, vec!["Firefox".to_string(), "Terminal".to_string()]);
        assert_eq!(report.missing, vec!["Spotify".to_string()]);
        assert!(report.failed.is_empty());
        assert_eq!(report.status, "AOT: 1 window");

        let platform = app.manager().platform();
        assert_eq!(platform.window(browser).unwrap().area, Area::new(0, 0, 960, 1080));
        assert_eq!(platform.window(terminal).unwrap().area, Area::new(960, 0, 960, 1080));
        assert!(platform.window(terminal).unwrap().is_topmost());

        assert_eq!(app.reset(), 2);
        let platform = app.manager().platform();
        assert_eq!(platform.window(browser).unwrap().area, Area::new(100, 100, 300, 300));
        assert!(!platform.window(terminal).unwrap().is_topmost());
        assert_eq!(app.always_on_top_status(), "AOT: None");
    }

    #[test]
    fn test_apply_resets_previous_layout() {
        let dir = tempfile::tempdir().unwrap();
        let platform = FakePlatform::new();
        let editor = platform.add(FakeWindow::new("Editor", Area::new(10, 10, 100, 100)));
        let player = platform.add(FakeWindow::new("Player", Area::new(20, 20, 100, 100)));
        let mut app = controller(&dir, platform);

        assert!(app.store().save_config("One", &[("Editor".to_string(), settings((1, 1), (50, 50), true))]));
        assert!(app.store().save_config("Two", &[("Player".to_string(), settings((2, 2), (60, 60), false))]));

        app.apply_config("One").unwrap();
        app.apply_config("Two").unwrap();

        let platform = app.manager().platform();
        assert_eq!(platform.window(editor).unwrap().area, Area::new(10, 10, 100, 100));
        assert!(!platform.window(editor).unwrap().is_topmost());
        assert_eq!(platform.window(player).unwrap().area, Area::new(2, 2, 60, 60));
        assert!(!app.manager().is_managed(editor));
    }

    #[test]
    fn test_apply_unknown_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = controller(&dir, FakePlatform::new());
        assert_eq!(app.apply_config("Nope"), None);
    }

    #[test]
    fn test_toggle_always_on_top() {
        let dir = tempfile::tempdir().unwrap();
        let platform = FakePlatform::new();
        let player = platform.add(FakeWindow::new("Player", Area::new(0, 0, 100, 100)));
        let mut app = controller(&dir, platform);

        assert!(app.store().save_config("Media", &[("Player".to_string(), settings((0, 0), (10, 10), true))]));
        app.apply_config("Media").unwrap();

        assert_eq!(app.toggle_always_on_top(), 1);
        assert!(!app.manager().platform().window(player).unwrap().is_topmost());
        assert_eq!(app.always_on_top_status(), "AOT: None");

        assert_eq!(app.toggle_always_on_top(), 1);
        assert_eq!(app.always_on_top_status(), "AOT: 1 window");
    }

    #[test]
    fn test_create_config_from_live_windows() {
        let dir = tempfile::tempdir().unwrap();
        let platform = FakePlatform::new();
        platform.add(FakeWindow::new("main.rs - Visual Studio Code", Area::new(900, 0, 900, 1000)));
        platform.add(FakeWindow::new("Terminal", Area::new(0, 0, 900, 1000)).topmost());
        let app = controller(&dir, platform);

        let titles = vec![
            "main.rs - Visual Studio Code".to_string(),
            "Terminal".to_string(),
            "Closed".to_string(),
        ];
        assert!(app.create_config("coding", &titles));

        let config = app.load("Coding").unwrap();
        let names: Vec<&str> = config.names().collect();
        assert_eq!(names, vec!["Terminal", "Visual Studio Code"]);
        assert_eq!(config.get("Terminal").unwrap().always_on_top, Some(true));
        assert_eq!(config.get("Visual Studio Code").unwrap().position, Some((900, 0)));

        assert!(!app.create_config("empty", &["Closed".to_string()]));
    }

    #[test]
    fn test_default_config_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let platform = FakePlatform::new();
        platform.add(FakeWindow::new("Spotify Premium", Area::new(0, 0, 10, 10)));
        let app = controller(&dir, platform);

        assert!(app.store().save_config("Alpha", &[("Editor".to_string(), settings((0, 0), (1, 1), false))]));
        assert!(app.store().save_config("Music", &[("Spotify".to_string(), settings((0, 0), (1, 1), true))]));

        assert_eq!(app.default_config(), Some("Music".to_string()));
        assert!(app.delete_config("Music"));
        assert!(!app.delete_config("Music"));
        assert_eq!(app.default_config(), Some("Alpha".to_string()));
    }

    #[test]
    fn test_preview() {
        let dir = tempfile::tempdir().unwrap();
        let platform = FakePlatform::new();
        platform.add(FakeWindow::new("Editor", Area::new(0, 0, 10, 10)));
        let app = controller(&dir, platform);

        let windows = vec![
            ("Editor".to_string(), settings((5, 5), (100, 200), true)),
            ("Chat".to_string(), settings((200, 5), (100, 200), false)),
        ];
        assert!(app.store().save_config("Desk", &windows));

        let preview = app.preview("Desk").unwrap();
        assert_eq!(
            preview,
            vec![
                PreviewEntry {
                    name: "Editor".to_string(),
                    area: Some(Area::new(5, 5, 100, 200)),
                    always_on_top: true,
                    window_exists: true,
                },
                PreviewEntry {
                    name: "Chat".to_string(),
                    area: Some(Area::new(200, 5, 100, 200)),
                    always_on_top: false,
                    window_exists: false,
                },
            ]
        );
    }

    #[test]
    fn test_update_settings() {
        let dir = tempfile::tempdir().unwrap();
        let app = controller(&dir, FakePlatform::new());

        assert_eq!(app.settings(), UiSettings::default());
        let updated = app.update_settings(Some(true), None).unwrap();
        assert!(updated.compact);
        assert!(!updated.use_images);
        assert_eq!(app.settings(), updated);
    }

    #[test]
    fn test_preset_areas() {
        let dir = tempfile::tempdir().unwrap();
        let app = controller(&dir, FakePlatform::new());

        assert_eq!(app.preset_counts(), vec![2, 3, 4]);
        let areas = app.preset_areas(4, &Area::new(0, 0, 1920, 1080)).unwrap();
        assert_eq!(areas[3], Area::new(960, 540, 960, 540));
        assert_eq!(app.preset_areas(7, &Area::new(0, 0, 1920, 1080)), None);
    }
}
