use std::collections::{HashMap, HashSet};

use super::error::WindowStateError;
use super::platform::{WindowInfo, WindowPlatform, FRAME_STYLE, WS_CAPTION, WS_EX_TOPMOST};
use super::window_snapshot::WindowSnapshot;
use crate::app::layouts::layout_config::{LayoutConfig, WinHandle, WindowRule, WindowSettings};
use crate::app::structs::area::Area;
use crate::app::title::{sanitize_for_display, title_matches};

type Error = WindowStateError;
type WSResult<T = ()> = Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowMatch {
    pub rule_name: String,
    pub handle: WinHandle,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchResult {
    pub matches: Vec<WindowMatch>,
    pub missing: Vec<String>,
}

/// Tracks the windows touched by this tool and applies/undoes layout rules on them.
///
/// A window becomes managed the first time a rule is applied to it: its geometry and styles are
/// captured before any change, and restored when it's released.
pub struct WindowStateManager<P: WindowPlatform> {
    platform: P,
    managed: HashMap<WinHandle, WindowSnapshot>,
    topmost: HashSet<WinHandle>,
    ignored_titles: Vec<String>,
}

impl<P: WindowPlatform> WindowStateManager<P> {
    pub fn new(platform: P, ignored_titles: &[String]) -> WindowStateManager<P> {
        WindowStateManager {
            platform,
            managed: HashMap::new(),
            topmost: HashSet::new(),
            ignored_titles: ignored_titles.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn is_managed(&self, handle: WinHandle) -> bool {
        self.managed.contains_key(&handle)
    }

    pub fn managed_windows(&self) -> Vec<WinHandle> {
        let mut handles: Vec<WinHandle> = self.managed.keys().copied().collect();
        handles.sort();
        handles
    }

    pub fn is_topmost_tracked(&self, handle: WinHandle) -> bool {
        self.topmost.contains(&handle)
    }

    pub fn topmost_windows(&self) -> Vec<WinHandle> {
        let mut handles: Vec<WinHandle> = self.topmost.iter().copied().collect();
        handles.sort();
        handles
    }

    /// Starts tracking `handle`, capturing its current state. No-op if already managed.
    pub fn add_managed_window(&mut self, handle: WinHandle) -> WSResult {
        if self.managed.contains_key(&handle) {
            return Ok(());
        }

        let snapshot = WindowSnapshot::capture(&self.platform, handle)?;
        log::debug!("Window {} managed, original state {}", handle, snapshot);
        self.managed.insert(handle, snapshot);
        Ok(())
    }

    /// Restores the captured state of `handle` and stops tracking it.
    ///
    /// Tracking is dropped even if some restore step fails (e.g. the window has been closed);
    /// in that case the first error is returned.
    pub fn remove_managed_window(&mut self, handle: WinHandle) -> WSResult {
        let snapshot = self.managed.remove(&handle).ok_or(Error::NotManaged(handle))?;
        self.topmost.remove(&handle);

        let steps = [
            self.platform.set_style(handle, snapshot.style),
            self.platform.set_ex_style(handle, snapshot.ex_style),
            self.platform.refresh_frame(handle),
            self.platform.set_area(handle, snapshot.area),
            self.platform.set_topmost(handle, snapshot.is_topmost()),
        ];

        let mut result = Ok(());
        for err in steps.into_iter().filter_map(|s| s.err()) {
            log::log!(err.get_log_level(), "Can't restore window {}: {}", handle, err);
            if result.is_ok() {
                result = Err(err.into());
            }
        }
        result
    }

    /// Releases every managed window, restoring its original state. Returns the number of windows
    /// restored without errors.
    pub fn reset_all_windows(&mut self) -> usize {
        let unmanaged: Vec<WinHandle> =
            self.topmost_windows().into_iter().filter(|h| !self.is_managed(*h)).collect();
        for handle in unmanaged {
            self.set_always_on_top(handle, false)
                .inspect_err(|e| log_error("reset_all_windows", handle, e))
                .ok();
        }

        self.managed_windows()
            .into_iter()
            .filter(|handle| {
                self.remove_managed_window(*handle)
                    .inspect_err(|e| log_error("reset_all_windows", *handle, e))
                    .is_ok()
            })
            .count()
    }

    /// Matches every rule (in config order) against the open windows (in OS order).
    ///
    /// The first window containing the rule's key wins. A window can be claimed by more than one rule.
    pub fn find_matching_windows(&self, config: &LayoutConfig) -> MatchResult {
        let mut result = MatchResult::default();
        if config.is_empty() {
            return result;
        }

        let windows = self.list_visible_windows();
        for rule in config.rules.iter() {
            let key = rule.match_key();
            match windows.iter().find(|w| title_matches(&key, &w.title)) {
                Some(w) => result.matches.push(WindowMatch {
                    rule_name: rule.name.clone(),
                    handle: w.handle,
                }),
                None => result.missing.push(rule.name.clone()),
            }
        }

        result
    }

    /// Applies `rule` to an already matched window, best effort.
    ///
    /// Returns false only if the window can't be managed (e.g. invalid handle); failures of the
    /// single steps are logged and don't stop the following ones.
    pub fn apply_window_config(&mut self, rule: &WindowRule, handle: WinHandle) -> bool {
        if let Err(e) = self.add_managed_window(handle) {
            log_error("apply_window_config", handle, &e);
            return false;
        }

        if self.platform.is_minimized(handle).unwrap_or(false) {
            let restored = self.platform.restore(handle).and_then(|_| self.platform.set_foreground(handle));
            if let Err(e) = restored {
                log_error("restore", handle, &e.into());
            }
        }

        let titlebar = match rule.has_titlebar() {
            true => self.restore_window_frame(handle),
            false => self.make_borderless(handle),
        };
        titlebar.inspect_err(|e| log_error("titlebar", handle, e)).ok();

        if let Some((x, y)) = rule.position {
            self.set_window_position(handle, x, y)
                .inspect_err(|e| log_error("position", handle, e))
                .ok();
        }

        if let Some((width, height)) = rule.size {
            self.set_window_size(handle, width, height)
                .inspect_err(|e| log_error("size", handle, e))
                .ok();
        }

        self.set_always_on_top(handle, rule.is_always_on_top())
            .inspect_err(|e| log_error("always_on_top", handle, e))
            .ok();

        log::info!("Rule '{}' applied to window {}", rule.name, handle);
        true
    }

    /// Moves the window, keeping its current size.
    pub fn set_window_position(&self, handle: WinHandle, x: i32, y: i32) -> WSResult {
        let area = self.platform.get_area(handle)?;
        Ok(self.platform.set_area(handle, Area::new(x, y, area.width, area.height))?)
    }

    /// Resizes the window, keeping its current position.
    pub fn set_window_size(&self, handle: WinHandle, width: u32, height: u32) -> WSResult {
        let area = self.platform.get_area(handle)?;
        Ok(self.platform.set_area(handle, Area::new(area.x, area.y, width, height))?)
    }

    /// Idempotent in both directions; the window is tracked at most once.
    pub fn set_always_on_top(&mut self, handle: WinHandle, enable: bool) -> WSResult {
        self.platform.set_topmost(handle, enable)?;
        match enable {
            true => self.topmost.insert(handle),
            false => self.topmost.remove(&handle),
        };
        Ok(())
    }

    /// Flips the topmost state read from the OS, since other apps can change it.
    ///
    /// Tracking is left untouched, so that a second toggle brings the window back on top.
    /// Returns the new state.
    pub fn toggle_always_on_top(&mut self, handle: WinHandle) -> WSResult<bool> {
        let is_topmost = self.platform.get_ex_style(handle)? & WS_EX_TOPMOST != 0;
        self.platform.set_topmost(handle, !is_topmost)?;
        log::debug!("Window {} topmost: {} -> {}", handle, is_topmost, !is_topmost);
        Ok(!is_topmost)
    }

    pub fn make_borderless(&self, handle: WinHandle) -> WSResult {
        let style = self.platform.get_style(handle)?;
        self.platform.set_style(handle, style & !FRAME_STYLE)?;
        Ok(self.platform.refresh_frame(handle)?)
    }

    pub fn restore_window_frame(&self, handle: WinHandle) -> WSResult {
        let style = self.platform.get_style(handle)?;
        self.platform.set_style(handle, style | FRAME_STYLE)?;
        Ok(self.platform.refresh_frame(handle)?)
    }

    /// Counts the tracked windows that are still topmost according to the OS.
    pub fn get_always_on_top_status(&self) -> String {
        let count = self
            .topmost
            .iter()
            .filter(|h| self.platform.get_ex_style(**h).is_ok_and(|s| s & WS_EX_TOPMOST != 0))
            .count();

        match count {
            0 => "AOT: None".to_string(),
            1 => "AOT: 1 window".to_string(),
            n => format!("AOT: {n} windows"),
        }
    }

    /// Titles of the visible windows, without system windows, sorted.
    pub fn get_all_window_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self
            .list_visible_windows()
            .into_iter()
            .map(|w| w.title)
            .filter(|t| !t.trim().is_empty() && !self.is_system_window(t))
            .collect();
        titles.sort();
        titles
    }

    /// Current settings of the first visible window titled `title`, ready to be saved in a layout.
    pub fn collect_window_settings(&self, title: &str) -> Option<WindowSettings> {
        let window = self.list_visible_windows().into_iter().find(|w| w.title == title)?;
        self.collect_settings(window.handle, &window.title)
    }

    /// Same as [`Self::collect_window_settings`], for the visible window `handle`.
    pub fn collect_window_settings_of(&self, handle: WinHandle) -> Option<WindowSettings> {
        let window = self.list_visible_windows().into_iter().find(|w| w.handle == handle)?;
        self.collect_settings(handle, &window.title)
    }

    fn collect_settings(&self, handle: WinHandle, title: &str) -> Option<WindowSettings> {
        let collect = || -> WSResult<WindowSettings> {
            let area = self.platform.get_area(handle)?;
            let style = self.platform.get_style(handle)?;
            let ex_style = self.platform.get_ex_style(handle)?;

            let mut settings = WindowSettings::from_geometry(area.get_origin(), area.get_size());
            settings.titlebar = Some(style & WS_CAPTION != 0);
            settings.always_on_top = Some(ex_style & WS_EX_TOPMOST != 0);
            settings.name = Some(sanitize_for_display(title));
            Ok(settings)
        };

        collect().inspect_err(|e| log_error("collect_window_settings", handle, e)).ok()
    }

    fn list_visible_windows(&self) -> Vec<WindowInfo> {
        self.platform
            .list_top_level_windows()
            .inspect_err(|e| log::error!("Can't enumerate windows: {}", e))
            .unwrap_or_default()
            .into_iter()
            .filter(|w| w.visible)
            .collect()
    }

    fn is_system_window(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.ignored_titles.iter().any(|t| title.contains(t.as_str()))
    }
}

fn log_error(op: &str, handle: WinHandle, err: &WindowStateError) {
    log::log!(err.get_log_level(), "[{}] window {}: {}", op, handle, err.get_info());
}
