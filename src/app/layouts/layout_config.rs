use std::fmt::{Debug, Display};

use crate::app::title::normalize_for_match;

pub const POSITION_KEY: &str = "position";
pub const SIZE_KEY: &str = "size";
pub const ALWAYS_ON_TOP_KEY: &str = "always_on_top";
pub const TITLEBAR_KEY: &str = "titlebar";

/// Opaque identity of a live top-level window. Never persisted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WinHandle(pub isize);

impl Debug for WinHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl Display for WinHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<isize> for WinHandle {
    fn from(value: isize) -> Self {
        WinHandle(value)
    }
}

/// Ordered `section -> [(key, value)]` view of a layout file, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSections {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl RawSections {
    pub fn new() -> RawSections {
        RawSections::default()
    }

    /// Sets `key` in `section`, creating the section at the end if missing.
    /// Existing keys are overwritten in place.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let entries = self.section_mut(section);
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn add_section(&mut self, section: &str) {
        self.section_mut(section);
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &[(String, String)])> {
        self.sections.iter().map(|(s, e)| (s.as_str(), e.as_slice()))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(s, _)| s == section)
            .and_then(|(_, e)| e.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn section_mut(&mut self, section: &str) -> &mut Vec<(String, String)> {
        let idx = match self.sections.iter().position(|(s, _)| s == section) {
            Some(idx) => idx,
            None => {
                self.sections.push((section.to_string(), Vec::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx].1
    }
}

/// Desired state of one application window inside a layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowRule {
    pub name: String,
    pub position: Option<(i32, i32)>,
    pub size: Option<(u32, u32)>,
    pub always_on_top: Option<bool>,
    pub titlebar: Option<bool>,
    pub extra: Vec<(String, String)>,
}

impl WindowRule {
    pub fn new(name: &str) -> WindowRule {
        WindowRule {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn with_always_on_top(mut self, enabled: bool) -> Self {
        self.always_on_top = Some(enabled);
        self
    }

    pub fn with_titlebar(mut self, enabled: bool) -> Self {
        self.titlebar = Some(enabled);
        self
    }

    pub fn match_key(&self) -> String {
        normalize_for_match(&self.name)
    }

    pub fn is_always_on_top(&self) -> bool {
        self.always_on_top.unwrap_or(false)
    }

    pub fn has_titlebar(&self) -> bool {
        self.titlebar.unwrap_or(true)
    }

    pub(crate) fn to_entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if let Some((x, y)) = self.position {
            entries.push((POSITION_KEY.to_string(), format!("{x},{y}")));
        }
        if let Some((w, h)) = self.size {
            entries.push((SIZE_KEY.to_string(), format!("{w},{h}")));
        }
        if let Some(v) = self.always_on_top {
            entries.push((ALWAYS_ON_TOP_KEY.to_string(), v.to_string()));
        }
        if let Some(v) = self.titlebar {
            entries.push((TITLEBAR_KEY.to_string(), v.to_string()));
        }
        entries.extend(self.extra.iter().cloned());
        entries
    }
}

/// A named layout: ordered rules, one per managed application.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutConfig {
    pub rules: Vec<WindowRule>,
}

impl LayoutConfig {
    pub fn new(rules: Vec<WindowRule>) -> LayoutConfig {
        LayoutConfig { rules }
    }

    pub fn get(&self, name: &str) -> Option<&WindowRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn to_sections(&self) -> RawSections {
        let mut sections = RawSections::new();
        for rule in &self.rules {
            sections.add_section(&rule.name);
            for (k, v) in rule.to_entries() {
                sections.set(&rule.name, &k, &v);
            }
        }
        sections
    }
}

/// Partial settings of a live window, as collected or edited before saving.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSettings {
    pub position: Option<String>,
    pub size: Option<String>,
    pub always_on_top: Option<bool>,
    pub titlebar: Option<bool>,
    pub name: Option<String>,
}

impl WindowSettings {
    pub fn from_geometry(position: (i32, i32), size: (u32, u32)) -> WindowSettings {
        WindowSettings {
            position: Some(format!("{},{}", position.0, position.1)),
            size: Some(format!("{},{}", size.0, size.1)),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_sections_set_overwrites_in_place() {
        let mut raw = RawSections::new();
        raw.set("A", "position", "1,1");
        raw.set("B", "size", "10,10");
        raw.set("A", "position", "2,2");
        raw.set("A", "size", "5,5");

        let names: Vec<&str> = raw.sections().map(|(s, _)| s).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(raw.get("A", "position"), Some("2,2"));
        assert_eq!(raw.get("A", "size"), Some("5,5"));
        assert_eq!(raw.get("C", "size"), None);
    }

    #[test]
    fn test_rule_defaults() {
        let rule = WindowRule::new("Microsoft  Edge");
        assert_eq!(rule.match_key(), "microsoft edge");
        assert!(!rule.is_always_on_top());
        assert!(rule.has_titlebar());
    }

    #[test]
    fn test_to_sections_order() {
        let mut rule = WindowRule::new("Terminal").with_position(-10, 5).with_always_on_top(true);
        rule.extra.push(("monitor".to_string(), "2".to_string()));
        let config = LayoutConfig::new(vec![rule, WindowRule::new("Editor").with_size(800, 600)]);
        let raw = config.to_sections();

        let sections: Vec<(&str, &[(String, String)])> = raw.sections().collect();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].0, "Terminal");
        let keys: Vec<&str> = sections[0].1.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["position", "always_on_top", "monitor"]);
        assert_eq!(raw.get("Terminal", "position"), Some("-10,5"));
        assert_eq!(raw.get("Editor", "size"), Some("800,600"));
    }
}
