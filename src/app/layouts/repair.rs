use lazy_static::lazy_static;
use regex::Regex;

use super::layout_config::{
    LayoutConfig, RawSections, WindowRule, ALWAYS_ON_TOP_KEY, POSITION_KEY, SIZE_KEY, TITLEBAR_KEY,
};

pub const DEFAULT_SECTION: &str = "DEFAULT";
pub const DEFAULT_POSITION: (i32, i32) = (0, 0);
pub const DEFAULT_SIZE: (u32, u32) = (100, 100);
pub const DEFAULT_ALWAYS_ON_TOP: bool = false;
pub const DEFAULT_TITLEBAR: bool = true;

lazy_static! {
    static ref POSITION_PATTERN: Regex = Regex::new(r"^-?\d+,-?\d+$").unwrap();
    static ref SIZE_PATTERN: Regex = Regex::new(r"^\d+,\d+$").unwrap();
}

/// Turns raw sections into a [`LayoutConfig`], replacing every malformed known value with its default.
///
/// Blank sections, the reserved `DEFAULT` section and sections left without any valid key are dropped.
/// Unknown keys are kept (trimmed) when their value is not blank. Never fails, and
/// `validate_and_repair(&validate_and_repair(s).to_sections()) == validate_and_repair(s)`.
pub fn validate_and_repair(raw: &RawSections) -> LayoutConfig {
    let rules = raw
        .sections()
        .filter(|(name, _)| !name.trim().is_empty() && name.to_uppercase() != DEFAULT_SECTION)
        .filter_map(|(name, entries)| repair_section(name, entries))
        .collect();

    LayoutConfig::new(rules)
}

fn repair_section(name: &str, entries: &[(String, String)]) -> Option<WindowRule> {
    let mut rule = WindowRule::new(name);
    let mut valid_keys = 0;

    for (key, value) in entries {
        let value = value.trim();
        match key.trim().to_lowercase().as_str() {
            POSITION_KEY => rule.position = Some(parse_position(value).unwrap_or(DEFAULT_POSITION)),
            SIZE_KEY => rule.size = Some(parse_size(value).unwrap_or(DEFAULT_SIZE)),
            ALWAYS_ON_TOP_KEY => rule.always_on_top = Some(parse_bool(value).unwrap_or(DEFAULT_ALWAYS_ON_TOP)),
            TITLEBAR_KEY => rule.titlebar = Some(parse_bool(value).unwrap_or(DEFAULT_TITLEBAR)),
            _ if value.is_empty() || key.trim().is_empty() => continue,
            _ => set_extra(&mut rule, key.trim(), value),
        }
        valid_keys += 1;
    }

    if valid_keys == 0 {
        log::debug!("Dropping section '{}': no valid keys", name);
        return None;
    }

    Some(rule)
}

fn set_extra(rule: &mut WindowRule, key: &str, value: &str) {
    match rule.extra.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value.to_string(),
        None => rule.extra.push((key.to_string(), value.to_string())),
    }
}

/// Parses `x,y` (both may be negative).
pub fn parse_position(value: &str) -> Option<(i32, i32)> {
    if !POSITION_PATTERN.is_match(value) {
        return None;
    }
    let (x, y) = value.split_once(',')?;
    Some((x.parse().ok()?, y.parse().ok()?))
}

/// Parses `width,height`, both strictly positive.
pub fn parse_size(value: &str) -> Option<(u32, u32)> {
    if !SIZE_PATTERN.is_match(value) {
        return None;
    }
    let (w, h) = value.split_once(',')?;
    let (w, h): (u32, u32) = (w.parse().ok()?, h.parse().ok()?);
    match w > 0 && h > 0 {
        true => Some((w, h)),
        false => None,
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(sections: &[(&str, &[(&str, &str)])]) -> RawSections {
        let mut raw = RawSections::new();
        for (name, entries) in sections {
            raw.add_section(name);
            for (k, v) in entries.iter() {
                raw.set(name, k, v);
            }
        }
        raw
    }

    #[test]
    fn test_repair_defaults() {
        let config = validate_and_repair(&raw(&[(
            "S",
            &[
                ("position", "abc"),
                ("size", "abc"),
                ("always_on_top", "maybe"),
                ("titlebar", "maybe"),
            ],
        )]));

        let rule = config.get("S").unwrap();
        assert_eq!(rule.position, Some((0, 0)));
        assert_eq!(rule.size, Some((100, 100)));
        assert_eq!(rule.always_on_top, Some(false));
        assert_eq!(rule.titlebar, Some(true));

        let sections = config.to_sections();
        assert_eq!(sections.get("S", "position"), Some("0,0"));
        assert_eq!(sections.get("S", "size"), Some("100,100"));
        assert_eq!(sections.get("S", "always_on_top"), Some("false"));
        assert_eq!(sections.get("S", "titlebar"), Some("true"));
    }

    #[test]
    fn test_repair_keeps_valid_values() {
        let config = validate_and_repair(&raw(&[(
            "Editor",
            &[
                ("position", "-1920,-20"),
                ("size", "1280,720"),
                ("always_on_top", "TRUE"),
                ("titlebar", "False"),
            ],
        )]));

        let rule = config.get("Editor").unwrap();
        assert_eq!(rule.position, Some((-1920, -20)));
        assert_eq!(rule.size, Some((1280, 720)));
        assert_eq!(rule.always_on_top, Some(true));
        assert_eq!(rule.titlebar, Some(false));
    }

    #[test]
    fn test_repair_rejects_bad_sizes() {
        assert_eq!(parse_size("0,100"), None);
        assert_eq!(parse_size("-5,100"), None);
        assert_eq!(parse_size("99999999999,1"), None);
        assert_eq!(parse_size("10, 10"), None);
        assert_eq!(parse_position("(10, 10)"), None);
        assert_eq!(parse_position("10,-10"), Some((10, -10)));
    }

    #[test]
    fn test_repair_drops_sections() {
        let config = validate_and_repair(&raw(&[
            ("   ", &[("position", "1,1")]),
            ("default", &[("position", "1,1")]),
            ("Empty", &[]),
            ("Blank", &[("note", "   ")]),
            ("Kept", &[("note", "  hello ")]),
        ]));

        let names: Vec<&str> = config.names().collect();
        assert_eq!(names, vec!["Kept"]);
        assert_eq!(config.get("Kept").unwrap().extra, vec![("note".to_string(), "hello".to_string())]);
    }

    #[test]
    fn test_repair_idempotent() {
        let samples = [
            raw(&[("S", &[("position", "abc"), ("size", "0,0")])]),
            raw(&[
                ("B", &[("always_on_top", "yes"), ("x", " 1 ")]),
                ("A", &[("titlebar", "FALSE"), ("position", "5,-5")]),
            ]),
            raw(&[("DEFAULT", &[("size", "1,1")]), ("Only", &[("", "v")])]),
        ];

        for s in samples {
            let once = validate_and_repair(&s);
            let twice = validate_and_repair(&once.to_sections());
            assert_eq!(once, twice);
        }
    }
}
