use std::collections::BTreeMap;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::ini::{parse_sections, write_atomically};
use crate::app::assets::Asset;
use crate::app::structs::area::Area;

pub const PRESETS_SECTION: &str = "Layouts";
pub const DEFAULT_PRESETS_ASSET: &str = "configs/layout_presets.ini";
/// Two-window splits are expressed in quarters of the work area width.
pub const TWO_SPLIT_DENOMINATOR: u32 = 4;

const NUM: &str = r"\s*(\d+(?:\.\d+)?)\s*";

lazy_static! {
    static ref GRID_CELL: Regex = Regex::new(&format!(r"\(\s*\({NUM},{NUM}\)\s*,\s*\({NUM},{NUM}\)\s*\)")).unwrap();
    static ref RATIO_SPLIT: Regex = Regex::new(r"\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*\)").unwrap();
    static ref SIDE_SPLIT: Regex = Regex::new(r#"\(\s*(\d+)\s*,\s*['"]?(CL|CR|L|R)['"]?\s*\)"#).unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"^[\s,]*$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Side {
    Left,
    Right,
    CenterLeft,
    CenterRight,
}

impl Side {
    fn from_code(code: &str) -> Option<Side> {
        match code {
            "L" => Some(Side::Left),
            "R" => Some(Side::Right),
            "CL" => Some(Side::CenterLeft),
            "CR" => Some(Side::CenterRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub origin: (f32, f32),
    pub size: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioSplit {
    pub numerator: u32,
    pub denominator: u32,
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideSplit {
    pub numerator: u32,
    pub side: Side,
}

/// Relative geometry template for arranging N windows.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetLayout {
    /// `((x, y), (w, h))` cells, fractions of the work area
    FourGrid(Vec<GridCell>),
    /// Columns from left to right, `numerator / denominator` wide and `weight / max_weight` high
    ThreeSplit(Vec<RatioSplit>),
    /// `numerator` quarters wide, anchored to `side`, full height
    TwoSplit(Vec<SideSplit>),
}

impl PresetLayout {
    pub fn resolve(&self, work_area: &Area) -> Vec<Area> {
        match self {
            PresetLayout::FourGrid(cells) => cells
                .iter()
                .map(|c| work_area.fraction(c.origin.0, c.origin.1, c.size.0, c.size.1))
                .collect(),
            PresetLayout::ThreeSplit(columns) => {
                let max_weight = columns.iter().map(|c| c.weight).max().unwrap_or(1).max(1) as f32;
                let mut x = 0.0;
                columns
                    .iter()
                    .map(|c| {
                        let width = c.numerator as f32 / c.denominator as f32;
                        let area = work_area.fraction(x, 0.0, width, c.weight as f32 / max_weight);
                        x += width;
                        area
                    })
                    .collect()
            }
            PresetLayout::TwoSplit(splits) => splits
                .iter()
                .map(|s| {
                    let width = (s.numerator.min(TWO_SPLIT_DENOMINATOR) as f32) / TWO_SPLIT_DENOMINATOR as f32;
                    let free = 1.0 - width;
                    let x = match s.side {
                        Side::Left => 0.0,
                        Side::Right => free,
                        Side::CenterLeft => free / 3.0,
                        Side::CenterRight => free * 2.0 / 3.0,
                    };
                    work_area.fraction(x, 0.0, width, 1.0)
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PresetLayout::FourGrid(v) => v.len(),
            PresetLayout::ThreeSplit(v) => v.len(),
            PresetLayout::TwoSplit(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Window count -> preset layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoAlignPresets {
    layouts: BTreeMap<u8, PresetLayout>,
}

impl AutoAlignPresets {
    pub fn get(&self, windows_count: u8) -> Option<&PresetLayout> {
        self.layouts.get(&windows_count)
    }

    pub fn counts(&self) -> impl Iterator<Item = u8> + '_ {
        self.layouts.keys().copied()
    }

    /// Built-in presets, embedded in the executable.
    pub fn builtin() -> AutoAlignPresets {
        Asset::get_string(DEFAULT_PRESETS_ASSET)
            .map(|s| AutoAlignPresets::parse(&s, DEFAULT_PRESETS_ASSET))
            .inspect_err(|e| log::error!("Can't read built-in presets: {}", e))
            .unwrap_or_default()
    }

    /// Parses the `[Layouts]` section. Invalid entries are skipped, a missing section yields the built-in presets.
    pub fn parse(content: &str, source: &str) -> AutoAlignPresets {
        let sections = parse_sections(content, source);
        let Some((_, entries)) = sections.sections().find(|(name, _)| *name == PRESETS_SECTION) else {
            log::warn!("{}: no [{}] section, using built-in presets", source, PRESETS_SECTION);
            return match source == DEFAULT_PRESETS_ASSET {
                true => AutoAlignPresets::default(),
                false => AutoAlignPresets::builtin(),
            };
        };

        let layouts = entries
            .iter()
            .filter_map(|(key, value)| match parse_layout(key, value) {
                Ok(layout) => Some(layout),
                Err(e) => {
                    log::warn!("{}: skipping preset '{}': {}", source, key, e);
                    None
                }
            })
            .collect();

        AutoAlignPresets { layouts }
    }
}

/// Loads the presets file, creating it from the built-in presets if it does not exist.
pub fn load_or_create_presets(path: &Path) -> AutoAlignPresets {
    if path.exists() {
        return match std::fs::read_to_string(path) {
            Ok(content) => AutoAlignPresets::parse(&content, &path.display().to_string()),
            Err(e) => {
                log::error!("Can't read presets file {}: {}", path.display(), e);
                AutoAlignPresets::builtin()
            }
        };
    }

    match Asset::get_string(DEFAULT_PRESETS_ASSET) {
        Ok(content) => {
            if let Err(e) = write_atomically(path, &content) {
                log::error!("Can't create presets file: {}", e.get_info());
            }
            AutoAlignPresets::parse(&content, DEFAULT_PRESETS_ASSET)
        }
        Err(e) => {
            log::error!("Can't read built-in presets: {}", e);
            AutoAlignPresets::default()
        }
    }
}

fn parse_layout(key: &str, value: &str) -> Result<(u8, PresetLayout), String> {
    let count: u8 = key.parse().map_err(|_| format!("'{key}' is not a window count"))?;
    let layout = match count {
        4 => PresetLayout::FourGrid(parse_tuples(value, &GRID_CELL, grid_cell)?),
        3 => PresetLayout::ThreeSplit(parse_tuples(value, &RATIO_SPLIT, ratio_split)?),
        2 => PresetLayout::TwoSplit(parse_tuples(value, &SIDE_SPLIT, side_split)?),
        _ => return Err(format!("unsupported window count {count}")),
    };

    match layout.len() == count as usize {
        true => Ok((count, layout)),
        false => Err(format!("expected {} entries, found {}", count, layout.len())),
    }
}

/// Parses `[tuple, tuple, ...]`, where every tuple must match `pattern` and nothing else is allowed.
fn parse_tuples<T>(
    value: &str,
    pattern: &Regex,
    build: fn(&regex::Captures) -> Result<T, String>,
) -> Result<Vec<T>, String> {
    let inner = value
        .trim()
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or("value must be a [...] list")?;

    let mut items = Vec::new();
    let mut last_end = 0;
    for caps in pattern.captures_iter(inner) {
        let m = caps.get(0).ok_or("empty match")?;
        if !SEPARATORS.is_match(&inner[last_end..m.start()]) {
            return Err(format!("unexpected '{}'", inner[last_end..m.start()].trim()));
        }
        items.push(build(&caps)?);
        last_end = m.end();
    }

    if !SEPARATORS.is_match(&inner[last_end..]) {
        return Err(format!("unexpected '{}'", inner[last_end..].trim()));
    }

    Ok(items)
}

fn fraction(caps: &regex::Captures, idx: usize) -> Result<f32, String> {
    let v: f32 = caps[idx].parse().map_err(|_| format!("invalid number '{}'", &caps[idx]))?;
    match (0.0..=1.0).contains(&v) {
        true => Ok(v),
        false => Err(format!("{v} is not a fraction between 0 and 1")),
    }
}

fn grid_cell(caps: &regex::Captures) -> Result<GridCell, String> {
    Ok(GridCell {
        origin: (fraction(caps, 1)?, fraction(caps, 2)?),
        size: (fraction(caps, 3)?, fraction(caps, 4)?),
    })
}

fn ratio_split(caps: &regex::Captures) -> Result<RatioSplit, String> {
    let parse = |idx: usize| caps[idx].parse::<u32>().map_err(|e| e.to_string());
    let (numerator, denominator, weight) = (parse(1)?, parse(2)?, parse(3)?);
    if denominator == 0 || numerator > denominator {
        return Err(format!("invalid ratio {numerator}/{denominator}"));
    }
    Ok(RatioSplit {
        numerator,
        denominator,
        weight,
    })
}

fn side_split(caps: &regex::Captures) -> Result<SideSplit, String> {
    let numerator = caps[1].parse::<u32>().map_err(|e| e.to_string())?;
    let side = Side::from_code(&caps[2]).ok_or(format!("invalid side '{}'", &caps[2]))?;
    match numerator > 0 && numerator <= TWO_SPLIT_DENOMINATOR {
        true => Ok(SideSplit { numerator, side }),
        false => Err(format!("numerator must be between 1 and {TWO_SPLIT_DENOMINATOR}")),
    }
}
