use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::layout_config::RawSections;
use super::store::StoreError;

/// Parses the sectioned `key = value` text format.
///
/// Malformed lines are skipped (and logged), never fatal. Keys are lowercased, keys and values trimmed,
/// repeated sections are merged.
pub fn parse_sections(content: &str, source: &str) -> RawSections {
    let mut sections = RawSections::new();
    let mut current: Option<String> = None;

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.starts_with('[') {
            match trimmed.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                Some(name) => {
                    let name = name.trim();
                    sections.add_section(name);
                    current = Some(name.to_string());
                }
                None => {
                    log::warn!("{}:{}: malformed section header '{}'", source, idx + 1, trimmed);
                    current = None;
                }
            }
            continue;
        }

        let Some(section) = current.as_ref() else {
            log::warn!("{}:{}: entry outside of any section, skipped", source, idx + 1);
            continue;
        };

        match split_entry(trimmed) {
            Some((key, value)) => sections.set(section, &key.to_lowercase(), value),
            None => log::warn!("{}:{}: malformed entry '{}', skipped", source, idx + 1, trimmed),
        }
    }

    sections
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(['=', ':'])?;
    let (key, value) = (line[..idx].trim(), line[idx + 1..].trim());
    match key.is_empty() {
        true => None,
        false => Some((key, value)),
    }
}

pub fn format_sections(sections: &RawSections) -> String {
    let mut out = String::new();
    for (name, entries) in sections.sections() {
        out.push_str(&format!("[{name}]\n"));
        for (key, value) in entries {
            out.push_str(&format!("{key} = {value}\n"));
        }
        out.push('\n');
    }
    out
}

/// Writes `content` next to `path` first, fsyncs it and then renames it over `path`.
pub fn write_atomically(path: &Path, content: &str) -> Result<(), StoreError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| StoreError::io("write", path, "invalid file name"))?;
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let write_tmp = || -> std::io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        file.sync_all()
    };

    if let Err(e) = write_tmp() {
        std::fs::remove_file(&tmp_path).ok();
        return Err(StoreError::io("write", &tmp_path, e));
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        std::fs::remove_file(&tmp_path).ok();
        StoreError::io("rename", path, e)
    })
}
