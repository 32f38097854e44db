use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACES: Regex = Regex::new(r"\s+").unwrap();
    static ref BRANDING_SEPARATOR: Regex = Regex::new(r" - ").unwrap();
    static ref TRAILING_PARENTHESIS: Regex = Regex::new(r"\s*\(.*\)$").unwrap();
    static ref TRAILING_PERCENTAGE: Regex = Regex::new(r"\s+\d+%$").unwrap();
    static ref ILLEGAL_FILE_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*\[\]]"#).unwrap();
}

/// Canonical key used to compare a window title against a rule.
///
/// Drops every char outside the printable ASCII range (zero-width spaces, emojis, ...),
/// collapses whitespace runs, trims and lowercases.
pub fn normalize_for_match(title: &str) -> String {
    let printable: String = title.chars().filter(|c| (' '..='~').contains(c)).collect();
    WHITESPACES.replace_all(&printable, " ").trim().to_lowercase()
}

/// Filesystem-safe, title-cased name derived from a window title.
///
/// `"notes.txt - Notepad++ (2 unread)"` becomes `"Notepad++"`.
pub fn sanitize_for_display(title: &str) -> String {
    // INFO: dashes are folded before normalizing, otherwise em/en dashes would be dropped as non-ASCII
    let folded: String = title.chars().map(|c| if matches!(c, '—' | '–') { '-' } else { c }).collect();
    let normalized = normalize_for_match(&folded);

    let app_name = BRANDING_SEPARATOR.split(&normalized).last().unwrap_or_default().trim();
    let app_name = TRAILING_PARENTHESIS.replace(app_name, "");
    let app_name = TRAILING_PERCENTAGE.replace(&app_name, "");
    let app_name = ILLEGAL_FILE_CHARS.replace_all(&app_name, "");

    title_case(app_name.trim())
}

/// True if `match_key` (already normalized) is contained in the normalized `title`.
pub fn title_matches(match_key: &str, title: &str) -> bool {
    !match_key.is_empty() && normalize_for_match(title).contains(match_key)
}

fn title_case(s: &str) -> String {
    let mut prev_is_alpha = false;
    s.chars()
        .map(|c| {
            let mapped = match prev_is_alpha {
                true => c.to_ascii_lowercase(),
                false => c.to_ascii_uppercase(),
            };
            prev_is_alpha = c.is_ascii_alphabetic();
            mapped
        })
        .collect()
}
