use serde::de::Error;
use serde::Deserialize;
use serde::Deserializer;

pub fn to_u32_minmax<'de, const MIN: u32, const MAX: u32, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v: u32 = u32::deserialize(deserializer)?;
    match v >= MIN && v <= MAX {
        true => Ok(v),
        false => Err(D::Error::custom(format!(
            "value must be between {MIN} and {MAX} (inclusive)"
        ))),
    }
}

pub fn to_relative_path<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = String::deserialize(deserializer)?;
    match s.trim().is_empty() {
        true => Err(D::Error::custom("path can't be empty")),
        false => Ok(s.trim().to_string()),
    }
}

pub fn to_titles_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let titles: Vec<String> = Vec::deserialize(deserializer)?;
    Ok(titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}
