use rust_embed::Embed;
use std::io::{Error, ErrorKind};

/// Default files shipped inside the executable.
#[derive(Embed)]
#[folder = "assets/"]
#[include = "configs/*"]
pub struct Asset;

impl Asset {
    pub fn get_string(path: &str) -> Result<String, Error> {
        let asset = Asset::get(path).ok_or_else(|| Error::new(ErrorKind::NotFound, format!("asset '{path}' not found")))?;
        String::from_utf8(asset.data.into_owned()).map_err(|e| Error::new(ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::Asset;

    #[test]
    fn test_get_string() {
        assert!(Asset::get_string("configs/winplacer.toml").is_ok());
        assert!(Asset::get_string("configs/layout_presets.ini").unwrap().contains("[Layouts]"));
        assert!(Asset::get_string("configs/missing.toml").is_err());
    }
}
