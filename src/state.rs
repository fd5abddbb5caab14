//! Configuration loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::Config;

/// ~/.clubnotify/config.json
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home.join(".clubnotify").join("config.json"))
}

/// Load configuration from ~/.clubnotify/config.json
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path()?)
}

/// Load and validate configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;

    log::debug!(
        "Loaded config from {} ({} locations)",
        path.display(),
        config.locations.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"timezone": "Asia/Tokyo", "calendarUrl": "https://cal/club"}}"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.calendar_url.as_deref(), Some("https://cal/club"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_load_config_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_config_runs_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timezone": "Nowhere/Else"}}"#).unwrap();
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::InvalidTimezone(_))
        ));
    }
}
