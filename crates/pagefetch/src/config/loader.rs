use std::path::Path;

use crate::config::schema::RunSettings;
use crate::error::ConfigError;

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<RunSettings, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_settings_from_str(&content)
}

pub fn load_settings_from_str(content: &str) -> Result<RunSettings, ConfigError> {
    let settings: RunSettings = serde_json::from_str(content)?;
    settings.validate()?;
    Ok(settings)
}
