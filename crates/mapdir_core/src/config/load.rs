use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use super::{ConfigError, MapdirConfig};

impl MapdirConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: MapdirConfig =
            toml::from_str(contents).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::Serialize(err.to_string()))
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    ///
    /// Environment overrides are applied after the file layer.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|err| ConfigError::Read {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
            Self::from_toml_str(&contents)?
        } else {
            Self::default()
        };
        apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}

/// Applies `MAPDIR_*` environment variables on top of `config`.
///
/// Unparsable values are ignored with a warning.
pub fn apply_env_overrides(config: &mut MapdirConfig) {
    if let Some(value) = env_parse::<u64>("MAPDIR_SELECT_DELAY_MS") {
        config.sync.select_delay_ms = value;
    }
    if let Some(value) = env_parse::<u64>("MAPDIR_DESELECT_DELAY_MS") {
        config.sync.deselect_delay_ms = value;
    }
    if let Some(value) = env_trimmed("MAPDIR_SOURCE_URL") {
        config.source.base_url = value;
    }
    if let Some(value) = env_parse::<u32>("MAPDIR_SOURCE_RESULTS") {
        config.source.results = value;
    }
    if let Some(value) = env_trimmed("MAPDIR_LOG_LEVEL") {
        config.logging.level = Some(value);
    }
    if let Some(value) = env_trimmed("MAPDIR_LOG_DIR") {
        config.logging.dir = Some(PathBuf::from(value));
    }
}

fn env_trimmed(name: &str) -> Option<String> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn env_parse<T>(name: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_trimmed(name)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("event=config_env module=config status=skip var={name} error={err}");
            None
        }
    }
}
