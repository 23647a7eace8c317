//! Runtime configuration.
//!
//! # Responsibility
//! - Define timing, zoom, source, and logging settings with defaults.
//! - Load settings from a TOML file layered with `MAPDIR_*` env overrides.
//!
//! # Invariants
//! - Every field has a default; an empty file is a valid config.
//! - `validate()` runs after every load path.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod load;
mod schema;

pub use load::apply_env_overrides;
pub use schema::{LoggingConfig, MapdirConfig, SourceConfig, SyncConfig, DEFAULT_SOURCE_URL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Read { path: PathBuf, message: String },
    Parse(String),
    Serialize(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "failed to read config `{}`: {message}", path.display())
            }
            Self::Parse(message) => write!(f, "failed to parse config: {message}"),
            Self::Serialize(message) => write!(f, "failed to serialize config: {message}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {}

impl MapdirConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sync = &self.sync;
        if sync.select_delay_ms == 0 {
            return Err(ConfigError::Invalid("sync.select_delay_ms must be > 0".into()));
        }
        if sync.deselect_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "sync.deselect_delay_ms must be > 0".into(),
            ));
        }
        for (name, zoom) in [
            ("sync.focused_zoom", sync.focused_zoom),
            ("sync.overview_zoom", sync.overview_zoom),
            ("sync.initial_zoom", sync.initial_zoom),
        ] {
            if !zoom.is_finite() || zoom < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite, non-negative number"
                )));
            }
        }
        if !(0.0..=1.0).contains(&sync.faded_opacity) {
            return Err(ConfigError::Invalid(
                "sync.faded_opacity must be within [0, 1]".into(),
            ));
        }
        sync.initial_center()
            .validate()
            .map_err(|err| ConfigError::Invalid(format!("sync.initial_center: {err}")))?;

        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("source.base_url must not be empty".into()));
        }
        if self.source.results == 0 {
            return Err(ConfigError::Invalid("source.results must be > 0".into()));
        }
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be absolute, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
