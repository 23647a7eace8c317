use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::model::geo::GeoPosition;

const DEFAULT_SELECT_DELAY_MS: u64 = 600;
const DEFAULT_DESELECT_DELAY_MS: u64 = 100;
const DEFAULT_FOCUSED_ZOOM: f64 = 3.0;
const DEFAULT_OVERVIEW_ZOOM: f64 = 1.0;
const DEFAULT_ANIMATION_DURATION_MS: u64 = 500;
const DEFAULT_FADED_OPACITY: f32 = 0.4;

pub const DEFAULT_SOURCE_URL: &str = "https://randomuser.me/api";
const DEFAULT_SOURCE_RESULTS: u32 = 50;
const DEFAULT_SOURCE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapdirConfig {
    pub sync: SyncConfig,
    pub source: SourceConfig,
    pub logging: LoggingConfig,
}

/// Timing and zoom parameters of the selection/view synchronization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub select_delay_ms: u64,
    pub deselect_delay_ms: u64,
    pub focused_zoom: f64,
    pub overview_zoom: f64,
    pub initial_zoom: f64,
    /// `[longitude, latitude]` in degrees.
    pub initial_center: [f64; 2],
    pub animation_duration_ms: u64,
    pub faded_opacity: f32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            select_delay_ms: DEFAULT_SELECT_DELAY_MS,
            deselect_delay_ms: DEFAULT_DESELECT_DELAY_MS,
            focused_zoom: DEFAULT_FOCUSED_ZOOM,
            overview_zoom: DEFAULT_OVERVIEW_ZOOM,
            initial_zoom: 0.0,
            initial_center: [0.0, 0.0],
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            faded_opacity: DEFAULT_FADED_OPACITY,
        }
    }
}

impl SyncConfig {
    pub fn select_delay(&self) -> Duration {
        Duration::from_millis(self.select_delay_ms)
    }

    pub fn deselect_delay(&self) -> Duration {
        Duration::from_millis(self.deselect_delay_ms)
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn initial_center(&self) -> GeoPosition {
        GeoPosition::new(self.initial_center[0], self.initial_center[1])
    }
}

/// Remote record source parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub results: u32,
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOURCE_URL.to_string(),
            results: DEFAULT_SOURCE_RESULTS,
            timeout_ms: DEFAULT_SOURCE_TIMEOUT_MS,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `None` falls back to `default_log_level()`.
    pub level: Option<String>,
    /// Absolute directory for rolling log files; `None` disables file logs.
    pub dir: Option<PathBuf>,
}
