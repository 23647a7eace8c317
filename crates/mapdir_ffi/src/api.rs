//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the map session to Dart via FRB as sync, use-case-level calls.
//! - Hand recorded surface commands to the host, which replays them on
//!   its own map widget.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One session per process; every call runs under its lock.
//! - Record ids cross the boundary as hyphenated UUID strings.

use log::warn;
use mapdir_core::config::apply_env_overrides;
use mapdir_core::source::decode_response;
use mapdir_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, GeoPosition, HoverEffect, HoverPhase, LoadOutcome, LoggingConfig,
    MapSession, MapdirConfig, MountPoint, NotificationLevel, RandomUserSource, RecordEdit,
    RecordId, RecordingSurface,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;
use uuid::Uuid;

static SESSION: OnceLock<Mutex<MapSession<RecordingSurface>>> = OnceLock::new();
static CONFIG: OnceLock<MapdirConfig> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl MapActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// One row of the record list.
#[derive(Debug, Clone, PartialEq)]
pub struct MapListItem {
    pub record_id: String,
    pub full_name: String,
    pub address_line: String,
    pub is_selected: bool,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapNotification {
    pub id: u64,
    /// `info|success|error`.
    pub level: String,
    pub message: String,
}

/// Result of driving the hover timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTickResponse {
    /// `selected:<id>`, `deselected:<id>` or `cleared`, in firing order.
    pub effects: Vec<String>,
    /// Milliseconds until the next timer is due; `None` when idle.
    pub next_tick_ms: Option<u64>,
}

/// Attaches the map surface to the host element `mount_id`.
///
/// # FFI contract
/// - Sync call; constructs the layer stack and emits its commands.
/// - A second mount without `map_unmount` fails.
#[flutter_rust_bridge::frb(sync)]
pub fn map_mount(mount_id: String) -> MapActionResponse {
    let mount_id = mount_id.trim().to_string();
    if mount_id.is_empty() {
        return MapActionResponse::failure("map_mount failed: mount_id cannot be empty");
    }
    with_session(|session| match session.mount(MountPoint::new(mount_id)) {
        Ok(()) => MapActionResponse::success("Map mounted."),
        Err(err) => MapActionResponse::failure(format!("map_mount failed: {err}")),
    })
}

/// Detaches the map surface and cancels pending hover timers.
#[flutter_rust_bridge::frb(sync)]
pub fn map_unmount() -> MapActionResponse {
    with_session(|session| match session.unmount() {
        Ok(()) => MapActionResponse::success("Map unmounted."),
        Err(err) => MapActionResponse::failure(format!("map_unmount failed: {err}")),
    })
}

/// Fetches the initial batch from the configured record source.
///
/// # FFI contract
/// - Sync call; performs one blocking HTTP request.
/// - Failures also queue a user-facing notification.
#[flutter_rust_bridge::frb(sync)]
pub fn map_load_remote() -> MapActionResponse {
    let source = match RandomUserSource::new(&resolve_config().source) {
        Ok(source) => source,
        Err(err) => return MapActionResponse::failure(format!("map_load_remote failed: {err}")),
    };
    with_session(|session| load_outcome_response(session.load_from(&source)))
}

/// Loads a batch from a randomuser-shaped JSON body already fetched by the host.
#[flutter_rust_bridge::frb(sync)]
pub fn map_load_json(body: String) -> MapActionResponse {
    let records = match decode_response(&body) {
        Ok(records) => records,
        Err(err) => return MapActionResponse::failure(format!("map_load_json failed: {err}")),
    };
    with_session(|session| match session.load(records) {
        Ok(true) => MapActionResponse::success(format!(
            "Loaded {} record(s).",
            session.records().len()
        )),
        Ok(false) => MapActionResponse::success("Already loaded."),
        Err(err) => MapActionResponse::failure(format!("map_load_json failed: {err}")),
    })
}

/// Pointer entered a list item. Returns the item's hover phase label.
#[flutter_rust_bridge::frb(sync)]
pub fn map_hover_enter(record_id: String) -> String {
    match parse_record_id(&record_id) {
        Ok(id) => phase_label(with_session(|session| session.hover_enter(id, Instant::now()))),
        Err(err) => err,
    }
}

/// Pointer left a list item. Returns the item's hover phase label.
#[flutter_rust_bridge::frb(sync)]
pub fn map_hover_leave(record_id: String) -> String {
    match parse_record_id(&record_id) {
        Ok(id) => phase_label(with_session(|session| session.hover_leave(id, Instant::now()))),
        Err(err) => err,
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn map_container_enter() -> bool {
    with_session(|session| session.container_enter(Instant::now()).is_some())
}

#[flutter_rust_bridge::frb(sync)]
pub fn map_container_leave() -> bool {
    with_session(|session| session.container_leave(Instant::now()).is_some())
}

/// List item teardown; drops any timer armed for the item.
#[flutter_rust_bridge::frb(sync)]
pub fn map_release_item(record_id: String) -> bool {
    match parse_record_id(&record_id) {
        Ok(id) => with_session(|session| session.release_item(id)),
        Err(_) => false,
    }
}

/// Fires due hover timers.
///
/// # FFI contract
/// - The host calls this again after `next_tick_ms`.
#[flutter_rust_bridge::frb(sync)]
pub fn map_tick() -> MapTickResponse {
    with_session(|session| {
        let now = Instant::now();
        let effects = session
            .advance(now)
            .into_iter()
            .map(effect_label)
            .collect();
        let next_tick_ms = session.next_deadline().map(|deadline| {
            u64::try_from(deadline.saturating_duration_since(now).as_millis()).unwrap_or(u64::MAX)
        });
        MapTickResponse {
            effects,
            next_tick_ms,
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn map_set_zoom(level: f64) {
    with_session(|session| session.set_zoom(level, Instant::now()));
}

/// Pans the view to `longitude`/`latitude` (degrees) at the current zoom.
///
/// # FFI contract
/// - Out-of-range or non-finite coordinates are rejected and leave the view as is.
#[flutter_rust_bridge::frb(sync)]
pub fn map_set_center(longitude: f64, latitude: f64) -> MapActionResponse {
    let center = GeoPosition::new(longitude, latitude);
    if let Err(err) = center.validate() {
        return MapActionResponse::failure(format!("map_set_center failed: {err}"));
    }
    with_session(|session| session.set_center(center, Instant::now()));
    MapActionResponse::success("Center updated.")
}

#[flutter_rust_bridge::frb(sync)]
pub fn map_list_items() -> Vec<MapListItem> {
    with_session(|session| {
        session
            .list_items()
            .into_iter()
            .map(|item| MapListItem {
                record_id: item.id.to_string(),
                full_name: item.full_name,
                address_line: item.address_line,
                is_selected: item.is_selected,
                opacity: item.opacity,
            })
            .collect()
    })
}

/// Drains recorded surface commands as JSON objects tagged by `command`.
#[flutter_rust_bridge::frb(sync)]
pub fn map_drain_surface_commands() -> Vec<String> {
    with_session(|session| {
        session
            .surface_mut()
            .take_commands()
            .iter()
            .filter_map(|command| match serde_json::to_string(command) {
                Ok(json) => Some(json),
                Err(err) => {
                    warn!("event=surface_command_encode module=ffi status=error error={err}");
                    None
                }
            })
            .collect()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn map_drain_notifications() -> Vec<MapNotification> {
    with_session(|session| {
        session
            .drain_notifications()
            .into_iter()
            .map(|notification| MapNotification {
                id: notification.id,
                level: level_label(notification.level).to_string(),
                message: notification.message,
            })
            .collect()
    })
}

/// Saves a name/phone edit. Empty fields are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn map_edit_record(
    record_id: String,
    first: String,
    last: String,
    phone: String,
) -> MapActionResponse {
    let id = match parse_record_id(&record_id) {
        Ok(id) => id,
        Err(err) => return MapActionResponse::failure(err),
    };
    let edit = RecordEdit { first, last, phone };
    with_session(|session| match session.edit_record(id, &edit) {
        Ok(_) => MapActionResponse::success("Changes saved."),
        Err(err) => MapActionResponse::failure(format!("map_edit_record failed: {err}")),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn map_remove_record(record_id: String) -> MapActionResponse {
    let id = match parse_record_id(&record_id) {
        Ok(id) => id,
        Err(err) => return MapActionResponse::failure(err),
    };
    with_session(|session| match session.remove_record(id, Instant::now()) {
        Some(_) => MapActionResponse::success("Record removed."),
        None => MapActionResponse::failure(format!("map_remove_record failed: unknown id {id}")),
    })
}

fn resolve_config() -> &'static MapdirConfig {
    CONFIG.get_or_init(|| {
        let loaded = match std::env::var("MAPDIR_CONFIG_PATH") {
            Ok(raw) if !raw.trim().is_empty() => MapdirConfig::load(&PathBuf::from(raw.trim())),
            _ => {
                let mut config = MapdirConfig::default();
                apply_env_overrides(&mut config);
                config.validate().map(|()| config)
            }
        };
        loaded.unwrap_or_else(|err| {
            warn!("event=config_load module=ffi status=fallback error={err}");
            MapdirConfig::default()
        })
    })
}

fn with_session<R>(f: impl FnOnce(&mut MapSession<RecordingSurface>) -> R) -> R {
    let session = SESSION.get_or_init(|| {
        let config = resolve_config();
        start_configured_logging(&config.logging);
        Mutex::new(MapSession::new(config.sync.clone(), RecordingSurface::new()))
    });
    let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Starts file logging when `[logging].dir` or `MAPDIR_LOG_DIR` is set.
///
/// A host that calls `init_logging` first keeps its settings; a conflicting
/// configured directory is reported and ignored.
fn start_configured_logging(config: &LoggingConfig) {
    match init_logging_from_config(config) {
        Ok(true) => log::info!("event=config_logging module=ffi status=ok"),
        Ok(false) => {}
        Err(err) => warn!("event=config_logging module=ffi status=error error={err}"),
    }
}

fn parse_record_id(raw: &str) -> Result<RecordId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid record id `{}`", raw.trim()))
}

fn load_outcome_response(outcome: LoadOutcome) -> MapActionResponse {
    match outcome {
        LoadOutcome::Loaded(count) => {
            MapActionResponse::success(format!("Loaded {count} record(s)."))
        }
        LoadOutcome::Skipped => MapActionResponse::success("Already loaded."),
        LoadOutcome::Failed(err) => {
            MapActionResponse::failure(format!("map_load_remote failed: {err}"))
        }
    }
}

fn phase_label(phase: HoverPhase) -> String {
    match phase {
        HoverPhase::Idle => "idle",
        HoverPhase::PendingSelect => "pending_select",
        HoverPhase::PendingDeselect => "pending_deselect",
    }
    .to_string()
}

fn effect_label(effect: HoverEffect) -> String {
    match effect {
        HoverEffect::Selected { id, .. } => format!("selected:{id}"),
        HoverEffect::Deselected { id } => format!("deselected:{id}"),
        HoverEffect::SelectionCleared => "cleared".to_string(),
    }
}

fn level_label(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "success",
        NotificationLevel::Error => "error",
    }
}
