//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `mapdir_core` linkage.
//! - Replay a fixed hover sequence against a headless surface with
//!   deterministic output.

use mapdir_core::config::apply_env_overrides;
use mapdir_core::{
    flush_logs, init_logging_from_config, GeoPosition, MapSession, MapdirConfig, MountPoint,
    PersonName, Record, RecordingSurface, SyncConfig,
};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use uuid::Uuid;

fn main() -> ExitCode {
    println!("mapdir_core version={}", mapdir_core::core_version());
    start_logging();
    let result = replay();
    flush_logs();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mapdir_cli replay failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// File logs are written only when `MAPDIR_LOG_DIR` is set.
fn start_logging() {
    let mut config = MapdirConfig::default();
    apply_env_overrides(&mut config);
    if let Err(err) = init_logging_from_config(&config.logging) {
        eprintln!("mapdir_cli logging disabled: {err}");
    }
}

fn replay() -> Result<(), Box<dyn std::error::Error>> {
    let records = vec![
        probe_record(1, "Ada", 2.35, 48.85)?,
        probe_record(2, "Ben", -0.12, 51.5)?,
        probe_record(3, "Cy", 13.4, 52.5)?,
    ];
    let first = records[0].id;

    let mut session = MapSession::new(SyncConfig::default(), RecordingSurface::new());
    session.load(records)?;
    session.mount(MountPoint::new("probe"))?;

    let start = Instant::now();
    let at = |millis: u64| start + Duration::from_millis(millis);
    session.hover_enter(first, at(0));
    session.advance(at(700));
    report(&session, "hover 700ms");

    session.hover_leave(first, at(700));
    session.advance(at(750));
    session.hover_enter(first, at(750));
    session.advance(at(900));
    report(&session, "re-enter");

    session.hover_leave(first, at(900));
    session.advance(at(1_050));
    report(&session, "leave 150ms");

    session.unmount()?;
    println!(
        "surface commands={}",
        session.surface().commands().len()
    );
    Ok(())
}

fn probe_record(
    seed: u128,
    first: &str,
    longitude: f64,
    latitude: f64,
) -> Result<Record, mapdir_core::RecordValidationError> {
    Record::new(
        Uuid::from_u128(seed),
        PersonName::new("", first, "Probe"),
        GeoPosition::new(longitude, latitude),
    )
}

fn report(session: &MapSession<RecordingSurface>, step: &str) {
    let selected = session
        .selected_records()
        .first()
        .map(|record| record.full_name())
        .unwrap_or_else(|| "-".to_string());
    let view = session.view_params();
    println!(
        "step={step:?} selected={selected:?} zoom={} center=({}, {})",
        view.zoom, view.center.longitude, view.center.latitude
    );
}
