use mapdir_core::{ConfigError, MapdirConfig};
use std::fs;
use std::time::Duration;

#[test]
fn load_reads_file_layer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapdir.toml");
    fs::write(
        &path,
        "[sync]\nselect_delay_ms = 800\nfaded_opacity = 0.25\n\n[source]\ntimeout_ms = 2500\n",
    )
    .unwrap();

    let config = MapdirConfig::load(&path).unwrap();
    assert_eq!(config.sync.select_delay(), Duration::from_millis(800));
    assert_eq!(config.sync.faded_opacity, 0.25);
    assert_eq!(config.source.timeout(), Duration::from_millis(2500));
    assert_eq!(config.sync.deselect_delay(), Duration::from_millis(100));
}

#[test]
fn load_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = MapdirConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.sync.focused_zoom, 3.0);
    assert_eq!(config.sync.overview_zoom, 1.0);
    assert!(config.logging.dir.is_none());
}

#[test]
fn load_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[sync\nselect_delay_ms = ").unwrap();

    let err = MapdirConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_rejects_out_of_range_initial_center() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("center.toml");
    fs::write(&path, "[sync]\ninitial_center = [0.0, 95.0]\n").unwrap();

    let err = MapdirConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("initial_center"));
}

#[test]
fn written_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.toml");
    let mut config = MapdirConfig::default();
    config.sync.focused_zoom = 4.0;
    config.logging.dir = Some(dir.path().join("logs"));
    fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    let loaded = MapdirConfig::load(&path).unwrap();
    assert_eq!(loaded.sync.focused_zoom, 4.0);
    assert_eq!(loaded.logging.dir, config.logging.dir);
}
