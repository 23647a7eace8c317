use mapdir_core::{
    derive_markers, Feature, GeoPosition, LayerHandle, LayerRole, LayerSpec, MarkerRenderer,
    MountPoint, PersonName, Record, RecordStore, RecordingSurface, RenderError, RenderSurface,
    SurfaceCommand, SurfaceView, SyncReport, ViewParams,
};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use uuid::Uuid;

fn record(first: &str, longitude: f64, latitude: f64) -> Record {
    Record::new(
        Uuid::new_v4(),
        PersonName::new("Ms", first, "Layer"),
        GeoPosition::new(longitude, latitude),
    )
    .unwrap()
}

fn overview() -> ViewParams {
    ViewParams {
        center: GeoPosition::ORIGIN,
        zoom: 1.0,
    }
}

fn store_with(count: usize) -> RecordStore {
    let mut store = RecordStore::new();
    let batch = (0..count)
        .map(|index| record(&format!("r{index}"), index as f64, index as f64))
        .collect();
    store.load(batch).unwrap();
    store
}

fn renderer() -> MarkerRenderer<RecordingSurface> {
    MarkerRenderer::new(RecordingSurface::new(), Duration::from_millis(500))
}

fn layer_ids(surface: &RecordingSurface, role: LayerRole) -> HashSet<Uuid> {
    surface
        .features(role)
        .unwrap()
        .iter()
        .map(|feature| feature.record_id)
        .collect()
}

#[test]
fn sync_before_mount_touches_nothing() {
    let store = store_with(3);
    let mut renderer = renderer();

    let report = renderer.sync(&derive_markers(store.records()));
    assert_eq!(report, SyncReport::Skipped);
    assert!(renderer.surface().commands().is_empty());
}

#[test]
fn mount_builds_three_layers_once_and_populates_markers() {
    let store = store_with(3);
    let mut renderer = renderer();

    let report = renderer
        .mount(
            MountPoint::new("map"),
            overview(),
            &derive_markers(store.records()),
        )
        .unwrap();
    assert_eq!(
        report,
        SyncReport::Applied {
            selected_rebuilt: false,
            unselected_rebuilt: true,
        }
    );

    let surface = renderer.surface();
    let constructs = surface
        .commands()
        .iter()
        .filter(|command| matches!(command, SurfaceCommand::Construct { .. }))
        .count();
    assert_eq!(constructs, 1);
    match &surface.commands()[0] {
        SurfaceCommand::Construct { layers, view } => {
            assert_eq!(layers.len(), 3);
            assert_eq!(layers[0].role, LayerRole::BaseTiles);
            assert_eq!(view.zoom, 1.0);
        }
        other => panic!("unexpected first command: {other:?}"),
    }
    assert_eq!(surface.attached(), Some(&MountPoint::new("map")));
    assert_eq!(layer_ids(surface, LayerRole::UnselectedMarkers).len(), 3);
    assert!(layer_ids(surface, LayerRole::SelectedMarkers).is_empty());
}

#[test]
fn second_mount_is_rejected_and_keeps_live_surface() {
    let mut renderer = renderer();
    renderer
        .mount(MountPoint::new("map"), overview(), &[])
        .unwrap();

    let err = renderer
        .mount(MountPoint::new("other"), overview(), &[])
        .unwrap_err();
    assert_eq!(err, RenderError::AlreadyMounted(MountPoint::new("map")));
    assert_eq!(renderer.mount_point(), Some(&MountPoint::new("map")));
}

#[test]
fn layers_equal_selection_partition_after_each_change() {
    let mut store = store_with(4);
    let ids: Vec<Uuid> = store.records().iter().map(|record| record.id).collect();
    let mut renderer = renderer();
    renderer
        .mount(
            MountPoint::new("map"),
            overview(),
            &derive_markers(store.records()),
        )
        .unwrap();

    for target in [Some(ids[1]), Some(ids[3]), None, Some(ids[0])] {
        store.select(target);
        renderer.sync(&derive_markers(store.records()));

        let surface = renderer.surface();
        let selected = layer_ids(surface, LayerRole::SelectedMarkers);
        let unselected = layer_ids(surface, LayerRole::UnselectedMarkers);
        assert!(selected.is_disjoint(&unselected));
        assert_eq!(selected.len() + unselected.len(), ids.len());
        assert_eq!(selected, target.into_iter().collect::<HashSet<_>>());
    }
}

#[test]
fn unchanged_partition_is_not_rebuilt() {
    let mut store = store_with(3);
    let a = store.records()[0].id;
    let b = store.records()[1].id;
    let mut renderer = renderer();
    renderer
        .mount(
            MountPoint::new("map"),
            overview(),
            &derive_markers(store.records()),
        )
        .unwrap();

    let report = renderer.sync(&derive_markers(store.records()));
    assert_eq!(
        report,
        SyncReport::Applied {
            selected_rebuilt: false,
            unselected_rebuilt: false,
        }
    );

    store.select(Some(a));
    renderer.sync(&derive_markers(store.records()));
    let repaints = renderer
        .surface()
        .repaint_count(LayerRole::SelectedMarkers);

    store.select(Some(b));
    let report = renderer.sync(&derive_markers(store.records()));
    assert_eq!(
        report,
        SyncReport::Applied {
            selected_rebuilt: true,
            unselected_rebuilt: true,
        }
    );
    assert_eq!(
        renderer
            .surface()
            .repaint_count(LayerRole::SelectedMarkers),
        repaints + 1
    );
}

#[test]
fn removing_selected_record_leaves_no_dangling_marker() {
    let mut store = store_with(3);
    let a = store.records()[0].id;
    let mut renderer = renderer();
    renderer
        .mount(
            MountPoint::new("map"),
            overview(),
            &derive_markers(store.records()),
        )
        .unwrap();
    store.select(Some(a));
    renderer.sync(&derive_markers(store.records()));

    store.remove(a);
    renderer.sync(&derive_markers(store.records()));

    let surface = renderer.surface();
    assert!(layer_ids(surface, LayerRole::SelectedMarkers).is_empty());
    assert!(!layer_ids(surface, LayerRole::UnselectedMarkers).contains(&a));
    assert_eq!(renderer.applied().len(), 2);
}

#[test]
fn newer_view_request_supersedes_running_animation() {
    let mut renderer = renderer();
    renderer
        .mount(MountPoint::new("map"), overview(), &[])
        .unwrap();
    let start = Instant::now();

    let focused = ViewParams {
        center: GeoPosition::new(45.0, 30.0),
        zoom: 3.0,
    };
    assert!(renderer.animate_to(focused, start));
    assert!(renderer.animate_to(overview(), start + Duration::from_millis(200)));

    let animation = renderer.animation();
    assert_eq!(animation.target().zoom, 1.0);
    let settled = start + Duration::from_millis(700);
    assert!(!animation.is_animating(settled));
    assert_eq!(animation.view_at(settled).zoom, 1.0);
    assert_eq!(renderer.surface().animation_count(), 2);
}

#[test]
fn animate_without_mount_is_ignored() {
    let mut renderer = renderer();
    assert!(!renderer.animate_to(overview(), Instant::now()));
    assert_eq!(renderer.surface().animation_count(), 0);
}

#[test]
fn unmount_detaches_and_allows_remount() {
    let store = store_with(2);
    let markers = derive_markers(store.records());
    let mut renderer = renderer();
    renderer
        .mount(MountPoint::new("map"), overview(), &markers)
        .unwrap();

    renderer.unmount().unwrap();
    assert!(!renderer.is_mounted());
    assert!(renderer.surface().attached().is_none());
    assert_eq!(renderer.unmount().unwrap_err(), RenderError::NotMounted);
    assert_eq!(renderer.sync(&markers), SyncReport::Skipped);

    renderer
        .mount(MountPoint::new("map"), overview(), &markers)
        .unwrap();
    assert_eq!(
        layer_ids(renderer.surface(), LayerRole::UnselectedMarkers).len(),
        2
    );
}

/// Surface that builds views but cannot attach them, or hands back too few
/// layer handles.
#[derive(Default)]
struct BrokenSurface {
    short_handles: bool,
    live_views: usize,
    detaches: usize,
}

impl RenderSurface for BrokenSurface {
    fn construct(
        &mut self,
        layers: &[LayerSpec],
        _initial: SurfaceView,
    ) -> Result<Vec<LayerHandle>, RenderError> {
        self.live_views += 1;
        let count = if self.short_handles { 1 } else { layers.len() };
        Ok((0..count).map(|index| LayerHandle(index as u32)).collect())
    }

    fn attach(&mut self, mount: &MountPoint) -> Result<(), RenderError> {
        Err(RenderError::MountOccupied(mount.clone()))
    }

    fn detach(&mut self) {
        self.live_views = self.live_views.saturating_sub(1);
        self.detaches += 1;
    }

    fn animate_view(&mut self, _target: SurfaceView, _duration: Duration) {}

    fn replace_features(&mut self, _layer: LayerHandle, _features: Vec<Feature>) {}

    fn repaint(&mut self, _layer: LayerHandle) {}
}

#[test]
fn failed_attach_discards_constructed_view() {
    let mut renderer = MarkerRenderer::new(BrokenSurface::default(), Duration::from_millis(500));

    let err = renderer
        .mount(MountPoint::new("map"), overview(), &[])
        .unwrap_err();
    assert_eq!(err, RenderError::MountOccupied(MountPoint::new("map")));
    assert!(!renderer.is_mounted());
    assert_eq!(renderer.surface().live_views, 0);
    assert_eq!(renderer.surface().detaches, 1);
}

#[test]
fn missing_layer_handles_discard_constructed_view() {
    let surface = BrokenSurface {
        short_handles: true,
        ..BrokenSurface::default()
    };
    let mut renderer = MarkerRenderer::new(surface, Duration::from_millis(500));

    let err = renderer
        .mount(MountPoint::new("map"), overview(), &[])
        .unwrap_err();
    assert!(matches!(err, RenderError::Construction(_)));
    assert!(!renderer.is_mounted());
    assert_eq!(renderer.surface().live_views, 0);
}
