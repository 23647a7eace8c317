use mapdir_core::service::directory_service::{
    CHANGES_SAVED_MESSAGE, EMPTY_FIELDS_MESSAGE, LOAD_FAILED_MESSAGE,
};
use mapdir_core::{
    Contact, EditError, GeoPosition, HoverEffect, HoverPhase, LayerRole, LoadOutcome, MapSession,
    MountPoint, NotificationLevel, PersonName, Record, RecordEdit, RecordSource, RecordingSurface,
    SessionEvent, SourceError, StaticRecordSource, SurfaceCommand, SyncConfig,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

fn record(first: &str, longitude: f64, latitude: f64) -> Record {
    Record::new(
        Uuid::new_v4(),
        PersonName::new("Mx", first, "Session"),
        GeoPosition::new(longitude, latitude),
    )
    .unwrap()
    .with_contact(Contact {
        email: format!("{first}@example.com"),
        phone: "555-0100".to_string(),
        cell: "555-0199".to_string(),
    })
}

struct FailingSource;

impl RecordSource for FailingSource {
    fn fetch(&self) -> Result<Vec<Record>, SourceError> {
        Err(SourceError::Status(503))
    }
}

struct Clock(Instant);

impl Clock {
    fn at(&self, millis: u64) -> Instant {
        self.0 + Duration::from_millis(millis)
    }
}

fn mounted_session(records: Vec<Record>) -> MapSession<RecordingSurface> {
    let mut session = MapSession::new(SyncConfig::default(), RecordingSurface::new());
    session.load(records).unwrap();
    session.mount(MountPoint::new("map")).unwrap();
    session
}

fn selected_layer(session: &MapSession<RecordingSurface>) -> Vec<Uuid> {
    session
        .surface()
        .features(LayerRole::SelectedMarkers)
        .unwrap()
        .iter()
        .map(|feature| feature.record_id)
        .collect()
}

#[test]
fn hover_reentry_scenario_keeps_then_clears_selection() {
    let (a, b, c) = (
        record("a", 2.35, 48.85),
        record("b", -0.12, 51.5),
        record("c", 13.4, 52.5),
    );
    let a_id = a.id;
    let mut session = mounted_session(vec![a, b, c]);
    let clock = Clock(Instant::now());

    session.hover_enter(a_id, clock.at(0));
    session.advance(clock.at(700));
    assert_eq!(session.selected_records().len(), 1);
    assert_eq!(session.selected_records()[0].id, a_id);
    assert_eq!(session.view_params().center, GeoPosition::new(2.35, 48.85));
    assert_eq!(session.view_params().zoom, 3.0);
    assert_eq!(selected_layer(&session), vec![a_id]);

    session.hover_leave(a_id, clock.at(700));
    session.advance(clock.at(750));
    assert_eq!(session.hover_enter(a_id, clock.at(750)), HoverPhase::Idle);
    session.advance(clock.at(2_000));
    assert_eq!(session.selected_records()[0].id, a_id);

    session.hover_leave(a_id, clock.at(2_000));
    session.advance(clock.at(2_150));
    assert!(session.selected_records().is_empty());
    assert_eq!(session.view_params().zoom, 1.0);
    assert_eq!(session.view_params().center, GeoPosition::new(2.35, 48.85));
    assert!(selected_layer(&session).is_empty());
}

#[test]
fn select_produces_single_coalesced_animation() {
    let a = record("a", 10.0, 10.0);
    let a_id = a.id;
    let mut session = mounted_session(vec![a]);
    let clock = Clock(Instant::now());
    session.surface_mut().take_commands();

    session.hover_enter(a_id, clock.at(0));
    session.advance(clock.at(600));

    let animations: Vec<_> = session
        .surface()
        .commands()
        .iter()
        .filter_map(|command| match command {
            SurfaceCommand::AnimateView { view, duration_ms } => Some((*view, *duration_ms)),
            _ => None,
        })
        .collect();
    assert_eq!(animations.len(), 1);
    assert_eq!(animations[0].0.zoom, 3.0);
    assert_eq!(animations[0].1, 500);
}

#[test]
fn container_leave_clears_selection_immediately() {
    let a = record("a", 10.0, 10.0);
    let b = record("b", 20.0, 20.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut session = mounted_session(vec![a, b]);
    let clock = Clock(Instant::now());

    session.hover_enter(a_id, clock.at(0));
    session.advance(clock.at(600));
    session.hover_enter(b_id, clock.at(650));

    let effect = session.container_leave(clock.at(700));
    assert_eq!(effect, Some(HoverEffect::SelectionCleared));
    assert!(session.selected_records().is_empty());
    assert_eq!(session.view_params().zoom, 1.0);
    assert_eq!(session.next_deadline(), None);
    assert!(session.advance(clock.at(5_000)).is_empty());
}

#[test]
fn removing_selected_record_resets_view_and_layers() {
    let a = record("a", 10.0, 10.0);
    let b = record("b", 20.0, 20.0);
    let a_id = a.id;
    let mut session = mounted_session(vec![a, b]);
    let clock = Clock(Instant::now());

    session.hover_enter(a_id, clock.at(0));
    session.advance(clock.at(600));
    session.hover_leave(a_id, clock.at(610));

    let removed = session.remove_record(a_id, clock.at(620)).unwrap();
    assert!(removed.is_selected);
    assert!(session.selected_records().is_empty());
    assert_eq!(session.view_params().zoom, 1.0);
    assert_eq!(session.hover_phase(a_id), HoverPhase::Idle);
    assert!(selected_layer(&session).is_empty());
    assert_eq!(session.markers().len(), 1);
    assert!(session.remove_record(a_id, clock.at(630)).is_none());
}

#[test]
fn list_items_fade_unselected_rows_while_one_is_selected() {
    let a = record("a", 10.0, 10.0);
    let b = record("b", 20.0, 20.0);
    let a_id = a.id;
    let mut session = mounted_session(vec![a, b]);
    let clock = Clock(Instant::now());

    assert!(session
        .list_items()
        .iter()
        .all(|item| item.opacity == 1.0));

    session.hover_enter(a_id, clock.at(0));
    session.advance(clock.at(600));
    let items = session.list_items();
    assert_eq!(items[0].opacity, 1.0);
    assert!(items[0].is_selected);
    assert_eq!(items[1].opacity, 0.4);
    assert_eq!(items[0].full_name, "a Session");
}

#[test]
fn failed_fetch_leaves_collection_empty_and_notifies_once() {
    let mut session = MapSession::new(SyncConfig::default(), RecordingSurface::new());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    session.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    assert!(matches!(
        session.load_from(&FailingSource),
        LoadOutcome::Failed(SourceError::Status(503))
    ));
    session.load_from(&FailingSource);

    assert!(session.records().is_empty());
    let pending = session.notifications();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].level, NotificationLevel::Error);
    assert_eq!(pending[0].message, LOAD_FAILED_MESSAGE);

    let notified = events
        .lock()
        .unwrap()
        .iter()
        .filter(|event| matches!(event, SessionEvent::Notified(_)))
        .count();
    assert_eq!(notified, 1);

    let id = pending[0].id;
    assert!(session.dismiss_notification(id));
    assert!(session.notifications().is_empty());
}

#[test]
fn load_from_source_populates_once() {
    let mut session = MapSession::new(SyncConfig::default(), RecordingSurface::new());
    let source = StaticRecordSource::new(vec![record("a", 1.0, 1.0), record("b", 2.0, 2.0)]);

    assert!(matches!(session.load_from(&source), LoadOutcome::Loaded(2)));
    assert!(matches!(session.load_from(&source), LoadOutcome::Skipped));
    assert_eq!(session.markers().len(), 2);

    session.mount(MountPoint::new("map")).unwrap();
    assert_eq!(
        session
            .surface()
            .features(LayerRole::UnselectedMarkers)
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn edit_record_validates_and_keeps_selection() {
    let a = record("a", 10.0, 10.0);
    let a_id = a.id;
    let mut session = mounted_session(vec![a]);
    let clock = Clock(Instant::now());
    session.hover_enter(a_id, clock.at(0));
    session.advance(clock.at(600));

    let blank = RecordEdit {
        first: "  ".to_string(),
        last: "Doe".to_string(),
        phone: "1".to_string(),
    };
    assert!(matches!(
        session.edit_record(a_id, &blank),
        Err(EditError::Validation(_))
    ));

    let edit = RecordEdit {
        first: " Jane ".to_string(),
        last: "Doe".to_string(),
        phone: "555-0142".to_string(),
    };
    let saved = session.edit_record(a_id, &edit).unwrap();
    assert_eq!(saved.full_name(), "Jane Doe");
    assert_eq!(saved.contact.phone, "555-0142");
    assert_eq!(saved.contact.email, "a@example.com");
    assert!(saved.is_selected);

    let messages: Vec<_> = session
        .drain_notifications()
        .into_iter()
        .map(|notification| notification.message)
        .collect();
    assert_eq!(messages, vec![EMPTY_FIELDS_MESSAGE, CHANGES_SAVED_MESSAGE]);

    assert!(matches!(
        session.edit_record(Uuid::new_v4(), &edit),
        Err(EditError::RecordNotFound(_))
    ));
}

#[test]
fn explicit_zoom_during_pending_select_is_not_blocked() {
    let a = record("a", 10.0, 10.0);
    let a_id = a.id;
    let mut session = mounted_session(vec![a]);
    let clock = Clock(Instant::now());

    session.hover_enter(a_id, clock.at(0));
    session.set_zoom(5.0, clock.at(100));
    assert_eq!(session.view_params().zoom, 5.0);
    assert_eq!(session.hover_phase(a_id), HoverPhase::PendingSelect);

    session.advance(clock.at(600));
    assert_eq!(session.view_params().zoom, 3.0);
}

#[test]
fn unmount_cancels_timers_and_detaches_surface() {
    let a = record("a", 10.0, 10.0);
    let a_id = a.id;
    let mut session = mounted_session(vec![a]);
    let clock = Clock(Instant::now());

    session.hover_enter(a_id, clock.at(0));
    session.unmount().unwrap();

    assert!(!session.is_mounted());
    assert!(session.surface().attached().is_none());
    assert!(session.advance(clock.at(1_000)).is_empty());
    assert!(session.selected_records().is_empty());
}

#[test]
fn release_item_drops_pending_gesture() {
    let a = record("a", 10.0, 10.0);
    let a_id = a.id;
    let mut session = mounted_session(vec![a]);
    let clock = Clock(Instant::now());

    session.hover_enter(a_id, clock.at(0));
    assert!(session.release_item(a_id));
    assert!(session.advance(clock.at(1_000)).is_empty());
}
