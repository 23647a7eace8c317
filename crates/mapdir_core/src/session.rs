//! Selection/view synchronization session.
//!
//! # Responsibility
//! - Own the record store, view state, hover reconciler, marker renderer
//!   and notification queue for one mounted map view.
//! - Act as the event-loop facade: every UI event enters here and every
//!   dependent state is brought up to date before the call returns.
//!
//! # Invariants
//! - After any call, the marker set equals the projection of the current
//!   collection and, when mounted, the marker layers equal its partition.
//! - Center/zoom changes made within one call produce one animation.
//! - Removing the selected record leaves no selection and resets zoom.

use crate::config::SyncConfig;
use crate::hover::reconciler::{HoverEffect, HoverPhase, HoverReconciler, HoverTimings};
use crate::model::geo::GeoPosition;
use crate::model::marker::{derive_markers, Marker};
use crate::model::record::{Record, RecordId, RecordPatch, RecordValidationError};
use crate::render::marker_layers::{MarkerRenderer, SyncReport};
use crate::render::surface::{MountPoint, RenderSurface};
use crate::render::RenderError;
use crate::service::directory_service::{DirectoryService, EditError, LoadOutcome, RecordEdit};
use crate::service::notifications::{Notification, Notifications};
use crate::source::RecordSource;
use crate::store::listeners::{Listeners, SubscriptionId};
use crate::store::record_store::{CollectionChange, RecordStore};
use crate::store::view_state::{ViewChange, ViewParams, ViewState};
use log::info;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MarkersChanged { revision: u64, report: SyncReport },
    ViewChanged(ViewParams),
    Hover(HoverEffect),
    Notified(Notification),
}

/// List row projection of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub id: RecordId,
    pub full_name: String,
    pub address_line: String,
    pub is_selected: bool,
    /// Faded while another record is selected.
    pub opacity: f32,
}

#[derive(Debug)]
pub struct MapSession<S: RenderSurface> {
    config: SyncConfig,
    records: RecordStore,
    view: ViewState,
    reconciler: HoverReconciler,
    renderer: MarkerRenderer<S>,
    notifications: Notifications,
    derived_revision: u64,
    last_notified_id: u64,
    listeners: Listeners<SessionEvent>,
}

impl<S: RenderSurface> MapSession<S> {
    pub fn new(config: SyncConfig, surface: S) -> Self {
        let view = ViewState::new(ViewParams {
            center: config.initial_center(),
            zoom: config.initial_zoom,
        });
        Self {
            reconciler: HoverReconciler::new(HoverTimings::from(&config)),
            renderer: MarkerRenderer::new(surface, config.animation_duration()),
            config,
            records: RecordStore::new(),
            view,
            notifications: Notifications::new(),
            derived_revision: 0,
            last_notified_id: 0,
            listeners: Listeners::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn mount(&mut self, mount: MountPoint) -> Result<(), RenderError> {
        let report = self
            .renderer
            .mount(mount, self.view.params(), self.view.markers())?;
        self.emit(SessionEvent::MarkersChanged {
            revision: self.records.revision(),
            report,
        });
        Ok(())
    }

    /// Tears the map view down; pending hover timers die with it.
    pub fn unmount(&mut self) -> Result<(), RenderError> {
        let cancelled = self.reconciler.cancel_all();
        self.renderer.unmount()?;
        info!("event=session_unmounted module=session status=ok cancelled_timers={cancelled}");
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.renderer.is_mounted()
    }

    pub fn load(&mut self, records: Vec<Record>) -> Result<bool, RecordValidationError> {
        let loaded = self.records.load(records)?;
        self.sync_markers();
        Ok(loaded)
    }

    pub fn load_from(&mut self, source: &dyn RecordSource) -> LoadOutcome {
        let outcome =
            DirectoryService::new(&mut self.records, &mut self.notifications).load_from(source);
        self.sync_markers();
        self.emit_new_notifications();
        outcome
    }

    pub fn edit_record(&mut self, id: RecordId, edit: &RecordEdit) -> Result<Record, EditError> {
        let result =
            DirectoryService::new(&mut self.records, &mut self.notifications).edit_record(id, edit);
        self.sync_markers();
        self.emit_new_notifications();
        result
    }

    pub fn update_record(
        &mut self,
        id: RecordId,
        patch: &RecordPatch,
    ) -> Result<bool, RecordValidationError> {
        let updated = self.records.update(id, patch)?;
        self.sync_markers();
        Ok(updated)
    }

    /// Removes a record, cancelling its timers first.
    ///
    /// Removing the selected record clears selection and resets zoom to
    /// the overview level.
    pub fn remove_record(&mut self, id: RecordId, now: Instant) -> Option<Record> {
        self.reconciler.release(id);
        let removed = self.records.remove(id)?;
        if removed.is_selected {
            self.view.set_zoom(self.config.overview_zoom);
            info!("event=selection_cleared module=session status=ok trigger=remove id={id}");
        }
        self.sync_markers();
        self.flush_view(now);
        Some(removed)
    }

    pub fn hover_enter(&mut self, id: RecordId, now: Instant) -> HoverPhase {
        self.reconciler.hover_enter(id, now, &self.records)
    }

    pub fn hover_leave(&mut self, id: RecordId, now: Instant) -> HoverPhase {
        self.reconciler.hover_leave(id, now, &self.records)
    }

    pub fn container_enter(&mut self, now: Instant) -> Option<HoverEffect> {
        self.container_crossed(now)
    }

    pub fn container_leave(&mut self, now: Instant) -> Option<HoverEffect> {
        self.container_crossed(now)
    }

    /// Fires due hover timers and propagates their effects.
    pub fn advance(&mut self, now: Instant) -> Vec<HoverEffect> {
        let effects = self
            .reconciler
            .fire_due(now, &mut self.records, &mut self.view);
        self.sync_markers();
        self.flush_view(now);
        for effect in &effects {
            self.emit(SessionEvent::Hover(*effect));
        }
        effects
    }

    /// Earliest instant at which `advance` has work to do.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.reconciler.next_deadline()
    }

    /// List item teardown: drops any timer armed for `id`.
    pub fn release_item(&mut self, id: RecordId) -> bool {
        self.reconciler.release(id)
    }

    /// Explicit user zoom; never blocked by pending hover gestures.
    pub fn set_zoom(&mut self, level: f64, now: Instant) {
        self.view.set_zoom(level);
        self.flush_view(now);
    }

    /// Explicit user pan.
    pub fn set_center(&mut self, center: GeoPosition, now: Instant) {
        self.view.set_center(center);
        self.flush_view(now);
    }

    pub fn records(&self) -> &[Record] {
        self.records.records()
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn selected_records(&self) -> Vec<&Record> {
        self.records.selected().into_iter().collect()
    }

    pub fn list_items(&self) -> Vec<ListItem> {
        let any_selected = self.records.selected().is_some();
        self.records
            .records()
            .iter()
            .map(|record| ListItem {
                id: record.id,
                full_name: record.full_name(),
                address_line: record.address_line(),
                is_selected: record.is_selected,
                opacity: if any_selected && !record.is_selected {
                    self.config.faded_opacity
                } else {
                    1.0
                },
            })
            .collect()
    }

    pub fn hover_phase(&self, id: RecordId) -> HoverPhase {
        self.reconciler.phase(id)
    }

    pub fn view_params(&self) -> ViewParams {
        self.view.params()
    }

    pub fn markers(&self) -> &[Marker] {
        self.view.markers()
    }

    pub fn renderer(&self) -> &MarkerRenderer<S> {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.renderer.surface_mut()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.pending()
    }

    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        self.notifications.dismiss(id)
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SessionEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn subscribe_collection(
        &mut self,
        listener: impl FnMut(&CollectionChange) + Send + 'static,
    ) -> SubscriptionId {
        self.records.subscribe(listener)
    }

    pub fn subscribe_view(
        &mut self,
        listener: impl FnMut(&ViewChange) + Send + 'static,
    ) -> SubscriptionId {
        self.view.subscribe(listener)
    }

    fn container_crossed(&mut self, now: Instant) -> Option<HoverEffect> {
        let effect = self
            .reconciler
            .container_crossed(&mut self.records, &mut self.view);
        self.sync_markers();
        self.flush_view(now);
        if let Some(effect) = effect {
            self.emit(SessionEvent::Hover(effect));
        }
        effect
    }

    /// Re-derives markers and syncs layers when the collection moved on.
    fn sync_markers(&mut self) {
        let revision = self.records.revision();
        if revision == self.derived_revision {
            return;
        }
        self.derived_revision = revision;

        self.view.set_markers(derive_markers(self.records.records()));
        let report = self.renderer.sync(self.view.markers());
        self.emit(SessionEvent::MarkersChanged { revision, report });
    }

    fn flush_view(&mut self, now: Instant) {
        let Some(params) = self.view.take_params_change() else {
            return;
        };
        self.renderer.animate_to(params, now);
        self.emit(SessionEvent::ViewChanged(params));
    }

    fn emit_new_notifications(&mut self) {
        let fresh: Vec<Notification> = self
            .notifications
            .pending()
            .iter()
            .filter(|notification| notification.id > self.last_notified_id)
            .cloned()
            .collect();
        for notification in fresh {
            self.last_notified_id = notification.id;
            self.emit(SessionEvent::Notified(notification));
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.listeners.notify(&event);
    }
}
