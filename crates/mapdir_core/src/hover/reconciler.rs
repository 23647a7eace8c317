//! Debounced hover-to-selection state machine.
//!
//! # Responsibility
//! - Turn raw hover-enter/hover-leave events on list items into record
//!   selection and view recentering.
//! - Provide the container-level escape path that clears selection at once.
//!
//! # States (per record)
//! | phase             | event                    | next              | effect                          |
//! |-------------------|--------------------------|-------------------|---------------------------------|
//! | `Idle`            | enter, unselected        | `PendingSelect`   | arm select timer                |
//! | `PendingSelect`   | leave                    | `Idle`            | cancel timer                    |
//! | `PendingSelect`   | select timer fires       | `Idle`            | select, recenter, focused zoom  |
//! | `Idle`            | leave, selected          | `PendingDeselect` | arm deselect timer              |
//! | `PendingDeselect` | enter                    | `Idle`            | cancel timer                    |
//! | `PendingDeselect` | deselect timer fires     | `Idle`            | clear selection, overview zoom  |
//! | any               | container enter/leave    | `Idle`            | cancel all, clear, overview     |
//!
//! # Invariants
//! - A record has at most one armed timer, so it can never be both
//!   `PendingSelect` and `PendingDeselect`.
//! - Only one record may be mid-selection-gesture at a time.
//! - Timer callbacks re-check the record before acting; a deleted or
//!   already-(de)selected record turns the callback into a no-op.

use crate::config::SyncConfig;
use crate::hover::timer::TimerQueue;
use crate::model::geo::GeoPosition;
use crate::model::record::RecordId;
use crate::store::record_store::RecordStore;
use crate::store::view_state::ViewState;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Observable phase of one record's hover gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverPhase {
    Idle,
    PendingSelect,
    PendingDeselect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    Select,
    Deselect,
}

impl From<PendingAction> for HoverPhase {
    fn from(value: PendingAction) -> Self {
        match value {
            PendingAction::Select => Self::PendingSelect,
            PendingAction::Deselect => Self::PendingDeselect,
        }
    }
}

/// Delays and zoom levels used by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverTimings {
    pub select_delay: Duration,
    pub deselect_delay: Duration,
    pub focused_zoom: f64,
    pub overview_zoom: f64,
}

impl Default for HoverTimings {
    fn default() -> Self {
        Self::from(&SyncConfig::default())
    }
}

impl From<&SyncConfig> for HoverTimings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            select_delay: config.select_delay(),
            deselect_delay: config.deselect_delay(),
            focused_zoom: config.focused_zoom,
            overview_zoom: config.overview_zoom,
        }
    }
}

/// Side effect applied to the stores by a resolved gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverEffect {
    Selected { id: RecordId, center: GeoPosition },
    Deselected { id: RecordId },
    SelectionCleared,
}

#[derive(Debug)]
pub struct HoverReconciler {
    timings: HoverTimings,
    timers: TimerQueue<RecordId, PendingAction>,
}

impl HoverReconciler {
    pub fn new(timings: HoverTimings) -> Self {
        Self {
            timings,
            timers: TimerQueue::new(),
        }
    }

    pub fn timings(&self) -> HoverTimings {
        self.timings
    }

    pub fn phase(&self, id: RecordId) -> HoverPhase {
        self.timers
            .payload(&id)
            .map(HoverPhase::from)
            .unwrap_or(HoverPhase::Idle)
    }

    /// Record currently waiting for its select timer, if any.
    pub fn select_gesture(&self) -> Option<RecordId> {
        self.timers
            .iter()
            .find(|(_, action)| *action == PendingAction::Select)
            .map(|(id, _)| *id)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    pub fn hover_enter(&mut self, id: RecordId, now: Instant, records: &RecordStore) -> HoverPhase {
        let Some(record) = records.get(id) else {
            debug!("event=hover_enter module=hover status=skip reason=unknown_id id={id}");
            return self.phase(id);
        };

        match self.timers.payload(&id) {
            Some(PendingAction::Deselect) => {
                self.timers.cancel(&id);
                debug!("event=hover_reenter module=hover status=ok id={id} cancelled=deselect");
                return HoverPhase::Idle;
            }
            Some(PendingAction::Select) => return HoverPhase::PendingSelect,
            None => {}
        }

        if record.is_selected {
            return HoverPhase::Idle;
        }
        if let Some(other) = self.select_gesture() {
            debug!(
                "event=hover_enter module=hover status=skip reason=gesture_in_progress id={id} other={other}"
            );
            return HoverPhase::Idle;
        }

        self.timers
            .arm(id, PendingAction::Select, now, self.timings.select_delay);
        debug!("event=hover_enter module=hover status=ok id={id} armed=select");
        HoverPhase::PendingSelect
    }

    pub fn hover_leave(&mut self, id: RecordId, now: Instant, records: &RecordStore) -> HoverPhase {
        match self.timers.payload(&id) {
            Some(PendingAction::Select) => {
                self.timers.cancel(&id);
                debug!("event=hover_leave module=hover status=ok id={id} cancelled=select");
                return HoverPhase::Idle;
            }
            Some(PendingAction::Deselect) => return HoverPhase::PendingDeselect,
            None => {}
        }

        match records.get(id) {
            Some(record) if record.is_selected => {
                self.timers
                    .arm(id, PendingAction::Deselect, now, self.timings.deselect_delay);
                debug!("event=hover_leave module=hover status=ok id={id} armed=deselect");
                HoverPhase::PendingDeselect
            }
            _ => HoverPhase::Idle,
        }
    }

    /// Pointer entered or left the whole list area.
    ///
    /// Cancels every pending gesture and clears selection immediately.
    pub fn container_crossed(
        &mut self,
        records: &mut RecordStore,
        view: &mut ViewState,
    ) -> Option<HoverEffect> {
        let cancelled = self.timers.cancel_all();
        if records.selected_id().is_none() {
            if cancelled > 0 {
                debug!("event=container_crossed module=hover status=ok cancelled={cancelled}");
            }
            return None;
        }

        records.select(None);
        view.set_zoom(self.timings.overview_zoom);
        info!("event=selection_cleared module=hover status=ok trigger=container cancelled={cancelled}");
        Some(HoverEffect::SelectionCleared)
    }

    /// Fires every timer due at `now` and applies its effect.
    pub fn fire_due(
        &mut self,
        now: Instant,
        records: &mut RecordStore,
        view: &mut ViewState,
    ) -> Vec<HoverEffect> {
        let mut effects = Vec::new();
        for (id, action) in self.timers.drain_due(now) {
            let effect = match action {
                PendingAction::Select => self.resolve_select(id, records, view),
                PendingAction::Deselect => self.resolve_deselect(id, records, view),
            };
            effects.extend(effect);
        }
        effects
    }

    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Cancels any timer owned by `id` (list item teardown or deletion).
    pub fn release(&mut self, id: RecordId) -> bool {
        self.timers.cancel(&id).is_some()
    }

    pub fn cancel_all(&mut self) -> usize {
        self.timers.cancel_all()
    }

    fn resolve_select(
        &self,
        id: RecordId,
        records: &mut RecordStore,
        view: &mut ViewState,
    ) -> Option<HoverEffect> {
        let center = match records.get(id) {
            None => {
                debug!("event=select_fired module=hover status=skip reason=unknown_id id={id}");
                return None;
            }
            Some(record) if record.is_selected => {
                debug!("event=select_fired module=hover status=skip reason=already_selected id={id}");
                return None;
            }
            Some(record) => record.position,
        };

        records.select(Some(id));
        view.set_center(center);
        view.set_zoom(self.timings.focused_zoom);
        info!("event=record_selected module=hover status=ok id={id}");
        Some(HoverEffect::Selected { id, center })
    }

    fn resolve_deselect(
        &self,
        id: RecordId,
        records: &mut RecordStore,
        view: &mut ViewState,
    ) -> Option<HoverEffect> {
        match records.get(id) {
            Some(record) if record.is_selected => {}
            _ => {
                debug!("event=deselect_fired module=hover status=skip reason=not_selected id={id}");
                return None;
            }
        }

        records.select(None);
        view.set_zoom(self.timings.overview_zoom);
        info!("event=record_deselected module=hover status=ok id={id}");
        Some(HoverEffect::Deselected { id })
    }
}
