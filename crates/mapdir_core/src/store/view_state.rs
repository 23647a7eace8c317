//! Map view parameters and the derived marker set.
//!
//! # Responsibility
//! - Own center/zoom as set by the hover reconciler or explicit pan/zoom.
//! - Hold the marker set derived from the record collection.
//! - Track whether center/zoom changed since the renderer last looked.
//!
//! # Invariants
//! - Setters are total: non-finite zoom values are ignored.
//! - The marker set is only written by marker derivation inside the crate.

use crate::model::geo::GeoPosition;
use crate::model::marker::Marker;
use crate::store::listeners::{Listeners, SubscriptionId};
use log::{debug, warn};

/// Center and zoom of the map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    pub center: GeoPosition,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewChange {
    Zoom(f64),
    Center(GeoPosition),
    Markers { count: usize },
}

#[derive(Debug)]
pub struct ViewState {
    params: ViewParams,
    markers: Vec<Marker>,
    params_dirty: bool,
    listeners: Listeners<ViewChange>,
}

impl ViewState {
    pub fn new(initial: ViewParams) -> Self {
        Self {
            params: initial,
            markers: Vec::new(),
            params_dirty: false,
            listeners: Listeners::new(),
        }
    }

    pub fn params(&self) -> ViewParams {
        self.params
    }

    pub fn zoom(&self) -> f64 {
        self.params.zoom
    }

    pub fn center(&self) -> GeoPosition {
        self.params.center
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn set_zoom(&mut self, level: f64) {
        if !level.is_finite() {
            warn!("event=view_set_zoom module=view status=skip reason=non_finite");
            return;
        }
        if self.params.zoom == level {
            return;
        }
        self.params.zoom = level;
        self.params_dirty = true;
        debug!("event=view_set_zoom module=view status=ok zoom={level}");
        self.listeners.notify(&ViewChange::Zoom(level));
    }

    pub fn set_center(&mut self, center: GeoPosition) {
        if self.params.center == center {
            return;
        }
        self.params.center = center;
        self.params_dirty = true;
        debug!(
            "event=view_set_center module=view status=ok lon={} lat={}",
            center.longitude, center.latitude
        );
        self.listeners.notify(&ViewChange::Center(center));
    }

    pub(crate) fn set_markers(&mut self, markers: Vec<Marker>) {
        let count = markers.len();
        self.markers = markers;
        self.listeners.notify(&ViewChange::Markers { count });
    }

    /// Returns the latest params once per batch of center/zoom changes.
    pub(crate) fn take_params_change(&mut self) -> Option<ViewParams> {
        if !self.params_dirty {
            return None;
        }
        self.params_dirty = false;
        Some(self.params)
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ViewChange) + Send + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}
