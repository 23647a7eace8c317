//! Two-layer marker renderer.
//!
//! # Responsibility
//! - Construct the rendering surface exactly once per mount.
//! - Keep the selected and unselected marker layers equal to the current
//!   selection partition of the marker set.
//! - Forward view changes as a single superseding animation.
//!
//! # Invariants
//! - The marker layers are written only through this type.
//! - A layer is rebuilt (replace + repaint) only when its partition changed.
//! - All sync work is skipped while no surface is mounted.
//! - Dropping a mounted renderer detaches the surface.
//! - A failed mount leaves no constructed view behind.

use crate::model::marker::{Marker, MarkerPartition};
use crate::render::animation::ViewAnimation;
use crate::render::surface::{
    Feature, LayerHandle, LayerRole, LayerSpec, MountPoint, RenderSurface, SurfaceView,
};
use crate::render::RenderError;
use crate::store::view_state::ViewParams;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Outcome of one `sync` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncReport {
    /// No surface mounted; nothing was touched.
    Skipped,
    Applied {
        selected_rebuilt: bool,
        unselected_rebuilt: bool,
    },
}

#[derive(Debug)]
struct MountedLayers {
    mount: MountPoint,
    selected: LayerHandle,
    unselected: LayerHandle,
}

#[derive(Debug)]
pub struct MarkerRenderer<S: RenderSurface> {
    surface: S,
    mounted: Option<MountedLayers>,
    applied: MarkerPartition,
    animation: ViewAnimation,
    animation_duration: Duration,
}

impl<S: RenderSurface> MarkerRenderer<S> {
    pub fn new(surface: S, animation_duration: Duration) -> Self {
        Self {
            surface,
            mounted: None,
            applied: MarkerPartition::default(),
            animation: ViewAnimation::new(SurfaceView::default()),
            animation_duration,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn mount_point(&self) -> Option<&MountPoint> {
        self.mounted.as_ref().map(|layers| &layers.mount)
    }

    /// Layer contents as last applied to the surface.
    pub fn applied(&self) -> &MarkerPartition {
        &self.applied
    }

    pub fn animation(&self) -> &ViewAnimation {
        &self.animation
    }

    /// Builds the surface (base tiles + two empty marker layers + initial
    /// view), attaches it to `mount`, then populates the marker layers.
    ///
    /// # Errors
    /// - `AlreadyMounted` when a surface is live; the live one is untouched.
    /// - `Construction` when the surface does not return three layers.
    /// - Surface attach failures are returned unchanged.
    ///
    /// A failed mount detaches whatever the surface constructed.
    pub fn mount(
        &mut self,
        mount: MountPoint,
        initial: ViewParams,
        markers: &[Marker],
    ) -> Result<SyncReport, RenderError> {
        if let Some(layers) = &self.mounted {
            return Err(RenderError::AlreadyMounted(layers.mount.clone()));
        }

        let initial_view = to_surface_view(initial);
        let specs = LayerSpec::default_stack();
        let handles = self.surface.construct(&specs, initial_view)?;
        let Some((selected, unselected)) = locate_marker_layers(&specs, &handles) else {
            self.surface.detach();
            return Err(RenderError::Construction(format!(
                "expected {} layer handles, got {}",
                specs.len(),
                handles.len()
            )));
        };
        if let Err(err) = self.surface.attach(&mount) {
            self.surface.detach();
            warn!("event=surface_mounted module=render status=error mount={mount} error={err}");
            return Err(err);
        }

        info!("event=surface_mounted module=render status=ok mount={mount}");
        self.animation.reset(initial_view);
        self.applied = MarkerPartition::default();
        self.mounted = Some(MountedLayers {
            mount,
            selected,
            unselected,
        });
        Ok(self.sync(markers))
    }

    /// Detaches the surface and releases its view.
    pub fn unmount(&mut self) -> Result<(), RenderError> {
        let Some(layers) = self.mounted.take() else {
            return Err(RenderError::NotMounted);
        };
        self.surface.detach();
        self.applied = MarkerPartition::default();
        self.animation.reset(SurfaceView::default());
        info!(
            "event=surface_unmounted module=render status=ok mount={}",
            layers.mount
        );
        Ok(())
    }

    /// Brings both marker layers in line with `markers`.
    pub fn sync(&mut self, markers: &[Marker]) -> SyncReport {
        let Some(layers) = &self.mounted else {
            debug!("event=layers_sync module=render status=skip reason=not_mounted");
            return SyncReport::Skipped;
        };
        let (selected_layer, unselected_layer) = (layers.selected, layers.unselected);

        let next = MarkerPartition::split(markers);
        let selected_rebuilt = next.selected != self.applied.selected;
        let unselected_rebuilt = next.unselected != self.applied.unselected;

        if selected_rebuilt {
            rebuild_layer(&mut self.surface, selected_layer, &next.selected);
        }
        if unselected_rebuilt {
            rebuild_layer(&mut self.surface, unselected_layer, &next.unselected);
        }
        if selected_rebuilt || unselected_rebuilt {
            debug!(
                "event=layers_sync module=render status=ok selected={} unselected={} rebuilt_selected={} rebuilt_unselected={}",
                next.selected.len(),
                next.unselected.len(),
                selected_rebuilt,
                unselected_rebuilt
            );
        }
        self.applied = next;

        SyncReport::Applied {
            selected_rebuilt,
            unselected_rebuilt,
        }
    }

    /// Starts a transition toward `params`, superseding any running one.
    ///
    /// Returns `false` when no surface is mounted.
    pub fn animate_to(&mut self, params: ViewParams, now: Instant) -> bool {
        if self.mounted.is_none() {
            return false;
        }
        let target = to_surface_view(params);
        self.animation
            .retarget(target, now, self.animation_duration);
        self.surface.animate_view(target, self.animation_duration);
        true
    }
}

impl<S: RenderSurface> Drop for MarkerRenderer<S> {
    fn drop(&mut self) {
        if self.mounted.take().is_some() {
            self.surface.detach();
        }
    }
}

fn to_surface_view(params: ViewParams) -> SurfaceView {
    SurfaceView {
        center: params.center.to_map_coordinate(),
        zoom: params.zoom,
    }
}

fn locate_marker_layers(
    specs: &[LayerSpec],
    handles: &[LayerHandle],
) -> Option<(LayerHandle, LayerHandle)> {
    if specs.len() != handles.len() {
        return None;
    }
    let find = |role: LayerRole| {
        specs
            .iter()
            .zip(handles)
            .find(|(spec, _)| spec.role == role)
            .map(|(_, handle)| *handle)
    };
    Some((
        find(LayerRole::SelectedMarkers)?,
        find(LayerRole::UnselectedMarkers)?,
    ))
}

fn rebuild_layer<S: RenderSurface>(surface: &mut S, layer: LayerHandle, markers: &[Marker]) {
    let features = markers
        .iter()
        .map(|marker| Feature {
            record_id: marker.record_id,
            coordinate: marker.position.to_map_coordinate(),
        })
        .collect();
    surface.replace_features(layer, features);
    surface.repaint(layer);
}
