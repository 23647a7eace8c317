//! Rendering surface contract.
//!
//! The map-drawing library lives outside this crate. The core only needs
//! to build the surface once, attach/detach it, animate the view and
//! replace per-layer feature lists.

use crate::model::geo::MapCoordinate;
use crate::model::record::RecordId;
use crate::render::RenderError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Opaque layer handle issued by the surface at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerHandle(pub u32);

/// Identifier of the host element the surface draws into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountPoint(String);

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MountPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    /// Base raster tiles (OpenStreetMap).
    BaseTiles,
    SelectedMarkers,
    UnselectedMarkers,
}

/// Icon used to draw every feature of a marker layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub asset: String,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub role: LayerRole,
    pub icon: Option<MarkerIcon>,
}

impl LayerSpec {
    pub fn base_tiles() -> Self {
        Self {
            role: LayerRole::BaseTiles,
            icon: None,
        }
    }

    pub fn markers(role: LayerRole, asset: &str) -> Self {
        Self {
            role,
            icon: Some(MarkerIcon {
                asset: asset.to_string(),
                scale: 0.3,
            }),
        }
    }

    /// Base tiles, then selected markers, then unselected markers.
    pub fn default_stack() -> Vec<LayerSpec> {
        vec![
            Self::base_tiles(),
            Self::markers(LayerRole::SelectedMarkers, "marker_active.png"),
            Self::markers(LayerRole::UnselectedMarkers, "marker.png"),
        ]
    }
}

/// View parameters in the surface's native projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceView {
    pub center: MapCoordinate,
    pub zoom: f64,
}

/// One drawable point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub record_id: RecordId,
    pub coordinate: MapCoordinate,
}

pub trait RenderSurface {
    /// Builds layers and the initial view; returns one handle per spec, in order.
    fn construct(
        &mut self,
        layers: &[LayerSpec],
        initial: SurfaceView,
    ) -> Result<Vec<LayerHandle>, RenderError>;

    fn attach(&mut self, mount: &MountPoint) -> Result<(), RenderError>;

    /// Detaches from the mount point and releases the view.
    fn detach(&mut self);

    /// Starts a transition toward `target`. Must supersede a running one.
    fn animate_view(&mut self, target: SurfaceView, duration: Duration);

    fn replace_features(&mut self, layer: LayerHandle, features: Vec<Feature>);

    fn repaint(&mut self, layer: LayerHandle);
}
