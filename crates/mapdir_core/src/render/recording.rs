//! Headless rendering surface that records every command.
//!
//! Used where no map library is linked: tests, the CLI probe, and the FFI
//! bridge, which hands the recorded commands to the host UI to replay.

use crate::render::surface::{
    Feature, LayerHandle, LayerRole, LayerSpec, MountPoint, RenderSurface, SurfaceView,
};
use crate::render::RenderError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SurfaceCommand {
    Construct {
        layers: Vec<LayerSpec>,
        view: SurfaceView,
    },
    Attach {
        mount: MountPoint,
    },
    Detach,
    AnimateView {
        view: SurfaceView,
        duration_ms: u64,
    },
    ReplaceFeatures {
        layer: LayerHandle,
        features: Vec<Feature>,
    },
    Repaint {
        layer: LayerHandle,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct RecordedLayer {
    spec: LayerSpec,
    features: Vec<Feature>,
    repaints: usize,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<SurfaceCommand>,
    layers: BTreeMap<LayerHandle, RecordedLayer>,
    attached: Option<MountPoint>,
    view: Option<SurfaceView>,
    next_handle: u32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn attached(&self) -> Option<&MountPoint> {
        self.attached.as_ref()
    }

    /// Latest requested view (construction or animation target).
    pub fn view(&self) -> Option<SurfaceView> {
        self.view
    }

    pub fn features(&self, role: LayerRole) -> Option<&[Feature]> {
        self.layer_by_role(role).map(|layer| layer.features.as_slice())
    }

    pub fn repaint_count(&self, role: LayerRole) -> usize {
        self.layer_by_role(role)
            .map(|layer| layer.repaints)
            .unwrap_or(0)
    }

    pub fn animation_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, SurfaceCommand::AnimateView { .. }))
            .count()
    }

    fn layer_by_role(&self, role: LayerRole) -> Option<&RecordedLayer> {
        self.layers.values().find(|layer| layer.spec.role == role)
    }
}

impl RenderSurface for RecordingSurface {
    fn construct(
        &mut self,
        layers: &[LayerSpec],
        initial: SurfaceView,
    ) -> Result<Vec<LayerHandle>, RenderError> {
        self.layers.clear();
        let mut handles = Vec::with_capacity(layers.len());
        for spec in layers {
            let handle = LayerHandle(self.next_handle);
            self.next_handle += 1;
            self.layers.insert(
                handle,
                RecordedLayer {
                    spec: spec.clone(),
                    features: Vec::new(),
                    repaints: 0,
                },
            );
            handles.push(handle);
        }
        self.view = Some(initial);
        self.commands.push(SurfaceCommand::Construct {
            layers: layers.to_vec(),
            view: initial,
        });
        Ok(handles)
    }

    fn attach(&mut self, mount: &MountPoint) -> Result<(), RenderError> {
        if let Some(current) = &self.attached {
            return Err(RenderError::MountOccupied(current.clone()));
        }
        self.attached = Some(mount.clone());
        self.commands.push(SurfaceCommand::Attach {
            mount: mount.clone(),
        });
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = None;
        self.view = None;
        self.layers.clear();
        self.commands.push(SurfaceCommand::Detach);
    }

    fn animate_view(&mut self, target: SurfaceView, duration: Duration) {
        self.view = Some(target);
        self.commands.push(SurfaceCommand::AnimateView {
            view: target,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        });
    }

    fn replace_features(&mut self, layer: LayerHandle, features: Vec<Feature>) {
        if let Some(recorded) = self.layers.get_mut(&layer) {
            recorded.features = features.clone();
        }
        self.commands
            .push(SurfaceCommand::ReplaceFeatures { layer, features });
    }

    fn repaint(&mut self, layer: LayerHandle) {
        if let Some(recorded) = self.layers.get_mut(&layer) {
            recorded.repaints += 1;
        }
        self.commands.push(SurfaceCommand::Repaint { layer });
    }
}
