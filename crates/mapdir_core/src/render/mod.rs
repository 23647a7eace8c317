//! Map rendering boundary.
//!
//! # Responsibility
//! - Define the rendering surface contract the core depends on.
//! - Keep the two marker layers in sync with the selection partition.
//! - Model the single in-flight view animation.
//!
//! # Invariants
//! - One live surface per renderer; a second mount is rejected.
//! - The marker layers are owned by `MarkerRenderer` alone.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod animation;
pub mod marker_layers;
pub mod recording;
pub mod surface;

use surface::MountPoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// This renderer already drives a live surface.
    AlreadyMounted(MountPoint),
    /// The mount point already hosts a live surface.
    MountOccupied(MountPoint),
    NotMounted,
    Construction(String),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyMounted(mount) => write!(f, "surface already mounted at `{mount}`"),
            Self::MountOccupied(mount) => {
                write!(f, "mount point `{mount}` already hosts a live surface")
            }
            Self::NotMounted => write!(f, "surface is not mounted"),
            Self::Construction(message) => write!(f, "surface construction failed: {message}"),
        }
    }
}

impl Error for RenderError {}
