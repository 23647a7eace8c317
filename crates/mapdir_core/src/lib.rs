//! Core logic for the map directory.
//! Keeps a record list, its single selection, and a two-layer marker map
//! in agreement while the pointer moves across the list.

pub mod config;
pub mod hover;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;
pub mod session;
pub mod source;
pub mod store;

pub use config::{ConfigError, LoggingConfig, MapdirConfig, SourceConfig, SyncConfig};
pub use hover::reconciler::{HoverEffect, HoverPhase, HoverReconciler, HoverTimings};
pub use logging::{
    default_log_level, flush_logs, init_logging, init_logging_from_config, logging_status,
};
pub use model::geo::{GeoPosition, MapCoordinate};
pub use model::marker::{derive_markers, Marker, MarkerPartition};
pub use model::record::{
    Address, Contact, PersonName, Record, RecordId, RecordPatch, RecordValidationError,
};
pub use render::marker_layers::{MarkerRenderer, SyncReport};
pub use render::recording::{RecordingSurface, SurfaceCommand};
pub use render::surface::{
    Feature, LayerHandle, LayerRole, LayerSpec, MountPoint, RenderSurface, SurfaceView,
};
pub use render::RenderError;
pub use service::directory_service::{DirectoryService, EditError, LoadOutcome, RecordEdit};
pub use service::notifications::{Notification, NotificationLevel, Notifications};
pub use session::{ListItem, MapSession, SessionEvent};
pub use source::{RandomUserSource, RecordSource, SourceError, StaticRecordSource};
pub use store::record_store::{CollectionChange, RecordStore};
pub use store::view_state::{ViewChange, ViewParams, ViewState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
