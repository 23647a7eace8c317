//! Flutter-facing bindings for the map directory core.

pub mod api;
