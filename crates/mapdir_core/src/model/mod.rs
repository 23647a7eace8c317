//! Directory domain model.
//!
//! # Responsibility
//! - Define the canonical record shape shown in the list and on the map.
//! - Define the marker projection consumed by the rendering layers.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId` that never changes.
//! - Markers are pure projections of records and never own record data.

pub mod geo;
pub mod marker;
pub mod record;
