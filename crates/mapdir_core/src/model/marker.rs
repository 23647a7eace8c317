//! Marker projection of records.
//!
//! A marker carries only what the rendering layers need: where to draw,
//! whether it is highlighted, and which record it points back to. The
//! record id is a lookup key, not an owning reference.

use crate::model::geo::GeoPosition;
use crate::model::record::{Record, RecordId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub record_id: RecordId,
    pub position: GeoPosition,
    pub is_selected: bool,
}

impl Marker {
    pub fn from_record(record: &Record) -> Self {
        Self {
            record_id: record.id,
            position: record.position,
            is_selected: record.is_selected,
        }
    }
}

/// Recomputes the full marker set, preserving collection order.
pub fn derive_markers(records: &[Record]) -> Vec<Marker> {
    records.iter().map(Marker::from_record).collect()
}

/// Disjoint split of a marker set by selection flag.
///
/// Every input marker lands in exactly one side, and relative order is
/// preserved on both sides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerPartition {
    pub selected: Vec<Marker>,
    pub unselected: Vec<Marker>,
}

impl MarkerPartition {
    pub fn split(markers: &[Marker]) -> Self {
        let (selected, unselected): (Vec<Marker>, Vec<Marker>) =
            markers.iter().partition(|marker| marker.is_selected);
        Self {
            selected,
            unselected,
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len() + self.unselected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
