//! Canonical record collection.
//!
//! # Responsibility
//! - Hold the ordered record collection for the session.
//! - Be the sole writer of `Record::is_selected`.
//! - Publish `CollectionChange` events and a monotonic revision.
//!
//! # Invariants
//! - Ids are unique; insertion order is preserved.
//! - At most one record has `is_selected == true`.
//! - Operations on unknown ids are silent no-ops.

use crate::model::record::{Record, RecordId, RecordPatch, RecordValidationError};
use crate::store::listeners::{Listeners, SubscriptionId};
use log::debug;
use std::collections::HashSet;

/// Change notification published after every effective mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionChange {
    Loaded {
        count: usize,
    },
    Updated {
        id: RecordId,
    },
    Removed {
        id: RecordId,
        was_selected: bool,
    },
    SelectionChanged {
        previous: Option<RecordId>,
        current: Option<RecordId>,
    },
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    revision: u64,
    listeners: Listeners<CollectionChange>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates the collection once per session.
    ///
    /// Returns `false` without touching state when the collection is
    /// already populated or `records` is empty. Incoming selection flags
    /// are cleared and duplicate ids keep their first occurrence.
    ///
    /// # Errors
    /// - Returns the first validation failure; nothing is loaded then.
    pub fn load(&mut self, records: Vec<Record>) -> Result<bool, RecordValidationError> {
        if !self.records.is_empty() {
            debug!(
                "event=records_load module=store status=skip reason=already_populated count={}",
                self.records.len()
            );
            return Ok(false);
        }
        if records.is_empty() {
            debug!("event=records_load module=store status=skip reason=empty_batch");
            return Ok(false);
        }

        let mut seen = HashSet::with_capacity(records.len());
        let mut normalized = Vec::with_capacity(records.len());
        for mut record in records {
            record.validate()?;
            if !seen.insert(record.id) {
                debug!(
                    "event=records_load module=store status=skip reason=duplicate_id id={}",
                    record.id
                );
                continue;
            }
            record.is_selected = false;
            normalized.push(record);
        }

        let count = normalized.len();
        self.records = normalized;
        self.publish(CollectionChange::Loaded { count });
        Ok(true)
    }

    /// Replaces the record matching `id` with `patch` applied on top.
    ///
    /// Returns `Ok(false)` when `id` is unknown.
    pub fn update(
        &mut self,
        id: RecordId,
        patch: &RecordPatch,
    ) -> Result<bool, RecordValidationError> {
        let Some(index) = self.index_of(id) else {
            debug!("event=record_update module=store status=skip reason=unknown_id id={id}");
            return Ok(false);
        };

        let next = patch.apply_to(&self.records[index])?;
        if next == self.records[index] {
            return Ok(true);
        }
        self.records[index] = next;
        self.publish(CollectionChange::Updated { id });
        Ok(true)
    }

    /// Removes the record matching `id`, returning it when present.
    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        let Some(index) = self.index_of(id) else {
            debug!("event=record_remove module=store status=skip reason=unknown_id id={id}");
            return None;
        };

        let removed = self.records.remove(index);
        self.publish(CollectionChange::Removed {
            id,
            was_selected: removed.is_selected,
        });
        Some(removed)
    }

    /// Selects exactly the record matching `id`, or clears selection for `None`.
    ///
    /// All flags are rewritten in one pass so no reader can observe two
    /// selected records. Selecting an unknown id behaves like `None`.
    /// Returns whether the selection changed.
    pub fn select(&mut self, id: Option<RecordId>) -> bool {
        let previous = self.selected_id();
        for record in self.records.iter_mut() {
            record.is_selected = Some(record.id) == id;
        }
        let current = self.selected_id();

        if previous == current {
            return false;
        }
        self.publish(CollectionChange::SelectionChanged { previous, current });
        true
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn selected(&self) -> Option<&Record> {
        self.records.iter().find(|record| record.is_selected)
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.selected().map(|record| record.id)
    }

    /// Bumped on every published change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&CollectionChange) + Send + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn index_of(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    fn publish(&mut self, change: CollectionChange) {
        self.revision += 1;
        debug!(
            "event=collection_changed module=store status=ok revision={} change={:?}",
            self.revision, change
        );
        self.listeners.notify(&change);
    }
}
