//! Directory use-case service.
//!
//! # Responsibility
//! - Populate the store from a record source, reporting failures as
//!   user-visible notifications.
//! - Validate contact edits before they reach the store.
//!
//! # Invariants
//! - A failed fetch leaves the collection untouched (empty on first load).
//! - Edits never bypass `RecordStore::update` (identity and selection are
//!   preserved).

use crate::model::record::{PersonName, Record, RecordId, RecordPatch, RecordValidationError};
use crate::service::notifications::{NotificationLevel, Notifications};
use crate::source::{RecordSource, SourceError};
use crate::store::record_store::RecordStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const LOAD_FAILED_MESSAGE: &str =
    "We had some issue loading the records, please try again later!";
pub const EMPTY_FIELDS_MESSAGE: &str = "Fields can not be empty!";
pub const CHANGES_SAVED_MESSAGE: &str = "Changes saved!";

#[derive(Debug)]
pub enum EditError {
    Validation(RecordValidationError),
    RecordNotFound(RecordId),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::RecordNotFound(id) => write!(f, "record not found: {id}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::RecordNotFound(_) => None,
        }
    }
}

impl From<RecordValidationError> for EditError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Editable subset of a record's display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEdit {
    pub first: String,
    pub last: String,
    pub phone: String,
}

impl RecordEdit {
    /// Trims every field and rejects empty ones.
    pub fn normalized(&self) -> Result<RecordEdit, RecordValidationError> {
        let normalized = RecordEdit {
            first: self.first.trim().to_string(),
            last: self.last.trim().to_string(),
            phone: self.phone.trim().to_string(),
        };
        for (field, value) in [
            ("first", &normalized.first),
            ("last", &normalized.last),
            ("phone", &normalized.phone),
        ] {
            if value.is_empty() {
                return Err(RecordValidationError::EmptyField(field));
            }
        }
        Ok(normalized)
    }
}

/// Result of a load attempt.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(usize),
    /// Collection already populated or the batch was empty.
    Skipped,
    Failed(SourceError),
}

pub struct DirectoryService<'a> {
    records: &'a mut RecordStore,
    notifications: &'a mut Notifications,
}

impl<'a> DirectoryService<'a> {
    pub fn new(records: &'a mut RecordStore, notifications: &'a mut Notifications) -> Self {
        Self {
            records,
            notifications,
        }
    }

    /// Fetches once from `source` and loads the batch.
    pub fn load_from(&mut self, source: &dyn RecordSource) -> LoadOutcome {
        if !self.records.is_empty() {
            return LoadOutcome::Skipped;
        }

        let records = match source.fetch() {
            Ok(records) => records,
            Err(err) => return self.fail_load(err),
        };
        let invalid = records
            .iter()
            .enumerate()
            .find_map(|(index, record)| record.validate().err().map(|err| (index, err)));
        if let Some((index, source)) = invalid {
            return self.fail_load(SourceError::InvalidRecord { index, source });
        }

        match self.records.load(records) {
            Ok(true) => {
                let count = self.records.len();
                info!("event=records_loaded module=service status=ok count={count}");
                LoadOutcome::Loaded(count)
            }
            Ok(false) => LoadOutcome::Skipped,
            Err(err) => self.fail_load(SourceError::Decode(err.to_string())),
        }
    }

    fn fail_load(&mut self, err: SourceError) -> LoadOutcome {
        warn!("event=records_loaded module=service status=error error={err}");
        self.notifications
            .push(NotificationLevel::Error, LOAD_FAILED_MESSAGE);
        LoadOutcome::Failed(err)
    }

    /// Applies a validated name/phone edit and returns the stored record.
    pub fn edit_record(&mut self, id: RecordId, edit: &RecordEdit) -> Result<Record, EditError> {
        let normalized = match edit.normalized() {
            Ok(normalized) => normalized,
            Err(err) => {
                self.notifications
                    .push(NotificationLevel::Error, EMPTY_FIELDS_MESSAGE);
                return Err(err.into());
            }
        };
        let Some(current) = self.records.get(id) else {
            return Err(EditError::RecordNotFound(id));
        };

        let mut contact = current.contact.clone();
        contact.phone = normalized.phone;
        let patch = RecordPatch {
            name: Some(PersonName::new(
                current.name.title.clone(),
                normalized.first,
                normalized.last,
            )),
            contact: Some(contact),
            ..RecordPatch::default()
        };

        if !self.records.update(id, &patch)? {
            return Err(EditError::RecordNotFound(id));
        }
        self.notifications
            .push(NotificationLevel::Success, CHANGES_SAVED_MESSAGE);
        self.records
            .get(id)
            .cloned()
            .ok_or(EditError::RecordNotFound(id))
    }
}
