//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical directory entry rendered by the list and the map.
//! - Provide display helpers shared by list projections.
//! - Provide patch semantics for edit flows.
//!
//! # Invariants
//! - `id` is stable, never nil, and never reused for another record.
//! - `position` is a finite WGS84 position.
//! - `is_selected` is written only by `RecordStore::select`; patches never
//!   touch it.

use crate::model::geo::GeoPosition;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a directory record.
pub type RecordId = Uuid;

/// Validation failures for record construction and edits.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    NilId,
    InvalidLongitude(f64),
    InvalidLatitude(f64),
    EmptyField(&'static str),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "record id must not be nil"),
            Self::InvalidLongitude(value) => {
                write!(f, "longitude ({value}) must be finite and within [-180, 180]")
            }
            Self::InvalidLatitude(value) => {
                write!(f, "latitude ({value}) must be finite and within [-90, 90]")
            }
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
        }
    }
}

impl Error for RecordValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonName {
    pub title: String,
    pub first: String,
    pub last: String,
}

impl PersonName {
    pub fn new(
        title: impl Into<String>,
        first: impl Into<String>,
        last: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            first: first.into(),
            last: last.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    pub street_name: String,
    pub street_number: u32,
    pub city: String,
    pub state: String,
    pub postcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub cell: String,
}

/// Canonical directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: PersonName,
    pub address: Address,
    pub contact: Contact,
    pub picture_url: Option<String>,
    pub position: GeoPosition,
    /// Selection flag; owned by the record store.
    #[serde(default)]
    pub is_selected: bool,
}

impl Record {
    /// Creates an unselected record with empty address and contact fields.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    /// - `InvalidLongitude` / `InvalidLatitude` for out-of-range positions.
    pub fn new(
        id: RecordId,
        name: PersonName,
        position: GeoPosition,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            id,
            name,
            address: Address::default(),
            contact: Contact::default(),
            picture_url: None,
            position,
            is_selected: false,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_picture(mut self, picture_url: impl Into<String>) -> Self {
        self.picture_url = Some(picture_url.into());
        self
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.is_nil() {
            return Err(RecordValidationError::NilId);
        }
        self.position.validate()
    }

    /// "first last", as shown on list cards.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
    }

    /// "title first last", as shown in the detail view.
    pub fn formal_name(&self) -> String {
        format!("{} {} {}", self.name.title, self.name.first, self.name.last)
    }

    /// "street number, city, state, postcode".
    pub fn address_line(&self) -> String {
        format!(
            "{} {}, {}, {}, {}",
            self.address.street_name,
            self.address.street_number,
            self.address.city,
            self.address.state,
            self.address.postcode
        )
    }

    /// First character of the first name, used as avatar fallback.
    pub fn initial(&self) -> Option<char> {
        self.name.first.chars().next()
    }
}

/// Partial update applied on top of an existing record.
///
/// `None` leaves the field unchanged. Identity and selection are not
/// patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<PersonName>,
    pub address: Option<Address>,
    pub contact: Option<Contact>,
    pub picture_url: Option<Option<String>>,
    pub position: Option<GeoPosition>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.contact.is_none()
            && self.picture_url.is_none()
            && self.position.is_none()
    }

    /// Produces the full replacement value for `current`.
    pub fn apply_to(&self, current: &Record) -> Result<Record, RecordValidationError> {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(address) = &self.address {
            next.address = address.clone();
        }
        if let Some(contact) = &self.contact {
            next.contact = contact.clone();
        }
        if let Some(picture_url) = &self.picture_url {
            next.picture_url = picture_url.clone();
        }
        if let Some(position) = self.position {
            next.position = position;
        }
        next.validate()?;
        Ok(next)
    }
}
