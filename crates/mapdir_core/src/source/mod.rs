//! External record sources.
//!
//! # Responsibility
//! - Define the single-call fetch contract used to populate the store.
//! - Provide the randomuser.me HTTP source and a fixed in-memory source.
//!
//! # Invariants
//! - A fetch either yields a fully valid batch or an error; never a
//!   partially decoded batch.
//! - No retry happens here; callers surface the error once.

use crate::model::record::{Record, RecordValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod random_user;

pub use random_user::{decode_response, RandomUserSource};

#[derive(Debug)]
pub enum SourceError {
    Transport(String),
    Status(u16),
    Decode(String),
    InvalidRecord {
        index: usize,
        source: RecordValidationError,
    },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "record source request failed: {message}"),
            Self::Status(code) => write!(f, "record source responded with status {code}"),
            Self::Decode(message) => write!(f, "failed to decode record source payload: {message}"),
            Self::InvalidRecord { index, source } => {
                write!(f, "record source entry #{index} is invalid: {source}")
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(value.to_string()),
        }
    }
}

/// One-shot supplier of the initial record batch.
pub trait RecordSource {
    fn fetch(&self) -> Result<Vec<Record>, SourceError>;
}

/// Serves a fixed batch; useful for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticRecordSource {
    records: Vec<Record>,
}

impl StaticRecordSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl RecordSource for StaticRecordSource {
    fn fetch(&self) -> Result<Vec<Record>, SourceError> {
        Ok(self.records.clone())
    }
}
