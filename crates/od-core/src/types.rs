//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
///
/// These only surface at the ingestion boundary. Once events are built, the
/// correction and counting passes never fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The record identifier was not a non-negative integer.
    #[error("invalid record ID: {value:?}")]
    InvalidRecordId { value: String },

    /// The crossing type string was not recognized.
    #[error("unknown crossing type: {value}")]
    UnknownCrossingType { value: String },

    /// The configured UTC offset cannot be represented.
    #[error("UTC offset must be between -23 and 23 hours, got {hours}")]
    OffsetOutOfRange { hours: i32 },
}

/// Identifier of a crossing record as assigned by the source feed.
///
/// Feeds number records newest-first, so the numeric value doubles as a
/// logical sequence number. Use [`crate::chronology`] to order events rather
/// than comparing ids directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawRecordId", into = "u64")]
pub struct RecordId(u64);

impl RecordId {
    /// Creates a record ID from its numeric value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidRecordId {
                value: s.to_string(),
            })
    }
}

impl From<RecordId> for u64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Feeds emit ids either as JSON numbers or as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecordId {
    Number(u64),
    Text(String),
}

impl TryFrom<RawRecordId> for RecordId {
    type Error = ValidationError;

    fn try_from(raw: RawRecordId) -> Result<Self, Self::Error> {
        match raw {
            RawRecordId::Number(value) => Ok(Self(value)),
            RawRecordId::Text(text) => text.parse(),
        }
    }
}

/// The travel credential a crossing was recorded against.
///
/// Two events share an identity iff both the name and the number are equal,
/// including the case where both are empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DocumentIdentity {
    #[serde(rename = "documentName")]
    pub name: String,
    #[serde(rename = "documentNumber")]
    pub number: String,
}

impl DocumentIdentity {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }

    /// Returns true if neither a name nor a number was recorded.
    pub fn is_unspecified(&self) -> bool {
        self.name.is_empty() && self.number.is_empty()
    }
}

impl fmt::Display for DocumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unspecified() {
            return write!(f, "(no document)");
        }
        match (self.name.is_empty(), self.number.is_empty()) {
            (false, true) => write!(f, "{}", self.name),
            (true, false) => write!(f, "{}", self.number),
            _ => write!(f, "{} {}", self.name, self.number),
        }
    }
}
