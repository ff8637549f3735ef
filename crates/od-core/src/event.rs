//! Border-crossing records as delivered by the ingestion layer.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{DocumentIdentity, RecordId, ValidationError};

/// Direction of a crossing.
///
/// Declaration order matters: on the same date an exit sorts before an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrossingType {
    Exit,
    Entry,
}

impl CrossingType {
    /// String representation used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Entry => "entry",
        }
    }
}

impl fmt::Display for CrossingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CrossingType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exit" | "departure" => Ok(Self::Exit),
            "entry" | "arrival" => Ok(Self::Entry),
            _ => Err(ValidationError::UnknownCrossingType {
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for CrossingType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CrossingType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One crossing record.
///
/// Events are immutable inputs: correction produces new events via
/// [`BorderEvent::with_document`] rather than editing in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderEvent {
    /// Feed-assigned identifier; smaller means more recent.
    pub id: RecordId,

    /// Calendar day of the crossing.
    pub date: NaiveDate,

    /// Clock time as recorded. Never read by the day-counting logic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(rename = "type")]
    pub crossing: CrossingType,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub port: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub flight_number: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub document_name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub document_number: String,
}

impl BorderEvent {
    /// Creates an event with no time, port or flight details.
    pub fn new(
        id: RecordId,
        date: NaiveDate,
        crossing: CrossingType,
        document: &DocumentIdentity,
    ) -> Self {
        Self {
            id,
            date,
            time: None,
            crossing,
            port: String::new(),
            flight_number: String::new(),
            document_name: document.name.clone(),
            document_number: document.number.clone(),
        }
    }

    /// The partition key for all pairing logic.
    pub fn document_identity(&self) -> DocumentIdentity {
        DocumentIdentity::new(self.document_name.clone(), self.document_number.clone())
    }

    /// Returns true if this event belongs to `identity`, without allocating.
    pub fn has_document(&self, identity: &DocumentIdentity) -> bool {
        self.document_name == identity.name && self.document_number == identity.number
    }

    /// Returns a copy of this event recorded against another document.
    #[must_use]
    pub fn with_document(&self, identity: &DocumentIdentity) -> Self {
        Self {
            document_name: identity.name.clone(),
            document_number: identity.number.clone(),
            ..self.clone()
        }
    }

    pub const fn is_exit(&self) -> bool {
        matches!(self.crossing, CrossingType::Exit)
    }
}

/// Feeds send `null` for unknown descriptive fields; treat it like absence.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
