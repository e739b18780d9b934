//! Strongly-typed identifiers whose bytes embed their creation time.

use core::str::FromStr;

use bson::oid::ObjectId;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// An identifier that carries its own creation timestamp.
///
/// `created_at` must be a pure function of the identifier's bytes, so two equal
/// identifiers always report the same creation time.
pub trait TimestampedId: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display {
    /// Generate a fresh identifier stamped with the current time.
    fn generate() -> Self;

    /// Creation time decoded from the identifier bytes.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Identifier of a stored document (database object id).
///
/// Layout: 4-byte big-endian seconds since the epoch, 5 random bytes, 3-byte
/// counter. Text form is 24 lowercase hex characters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Length of the hexadecimal text form.
    pub const HEX_LEN: usize = 24;

    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn from_object_id(oid: ObjectId) -> Self {
        Self(oid)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(ObjectId::from_bytes(bytes))
    }

    pub fn as_object_id(&self) -> &ObjectId {
        &self.0
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0.bytes()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Whether `s` is a syntactically valid text form (24 hex digits, any case).
    pub fn is_valid(s: &str) -> bool {
        s.len() == Self::HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampedId for DocumentId {
    fn generate() -> Self {
        Self::new()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.0.timestamp().to_chrono()
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<ObjectId> for DocumentId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl From<DocumentId> for ObjectId {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(s) {
            return Err(DomainError::invalid_identifier(format!(
                "{s:?} is not a valid ObjectId"
            )));
        }
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::invalid_identifier(format!("{s:?}: {e}")))
    }
}

/// Time-ordered record identifier (UUIDv7).
///
/// The first 48 bits hold milliseconds since the epoch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Uuid", into = "Uuid")]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Adopt an existing UUID. Only version 7 carries a creation time.
    pub fn from_uuid(uuid: Uuid) -> Result<Self, DomainError> {
        if uuid.get_version_num() != 7 {
            return Err(DomainError::invalid_identifier(format!(
                "{uuid} is not a time-ordered (v7) UUID"
            )));
        }
        Ok(Self(uuid))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampedId for RecordId {
    fn generate() -> Self {
        Self::new()
    }

    fn created_at(&self) -> DateTime<Utc> {
        let b = self.0.as_bytes();
        let millis = u64::from_be_bytes([0, 0, b[0], b[1], b[2], b[3], b[4], b[5]]);
        // 48 bits of milliseconds always fits in i64.
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(millis as i64)
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<RecordId> for Uuid {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl TryFrom<Uuid> for RecordId {
    type Error = DomainError;

    fn try_from(value: Uuid) -> Result<Self, Self::Error> {
        Self::from_uuid(value)
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_identifier(format!("{s:?}: {e}")))?;
        Self::from_uuid(uuid)
    }
}
