//! Entity traits and the timestamped record base.

use bson::{Bson, Document};
use chrono::{DateTime, Utc};

use crate::codec::{IdCodec, ObjectIdCodec};
use crate::error::{DomainError, DomainResult};
use crate::id::{DocumentId, TimestampedId};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity that tracks when it was created and last written.
pub trait Timestamped: Entity {
    /// Text form of the identifier.
    fn id_as_string(&self) -> String;

    /// Creation time. Never changes for the lifetime of the entity.
    fn created_at(&self) -> DateTime<Utc>;

    /// Time of the most recent persist, `None` before the first one.
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

/// Hook the persistence layer calls immediately before each write.
///
/// Performs no IO; it only mutates in-memory bookkeeping.
pub trait PersistHook {
    fn on_before_persist(&mut self);
}

/// Identity + modification-time bookkeeping for a persisted record.
///
/// The identifier is fixed at construction, so there is no window in which
/// the record exists without one. Creation time is always read back from the
/// identifier rather than stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<I> {
    id: I,
    updated_at: Option<DateTime<Utc>>,
}

impl<I: TimestampedId> Record<I> {
    /// New record with a freshly generated identifier.
    pub fn new() -> Self {
        Self::with_id(I::generate())
    }

    /// Adopt an identifier assigned elsewhere (e.g. by the document store).
    pub fn with_id(id: I) -> Self {
        Self {
            id,
            updated_at: None,
        }
    }

    /// Stamp `updated_at` with `now`.
    ///
    /// `updated_at` never moves backwards: a `now` earlier than the current
    /// stamp (clock skew) leaves it unchanged.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(match self.updated_at {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }
}

impl<I: TimestampedId> Default for Record<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: TimestampedId> PersistHook for Record<I> {
    fn on_before_persist(&mut self) {
        self.touch(Utc::now());
    }
}

impl<I: TimestampedId> Entity for Record<I> {
    type Id = I;

    fn id(&self) -> &I {
        &self.id
    }
}

impl<I: TimestampedId> Timestamped for Record<I> {
    fn id_as_string(&self) -> String {
        self.id.to_string()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.id.created_at()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Field names used in stored documents.
pub const ID_FIELD: &str = "_id";
pub const UPDATED_FIELD: &str = "updatedUtc";

impl Record<DocumentId> {
    /// Rebuild the bookkeeping fields from a stored document.
    pub fn from_document(document: &Document) -> DomainResult<Self> {
        let id = match document.get(ID_FIELD) {
            None | Some(Bson::Null | Bson::Undefined) => {
                return Err(DomainError::not_yet_assigned(ID_FIELD));
            }
            Some(raw) => ObjectIdCodec.parse(raw.clone())?,
        };

        let updated_at = match document.get(UPDATED_FIELD) {
            None | Some(Bson::Null) => None,
            Some(Bson::DateTime(dt)) => Some(dt.to_chrono()),
            Some(other) => {
                return Err(DomainError::validation(format!(
                    "{UPDATED_FIELD} must be a datetime, got {other}"
                )));
            }
        };

        Ok(Self { id, updated_at })
    }

    /// Bookkeeping fields as a document fragment.
    ///
    /// `updatedUtc` is stored with millisecond precision.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert(ID_FIELD, *self.id.as_object_id());
        if let Some(updated_at) = self.updated_at {
            document.insert(UPDATED_FIELD, bson::DateTime::from_chrono(updated_at));
        }
        document
    }
}
