//! `anvil-core` — identifier and persistence bookkeeping primitives.
//!
//! This crate contains **pure domain** primitives (no IO, no storage engine).

pub mod codec;
pub mod entity;
pub mod error;
pub mod id;

pub use codec::{IdCodec, IdInput, ObjectIdCodec, UuidCodec};
pub use entity::{Entity, PersistHook, Record, Timestamped};
pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, RecordId, TimestampedId};
