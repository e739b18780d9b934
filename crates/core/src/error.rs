//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// None of these are transient: they describe bad input or a wiring mistake,
/// so callers surface them instead of retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or absent identifier input.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// An identifier was read before one was assigned.
    #[error("identifier not yet assigned: {0}")]
    NotYetAssigned(&'static str),

    /// No implementation was registered for a capability.
    #[error("unbound capability: {0}")]
    UnboundCapability(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A conflicting registration or write.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    pub fn not_yet_assigned(what: &'static str) -> Self {
        Self::NotYetAssigned(what)
    }

    pub fn unbound(capability: impl Into<String>) -> Self {
        Self::UnboundCapability(capability.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
