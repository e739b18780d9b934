//! Coercion of loosely-typed values into strongly-typed identifiers.
//!
//! Callers hand identifiers around in several shapes: already typed, wrapped in
//! an `Option`, as text from a command argument, or as a raw JSON/BSON value
//! pulled out of a document. An [`IdCodec`] folds all of those into one typed
//! identifier, or fails with [`DomainError::InvalidIdentifier`].

use core::fmt::Display;

use bson::Bson;
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::id::{DocumentId, RecordId};

/// An identifier input of not-yet-known shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdInput<I> {
    /// Already a typed identifier.
    Id(I),
    /// A possibly-absent wrapped value.
    Optional(Option<Box<IdInput<I>>>),
    /// Anything else, captured by its textual form.
    Text(String),
}

impl<I> IdInput<I> {
    /// Capture an arbitrary value by its `Display` rendering.
    pub fn display(value: &impl Display) -> Self {
        Self::Text(value.to_string())
    }

    pub fn absent() -> Self {
        Self::Optional(None)
    }
}

impl<I> From<&str> for IdInput<I> {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<I> From<String> for IdInput<I> {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<I, T> From<Option<T>> for IdInput<I>
where
    T: Into<IdInput<I>>,
{
    fn from(value: Option<T>) -> Self {
        Self::Optional(value.map(|v| Box::new(v.into())))
    }
}

impl From<DocumentId> for IdInput<DocumentId> {
    fn from(value: DocumentId) -> Self {
        Self::Id(value)
    }
}

impl From<RecordId> for IdInput<RecordId> {
    fn from(value: RecordId) -> Self {
        Self::Id(value)
    }
}

impl From<bson::oid::ObjectId> for IdInput<DocumentId> {
    fn from(value: bson::oid::ObjectId) -> Self {
        Self::Id(DocumentId::from_object_id(value))
    }
}

/// JSON `null` is an absent value; strings are taken verbatim; anything else
/// by its serialized text.
impl<I> From<Value> for IdInput<I> {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Optional(None),
            Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<Bson> for IdInput<DocumentId> {
    fn from(value: Bson) -> Self {
        match value {
            Bson::ObjectId(oid) => Self::Id(DocumentId::from_object_id(oid)),
            Bson::Null | Bson::Undefined => Self::Optional(None),
            Bson::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Parses loosely-typed input into one identifier family.
///
/// Implementations supply the text syntax; the unwrapping rules live in the
/// provided [`IdCodec::parse`] so every family behaves the same way.
pub trait IdCodec {
    type Id;

    /// Family name used in diagnostics (e.g. `"ObjectId"`).
    fn family(&self) -> &'static str;

    /// Decode the family's text form, or `None` if `text` is not valid syntax.
    fn decode_text(&self, text: &str) -> Option<Self::Id>;

    /// Coerce `input` into an identifier.
    ///
    /// - a typed identifier is returned unchanged
    /// - a present optional is unwrapped and parsed recursively
    /// - an empty optional fails
    /// - text is decoded, failing with the offending text in the message
    fn parse(&self, input: impl Into<IdInput<Self::Id>>) -> DomainResult<Self::Id> {
        let mut current = input.into();
        loop {
            match current {
                IdInput::Id(id) => return Ok(id),
                IdInput::Optional(Some(inner)) => current = *inner,
                IdInput::Optional(None) => {
                    return Err(DomainError::invalid_identifier(
                        "optional value not present",
                    ));
                }
                IdInput::Text(text) => {
                    return self.decode_text(&text).ok_or_else(|| {
                        DomainError::invalid_identifier(format!(
                            "{text:?} is not a valid {}",
                            self.family()
                        ))
                    });
                }
            }
        }
    }
}

/// Codec for [`DocumentId`] (24-character hex object ids).
#[derive(Debug, Default, Copy, Clone)]
pub struct ObjectIdCodec;

impl IdCodec for ObjectIdCodec {
    type Id = DocumentId;

    fn family(&self) -> &'static str {
        "ObjectId"
    }

    fn decode_text(&self, text: &str) -> Option<DocumentId> {
        text.parse().ok()
    }
}

/// Codec for [`RecordId`] (UUIDv7 in any of the standard text layouts).
#[derive(Debug, Default, Copy, Clone)]
pub struct UuidCodec;

impl IdCodec for UuidCodec {
    type Id = RecordId;

    fn family(&self) -> &'static str {
        "UUIDv7"
    }

    fn decode_text(&self, text: &str) -> Option<RecordId> {
        text.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const VALID: &str = "507f1f77bcf86cd799439011";

    fn valid_id() -> DocumentId {
        VALID.parse().unwrap()
    }

    #[test]
    fn valid_text_parses() {
        let id = ObjectIdCodec.parse(VALID).unwrap();
        assert_eq!(id.to_hex(), VALID);
    }

    #[test]
    fn invalid_text_reports_offending_value() {
        let err = ObjectIdCodec.parse("not-an-id").unwrap_err();
        match err {
            DomainError::InvalidIdentifier(msg) => {
                assert!(msg.contains("not-an-id"), "{msg}");
                assert!(msg.contains("ObjectId"), "{msg}");
            }
            other => panic!("expected InvalidIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn typed_id_is_returned_unchanged() {
        let id = DocumentId::new();
        assert_eq!(ObjectIdCodec.parse(id).unwrap(), id);
    }

    #[test]
    fn present_optional_is_unwrapped() {
        let id = valid_id();
        assert_eq!(ObjectIdCodec.parse(Some(id)).unwrap(), id);
        assert_eq!(ObjectIdCodec.parse(Some(VALID)).unwrap(), id);
        assert_eq!(ObjectIdCodec.parse(Some(Some(id))).unwrap(), id);
    }

    #[test]
    fn empty_optional_fails() {
        let err = ObjectIdCodec.parse(None::<DocumentId>).unwrap_err();
        assert_eq!(
            err,
            DomainError::invalid_identifier("optional value not present")
        );
    }

    #[test]
    fn optional_wrapping_garbage_fails_on_the_inner_text() {
        let err = ObjectIdCodec.parse(Some("zzz")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifier(msg) if msg.contains("zzz")));
    }

    #[test]
    fn display_values_are_parsed_by_text_form() {
        let err = ObjectIdCodec.parse(IdInput::<DocumentId>::display(&42u32)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifier(msg) if msg.contains("42")));
    }

    #[test]
    fn json_values_are_coerced() {
        assert_eq!(ObjectIdCodec.parse(json!(VALID)).unwrap(), valid_id());
        assert!(ObjectIdCodec.parse(json!(null)).is_err());
        assert!(ObjectIdCodec.parse(json!(12)).is_err());
    }

    #[test]
    fn bson_values_are_coerced() {
        let id = valid_id();
        assert_eq!(ObjectIdCodec.parse(Bson::ObjectId(id.into())).unwrap(), id);
        assert_eq!(ObjectIdCodec.parse(Bson::String(VALID.into())).unwrap(), id);
        assert!(ObjectIdCodec.parse(Bson::Null).is_err());
        assert!(ObjectIdCodec.parse(Bson::Int32(7)).is_err());
    }

    #[test]
    fn uuid_codec_accepts_v7_only() {
        let id = RecordId::new();
        assert_eq!(UuidCodec.parse(id.to_string()).unwrap(), id);
        assert_eq!(UuidCodec.parse(id).unwrap(), id);
        let err = UuidCodec
            .parse("67e55044-10b1-426f-9247-bb680e5fe0c8")
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifier(msg) if msg.contains("UUIDv7")));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: lowercase 24-hex text survives parse -> text unchanged.
        #[test]
        fn hex_text_round_trips(s in "[0-9a-f]{24}") {
            let id = ObjectIdCodec.parse(s.as_str()).unwrap();
            prop_assert_eq!(id.to_hex(), s);
        }

        /// Property: parsing an already-typed id is the identity.
        #[test]
        fn typed_ids_are_fixed_points(bytes in any::<[u8; 12]>()) {
            let id = DocumentId::from_bytes(bytes);
            prop_assert_eq!(ObjectIdCodec.parse(id).unwrap(), id);
            prop_assert_eq!(ObjectIdCodec.parse(Some(id)).unwrap(), id);
        }

        /// Property: any text of the wrong length is rejected.
        #[test]
        fn wrong_length_is_rejected(s in "[0-9a-f]{0,40}") {
            prop_assume!(s.len() != DocumentId::HEX_LEN);
            let rejected = matches!(
                ObjectIdCodec.parse(s.as_str()),
                Err(DomainError::InvalidIdentifier(_))
            );
            prop_assert!(rejected);
        }

        /// Property: a single non-hex character anywhere poisons the input.
        #[test]
        fn non_hex_is_rejected(
            prefix in "[0-9a-f]{0,23}",
            bad in "[g-zG-Z_ -]",
        ) {
            let mut s = prefix;
            s.push_str(&bad);
            while s.len() < DocumentId::HEX_LEN {
                s.push('0');
            }
            let rejected = matches!(
                ObjectIdCodec.parse(s.as_str()),
                Err(DomainError::InvalidIdentifier(_))
            );
            prop_assert!(rejected);
        }
    }
}
